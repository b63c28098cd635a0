//! `timeline` command: prints the nominal cue schedule for a script.

use crate::cli::args::TimelineArgs;
use crate::cli::commands::load_script_or_default;
use crate::director;
use crate::error::OvertureError;

/// Print the schedule, as a table or as JSON.
///
/// # Errors
///
/// Returns a script error if the script fails to load, or a JSON error if
/// serialization fails.
#[allow(clippy::unused_async)] // dispatch awaits every command handler
pub async fn run(args: &TimelineArgs) -> Result<(), OvertureError> {
    let script = load_script_or_default(args.script.as_deref())?;
    let cues = director::timeline(&script);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&cues)?);
        return Ok(());
    }

    println!("{:>9}  {:<7}  cue", "offset", "channel");
    for cue in &cues {
        println!(
            "{:>7}ms  {:<7}  {}",
            cue.offset_ms, cue.channel, cue.description
        );
    }
    Ok(())
}
