//! `run` command: plays the presentation in the terminal.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::args::RunArgs;
use crate::cli::commands::load_script_or_default;
use crate::director::Director;
use crate::error::OvertureError;
use crate::script::{LetterSection, Script};
use crate::stage::console::{ConsoleCannon, ConsoleGlobe, ConsoleStage, ConsoleStarfield};
use crate::stage::{GlobeRenderer, ParticleCannon, Stage, Starfield};

/// Slack added to computed waits in headless mode, so frame-aligned tasks
/// finish before the next step.
const HEADLESS_MARGIN: Duration = Duration::from_millis(250);

/// Play the presentation.
///
/// Interactive mode reads commands from stdin; headless mode plays a
/// scripted trigger list instead and exits when it is exhausted.
///
/// # Errors
///
/// Returns a script error if the script fails to load or validate, or an
/// I/O error if stdin closes abnormally.
pub async fn run(args: &RunArgs) -> Result<(), OvertureError> {
    let script = load_script_or_default(args.script.as_deref())?;

    let stage: Arc<dyn Stage> = Arc::new(ConsoleStage::new());
    let starfield: Arc<dyn Starfield> = Arc::new(ConsoleStarfield::new());
    let globe: Arc<dyn GlobeRenderer> = if args.no_globe {
        Arc::new(ConsoleGlobe::unavailable())
    } else {
        Arc::new(ConsoleGlobe::new())
    };
    let cannon: Option<Arc<dyn ParticleCannon>> = Some(Arc::new(ConsoleCannon::new()));

    let mut director = Director::new(Arc::clone(&script), stage, starfield, globe, cannon);
    if let Some(seed) = args.seed {
        director = director.with_retry_seed(seed);
    }
    let director = Arc::new(director);

    director.open();

    if let Some(triggers) = &args.headless_input {
        play_headless(&director, &script, triggers).await;
        Ok(())
    } else {
        input_loop(&director).await
    }
}

/// Scripted playback with no operator: plays the comma-separated trigger
/// list in order, waiting out the intro first and the letter reveal before
/// the first interaction after begin.
async fn play_headless(director: &Arc<Director>, script: &Script, triggers: &str) {
    tracing::info!(triggers, "headless playback");

    let intro = &script.intro;
    let lines = intro.lines.len() as u64 + 1;
    tokio::time::sleep(Duration::from_millis(lines * intro.line_interval_ms) + HEADLESS_MARGIN)
        .await;

    let mut reading = false;
    for trigger in triggers.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match trigger {
            "begin" | "b" => {
                director.begin().await;
                reading = true;
            }
            "retry" | "no" | "n" => {
                if reading {
                    tokio::time::sleep(letter_duration(&script.letter) + HEADLESS_MARGIN).await;
                    reading = false;
                }
                director.trigger_retry();
                let gap = script.retry.shake_ms.max(script.retry.hide_ms);
                tokio::time::sleep(Duration::from_millis(gap) + HEADLESS_MARGIN).await;
            }
            "accept" | "yes" | "y" => {
                if reading {
                    tokio::time::sleep(letter_duration(&script.letter) + HEADLESS_MARGIN).await;
                    reading = false;
                }
                director.trigger_accept();
                let accept = &script.accept;
                let outro = accept.burst_stagger_ms * u64::from(accept.burst_count)
                    + accept.accepted_reveal_ms;
                tokio::time::sleep(Duration::from_millis(outro) + HEADLESS_MARGIN).await;
            }
            other => tracing::warn!(trigger = other, "ignoring unknown trigger"),
        }
    }
}

/// Time from letter activation until the cursor retires.
fn letter_duration(letter: &LetterSection) -> Duration {
    let mut ms = letter.start_delay_ms;
    for (index, block) in letter.blocks.iter().enumerate() {
        if index > 0 {
            ms += letter.block_pause_ms;
        }
        ms += letter.char_interval_ms * block.chars().count() as u64;
    }
    Duration::from_millis(ms + letter.cursor_hold_ms)
}

/// Reads operator commands from stdin until `quit` or end of input.
async fn input_loop(director: &Arc<Director>) -> Result<(), OvertureError> {
    println!();
    println!("  commands: begin | no (retry) | yes (accept) | quit");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "begin" | "b" => {
                let director = Arc::clone(director);
                drop(tokio::spawn(async move {
                    director.begin().await;
                }));
            }
            "no" | "n" | "retry" => director.trigger_retry(),
            "yes" | "y" | "accept" => director.trigger_accept(),
            "quit" | "q" => break,
            "" => {}
            other => println!("  unknown command: {other}"),
        }
    }
    Ok(())
}
