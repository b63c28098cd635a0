//! Typewriter engine for the letter phase.
//!
//! Reveals the script's text blocks strictly in order, one character at a
//! time, with a single shared cursor handed from block to block. The queue
//! itself is a pure state machine ([`TypewriterQueue::step`]); [`reveal`]
//! drives it against the clock and the stage.
//!
//! Ordering invariant: at most one block is ever partially revealed, and
//! revealed text is never reordered or overwritten.

use std::time::Duration;

use crate::script::LetterSection;
use crate::stage::Stage;

/// One text block of the letter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    /// The complete source text.
    pub full_text: String,
    /// Number of characters revealed so far.
    pub revealed: usize,
}

impl TextBlock {
    fn new(full_text: impl Into<String>) -> Self {
        Self {
            full_text: full_text.into(),
            revealed: 0,
        }
    }

    /// Length of the source text in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.full_text.chars().count()
    }

    /// Whether every character has been revealed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.revealed >= self.char_len()
    }

    /// Whether this block is mid-reveal.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.revealed > 0 && !self.is_complete()
    }

    /// The revealed prefix of the source text.
    #[must_use]
    pub fn revealed_text(&self) -> String {
        self.full_text.chars().take(self.revealed).collect()
    }
}

/// One step of queue progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeStep {
    /// Block `index` starts: make it visible and move the cursor to it.
    Begin(usize),
    /// One character of block `index` was revealed.
    Char(usize, char),
    /// Block `index` finished revealing.
    BlockDone(usize),
    /// Every block is complete.
    Finished,
}

/// Ordered reveal state for all blocks of the letter.
///
/// Built once per letter-phase entry, consumed to completion, never reset.
#[derive(Debug, Clone)]
pub struct TypewriterQueue {
    blocks: Vec<TextBlock>,
    current: usize,
    begun: bool,
}

impl TypewriterQueue {
    /// Builds a queue over the given block texts.
    #[must_use]
    pub fn new(texts: &[String]) -> Self {
        Self {
            blocks: texts.iter().map(TextBlock::new).collect(),
            current: 0,
            begun: false,
        }
    }

    /// Advances the queue by one step.
    ///
    /// Returns [`TypeStep::Finished`] forever once all blocks are complete.
    pub fn step(&mut self) -> TypeStep {
        if self.current >= self.blocks.len() {
            return TypeStep::Finished;
        }
        if !self.begun {
            self.begun = true;
            return TypeStep::Begin(self.current);
        }
        let block = &mut self.blocks[self.current];
        if let Some(ch) = block.full_text.chars().nth(block.revealed) {
            block.revealed += 1;
            TypeStep::Char(self.current, ch)
        } else {
            // Empty blocks land here on their first step after Begin.
            let done = self.current;
            self.current += 1;
            self.begun = false;
            TypeStep::BlockDone(done)
        }
    }

    /// Whether every block has completed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.current >= self.blocks.len()
    }

    /// Number of blocks currently mid-reveal. Never exceeds one.
    #[must_use]
    pub fn partial_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_partial()).count()
    }

    /// Concatenation of all revealed text, in block order.
    #[must_use]
    pub fn revealed_concat(&self) -> String {
        self.blocks.iter().map(TextBlock::revealed_text).collect()
    }

    /// The blocks in order.
    #[must_use]
    pub fn blocks(&self) -> &[TextBlock] {
        &self.blocks
    }
}

/// Reveals the letter on the stage.
///
/// Waits the configured start delay (the containing phase is still fading
/// in), then walks the queue: per character, one fixed interval; per block
/// boundary, one fixed pause; after the last block, a hold before the
/// cursor retires. Runs to completion; there is nothing to cancel.
pub async fn reveal(stage: &dyn Stage, cfg: &LetterSection) {
    if cfg.blocks.is_empty() {
        tracing::debug!("letter has no blocks, typewriter idle");
        return;
    }

    tokio::time::sleep(Duration::from_millis(cfg.start_delay_ms)).await;

    let char_interval = Duration::from_millis(cfg.char_interval_ms);
    let block_pause = Duration::from_millis(cfg.block_pause_ms);

    let mut queue = TypewriterQueue::new(&cfg.blocks);
    loop {
        match queue.step() {
            TypeStep::Begin(index) => {
                stage.show_letter_block(index);
                stage.move_cursor(index);
            }
            TypeStep::Char(index, ch) => {
                tokio::time::sleep(char_interval).await;
                stage.append_letter_char(index, ch);
            }
            TypeStep::BlockDone(index) => {
                tracing::debug!(block = index, "letter block complete");
                if !queue.is_finished() {
                    tokio::time::sleep(block_pause).await;
                }
            }
            TypeStep::Finished => break,
        }
    }

    tokio::time::sleep(Duration::from_millis(cfg.cursor_hold_ms)).await;
    stage.retire_cursor();
    tracing::info!("letter complete");
}
