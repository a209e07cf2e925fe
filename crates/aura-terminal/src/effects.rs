//! Timed output sequences for the themed commands.
//!
//! A sequence is a list of [`Frame`]s. Each frame is emitted and then
//! followed by its pause, scaled by the configured effect speed. The pause
//! is a cooperative `await`, so other sessions keep running meanwhile.

use crate::CommandContext;
use crate::output::OutputKind;

/// One emission in a timed sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Record kind.
    pub kind: OutputKind,
    /// Record content.
    pub text: String,
    /// Nominal pause after the emission, in milliseconds.
    pub pause_ms: u64,
}

impl Frame {
    /// A frame followed by `pause_ms` of nominal delay.
    #[must_use]
    pub fn new(kind: OutputKind, text: impl Into<String>, pause_ms: u64) -> Self {
        Self {
            kind,
            text: text.into(),
            pause_ms,
        }
    }

    /// A frame with no trailing pause.
    #[must_use]
    pub fn last(kind: OutputKind, text: impl Into<String>) -> Self {
        Self::new(kind, text, 0)
    }
}

/// Emit `frames` in order, pausing after each.
pub async fn play(ctx: &CommandContext<'_>, frames: impl IntoIterator<Item = Frame>) {
    for frame in frames {
        ctx.emit(frame.kind, frame.text);
        if frame.pause_ms > 0 {
            ctx.pause(frame.pause_ms).await;
        }
    }
}

/// A text progress bar, `width` cells wide, `percent` full.
#[must_use]
pub fn progress_bar(percent: u8, width: usize) -> String {
    let percent = usize::from(percent.min(100));
    let filled = width.saturating_mul(percent) / 100;
    let empty = width.saturating_sub(filled);
    format!("{}{} {percent:>3}%", "█".repeat(filled), "░".repeat(empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0, 4), "░░░░   0%");
        assert_eq!(progress_bar(50, 4), "██░░  50%");
        assert_eq!(progress_bar(100, 4), "████ 100%");
        assert_eq!(progress_bar(250, 2), "██ 100%");
    }

    #[test]
    fn test_last_frame_has_no_pause() {
        let frame = Frame::last(OutputKind::Success, "done");
        assert_eq!(frame.pause_ms, 0);
        assert_eq!(frame.text, "done");
    }
}
