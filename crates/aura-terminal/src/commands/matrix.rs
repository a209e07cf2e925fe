//! `matrix`: the timed matrix-entry sequence.

use rand::Rng;

use crate::effects::{Frame, play, progress_bar};
use crate::output::OutputKind::{Error, Info, Success, Warning};
use crate::{Command, CommandContext, CommandResult};

const RAIN_GLYPHS: &[char] = &['0', '1', 'ア', 'カ', 'サ', 'タ', 'ナ', 'ハ', 'マ', 'ヤ', 'ラ', 'ワ'];
const RAIN_WIDTH: usize = 40;
const RAIN_ROWS: usize = 3;
const RAIN_FRAMES: usize = 4;

/// `AuraOS Matrix` in 8-bit ASCII.
const BINARY_MESSAGE: &[&str] = &[
    "01000001", "01110101", "01110010", "01100001", "01001111", "01010011", "00100000",
    "01001101", "01100001", "01110100", "01110010", "01101001", "01111000",
];

/// Emits the matrix sequence. No session state changes.
pub struct MatrixCommand;

fn rain_frames() -> Vec<String> {
    let mut rng = rand::thread_rng();
    (0..RAIN_FRAMES)
        .map(|_| {
            let rows: Vec<String> = (0..RAIN_ROWS)
                .map(|_| {
                    (0..RAIN_WIDTH)
                        .map(|_| RAIN_GLYPHS[rng.gen_range(0..RAIN_GLYPHS.len())])
                        .collect()
                })
                .collect();
            format!("🌧️  DIGITAL RAIN ACTIVATED\n\n{}", rows.join("\n"))
        })
        .collect()
}

fn sequence() -> Vec<Frame> {
    let mut frames = vec![
        Frame::new(Info, "🔄 Initializing Matrix Protocol...", 800),
        Frame::new(
            Warning,
            format!(
                "⚡ SCANNING NEURAL PATHWAYS...\n\n{}\n\n🧠 Neural networks: DETECTED\n\
                 🌐 Reality matrix: PARSING",
                progress_bar(100, 40)
            ),
            1200,
        ),
        Frame::new(
            Success,
            "🔐 CLEARANCE PROTOCOL INITIATED\n\n  User: Authorized\n  Access: GRANTED",
            1000,
        ),
    ];
    frames.extend(
        (1..=3)
            .rev()
            .map(|i| Frame::new(Warning, format!("⏰ MATRIX ENTRY IN {i}..."), 700)),
    );
    frames.push(Frame::new(Error, "REALITY.EXE HAS STOPPED RESPONDING", 500));
    frames.push(Frame::new(
        Success,
        "🔴 ENTERING THE MATRIX...\n\n  MATRIX ACCESS GRANTED\n  \"There is no spoon.\"",
        1000,
    ));
    frames.extend(rain_frames().into_iter().map(|f| Frame::new(Info, f, 300)));

    let mut decoded = String::from("🔢 DECODING MATRIX PROTOCOL:\n\n");
    for chunk in BINARY_MESSAGE {
        decoded.push_str(chunk);
        decoded.push(' ');
        frames.push(Frame::new(Info, format!("{decoded}█"), 200));
    }
    if let Some(last) = frames.last_mut() {
        last.pause_ms = 700;
    }

    frames.push(Frame::last(
        Success,
        "🌟 AuraOS Matrix Protocol Activated\n\n  Neural Interface: SYNCHRONIZED\n  \
         Matrix Mode: FULLY OPERATIONAL\n\n🔮 Type 'neo' for advanced matrix operations.",
    ));
    frames
}

#[async_trait::async_trait]
impl Command for MatrixCommand {
    fn name(&self) -> &'static str {
        "matrix"
    }

    fn description(&self) -> &'static str {
        "Enter matrix mode"
    }

    fn usage(&self) -> &'static str {
        "matrix"
    }

    async fn execute(&self, _args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        play(ctx, sequence()).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_shape() {
        let frames = sequence();
        assert_eq!(frames.first().unwrap().kind, Info);
        let last = frames.last().unwrap();
        assert_eq!(last.kind, Success);
        assert_eq!(last.pause_ms, 0);
        assert!(frames.iter().any(|f| f.text.contains("MATRIX ENTRY IN 1")));
    }

    #[test]
    fn test_rain_frames_are_sized() {
        let frames = rain_frames();
        assert_eq!(frames.len(), RAIN_FRAMES);
        let rows: Vec<&str> = frames[0].lines().skip(2).collect();
        assert_eq!(rows.len(), RAIN_ROWS);
        assert!(rows.iter().all(|r| r.chars().count() == RAIN_WIDTH));
    }
}
