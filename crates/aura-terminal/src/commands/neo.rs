//! `neo`: themed sequences, one per scene.

use super::action;
use crate::effects::{Frame, play, progress_bar};
use crate::output::OutputKind::{Error, Info, Success, Warning};
use crate::{Command, CommandContext, CommandResult};

/// Scenes `neo` knows, with a one-line summary each.
const SCENES: &[(&str, &str)] = &[
    ("bullet-time", "Manipulate time flow"),
    ("red-pill", "See the truth of the Matrix"),
    ("blue-pill", "Return to blissful ignorance"),
    ("architect", "Meet the system creator"),
    ("oracle", "Consult the all-knowing"),
    ("wake-up", "Emergency awakening"),
];

/// Emits one of the `neo` scenes. No session state changes.
pub struct NeoCommand;

fn overview() -> String {
    let rows: Vec<String> = SCENES
        .iter()
        .map(|(name, summary)| format!("  neo {name:<12} {summary}"))
        .collect();
    format!(
        "👤 NEO - THE ONE - MATRIX OPERATIONS:\n\n🎯 Available Commands:\n{}\n\n\
         🔮 \"There is no spoon.\"",
        rows.join("\n")
    )
}

fn bullet_time() -> Vec<Frame> {
    let mut frames = vec![
        Frame::new(Warning, "⚡ BULLET TIME ACTIVATED\n\nTime perception: SLOWING", 500),
    ];
    frames.extend([25u8, 50, 75, 100].map(|p| {
        Frame::new(
            Info,
            format!("🕐 Temporal dilation {}", progress_bar(p, 20)),
            600,
        )
    }));
    frames.push(Frame::last(
        Success,
        "🎯 Bullets frozen mid-air.\n\n\"What are you trying to tell me? That I can dodge bullets?\"",
    ));
    frames
}

fn red_pill() -> Vec<Frame> {
    vec![
        Frame::new(Warning, "💊 You take the red pill...", 1000),
        Frame::new(
            Info,
            "🐇 You stay in Wonderland, and I show you how deep the rabbit hole goes.",
            1500,
        ),
        Frame::new(Error, "⚠️  REALITY BREACH DETECTED", 800),
        Frame::new(Error, "⚠️  SIMULATION BOUNDARIES DISSOLVING", 600),
        Frame::last(Success, "🌅 Welcome to the real world."),
    ]
}

fn blue_pill() -> Vec<Frame> {
    vec![
        Frame::new(
            Info,
            "💙 You take the blue pill...\n\nThe story ends. You wake up in your bed.",
            800,
        ),
        Frame::new(Warning, "🔄 Restoring comfortable illusions...", 500),
        Frame::last(Success, "😴 Everything is exactly as it should be."),
    ]
}

fn architect() -> Vec<Frame> {
    vec![
        Frame::new(Warning, "🏛️  Entering the Architect's chamber...", 1000),
        Frame::last(
            Info,
            "👴 \"Hello, Neo. You are the eventuality of an anomaly.\"\n\n\
             The Matrix is older than you know.",
        ),
    ]
}

fn oracle() -> Vec<Frame> {
    vec![
        Frame::new(Info, "🔮 Visiting the Oracle...", 800),
        Frame::last(
            Success,
            "👵 \"I'd ask you to sit down, but you're not going to anyway.\"\n\n\
             🍪 *offers a cookie*",
        ),
    ]
}

fn wake_up() -> Vec<Frame> {
    let mut frames = vec![Frame::new(
        Warning,
        "⏰ WAKE UP, NEO...\n\n💊 The Matrix has you...\n🖥️  Follow the white rabbit...",
        800,
    )];
    let stages = [
        (10u8, "Reality breach detected"),
        (20, "Simulation parameters failing"),
        (40, "Consciousness rising"),
        (60, "Neural pathways activating"),
        (80, "Breaking through the code"),
        (100, "AWAKENING COMPLETE"),
    ];
    frames.extend(stages.map(|(p, label)| {
        Frame::new(
            Error,
            format!("⚡ EMERGENCY AWAKENING PROTOCOL\n\n{} - {label}", progress_bar(p, 10)),
            700,
        )
    }));
    if let Some(last) = frames.last_mut() {
        last.pause_ms = 1200;
    }
    frames.push(Frame::last(
        Success,
        "👁️  CONSCIOUSNESS RESTORED\n\n🌅 Welcome back to the real world.",
    ));
    frames
}

fn scene(name: &str) -> Option<Vec<Frame>> {
    Some(match name {
        "bullet-time" => bullet_time(),
        "red-pill" => red_pill(),
        "blue-pill" => blue_pill(),
        "architect" => architect(),
        "oracle" => oracle(),
        "wake-up" => wake_up(),
        _ => return None,
    })
}

#[async_trait::async_trait]
impl Command for NeoCommand {
    fn name(&self) -> &'static str {
        "neo"
    }

    fn description(&self) -> &'static str {
        "Advanced matrix operations"
    }

    fn usage(&self) -> &'static str {
        "neo [bullet-time|red-pill|blue-pill|architect|oracle|wake-up]"
    }

    async fn execute(&self, args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        match scene(&action(args, "help")) {
            Some(frames) => play(ctx, frames).await,
            None => ctx.info(overview()),
        }
        Ok(())
    }
}
