//! `neural`: the themed neural interface flag.

use super::action;
use crate::{Command, CommandContext, CommandResult, SessionPatch};

/// Nominal delay before the interface settles.
const SETTLE_MS: u64 = 1000;

/// Toggles and reports `isNeuralActive`.
pub struct NeuralCommand;

#[async_trait::async_trait]
impl Command for NeuralCommand {
    fn name(&self) -> &'static str {
        "neural"
    }

    fn description(&self) -> &'static str {
        "Activate the neural network interface"
    }

    fn usage(&self) -> &'static str {
        "neural [activate|deactivate|status]"
    }

    async fn execute(&self, args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        match action(args, "activate").as_str() {
            "activate" => {
                ctx.info("🧠 Establishing neural pathways...");
                ctx.pause(SETTLE_MS).await;
                ctx.session.update(SessionPatch {
                    is_neural_active: Some(true),
                    ..SessionPatch::default()
                })?;
                ctx.success(
                    "🧠 Neural network interface activated\n\n  State: ACTIVE\n  Nodes: 2,847\n  \
                     Learning: ON\n\nEnhanced cognitive processing enabled.",
                );
            },
            "deactivate" => {
                ctx.session.update(SessionPatch {
                    is_neural_active: Some(false),
                    ..SessionPatch::default()
                })?;
                ctx.warning(
                    "🧠 Neural network interface deactivated. Returning to standard processing mode.",
                );
            },
            "status" => {
                let status = if ctx.session.get().is_neural_active {
                    "ACTIVE"
                } else {
                    "INACTIVE"
                };
                ctx.info(format!("🧠 Neural Network Status: {status}"));
            },
            _ => ctx.error(format!("Usage: {}", self.usage())),
        }
        Ok(())
    }
}
