//! `status`: sectioned diagnostic report.

use super::action;
use super::system::format_uptime;
use crate::{Command, CommandContext, CommandResult, QuantumState, SessionState};

/// Read-only status over session state, by section.
pub struct StatusCommand;

fn light(active: bool) -> &'static str {
    if active { "🟢" } else { "🔴" }
}

fn quantum_light(state: QuantumState) -> &'static str {
    match state {
        QuantumState::Dormant => "🔴",
        QuantumState::Processing => "🟡",
        _ => "🟢",
    }
}

fn system_section(ctx: &CommandContext<'_>, state: &SessionState) -> String {
    format!(
        "🖥️  SYSTEM\n  {} {} ({})\n  Uptime: {}",
        state.system_info.os,
        state.system_info.version,
        state.system_info.arch,
        format_uptime(ctx.session.uptime())
    )
}

fn quantum_section(state: &SessionState) -> String {
    format!(
        "⚛️  QUANTUM CORE\n  {} State: {}",
        quantum_light(state.quantum_state),
        state.quantum_state
    )
}

fn neural_section(state: &SessionState) -> String {
    let label = if state.is_neural_active { "ACTIVE" } else { "INACTIVE" };
    format!(
        "🧠 NEURAL INTERFACE\n  {} Status: {label}",
        light(state.is_neural_active)
    )
}

fn security_section(state: &SessionState) -> String {
    let label = if state.encryption_enabled { "ENABLED" } else { "DISABLED" };
    format!(
        "🔐 SECURITY\n  {} Encryption: {label}",
        light(state.encryption_enabled)
    )
}

fn apps_section(state: &SessionState) -> String {
    if state.open_apps.is_empty() {
        "🚀 APPLICATIONS\n  No applications launched".to_owned()
    } else {
        format!(
            "🚀 APPLICATIONS\n  {} active: {}",
            state.open_apps.len(),
            state.open_apps.join(", ")
        )
    }
}

#[async_trait::async_trait]
impl Command for StatusCommand {
    fn name(&self) -> &'static str {
        "status"
    }

    fn description(&self) -> &'static str {
        "Display system status"
    }

    fn usage(&self) -> &'static str {
        "status [system|quantum|neural|security|apps|all]"
    }

    async fn execute(&self, args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        let state = ctx.session.get();
        let report = match action(args, "all").as_str() {
            "system" | "sys" => system_section(ctx, &state),
            "quantum" | "q" => quantum_section(&state),
            "neural" | "n" => neural_section(&state),
            "security" | "sec" => security_section(&state),
            "apps" | "applications" => apps_section(&state),
            "all" => [
                system_section(ctx, &state),
                quantum_section(&state),
                neural_section(&state),
                security_section(&state),
                apps_section(&state),
            ]
            .join("\n\n"),
            other => {
                ctx.error(format!(
                    "Unknown status section: {other}\nUsage: {}",
                    self.usage()
                ));
                return Ok(());
            },
        };
        ctx.info(report);
        Ok(())
    }
}
