//! `system`: static system information.

use std::time::Duration;

use aura_vfs::path::display_dir;

use crate::{Command, CommandContext, CommandResult};

/// Read-only report over the session's system description.
pub struct SystemCommand;

/// `1h 02m 03s` style uptime.
pub(crate) fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}h {m:02}m {s:02}s")
    } else if m > 0 {
        format!("{m}m {s:02}s")
    } else {
        format!("{s}s")
    }
}

#[async_trait::async_trait]
impl Command for SystemCommand {
    fn name(&self) -> &'static str {
        "system"
    }

    fn description(&self) -> &'static str {
        "Show system information"
    }

    fn usage(&self) -> &'static str {
        "system"
    }

    async fn execute(&self, _args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        let state = ctx.session.get();
        let info = &state.system_info;
        ctx.info(format!(
            "🖥️  System Information:

  OS:        {} {}
  Kernel:    {}
  Arch:      {}
  Uptime:    {}
  Directory: {}
  Files:     {}
  Folders:   {}",
            info.os,
            info.version,
            info.kernel,
            info.arch,
            format_uptime(ctx.session.uptime()),
            display_dir(&state.current_directory),
            ctx.vfs.files().len(),
            ctx.vfs.folders().len(),
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(Duration::from_secs(5)), "5s");
        assert_eq!(format_uptime(Duration::from_secs(65)), "1m 05s");
        assert_eq!(format_uptime(Duration::from_secs(3723)), "1h 02m 03s");
    }
}
