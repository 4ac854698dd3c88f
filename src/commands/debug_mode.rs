//! Debug-mode command: toggle or inspect `PlayerDebugMode`.
use anyhow::Result;

use crate::cli::DebugModeAction;
use crate::exec::{Executor, SystemExecutor};
use crate::logging::{Log, Logger};
use crate::platform::Platform;
use crate::resources::player_debug_mode::{
    PlayerDebugMode, disable_player_debug_mode, enable_player_debug_mode,
};
use crate::resources::{Resource as _, ResourceState};

/// Run the debug-mode command.
///
/// # Errors
///
/// Returns an error if a preference cannot be written or read.
pub fn run(action: DebugModeAction, log: &Logger) -> Result<()> {
    apply(action, &Platform::detect(), &SystemExecutor, log)
}

/// Perform `action` on `platform`.
///
/// # Errors
///
/// Returns an error if a preference cannot be written or read.
pub fn apply(
    action: DebugModeAction,
    platform: &Platform,
    executor: &dyn Executor,
    log: &dyn Log,
) -> Result<()> {
    if !platform.supports_cep() {
        log.info(&format!("no CEP hosts on {}; nothing to do", platform.os));
        return Ok(());
    }
    match action {
        DebugModeAction::Enable => {
            enable_player_debug_mode(platform, executor)?;
            log.info("PlayerDebugMode enabled");
        }
        DebugModeAction::Disable => {
            disable_player_debug_mode(platform, executor)?;
            log.info("PlayerDebugMode disabled");
        }
        DebugModeAction::Status => {
            let message = match PlayerDebugMode::new(platform, executor).current_state()? {
                ResourceState::Correct => "enabled".to_string(),
                ResourceState::Missing => "disabled".to_string(),
                ResourceState::Incorrect { current } => current,
                ResourceState::Invalid { reason } => reason,
            };
            log.info(&format!("PlayerDebugMode: {message}"));
        }
    }
    Ok(())
}
