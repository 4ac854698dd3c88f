//! `PlayerDebugMode` flag for every CSXS runtime slot.
//!
//! Unsigned extensions only load when the flag is set. macOS keeps it in the
//! `com.adobe.CSXS.<n>` preference domain, Windows under
//! `HKCU\Software\Adobe\CSXS.<n>`.
use anyhow::{Context as _, Result};
use std::ops::RangeInclusive;

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;
use crate::platform::{Os, Platform};

/// CSXS runtime versions the flag is written for.
pub const CSXS_SLOTS: RangeInclusive<u8> = 4..=15;

/// Preference / registry value name.
const PLAYER_DEBUG_MODE: &str = "PlayerDebugMode";

/// The debug flag across all [`CSXS_SLOTS`].
#[derive(Debug)]
pub struct PlayerDebugMode<'a> {
    platform: &'a Platform,
    executor: &'a dyn Executor,
}

impl<'a> PlayerDebugMode<'a> {
    /// The flag on `platform`, read and written through `executor`.
    #[must_use]
    pub const fn new(platform: &'a Platform, executor: &'a dyn Executor) -> Self {
        Self { platform, executor }
    }

    fn unsupported(&self) -> ResourceChange {
        ResourceChange::Skipped {
            reason: format!("no CEP hosts on {}", self.platform.os),
        }
    }

    fn write_defaults(&self, value: &str) -> Result<()> {
        for slot in CSXS_SLOTS {
            let domain = domain(slot);
            self.executor
                .run("defaults", &["write", domain.as_str(), PLAYER_DEBUG_MODE, value])
                .with_context(|| format!("setting {PLAYER_DEBUG_MODE} in {domain}"))?;
        }
        Ok(())
    }
}

/// `com.adobe.CSXS.<slot>`.
fn domain(slot: u8) -> String {
    format!("com.adobe.CSXS.{slot}")
}

impl Applicable for PlayerDebugMode<'_> {
    fn description(&self) -> String {
        format!(
            "{PLAYER_DEBUG_MODE} for CSXS.{}..CSXS.{}",
            CSXS_SLOTS.start(),
            CSXS_SLOTS.end()
        )
    }

    fn apply(&self) -> Result<ResourceChange> {
        match self.platform.os {
            Os::MacOs => self.write_defaults("1")?,
            Os::Windows => registry::set_all(true)?,
            Os::Linux => return Ok(self.unsupported()),
        }
        Ok(ResourceChange::Applied)
    }

    fn remove(&self) -> Result<ResourceChange> {
        match self.platform.os {
            Os::MacOs => self.write_defaults("0")?,
            Os::Windows => registry::set_all(false)?,
            Os::Linux => return Ok(self.unsupported()),
        }
        Ok(ResourceChange::Applied)
    }
}

impl Resource for PlayerDebugMode<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        let enabled = match self.platform.os {
            Os::MacOs => {
                let mut enabled = 0usize;
                for slot in CSXS_SLOTS {
                    let result = self.executor.run_unchecked(
                        "defaults",
                        &["read", domain(slot).as_str(), PLAYER_DEBUG_MODE],
                    )?;
                    if result.success && result.stdout.trim() == "1" {
                        enabled += 1;
                    }
                }
                enabled
            }
            Os::Windows => registry::count_enabled()?,
            Os::Linux => {
                return Ok(ResourceState::Invalid {
                    reason: format!("no CEP hosts on {}", self.platform.os),
                });
            }
        };
        let total = CSXS_SLOTS.len();
        Ok(match enabled {
            0 => ResourceState::Missing,
            n if n == total => ResourceState::Correct,
            n => ResourceState::Incorrect {
                current: format!("enabled for {n} of {total} slots"),
            },
        })
    }
}

/// Turn the flag on for every slot.
///
/// A no-op on platforms without CEP hosts.
///
/// # Errors
///
/// Returns an error if any preference write fails.
pub fn enable_player_debug_mode(platform: &Platform, executor: &dyn Executor) -> Result<()> {
    PlayerDebugMode::new(platform, executor).apply().map(|_| ())
}

/// Turn the flag off for every slot.
///
/// A no-op on platforms without CEP hosts.
///
/// # Errors
///
/// Returns an error if any preference write fails.
pub fn disable_player_debug_mode(platform: &Platform, executor: &dyn Executor) -> Result<()> {
    PlayerDebugMode::new(platform, executor).remove().map(|_| ())
}

#[cfg(windows)]
mod registry {
    use anyhow::{Context as _, Result};
    use winreg::RegKey;
    use winreg::enums::{HKEY_CURRENT_USER, KEY_SET_VALUE};

    use super::{CSXS_SLOTS, PLAYER_DEBUG_MODE};

    fn subkey(slot: u8) -> String {
        format!(r"Software\Adobe\CSXS.{slot}")
    }

    /// Write `"1"` (REG_SZ) or delete the value for every slot.
    pub(super) fn set_all(enabled: bool) -> Result<()> {
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        for slot in CSXS_SLOTS {
            let path = subkey(slot);
            if enabled {
                let (key, _) = hkcu
                    .create_subkey(&path)
                    .with_context(|| format!(r"opening HKCU\{path}"))?;
                key.set_value(PLAYER_DEBUG_MODE, &"1")
                    .with_context(|| format!(r"setting HKCU\{path}\{PLAYER_DEBUG_MODE}"))?;
            } else {
                let key = match hkcu.open_subkey_with_flags(&path, KEY_SET_VALUE) {
                    Ok(key) => key,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                    Err(e) => return Err(e).with_context(|| format!(r"opening HKCU\{path}")),
                };
                match key.delete_value(PLAYER_DEBUG_MODE) {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => {
                        return Err(e).with_context(|| {
                            format!(r"deleting HKCU\{path}\{PLAYER_DEBUG_MODE}")
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Number of slots whose value is `"1"`.
    pub(super) fn count_enabled() -> Result<usize> {
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let mut enabled = 0;
        for slot in CSXS_SLOTS {
            let Ok(key) = hkcu.open_subkey(subkey(slot)) else {
                continue;
            };
            if key
                .get_value::<String, _>(PLAYER_DEBUG_MODE)
                .is_ok_and(|v| v == "1")
            {
                enabled += 1;
            }
        }
        Ok(enabled)
    }
}

#[cfg(not(windows))]
mod registry {
    use anyhow::Result;

    pub(super) fn set_all(_enabled: bool) -> Result<()> {
        anyhow::bail!("the Windows registry is only reachable from a Windows build")
    }

    pub(super) fn count_enabled() -> Result<usize> {
        anyhow::bail!("the Windows registry is only reachable from a Windows build")
    }
}
