//! Idempotent resource primitives (check + apply pattern).
pub mod extension_link;
pub mod helpers;
pub mod player_debug_mode;

use anyhow::Result;

/// Something on the host that a build puts in place and `unlink` takes away.
///
/// Resources that can also report their current state implement the richer
/// [`Resource`] super-trait.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Put the resource in place.
    ///
    /// The extension link is recreated even when it already points at the
    /// output folder. The debug flag is written for every CSXS runtime.
    /// [`ResourceChange::Skipped`] means this platform has nowhere to put it.
    ///
    /// # Errors
    ///
    /// Returns an error if a link or preference cannot be written.
    fn apply(&self) -> Result<ResourceChange>;

    /// Undo [`apply`](Self::apply).
    ///
    /// [`ResourceChange::AlreadyCorrect`] means there was nothing to remove.
    ///
    /// # Errors
    ///
    /// Returns an error if a link or preference cannot be removed.
    fn remove(&self) -> Result<ResourceChange>;
}

/// State of a resource (file, registry entry, etc.).
///
/// # Examples
///
/// ```
/// use cep_bundler::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let wrong = ResourceState::Incorrect { current: "/other/dist".into() };
/// let skip = ResourceState::Invalid { reason: "unsupported platform".into() };
///
/// assert_ne!(missing, correct);
/// assert_eq!(correct, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource does not exist or is not present.
    Missing,
    /// Resource exists and matches the desired state.
    Correct,
    /// Resource exists but does not match the desired state.
    Incorrect {
        /// The current value of the resource.
        current: String,
    },
    /// Resource cannot be applied here (e.g. no CEP hosts on this platform).
    Invalid {
        /// Reason why the resource cannot be applied.
        reason: String,
    },
}

/// Result of applying a resource change.
///
/// # Examples
///
/// ```
/// use cep_bundler::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// let noop = ResourceChange::AlreadyCorrect;
/// let skipped = ResourceChange::Skipped { reason: "unsupported platform".into() };
///
/// assert_eq!(applied, ResourceChange::Applied);
/// assert_ne!(applied, noop);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
    /// Resource was skipped (e.g. unsupported platform).
    Skipped {
        /// Reason why the resource was skipped.
        reason: String,
    },
}

/// Unified interface for resources that can be checked and applied.
///
/// Extends [`Applicable`] with state-checking methods for resources that can
/// determine their own state (the extension link, debug-mode preferences).
///
/// # Examples
///
/// ```ignore
/// let stale = link.needs_change()?;
/// link.apply()?;
/// log.info(if stale { "linked" } else { "refreshed" });
/// ```
pub trait Resource: Applicable {
    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource state cannot be determined due to I/O failures,
    /// permission issues, or other system errors.
    fn current_state(&self) -> Result<ResourceState>;

    /// Whether the resource is missing or differs from what
    /// [`apply`](Applicable::apply) would put in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the current state cannot be determined (propagates errors from
    /// `current_state()`).
    fn needs_change(&self) -> Result<bool> {
        Ok(matches!(
            self.current_state()?,
            ResourceState::Missing | ResourceState::Incorrect { .. }
        ))
    }
}
