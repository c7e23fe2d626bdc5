//! Zero-extent dispatch policy.
//!
//! An output with a zero-extent dimension yields a dispatch with zero
//! workgroups along some axis. Whether that means "launch nothing" or is a
//! caller bug depends on the surrounding system, so the decision is an
//! explicit, configurable policy rather than a special case buried in the
//! geometry code.
//!
//! The process-wide default is stored in an `AtomicU8`, so reading it costs
//! one load and switching it never blocks.

use core::convert::TryFrom;
use core::sync::atomic::{AtomicU8, Ordering};

/// What to do with a dispatch that has zero workgroups along some axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ZeroExtentPolicy {
    /// Return the zero count; the caller skips the launch (default).
    #[default]
    LaunchNothing = 0,
    /// Report [`DispatchError::ZeroExtent`](crate::DispatchError::ZeroExtent).
    Reject = 1,
}

impl TryFrom<u8> for ZeroExtentPolicy {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::LaunchNothing),
            1 => Ok(Self::Reject),
            _ => Err(()),
        }
    }
}

static GLOBAL_ZERO_EXTENT_POLICY: AtomicU8 = AtomicU8::new(ZeroExtentPolicy::LaunchNothing as u8);

/// Sets the process-wide zero-extent policy.
///
/// # Example
///
/// ```
/// use wgdispatch::policy::{set_zero_extent_policy, zero_extent_policy, ZeroExtentPolicy};
/// set_zero_extent_policy(ZeroExtentPolicy::Reject);
/// assert_eq!(zero_extent_policy(), ZeroExtentPolicy::Reject);
/// # set_zero_extent_policy(ZeroExtentPolicy::LaunchNothing);
/// ```
pub fn set_zero_extent_policy(policy: ZeroExtentPolicy) {
    tracing::debug!(?policy, "zero-extent policy changed");
    GLOBAL_ZERO_EXTENT_POLICY.store(policy as u8, Ordering::Release);
}

/// Returns the process-wide zero-extent policy.
///
/// If the stored value is invalid, defaults to [`ZeroExtentPolicy::LaunchNothing`].
pub fn zero_extent_policy() -> ZeroExtentPolicy {
    ZeroExtentPolicy::try_from(GLOBAL_ZERO_EXTENT_POLICY.load(Ordering::Acquire))
        .unwrap_or_default()
}
