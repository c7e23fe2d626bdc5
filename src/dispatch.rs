//! Dispatch geometry.
//!
//! Turns a [`DispatchLayout`], an output shape, a workgroup size and a
//! per-thread work factor into the number of workgroups to launch along
//! each dispatch axis.
//!
//! For every axis the count is rounded **up**, so
//!
//! ```text
//! count[a] * workgroup_size[a] * elements_per_thread[a] >= axis_size[a]
//! ```
//!
//! always holds and every output element is covered by some thread. The
//! count is also minimal: one workgroup fewer would leave elements
//! uncovered. Shaders still need a bounds check for the tail.
//!
//! # Example
//!
//! ```rust
//! use wgdispatch::dispatch::{compute_dispatch, ElementsPerThread, WorkgroupSize};
//! use wgdispatch::layout::DispatchLayout;
//!
//! let layout = DispatchLayout::new([0, 1]);
//! let count = compute_dispatch(
//!     &layout,
//!     &[8, 8],
//!     WorkgroupSize::new(4, 4, 1),
//!     ElementsPerThread::default(),
//! );
//! assert_eq!(count.as_array(), [16, 1, 1]);
//! ```

use crate::error::{DispatchError, Result};
use crate::layout::{Axis, DispatchLayout};
use crate::policy::{zero_extent_policy, ZeroExtentPolicy};

/// Number of GPU threads per workgroup along each axis.
///
/// Every component is positive. Defaults to `(1, 1, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkgroupSize([u32; 3]);

impl WorkgroupSize {
    /// Creates a workgroup size.
    ///
    /// # Panics
    ///
    /// Panics if any component is zero.
    #[must_use]
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        assert!(x > 0 && y > 0 && z > 0, "workgroup size components must be positive");
        Self([x, y, z])
    }

    /// Component along `axis`.
    #[must_use]
    pub const fn get(self, axis: Axis) -> u32 {
        self.0[axis.index()]
    }

    /// Components as `[x, y, z]`.
    #[must_use]
    pub const fn as_array(self) -> [u32; 3] {
        self.0
    }

    /// Total threads in one workgroup.
    #[must_use]
    pub fn invocations(self) -> u32 {
        self.0.iter().product()
    }

    /// The WGSL attribute that bakes this size into a compute entry point.
    ///
    /// ```
    /// use wgdispatch::dispatch::WorkgroupSize;
    /// assert_eq!(WorkgroupSize::new(16, 4, 1).wgsl_attribute(), "@workgroup_size(16, 4, 1)");
    /// ```
    #[must_use]
    pub fn wgsl_attribute(self) -> String {
        let [x, y, z] = self.0;
        format!("@workgroup_size({x}, {y}, {z})")
    }
}

impl Default for WorkgroupSize {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

/// Number of output elements one thread computes along each axis.
///
/// Every component is positive. Defaults to `(1, 1, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementsPerThread([u32; 3]);

impl ElementsPerThread {
    /// Creates a per-thread work factor.
    ///
    /// # Panics
    ///
    /// Panics if any component is zero.
    #[must_use]
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        assert!(x > 0 && y > 0 && z > 0, "elements per thread must be positive");
        Self([x, y, z])
    }

    /// Component along `axis`.
    #[must_use]
    pub const fn get(self, axis: Axis) -> u32 {
        self.0[axis.index()]
    }

    /// Components as `[x, y, z]`.
    #[must_use]
    pub const fn as_array(self) -> [u32; 3] {
        self.0
    }
}

impl Default for ElementsPerThread {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

/// Number of workgroups to launch along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DispatchCount([usize; 3]);

impl DispatchCount {
    /// Component along `axis`.
    #[must_use]
    pub const fn get(self, axis: Axis) -> usize {
        self.0[axis.index()]
    }

    /// Components as `[x, y, z]`.
    #[must_use]
    pub const fn as_array(self) -> [usize; 3] {
        self.0
    }

    /// `true` when some axis has no workgroups, i.e. there is nothing to launch.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0.contains(&0)
    }

    /// Total number of workgroups in the grid.
    #[must_use]
    pub fn total_workgroups(self) -> usize {
        self.0.iter().product()
    }

    /// Converts to the `u32` triple taken by `dispatch_workgroups`.
    ///
    /// # Errors
    ///
    /// [`DispatchError::DispatchTooLarge`] if an axis does not fit in `u32`.
    pub fn to_u32(self) -> Result<[u32; 3]> {
        let mut out = [0u32; 3];
        for axis in Axis::ALL {
            let count = self.get(axis);
            out[axis.index()] = u32::try_from(count)
                .map_err(|_| DispatchError::DispatchTooLarge { axis, count })?;
        }
        Ok(out)
    }
}

/// Computes how many workgroups to launch along X, Y and Z.
///
/// For each axis the packed output size (see [`DispatchLayout::axis_size`])
/// is divided by `workgroup_size * elements_per_thread` and rounded up. An
/// unused Y or Z axis gets one workgroup.
///
/// An output with a zero-extent dimension yields a zero count on that axis.
/// That is a degenerate no-op dispatch, not an error; use
/// [`compute_dispatch_checked`] to apply a [`ZeroExtentPolicy`].
///
/// A packed size that overflows `usize` saturates (see
/// [`DispatchLayout::axis_size`]), as does the per-workgroup element count,
/// so the result never under-covers. Such a count is rejected later by
/// [`DispatchCount::to_u32`]; [`compute_dispatch_checked`] reports the
/// overflow directly.
///
/// # Panics
///
/// Panics if the layout names a dimension outside `output_shape`. The layout
/// is trusted; validate it with [`DispatchLayout::validate`] where it is
/// built.
#[must_use]
pub fn compute_dispatch(
    layout: &DispatchLayout,
    output_shape: &[usize],
    workgroup_size: WorkgroupSize,
    elements_per_thread: ElementsPerThread,
) -> DispatchCount {
    let counts = Axis::ALL.map(|axis| {
        let per_workgroup = (workgroup_size.get(axis) as usize)
            .saturating_mul(elements_per_thread.get(axis) as usize);
        layout.axis_size(axis, output_shape).div_ceil(per_workgroup)
    });

    tracing::trace!(
        ?output_shape,
        workgroup_size = ?workgroup_size.as_array(),
        elements_per_thread = ?elements_per_thread.as_array(),
        dispatch = ?counts,
        "computed dispatch"
    );

    DispatchCount(counts)
}

/// [`compute_dispatch`], then applies `policy` to a zero-workgroup result.
///
/// # Errors
///
/// - [`DispatchError::AxisSizeOverflow`] if a packed output size does not
///   fit in `usize`
/// - [`DispatchError::ZeroExtent`] naming the first empty axis when `policy`
///   is [`ZeroExtentPolicy::Reject`]
pub fn compute_dispatch_checked(
    layout: &DispatchLayout,
    output_shape: &[usize],
    workgroup_size: WorkgroupSize,
    elements_per_thread: ElementsPerThread,
    policy: ZeroExtentPolicy,
) -> Result<DispatchCount> {
    for axis in Axis::ALL {
        layout.try_axis_size(axis, output_shape)?;
    }

    let count = compute_dispatch(layout, output_shape, workgroup_size, elements_per_thread);

    if policy == ZeroExtentPolicy::Reject
        && let Some(axis) = Axis::ALL.into_iter().find(|&a| count.get(a) == 0)
    {
        tracing::debug!(%axis, ?output_shape, "rejected zero-extent dispatch");
        return Err(DispatchError::ZeroExtent { axis });
    }

    Ok(count)
}

/// [`compute_dispatch_checked`] with the process-wide policy from
/// [`crate::policy::zero_extent_policy`].
///
/// # Errors
///
/// See [`compute_dispatch_checked`].
pub fn compute_dispatch_with_configured_policy(
    layout: &DispatchLayout,
    output_shape: &[usize],
    workgroup_size: WorkgroupSize,
    elements_per_thread: ElementsPerThread,
) -> Result<DispatchCount> {
    compute_dispatch_checked(
        layout,
        output_shape,
        workgroup_size,
        elements_per_thread,
        zero_extent_policy(),
    )
}
