//! Mapping of tensor dimensions onto the three dispatch axes.
//!
//! A [`DispatchLayout`] says which dimensions of an output shape are packed
//! onto each of the X, Y and Z axes a compute shader is launched along. X is
//! mandatory; Y and Z are optional and collapse to extent 1 when absent.
//!
//! Layouts are trusted by the geometry functions in [`crate::dispatch`] and
//! [`crate::heuristics`]. Check them once, where they are built, with
//! [`DispatchLayout::validate`].
//!
//! # Example
//!
//! ```rust
//! use wgdispatch::layout::{Axis, DispatchLayout};
//!
//! // NHWC output: batch and rows on X, columns on Y, channels on Z.
//! let layout = DispatchLayout::new([0, 1]).with_y([2]).with_z([3]);
//! layout.validate(4).unwrap();
//! assert_eq!(layout.axis_size(Axis::X, &[2, 3, 5, 7]), 6);
//! ```

use crate::error::{DispatchError, Result};

/// One of the three dispatch axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Axis {
    /// First axis, always present.
    X = 0,
    /// Second axis.
    Y = 1,
    /// Third axis.
    Z = 2,
}

impl Axis {
    /// All axes in dispatch order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Position of this axis in a `[x, y, z]` triple.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl core::fmt::Display for Axis {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        })
    }
}

/// Assignment of output dimensions to dispatch axes.
///
/// Each entry is a 0-based index into the output shape. A dimension should
/// appear under at most one axis; this is only checked by
/// [`DispatchLayout::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DispatchLayout {
    /// Dimensions packed onto X.
    pub x: Vec<usize>,
    /// Dimensions packed onto Y, if the axis is used.
    pub y: Option<Vec<usize>>,
    /// Dimensions packed onto Z, if the axis is used.
    pub z: Option<Vec<usize>>,
}

impl DispatchLayout {
    /// Creates a layout that uses only the X axis.
    pub fn new(x: impl Into<Vec<usize>>) -> Self {
        Self {
            x: x.into(),
            y: None,
            z: None,
        }
    }

    /// Puts every dimension of a rank `rank` shape on X.
    #[must_use]
    pub fn flat(rank: usize) -> Self {
        Self::new((0..rank).collect::<Vec<_>>())
    }

    /// Assigns dimensions to Y.
    #[must_use]
    pub fn with_y(mut self, dims: impl Into<Vec<usize>>) -> Self {
        self.y = Some(dims.into());
        self
    }

    /// Assigns dimensions to Z.
    #[must_use]
    pub fn with_z(mut self, dims: impl Into<Vec<usize>>) -> Self {
        self.z = Some(dims.into());
        self
    }

    /// Dimensions assigned to `axis`, or `None` when the axis is unused.
    #[must_use]
    pub fn axis(&self, axis: Axis) -> Option<&[usize]> {
        match axis {
            Axis::X => Some(&self.x),
            Axis::Y => self.y.as_deref(),
            Axis::Z => self.z.as_deref(),
        }
    }

    /// Number of output elements packed onto `axis`.
    ///
    /// This is the product of the extents of the assigned dimensions. An
    /// unused axis, like an empty grouping, has size 1.
    ///
    /// A product that overflows `usize` saturates to `usize::MAX`, so the
    /// size is never understated. Use [`DispatchLayout::try_axis_size`] to
    /// detect the overflow instead.
    ///
    /// # Panics
    ///
    /// Panics if a dimension index is out of range for `output_shape`.
    /// Use [`DispatchLayout::validate`] to rule that out up front.
    #[must_use]
    pub fn axis_size(&self, axis: Axis, output_shape: &[usize]) -> usize {
        self.try_axis_size(axis, output_shape).unwrap_or(usize::MAX)
    }

    /// [`DispatchLayout::axis_size`], reporting overflow instead of saturating.
    ///
    /// A zero extent anywhere in the grouping makes the size 0, even when
    /// the other extents alone would overflow.
    ///
    /// # Errors
    ///
    /// [`DispatchError::AxisSizeOverflow`] if the product does not fit in `usize`.
    ///
    /// # Panics
    ///
    /// Panics if a dimension index is out of range for `output_shape`.
    pub fn try_axis_size(&self, axis: Axis, output_shape: &[usize]) -> Result<usize> {
        let Some(dims) = self.axis(axis) else {
            return Ok(1);
        };
        let mut extents = dims.iter().map(|&d| output_shape[d]);
        if extents.clone().any(|extent| extent == 0) {
            return Ok(0);
        }
        extents
            .try_fold(1usize, usize::checked_mul)
            .ok_or(DispatchError::AxisSizeOverflow { axis })
    }

    /// Checks the layout against an output shape of rank `rank`.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::EmptyAxis`] if X, or a present Y or Z, lists nothing
    /// - [`DispatchError::DimensionOutOfRange`] if an index is `>= rank`
    /// - [`DispatchError::DuplicateDimension`] if an index is used twice
    pub fn validate(&self, rank: usize) -> Result<()> {
        let mut seen = vec![false; rank];

        for axis in Axis::ALL {
            let Some(dims) = self.axis(axis) else {
                continue;
            };
            if dims.is_empty() {
                return Err(DispatchError::EmptyAxis { axis });
            }
            for &dim in dims {
                let slot = seen
                    .get_mut(dim)
                    .ok_or(DispatchError::DimensionOutOfRange { dim, rank })?;
                if *slot {
                    return Err(DispatchError::DuplicateDimension { dim });
                }
                *slot = true;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_layout_puts_everything_on_x() {
        let layout = DispatchLayout::flat(3);
        assert_eq!(layout.x, vec![0, 1, 2]);
        assert_eq!(layout.axis(Axis::Y), None);
        assert_eq!(layout.axis_size(Axis::X, &[2, 3, 4]), 24);
        assert_eq!(layout.axis_size(Axis::Z, &[2, 3, 4]), 1);
    }

    #[test]
    fn oversized_axis_saturates_or_reports() {
        let layout = DispatchLayout::new([0, 1]).with_y([2, 0, 1]);
        let shape = [usize::MAX / 2, 3, 0];
        assert_eq!(layout.axis_size(Axis::X, &shape), usize::MAX);
        assert!(matches!(
            layout.try_axis_size(Axis::X, &shape),
            Err(DispatchError::AxisSizeOverflow { axis: Axis::X })
        ));
        // the zero extent wins over the overflowing pair
        assert_eq!(layout.try_axis_size(Axis::Y, &shape).unwrap(), 0);
    }

    #[test]
    fn validate_reports_each_problem() {
        assert!(matches!(
            DispatchLayout::new(Vec::new()).validate(2),
            Err(DispatchError::EmptyAxis { axis: Axis::X })
        ));
        assert!(matches!(
            DispatchLayout::new([0]).with_z(Vec::new()).validate(2),
            Err(DispatchError::EmptyAxis { axis: Axis::Z })
        ));
        assert!(matches!(
            DispatchLayout::new([0, 2]).validate(2),
            Err(DispatchError::DimensionOutOfRange { dim: 2, rank: 2 })
        ));
        assert!(matches!(
            DispatchLayout::new([0]).with_y([1, 0]).validate(2),
            Err(DispatchError::DuplicateDimension { dim: 0 })
        ));
        assert!(DispatchLayout::new([1]).with_y([0]).validate(2).is_ok());
    }

    #[test]
    fn axis_display() {
        assert_eq!(Axis::Y.to_string(), "y");
        assert_eq!(Axis::Z.index(), 2);
    }
}
