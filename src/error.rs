//! Error type shared by every fallible operation in the crate.
//!
//! All failures are synchronous and fatal to the call that produced them:
//! there is no partial result and nothing to retry. Callers are expected to
//! treat them as programming errors surfaced before any GPU work is
//! submitted.

use crate::layout::Axis;

/// Convenience alias used throughout the crate.
pub type Result<T, E = DispatchError> = core::result::Result<T, E>;

/// Everything that can go wrong while computing dispatch geometry or
/// decoding element buffers.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// A tile and a shape of different rank were compared.
    #[error(
        "cannot compute whether rank {tile_rank} tiles fit evenly into rank {shape_rank} shape - ranks must match"
    )]
    RankMismatch {
        /// Rank of the tile.
        tile_rank: usize,
        /// Rank of the shape.
        shape_rank: usize,
    },

    /// An element type tag outside the supported enumeration.
    #[error("unknown element type `{0}`")]
    UnknownElementType(String),

    /// A raw buffer whose length is not a whole number of elements.
    #[error("buffer of {len} bytes is not a multiple of the {width}-byte element width")]
    BufferLength {
        /// Length of the buffer in bytes.
        len: usize,
        /// Width of one element in bytes.
        width: usize,
    },

    /// A dispatch collapsed to zero workgroups under [`ZeroExtentPolicy::Reject`].
    ///
    /// [`ZeroExtentPolicy::Reject`]: crate::policy::ZeroExtentPolicy::Reject
    #[error("output has zero extent along dispatch axis {axis}")]
    ZeroExtent {
        /// The first axis found with a zero workgroup count.
        axis: Axis,
    },

    /// A workgroup count does not fit in the `u32` GPU APIs take.
    #[error("{count} workgroups along axis {axis} exceeds u32::MAX")]
    DispatchTooLarge {
        /// Offending axis.
        axis: Axis,
        /// The count that overflowed.
        count: usize,
    },

    /// The packed output size along an axis does not fit in `usize`.
    #[error("packed output size along dispatch axis {axis} overflows usize")]
    AxisSizeOverflow {
        /// Offending axis.
        axis: Axis,
    },

    /// A mandatory axis, or a present optional one, lists no dimensions.
    #[error("dispatch axis {axis} has no dimensions assigned")]
    EmptyAxis {
        /// The empty axis.
        axis: Axis,
    },

    /// A layout refers to a dimension the output shape does not have.
    #[error("dimension {dim} is out of range for a rank {rank} shape")]
    DimensionOutOfRange {
        /// The offending dimension index.
        dim: usize,
        /// Rank of the output shape.
        rank: usize,
    },

    /// A dimension was assigned to more than one axis, or twice to one.
    #[error("dimension {dim} is assigned more than once")]
    DuplicateDimension {
        /// The repeated dimension index.
        dim: usize,
    },

    /// Failure from the GPU glue layer.
    #[cfg(feature = "wgpu")]
    #[error(transparent)]
    Gpu(#[from] crate::gpu::GpuError),
}
