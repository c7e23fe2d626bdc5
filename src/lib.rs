//! # `wgdispatch`
//!
//! Dispatch geometry for compute shaders that implement tensor operations.
//!
//! Given an output shape, a mapping of its dimensions onto the X, Y and Z
//! dispatch axes, a workgroup size and a per-thread work factor, this crate
//! derives how many workgroups to launch. Launching too few silently drops
//! output elements; launching too many wastes threads. Counts are always
//! rounded up and never by more than needed.
//!
//! ## Features
//!
//! - **Geometry**: [`compute_dispatch`] and a policy-checked variant for
//!   zero-extent outputs
//! - **Heuristics**: tuned workgroup sizes and per-thread work for
//!   convolution and matrix multiplication, kept as policy tables
//! - **Tiling**: [`tiles_fit_evenly`] for exact tile partitioning
//! - **Element codec**: byte widths and typed views over raw GPU buffers
//! - **GPU glue** *(feature `wgpu`)*: support check, pipeline layout pair,
//!   recording a dispatch into a compute pass
//!
//! ## Example
//!
//! ```rust
//! use wgdispatch::{compute_dispatch, DispatchLayout};
//! use wgdispatch::heuristics::{compute_workgroup_size_for_conv, compute_elements_per_thread_for_conv};
//!
//! let shape = [1, 30, 30, 64];
//! let layout = DispatchLayout::new([0, 1, 2]).with_y([3]);
//! let size = compute_workgroup_size_for_conv(&layout, &shape);
//! let work = compute_elements_per_thread_for_conv(&layout, &shape);
//! let count = compute_dispatch(&layout, &shape, size, work);
//! assert_eq!(count.as_array(), [29, 2, 1]);
//! ```
//!
//! Every operation is a pure function of its inputs and is safe to call
//! from any thread.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]
#![deny(unsafe_code)]
#![forbid(missing_docs)]

pub mod dispatch;
pub mod element;
pub mod error;
#[cfg(feature = "wgpu")]
pub mod gpu;
pub mod heuristics;
pub mod layout;
pub mod policy;
pub mod tiles;

pub use dispatch::{DispatchCount, ElementsPerThread, WorkgroupSize, compute_dispatch};
pub use element::{ElementType, TypedView, byte_width, reinterpret_buffer};
pub use error::{DispatchError, Result};
pub use layout::{Axis, DispatchLayout};
pub use tiles::tiles_fit_evenly;
