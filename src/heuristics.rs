//! Workgroup size and per-thread work heuristics.
//!
//! Two kernel families get tuned launch shapes: convolution and matrix
//! multiplication. The numbers are empirical, not derived from a model, so
//! they live in ordered policy tables. The first rule whose predicate
//! matches wins; the last rule always matches. Retuning means editing a
//! table, not chasing branches.
//!
//! # Convolution
//!
//! The output is packed onto X and Y (see [`conv_dims`]). When one packed
//! axis is very small (at most 4), giving it a large workgroup or work
//! factor leaves most lanes on out-of-range threads and reduces hardware
//! parallelism, so the *other* axis gets the larger values. Too small an
//! axis also under-uses shared memory; the table is the balance found so
//! far.
//!
//! | rule            | workgroup size | elements per thread |
//! |-----------------|----------------|---------------------|
//! | `dim0 <= 4`     | `(4, 16, 1)`   | `(1, 2, 1)`         |
//! | `dim1 <= 4`     | `(16, 4, 1)`   | `(2, 1, 1)`         |
//! | otherwise       | `(16, 16, 1)`  | `(2, 2, 1)`         |
//!
//! # Matrix multiplication
//!
//! | rule                   | workgroup size |
//! |------------------------|----------------|
//! | one output row         | `(32, 1, 1)`   |
//! | one output column      | `(1, 32, 1)`   |
//! | otherwise              | `(8, 8, 1)`    |
//!
//! The general case is kept at `(8, 8, 1)` so a tiled kernel stays inside
//! the [`MATMUL_SHARED_MEMORY_BUDGET`]. The budget is not checked here.

use crate::dispatch::{ElementsPerThread, WorkgroupSize};
use crate::layout::{Axis, DispatchLayout};

/// Threshold at or below which a packed convolution axis counts as small.
pub const SMALL_CONV_AXIS: usize = 4;

/// Per-workgroup shared memory, in bytes, the matmul sizes are chosen for.
pub const MATMUL_SHARED_MEMORY_BUDGET: usize = 16 * 1024;

/// One row of the convolution policy table.
#[derive(Debug, Clone, Copy)]
pub struct ConvRule {
    /// Decides whether this rule applies to `(dim0, dim1)`.
    pub applies: fn(usize, usize) -> bool,
    /// Workgroup size chosen by the rule.
    pub workgroup_size: WorkgroupSize,
    /// Elements per thread chosen by the rule.
    pub elements_per_thread: ElementsPerThread,
}

/// Convolution launch policy, evaluated top to bottom.
pub static CONV_POLICY: [ConvRule; 3] = [
    ConvRule {
        applies: |dim0, _| dim0 <= SMALL_CONV_AXIS,
        workgroup_size: WorkgroupSize::new(4, 16, 1),
        elements_per_thread: ElementsPerThread::new(1, 2, 1),
    },
    ConvRule {
        applies: |_, dim1| dim1 <= SMALL_CONV_AXIS,
        workgroup_size: WorkgroupSize::new(16, 4, 1),
        elements_per_thread: ElementsPerThread::new(2, 1, 1),
    },
    ConvRule {
        applies: |_, _| true,
        workgroup_size: WorkgroupSize::new(16, 16, 1),
        elements_per_thread: ElementsPerThread::new(2, 2, 1),
    },
];

/// One row of the matmul policy table.
#[derive(Debug, Clone, Copy)]
pub struct MatMulRule {
    /// Decides whether this rule applies to `(outer_rows, inner, outer_cols)`.
    pub applies: fn(usize, usize, usize) -> bool,
    /// Workgroup size chosen by the rule.
    pub workgroup_size: WorkgroupSize,
}

/// Matmul launch policy, evaluated top to bottom.
pub static MATMUL_POLICY: [MatMulRule; 3] = [
    MatMulRule {
        applies: |rows, _, _| rows == 1,
        workgroup_size: WorkgroupSize::new(32, 1, 1),
    },
    MatMulRule {
        applies: |_, _, cols| cols == 1,
        workgroup_size: WorkgroupSize::new(1, 32, 1),
    },
    MatMulRule {
        applies: |_, _, _| true,
        workgroup_size: WorkgroupSize::new(8, 8, 1),
    },
];

fn conv_rule(dim0: usize, dim1: usize) -> &'static ConvRule {
    let rule = CONV_POLICY
        .iter()
        .find(|rule| (rule.applies)(dim0, dim1))
        .unwrap_or(&CONV_POLICY[CONV_POLICY.len() - 1]);
    tracing::trace!(
        dim0,
        dim1,
        workgroup_size = ?rule.workgroup_size.as_array(),
        elements_per_thread = ?rule.elements_per_thread.as_array(),
        "selected conv launch shape"
    );
    rule
}

/// Workgroup size for a convolution whose output packs `dim0` elements on X
/// and `dim1` on Y.
#[must_use]
pub fn select_workgroup_size_for_conv(dim0: usize, dim1: usize) -> WorkgroupSize {
    conv_rule(dim0, dim1).workgroup_size
}

/// Elements per thread for a convolution, consistent with
/// [`select_workgroup_size_for_conv`] for the same `dim0` and `dim1`.
#[must_use]
pub fn select_elements_per_thread_for_conv(dim0: usize, dim1: usize) -> ElementsPerThread {
    conv_rule(dim0, dim1).elements_per_thread
}

/// Both convolution launch parameters from a single table lookup.
#[must_use]
pub fn select_conv_config(dim0: usize, dim1: usize) -> (WorkgroupSize, ElementsPerThread) {
    let rule = conv_rule(dim0, dim1);
    (rule.workgroup_size, rule.elements_per_thread)
}

/// The `(dim0, dim1)` magnitudes the convolution heuristics are keyed on:
/// the packed output sizes along X and Y.
///
/// The layout must assign Y. A missing Y grouping is a caller contract
/// violation and is not reported; it is read as size 1.
///
/// # Panics
///
/// Panics if the layout names a dimension outside `output_shape`.
#[must_use]
pub fn conv_dims(layout: &DispatchLayout, output_shape: &[usize]) -> (usize, usize) {
    (
        layout.axis_size(Axis::X, output_shape),
        layout.axis_size(Axis::Y, output_shape),
    )
}

/// [`select_workgroup_size_for_conv`] keyed off a layout and output shape.
///
/// # Panics
///
/// See [`conv_dims`].
#[must_use]
pub fn compute_workgroup_size_for_conv(
    layout: &DispatchLayout,
    output_shape: &[usize],
) -> WorkgroupSize {
    let (dim0, dim1) = conv_dims(layout, output_shape);
    select_workgroup_size_for_conv(dim0, dim1)
}

/// [`select_elements_per_thread_for_conv`] keyed off a layout and output shape.
///
/// # Panics
///
/// See [`conv_dims`].
#[must_use]
pub fn compute_elements_per_thread_for_conv(
    layout: &DispatchLayout,
    output_shape: &[usize],
) -> ElementsPerThread {
    let (dim0, dim1) = conv_dims(layout, output_shape);
    select_elements_per_thread_for_conv(dim0, dim1)
}

/// Workgroup size for a `(outer_row_count x inner_dim) * (inner_dim x outer_col_count)`
/// matrix product.
///
/// A single output row spreads 32 threads along the columns; a single output
/// column spreads them along the rows.
///
/// `inner_dim` is accepted but does not affect the choice. It is kept in the
/// signature so tuning on the reduction length can be added without
/// touching call sites.
#[must_use]
pub fn select_workgroup_size_for_matmul(
    outer_row_count: usize,
    inner_dim: usize,
    outer_col_count: usize,
) -> WorkgroupSize {
    let rule = MATMUL_POLICY
        .iter()
        .find(|rule| (rule.applies)(outer_row_count, inner_dim, outer_col_count))
        .unwrap_or(&MATMUL_POLICY[MATMUL_POLICY.len() - 1]);
    tracing::trace!(
        outer_row_count,
        inner_dim,
        outer_col_count,
        workgroup_size = ?rule.workgroup_size.as_array(),
        "selected matmul workgroup size"
    );
    rule.workgroup_size
}
