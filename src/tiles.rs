//! Exact tile fitting.

use crate::error::{DispatchError, Result};

/// Returns whether `tile_size` partitions `shape` with no remainder tile
/// along any dimension.
///
/// A zero tile extent divides nothing and makes the result `false`.
///
/// # Errors
///
/// [`DispatchError::RankMismatch`] if the two have different ranks.
///
/// # Example
///
/// ```
/// use wgdispatch::tiles::tiles_fit_evenly;
/// assert!(tiles_fit_evenly(&[2, 3], &[4, 9]).unwrap());
/// assert!(!tiles_fit_evenly(&[2, 4], &[4, 9]).unwrap());
/// assert!(tiles_fit_evenly(&[2], &[4, 9]).is_err());
/// ```
pub fn tiles_fit_evenly(tile_size: &[usize], shape: &[usize]) -> Result<bool> {
    if tile_size.len() != shape.len() {
        return Err(DispatchError::RankMismatch {
            tile_rank: tile_size.len(),
            shape_rank: shape.len(),
        });
    }

    Ok(shape
        .iter()
        .zip(tile_size)
        .all(|(&dim, &tile)| dim.checked_rem(tile) == Some(0)))
}
