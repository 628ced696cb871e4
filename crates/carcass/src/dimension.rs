//! Derive the panel list from overall cabinet dimensions.

use tracing::debug;

use crate::config::CabinetConfig;
use crate::error::{CarcassError, Result};
use crate::piece::{Piece, PieceSet};

/// Derive the carcass pieces for `config`.
///
/// Order is `side_left, side_right, top, bottom, shelf_*, centre_*`:
///
/// - sides and centre dividers run between top and bottom:
///   `height - 2 * sheet_thickness` by `depth`
/// - top and bottom span the full `width` by `depth`
/// - every shelf spans one column:
///   `(width - sheet_thickness * (number_columns + 1)) / number_columns` by `depth`
///
/// Fails if the configuration is invalid or any derived dimension is not
/// positive (e.g. sheet thickness too large for the envelope).
pub fn dimension(config: &CabinetConfig) -> Result<PieceSet> {
    config.validate()?;

    let t = config.sheet_thickness;
    let depth = config.depth;
    let n_shelves = config.shelf_count();
    let n_centres = config.centre_count();

    let upright = config.height - 2.0 * t;
    let width_consumed_by_verticals = t * (2 + n_centres) as f64;
    let shelf_width = (config.width - width_consumed_by_verticals) / config.number_columns as f64;

    let mut pieces = Vec::with_capacity(4 + n_shelves + n_centres);
    pieces.push(Piece::new(upright, depth, "side_left", t));
    pieces.push(Piece::new(upright, depth, "side_right", t));
    pieces.push(Piece::new(config.width, depth, "top", t));
    pieces.push(Piece::new(config.width, depth, "bottom", t));
    pieces.extend((0..n_shelves).map(|i| Piece::new(shelf_width, depth, format!("shelf_{i}"), t)));
    pieces.extend((0..n_centres).map(|i| Piece::new(upright, depth, format!("centre_{i}"), t)));

    if let Some(bad) = pieces.iter().find(|p| !(p.width > 0.0 && p.height > 0.0)) {
        return Err(CarcassError::InvalidConfig(format!(
            "{} would be {} x {}; sheet_thickness {} is too large for the cabinet",
            bad.name, bad.width, bad.height, t
        )));
    }

    debug!(
        pieces = pieces.len(),
        shelves = n_shelves,
        centres = n_centres,
        shelf_width,
        "dimensioned carcass"
    );
    Ok(PieceSet::from_vec(pieces))
}
