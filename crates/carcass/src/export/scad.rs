//! OpenSCAD sketch of the assembled carcass.
//!
//! Built from the piece list alone, not from the sheet layout. Pieces are
//! positioned by name: sides flush with the left/right face, top and bottom
//! flush with the top/bottom face. Shelves and centre dividers all share one
//! fixed placeholder position, so the output is a rough sketch rather than a
//! faithful assembly, and nothing checks the boxes for collisions.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::piece::{Piece, PieceSet};

/// Placeholder height of every shelf (mm).
pub const SHELF_PLACEHOLDER_Y: f64 = 200.0;
/// Placeholder X of every centre divider (mm).
pub const CENTRE_PLACEHOLDER_X: f64 = 200.0;

/// Where and how large one box is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cube {
    x: f64,
    y: f64,
    z: f64,
    w: f64,
    h: f64,
    d: f64,
}

fn cube_for(piece: &Piece, width: f64, height: f64) -> Option<Cube> {
    let t = piece.thickness;
    let name = piece.name.as_str();
    if name.contains("side") {
        // Vertical extent is the piece's second dimension (its depth).
        let x = if name.contains("left") { 0.0 } else { width - t };
        Some(Cube {
            x,
            y: 0.0,
            z: 0.0,
            w: t,
            h: piece.height,
            d: t,
        })
    } else if name.contains("top") || name.contains("bottom") {
        let y = if name.contains("bottom") { 0.0 } else { height - t };
        Some(Cube {
            x: 0.0,
            y,
            z: 0.0,
            w: width,
            h: t,
            d: t,
        })
    } else if name.contains("shelf") {
        Some(Cube {
            x: 0.0,
            y: SHELF_PLACEHOLDER_Y,
            z: 0.0,
            w: piece.width,
            h: t,
            d: t,
        })
    } else if name.contains("centre") {
        Some(Cube {
            x: CENTRE_PLACEHOLDER_X,
            y: 0.0,
            z: 0.0,
            w: t,
            h: height,
            d: t,
        })
    } else {
        None
    }
}

/// OpenSCAD source: one `translate + cube` per recognised piece inside a `union()`.
///
/// `width` and `height` are the cabinet's outer dimensions. Pieces whose
/// names match no rule are skipped.
pub fn openscad_source(pieces: &PieceSet, width: f64, height: f64) -> String {
    let mut code = String::from("union() {\n");
    for piece in pieces {
        if let Some(c) = cube_for(piece, width, height) {
            code.push_str(&format!(
                "    // {}\n    translate([{}, {}, {}]) cube([{}, {}, {}]);\n",
                piece.name, c.x, c.y, c.z, c.w, c.d, c.h
            ));
        }
    }
    code.push_str("}\n");
    code
}

/// Write the sketch to `path`, replacing any existing file.
pub fn write_openscad(
    pieces: &PieceSet,
    width: f64,
    height: f64,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, openscad_source(pieces, width, height))?;
    info!(path = %path.display(), "wrote OpenSCAD sketch");
    Ok(())
}
