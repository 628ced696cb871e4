//! Console cut-list report and JSON summary.

use std::io::{self, Write};

use carcass_pack::{Layout, SheetStats};
use serde::Serialize;

use crate::config::CabinetConfig;
use crate::error::Result;
use crate::piece::PieceSet;

/// Reference full sheet used for the board estimate (mm).
pub const FULL_SHEET_WIDTH: f64 = 2440.0;
/// Reference full sheet used for the board estimate (mm).
pub const FULL_SHEET_HEIGHT: f64 = 1220.0;

/// Rough number of full 2440 x 1220 boards covering `total_area`.
///
/// Ignores the configured stock and the kerf; it is a material estimate only.
pub fn board_estimate(total_area: f64) -> f64 {
    total_area / (FULL_SHEET_WIDTH * FULL_SHEET_HEIGHT)
}

/// Format with `decimals` places and comma thousands separators.
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if value.is_sign_negative() && value != 0.0 {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// Piece list, cumulative area and board estimate.
pub fn write_piece_summary(out: &mut impl Write, pieces: &PieceSet) -> io::Result<()> {
    writeln!(out, "Require a total of {} pieces:", pieces.len())?;
    for piece in pieces {
        writeln!(out, "{piece}")?;
    }
    let total = pieces.total_area();
    writeln!(out, "Total area: {} mm²", group_thousands(total, 2))?;
    writeln!(
        out,
        "Estimate of total boards required: {} ({} x {})",
        group_thousands(board_estimate(total), 2),
        FULL_SHEET_WIDTH,
        FULL_SHEET_HEIGHT
    )?;
    Ok(())
}

/// Every placement, then per-sheet usage.
pub fn write_layout(out: &mut impl Write, layout: &Layout) -> io::Result<()> {
    writeln!(out, "Total packed rectangles: {}", layout.len())?;
    for p in layout.placements() {
        writeln!(
            out,
            "Bin: {}, x: {}, y: {}, w: {}, h: {}, id: {}{}",
            p.bin_index,
            p.x,
            p.y,
            p.width,
            p.height,
            p.id,
            if p.rotated { " (rotated)" } else { "" }
        )?;
    }

    let stats = layout.sheet_stats();
    writeln!(
        out,
        "Sheets used: {} of {}",
        stats.len(),
        layout.bins().len()
    )?;
    for s in &stats {
        writeln!(
            out,
            "  Board {}: {} x {}, {} pieces, {:.1}% used",
            s.bin_index + 1,
            s.bin.width,
            s.bin.height,
            s.piece_count,
            s.utilization * 100.0
        )?;
    }
    Ok(())
}

/// Machine-readable summary of one planning run.
#[derive(Debug, Serialize)]
pub struct CutList<'a> {
    /// Configuration the run used.
    pub config: &'a CabinetConfig,
    /// Pieces in generation order.
    pub pieces: &'a PieceSet,
    /// Sum of piece face areas (mm²).
    pub total_area: f64,
    /// Full-board estimate, see [`board_estimate`].
    pub board_estimate: f64,
    /// Validated layout.
    pub layout: &'a Layout,
    /// Usage of every sheet that received a piece.
    pub sheets: Vec<SheetStats>,
}

impl<'a> CutList<'a> {
    /// Collect the summary.
    pub fn new(config: &'a CabinetConfig, pieces: &'a PieceSet, layout: &'a Layout) -> Self {
        let total_area = pieces.total_area();
        Self {
            config,
            pieces,
            total_area,
            board_estimate: board_estimate(total_area),
            layout,
            sheets: layout.sheet_stats(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
