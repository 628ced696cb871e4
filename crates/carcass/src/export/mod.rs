//! Export of sheet diagrams and the assembly sketch.
//!
//! - [`svg`]: one diagram per used sheet, for viewing
//! - [`dxf`]: one DXF R12 drawing per used sheet, for CNC and laser services
//! - [`scad`]: OpenSCAD sketch of the assembled carcass

pub mod dxf;
pub mod scad;
pub mod svg;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use carcass_pack::Layout;
use tracing::info;

use crate::error::Result;

/// Qualitative palette (matplotlib "tab20"), cycled per piece on a sheet.
pub const PALETTE: [&str; 20] = [
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728", "#ff9896",
    "#9467bd", "#c5b0d5", "#8c564b", "#c49c94", "#e377c2", "#f7b6d2", "#7f7f7f", "#c7c7c7",
    "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

/// One labelled rectangle on a sheet drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    /// Lower-left X on the sheet (mm).
    pub x: f64,
    /// Lower-left Y on the sheet (mm).
    pub y: f64,
    /// Extent along X, kerf included (mm).
    pub width: f64,
    /// Extent along Y, kerf included (mm).
    pub height: f64,
    /// Piece name.
    pub label: String,
    /// Fill colour, `#rrggbb`.
    pub colour: &'static str,
}

/// Everything a renderer needs to draw one sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetDrawing {
    /// Catalog index of the sheet.
    pub bin_index: usize,
    /// Sheet extent along X (mm).
    pub width: f64,
    /// Sheet extent along Y (mm).
    pub height: f64,
    /// Caption.
    pub title: String,
    /// Placed pieces.
    pub panels: Vec<Panel>,
}

impl SheetDrawing {
    /// File stem used for this sheet, 1-based like the caption.
    pub fn file_stem(&self) -> String {
        format!("sheet_{}", self.bin_index + 1)
    }
}

/// One drawing per sheet that received at least one placement.
pub fn sheet_drawings(layout: &Layout) -> Vec<SheetDrawing> {
    layout
        .sheets_used()
        .into_iter()
        .map(|bin_index| {
            let bin = layout.bins()[bin_index];
            let panels = layout
                .placements_on(bin_index)
                .enumerate()
                .map(|(j, p)| Panel {
                    x: p.x,
                    y: p.y,
                    width: p.width,
                    height: p.height,
                    label: p.id.clone(),
                    colour: PALETTE[j % PALETTE.len()],
                })
                .collect();
            SheetDrawing {
                bin_index,
                width: bin.width,
                height: bin.height,
                title: format!("Visualization of Shelf Cuts on Board {}", bin_index + 1),
                panels,
            }
        })
        .collect()
}

/// A sink that turns a [`SheetDrawing`] into a file format.
pub trait SheetRenderer {
    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    /// Write one sheet.
    fn render(&self, sheet: &SheetDrawing, out: &mut dyn Write) -> io::Result<()>;
}

/// Render every used sheet of `layout` into `dir` as `sheet_N.<ext>`.
///
/// Existing files are overwritten. Returns the written paths in sheet order.
pub fn write_sheets(
    layout: &Layout,
    renderer: &dyn SheetRenderer,
    dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for sheet in sheet_drawings(layout) {
        let path = dir.join(format!("{}.{}", sheet.file_stem(), renderer.extension()));
        let mut file = io::BufWriter::new(fs::File::create(&path)?);
        renderer.render(&sheet, &mut file)?;
        file.flush()?;
        info!(path = %path.display(), pieces = sheet.panels.len(), "wrote sheet");
        written.push(path);
    }
    Ok(written)
}
