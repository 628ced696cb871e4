//! DXF export of sheet layouts.
//!
//! Writes one cutting drawing per stock sheet in DXF R12 (millimeters):
//! - Sheet outline (layer "SHEET")
//! - Panel outlines, kerf included (layer "CUT")
//! - Panel names centred on each panel (layer "LABEL")

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{SheetDrawing, SheetRenderer};

/// Layer holding the stock sheet outline.
pub const LAYER_SHEET: &str = "SHEET";
/// Layer holding panel outlines.
pub const LAYER_CUT: &str = "CUT";
/// Layer holding panel names.
pub const LAYER_LABEL: &str = "LABEL";

/// A 2D point for DXF export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point2D {
    /// Create a new 2D point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A 2D entity for DXF export.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape2D {
    /// Axis-aligned rectangle outline.
    Rectangle {
        /// Lower-left corner.
        origin: Point2D,
        /// Extent along X.
        width: f64,
        /// Extent along Y.
        height: f64,
        /// DXF layer name.
        layer: &'static str,
    },
    /// Single-line text, centred on `center`.
    Text {
        /// Alignment point.
        center: Point2D,
        /// Character height.
        height: f64,
        /// The text itself.
        value: String,
        /// DXF layer name.
        layer: &'static str,
    },
}

/// DXF document builder.
///
/// Accumulates outlines and labels and exports them as DXF R12.
#[derive(Debug, Clone, Default)]
pub struct DxfDocument {
    shapes: Vec<Shape2D>,
}

impl DxfDocument {
    /// Create a new empty DXF document.
    pub fn new() -> Self {
        Self { shapes: Vec::new() }
    }

    /// Add a rectangle outline by its lower-left corner.
    pub fn add_rectangle(&mut self, x: f64, y: f64, width: f64, height: f64, layer: &'static str) {
        self.shapes.push(Shape2D::Rectangle {
            origin: Point2D::new(x, y),
            width,
            height,
            layer,
        });
    }

    /// Add a centred text label on the LABEL layer.
    pub fn add_label(&mut self, cx: f64, cy: f64, height: f64, value: impl Into<String>) {
        self.shapes.push(Shape2D::Text {
            center: Point2D::new(cx, cy),
            height,
            value: value.into(),
            layer: LAYER_LABEL,
        });
    }

    /// Number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the document is empty.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Build the cutting drawing for one sheet.
    pub fn from_sheet(sheet: &SheetDrawing, label_height: f64) -> Self {
        let mut doc = Self::new();
        doc.add_rectangle(0.0, 0.0, sheet.width, sheet.height, LAYER_SHEET);
        for panel in &sheet.panels {
            doc.add_rectangle(panel.x, panel.y, panel.width, panel.height, LAYER_CUT);
            // Keep labels inside thin strips.
            let h = label_height.min(panel.height * 0.5);
            doc.add_label(
                panel.x + panel.width / 2.0,
                panel.y + panel.height / 2.0,
                h,
                panel.label.clone(),
            );
        }
        doc
    }

    /// Export to DXF file
    pub fn export(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.export_to_writer(&mut writer)?;
        writer.flush()
    }

    /// Export to any writer.
    pub fn export_to_writer(&self, writer: &mut impl Write) -> std::io::Result<()> {
        self.write_header(writer)?;
        self.write_tables(writer)?;

        // Entities section
        writeln!(writer, "0")?;
        writeln!(writer, "SECTION")?;
        writeln!(writer, "2")?;
        writeln!(writer, "ENTITIES")?;

        for shape in &self.shapes {
            match shape {
                Shape2D::Rectangle {
                    origin,
                    width,
                    height,
                    layer,
                } => {
                    self.write_rectangle(writer, origin, *width, *height, layer)?;
                }
                Shape2D::Text {
                    center,
                    height,
                    value,
                    layer,
                } => {
                    self.write_text(writer, center, *height, value, layer)?;
                }
            }
        }

        writeln!(writer, "0")?;
        writeln!(writer, "ENDSEC")?;

        // End of file
        writeln!(writer, "0")?;
        writeln!(writer, "EOF")?;

        Ok(())
    }

    fn write_header(&self, writer: &mut impl Write) -> std::io::Result<()> {
        writeln!(writer, "0")?;
        writeln!(writer, "SECTION")?;
        writeln!(writer, "2")?;
        writeln!(writer, "HEADER")?;
        writeln!(writer, "9")?;
        writeln!(writer, "$ACADVER")?;
        writeln!(writer, "1")?;
        writeln!(writer, "AC1009")?; // DXF R12
        writeln!(writer, "9")?;
        writeln!(writer, "$INSUNITS")?;
        writeln!(writer, "70")?;
        writeln!(writer, "4")?; // Millimeters
        writeln!(writer, "0")?;
        writeln!(writer, "ENDSEC")?;
        Ok(())
    }

    fn write_tables(&self, writer: &mut impl Write) -> std::io::Result<()> {
        writeln!(writer, "0")?;
        writeln!(writer, "SECTION")?;
        writeln!(writer, "2")?;
        writeln!(writer, "TABLES")?;

        writeln!(writer, "0")?;
        writeln!(writer, "TABLE")?;
        writeln!(writer, "2")?;
        writeln!(writer, "LAYER")?;
        writeln!(writer, "70")?;
        writeln!(writer, "3")?; // 3 layers

        // color 8 = gray, 7 = white/black, 3 = green
        for (name, color) in [(LAYER_SHEET, 8), (LAYER_CUT, 7), (LAYER_LABEL, 3)] {
            writeln!(writer, "0")?;
            writeln!(writer, "LAYER")?;
            writeln!(writer, "2")?;
            writeln!(writer, "{}", name)?;
            writeln!(writer, "70")?;
            writeln!(writer, "0")?;
            writeln!(writer, "62")?;
            writeln!(writer, "{}", color)?;
            writeln!(writer, "6")?;
            writeln!(writer, "CONTINUOUS")?;
        }

        writeln!(writer, "0")?;
        writeln!(writer, "ENDTAB")?;
        writeln!(writer, "0")?;
        writeln!(writer, "ENDSEC")?;
        Ok(())
    }

    fn write_rectangle(
        &self,
        writer: &mut impl Write,
        origin: &Point2D,
        width: f64,
        height: f64,
        layer: &str,
    ) -> std::io::Result<()> {
        let x1 = origin.x;
        let y1 = origin.y;
        let x2 = origin.x + width;
        let y2 = origin.y + height;

        // LWPOLYLINE (lightweight polyline)
        writeln!(writer, "0")?;
        writeln!(writer, "LWPOLYLINE")?;
        writeln!(writer, "8")?;
        writeln!(writer, "{}", layer)?;
        writeln!(writer, "90")?;
        writeln!(writer, "4")?; // 4 vertices
        writeln!(writer, "70")?;
        writeln!(writer, "1")?; // Closed polyline

        for (x, y) in [(x1, y1), (x2, y1), (x2, y2), (x1, y2)] {
            writeln!(writer, "10")?;
            writeln!(writer, "{:.6}", x)?;
            writeln!(writer, "20")?;
            writeln!(writer, "{:.6}", y)?;
        }

        Ok(())
    }

    fn write_text(
        &self,
        writer: &mut impl Write,
        center: &Point2D,
        height: f64,
        value: &str,
        layer: &str,
    ) -> std::io::Result<()> {
        writeln!(writer, "0")?;
        writeln!(writer, "TEXT")?;
        writeln!(writer, "8")?;
        writeln!(writer, "{}", layer)?;
        writeln!(writer, "10")?;
        writeln!(writer, "{:.6}", center.x)?;
        writeln!(writer, "20")?;
        writeln!(writer, "{:.6}", center.y)?;
        writeln!(writer, "30")?;
        writeln!(writer, "0.0")?;
        writeln!(writer, "40")?;
        writeln!(writer, "{:.6}", height)?;
        writeln!(writer, "1")?;
        writeln!(writer, "{}", value)?;
        writeln!(writer, "72")?;
        writeln!(writer, "1")?; // Horizontal: center
        writeln!(writer, "11")?;
        writeln!(writer, "{:.6}", center.x)?;
        writeln!(writer, "21")?;
        writeln!(writer, "{:.6}", center.y)?;
        writeln!(writer, "31")?;
        writeln!(writer, "0.0")?;
        writeln!(writer, "73")?;
        writeln!(writer, "2")?; // Vertical: middle

        Ok(())
    }
}

/// Renders sheets as DXF cutting drawings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DxfRenderer {
    /// Label character height (mm).
    pub label_height: f64,
}

impl Default for DxfRenderer {
    fn default() -> Self {
        Self { label_height: 20.0 }
    }
}

impl SheetRenderer for DxfRenderer {
    fn extension(&self) -> &'static str {
        "dxf"
    }

    fn render(&self, sheet: &SheetDrawing, mut out: &mut dyn std::io::Write) -> std::io::Result<()> {
        DxfDocument::from_sheet(sheet, self.label_height).export_to_writer(&mut out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{Panel, PALETTE};
    use std::fs;

    fn sheet() -> SheetDrawing {
        SheetDrawing {
            bin_index: 2,
            width: 2440.0,
            height: 320.0,
            title: "Visualization of Shelf Cuts on Board 3".into(),
            panels: vec![
                Panel {
                    x: 0.0,
                    y: 0.0,
                    width: 1567.0,
                    height: 303.0,
                    label: "centre_0".into(),
                    colour: PALETTE[0],
                },
                Panel {
                    x: 1567.0,
                    y: 0.0,
                    width: 648.5,
                    height: 303.0,
                    label: "shelf_2".into(),
                    colour: PALETTE[1],
                },
            ],
        }
    }

    #[test]
    fn test_dxf_rectangle() {
        let mut doc = DxfDocument::new();
        doc.add_rectangle(10.0, 20.0, 100.0, 50.0, LAYER_CUT);

        let path = std::env::temp_dir().join("carcass_test_rect.dxf");
        doc.export(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("LWPOLYLINE"));
        assert!(content.contains("110.000000"));
        assert!(content.contains("70.000000"));
        assert!(content.contains("EOF"));
    }

    #[test]
    fn test_dxf_from_sheet() {
        let doc = DxfDocument::from_sheet(&sheet(), 20.0);
        // Outline + 2 panels + 2 labels
        assert_eq!(doc.len(), 5);

        let mut buffer = Vec::new();
        doc.export_to_writer(&mut buffer).unwrap();
        let content = String::from_utf8(buffer).unwrap();

        assert_eq!(content.matches("LWPOLYLINE").count(), 3);
        assert_eq!(content.matches("\nTEXT\n").count(), 2);
        assert!(content.contains("shelf_2"));
        assert!(content.contains("TABLES"));
        assert!(content.contains(LAYER_SHEET));
        assert!(content.contains(LAYER_LABEL));
        assert!(content.trim_end().ends_with("EOF"));
    }

    #[test]
    fn test_renderer_uses_dxf_extension() {
        let renderer = DxfRenderer::default();
        assert_eq!(renderer.extension(), "dxf");

        let mut out = Vec::new();
        renderer.render(&sheet(), &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("centre_0"));
    }
}
