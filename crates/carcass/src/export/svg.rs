//! SVG sheet diagrams.
//!
//! The sheet is drawn in millimeters with its origin at the lower-left, so
//! Y is flipped on output. Each piece is a filled rectangle with its name
//! centred on it.

use std::io::{self, Write};

use super::{SheetDrawing, SheetRenderer};

/// Renders sheets as standalone SVG documents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgRenderer {
    /// Blank border around the sheet (mm).
    pub margin: f64,
    /// Label font size (mm).
    pub font_size: f64,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            margin: 20.0,
            font_size: 24.0,
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

impl SheetRenderer for SvgRenderer {
    fn extension(&self) -> &'static str {
        "svg"
    }

    fn render(&self, sheet: &SheetDrawing, out: &mut dyn Write) -> io::Result<()> {
        let m = self.margin;
        let title_band = self.font_size * 2.0;
        let view_w = sheet.width + 2.0 * m;
        let view_h = sheet.height + 2.0 * m + title_band;

        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}" width="{}mm" height="{}mm">"#,
            -m,
            -(m + title_band),
            view_w,
            view_h,
            view_w,
            view_h
        )?;
        writeln!(out, "  <title>{}</title>", escape(&sheet.title))?;
        writeln!(
            out,
            r#"  <text x="{}" y="{}" font-family="sans-serif" font-size="{}" text-anchor="middle">{}</text>"#,
            sheet.width / 2.0,
            -title_band / 2.0,
            self.font_size,
            escape(&sheet.title)
        )?;

        // Sheet outline
        writeln!(
            out,
            r#"  <rect x="0" y="0" width="{}" height="{}" fill="none" stroke="black" stroke-width="2"/>"#,
            sheet.width, sheet.height
        )?;

        for panel in &sheet.panels {
            let top = sheet.height - (panel.y + panel.height);
            writeln!(
                out,
                r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="black" stroke-width="1"/>"#,
                panel.x, top, panel.width, panel.height, panel.colour
            )?;
            writeln!(
                out,
                r#"  <text x="{}" y="{}" font-family="sans-serif" font-size="{}" fill="white" text-anchor="middle" dominant-baseline="middle">{}</text>"#,
                panel.x + panel.width / 2.0,
                top + panel.height / 2.0,
                self.font_size * 0.75,
                escape(&panel.label)
            )?;
        }

        writeln!(out, "</svg>")?;
        Ok(())
    }
}
