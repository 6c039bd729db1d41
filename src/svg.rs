//! Typed SVG document.
//!
//! The renderer pushes drawing commands into a [`Document`]; nothing is
//! formatted until [`Document::to_svg`] is called.

use crate::geometry::{ArrowGlyph, Segment};
use std::fmt::{self, Write};

/// Canvas size of a single-track diagram; larger diagrams grow from here.
pub static DEFAULT_WIDTH: f64 = 870.0;
pub static DEFAULT_HEIGHT: f64 = 300.0;
/// Closing tag.
pub static FOOTER: &str = "</svg>";
/// Arrow fill used when no colour is requested.
pub static DEFAULT_FILL: &str = "#cccccc";
/// Baseline stroke.
static BASELINE_STROKE: &str = "rgb(99,99,99)";

/// One drawing command.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Line(Segment),
    Polygon { glyph: ArrowGlyph, fill: String },
    Text { x: f64, y: f64, font_size: f64, content: String },
}

/// The preamble, up to and including the opening `<svg>` tag.
pub fn header(width: f64, height: f64) -> String {
    format!(
        r#"<?xml version="1.0" standalone="no"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<svg width="{}" height="{}" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">
"#,
        fmt_num(width),
        fmt_num(height)
    )
}

/// An SVG diagram under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    width: f64,
    height: f64,
    elements: Vec<Element>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            elements: Vec::new(),
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Enlarge the canvas to at least `width` by `height`; it never shrinks
    /// below the default size.
    pub fn grow_canvas(&mut self, width: f64, height: f64) {
        self.width = self.width.max(width);
        self.height = self.height.max(height);
    }

    /// `(width, height)` of the canvas.
    pub fn canvas(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn lines(&self) -> impl Iterator<Item = &Segment> {
        self.elements.iter().filter_map(|e| match e {
            Element::Line(segment) => Some(segment),
            _ => None,
        })
    }

    pub fn polygons(&self) -> impl Iterator<Item = &ArrowGlyph> {
        self.elements.iter().filter_map(|e| match e {
            Element::Polygon { glyph, .. } => Some(glyph),
            _ => None,
        })
    }

    /// `(x, y, content)` of every label.
    pub fn texts(&self) -> impl Iterator<Item = (f64, f64, &str)> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text { x, y, content, .. } => Some((*x, *y, content.as_str())),
            _ => None,
        })
    }

    /// Serialize the whole document, header and footer included.
    pub fn to_svg(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&header(self.width, self.height))?;
        for element in &self.elements {
            write_element(f, element)?;
        }
        f.write_str(FOOTER)
    }
}

fn write_element<W: Write>(out: &mut W, element: &Element) -> fmt::Result {
    match element {
        Element::Line(Segment { start, end }) => writeln!(
            out,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" style="stroke:{BASELINE_STROKE};stroke-width:2"/>"#,
            fmt_num(start.x),
            fmt_num(start.y),
            fmt_num(end.x),
            fmt_num(end.y),
        ),
        Element::Polygon { glyph, fill } => {
            let points = glyph
                .points
                .iter()
                .map(|p| format!("{},{}", fmt_num(p.x), fmt_num(p.y)))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(
                out,
                r#"<polygon points="{points}" style="fill:{fill};fill-opacity:1.0;stroke:#000000;stroke-width:2"/>"#
            )
        }
        Element::Text {
            x,
            y,
            font_size,
            content,
        } => writeln!(
            out,
            r#"<text x="{}" y="{}" style="font-family: Arial; font-size: {}; font-style: italic;">{}</text>"#,
            fmt_num(*x),
            fmt_num(*y),
            fmt_num(*font_size),
            xml_escape(content),
        ),
    }
}

/// Format a coordinate with at most three decimals and no trailing zeros.
pub fn fmt_num(value: f64) -> String {
    // adding 0.0 turns -0.0 into 0.0
    let rounded = (value * 1000.0).round() / 1000.0 + 0.0;
    format!("{rounded}")
}

/// Escape the XML special characters in text content.
fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

/// Convert an RGB triple to an HTML hex colour.
pub fn rgb_to_color(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Parse `R,G,B` (each 0-255) into a hex colour.
pub fn parse_rgb(s: &str) -> Result<String, String> {
    let channels = s
        .split(',')
        .map(|c| c.trim().parse::<u8>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid colour channel in '{s}': {e}"))?;
    match channels.as_slice() {
        [r, g, b] => Ok(rgb_to_color(*r, *g, *b)),
        _ => Err(format!("expected three comma separated channels, got '{s}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{compute_arrow, compute_baseline};
    use bio::bio_types::strand::Strand;

    #[test]
    fn hex_colours() {
        assert_eq!(rgb_to_color(204, 204, 204), "#cccccc");
        assert_eq!(rgb_to_color(0, 15, 255), "#000fff");
        assert_eq!(parse_rgb("38, 84,124").unwrap(), "#26547c");
        assert!(parse_rgb("1,2").is_err());
        assert!(parse_rgb("1,2,300").is_err());
    }

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(fmt_num(105.0), "105");
        assert_eq!(fmt_num(2.5), "2.5");
        assert_eq!(fmt_num(0.1 + 0.2), "0.3");
        assert_eq!(fmt_num(-0.0001), "0");
    }

    #[test]
    fn empty_document_is_header_and_footer() {
        let svg = Document::new().to_svg();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"<svg width="870" height="300" "#));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg, format!("{}{FOOTER}", header(870.0, 300.0)));
    }

    #[test]
    fn canvas_only_grows() {
        let mut doc = Document::new();
        doc.grow_canvas(100.0, 1000.0);
        assert_eq!(doc.canvas(), (870.0, 1000.0));
        doc.grow_canvas(1200.5, 10.0);
        assert_eq!(doc.canvas(), (1200.5, 1000.0));
        assert!(doc
            .to_svg()
            .contains(r#"<svg width="1200.5" height="1000" "#));
    }

    #[test]
    fn elements_serialize_in_order() {
        let mut doc = Document::new();
        doc.push(Element::Line(compute_baseline(100.0, 30.0, 10.0)));
        doc.push(Element::Polygon {
            glyph: compute_arrow(100.0, 30.0, 5.0, 20.0, Strand::Forward, 8.0, 10.0).unwrap(),
            fill: DEFAULT_FILL.to_string(),
        });
        doc.push(Element::Text {
            x: 85.0,
            y: 80.0,
            font_size: 14.0,
            content: "A&B".to_string(),
        });
        let svg = doc.to_svg();

        let line = svg.find("<line").unwrap();
        let polygon = svg.find("<polygon").unwrap();
        let text = svg.find("<text").unwrap();
        assert!(line < polygon && polygon < text);

        assert!(svg.contains(r#"<line x1="100" y1="30" x2="110" y2="30""#));
        assert!(svg.contains(
            r#"points="100,30 100,30 100,22 105,40 100,58 100,50 100,50""#
        ));
        assert!(svg.contains("fill:#cccccc"));
        assert!(svg.contains(">A&amp;B</text>"));
        assert_eq!(doc.polygons().count(), 1);
        assert_eq!(doc.lines().count(), 1);
        assert_eq!(doc.texts().next(), Some((85.0, 80.0, "A&B")));
    }
}
