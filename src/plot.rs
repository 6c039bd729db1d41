use crate::geometry::{compute_arrow, compute_baseline};
use crate::label::{place_label, LabelCursor, LabelRules};
use crate::parse::Record;
use crate::svg::{Document, Element, DEFAULT_FILL, DEFAULT_HEIGHT};
use anyhow::Result;
use calm_io::stdoutln;
use log::{debug, warn};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("{name} must be a finite number greater than zero, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("{name} must be a finite number of zero or more, got {value}")]
    Negative { name: &'static str, value: f64 },
}

/// Sizes and offsets of the diagram, in pixels unless noted.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutParams {
    /// Thickness of the arrow shaft.
    pub arrow_height: f64,
    /// How far the head flares above and below the shaft.
    pub head_edge: f64,
    /// Length of the arrow head.
    pub head_length: f64,
    pub margin_x: f64,
    pub margin_y: f64,
    /// Base pairs per pixel.
    pub scale: f64,
    pub font_size: f64,
    /// Vertical distance between two records in the same file.
    pub record_spacing: f64,
    pub fill: String,
    pub label_rules: LabelRules,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            arrow_height: 20.0,
            head_edge: 8.0,
            head_length: 10.0,
            margin_x: 100.0,
            margin_y: 30.0,
            scale: 100.0,
            font_size: 14.0,
            record_spacing: 150.0,
            fill: DEFAULT_FILL.to_string(),
            label_rules: LabelRules::default(),
        }
    }
}

impl LayoutParams {
    pub fn validate(&self) -> Result<(), LayoutError> {
        for (name, value) in [
            ("arrow height", self.arrow_height),
            ("scale", self.scale),
            ("font size", self.font_size),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LayoutError::NotPositive { name, value });
            }
        }
        for (name, value) in [
            ("head edge", self.head_edge),
            ("head length", self.head_length),
            ("margin x", self.margin_x),
            ("margin y", self.margin_y),
            ("record spacing", self.record_spacing),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::Negative { name, value });
            }
        }
        Ok(())
    }

    /// Convert a position in bp to track pixels.
    pub fn to_px(&self, bp: u64) -> f64 {
        bp as f64 / self.scale
    }
}

/// All records read from one annotation file.
#[derive(Default, Debug)]
pub struct PlotData {
    pub records: Vec<Record>,
}

impl PlotData {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Lay out every record, one track per record.
    ///
    /// The canvas keeps its default size for a single short track and grows
    /// by `record_spacing` for every further record, and sideways to fit the
    /// longest track.
    pub fn render(&self, params: &LayoutParams) -> Document {
        let mut document = Document::new();
        for (index, record) in self.records.iter().enumerate() {
            let y = params.margin_y + params.record_spacing * index as f64;
            render_record(&mut document, record, params, y);
        }

        let longest = self
            .records
            .iter()
            .map(|r| params.to_px(r.length))
            .fold(0.0, f64::max);
        let extra_rows = self.records.len().saturating_sub(1) as f64;
        document.grow_canvas(
            2.0 * params.margin_x + longest,
            DEFAULT_HEIGHT + params.record_spacing * extra_rows,
        );
        document
    }

    /// Render and print the SVG to stdout.
    pub fn plot(&self, params: &LayoutParams) -> Result<()> {
        params.validate()?;
        let svg = self.render(params).to_svg();

        // a closed pipe downstream is not our failure
        if let Err(e) = stdoutln!("{}", svg) {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(e.into());
            }
        }

        Ok(())
    }
}

/// Draw one record's baseline, arrows and labels with the top of the arrow
/// row at `y`.
fn render_record(document: &mut Document, record: &Record, params: &LayoutParams, y: f64) {
    document.push(Element::Line(compute_baseline(
        params.margin_x,
        y,
        params.to_px(record.length),
    )));

    let mut cursor = LabelCursor::default();
    for feature in &record.features {
        let start = params.to_px(feature.start);
        let stop = params.to_px(feature.end);

        let Some(glyph) = compute_arrow(
            params.margin_x + start,
            y,
            stop - start,
            params.arrow_height,
            feature.strand,
            params.head_edge,
            params.head_length,
        ) else {
            warn!(
                "{}: skipping {} ({}..{}), strand unknown",
                record.id, feature.name, feature.start, feature.end
            );
            continue;
        };

        document.push(Element::Polygon {
            glyph,
            fill: params.fill.clone(),
        });

        let (placement, next) = place_label(
            &feature.name,
            start + (stop - start) / 2.0,
            stop,
            y,
            params.font_size,
            cursor,
            &params.label_rules,
        );
        cursor = next;
        debug!(
            "{}: label {} at level {}",
            record.id, feature.name, placement.level
        );

        document.push(Element::Text {
            x: params.margin_x + placement.x,
            y: placement.y,
            font_size: params.font_size,
            content: feature.name.clone(),
        });
    }
}
