//! Greedy placement of gene names under the arrows.
//!
//! Labels are placed one at a time in genomic order. When a label would
//! start too close to the end of the previous gene it is pushed one row
//! further down, up to [`LabelRules::max_levels`] rows, after which the
//! stack starts again at the top. This keeps most names readable in dense
//! clusters; it does not guarantee that no two labels overlap.

/// Tunables for the stacking heuristic.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRules {
    /// Distance from the top of the arrow row to the first label row.
    pub row_offset: f64,
    /// Labels starting closer than this to the previous stop are stacked.
    pub min_gap: f64,
    /// Number of rows before the stack wraps back to the first one.
    pub max_levels: u32,
    /// Space added to the font size between two label rows.
    pub row_padding: f64,
}

impl Default for LabelRules {
    fn default() -> Self {
        Self {
            row_offset: 50.0,
            min_gap: 10.0,
            max_levels: 4,
            row_padding: 6.0,
        }
    }
}

/// State carried from one label to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelCursor {
    /// End of the previous gene, in track pixels. `None` before the first label.
    pub previous_stop: Option<f64>,
    /// Row the next stacked label will use.
    pub level: u32,
}

impl Default for LabelCursor {
    fn default() -> Self {
        Self {
            previous_stop: None,
            level: 1,
        }
    }
}

/// Where a label ended up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    pub x: f64,
    pub y: f64,
    pub level: u32,
}

/// Rough width of half the rendered name, used to centre it under its gene.
pub fn text_width_estimate(name: &str, font_size: f64) -> f64 {
    font_size / 4.0 * name.chars().count() as f64
}

/// Place one label.
///
/// `center_x` and `stop_x` are the gene's midpoint and end in track pixels
/// (no margin); the returned `x` is in the same units. `y` is the top of the
/// arrow row.
pub fn place_label(
    name: &str,
    center_x: f64,
    stop_x: f64,
    y: f64,
    font_size: f64,
    cursor: LabelCursor,
    rules: &LabelRules,
) -> (LabelPlacement, LabelCursor) {
    let anchor = center_x - text_width_estimate(name, font_size);

    let mut level = cursor.level;
    if level >= rules.max_levels {
        level = 0;
    }

    let (row, next_level) = match cursor.previous_stop {
        None => (0, level),
        Some(previous) if anchor - previous < rules.min_gap => (level, level + 1),
        Some(_) => (0, 0),
    };

    let placement = LabelPlacement {
        x: anchor,
        y: y + rules.row_offset + (font_size + rules.row_padding) * f64::from(row),
        level: row,
    };
    let cursor = LabelCursor {
        previous_stop: Some(stop_x),
        level: next_level,
    };

    (placement, cursor)
}
