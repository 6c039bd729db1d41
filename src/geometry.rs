use bio::bio_types::strand::Strand;

/// A point on the SVG canvas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The seven corners of a gene arrow, `A` to `G`, in drawing order.
///
/// For a forward gene `A` is the top-left corner and `D` the tip on the
/// right; a reverse gene is the mirror image with `A` top-right and the
/// tip on the left.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowGlyph {
    pub points: [Point; 7],
}

impl ArrowGlyph {
    /// The pointed end of the arrow (`D`).
    pub fn tip(&self) -> Point {
        self.points[3]
    }
}

/// A straight line between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

/// Compute the arrow polygon for a gene.
///
/// `(x, y)` is the top edge of the glyph at its leftmost extent, `length`
/// its horizontal extent and `height` the thickness of the shaft. The head
/// is `head_length` long and flares `head_edge` above and below the shaft.
/// Genes shorter than the head are drawn as the head alone, squeezed into
/// `[x, x + length]`.
///
/// Returns `None` for [`Strand::Unknown`]: there is no direction to draw.
pub fn compute_arrow(
    x: f64,
    y: f64,
    length: f64,
    height: f64,
    strand: Strand,
    head_edge: f64,
    head_length: f64,
) -> Option<ArrowGlyph> {
    let mid = y + height / 2.0;
    let squeezed = length < head_length;

    // x of the tip, of the butt, and of the neck where shaft meets head
    let (tip, butt, neck) = match strand {
        Strand::Forward => {
            let neck = if squeezed { x } else { x + length - head_length };
            (x + length, x, neck)
        }
        Strand::Reverse => {
            let neck = if squeezed { x + length } else { x + head_length };
            (x, x + length, neck)
        }
        Strand::Unknown => return None,
    };

    Some(ArrowGlyph {
        points: [
            Point::new(butt, y),
            Point::new(neck, y),
            Point::new(neck, y - head_edge),
            Point::new(tip, mid),
            Point::new(neck, y + height + head_edge),
            Point::new(neck, y + height),
            Point::new(butt, y + height),
        ],
    })
}

/// The horizontal line under the genes spanning the whole sequence.
pub fn compute_baseline(x: f64, y: f64, total_length: f64) -> Segment {
    Segment {
        start: Point::new(x, y),
        end: Point::new(x + total_length, y),
    }
}
