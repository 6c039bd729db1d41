//! Gene cluster diagrams: CDS features from a GenBank or GFF3 file drawn as
//! strand-aware arrows in SVG.

pub mod geometry;
pub mod label;
pub mod parse;
pub mod plot;
pub mod svg;
