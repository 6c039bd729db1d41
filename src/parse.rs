use bio::{
    bio_types::strand::Strand,
    io::gff::{GffType, Reader},
};
use gb_io::{reader::SeqReader, seq::Location};
use log::{debug, info};
use std::{collections::BTreeMap, fs::File, path::Path, str::FromStr};
use thiserror::Error;

/// The only feature type drawn.
const CDS: &str = "CDS";
/// GenBank qualifiers tried in order for a gene name.
const GENBANK_NAME_KEYS: [&str; 3] = ["gene", "locus_tag", "product"];
/// GFF3 attributes tried in order for a gene name.
const GFF_NAME_KEYS: [&str; 4] = ["Name", "gene", "locus_tag", "ID"];

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("could not open {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed GenBank record: {0}")]
    GenBank(String),
    #[error("malformed GFF line: {0}")]
    Gff(String),
    #[error("CDS at {start}..{end} in {record} has no name")]
    MissingName { record: String, start: u64, end: u64 },
    #[error("CDS {name} in {record} ends ({end}) before it starts ({start})")]
    InvertedBounds {
        record: String,
        name: String,
        start: u64,
        end: u64,
    },
    #[error("CDS in {record} has a location with no bounds: {reason}")]
    Location { record: String, reason: String },
    #[error("unknown annotation format '{0}', expected auto, genbank or gff")]
    UnknownFormat(String),
}

/// A coding sequence, 0-based and half-open.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub name: String,
    pub strand: Strand,
    pub start: u64,
    pub end: u64,
}

/// One annotated sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    /// Sequence length in bp.
    pub length: u64,
    /// Sorted by start.
    pub features: Vec<Feature>,
}

impl Record {
    pub fn new(id: String, length: u64, mut features: Vec<Feature>) -> Self {
        features.sort_by_key(|f| f.start);
        Self {
            id,
            length,
            features,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Auto,
    GenBank,
    Gff,
}

impl FromStr for Format {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Format::Auto),
            "genbank" | "gb" | "gbk" => Ok(Format::GenBank),
            "gff" | "gff3" => Ok(Format::Gff),
            other => Err(ParseError::UnknownFormat(other.to_string())),
        }
    }
}

impl Format {
    /// Resolve `Auto` from the file extension; anything not GFF is GenBank.
    pub fn resolve(self, path: &Path) -> Format {
        match self {
            Format::Auto => match path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_ascii_lowercase())
                .as_deref()
            {
                Some("gff") | Some("gff3") => Format::Gff,
                _ => Format::GenBank,
            },
            other => other,
        }
    }
}

/// Read all records of an annotation file.
pub fn parse_annotations(file: &Path, format: Format) -> Result<Vec<Record>, ParseError> {
    let records = match format.resolve(file) {
        Format::Gff => parse_gff(file)?,
        _ => parse_genbank(file)?,
    };
    info!(
        "read {} record(s), {} CDS from {}",
        records.len(),
        records.iter().map(|r| r.features.len()).sum::<usize>(),
        file.display()
    );
    Ok(records)
}

fn open(file: &Path) -> Result<File, ParseError> {
    File::open(file).map_err(|source| ParseError::Io {
        path: file.display().to_string(),
        source,
    })
}

pub fn parse_genbank(file: &Path) -> Result<Vec<Record>, ParseError> {
    let reader = SeqReader::new(open(file)?);

    let mut records = Vec::new();
    for seq in reader {
        let seq = seq.map_err(|e| ParseError::GenBank(e.to_string()))?;
        let id = seq.name.clone().unwrap_or_else(|| "unnamed".to_string());
        let length = u64::try_from(seq.len()).unwrap_or(0);

        let mut features = Vec::new();
        for feature in &seq.features {
            if !feature.kind.to_string().eq_ignore_ascii_case(CDS) {
                continue;
            }
            let (start, end) =
                location_bounds(&feature.location).map_err(|reason| ParseError::Location {
                    record: id.clone(),
                    reason,
                })?;
            let start = u64::try_from(start).unwrap_or(0);
            let end = u64::try_from(end).unwrap_or(0);

            let name = GENBANK_NAME_KEYS
                .iter()
                .find_map(|key| {
                    feature
                        .qualifier_values((*key).into())
                        .map(str::trim)
                        .find(|v| !v.is_empty())
                })
                .map(str::to_string)
                .ok_or_else(|| ParseError::MissingName {
                    record: id.clone(),
                    start,
                    end,
                })?;

            let strand = location_strand(&feature.location);
            features.push(checked_feature(&id, name, strand, start, end)?);
        }

        debug!("{id}: {length} bp, {} CDS", features.len());
        records.push(Record::new(id, length, features));
    }

    Ok(records)
}

/// Smallest start and largest end over every part of a location.
///
/// Parts of a join are not ordered by position: a gene across the origin of
/// a circular sequence is `join(901..1000,1..100)`. Fuzzy ends (`<1..>500`)
/// are already numeric here.
fn location_bounds(location: &Location) -> Result<(i64, i64), String> {
    match location {
        Location::Complement(inner) => location_bounds(inner),
        Location::Join(parts) | Location::Order(parts) => {
            let mut bounds: Option<(i64, i64)> = None;
            for part in parts {
                let (start, end) = location_bounds(part)?;
                bounds = Some(match bounds {
                    Some((lo, hi)) => (lo.min(start), hi.max(end)),
                    None => (start, end),
                });
            }
            bounds.ok_or_else(|| "empty join".to_string())
        }
        other => other.find_bounds().map_err(|e| format!("{e:?}")),
    }
}

/// Strand of a GenBank location: complements flip, mixed joins are unknown.
fn location_strand(location: &Location) -> Strand {
    match location {
        Location::Complement(inner) => -location_strand(inner),
        Location::Join(parts) | Location::Order(parts) => {
            let mut strands = parts.iter().map(location_strand);
            match strands.next() {
                // Unknown never compares equal, not even to itself
                Some(first) if !first.is_unknown() && strands.all(|s| s == first) => first,
                _ => Strand::Unknown,
            }
        }
        _ => Strand::Forward,
    }
}

pub fn parse_gff(file: &Path) -> Result<Vec<Record>, ParseError> {
    let mut reader = Reader::new(open(file)?, GffType::GFF3);

    let mut map: BTreeMap<String, Vec<Feature>> = BTreeMap::new();
    for record in reader.records() {
        let r = record.map_err(|e| ParseError::Gff(e.to_string()))?;
        if !r.feature_type().eq_ignore_ascii_case(CDS) {
            continue;
        }
        let seqname = r.seqname();
        // GFF is 1-based inclusive
        let start = r.start().saturating_sub(1);
        let end = *r.end();
        let strand = r.strand().unwrap_or(Strand::Unknown);

        let attributes = r.attributes();
        let name = GFF_NAME_KEYS
            .iter()
            .find_map(|key| attributes.get(*key).filter(|v| !v.trim().is_empty()))
            .map(|v| v.trim().to_string())
            .ok_or_else(|| ParseError::MissingName {
                record: seqname.to_string(),
                start,
                end,
            })?;

        let feature = checked_feature(seqname, name, strand, start, end)?;
        map.entry(seqname.to_string()).or_default().push(feature);
    }

    // no sequence in a GFF, so the record ends with its last CDS
    Ok(map
        .into_iter()
        .map(|(id, features)| {
            let length = features.iter().map(|f| f.end).max().unwrap_or(0);
            Record::new(id, length, features)
        })
        .collect())
}

fn checked_feature(
    record: &str,
    name: String,
    strand: Strand,
    start: u64,
    end: u64,
) -> Result<Feature, ParseError> {
    if end < start {
        return Err(ParseError::InvertedBounds {
            record: record.to_string(),
            name,
            start,
            end,
        });
    }
    Ok(Feature {
        name,
        strand,
        start,
        end,
    })
}
