use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LocationError {
    #[error("Compound location requires at least one member")]
    EmptyCompound,

    #[error("Trans-spliced location requires at least 2 members, found {found}")]
    TransSplicedTooFewMembers { found: usize },
}

/// Strand of a genomic location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Strand {
    Forward,
    Reverse,
    #[default]
    Unknown,
}

/// A positional annotation attached to a location, e.g. a translation
/// exception or an RNA edit. Coordinates are on the parent's molecule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationModifier {
    /// Free-text qualifier class from the source annotation
    pub kind: String,

    /// First base of the modified range (1-based, inclusive)
    pub start: u64,

    /// Last base of the modified range (1-based, inclusive)
    pub stop: u64,
}

/// A sequence insertion recorded against a location, carried through
/// untouched by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationInsertion {
    /// Base after which the insertion applies (1-based)
    pub at: u64,

    /// Number of inserted bases
    pub length: u64,
}

/// A genomic span with 1-based inclusive coordinates.
///
/// On a circular molecule `min > max` denotes a span crossing the origin
/// (e.g. `900..100` on a 1000 bp plasmid covers bases 900-1000 and 1-100).
/// Such spans are preserved as-is; they are never normalized away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Lowest-numbered base of the span (1-based, inclusive)
    pub min: u64,

    /// Highest-numbered base of the span (1-based, inclusive)
    pub max: u64,

    pub strand: Strand,

    /// Length of the molecule when it is circular
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circular_length: Option<u64>,

    /// Ordered member segments of a compound or trans-spliced location
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_locations: Vec<Location>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub insertions: Vec<LocationInsertion>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<LocationModifier>,
}

impl Location {
    pub fn new(min: u64, max: u64, strand: Strand) -> Self {
        Self {
            min,
            max,
            strand,
            circular_length: None,
            sub_locations: Vec::new(),
            insertions: Vec::new(),
            modifiers: Vec::new(),
        }
    }

    /// A location on a circular molecule of the given length.
    pub fn circular(min: u64, max: u64, strand: Strand, circular_length: u64) -> Self {
        Self {
            circular_length: Some(circular_length),
            ..Self::new(min, max, strand)
        }
    }

    /// True when the span crosses the origin of a circular molecule.
    #[must_use]
    pub fn wraps(&self) -> bool {
        self.circular_length.is_some() && self.min > self.max
    }

    /// Linear segments covered by this span, in molecule order.
    ///
    /// A wrapped span decomposes into the tail segment up to the circular
    /// length and the head segment from base 1. All circularity-aware
    /// predicates are defined over these segments.
    fn segments(&self) -> Vec<(u64, u64)> {
        match self.circular_length {
            Some(len) if self.min > self.max => vec![(self.min, len), (1, self.max)],
            _ => vec![(self.min, self.max)],
        }
    }

    /// Number of bases covered by the span.
    ///
    /// Compound locations sum their member spans rather than using the
    /// outer min/max, which on a trans-spliced location may describe a far
    /// larger extent than the members actually cover.
    #[must_use]
    pub fn span_length(&self) -> u64 {
        if !self.sub_locations.is_empty() {
            return self.sub_locations.iter().map(Location::span_length).sum();
        }
        if self.wraps() {
            // tail (min..=len) plus head (1..=max)
            let len = self.circular_length.unwrap_or(self.max);
            (len - self.min + 1) + self.max
        } else {
            self.max.saturating_sub(self.min) + 1
        }
    }

    /// Symmetric, circularity-aware overlap test: the two spans share at
    /// least one base.
    #[must_use]
    pub fn overlaps(&self, other: &Location) -> bool {
        self.segments().iter().any(|&(a_min, a_max)| {
            other
                .segments()
                .iter()
                .any(|&(b_min, b_max)| a_min <= b_max && b_min <= a_max)
        })
    }

    /// True when every base of `other` lies inside this span.
    #[must_use]
    pub fn encloses(&self, other: &Location) -> bool {
        let own = self.segments();
        other.segments().iter().all(|&(b_min, b_max)| {
            own.iter()
                .any(|&(a_min, a_max)| a_min <= b_min && b_max <= a_max)
        })
    }

    /// True when the (start, stop) range lies fully inside this span.
    /// Used to validate modifiers against their parent location.
    #[must_use]
    pub fn contains_range(&self, start: u64, stop: u64) -> bool {
        let probe = Location {
            min: start,
            max: stop,
            strand: Strand::Unknown,
            circular_length: self.circular_length,
            sub_locations: Vec::new(),
            insertions: Vec::new(),
            modifiers: Vec::new(),
        };
        self.encloses(&probe)
    }

    /// True when one span ends at the circular length and the other starts
    /// at base 1: the two records are the halves of a single feature that
    /// was split at the origin by the source annotation.
    #[must_use]
    pub fn abuts_across_origin(&self, other: &Location) -> bool {
        let Some(len) = self.circular_length else {
            return false;
        };
        if other.circular_length != Some(len) {
            return false;
        }
        (self.max == len && other.min == 1) || (other.max == len && self.min == 1)
    }

    /// Union of two joinable spans (overlapping or abutting across the
    /// origin), preserving origin-wrap semantics: when the union crosses
    /// the origin the result keeps `min > max`.
    #[must_use]
    pub fn merge_span(&self, other: &Location) -> Location {
        let strand = common_strand(&[self.clone(), other.clone()]);
        let circular_length = self.circular_length.or(other.circular_length);

        if !self.wraps() && !other.wraps() {
            if self.abuts_across_origin(other) {
                // The record touching the molecule end is the tail of the
                // wrapped span, the record starting at base 1 the head.
                let len = circular_length.unwrap_or(0);
                let (tail, head) = if self.max == len { (self, other) } else { (other, self) };
                let mut merged = Location::new(tail.min, head.max, strand);
                merged.circular_length = circular_length;
                return merged;
            }
            let mut merged =
                Location::new(self.min.min(other.min), self.max.max(other.max), strand);
            merged.circular_length = circular_length;
            return merged;
        }

        // At least one span already wraps; grow it on whichever side the
        // partner touches.
        let (wrapped, flat) = if self.wraps() { (self, other) } else { (other, self) };
        let mut min = wrapped.min;
        let mut max = wrapped.max;
        if flat.wraps() {
            min = min.min(flat.min);
            max = max.max(flat.max);
        } else {
            if flat.max >= wrapped.min {
                min = min.min(flat.min);
            }
            if flat.min <= wrapped.max {
                max = max.max(flat.max);
            }
        }
        let mut merged = Location::new(min, max, strand);
        merged.circular_length = circular_length;
        merged
    }

    /// Build a compound location from an ordered list of segments.
    ///
    /// The outer min is taken from the first member, the outer max from the
    /// last, and the circular length from the first. The underlying
    /// primitive would otherwise leave these at their defaults, so they are
    /// restored explicitly here.
    pub fn compound(members: Vec<Location>) -> Result<Location, LocationError> {
        let (first, last) = match (members.first(), members.last()) {
            (Some(f), Some(l)) => (f.clone(), l.clone()),
            _ => return Err(LocationError::EmptyCompound),
        };
        Ok(Location {
            min: first.min,
            max: last.max,
            strand: first.strand,
            circular_length: first.circular_length,
            sub_locations: members,
            insertions: Vec::new(),
            modifiers: Vec::new(),
        })
    }

    /// Build a trans-spliced location from segments that may sit on
    /// different strands.
    ///
    /// Requires at least two members. The overall strand is the common
    /// member strand, or [`Strand::Unknown`] when members disagree. The
    /// total size reported by [`Location::span_length`] is the sum of the
    /// member spans.
    pub fn trans_spliced(members: Vec<Location>) -> Result<Location, LocationError> {
        if members.len() < 2 {
            return Err(LocationError::TransSplicedTooFewMembers {
                found: members.len(),
            });
        }
        let strand = common_strand(&members);
        let mut location = Location::compound(members)?;
        location.strand = strand;
        Ok(location)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.strand {
            Strand::Reverse => write!(f, "complement({}..{})", self.min, self.max),
            _ => write!(f, "{}..{}", self.min, self.max),
        }
    }
}

/// The strand shared by every member, or Unknown on disagreement.
fn common_strand(members: &[Location]) -> Strand {
    let mut strands = members.iter().map(|m| m.strand);
    match strands.next() {
        Some(first) if strands.all(|s| s == first) => first,
        _ => Strand::Unknown,
    }
}
