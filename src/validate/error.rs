use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{ComponentType, XrefScope};

/// One component whose annotated length disagrees with its sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeMismatch {
    pub accession: String,
    pub annotated: u64,
    pub actual: u64,
}

/// Closed taxonomy of validation outcomes.
///
/// Validators collect every offender of their class into a single error,
/// so that one repair pass fixes the whole class before the next
/// validator runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("genome description is blacklisted (pattern '{pattern}'): {description}")]
    DescriptionBlacklisted { description: String, pattern: String },

    #[error("{found} genes on chromosome/supercontig components, minimum is {minimum}")]
    InsufficientGeneCount { found: u64, minimum: u64 },

    #[error("{} duplicate component name group(s)", .groups.len())]
    DuplicateComponentName {
        /// name -> accessions carrying it
        groups: Vec<(String, Vec<String>)>,
    },

    #[error("{} component name(s) exceed {limit} characters", .accessions.len())]
    OverlongComponentName {
        limit: usize,
        accessions: Vec<String>,
    },

    #[error("genome mixes supercontig components with a {replicon}")]
    MixedCoordinateSystem { replicon: ComponentType },

    #[error("assembly of genome '{genome}' maps chromosomes onto both contigs and supercontigs")]
    AssemblyPathConflict { genome: String },

    #[error("annotated length differs from sequence length for {} component(s)", .mismatches.len())]
    ComponentSizeMismatch { mismatches: Vec<SizeMismatch> },

    #[error("location {min}..{max} of '{locus_tag}' on non-circular component '{accession}' has min > max")]
    LocationOutOfBounds {
        accession: String,
        locus_tag: String,
        min: u64,
        max: u64,
    },

    #[error("modifier {start}..{stop} invalid against the location of '{entity}'")]
    ModifierOutOfBounds {
        entity: String,
        start: u64,
        stop: u64,
    },

    #[error("cross-reference {database}:{id} ({scope}) exceeds id length limit {limit}")]
    OversizedCrossReference {
        scope: XrefScope,
        database: String,
        id: String,
        limit: usize,
    },

    #[error("non-pseudo protein '{protein}' has no '{database}' cross-reference")]
    MissingRequiredCrossReference { protein: String, database: String },
}

impl ValidationError {
    /// Whether the dispatch loop may repair this error and continue.
    /// Everything else aborts the genome.
    #[must_use]
    pub fn is_repairable(&self) -> bool {
        match self {
            Self::ComponentSizeMismatch { .. }
            | Self::DuplicateComponentName { .. }
            | Self::OverlongComponentName { .. } => true,
            Self::OversizedCrossReference { scope, .. } => matches!(
                scope,
                XrefScope::Gene | XrefScope::Transcript | XrefScope::Protein
            ),
            _ => false,
        }
    }
}
