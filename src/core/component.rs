use serde::{Deserialize, Serialize};

use crate::core::feature::GeneId;

/// Kind of genomic component, ranked 1-4 for comparison: a chromosome
/// outranks a plasmid, which outranks the scaffold levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Chromosome,
    Plasmid,
    Supercontig,
    Contig,
}

impl ComponentType {
    /// Numeric rank (1 = chromosome .. 4 = contig)
    #[must_use]
    pub fn rank(&self) -> u8 {
        match self {
            Self::Chromosome => 1,
            Self::Plasmid => 2,
            Self::Supercontig => 3,
            Self::Contig => 4,
        }
    }

    /// Replicon-level types carry their own coordinate system; the
    /// scaffold levels below them do not.
    #[must_use]
    pub fn is_replicon(&self) -> bool {
        matches!(self, Self::Chromosome | Self::Plasmid)
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Chromosome => write!(f, "chromosome"),
            Self::Plasmid => write!(f, "plasmid"),
            Self::Supercontig => write!(f, "supercontig"),
            Self::Contig => write!(f, "contig"),
        }
    }
}

/// A single replicon or assembly component of a genome.
///
/// Components are created by resolution and classified exactly once; name,
/// description and type may be rewritten afterwards only by validator
/// repair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomicComponent {
    /// Source accession
    pub accession: String,

    /// Source sequence version, when the source keys by accession+version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Length claimed by the source annotation
    pub length: u64,

    /// Length of the actual sequence, when the source supplied one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_length: Option<u64>,

    #[serde(default)]
    pub circular: bool,

    /// Assigned once by classification, rewritten only by repair
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_type: Option<ComponentType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub molecule_type: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,

    /// Accessions of the components this one is assembled from (the
    /// assembly-path edges, e.g. chromosome -> contigs)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assembled_from: Vec<String>,

    /// Genes annotated on this component, as arena ids
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genes: Vec<GeneId>,
}

impl GenomicComponent {
    pub fn new(accession: impl Into<String>, length: u64) -> Self {
        Self {
            accession: accession.into(),
            version: None,
            length,
            actual_length: None,
            circular: false,
            component_type: None,
            name: None,
            description: String::new(),
            molecule_type: None,
            synonyms: Vec::new(),
            assembled_from: Vec::new(),
            genes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Accession qualified with the version when one is present
    #[must_use]
    pub fn versioned_accession(&self) -> String {
        match &self.version {
            Some(v) => format!("{}.{}", self.accession, v),
            None => self.accession.clone(),
        }
    }

    #[must_use]
    pub fn is_classified(&self) -> bool {
        self.component_type.is_some()
    }
}
