use serde::{Deserialize, Serialize};

use crate::core::location::Location;

/// Arena index of a gene within its genome
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GeneId(pub usize);

/// Arena index of a protein within its genome
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProteinId(pub usize);

/// Arena index of a transcript within its genome
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TranscriptId(pub usize);

impl std::fmt::Display for GeneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gene#{}", self.0)
    }
}

impl std::fmt::Display for ProteinId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "protein#{}", self.0)
    }
}

impl std::fmt::Display for TranscriptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "transcript#{}", self.0)
    }
}

/// Entity class a cross-reference points at, used by the oversized-id
/// repair rule: GENE/TRANSCRIPT/PROTEIN references are strippable, any
/// other class is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum XrefScope {
    Gene,
    Transcript,
    Protein,
    #[default]
    Other,
}

impl std::fmt::Display for XrefScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gene => write!(f, "GENE"),
            Self::Transcript => write!(f, "TRANSCRIPT"),
            Self::Protein => write!(f, "PROTEIN"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}

/// A typed pointer from a model entity to an identifier in an external
/// database.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CrossReference {
    /// External database name (e.g. "UniProtKB", "GeneID")
    pub database: String,

    /// Identifier within that database
    pub id: String,

    #[serde(default)]
    pub scope: XrefScope,
}

impl CrossReference {
    pub fn new(database: impl Into<String>, id: impl Into<String>, scope: XrefScope) -> Self {
        Self {
            database: database.into(),
            id: id.into(),
            scope,
        }
    }

    /// Identity for protein merging: ids are only unique per database, so
    /// the value compared is the (database, id) pair.
    #[must_use]
    pub fn value(&self) -> (&str, &str) {
        (&self.database, &self.id)
    }
}

/// A localized annotation on a protein (domain, signal peptide, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProteinFeature {
    pub name: String,
    pub location: Location,
}

/// A gene record. The locus tag is the identity key under which duplicate
/// records from the source are merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    pub locus_tag: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub location: Location,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cross_references: Vec<CrossReference>,

    /// Proteins of this gene, as arena ids
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub proteins: Vec<ProteinId>,
}

impl Gene {
    pub fn new(locus_tag: impl Into<String>, location: Location) -> Self {
        Self {
            locus_tag: locus_tag.into(),
            name: None,
            location,
            cross_references: Vec::new(),
            proteins: Vec::new(),
        }
    }
}

/// A protein record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protein {
    /// Source identifier (protein accession)
    pub id: String,

    pub location: Location,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cross_references: Vec<CrossReference>,

    #[serde(default)]
    pub pseudo: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<ProteinFeature>,

    /// Transcripts producing this protein, as arena ids (many-to-many)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transcripts: Vec<TranscriptId>,
}

impl Protein {
    pub fn new(id: impl Into<String>, location: Location) -> Self {
        Self {
            id: id.into(),
            location,
            cross_references: Vec::new(),
            pseudo: false,
            features: Vec::new(),
            transcripts: Vec::new(),
        }
    }

    /// True when this protein shares at least one identical cross-reference
    /// value with `other`.
    #[must_use]
    pub fn shares_cross_reference(&self, other: &Protein) -> bool {
        self.cross_references
            .iter()
            .any(|a| other.cross_references.iter().any(|b| a.value() == b.value()))
    }
}

/// A transcript record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub id: String,

    pub location: Location,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cross_references: Vec<CrossReference>,

    /// Proteins translated from this transcript, as arena ids
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub proteins: Vec<ProteinId>,
}

impl Transcript {
    pub fn new(id: impl Into<String>, location: Location) -> Self {
        Self {
            id: id.into(),
            location,
            cross_references: Vec::new(),
            proteins: Vec::new(),
        }
    }
}
