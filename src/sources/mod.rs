//! External collaborator interfaces.
//!
//! Retrieval and parsing of upstream annotation, and persistence of the
//! finished model, are not this crate's concern: they are supplied by the
//! embedding application through these traits. Implementations may block
//! (database queries, file reads); the pipeline runs them on blocking
//! worker threads.

use thiserror::Error;

use crate::core::{Gene, Genome, GenomicComponent, Protein, Transcript};

/// A transient collaborator failure (I/O, database, external service).
///
/// These are the only errors the pipeline retries; anything the
/// validators raise is final.
#[derive(Error, Debug)]
#[error("source failure: {0}")]
pub struct SourceError(#[from] pub anyhow::Error);

impl SourceError {
    pub fn msg(message: impl std::fmt::Display) -> Self {
        Self(anyhow::anyhow!("{message}"))
    }
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Upstream assembly metadata: which components a genome has and how much
/// annotation each carries. Consumed by component resolution.
pub trait AssemblyCatalog: Send + Sync {
    /// Explicitly assembled replicons (chromosomes, plasmids)
    fn replicons(&self, genome_id: &str, version: &str) -> SourceResult<Vec<GenomicComponent>>;

    /// Components not placed on any replicon
    fn unplaced(&self, genome_id: &str, version: &str) -> SourceResult<Vec<GenomicComponent>>;

    /// Components placed on a replicon but not localised within it
    fn unlocalised(&self, genome_id: &str, version: &str) -> SourceResult<Vec<GenomicComponent>>;

    /// Whole-genome-shotgun prefix registered for the genome, if any
    fn wgs_prefix_for(&self, genome_id: &str, version: &str) -> SourceResult<Option<String>>;

    /// Contig set published under a WGS prefix
    fn wgs_components(&self, prefix: &str) -> SourceResult<Vec<GenomicComponent>>;

    /// Number of annotated features on a component. Explicit components
    /// are keyed by accession alone, WGS contigs by accession + version.
    fn feature_count(&self, accession: &str, version: Option<&str>) -> SourceResult<u64>;
}

/// Upstream parsed annotation: the gene/protein/transcript graph for a
/// component. The feature-extraction handlers pull from this level by
/// level.
pub trait FeatureSource: Send + Sync {
    /// Gene records annotated on a component
    fn genes_for(&self, accession: &str, version: Option<&str>) -> SourceResult<Vec<Gene>>;

    /// Protein records under a gene, keyed by locus tag
    fn proteins_for(&self, locus_tag: &str) -> SourceResult<Vec<Protein>>;

    /// Transcript records producing a protein. Two proteins may cite the
    /// same transcript id; the loader deduplicates on it.
    fn transcripts_for(&self, protein_id: &str) -> SourceResult<Vec<Transcript>>;
}

/// Downstream consumer of finished genomes. Receives either a fully
/// validated genome or a typed failure, never anything partial.
pub trait GenomeSink: Send + Sync {
    /// Persist a validated genome.
    fn accept(&self, genome: &Genome) -> SourceResult<()>;

    /// Observe a genome that failed processing.
    fn reject(&self, genome_id: &str, error: &crate::pipeline::PipelineError);
}
