//! # genome-curator
//!
//! A library for consolidating genome annotation from heterogeneous
//! assembly sources into a single validated genome model.
//!
//! Public archives describe the same genome in several overlapping ways:
//! an explicit set of chromosomes and plasmids, a whole-genome-shotgun
//! contig set, or both at once. Component records arrive with free-text
//! descriptions instead of structural types, and the feature annotation
//! frequently contains duplicate gene and protein records that refer to
//! the same biological entity.
//!
//! `genome-curator` resolves which component set to keep, loads the
//! feature graph onto it, classifies components from their descriptions,
//! merges duplicate records by identity, and validates the result before
//! it is handed to a sink.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use genome_curator::pipeline::{GenomeJob, PipelineConfig, PipelineRunner};
//! use genome_curator::sources::{AssemblyCatalog, FeatureSource, GenomeSink};
//!
//! # async fn run(
//! #     catalog: Arc<dyn AssemblyCatalog>,
//! #     source: Arc<dyn FeatureSource>,
//! #     sink: Arc<dyn GenomeSink>,
//! #     jobs: Vec<GenomeJob>,
//! # ) {
//! let runner = PipelineRunner::new(catalog, source, sink, PipelineConfig::default());
//! let summary = runner.run(jobs).await;
//! println!("{} succeeded, {} failed", summary.succeeded, summary.failed.len());
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Genome, component and feature data types
//! - [`classify`]: Description-driven component classification
//! - [`resolve`]: Component-set resolution policies
//! - [`merge`]: Identity-based gene and protein merging
//! - [`validate`]: Configurable validators and repairs
//! - [`pipeline`]: Per-genome engine and the concurrent runner
//! - [`sources`]: Traits for assembly catalogs, feature sources and sinks

pub mod classify;
pub mod core;
pub mod merge;
pub mod pipeline;
pub mod resolve;
pub mod sources;
pub mod utils;
pub mod validate;

// Re-export commonly used types for convenience
pub use classify::ClassificationRules;
pub use core::{Genome, GenomicComponent};
pub use merge::IdentityMerger;
pub use pipeline::{GenomeCurator, GenomeJob, PipelineConfig, PipelineError, PipelineRunner};
pub use resolve::{ComponentResolver, ResolutionPolicy};
pub use validate::{ValidationConfig, ValidationError};
