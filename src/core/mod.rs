//! Core data model for genome consolidation.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Location`]: 1-based inclusive genomic span, circularity-aware
//! - [`GenomicComponent`], [`ComponentType`]: replicons and assembly parts
//! - [`Gene`], [`Protein`], [`Transcript`]: annotated features, stored in
//!   id-keyed arenas on the [`Genome`]
//! - [`CrossReference`]: typed pointer into an external database
//!
//! ## Coordinates
//!
//! All coordinates are 1-based and inclusive. On a circular molecule a span
//! with `min > max` crosses the origin (e.g. `900..100` on a 1000 bp
//! plasmid) and is preserved exactly as supplied; nothing in this crate
//! normalizes it away.

pub mod component;
pub mod feature;
pub mod genome;
pub mod location;

pub use component::{ComponentType, GenomicComponent};
pub use feature::{
    CrossReference, Gene, GeneId, Protein, ProteinFeature, ProteinId, Transcript, TranscriptId,
    XrefScope,
};
pub use genome::{Genome, Superregnum};
pub use location::{Location, LocationError, LocationInsertion, LocationModifier, Strand};
