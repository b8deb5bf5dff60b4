//! Selection of the authoritative component set for a genome.
//!
//! Upstream assemblies often carry two competing representations of the
//! same genome: explicitly assembled components (replicons plus unplaced
//! and unlocalised pieces) and a whole-genome-shotgun contig set. The
//! resolver picks one according to the configured policy and attaches it
//! to the genome, wholly replacing whatever was there before.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Genome, GenomicComponent};
use crate::sources::{AssemblyCatalog, SourceResult};

/// Which representation of the assembly to trust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPolicy {
    /// Explicitly assembled components only
    Explicit,
    /// Whole-genome-shotgun contigs only
    Wgs,
    /// Whichever set carries more annotated features; explicit wins ties
    #[default]
    Automatic,
}

/// Resolves a genome's component set against an [`AssemblyCatalog`].
pub struct ComponentResolver<'a> {
    catalog: &'a dyn AssemblyCatalog,
}

impl<'a> ComponentResolver<'a> {
    pub fn new(catalog: &'a dyn AssemblyCatalog) -> Self {
        Self { catalog }
    }

    /// Choose the component set for `genome` and attach it, replacing any
    /// previously attached components (no partial merge).
    ///
    /// Returns the number of components attached. Zero is a valid outcome
    /// (a genome with neither explicit components nor a WGS set) and is
    /// left to the caller to act on.
    pub fn resolve(
        &self,
        genome: &mut Genome,
        version: &str,
        policy: ResolutionPolicy,
    ) -> SourceResult<usize> {
        let chosen = match policy {
            ResolutionPolicy::Explicit => self.explicit_set(&genome.id, version)?,
            ResolutionPolicy::Wgs => self.wgs_set(&genome.id, version)?,
            ResolutionPolicy::Automatic => self.automatic_set(&genome.id, version)?,
        };
        debug!(
            genome = %genome.id,
            ?policy,
            components = chosen.len(),
            "resolved component set"
        );
        let count = chosen.len();
        genome.replace_components(chosen);
        Ok(count)
    }

    /// Union of the three disjoint explicit queries.
    fn explicit_set(&self, genome_id: &str, version: &str) -> SourceResult<Vec<GenomicComponent>> {
        let mut components = self.catalog.replicons(genome_id, version)?;
        components.extend(self.catalog.unplaced(genome_id, version)?);
        components.extend(self.catalog.unlocalised(genome_id, version)?);
        Ok(components)
    }

    /// The WGS contig set, or empty when no prefix is registered. A
    /// missing prefix is a normal outcome, not an error.
    fn wgs_set(&self, genome_id: &str, version: &str) -> SourceResult<Vec<GenomicComponent>> {
        match self.catalog.wgs_prefix_for(genome_id, version)? {
            Some(prefix) => self.catalog.wgs_components(&prefix),
            None => Ok(Vec::new()),
        }
    }

    fn automatic_set(&self, genome_id: &str, version: &str) -> SourceResult<Vec<GenomicComponent>> {
        let explicit = self.explicit_set(genome_id, version)?;
        let wgs = self.wgs_set(genome_id, version)?;

        if wgs.is_empty() {
            return Ok(explicit);
        }
        if explicit.is_empty() {
            return Ok(wgs);
        }

        // Explicit components are counted by accession alone, WGS contigs
        // by accession + version.
        let mut explicit_features = 0u64;
        for component in &explicit {
            explicit_features += self.catalog.feature_count(&component.accession, None)?;
        }
        let mut wgs_features = 0u64;
        for component in &wgs {
            wgs_features += self
                .catalog
                .feature_count(&component.accession, component.version.as_deref())?;
        }

        debug!(
            genome = genome_id,
            explicit_features,
            wgs_features,
            "comparing annotated feature counts"
        );
        if explicit_features >= wgs_features {
            Ok(explicit)
        } else {
            Ok(wgs)
        }
    }
}
