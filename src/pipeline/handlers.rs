//! Feature-extraction handlers.
//!
//! Loading the feature graph onto resolved components happens level by
//! level: genes from the component annotation, proteins under each gene,
//! transcripts behind each protein. Each level is a handler with declared
//! prerequisites, and the set is ranked leaves-first with the generic
//! dependency orderer before running, so registration order never
//! matters.

use std::collections::HashMap;

use tracing::debug;

use crate::core::{Genome, Location};
use crate::sources::{FeatureSource, SourceResult};
use crate::utils::toposort::topological_order;

pub trait FeatureHandler: Send + Sync {
    fn name(&self) -> &'static str;

    /// Names of handlers that must run before this one
    fn prerequisites(&self) -> &'static [&'static str] {
        &[]
    }

    fn run(&self, genome: &mut Genome, source: &dyn FeatureSource) -> SourceResult<()>;
}

/// The standard handler set, in no particular order.
pub fn default_handlers() -> Vec<Box<dyn FeatureHandler>> {
    vec![
        Box::new(TranscriptHandler),
        Box::new(GeneHandler),
        Box::new(ProteinHandler),
    ]
}

/// Rank handlers so every prerequisite runs before its dependents.
pub fn ordered_handlers(handlers: Vec<Box<dyn FeatureHandler>>) -> Vec<Box<dyn FeatureHandler>> {
    let names: Vec<(&'static str, &'static [&'static str])> = handlers
        .iter()
        .map(|h| (h.name(), h.prerequisites()))
        .collect();
    let ordered = topological_order(
        &names,
        |(_, prerequisites)| prerequisites.len(),
        |(_, prerequisites), (to, _)| prerequisites.contains(to),
    );

    let mut by_name: HashMap<&'static str, Box<dyn FeatureHandler>> =
        handlers.into_iter().map(|h| (h.name(), h)).collect();
    ordered
        .into_iter()
        .filter_map(|(name, _)| by_name.remove(name))
        .collect()
}

/// On a circular component every feature location inherits the molecule
/// length, so that origin-crossing spans stay interpretable downstream.
fn inherit_circularity(location: &mut Location, circular: bool, molecule_length: u64) {
    if circular && location.circular_length.is_none() {
        location.circular_length = Some(molecule_length);
        for sub in &mut location.sub_locations {
            sub.circular_length = Some(molecule_length);
        }
    }
}

/// Loads gene records onto each resolved component.
pub struct GeneHandler;

impl FeatureHandler for GeneHandler {
    fn name(&self) -> &'static str {
        "genes"
    }

    fn run(&self, genome: &mut Genome, source: &dyn FeatureSource) -> SourceResult<()> {
        let components: Vec<(String, Option<String>, bool, u64)> = genome
            .components
            .values()
            .map(|c| (c.accession.clone(), c.version.clone(), c.circular, c.length))
            .collect();
        for (accession, version, circular, length) in components {
            let genes = source.genes_for(&accession, version.as_deref())?;
            debug!(component = %accession, genes = genes.len(), "loaded gene records");
            for mut gene in genes {
                inherit_circularity(&mut gene.location, circular, length);
                genome.add_gene(&accession, gene);
            }
        }
        Ok(())
    }
}

/// Loads protein records under each gene.
pub struct ProteinHandler;

impl FeatureHandler for ProteinHandler {
    fn name(&self) -> &'static str {
        "proteins"
    }

    fn prerequisites(&self) -> &'static [&'static str] {
        &["genes"]
    }

    fn run(&self, genome: &mut Genome, source: &dyn FeatureSource) -> SourceResult<()> {
        let genes: Vec<_> = genome.gene_ids().collect();
        for gene_id in genes {
            let Some(gene) = genome.gene(gene_id) else { continue };
            let locus_tag = gene.locus_tag.clone();
            let (circular, length) = genome
                .component_of_gene(gene_id)
                .and_then(|acc| genome.components.get(acc))
                .map(|c| (c.circular, c.length))
                .unwrap_or((false, 0));
            for mut protein in source.proteins_for(&locus_tag)? {
                inherit_circularity(&mut protein.location, circular, length);
                genome.add_protein(gene_id, protein);
            }
        }
        Ok(())
    }
}

/// Loads transcripts behind each protein, sharing records cited by more
/// than one protein.
pub struct TranscriptHandler;

impl FeatureHandler for TranscriptHandler {
    fn name(&self) -> &'static str {
        "transcripts"
    }

    fn prerequisites(&self) -> &'static [&'static str] {
        &["proteins"]
    }

    fn run(&self, genome: &mut Genome, source: &dyn FeatureSource) -> SourceResult<()> {
        let mut seen: HashMap<String, crate::core::TranscriptId> = HashMap::new();
        let proteins: Vec<_> = genome.protein_ids().collect();
        for protein_id in proteins {
            let Some(protein) = genome.protein(protein_id) else { continue };
            let protein_source_id = protein.id.clone();
            for transcript in source.transcripts_for(&protein_source_id)? {
                if let Some(&existing) = seen.get(&transcript.id) {
                    genome.link_transcript(protein_id, existing);
                } else if let Some(id) = genome.add_transcript(protein_id, transcript.clone()) {
                    seen.insert(transcript.id, id);
                }
            }
        }
        Ok(())
    }
}
