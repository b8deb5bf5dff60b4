use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{ComponentType, Genome, Location, XrefScope};
use crate::validate::error::{SizeMismatch, ValidationError};

/// Settings consumed by the validators. Deserialized from the embedding
/// application's configuration; defaults are usable on their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Minimum genes expected on chromosome/supercontig components
    pub min_gene_count: u64,

    /// Accept genomes whose resolved component set carries no genes
    pub allow_empty_genomes: bool,

    /// Accept supercontigs alongside chromosomes/plasmids
    pub allow_mixed_coordinate_systems: bool,

    pub max_component_name_length: usize,

    pub max_xref_id_length: usize,

    /// Anchored regex patterns matched case-insensitively against the
    /// whole genome description
    pub blacklist: Vec<String>,

    /// External database every non-pseudo protein must be linked to,
    /// when set
    pub required_xref_database: Option<String>,

    /// Validators to run, in order
    pub validators: Vec<ValidatorKind>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_gene_count: 1,
            allow_empty_genomes: false,
            allow_mixed_coordinate_systems: false,
            max_component_name_length: 40,
            max_xref_id_length: 64,
            blacklist: vec![
                ".*metagenome.*".to_string(),
                ".*targeted locus.*".to_string(),
                ".*partial genome.*".to_string(),
            ],
            required_xref_database: None,
            validators: ValidatorKind::default_order(),
        }
    }
}

/// The closed list of validators, iterated in configured order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorKind {
    DescriptionBlacklist,
    ComponentSizes,
    ComponentNames,
    NameLengths,
    CoordinateSystems,
    AssemblyPaths,
    LocationBounds,
    Modifiers,
    CrossReferenceLengths,
    RequiredCrossReferences,
    GeneCount,
}

impl ValidatorKind {
    /// The default run order: cheap fatal checks first, repairable
    /// component checks next, feature-level checks last.
    pub fn default_order() -> Vec<ValidatorKind> {
        vec![
            Self::DescriptionBlacklist,
            Self::ComponentSizes,
            Self::ComponentNames,
            Self::NameLengths,
            Self::CoordinateSystems,
            Self::AssemblyPaths,
            Self::LocationBounds,
            Self::Modifiers,
            Self::CrossReferenceLengths,
            Self::RequiredCrossReferences,
            Self::GeneCount,
        ]
    }

    pub fn check(&self, genome: &Genome, config: &ValidationConfig) -> Result<(), ValidationError> {
        match self {
            Self::DescriptionBlacklist => check_description(genome, config),
            Self::ComponentSizes => check_component_sizes(genome),
            Self::ComponentNames => check_component_names(genome),
            Self::NameLengths => check_name_lengths(genome, config),
            Self::CoordinateSystems => check_coordinate_systems(genome, config),
            Self::AssemblyPaths => check_assembly_paths(genome),
            Self::LocationBounds => check_location_bounds(genome),
            Self::Modifiers => check_modifiers(genome),
            Self::CrossReferenceLengths => check_xref_lengths(genome, config),
            Self::RequiredCrossReferences => check_required_xrefs(genome, config),
            Self::GeneCount => check_gene_count(genome, config),
        }
    }
}

fn check_description(genome: &Genome, config: &ValidationConfig) -> Result<(), ValidationError> {
    for pattern in &config.blacklist {
        let Ok(regex) = Regex::new(&format!("(?i)^(?:{pattern})$")) else {
            warn!(pattern, "skipping unparseable blacklist pattern");
            continue;
        };
        if regex.is_match(&genome.description) {
            return Err(ValidationError::DescriptionBlacklisted {
                description: genome.description.clone(),
                pattern: pattern.clone(),
            });
        }
    }
    Ok(())
}

fn check_component_sizes(genome: &Genome) -> Result<(), ValidationError> {
    let mismatches: Vec<SizeMismatch> = genome
        .components
        .values()
        .filter_map(|component| {
            let actual = component.actual_length?;
            (actual != component.length).then(|| SizeMismatch {
                accession: component.accession.clone(),
                annotated: component.length,
                actual,
            })
        })
        .collect();
    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::ComponentSizeMismatch { mismatches })
    }
}

fn check_component_names(genome: &Genome) -> Result<(), ValidationError> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for component in genome.components.values() {
        let Some(name) = &component.name else { continue };
        match groups.iter_mut().find(|(n, _)| n == name) {
            Some((_, accessions)) => accessions.push(component.accession.clone()),
            None => groups.push((name.clone(), vec![component.accession.clone()])),
        }
    }
    groups.retain(|(_, accessions)| accessions.len() > 1);
    if groups.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::DuplicateComponentName { groups })
    }
}

fn check_name_lengths(genome: &Genome, config: &ValidationConfig) -> Result<(), ValidationError> {
    let accessions: Vec<String> = genome
        .components
        .values()
        .filter(|c| {
            c.name
                .as_deref()
                .is_some_and(|n| n.len() > config.max_component_name_length)
        })
        .map(|c| c.accession.clone())
        .collect();
    if accessions.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::OverlongComponentName {
            limit: config.max_component_name_length,
            accessions,
        })
    }
}

fn check_coordinate_systems(
    genome: &Genome,
    config: &ValidationConfig,
) -> Result<(), ValidationError> {
    if config.allow_mixed_coordinate_systems {
        return Ok(());
    }
    let has_supercontig = genome
        .components
        .values()
        .any(|c| c.component_type == Some(ComponentType::Supercontig));
    if !has_supercontig {
        return Ok(());
    }
    let replicon = genome
        .components
        .values()
        .filter_map(|c| c.component_type)
        .find(|t| t.is_replicon());
    match replicon {
        Some(replicon) => Err(ValidationError::MixedCoordinateSystem { replicon }),
        None => Ok(()),
    }
}

fn check_assembly_paths(genome: &Genome) -> Result<(), ValidationError> {
    let mut chromosome_on_contig = false;
    let mut chromosome_on_supercontig = false;
    for component in genome.components.values() {
        if component.component_type != Some(ComponentType::Chromosome) {
            continue;
        }
        for child in &component.assembled_from {
            match genome.components.get(child).and_then(|c| c.component_type) {
                Some(ComponentType::Contig) => chromosome_on_contig = true,
                Some(ComponentType::Supercontig) => chromosome_on_supercontig = true,
                _ => {}
            }
        }
    }
    if chromosome_on_contig && chromosome_on_supercontig {
        Err(ValidationError::AssemblyPathConflict {
            genome: genome.id.clone(),
        })
    } else {
        Ok(())
    }
}

fn check_location_bounds(genome: &Genome) -> Result<(), ValidationError> {
    for component in genome.components.values() {
        if component.circular {
            continue;
        }
        for &gene_id in &component.genes {
            let Some(gene) = genome.gene(gene_id) else { continue };
            let mut spans: Vec<(&str, &Location)> = vec![(&gene.locus_tag, &gene.location)];
            for &protein_id in &gene.proteins {
                if let Some(protein) = genome.protein(protein_id) {
                    spans.push((&protein.id, &protein.location));
                    for &transcript_id in &protein.transcripts {
                        if let Some(transcript) = genome.transcript(transcript_id) {
                            spans.push((&transcript.id, &transcript.location));
                        }
                    }
                }
            }
            for (entity, location) in spans {
                if location.min > location.max {
                    return Err(ValidationError::LocationOutOfBounds {
                        accession: component.accession.clone(),
                        locus_tag: entity.to_string(),
                        min: location.min,
                        max: location.max,
                    });
                }
            }
        }
    }
    Ok(())
}

fn check_modifiers(genome: &Genome) -> Result<(), ValidationError> {
    for gene_id in genome.gene_ids() {
        let Some(gene) = genome.gene(gene_id) else { continue };
        check_location_modifiers(&gene.locus_tag, &gene.location, false)?;
        for &protein_id in &gene.proteins {
            if let Some(protein) = genome.protein(protein_id) {
                // Proteins are coding entities: the translation-boundary
                // rule applies to their modifiers.
                check_location_modifiers(&protein.id, &protein.location, true)?;
                for &transcript_id in &protein.transcripts {
                    if let Some(transcript) = genome.transcript(transcript_id) {
                        check_location_modifiers(&transcript.id, &transcript.location, false)?;
                    }
                }
            }
        }
    }
    Ok(())
}

fn check_location_modifiers(
    entity: &str,
    location: &Location,
    coding: bool,
) -> Result<(), ValidationError> {
    for modifier in &location.modifiers {
        if !location.contains_range(modifier.start, modifier.stop) {
            return Err(ValidationError::ModifierOutOfBounds {
                entity: entity.to_string(),
                start: modifier.start,
                stop: modifier.stop,
            });
        }
        if coding {
            // A modifier sitting exactly at the translation boundary on
            // the relevant strand would rewrite the stop codon.
            let at_boundary = match location.strand {
                crate::core::Strand::Reverse => modifier.start == location.min,
                _ => modifier.stop == location.max,
            };
            if at_boundary {
                return Err(ValidationError::ModifierOutOfBounds {
                    entity: entity.to_string(),
                    start: modifier.start,
                    stop: modifier.stop,
                });
            }
        }
    }
    Ok(())
}

fn check_xref_lengths(genome: &Genome, config: &ValidationConfig) -> Result<(), ValidationError> {
    let limit = config.max_xref_id_length;
    let oversize = |xrefs: &[crate::core::CrossReference]| {
        xrefs
            .iter()
            .find(|x| x.id.len() > limit)
            .map(|x| ValidationError::OversizedCrossReference {
                scope: x.scope,
                database: x.database.clone(),
                id: x.id.clone(),
                limit,
            })
    };
    for gene_id in genome.gene_ids() {
        let Some(gene) = genome.gene(gene_id) else { continue };
        if let Some(error) = oversize(&gene.cross_references) {
            return Err(error);
        }
    }
    for protein_id in genome.protein_ids() {
        let Some(protein) = genome.protein(protein_id) else { continue };
        if let Some(error) = oversize(&protein.cross_references) {
            return Err(error);
        }
    }
    for transcript_id in genome.transcript_ids() {
        let Some(transcript) = genome.transcript(transcript_id) else { continue };
        if let Some(error) = oversize(&transcript.cross_references) {
            return Err(error);
        }
    }
    Ok(())
}

fn check_required_xrefs(genome: &Genome, config: &ValidationConfig) -> Result<(), ValidationError> {
    let Some(database) = &config.required_xref_database else {
        return Ok(());
    };
    for protein_id in genome.protein_ids() {
        let Some(protein) = genome.protein(protein_id) else { continue };
        if protein.pseudo {
            continue;
        }
        let linked = protein
            .cross_references
            .iter()
            .any(|x| x.database.eq_ignore_ascii_case(database));
        if !linked {
            return Err(ValidationError::MissingRequiredCrossReference {
                protein: protein.id.clone(),
                database: database.clone(),
            });
        }
    }
    Ok(())
}

fn check_gene_count(genome: &Genome, config: &ValidationConfig) -> Result<(), ValidationError> {
    if config.allow_empty_genomes && genome.live_gene_count() == 0 {
        return Ok(());
    }
    // Only chromosome- and supercontig-level annotation counts towards
    // the minimum.
    let found: u64 = genome
        .components
        .values()
        .filter(|c| {
            matches!(
                c.component_type,
                Some(ComponentType::Chromosome) | Some(ComponentType::Supercontig)
            )
        })
        .map(|c| c.genes.iter().filter(|&&g| genome.gene(g).is_some()).count() as u64)
        .sum();
    if found < config.min_gene_count {
        return Err(ValidationError::InsufficientGeneCount {
            found,
            minimum: config.min_gene_count,
        });
    }
    Ok(())
}
