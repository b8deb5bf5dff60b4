//! Multi-pass genome validation with typed, partially repairable outcomes.
//!
//! A configured, ordered list of validators runs against the genome. Each
//! check either passes or produces one [`ValidationError`]. The dispatch
//! rule is fixed: a repairable error is repaired in place and the run
//! continues with the NEXT validator (earlier validators are not re-run);
//! any other error propagates immediately and aborts that genome.

pub mod error;
pub mod validators;

use tracing::warn;

use crate::core::{ComponentType, Genome, XrefScope};

pub use error::{SizeMismatch, ValidationError};
pub use validators::{ValidationConfig, ValidatorKind};

/// Run the configured validators against a genome, repairing what the
/// fixed repair table covers.
pub fn run_validators(genome: &mut Genome, config: &ValidationConfig) -> Result<(), ValidationError> {
    for validator in &config.validators {
        match validator.check(genome, config) {
            Ok(()) => {}
            Err(error) if error.is_repairable() => {
                warn!(genome = %genome.id, %error, ?validator, "repairing validation defect");
                repair(genome, &error);
            }
            Err(error) => return Err(error),
        }
    }
    Ok(())
}

/// Apply the fixed repair for a repairable error.
fn repair(genome: &mut Genome, error: &ValidationError) {
    match error {
        ValidationError::ComponentSizeMismatch { mismatches } => {
            for mismatch in mismatches {
                if let Some(component) = genome.components.get_mut(&mismatch.accession) {
                    component.length = mismatch.actual;
                }
            }
        }
        ValidationError::DuplicateComponentName { groups } => {
            for (_, accessions) in groups {
                for accession in accessions {
                    demote_component(genome, accession);
                }
            }
        }
        ValidationError::OverlongComponentName { accessions, .. } => {
            for accession in accessions {
                demote_component(genome, accession);
            }
        }
        ValidationError::OversizedCrossReference { .. } => strip_feature_xrefs(genome),
        // Dispatch only calls repair() for repairable errors
        _ => {}
    }
}

/// The shared name repair: rename the component after its own accession,
/// describe it as a supercontig and retype it SUPERCONTIG unless it is
/// already a CONTIG.
fn demote_component(genome: &mut Genome, accession: &str) {
    let Some(component) = genome.components.get_mut(accession) else {
        return;
    };
    component.name = Some(component.accession.clone());
    component.description = format!("Supercontig {}", component.accession);
    if component.component_type != Some(ComponentType::Contig) {
        component.component_type = Some(ComponentType::Supercontig);
    }
}

/// Strip every GENE/TRANSCRIPT/PROTEIN-scoped cross-reference in the
/// genome. OTHER-scoped references are untouched (an oversized one is
/// unrecoverable and never reaches this repair).
fn strip_feature_xrefs(genome: &mut Genome) {
    let strippable = |scope: XrefScope| {
        matches!(
            scope,
            XrefScope::Gene | XrefScope::Transcript | XrefScope::Protein
        )
    };
    let gene_ids: Vec<_> = genome.gene_ids().collect();
    for id in gene_ids {
        if let Some(gene) = genome.gene_mut(id) {
            gene.cross_references.retain(|x| !strippable(x.scope));
        }
    }
    let protein_ids: Vec<_> = genome.protein_ids().collect();
    for id in protein_ids {
        if let Some(protein) = genome.protein_mut(id) {
            protein.cross_references.retain(|x| !strippable(x.scope));
        }
    }
    let transcript_ids: Vec<_> = genome.transcript_ids().collect();
    for id in transcript_ids {
        if let Some(transcript) = genome.transcript_mut(id) {
            transcript.cross_references.retain(|x| !strippable(x.scope));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        CrossReference, Gene, GenomicComponent, Location, Protein, Strand, Superregnum,
    };
    use crate::core::LocationModifier;

    fn genome() -> Genome {
        Genome::new("GCA_000001", 562, Superregnum::Bacteria)
    }

    fn typed_component(accession: &str, component_type: ComponentType) -> GenomicComponent {
        let mut component = GenomicComponent::new(accession, 1000);
        component.component_type = Some(component_type);
        component.name = Some(accession.to_string());
        component
    }

    fn add_gene(genome: &mut Genome, accession: &str, tag: &str) {
        genome
            .add_gene(accession, Gene::new(tag, Location::new(1, 100, Strand::Forward)))
            .unwrap();
    }

    #[test]
    fn test_size_mismatch_is_repaired_in_place() {
        let mut g = genome();
        let mut component = typed_component("CHR1", ComponentType::Chromosome);
        component.length = 900;
        component.actual_length = Some(1000);
        g.add_component(component);
        add_gene(&mut g, "CHR1", "b0001");

        let config = ValidationConfig::default();
        run_validators(&mut g, &config).unwrap();
        assert_eq!(g.components["CHR1"].length, 1000);
    }

    #[test]
    fn test_duplicate_names_demoted_to_supercontig() {
        let mut g = genome();
        let mut a = typed_component("ACC1", ComponentType::Chromosome);
        a.name = Some("X".to_string());
        let mut b = typed_component("ACC2", ComponentType::Contig);
        b.name = Some("X".to_string());
        g.add_component(a);
        g.add_component(b);
        add_gene(&mut g, "ACC1", "b0001");

        let config = ValidationConfig {
            allow_mixed_coordinate_systems: true,
            min_gene_count: 0,
            ..ValidationConfig::default()
        };
        run_validators(&mut g, &config).unwrap();

        let a = &g.components["ACC1"];
        assert_eq!(a.name.as_deref(), Some("ACC1"));
        assert_eq!(a.description, "Supercontig ACC1");
        assert_eq!(a.component_type, Some(ComponentType::Supercontig));

        // A contig keeps its type through the name repair
        let b = &g.components["ACC2"];
        assert_eq!(b.name.as_deref(), Some("ACC2"));
        assert_eq!(b.component_type, Some(ComponentType::Contig));
    }

    #[test]
    fn test_overlong_name_gets_same_repair() {
        let mut g = genome();
        let mut component = typed_component("ACC1", ComponentType::Chromosome);
        component.name = Some("x".repeat(60));
        g.add_component(component);

        let config = ValidationConfig {
            allow_empty_genomes: true,
            allow_mixed_coordinate_systems: true,
            ..ValidationConfig::default()
        };
        run_validators(&mut g, &config).unwrap();
        assert_eq!(g.components["ACC1"].name.as_deref(), Some("ACC1"));
        assert_eq!(
            g.components["ACC1"].component_type,
            Some(ComponentType::Supercontig)
        );
    }

    #[test]
    fn test_blacklisted_description_is_fatal() {
        let mut g = genome().with_description("marine metagenome DNA");
        g.add_component(typed_component("CHR1", ComponentType::Chromosome));
        let error = run_validators(&mut g, &ValidationConfig::default()).unwrap_err();
        assert!(matches!(error, ValidationError::DescriptionBlacklisted { .. }));
        assert!(!error.is_repairable());
    }

    #[test]
    fn test_blacklist_is_whole_string_and_case_insensitive() {
        let config = ValidationConfig {
            blacklist: vec!["metagenome".to_string()],
            ..ValidationConfig::default()
        };
        let mut exact = genome().with_description("METAGENOME");
        exact.add_component(typed_component("CHR1", ComponentType::Chromosome));
        assert!(run_validators(&mut exact, &config).is_err());

        // Not a whole-string match for the bare pattern
        let mut partial = genome().with_description("not a metagenome assembly");
        partial.add_component(typed_component("CHR1", ComponentType::Chromosome));
        add_gene(&mut partial, "CHR1", "b0001");
        assert!(run_validators(&mut partial, &config).is_ok());
    }

    #[test]
    fn test_mixed_coordinate_systems() {
        let mut mixed = genome();
        mixed.add_component(typed_component("CHR1", ComponentType::Chromosome));
        mixed.add_component(typed_component("SC1", ComponentType::Supercontig));
        add_gene(&mut mixed, "CHR1", "b0001");
        let error = run_validators(&mut mixed, &ValidationConfig::default()).unwrap_err();
        assert_eq!(
            error,
            ValidationError::MixedCoordinateSystem {
                replicon: ComponentType::Chromosome
            }
        );

        let mut scaffolds_only = genome();
        scaffolds_only.add_component(typed_component("SC1", ComponentType::Supercontig));
        add_gene(&mut scaffolds_only, "SC1", "b0001");
        assert!(run_validators(&mut scaffolds_only, &ValidationConfig::default()).is_ok());

        let mut replicons_only = genome();
        replicons_only.add_component(typed_component("CHR1", ComponentType::Chromosome));
        replicons_only.add_component(typed_component("PL1", ComponentType::Plasmid));
        add_gene(&mut replicons_only, "CHR1", "b0001");
        assert!(run_validators(&mut replicons_only, &ValidationConfig::default()).is_ok());
    }

    #[test]
    fn test_assembly_path_conflict() {
        let mut g = genome();
        let mut chromosome = typed_component("CHR1", ComponentType::Chromosome);
        chromosome.assembled_from = vec!["CTG1".to_string(), "SC1".to_string()];
        g.add_component(chromosome);
        g.add_component(typed_component("CTG1", ComponentType::Contig));
        g.add_component(typed_component("SC1", ComponentType::Supercontig));
        add_gene(&mut g, "CHR1", "b0001");

        let config = ValidationConfig {
            allow_mixed_coordinate_systems: true,
            validators: vec![ValidatorKind::AssemblyPaths],
            ..ValidationConfig::default()
        };
        let error = run_validators(&mut g, &config).unwrap_err();
        assert!(matches!(error, ValidationError::AssemblyPathConflict { .. }));
    }

    #[test]
    fn test_non_circular_wrapped_location_is_fatal() {
        let mut g = genome();
        g.add_component(typed_component("CHR1", ComponentType::Chromosome));
        g.add_gene("CHR1", Gene::new("b0001", Location::new(900, 100, Strand::Forward)))
            .unwrap();
        let error = run_validators(&mut g, &ValidationConfig::default()).unwrap_err();
        assert!(matches!(error, ValidationError::LocationOutOfBounds { .. }));
    }

    #[test]
    fn test_modifier_outside_parent_is_fatal() {
        let mut g = genome();
        g.add_component(typed_component("CHR1", ComponentType::Chromosome));
        let mut location = Location::new(100, 500, Strand::Forward);
        location.modifiers.push(LocationModifier {
            kind: "transl_except".to_string(),
            start: 600,
            stop: 602,
        });
        g.add_gene("CHR1", Gene::new("b0001", location)).unwrap();
        let error = run_validators(&mut g, &ValidationConfig::default()).unwrap_err();
        assert!(matches!(error, ValidationError::ModifierOutOfBounds { .. }));
    }

    #[test]
    fn test_modifier_at_translation_boundary_is_fatal_for_proteins() {
        let mut g = genome();
        g.add_component(typed_component("CHR1", ComponentType::Chromosome));
        let gene = g
            .add_gene("CHR1", Gene::new("b0001", Location::new(100, 500, Strand::Forward)))
            .unwrap();
        let mut location = Location::new(100, 500, Strand::Forward);
        location.modifiers.push(LocationModifier {
            kind: "transl_except".to_string(),
            start: 498,
            stop: 500,
        });
        g.add_protein(gene, Protein::new("P1", location)).unwrap();
        let error = run_validators(&mut g, &ValidationConfig::default()).unwrap_err();
        assert!(matches!(error, ValidationError::ModifierOutOfBounds { .. }));
    }

    #[test]
    fn test_oversized_feature_xref_is_stripped_genome_wide() {
        let mut g = genome();
        g.add_component(typed_component("CHR1", ComponentType::Chromosome));
        let gene = g
            .add_gene("CHR1", Gene::new("b0001", Location::new(1, 100, Strand::Forward)))
            .unwrap();
        let mut protein = Protein::new("P1", Location::new(1, 100, Strand::Forward));
        protein.cross_references.push(CrossReference::new(
            "UniProtKB",
            "q".repeat(80),
            crate::core::XrefScope::Protein,
        ));
        protein.cross_references.push(CrossReference::new(
            "PubMed",
            "123456",
            crate::core::XrefScope::Other,
        ));
        let protein = g.add_protein(gene, protein).unwrap();

        run_validators(&mut g, &ValidationConfig::default()).unwrap();

        let survivors = &g.protein(protein).unwrap().cross_references;
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].database, "PubMed");
    }

    #[test]
    fn test_oversized_other_xref_is_fatal() {
        let mut g = genome();
        g.add_component(typed_component("CHR1", ComponentType::Chromosome));
        let gene = g
            .add_gene("CHR1", Gene::new("b0001", Location::new(1, 100, Strand::Forward)))
            .unwrap();
        let mut protein = Protein::new("P1", Location::new(1, 100, Strand::Forward));
        protein.cross_references.push(CrossReference::new(
            "PubMed",
            "9".repeat(80),
            crate::core::XrefScope::Other,
        ));
        g.add_protein(gene, protein).unwrap();

        let error = run_validators(&mut g, &ValidationConfig::default()).unwrap_err();
        assert!(matches!(error, ValidationError::OversizedCrossReference { .. }));
        assert!(!error.is_repairable());
    }

    #[test]
    fn test_missing_required_xref() {
        let config = ValidationConfig {
            required_xref_database: Some("UniProtKB".to_string()),
            ..ValidationConfig::default()
        };

        let mut g = genome();
        g.add_component(typed_component("CHR1", ComponentType::Chromosome));
        let gene = g
            .add_gene("CHR1", Gene::new("b0001", Location::new(1, 100, Strand::Forward)))
            .unwrap();
        g.add_protein(gene, Protein::new("P1", Location::new(1, 100, Strand::Forward)))
            .unwrap();
        let error = run_validators(&mut g, &config).unwrap_err();
        assert!(matches!(
            error,
            ValidationError::MissingRequiredCrossReference { .. }
        ));

        // Pseudo proteins are exempt
        let mut pseudo = genome();
        pseudo.add_component(typed_component("CHR1", ComponentType::Chromosome));
        let gene = pseudo
            .add_gene("CHR1", Gene::new("b0001", Location::new(1, 100, Strand::Forward)))
            .unwrap();
        let mut protein = Protein::new("P1", Location::new(1, 100, Strand::Forward));
        protein.pseudo = true;
        pseudo.add_protein(gene, protein).unwrap();
        assert!(run_validators(&mut pseudo, &config).is_ok());
    }

    #[test]
    fn test_gene_count_only_counts_chromosome_and_supercontig() {
        let mut g = genome();
        g.add_component(typed_component("CHR1", ComponentType::Chromosome));
        g.add_component(typed_component("PL1", ComponentType::Plasmid));
        add_gene(&mut g, "PL1", "p0001");

        let config = ValidationConfig {
            min_gene_count: 1,
            ..ValidationConfig::default()
        };
        // The plasmid gene does not count towards the minimum
        let error = run_validators(&mut g, &config).unwrap_err();
        assert_eq!(
            error,
            ValidationError::InsufficientGeneCount {
                found: 0,
                minimum: 1
            }
        );
    }

    #[test]
    fn test_repair_continues_with_next_validator() {
        // A repairable size mismatch must not mask the fatal gene-count
        // check that runs after it.
        let mut g = genome();
        let mut component = typed_component("CHR1", ComponentType::Chromosome);
        component.length = 900;
        component.actual_length = Some(1000);
        g.add_component(component);

        let config = ValidationConfig {
            validators: vec![ValidatorKind::ComponentSizes, ValidatorKind::GeneCount],
            ..ValidationConfig::default()
        };
        let error = run_validators(&mut g, &config).unwrap_err();
        assert!(matches!(error, ValidationError::InsufficientGeneCount { .. }));
        // The repair itself stuck
        assert_eq!(g.components["CHR1"].length, 1000);
    }
}
