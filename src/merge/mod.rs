//! Merging of duplicate gene and protein records.
//!
//! Source annotation regularly splits one biological entity across several
//! records: a gene crossing the origin of a circular replicon arrives as
//! two halves under the same locus tag, and one protein shows up under two
//! genes with the same external identifier. The merger collapses both
//! cases in place on the genome's arenas.
//!
//! Merge order is deterministic (arena order) and load-bearing; callers
//! must not parallelize within a genome.

use std::collections::HashMap;

use tracing::debug;

use crate::core::{GeneId, Genome, ProteinId};

pub struct IdentityMerger;

impl IdentityMerger {
    /// Run both merge passes: genes by locus tag, then proteins by shared
    /// cross-reference.
    pub fn merge(genome: &mut Genome) {
        Self::merge_genes(genome);
        Self::merge_proteins(genome);
    }

    /// Collapse same-locus-tag gene records whose locations are joinable.
    ///
    /// Candidates share an identifying locus tag regardless of location.
    /// A pair merges when the locations overlap or abut across the origin
    /// of a circular molecule; the merged location spans both inputs,
    /// preserving origin-wrap semantics, and the protein sets are unioned.
    /// Same-tag genes whose locations are not joinable stay distinct.
    pub fn merge_genes(genome: &mut Genome) {
        let accessions: Vec<String> = genome.components.keys().cloned().collect();
        for accession in accessions {
            let mut groups: HashMap<String, Vec<GeneId>> = HashMap::new();
            let mut tags: Vec<String> = Vec::new();
            for &gene_id in &genome.components[&accession].genes {
                if let Some(gene) = genome.gene(gene_id) {
                    let tag = gene.locus_tag.clone();
                    if !groups.contains_key(&tag) {
                        tags.push(tag.clone());
                    }
                    groups.entry(tag).or_default().push(gene_id);
                }
            }
            for tag in tags {
                let mut ids = groups.remove(&tag).unwrap_or_default();
                if ids.len() > 1 {
                    Self::merge_gene_group(genome, &mut ids);
                }
            }
        }
    }

    /// Merge joinable pairs within one locus-tag group until none remain.
    fn merge_gene_group(genome: &mut Genome, ids: &mut Vec<GeneId>) {
        'scan: loop {
            for i in 0..ids.len() {
                for j in (i + 1)..ids.len() {
                    let (Some(a), Some(b)) = (genome.gene(ids[i]), genome.gene(ids[j])) else {
                        continue;
                    };
                    let joinable = a.location.overlaps(&b.location)
                        || a.location.abuts_across_origin(&b.location);
                    if !joinable {
                        continue;
                    }

                    let merged_location = a.location.merge_span(&b.location);
                    let loser = b.clone();
                    debug!(
                        locus_tag = %loser.locus_tag,
                        survivor = %ids[i],
                        merged = %ids[j],
                        "merging duplicate gene records"
                    );

                    if let Some(survivor) = genome.gene_mut(ids[i]) {
                        survivor.location = merged_location;
                        for protein in loser.proteins {
                            if !survivor.proteins.contains(&protein) {
                                survivor.proteins.push(protein);
                            }
                        }
                        for xref in loser.cross_references {
                            if !survivor.cross_references.contains(&xref) {
                                survivor.cross_references.push(xref);
                            }
                        }
                    }

                    let merged_id = ids.remove(j);
                    genome.remove_gene(merged_id);
                    continue 'scan;
                }
            }
            break;
        }
    }

    /// Collapse protein records that share an identical cross-reference
    /// value, anywhere in the genome. Co-location alone never triggers a
    /// merge.
    ///
    /// The location that encloses the other becomes canonical (first
    /// record wins when neither does); cross-references and transcripts of
    /// both records are pooled into the survivor; the losing gene's
    /// remaining content is absorbed into the surviving gene.
    pub fn merge_proteins(genome: &mut Genome) {
        'scan: loop {
            let ids: Vec<ProteinId> = genome.protein_ids().collect();
            for i in 0..ids.len() {
                for j in (i + 1)..ids.len() {
                    let (Some(a), Some(b)) = (genome.protein(ids[i]), genome.protein(ids[j]))
                    else {
                        continue;
                    };
                    if !a.shares_cross_reference(b) {
                        continue;
                    }
                    // Keep the enclosing location's record as survivor so
                    // its own location stays canonical.
                    let (survivor_id, loser_id) = if b.location.encloses(&a.location)
                        && !a.location.encloses(&b.location)
                    {
                        (ids[j], ids[i])
                    } else {
                        (ids[i], ids[j])
                    };
                    Self::merge_protein_pair(genome, survivor_id, loser_id);
                    continue 'scan;
                }
            }
            break;
        }
    }

    fn merge_protein_pair(genome: &mut Genome, survivor_id: ProteinId, loser_id: ProteinId) {
        debug!(survivor = %survivor_id, merged = %loser_id, "merging duplicate protein records");

        let survivor_gene = genome.gene_of_protein(survivor_id);
        let loser_gene = genome.gene_of_protein(loser_id);

        let Some(loser) = genome.protein(loser_id).cloned() else {
            return;
        };

        // Pool cross-references and transcripts into the survivor.
        if let Some(survivor) = genome.protein_mut(survivor_id) {
            for xref in loser.cross_references {
                if !survivor.cross_references.contains(&xref) {
                    survivor.cross_references.push(xref);
                }
            }
            for transcript in &loser.transcripts {
                if !survivor.transcripts.contains(transcript) {
                    survivor.transcripts.push(*transcript);
                }
            }
        }

        // Transcripts that pointed at the loser now point at the survivor.
        for transcript_id in loser.transcripts {
            if let Some(transcript) = genome.transcript_mut(transcript_id) {
                transcript.proteins.retain(|p| *p != loser_id);
                if !transcript.proteins.contains(&survivor_id) {
                    transcript.proteins.push(survivor_id);
                }
            }
        }

        // Detach the loser from its gene; absorb the losing gene's
        // remaining content into the surviving gene when they differ.
        if let Some(loser_gene_id) = loser_gene {
            if let Some(gene) = genome.gene_mut(loser_gene_id) {
                gene.proteins.retain(|p| *p != loser_id);
            }
            if let Some(survivor_gene_id) = survivor_gene {
                if loser_gene_id != survivor_gene_id {
                    let absorbed = genome
                        .gene(loser_gene_id)
                        .map(|g| (g.proteins.clone(), g.cross_references.clone()));
                    if let Some((proteins, xrefs)) = absorbed {
                        if let Some(gene) = genome.gene_mut(survivor_gene_id) {
                            for protein in proteins {
                                if !gene.proteins.contains(&protein) {
                                    gene.proteins.push(protein);
                                }
                            }
                            for xref in xrefs {
                                if !gene.cross_references.contains(&xref) {
                                    gene.cross_references.push(xref);
                                }
                            }
                        }
                        genome.remove_gene(loser_gene_id);
                    }
                }
            }
        }

        genome.remove_protein(loser_id);
    }
}
