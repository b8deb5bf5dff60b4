use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::component::GenomicComponent;
use crate::core::feature::{Gene, GeneId, Protein, ProteinId, Transcript, TranscriptId};

/// Top-level taxonomic division of a genome, driving the prokaryote branch
/// of description classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Superregnum {
    Archaea,
    Bacteria,
    Eubacteria,
    Eukaryota,
    Viruses,
    #[default]
    Unspecified,
}

impl Superregnum {
    /// Bacterial, archaeal and eubacterial genomes share the prokaryote
    /// classification shortcuts.
    #[must_use]
    pub fn is_prokaryotic(&self) -> bool {
        matches!(self, Self::Archaea | Self::Bacteria | Self::Eubacteria)
    }

    /// Derive the superregnum from the leading entry of an NCBI-style
    /// lineage string.
    pub fn from_lineage(lineage: &str) -> Self {
        let head = lineage.split(';').next().unwrap_or("").trim();
        match head.to_lowercase().as_str() {
            "archaea" => Self::Archaea,
            "bacteria" => Self::Bacteria,
            "eubacteria" => Self::Eubacteria,
            "eukaryota" => Self::Eukaryota,
            "viruses" => Self::Viruses,
            _ => Self::Unspecified,
        }
    }
}

/// A genome model under construction.
///
/// Components are kept in an ordered map keyed by accession. Genes,
/// proteins and transcripts live in flat arenas owned by the genome;
/// relationships between them are id lists, so the graph has no reference
/// cycles and back-navigation goes through reverse lookups. A merged-away
/// record leaves a tombstone slot behind; ids are never reused within one
/// genome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genome {
    pub id: String,

    pub taxonomy_id: u64,

    #[serde(default)]
    pub lineage: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub superregnum: Superregnum,

    /// Components in assembly order, keyed by accession
    #[serde(default)]
    pub components: IndexMap<String, GenomicComponent>,

    genes: Vec<Option<Gene>>,
    proteins: Vec<Option<Protein>>,
    transcripts: Vec<Option<Transcript>>,
}

impl Genome {
    pub fn new(id: impl Into<String>, taxonomy_id: u64, superregnum: Superregnum) -> Self {
        Self {
            id: id.into(),
            taxonomy_id,
            lineage: String::new(),
            description: String::new(),
            superregnum,
            components: IndexMap::new(),
            genes: Vec::new(),
            proteins: Vec::new(),
            transcripts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach a component, replacing any previous one under the same
    /// accession while keeping its position in the assembly order.
    pub fn add_component(&mut self, component: GenomicComponent) {
        self.components
            .insert(component.accession.clone(), component);
    }

    /// Wholesale replacement of the component set, as performed by
    /// resolution. Any genes attached to previous components are dropped
    /// with them.
    pub fn replace_components(&mut self, components: Vec<GenomicComponent>) {
        self.components.clear();
        self.genes.clear();
        self.proteins.clear();
        self.transcripts.clear();
        for component in components {
            self.add_component(component);
        }
    }

    /// Add a gene to the arena and attach it to the named component.
    /// Returns `None` when no such component exists.
    pub fn add_gene(&mut self, accession: &str, gene: Gene) -> Option<GeneId> {
        let component = self.components.get_mut(accession)?;
        let id = GeneId(self.genes.len());
        component.genes.push(id);
        self.genes.push(Some(gene));
        Some(id)
    }

    /// Add a protein to the arena and link it under the given gene.
    pub fn add_protein(&mut self, gene_id: GeneId, protein: Protein) -> Option<ProteinId> {
        let id = ProteinId(self.proteins.len());
        let gene = self.genes.get_mut(gene_id.0)?.as_mut()?;
        gene.proteins.push(id);
        self.proteins.push(Some(protein));
        Some(id)
    }

    /// Add a transcript to the arena, linked both ways with the given
    /// protein.
    pub fn add_transcript(
        &mut self,
        protein_id: ProteinId,
        mut transcript: Transcript,
    ) -> Option<TranscriptId> {
        let id = TranscriptId(self.transcripts.len());
        let protein = self.proteins.get_mut(protein_id.0)?.as_mut()?;
        protein.transcripts.push(id);
        if !transcript.proteins.contains(&protein_id) {
            transcript.proteins.push(protein_id);
        }
        self.transcripts.push(Some(transcript));
        Some(id)
    }

    /// Link an existing transcript to an additional protein (shared
    /// transcript, many-to-many).
    pub fn link_transcript(&mut self, protein_id: ProteinId, transcript_id: TranscriptId) {
        if let Some(Some(protein)) = self.proteins.get_mut(protein_id.0) {
            if !protein.transcripts.contains(&transcript_id) {
                protein.transcripts.push(transcript_id);
            }
        }
        if let Some(Some(transcript)) = self.transcripts.get_mut(transcript_id.0) {
            if !transcript.proteins.contains(&protein_id) {
                transcript.proteins.push(protein_id);
            }
        }
    }

    #[must_use]
    pub fn gene(&self, id: GeneId) -> Option<&Gene> {
        self.genes.get(id.0)?.as_ref()
    }

    pub fn gene_mut(&mut self, id: GeneId) -> Option<&mut Gene> {
        self.genes.get_mut(id.0)?.as_mut()
    }

    #[must_use]
    pub fn protein(&self, id: ProteinId) -> Option<&Protein> {
        self.proteins.get(id.0)?.as_ref()
    }

    pub fn protein_mut(&mut self, id: ProteinId) -> Option<&mut Protein> {
        self.proteins.get_mut(id.0)?.as_mut()
    }

    #[must_use]
    pub fn transcript(&self, id: TranscriptId) -> Option<&Transcript> {
        self.transcripts.get(id.0)?.as_ref()
    }

    pub fn transcript_mut(&mut self, id: TranscriptId) -> Option<&mut Transcript> {
        self.transcripts.get_mut(id.0)?.as_mut()
    }

    /// Tombstone a gene and detach it from its component.
    pub fn remove_gene(&mut self, id: GeneId) {
        if let Some(slot) = self.genes.get_mut(id.0) {
            *slot = None;
        }
        for component in self.components.values_mut() {
            component.genes.retain(|g| *g != id);
        }
    }

    /// Tombstone a protein. The caller is responsible for detaching the id
    /// from gene and transcript lists.
    pub fn remove_protein(&mut self, id: ProteinId) {
        if let Some(slot) = self.proteins.get_mut(id.0) {
            *slot = None;
        }
    }

    /// Live gene ids, in arena order
    pub fn gene_ids(&self) -> impl Iterator<Item = GeneId> + '_ {
        self.genes
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| GeneId(i))
    }

    /// Live protein ids, in arena order
    pub fn protein_ids(&self) -> impl Iterator<Item = ProteinId> + '_ {
        self.proteins
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| ProteinId(i))
    }

    /// Live transcript ids, in arena order
    pub fn transcript_ids(&self) -> impl Iterator<Item = TranscriptId> + '_ {
        self.transcripts
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| TranscriptId(i))
    }

    /// Reverse lookup: accession of the component carrying a gene
    #[must_use]
    pub fn component_of_gene(&self, id: GeneId) -> Option<&str> {
        self.components
            .values()
            .find(|c| c.genes.contains(&id))
            .map(|c| c.accession.as_str())
    }

    /// Reverse lookup: gene owning a protein
    #[must_use]
    pub fn gene_of_protein(&self, id: ProteinId) -> Option<GeneId> {
        self.gene_ids()
            .find(|&g| self.gene(g).is_some_and(|gene| gene.proteins.contains(&id)))
    }

    #[must_use]
    pub fn live_gene_count(&self) -> usize {
        self.genes.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn live_protein_count(&self) -> usize {
        self.proteins.iter().filter(|slot| slot.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::location::{Location, Strand};

    fn genome_with_component() -> Genome {
        let mut genome = Genome::new("GCA_000001", 562, Superregnum::Bacteria);
        genome.add_component(GenomicComponent::new("CP000001", 1000));
        genome
    }

    #[test]
    fn test_superregnum_from_lineage() {
        assert_eq!(
            Superregnum::from_lineage("Bacteria; Proteobacteria; Gammaproteobacteria"),
            Superregnum::Bacteria
        );
        assert_eq!(
            Superregnum::from_lineage("Eukaryota; Fungi"),
            Superregnum::Eukaryota
        );
        assert_eq!(Superregnum::from_lineage(""), Superregnum::Unspecified);
    }

    #[test]
    fn test_arena_links() {
        let mut genome = genome_with_component();
        let gene = genome
            .add_gene("CP000001", Gene::new("b0001", Location::new(1, 100, Strand::Forward)))
            .unwrap();
        let protein = genome
            .add_protein(gene, Protein::new("P1", Location::new(1, 100, Strand::Forward)))
            .unwrap();
        let transcript = genome
            .add_transcript(protein, Transcript::new("T1", Location::new(1, 100, Strand::Forward)))
            .unwrap();

        assert_eq!(genome.gene(gene).unwrap().proteins, vec![protein]);
        assert_eq!(genome.protein(protein).unwrap().transcripts, vec![transcript]);
        assert_eq!(genome.transcript(transcript).unwrap().proteins, vec![protein]);
        assert_eq!(genome.component_of_gene(gene), Some("CP000001"));
        assert_eq!(genome.gene_of_protein(protein), Some(gene));
    }

    #[test]
    fn test_remove_gene_leaves_tombstone() {
        let mut genome = genome_with_component();
        let a = genome
            .add_gene("CP000001", Gene::new("b0001", Location::new(1, 100, Strand::Forward)))
            .unwrap();
        let b = genome
            .add_gene("CP000001", Gene::new("b0002", Location::new(200, 300, Strand::Forward)))
            .unwrap();

        genome.remove_gene(a);
        assert!(genome.gene(a).is_none());
        assert!(genome.gene(b).is_some());
        assert_eq!(genome.live_gene_count(), 1);
        assert_eq!(genome.components["CP000001"].genes, vec![b]);
    }

    #[test]
    fn test_replace_components_drops_features() {
        let mut genome = genome_with_component();
        genome
            .add_gene("CP000001", Gene::new("b0001", Location::new(1, 100, Strand::Forward)))
            .unwrap();

        genome.replace_components(vec![GenomicComponent::new("CP000002", 500)]);
        assert_eq!(genome.components.len(), 1);
        assert!(genome.components.contains_key("CP000002"));
        assert_eq!(genome.live_gene_count(), 0);
    }
}
