//! Classification of component type and name from free-text descriptions.
//!
//! Upstream annotation frequently arrives without an explicit replicon
//! type; the only signal is the free-text description line ("Escherichia
//! coli plasmid pO157, complete sequence"). [`ClassificationRules`] maps
//! that text, together with the genome's superregnum, to a
//! ([`ComponentType`], name) pair.
//!
//! The rule table is ordered and the order is load-bearing: the first
//! matching pattern wins. Rules are compiled once and passed around by
//! reference; there is no global state.

use regex::Regex;

use crate::core::{ComponentType, GenomicComponent, Superregnum};

/// One entry of the fixed-order pattern table.
struct Rule {
    pattern: Regex,
    component_type: ComponentType,
    /// Name used when the pattern has no capture or the capture is empty
    default_name: Option<&'static str>,
}

impl Rule {
    fn new(pattern: &str, component_type: ComponentType, default_name: Option<&'static str>) -> Self {
        Self {
            // Table patterns are fixed literals, known to compile
            pattern: Regex::new(pattern).unwrap(),
            component_type,
            default_name,
        }
    }

    /// Returns the classification when the rule matches, with the captured
    /// name cleaned of trailing punctuation.
    fn apply(&self, description: &str) -> Option<(ComponentType, Option<String>)> {
        let captures = self.pattern.captures(description)?;
        let name = captures
            .get(1)
            .map(|m| m.as_str().trim_matches(|c| c == ',' || c == '.' || c == ';'))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| self.default_name.map(str::to_string));
        Some((self.component_type, name))
    }
}

/// Raw outcome of classifying a description, before the per-component
/// post-pass defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub component_type: Option<ComponentType>,
    pub name: Option<String>,
}

/// The compiled description-classification tables.
pub struct ClassificationRules {
    /// Prokaryote shortcuts tried in order when the description does not
    /// mention a plasmid; each forces CHROMOSOME.
    prokaryote_chromosome: Vec<Regex>,
    /// The generic fixed-order table; first match wins.
    table: Vec<Rule>,
}

impl ClassificationRules {
    pub fn new() -> Self {
        let prokaryote_chromosome = ["complete genome", "complete chromosome", "chromosome complete sequence"]
            .iter()
            .map(|phrase| Regex::new(&format!("(?i){phrase}")).unwrap())
            .collect();

        let table = vec![
            Rule::new(
                r"(?i)linkage group ([A-Za-z0-9_.\-]+)",
                ComponentType::Chromosome,
                None,
            ),
            Rule::new(r"(?i)\bLG[ _]?(\d+)\b", ComponentType::Chromosome, None),
            Rule::new(
                r"(?i)\bplasmid ([A-Za-z0-9'_.\-]+)",
                ComponentType::Plasmid,
                None,
            ),
            Rule::new(
                r"(?i)\bplasmid: ?([A-Za-z0-9'_.\-]+)",
                ComponentType::Plasmid,
                None,
            ),
            Rule::new(r"(?i)\bplasmid\b", ComponentType::Plasmid, Some("Plasmid")),
            Rule::new(r"(?i)mitochondri", ComponentType::Chromosome, Some("MT")),
            Rule::new(
                r"(?i)plastid|chloroplast",
                ComponentType::Chromosome,
                Some("Pt"),
            ),
            Rule::new(
                r"(?i)\bsegment:? ?([A-Za-z0-9_.\-]+)",
                ComponentType::Chromosome,
                None,
            ),
            Rule::new(
                r"(?i)\bscaffold[_: ]?([A-Za-z0-9_.\-]+)?",
                ComponentType::Supercontig,
                None,
            ),
            Rule::new(
                r"(?i)\bcontig[_: ]?([A-Za-z0-9_.\-]+)?",
                ComponentType::Contig,
                None,
            ),
            Rule::new(
                r"(?i)\bchromosome:? ?([A-Za-z0-9_.\-]+)?",
                ComponentType::Chromosome,
                None,
            ),
            Rule::new(
                r"(?i)whole genome shotgun",
                ComponentType::Contig,
                None,
            ),
        ];

        Self {
            prokaryote_chromosome,
            table,
        }
    }

    /// Classify a description. Pure, total and deterministic: every input,
    /// including the empty string, yields an outcome (possibly with both
    /// fields unset, which the post-pass turns into SUPERCONTIG named
    /// after the accession).
    #[must_use]
    pub fn classify(&self, description: &str, superregnum: Superregnum) -> Classification {
        // Prokaryote shortcut. A description mentioning a plasmid falls
        // through to the generic table; that is intentional, not an error.
        if superregnum.is_prokaryotic() && !description.to_lowercase().contains("plasmid") {
            for pattern in &self.prokaryote_chromosome {
                if pattern.is_match(description) {
                    return Classification {
                        component_type: Some(ComponentType::Chromosome),
                        name: None,
                    };
                }
            }
        }

        for rule in &self.table {
            if let Some((component_type, name)) = rule.apply(description) {
                return Classification {
                    component_type: Some(component_type),
                    name,
                };
            }
        }

        Classification {
            component_type: None,
            name: None,
        }
    }

    /// Classify a component in place. Runs only for components that have
    /// no type yet; applies the post-pass defaults:
    /// - an unnamed component is named after its accession,
    /// - a name equal to the literal "Chromosome" (any case) forces the
    ///   CHROMOSOME type,
    /// - anything still unclassified becomes a SUPERCONTIG.
    pub fn classify_component(&self, component: &mut GenomicComponent, superregnum: Superregnum) {
        if !component.is_classified() {
            let outcome = self.classify(&component.description, superregnum);
            component.component_type = outcome.component_type;
            if component.name.is_none() {
                component.name = outcome.name;
            }
        }

        if component.name.is_none() {
            component.name = Some(component.accession.clone());
        }
        if component
            .name
            .as_deref()
            .is_some_and(|n| n.eq_ignore_ascii_case("chromosome"))
        {
            component.component_type = Some(ComponentType::Chromosome);
        }
        if component.component_type.is_none() {
            component.component_type = Some(ComponentType::Supercontig);
        }
    }
}

impl Default for ClassificationRules {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(description: &str, superregnum: Superregnum) -> Classification {
        ClassificationRules::new().classify(description, superregnum)
    }

    #[test]
    fn test_bacterial_complete_genome_is_chromosome() {
        let outcome = classify(
            "Escherichia coli str. K-12 substr. MG1655, complete genome",
            Superregnum::Bacteria,
        );
        assert_eq!(outcome.component_type, Some(ComponentType::Chromosome));
    }

    #[test]
    fn test_bacterial_plasmid_skips_chromosome_shortcut() {
        // "plasmid" in the description bypasses the prokaryote shortcut
        // even though "complete genome" would match it
        let outcome = classify(
            "Escherichia coli plasmid pO157, complete genome",
            Superregnum::Bacteria,
        );
        assert_eq!(outcome.component_type, Some(ComponentType::Plasmid));
        assert_eq!(outcome.name.as_deref(), Some("pO157"));
    }

    #[test]
    fn test_plasmid_without_name_gets_default() {
        let outcome = classify("unnamed plasmid, complete sequence", Superregnum::Eukaryota);
        assert_eq!(outcome.component_type, Some(ComponentType::Plasmid));
        assert_eq!(outcome.name.as_deref(), Some("Plasmid"));
    }

    #[test]
    fn test_mitochondrion_default_name() {
        let outcome = classify(
            "Saccharomyces cerevisiae mitochondrion, complete sequence",
            Superregnum::Eukaryota,
        );
        assert_eq!(outcome.component_type, Some(ComponentType::Chromosome));
        assert_eq!(outcome.name.as_deref(), Some("MT"));
    }

    #[test]
    fn test_scaffold_and_contig() {
        let scaffold = classify("Danio rerio scaffold_102", Superregnum::Eukaryota);
        assert_eq!(scaffold.component_type, Some(ComponentType::Supercontig));
        assert_eq!(scaffold.name.as_deref(), Some("102"));

        let contig = classify("Danio rerio contig 57, whole genome shotgun sequence", Superregnum::Eukaryota);
        assert_eq!(contig.component_type, Some(ComponentType::Contig));
        assert_eq!(contig.name.as_deref(), Some("57"));
    }

    #[test]
    fn test_chromosome_capture() {
        let outcome = classify(
            "Danio rerio chromosome 12, Zv9 assembly",
            Superregnum::Eukaryota,
        );
        assert_eq!(outcome.component_type, Some(ComponentType::Chromosome));
        assert_eq!(outcome.name.as_deref(), Some("12"));
    }

    #[test]
    fn test_linkage_group() {
        let outcome = classify("Salmo salar linkage group 7", Superregnum::Eukaryota);
        assert_eq!(outcome.component_type, Some(ComponentType::Chromosome));
        assert_eq!(outcome.name.as_deref(), Some("7"));
    }

    #[test]
    fn test_total_on_any_input() {
        for description in ["", " ", "????", "no signal here at all"] {
            for superregnum in [
                Superregnum::Bacteria,
                Superregnum::Eukaryota,
                Superregnum::Unspecified,
            ] {
                // Must not panic; fields may be unset
                let _ = classify(description, superregnum);
            }
        }
    }

    #[test]
    fn test_post_pass_defaults() {
        let rules = ClassificationRules::new();
        let mut component =
            GenomicComponent::new("AB123456", 500).with_description("no signal here");
        rules.classify_component(&mut component, Superregnum::Eukaryota);
        assert_eq!(component.component_type, Some(ComponentType::Supercontig));
        assert_eq!(component.name.as_deref(), Some("AB123456"));
    }

    #[test]
    fn test_post_pass_literal_chromosome_name_forces_type() {
        let rules = ClassificationRules::new();
        let mut component = GenomicComponent::new("AB123456", 500);
        component.name = Some("Chromosome".to_string());
        rules.classify_component(&mut component, Superregnum::Eukaryota);
        assert_eq!(component.component_type, Some(ComponentType::Chromosome));
    }

    #[test]
    fn test_classification_runs_once() {
        let rules = ClassificationRules::new();
        let mut component =
            GenomicComponent::new("AB123456", 500).with_description("plasmid pABC");
        component.component_type = Some(ComponentType::Contig);
        rules.classify_component(&mut component, Superregnum::Bacteria);
        // Already classified: the description is not consulted again
        assert_eq!(component.component_type, Some(ComponentType::Contig));
    }
}
