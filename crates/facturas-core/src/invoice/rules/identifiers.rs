//! Invoice identifier extraction.

use regex::{Regex, RegexBuilder};

use super::patterns::default_identifier_patterns;
use super::{ExtractionMatch, FieldExtractor};

/// A named identifier pattern.
#[derive(Debug, Clone)]
pub struct PatternRule {
    name: String,
    pattern: Regex,
}

impl PatternRule {
    /// Compile a case-insensitive rule from a pattern string.
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        let pattern = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self::from_regex(name, pattern))
    }

    /// Wrap an already compiled regex. Case sensitivity is left as compiled.
    pub fn from_regex(name: impl Into<String>, pattern: Regex) -> Self {
        Self {
            name: name.into(),
            pattern,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

/// Ordered, immutable set of identifier rules.
///
/// Every rule is applied to the whole text. Matches are reported rule by rule
/// in priority order, then left to right within a rule. Rules may overlap and
/// the same text may be reported more than once; nothing is deduplicated.
#[derive(Debug, Clone)]
pub struct IdentifierRules {
    rules: Vec<PatternRule>,
}

impl IdentifierRules {
    pub fn new(rules: Vec<PatternRule>) -> Self {
        Self { rules }
    }

    /// The built-in rule table.
    pub fn builtin() -> Self {
        let rules = default_identifier_patterns()
            .into_iter()
            .map(|(name, re)| PatternRule::from_regex(name, re.clone()))
            .collect();
        Self { rules }
    }

    /// Append a lowest-priority rule.
    pub fn with_rule(mut self, rule: PatternRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for IdentifierRules {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FieldExtractor for IdentifierRules {
    type Output = ExtractionMatch<String>;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for rule in &self.rules {
            for m in rule.pattern.find_iter(text) {
                results.push(
                    ExtractionMatch::new(m.as_str().trim().to_string(), rule.name(), m.as_str())
                        .with_position(m.start(), m.end()),
                );
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn values(rules: &IdentifierRules, text: &str) -> Vec<String> {
        rules.extract_all(text).into_iter().map(|m| m.value).collect()
    }

    #[test]
    fn test_left_to_right_within_rule() {
        let rules = IdentifierRules::builtin();
        assert_eq!(
            values(&rules, "Factura FAC-001 por $ 1.200,50 y Factura FAC-002 por $ 300,00"),
            vec!["FAC-001", "FAC-002"]
        );
    }

    #[test]
    fn test_rule_priority_order() {
        let rules = IdentifierRules::builtin();
        // INVOICE (rule 6) appears first in the text but FAC (rule 1) wins
        assert_eq!(
            values(&rules, "INVOICE 55 luego FAC12"),
            vec!["FAC12", "INVOICE 55"]
        );
    }

    #[test]
    fn test_overlapping_rules_are_not_deduplicated() {
        let rules = IdentifierRules::builtin();
        let found = rules.extract_all("Nro Factura: FAC-9");

        let names: Vec<&str> = found.iter().map(|m| m.rule.as_str()).collect();
        assert_eq!(names, vec!["fac_code", "nro_factura_texto"]);
        assert_eq!(found[0].value, "FAC-9");
        assert_eq!(found[1].value, "Nro Factura: FAC-9");
    }

    #[test]
    fn test_free_text_variants() {
        let rules = IdentifierRules::builtin();
        assert_eq!(values(&rules, "Factura número: 4471"), vec!["Factura número: 4471"]);
        assert_eq!(values(&rules, "Factura ID: 88"), vec!["Factura ID: 88"]);
        assert_eq!(values(&rules, "Comprobante N° B-77"), vec!["Comprobante N° B-77"]);
        assert_eq!(values(&rules, "fact. 300"), vec!["fact. 300"]);
    }

    #[test]
    fn test_substituted_rules() {
        let rules = IdentifierRules::new(vec![PatternRule::new("ref", r"REF/\d+").unwrap()]);
        assert_eq!(values(&rules, "ref/1 FAC-2 REF/3"), vec!["ref/1", "REF/3"]);
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_with_rule_appends_last() {
        let rules = IdentifierRules::builtin()
            .with_rule(PatternRule::new("pedido", r"PEDIDO\s*\d+").unwrap());
        assert_eq!(values(&rules, "pedido 4 FAC-1"), vec!["FAC-1", "pedido 4"]);
    }

    #[test]
    fn test_positions_recorded() {
        let rules = IdentifierRules::builtin();
        let found = rules.extract("xx FAC-7").unwrap();
        assert_eq!(found.position, Some((3, 8)));
    }
}
