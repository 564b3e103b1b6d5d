//! Substring matching of target terms against observed values

use std::fmt::Display;

/// Target terms still unsatisfied for one file
///
/// Matching consumes terms, so each file works on its own set built from the
/// configured terms.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TargetSet {
    terms: Vec<String>,
}

impl TargetSet {
    /// Build a working set from target terms, keeping their order
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { terms: terms.into_iter().map(Into::into).collect() }
    }

    /// Whether every term has been found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of terms still to find
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Terms still to find
    #[must_use]
    pub fn remaining(&self) -> &[String] {
        &self.terms
    }

    /// Remove every term contained in `text`, returning how many were removed
    pub fn consume_matches(&mut self, text: &str) -> usize {
        let before = self.terms.len();
        self.terms.retain(|term| !text.contains(term.as_str()));
        before - self.terms.len()
    }
}

/// Consume targets found as substrings of the observed values
///
/// Returns `true` once every target has been found somewhere in `observed`,
/// not necessarily in the same value. Stops reading `observed` as soon as the
/// set is empty, so an already-empty set reads nothing.
pub fn match_targets<I>(observed: I, targets: &mut TargetSet) -> bool
where
    I: IntoIterator,
    I::Item: Display,
{
    if targets.is_empty() {
        return true;
    }

    for value in observed {
        targets.consume_matches(&value.to_string());
        if targets.is_empty() {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn targets(terms: &[&str]) -> TargetSet {
        TargetSet::new(terms.iter().copied())
    }

    #[test]
    fn test_all_terms_found_across_values() {
        let mut set = targets(&["42", "Acme"]);
        assert!(match_targets(["Acme Corp", "42.5"], &mut set));
        assert!(set.is_empty());
    }

    #[test]
    fn test_partial_match_consumes_found_terms() {
        let mut set = targets(&["Budget", "Q3", "Forecast"]);
        assert!(!match_targets(["Budget2024", "Summary"], &mut set));
        assert_eq!(set.remaining(), ["Q3", "Forecast"]);
    }

    #[test]
    fn test_single_value_satisfies_several_terms() {
        let mut set = targets(&["Acme", "Corp", "zzz"]);
        assert!(!match_targets(["Acme Corp"], &mut set));
        assert_eq!(set.remaining(), ["zzz"]);
    }

    #[test]
    fn test_duplicate_terms_removed_together() {
        let mut set = targets(&["a", "a"]);
        assert!(match_targets(["abc"], &mut set));
    }

    #[test]
    fn test_case_sensitive_and_untrimmed() {
        let mut set = targets(&["acme"]);
        assert!(!match_targets(["Acme", "ACME"], &mut set));

        let mut set = targets(&[" 42"]);
        assert!(!match_targets(["42"], &mut set));
        assert!(match_targets(["x 42"], &mut set));
    }

    #[test]
    fn test_numeric_values_use_string_form() {
        let mut set = targets(&["42", "3.5"]);
        assert!(match_targets([42.5_f64, 13.5], &mut set));
    }

    #[test]
    fn test_empty_set_reads_nothing() {
        let reads = Cell::new(0);
        let observed = ["a", "b"].into_iter().inspect(|_| reads.set(reads.get() + 1));

        let mut set = TargetSet::default();
        assert!(match_targets(observed, &mut set));
        assert_eq!(reads.get(), 0);
    }

    #[test]
    fn test_stops_once_set_is_empty() {
        let reads = Cell::new(0);
        let observed = ["hit", "more", "values"].into_iter().inspect(|_| reads.set(reads.get() + 1));

        let mut set = targets(&["hit"]);
        assert!(match_targets(observed, &mut set));
        assert_eq!(reads.get(), 1);
    }

    #[test]
    fn test_order_does_not_change_outcome() {
        let values = ["Summary", "Budget2024", "Acme Corp", "42.5"];
        let terms = ["Acme", "2024", "42"];

        let mut forward = targets(&terms);
        let mut reverse = targets(&terms);
        assert_eq!(
            match_targets(values, &mut forward),
            match_targets(values.iter().rev(), &mut reverse)
        );
        assert!(forward.is_empty() && reverse.is_empty());
    }

    #[test]
    fn test_removing_values_never_adds_matches() {
        let values = ["Acme Corp", "42.5", "Budget"];
        let terms = ["Acme", "42"];
        assert!(match_targets(values, &mut targets(&terms)));

        for skip in 0..values.len() {
            let fewer = values.iter().enumerate().filter(|(i, _)| *i != skip).map(|(_, v)| v);
            let found = match_targets(fewer, &mut targets(&terms));
            // "Budget" credits nothing, so only dropping it keeps the match.
            assert_eq!(found, skip == 2);
        }

        let mut set = targets(&["zzz"]);
        assert!(!match_targets(values, &mut set));
        assert!(!match_targets(&values[..1], &mut targets(&["zzz"])));
    }

    #[test]
    fn test_no_values_leaves_targets() {
        let mut set = targets(&["zzz"]);
        assert!(!match_targets(Vec::<String>::new(), &mut set));
        assert_eq!(set.len(), 1);
    }
}
