//! Resolve loosely typed names against known choices

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

/// Outcome of matching user input against a list of options
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Exact (case-insensitive) match or a single fuzzy candidate
    Found(String),
    /// Several fuzzy candidates, best first
    Ambiguous(Vec<String>),
    NotFound,
}

/// Match `input` against `options`.
///
/// A case-insensitive exact hit always wins; otherwise fuzzy candidates are
/// ranked and a clear winner (no tie at the top score) is accepted.
pub fn resolve(input: &str, options: &[String]) -> Resolution {
    let needle = input.trim();
    if needle.is_empty() {
        return Resolution::NotFound;
    }

    if let Some(exact) = options.iter().find(|o| o.to_lowercase() == needle.to_lowercase()) {
        return Resolution::Found(exact.clone());
    }

    let matcher = SkimMatcherV2::default().ignore_case();
    let mut scored: Vec<(String, i64)> = options
        .iter()
        .filter_map(|opt| matcher.fuzzy_match(opt, needle).map(|score| (opt.clone(), score)))
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    match scored.as_slice() {
        [] => Resolution::NotFound,
        [(only, _)] => Resolution::Found(only.clone()),
        [(best, top), (_, second), ..] if top > second => Resolution::Found(best.clone()),
        _ => Resolution::Ambiguous(scored.into_iter().take(10).map(|(opt, _)| opt).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn areas() -> Vec<String> {
        ["ALCALDÍA - OMAC", "HACIENDA", "RECURSOS HUMANOS", "URBANISMO"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_exact_match_ignores_case() {
        assert_eq!(resolve("hacienda", &areas()), Resolution::Found("HACIENDA".into()));
    }

    #[test]
    fn test_fuzzy_match_single_candidate() {
        assert_eq!(resolve("urban", &areas()), Resolution::Found("URBANISMO".into()));
        assert_eq!(resolve("rec hum", &areas()), Resolution::Found("RECURSOS HUMANOS".into()));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(resolve("zzz", &areas()), Resolution::NotFound);
        assert_eq!(resolve("   ", &areas()), Resolution::NotFound);
    }
}
