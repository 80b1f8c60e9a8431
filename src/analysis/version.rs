//! Version label ordering.
//!
//! Labels are arbitrary strings ("44.10.2", "v2.9", "beta"). Sorting them
//! lexically puts "2.10" before "2.9", so the sort key extracts every
//! embedded digit run and compares them as a sequence of integers.

use std::sync::OnceLock;

use regex::Regex;

fn digit_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("digit run pattern"))
}

/// Numeric sort key for a version label. Labels with no digits get an empty
/// key and sort before everything else.
pub fn version_key(label: &str) -> Vec<u64> {
    digit_runs()
        .find_iter(label)
        .filter_map(|m| m.as_str().parse::<u64>().ok())
        .collect()
}

/// Variant used by the balloon view's version selector: labels with no
/// digits key as `[0]` instead of sorting on an empty key.
pub fn version_key_or_zero(label: &str) -> Vec<u64> {
    let key = version_key(label);
    if key.is_empty() {
        vec![0]
    } else {
        key
    }
}

/// Sort a list of version labels by their numeric key, ties broken by label.
pub fn sort_versions(mut versions: Vec<String>) -> Vec<String> {
    versions.sort_by(|a, b| {
        version_key_or_zero(a)
            .cmp(&version_key_or_zero(b))
            .then_with(|| a.cmp(b))
    });
    versions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_digit_runs_as_integers() {
        assert_eq!(version_key("v2.10.3"), vec![2, 10, 3]);
        assert_eq!(version_key("44.1"), vec![44, 1]);
    }

    #[test]
    fn no_digits_yields_empty_or_zero_key() {
        // The two views diverge here: the detail page sorts digit-free labels
        // on an empty key, the balloon selector keys them as [0].
        assert_eq!(version_key("beta"), Vec::<u64>::new());
        assert_eq!(version_key_or_zero("beta"), vec![0]);
    }

    #[test]
    fn numeric_ordering_beats_lexical() {
        assert!(version_key("v2.9") < version_key("v2.10"));

        let sorted = sort_versions(vec![
            "2.10".to_string(),
            "2.9".to_string(),
            "2.1".to_string(),
        ]);
        assert_eq!(sorted, vec!["2.1", "2.9", "2.10"]);
    }

    #[test]
    fn digit_free_labels_sort_first() {
        let sorted = sort_versions(vec!["1.0".to_string(), "beta".to_string()]);
        assert_eq!(sorted, vec!["beta", "1.0"]);
    }

    #[test]
    fn leading_zeros_parse_numerically() {
        assert_eq!(version_key("v02.003"), vec![2, 3]);
    }
}
