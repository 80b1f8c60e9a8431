//! Feature description unpacking.
//!
//! The source sheet packs feature names into one cell separated by `#`.

use std::collections::BTreeSet;

/// Split one packed cell into trimmed, non-empty feature names.
pub fn split_features(packed: &str) -> Vec<String> {
    packed
        .split('#')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Collect the distinct feature names across many packed cells, sorted
/// alphabetically for display.
pub fn feature_list<'a, I>(cells: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let set: BTreeSet<String> = cells
        .into_iter()
        .flat_map(|cell| split_features(cell))
        .collect();
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_trims_and_drops_empties() {
        assert_eq!(
            split_features("Login#Search # Export"),
            vec!["Login", "Search", "Export"]
        );
        assert_eq!(split_features("##  ##"), Vec::<String>::new());
    }

    #[test]
    fn list_is_deduplicated_and_sorted() {
        let cells = ["Search#Login", "Login# Export", "Export"];
        assert_eq!(
            feature_list(cells),
            vec!["Export", "Login", "Search"]
        );
    }

    #[test]
    fn empty_input_yields_empty_list() {
        assert!(feature_list(std::iter::empty::<&str>()).is_empty());
    }
}
