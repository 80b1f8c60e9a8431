use chrono::{NaiveDate, NaiveTime};

use super::ReviewRecord;

/// A single-value version selector, "All" or one specific label.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VersionSelection {
    #[default]
    All,
    One(String),
}

impl VersionSelection {
    pub fn matches(&self, version: Option<&str>) -> bool {
        match self {
            VersionSelection::All => true,
            VersionSelection::One(wanted) => version == Some(wanted.as_str()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            VersionSelection::All => "All Versions",
            VersionSelection::One(v) => v,
        }
    }
}

/// User-selected filters applied before every aggregation pass.
///
/// The balloon view drives `app_version`, the detail view drives
/// `release_version` and `date_range`. Filtering is a pure function over the
/// loaded slice; each interaction recomputes the subset from scratch.
#[derive(Debug, Clone, Default)]
pub struct ReviewFilter {
    pub app_version: VersionSelection,
    pub release_version: VersionSelection,
    /// Inclusive range on the review timestamp. Both endpoints compare as
    /// midnight timestamps, so the end date admits only its first instant.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl ReviewFilter {
    pub fn apply<'a>(&self, records: &'a [ReviewRecord]) -> Vec<&'a ReviewRecord> {
        records.iter().filter(|r| self.accepts(r)).collect()
    }

    pub fn accepts(&self, record: &ReviewRecord) -> bool {
        if !self.app_version.matches(record.app_version.as_deref()) {
            return false;
        }
        if !self.release_version.matches(record.release_version.as_deref()) {
            return false;
        }
        if let Some((start, end)) = self.date_range {
            // Records with an unparseable timestamp never pass an active
            // date filter.
            let Some(at) = record.at else {
                return false;
            };
            let start_dt = start.and_time(NaiveTime::MIN);
            let end_dt = end.and_time(NaiveTime::MIN);
            if at < start_dt || at > end_dt {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(at: Option<&str>, app: &str, release: &str) -> ReviewRecord {
        ReviewRecord {
            at: at.map(|s| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            }),
            app_version: Some(app.to_string()),
            release_version: Some(release.to_string()),
            ..ReviewRecord::default()
        }
    }

    #[test]
    fn all_selection_matches_everything() {
        assert!(VersionSelection::All.matches(Some("1.0")));
        assert!(VersionSelection::All.matches(None));
    }

    #[test]
    fn one_selection_matches_exact_label() {
        let sel = VersionSelection::One("2.1".to_string());
        assert!(sel.matches(Some("2.1")));
        assert!(!sel.matches(Some("2.10")));
        assert!(!sel.matches(None));
    }

    #[test]
    fn date_range_is_inclusive_at_midnight() {
        let filter = ReviewFilter {
            date_range: Some((
                NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
            )),
            ..ReviewFilter::default()
        };

        assert!(filter.accepts(&record(Some("2024-01-10"), "1.0", "1.0")));
        assert!(filter.accepts(&record(Some("2024-01-20"), "1.0", "1.0")));
        assert!(!filter.accepts(&record(Some("2024-01-21"), "1.0", "1.0")));
        assert!(!filter.accepts(&record(Some("2024-01-09"), "1.0", "1.0")));
    }

    #[test]
    fn missing_timestamp_fails_active_date_filter() {
        let filter = ReviewFilter {
            date_range: Some((
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            )),
            ..ReviewFilter::default()
        };
        assert!(!filter.accepts(&record(None, "1.0", "1.0")));

        // Without a range the same record passes.
        assert!(ReviewFilter::default().accepts(&record(None, "1.0", "1.0")));
    }

    #[test]
    fn version_filters_compose() {
        let filter = ReviewFilter {
            app_version: VersionSelection::One("3.2".to_string()),
            release_version: VersionSelection::One("44.1".to_string()),
            date_range: None,
        };
        assert!(filter.accepts(&record(Some("2024-05-01"), "3.2", "44.1")));
        assert!(!filter.accepts(&record(Some("2024-05-01"), "3.2", "44.2")));
        assert!(!filter.accepts(&record(Some("2024-05-01"), "3.3", "44.1")));
    }
}
