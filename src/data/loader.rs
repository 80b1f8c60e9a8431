//! Loads the merged review/release table from disk.
//!
//! The table is consumed as CSV with the source sheet's exact headers. The
//! dataset is loaded once and passed down; a reload is an explicit action,
//! never an implicit cache refresh.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::analysis::version;
use crate::error::{AppError, Result};
use crate::models::ReviewRecord;

/// One CSV row before parsing. Every cell arrives as text; dates and scores
/// are coerced afterwards so a bad cell degrades instead of failing the file.
#[derive(Debug, Deserialize)]
struct RawRow {
    at: Option<String>,
    content: Option<String>,
    score: Option<String>,
    #[serde(rename = "appVersion")]
    app_version: Option<String>,
    #[serde(rename = "Release Version")]
    release_version: Option<String>,
    #[serde(rename = "reviewCreatedVersion")]
    review_created_version: Option<String>,
    #[serde(rename = "Release Date")]
    release_date: Option<String>,
    #[serde(rename = "Feature Description")]
    feature_description: Option<String>,
}

/// Every column the merged sheet must carry.
const REQUIRED_COLUMNS: [&str; 8] = [
    "at",
    "content",
    "score",
    "appVersion",
    "Release Version",
    "reviewCreatedVersion",
    "Release Date",
    "Feature Description",
];

/// The loaded table. Explicit data-access boundary: constructed once at
/// startup (or on reload) and handed to the views.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<ReviewRecord>,
}

impl Dataset {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path).map_err(|e| {
            AppError::Data(format!("cannot read {}: {}", path.display(), e))
        })?;

        let headers = reader.headers()?.clone();
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|h| h == *column))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::Data(format!(
                "{} is missing columns: {}",
                path.display(),
                missing.join(", ")
            )));
        }

        let mut records = Vec::new();
        for row in reader.deserialize::<RawRow>() {
            let row = row?;
            records.push(parse_row(row));
        }

        tracing::debug!("Loaded {} records from {}", records.len(), path.display());
        Ok(Self { records })
    }

    /// Distinct `appVersion` labels in balloon-selector order.
    pub fn app_versions(&self) -> Vec<String> {
        let mut versions: Vec<String> = self
            .records
            .iter()
            .filter_map(|r| r.app_version.clone())
            .collect();
        versions.sort();
        versions.dedup();
        version::sort_versions(versions)
    }

    /// Distinct `Release Version` labels in detail-selector order.
    pub fn release_versions(&self) -> Vec<String> {
        let mut versions: Vec<String> = self
            .records
            .iter()
            .filter_map(|r| r.release_version.clone())
            .collect();
        versions.sort();
        versions.dedup();
        versions.sort_by(|a, b| {
            version::version_key(a)
                .cmp(&version::version_key(b))
                .then_with(|| a.cmp(b))
        });
        versions
    }

    /// Earliest and latest review dates, for seeding the date-range filter.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let dates: Vec<NaiveDate> = self.records.iter().filter_map(|r| Some(r.at?.date())).collect();
        let first = dates.iter().min()?;
        let last = dates.iter().max()?;
        Some((*first, *last))
    }
}

fn parse_row(row: RawRow) -> ReviewRecord {
    ReviewRecord {
        at: row.at.as_deref().and_then(parse_datetime),
        content: row.content.unwrap_or_default(),
        score: row
            .score
            .as_deref()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .unwrap_or(0.0),
        app_version: non_empty(row.app_version),
        release_version: non_empty(row.release_version),
        review_created_version: non_empty(row.review_created_version),
        release_date: row
            .release_date
            .as_deref()
            .and_then(parse_datetime)
            .map(|dt| dt.date()),
        feature_description: non_empty(row.feature_description),
    }
}

fn non_empty(cell: Option<String>) -> Option<String> {
    cell.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Lenient timestamp parsing: unparseable cells become `None` instead of
/// failing the load.
fn parse_datetime(cell: &str) -> Option<NaiveDateTime> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }

    const FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
    for format in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cell, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(cell, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "at,content,score,appVersion,Release Version,reviewCreatedVersion,Release Date,Feature Description";

    fn write_csv(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file
    }

    #[test]
    fn loads_and_parses_rows() {
        let file = write_csv(&[
            "2024-01-15 10:30:00,great app,5,44.1,44.1,44.1,2024-01-10,Login#Search",
        ]);
        let dataset = Dataset::load(file.path()).unwrap();
        assert_eq!(dataset.records.len(), 1);

        let record = &dataset.records[0];
        assert_eq!(record.score, 5.0);
        assert_eq!(record.month().as_deref(), Some("2024-01"));
        assert_eq!(record.release_date, NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(record.feature_description.as_deref(), Some("Login#Search"));
    }

    #[test]
    fn bad_dates_become_none() {
        let file = write_csv(&["not a date,meh,3,1.0,1.0,1.0,also bad,"]);
        let dataset = Dataset::load(file.path()).unwrap();
        let record = &dataset.records[0];
        assert!(record.at.is_none());
        assert!(record.release_date.is_none());
        assert!(record.feature_description.is_none());
    }

    #[test]
    fn date_only_cells_parse_at_midnight() {
        let file = write_csv(&["2024-02-01,meh,3,1.0,1.0,1.0,,"]);
        let dataset = Dataset::load(file.path()).unwrap();
        let at = dataset.records[0].at.unwrap();
        assert_eq!(at.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-02-01 00:00:00");
    }

    #[test]
    fn bad_score_degrades_to_zero() {
        let file = write_csv(&["2024-02-01 08:00:00,meh,five,1.0,1.0,1.0,,"]);
        let dataset = Dataset::load(file.path()).unwrap();
        assert_eq!(dataset.records[0].score, 0.0);
    }

    #[test]
    fn missing_column_fails_the_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "at,content,score").unwrap();
        writeln!(file, "2024-01-01 00:00:00,hello,4").unwrap();
        assert!(Dataset::load(file.path()).is_err());
    }

    #[test]
    fn version_lists_are_sorted_numerically() {
        let file = write_csv(&[
            "2024-01-01 00:00:00,a,3,2.10,44.10,2.10,,",
            "2024-01-02 00:00:00,b,3,2.9,44.9,2.9,,",
            "2024-01-03 00:00:00,c,3,2.10,44.9,2.10,,",
        ]);
        let dataset = Dataset::load(file.path()).unwrap();
        assert_eq!(dataset.app_versions(), vec!["2.9", "2.10"]);
        assert_eq!(dataset.release_versions(), vec!["44.9", "44.10"]);
    }

    #[test]
    fn date_bounds_span_the_table() {
        let file = write_csv(&[
            "2024-03-05 12:00:00,a,3,1.0,1.0,1.0,,",
            "2024-01-15 08:00:00,b,3,1.0,1.0,1.0,,",
            ",c,3,1.0,1.0,1.0,,",
        ]);
        let dataset = Dataset::load(file.path()).unwrap();
        let (first, last) = dataset.date_bounds().unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }
}
