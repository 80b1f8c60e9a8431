//! Traceability table and CSV export.
//!
//! The export carries the source sheet's column names, swaps the packed
//! `#`-delimited feature cell for a cleaned `"; "`-joined list, and adds the
//! derived Sentiment column.

use std::path::Path;

use serde::Serialize;

use crate::analysis::features;
use crate::analysis::sentiment::{Lexicon, Sentiment};
use crate::error::Result;
use crate::models::ReviewRecord;

/// One row of the filtered traceability table.
#[derive(Debug, Clone, Serialize)]
pub struct TraceabilityRow {
    pub at: String,
    pub content: String,
    pub score: f64,
    #[serde(rename = "Sentiment")]
    pub sentiment: Sentiment,
    #[serde(rename = "reviewCreatedVersion")]
    pub review_created_version: String,
    #[serde(rename = "Feature Description")]
    pub feature_description: String,
    #[serde(rename = "Release Date")]
    pub release_date: String,
}

/// Build the row-level table for the current filtered subset.
pub fn traceability_rows(records: &[&ReviewRecord], lexicon: &Lexicon) -> Vec<TraceabilityRow> {
    records
        .iter()
        .map(|record| TraceabilityRow {
            at: record
                .at
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
            content: record.content.clone(),
            score: record.score,
            sentiment: lexicon.classify(&record.content),
            review_created_version: record.review_created_version.clone().unwrap_or_default(),
            feature_description: record
                .feature_description
                .as_deref()
                .map(|packed| features::split_features(packed).join("; "))
                .unwrap_or_default(),
            release_date: record
                .release_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        })
        .collect()
}

/// Serialize the table to CSV in memory.
pub fn csv_bytes(rows: &[TraceabilityRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("CSV buffer flush failed: {}", e).into())
}

/// Write the table to a file.
pub fn write_csv_file<P: AsRef<Path>>(path: P, rows: &[TraceabilityRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::sentiment;
    use chrono::NaiveDate;

    fn record(content: &str, features: Option<&str>) -> ReviewRecord {
        ReviewRecord {
            at: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(10, 30, 0),
            content: content.to_string(),
            score: 4.0,
            review_created_version: Some("44.1".to_string()),
            release_date: NaiveDate::from_ymd_opt(2024, 1, 10),
            feature_description: features.map(str::to_string),
            ..ReviewRecord::default()
        }
    }

    #[test]
    fn rows_carry_derived_sentiment() {
        let records = vec![record("great app", None), record("login issue", None)];
        let refs: Vec<&ReviewRecord> = records.iter().collect();
        let rows = traceability_rows(&refs, &sentiment::DETAIL);

        assert_eq!(rows[0].sentiment, Sentiment::Positive);
        assert_eq!(rows[1].sentiment, Sentiment::Negative);
    }

    #[test]
    fn feature_cell_is_cleaned_for_export() {
        let records = vec![record("ok", Some("Search#Login# Search "))];
        let refs: Vec<&ReviewRecord> = records.iter().collect();
        let rows = traceability_rows(&refs, &sentiment::DETAIL);
        assert_eq!(rows[0].feature_description, "Login; Search");
    }

    #[test]
    fn filtered_export_contains_exactly_the_in_range_rows() {
        use crate::data::Dataset;
        use crate::models::ReviewFilter;
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "at,content,score,appVersion,Release Version,reviewCreatedVersion,Release Date,Feature Description"
        )
        .unwrap();
        for line in [
            "2024-01-05 10:00:00,great app,5,44.1,44.1,44.1,2024-01-01,Login",
            "2024-01-15 09:00:00,login issue again,2,44.1,44.1,44.1,2024-01-01,Login",
            "2024-01-20 18:30:00,love the new layout,5,44.2,44.2,44.2,2024-01-18,Layout",
            "2024-02-10 00:00:00,just fine,3,44.2,44.2,44.2,2024-01-18,Layout",
            "2024-02-10 08:00:00,bad audio,1,44.2,44.2,44.2,2024-01-18,Audio",
        ] {
            writeln!(file, "{line}").unwrap();
        }

        let dataset = Dataset::load(file.path()).unwrap();
        let filter = ReviewFilter {
            date_range: Some((
                NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
            )),
            ..ReviewFilter::default()
        };

        let filtered = filter.apply(&dataset.records);
        let rows = traceability_rows(&filtered, &sentiment::DETAIL);

        // The 05 Jan row precedes the range; the 10 Feb 08:00 row falls
        // after the range end's midnight instant.
        let text = String::from_utf8(csv_bytes(&rows).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("login issue again,2.0,Negative"));
        assert!(lines[2].contains("love the new layout,5.0,Positive"));
        assert!(lines[3].contains("just fine,3.0,Neutral"));
        assert!(!text.contains("great app"));
        assert!(!text.contains("bad audio"));
    }

    #[test]
    fn csv_has_source_sheet_headers() {
        let records = vec![record("great app", Some("Login"))];
        let refs: Vec<&ReviewRecord> = records.iter().collect();
        let rows = traceability_rows(&refs, &sentiment::DETAIL);

        let bytes = csv_bytes(&rows).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "at,content,score,Sentiment,reviewCreatedVersion,Feature Description,Release Date"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2024-01-15 10:30:00,great app,4.0,Positive,44.1,Login,2024-01-10"
        );
    }
}
