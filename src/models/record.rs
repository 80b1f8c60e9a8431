use chrono::{NaiveDate, NaiveDateTime};

/// One row of the merged review/release table.
///
/// Dates are parsed leniently at load time: cells that fail to parse become
/// `None` and drop out of date-based filters and month-keyed aggregates.
#[derive(Debug, Clone, Default)]
pub struct ReviewRecord {
    /// Review submission timestamp (`at` column).
    pub at: Option<NaiveDateTime>,
    /// Review text (`content` column).
    pub content: String,
    /// Star score, nominally 1-5 (`score` column).
    pub score: f64,
    /// Version the store reports the app at (`appVersion` column).
    pub app_version: Option<String>,
    /// Release the review was matched to (`Release Version` column).
    pub release_version: Option<String>,
    /// Version the review was written against (`reviewCreatedVersion` column).
    pub review_created_version: Option<String>,
    /// Ship date of the matched release (`Release Date` column).
    pub release_date: Option<NaiveDate>,
    /// `#`-delimited feature names packed into one cell (`Feature Description` column).
    pub feature_description: Option<String>,
}

impl ReviewRecord {
    /// Month bucket of the review timestamp, formatted `YYYY-MM`.
    pub fn month(&self) -> Option<String> {
        self.at.map(|dt| dt.format("%Y-%m").to_string())
    }
}
