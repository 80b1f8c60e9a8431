//! Chart-ready aggregate tables for the detail view.
//!
//! Every function is a full recomputation over the filtered subset. Group
//! keys come back in deterministic order (months and version labels sort
//! lexically, matching the source dashboard's group-by output).

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::ReviewRecord;

use super::sentiment::{Lexicon, Sentiment};

/// Review volume for one `YYYY-MM` month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    pub month: String,
    pub count: usize,
}

/// One slice of the sentiment distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentimentCount {
    pub sentiment: Sentiment,
    pub count: usize,
}

/// One star bucket of the score histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBucket {
    pub score: u8,
    pub count: usize,
}

/// Mean score and volume for one (release version, month) cell.
#[derive(Debug, Clone, Serialize)]
pub struct HeatmapCell {
    pub release_version: String,
    pub month: String,
    pub avg_score: f64,
    pub review_count: usize,
}

/// Count for one (release version, month, sentiment) segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SunburstSegment {
    pub release_version: String,
    pub month: String,
    pub sentiment: Sentiment,
    pub count: usize,
}

/// One release window: first ship date to last review, with the release's
/// packed feature description and review volume.
#[derive(Debug, Clone, Serialize)]
pub struct GanttRow {
    pub release_version: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDateTime>,
    pub description: Option<String>,
    pub reviews: usize,
}

/// Review counts per month, ascending by month.
pub fn monthly_counts(records: &[&ReviewRecord]) -> Vec<MonthlyCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        if let Some(month) = record.month() {
            *counts.entry(month).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(month, count)| MonthlyCount { month, count })
        .collect()
}

/// Counts per sentiment bucket in display order. Empty buckets stay in the
/// table with a zero count.
pub fn sentiment_distribution(records: &[&ReviewRecord], lexicon: &Lexicon) -> Vec<SentimentCount> {
    let mut counts: BTreeMap<Sentiment, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(lexicon.classify(&record.content)).or_default() += 1;
    }
    Sentiment::ORDER
        .iter()
        .map(|&sentiment| SentimentCount {
            sentiment,
            count: counts.get(&sentiment).copied().unwrap_or(0),
        })
        .collect()
}

/// Counts per 1-5 star bucket. Scores round to the nearest star; values
/// outside the star range are ignored.
pub fn score_histogram(records: &[&ReviewRecord]) -> Vec<ScoreBucket> {
    let mut counts = [0usize; 5];
    for record in records {
        let star = record.score.round() as i64;
        if (1..=5).contains(&star) {
            counts[star as usize - 1] += 1;
        }
    }
    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| ScoreBucket {
            score: i as u8 + 1,
            count,
        })
        .collect()
}

/// Mean score and review count per (release version, month). Records missing
/// either key drop out of the pivot.
pub fn heatmap(records: &[&ReviewRecord]) -> Vec<HeatmapCell> {
    let mut cells: BTreeMap<(String, String), (f64, usize)> = BTreeMap::new();
    for record in records {
        let (Some(version), Some(month)) = (record.release_version.clone(), record.month()) else {
            continue;
        };
        let entry = cells.entry((version, month)).or_insert((0.0, 0));
        entry.0 += record.score;
        entry.1 += 1;
    }
    cells
        .into_iter()
        .map(|((release_version, month), (sum, count))| HeatmapCell {
            release_version,
            month,
            avg_score: sum / count as f64,
            review_count: count,
        })
        .collect()
}

/// Counts per (release version, month, sentiment) segment.
pub fn sunburst(records: &[&ReviewRecord], lexicon: &Lexicon) -> Vec<SunburstSegment> {
    let mut counts: BTreeMap<(String, String, Sentiment), usize> = BTreeMap::new();
    for record in records {
        let (Some(version), Some(month)) = (record.release_version.clone(), record.month()) else {
            continue;
        };
        let sentiment = lexicon.classify(&record.content);
        *counts.entry((version, month, sentiment)).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|((release_version, month, sentiment), count)| SunburstSegment {
            release_version,
            month,
            sentiment,
            count,
        })
        .collect()
}

/// Release windows for the Gantt view: per release version, the earliest
/// ship date, the latest review, the first packed feature description, and
/// the review count. Rows sort by start date (missing starts last) and the
/// list is capped to the `limit` earliest-starting versions.
pub fn gantt(records: &[&ReviewRecord], limit: usize) -> Vec<GanttRow> {
    struct Window {
        start: Option<NaiveDate>,
        end: Option<NaiveDateTime>,
        description: Option<String>,
        reviews: usize,
    }

    let mut windows: BTreeMap<String, Window> = BTreeMap::new();
    for record in records {
        let Some(version) = record.release_version.clone() else {
            continue;
        };
        let window = windows.entry(version).or_insert_with(|| Window {
            start: None,
            end: None,
            description: None,
            reviews: 0,
        });
        window.reviews += 1;
        if let Some(date) = record.release_date {
            window.start = Some(window.start.map_or(date, |d| d.min(date)));
        }
        if let Some(at) = record.at {
            window.end = Some(window.end.map_or(at, |e| e.max(at)));
        }
        if window.description.is_none() {
            window.description = record.feature_description.clone();
        }
    }

    let mut rows: Vec<GanttRow> = windows
        .into_iter()
        .map(|(release_version, w)| GanttRow {
            release_version,
            start: w.start,
            end: w.end,
            description: w.description,
            reviews: w.reviews,
        })
        .collect();

    rows.sort_by_key(|row| (row.start.is_none(), row.start));
    rows.truncate(limit);
    rows
}
