//! Chart handoff document.
//!
//! The renderer is an external concern; this bundle is everything it needs,
//! computed over the full dataset, serialized as one JSON document by the
//! `--charts` headless mode.

use serde::Serialize;

use crate::analysis::aggregate::{
    self, GanttRow, HeatmapCell, MonthlyCount, ScoreBucket, SentimentCount, SunburstSegment,
};
use crate::analysis::balloon::{self, Balloon};
use crate::analysis::features;
use crate::analysis::sentiment;
use crate::models::ReviewRecord;

use super::Dataset;

#[derive(Debug, Serialize)]
pub struct ChartBundle {
    pub balloons: [Option<Balloon>; 3],
    pub features: Vec<String>,
    pub timeline: Vec<MonthlyCount>,
    pub sentiment: Vec<SentimentCount>,
    pub histogram: Vec<ScoreBucket>,
    pub heatmap: Vec<HeatmapCell>,
    pub sunburst: Vec<SunburstSegment>,
    pub gantt: Vec<GanttRow>,
}

impl ChartBundle {
    pub fn compute(dataset: &Dataset, gantt_limit: usize) -> Self {
        let records: Vec<&ReviewRecord> = dataset.records.iter().collect();

        Self {
            balloons: balloon::sentiment_balloons(&records, &sentiment::BALLOON),
            features: features::feature_list(
                records
                    .iter()
                    .filter_map(|r| r.feature_description.as_deref()),
            ),
            timeline: aggregate::monthly_counts(&records),
            sentiment: aggregate::sentiment_distribution(&records, &sentiment::DETAIL),
            histogram: aggregate::score_histogram(&records),
            heatmap: aggregate::heatmap(&records),
            sunburst: aggregate::sunburst(&records, &sentiment::DETAIL),
            gantt: aggregate::gantt(&records, gantt_limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn bundle_serializes_every_table() {
        let dataset = Dataset {
            records: vec![ReviewRecord {
                at: NaiveDate::from_ymd_opt(2024, 1, 15)
                    .unwrap()
                    .and_hms_opt(10, 0, 0),
                content: "great call quality".to_string(),
                score: 5.0,
                app_version: Some("44.1".to_string()),
                release_version: Some("44.1".to_string()),
                review_created_version: Some("44.1".to_string()),
                release_date: NaiveDate::from_ymd_opt(2024, 1, 10),
                feature_description: Some("Audio#Video".to_string()),
            }],
        };

        let bundle = ChartBundle::compute(&dataset, 20);
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&bundle).unwrap()).unwrap();

        assert_eq!(json["balloons"][0]["reviews"], 1);
        assert!(json["balloons"][2].is_null());
        assert_eq!(json["features"], serde_json::json!(["Audio", "Video"]));
        assert_eq!(json["timeline"][0]["month"], "2024-01");
        assert_eq!(json["gantt"][0]["release_version"], "44.1");
    }
}
