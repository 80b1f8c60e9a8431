//! Balloon (lollipop) geometry.
//!
//! Each sentiment bucket renders as a circle on a stick: the circle radius
//! encodes the bucket's mean score and the stick length encodes the span
//! between its earliest and latest review. The mapping is a fixed formula;
//! the renderer just draws the numbers computed here.

use serde::Serialize;

use crate::models::ReviewRecord;

use super::sentiment::{Lexicon, Sentiment};

/// Mean-score domain mapped onto the radius range.
const SCORE_MIN: f64 = 3.2;
const SCORE_MAX: f64 = 5.0;
/// Circle radius range in pixels.
const RADIUS_MIN: f64 = 30.0;
const RADIUS_MAX: f64 = 80.0;
/// Converts a pixel length into plot data units.
const PIXEL_TO_DATA_RATIO: f64 = 2.0 / 600.0;
/// Days of review span per data unit of stick.
const DURATION_DIVISOR: f64 = 15.0;
/// Shortest allowed scaled duration.
const DURATION_FLOOR: f64 = 1.5;
/// Shortest allowed visible stick.
const STICK_FLOOR: f64 = 0.5;

/// Computed geometry and stats for one sentiment bucket.
#[derive(Debug, Clone, Serialize)]
pub struct Balloon {
    pub sentiment: Sentiment,
    pub reviews: usize,
    /// Mean score, rounded to two decimals before mapping.
    pub avg_score: f64,
    /// Whole days between the earliest and latest review in the bucket.
    pub duration_days: i64,
    pub duration_scaled: f64,
    /// Circle radius in pixels, mean score mapped from [3.2, 5.0] onto
    /// [30, 80] with clamping.
    pub pixel_radius: f64,
    /// Circle radius converted to data units.
    pub data_radius: f64,
    /// Visible stick length: the part not occluded by the circle.
    pub stick_height: f64,
    /// Vertical center of the circle, resting on the stick top.
    pub circle_y: f64,
}

/// Map a mean score onto the circle radius range, clamping out-of-domain
/// values to the endpoints.
pub fn score_to_radius(avg_score: f64) -> f64 {
    let norm = (avg_score - SCORE_MIN) / (SCORE_MAX - SCORE_MIN);
    let norm = norm.clamp(0.0, 1.0);
    RADIUS_MIN + norm * (RADIUS_MAX - RADIUS_MIN)
}

/// Map a review span in days onto the scaled stick length.
pub fn duration_to_length(duration_days: i64) -> f64 {
    (duration_days as f64 / DURATION_DIVISOR).max(DURATION_FLOOR)
}

/// Compute the balloon for one bucket of records. Empty bucket yields `None`.
pub fn balloon_for(sentiment: Sentiment, records: &[&ReviewRecord]) -> Option<Balloon> {
    if records.is_empty() {
        return None;
    }

    let reviews = records.len();
    let mean = records.iter().map(|r| r.score).sum::<f64>() / reviews as f64;
    let avg_score = (mean * 100.0).round() / 100.0;

    let timestamps: Vec<_> = records.iter().filter_map(|r| r.at).collect();
    let duration_days = match (timestamps.iter().min(), timestamps.iter().max()) {
        (Some(first), Some(last)) => (*last - *first).num_days(),
        _ => 0,
    };

    let duration_scaled = duration_to_length(duration_days);
    let pixel_radius = score_to_radius(avg_score);
    let data_radius = (pixel_radius / 2.0) * PIXEL_TO_DATA_RATIO;
    let stick_height = (duration_scaled - data_radius).max(STICK_FLOOR);
    let circle_y = stick_height + data_radius;

    Some(Balloon {
        sentiment,
        reviews,
        avg_score,
        duration_days,
        duration_scaled,
        pixel_radius,
        data_radius,
        stick_height,
        circle_y,
    })
}

/// Balloons for all three sentiment buckets in display order, classifying
/// each record with the given lexicon.
pub fn sentiment_balloons(records: &[&ReviewRecord], lexicon: &Lexicon) -> [Option<Balloon>; 3] {
    Sentiment::ORDER.map(|sentiment| {
        let bucket: Vec<&ReviewRecord> = records
            .iter()
            .copied()
            .filter(|r| lexicon.classify(&r.content) == sentiment)
            .collect();
        balloon_for(sentiment, &bucket)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::sentiment;
    use chrono::NaiveDate;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn record(content: &str, score: f64, day: u32) -> ReviewRecord {
        ReviewRecord {
            at: NaiveDate::from_ymd_opt(2024, 3, day)
                .unwrap()
                .and_hms_opt(12, 0, 0),
            content: content.to_string(),
            score,
            ..ReviewRecord::default()
        }
    }

    #[test]
    fn radius_maps_score_domain_linearly() {
        assert!(approx(score_to_radius(3.2), 30.0));
        assert!(approx(score_to_radius(5.0), 80.0));
        assert!(approx(score_to_radius(4.1), 55.0));
    }

    #[test]
    fn radius_clamps_outside_domain() {
        assert!(approx(score_to_radius(1.0), 30.0));
        assert!(approx(score_to_radius(5.5), 80.0));
    }

    #[test]
    fn duration_floors_at_minimum_length() {
        assert!(approx(duration_to_length(0), 1.5));
        assert!(approx(duration_to_length(30), 2.0));
    }

    #[test]
    fn circle_rests_on_stick_top() {
        let records = vec![record("great", 5.0, 1), record("great", 5.0, 31)];
        let refs: Vec<&ReviewRecord> = records.iter().collect();
        let balloon = balloon_for(Sentiment::Positive, &refs).unwrap();

        assert_eq!(balloon.reviews, 2);
        assert_eq!(balloon.duration_days, 30);
        assert!(approx(balloon.pixel_radius, 80.0));
        // data radius = (80 / 2) * (2 / 600)
        assert!(approx(balloon.data_radius, 80.0 / 600.0));
        assert!(approx(balloon.stick_height, 2.0 - 80.0 / 600.0));
        assert!(approx(balloon.circle_y, 2.0));
    }

    #[test]
    fn mean_score_rounds_to_two_decimals() {
        let records = vec![
            record("great", 4.0, 1),
            record("great", 4.0, 2),
            record("great", 5.0, 3),
        ];
        let refs: Vec<&ReviewRecord> = records.iter().collect();
        let balloon = balloon_for(Sentiment::Positive, &refs).unwrap();
        // 13 / 3 = 4.333... rounds to 4.33
        assert!(approx(balloon.avg_score, 4.33));
    }

    #[test]
    fn empty_bucket_yields_none() {
        assert!(balloon_for(Sentiment::Negative, &[]).is_none());
    }

    #[test]
    fn buckets_follow_display_order() {
        let records = vec![
            record("love it", 5.0, 1),
            record("plain", 3.0, 2),
            record("bad audio", 1.0, 3),
        ];
        let refs: Vec<&ReviewRecord> = records.iter().collect();
        let balloons = sentiment_balloons(&refs, &sentiment::BALLOON);

        assert_eq!(balloons[0].as_ref().unwrap().sentiment, Sentiment::Positive);
        assert_eq!(balloons[1].as_ref().unwrap().sentiment, Sentiment::Neutral);
        assert_eq!(balloons[2].as_ref().unwrap().sentiment, Sentiment::Negative);
    }

    #[test]
    fn missing_timestamps_count_as_zero_span() {
        let mut a = record("great", 4.0, 1);
        a.at = None;
        let records = vec![a];
        let refs: Vec<&ReviewRecord> = records.iter().collect();
        let balloon = balloon_for(Sentiment::Positive, &refs).unwrap();
        assert_eq!(balloon.duration_days, 0);
        assert!(approx(balloon.duration_scaled, 1.5));
    }
}
