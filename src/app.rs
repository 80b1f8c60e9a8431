use chrono::NaiveDate;
use tokio::sync::mpsc;

use crate::analysis::aggregate::{
    self, GanttRow, HeatmapCell, MonthlyCount, ScoreBucket, SentimentCount, SunburstSegment,
};
use crate::analysis::balloon::{self, Balloon};
use crate::analysis::features;
use crate::analysis::sentiment;
use crate::config::Config;
use crate::data::{self, Dataset, TraceabilityRow};
use crate::error::Result;
use crate::models::{ReviewFilter, ReviewRecord, VersionSelection};
use crate::tui::AppAction;

// Message for a completed background reload
pub struct ReloadResult {
    pub result: std::result::Result<Dataset, String>,
}

/// The two dashboard pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Balloon,
    Detail,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::Balloon => "Sentiment Balloons",
            View::Detail => "Traceability Detail",
        }
    }
}

/// Which table occupies the detail view's lower pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTable {
    #[default]
    Traceability,
    Heatmap,
    Sunburst,
    Gantt,
}

impl DetailTable {
    pub fn cycle(&self) -> Self {
        match self {
            DetailTable::Traceability => DetailTable::Heatmap,
            DetailTable::Heatmap => DetailTable::Sunburst,
            DetailTable::Sunburst => DetailTable::Gantt,
            DetailTable::Gantt => DetailTable::Traceability,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DetailTable::Traceability => "Traceability",
            DetailTable::Heatmap => "Heatmap",
            DetailTable::Sunburst => "Sunburst",
            DetailTable::Gantt => "Gantt",
        }
    }
}

pub struct App {
    // Data
    pub dataset: Dataset,
    pub app_versions: Vec<String>,
    pub release_versions: Vec<String>,

    // UI state
    pub view: View,
    /// Index into the balloon version selector; 0 is "All Versions".
    pub app_version_index: usize,
    /// Index into the detail version selector; 0 is "All Versions".
    pub release_version_index: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub detail_table: DetailTable,
    pub table_offset: usize,
    pub show_help: bool,
    pub date_input_active: bool,
    pub date_input: String,
    pub status: Option<String>,

    // Async state
    pub is_loading: bool,
    reload_rx: mpsc::Receiver<ReloadResult>,
    reload_tx: mpsc::Sender<ReloadResult>,

    config: Config,
}

impl App {
    pub async fn new(config: &Config) -> Result<Self> {
        let dataset = load_blocking(config.data_path.clone()).await?;

        let app_versions = dataset.app_versions();
        let release_versions = dataset.release_versions();

        let (reload_tx, reload_rx) = mpsc::channel(1);

        Ok(Self {
            dataset,
            app_versions,
            release_versions,
            view: View::Balloon,
            app_version_index: 0,
            release_version_index: 0,
            date_range: None,
            detail_table: DetailTable::default(),
            table_offset: 0,
            show_help: false,
            date_input_active: false,
            date_input: String::new(),
            status: None,
            is_loading: false,
            reload_rx,
            reload_tx,
            config: config.clone(),
        })
    }

    // Filters

    pub fn selected_app_version(&self) -> VersionSelection {
        match self.app_version_index.checked_sub(1) {
            Some(i) => VersionSelection::One(self.app_versions[i].clone()),
            None => VersionSelection::All,
        }
    }

    pub fn selected_release_version(&self) -> VersionSelection {
        match self.release_version_index.checked_sub(1) {
            Some(i) => VersionSelection::One(self.release_versions[i].clone()),
            None => VersionSelection::All,
        }
    }

    /// The balloon view filters on app version only.
    pub fn balloon_filter(&self) -> ReviewFilter {
        ReviewFilter {
            app_version: self.selected_app_version(),
            ..ReviewFilter::default()
        }
    }

    /// The detail view filters on release version and review date range.
    pub fn detail_filter(&self) -> ReviewFilter {
        ReviewFilter {
            release_version: self.selected_release_version(),
            date_range: self.date_range,
            ..ReviewFilter::default()
        }
    }

    fn current_filter(&self) -> ReviewFilter {
        match self.view {
            View::Balloon => self.balloon_filter(),
            View::Detail => self.detail_filter(),
        }
    }

    pub fn filtered_records(&self) -> Vec<&ReviewRecord> {
        self.current_filter().apply(&self.dataset.records)
    }

    // Computed views. Each call recomputes from the filtered subset; there
    // is no cached intermediate state to invalidate.

    pub fn balloons(&self) -> [Option<Balloon>; 3] {
        let records = self.balloon_filter().apply(&self.dataset.records);
        balloon::sentiment_balloons(&records, &sentiment::BALLOON)
    }

    pub fn feature_list(&self) -> Vec<String> {
        let records = self.balloon_filter().apply(&self.dataset.records);
        features::feature_list(
            records
                .iter()
                .filter_map(|r| r.feature_description.as_deref()),
        )
    }

    pub fn monthly_counts(&self) -> Vec<MonthlyCount> {
        aggregate::monthly_counts(&self.filtered_records())
    }

    pub fn sentiment_distribution(&self) -> Vec<SentimentCount> {
        aggregate::sentiment_distribution(&self.filtered_records(), &sentiment::DETAIL)
    }

    pub fn score_histogram(&self) -> Vec<ScoreBucket> {
        aggregate::score_histogram(&self.filtered_records())
    }

    pub fn heatmap(&self) -> Vec<HeatmapCell> {
        aggregate::heatmap(&self.filtered_records())
    }

    pub fn sunburst(&self) -> Vec<SunburstSegment> {
        aggregate::sunburst(&self.filtered_records(), &sentiment::DETAIL)
    }

    pub fn gantt(&self) -> Vec<GanttRow> {
        aggregate::gantt(&self.filtered_records(), self.config.gantt_limit)
    }

    pub fn traceability(&self) -> Vec<TraceabilityRow> {
        let lexicon = match self.view {
            View::Balloon => sentiment::BALLOON,
            View::Detail => sentiment::DETAIL,
        };
        data::traceability_rows(&self.filtered_records(), &lexicon)
    }

    // Actions

    pub async fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::Quit => return Ok(true),

            AppAction::SwitchView => {
                self.view = match self.view {
                    View::Balloon => View::Detail,
                    View::Detail => View::Balloon,
                };
                self.table_offset = 0;
                self.status = None;
            }

            AppAction::PrevVersion => {
                let index = self.version_index_mut();
                if *index > 0 {
                    *index -= 1;
                    self.table_offset = 0;
                }
            }

            AppAction::NextVersion => {
                let len = match self.view {
                    View::Balloon => self.app_versions.len(),
                    View::Detail => self.release_versions.len(),
                };
                let index = self.version_index_mut();
                if *index < len {
                    *index += 1;
                    self.table_offset = 0;
                }
            }

            AppAction::CycleTable => {
                self.detail_table = self.detail_table.cycle();
                self.table_offset = 0;
            }

            AppAction::ScrollUp => {
                self.table_offset = self.table_offset.saturating_sub(1);
            }

            AppAction::ScrollDown => {
                let len = self.table_len();
                if self.table_offset + 1 < len {
                    self.table_offset += 1;
                }
            }

            AppAction::ExportCsv => {
                self.export_csv()?;
            }

            AppAction::ReloadData => {
                self.reload_data();
            }

            AppAction::EditDateRange => {
                self.date_input_active = true;
                // Prefill with the active range, or the full span of the data.
                self.date_input = self
                    .date_range
                    .or_else(|| self.dataset.date_bounds())
                    .map(|(start, end)| format!("{start}..{end}"))
                    .unwrap_or_default();
            }

            AppAction::ClearDateRange => {
                self.date_range = None;
                self.table_offset = 0;
                self.status = Some("Date filter cleared".to_string());
            }

            AppAction::ShowHelp => {
                self.show_help = true;
            }

            AppAction::HideHelp => {
                self.show_help = false;
            }

            AppAction::DateInputChar(c) => {
                self.date_input.push(c);
            }

            AppAction::DateInputBackspace => {
                self.date_input.pop();
            }

            AppAction::DateInputConfirm => {
                self.apply_date_input();
                self.date_input_active = false;
                self.date_input.clear();
            }

            AppAction::DateInputCancel => {
                self.date_input_active = false;
                self.date_input.clear();
            }
        }

        Ok(false)
    }

    /// Row count of whichever list the scroll offset currently pages.
    fn table_len(&self) -> usize {
        match self.view {
            View::Balloon => self.feature_list().len(),
            View::Detail => match self.detail_table {
                DetailTable::Traceability => self.filtered_records().len(),
                DetailTable::Heatmap => self.heatmap().len(),
                DetailTable::Sunburst => self.sunburst().len(),
                DetailTable::Gantt => self.gantt().len(),
            },
        }
    }

    fn version_index_mut(&mut self) -> &mut usize {
        match self.view {
            View::Balloon => &mut self.app_version_index,
            View::Detail => &mut self.release_version_index,
        }
    }

    fn apply_date_input(&mut self) {
        let input = self.date_input.trim().to_string();
        if input.is_empty() {
            self.date_range = None;
            self.table_offset = 0;
            self.status = Some("Date filter cleared".to_string());
            return;
        }

        match parse_date_range(&input) {
            Some(range) => {
                self.date_range = Some(range);
                self.table_offset = 0;
                self.status = Some(format!("Showing {} to {}", range.0, range.1));
            }
            None => {
                self.status =
                    Some("Invalid range, expected YYYY-MM-DD..YYYY-MM-DD".to_string());
            }
        }
    }

    fn export_csv(&mut self) -> Result<()> {
        let rows = self.traceability();
        let count = rows.len();
        let path = self.config.export_path.clone();

        let written = data::csv_bytes(&rows)
            .and_then(|bytes| std::fs::write(&path, bytes).map_err(Into::into));
        match written {
            Ok(()) => {
                tracing::info!("Exported {} rows to {}", count, path);
                self.status = Some(format!("Exported {count} rows to {path}"));
            }
            Err(e) => {
                tracing::error!("Export failed: {}", e);
                self.status = Some(format!("Export failed: {e}"));
            }
        }
        Ok(())
    }

    fn reload_data(&mut self) {
        if self.is_loading {
            return;
        }
        self.is_loading = true;

        let path = self.config.data_path.clone();
        let tx = self.reload_tx.clone();

        tokio::spawn(async move {
            let result = load_blocking(path).await.map_err(|e| e.to_string());
            let _ = tx.send(ReloadResult { result }).await;
        });
    }

    /// Poll for a completed background reload (non-blocking).
    pub fn poll_reload_result(&mut self) {
        if let Ok(reload) = self.reload_rx.try_recv() {
            match reload.result {
                Ok(dataset) => {
                    let count = dataset.records.len();
                    self.dataset = dataset;
                    self.app_versions = self.dataset.app_versions();
                    self.release_versions = self.dataset.release_versions();
                    self.app_version_index = self.app_version_index.min(self.app_versions.len());
                    self.release_version_index =
                        self.release_version_index.min(self.release_versions.len());
                    self.table_offset = 0;
                    self.status = Some(format!("Reloaded {count} records"));
                }
                Err(e) => {
                    tracing::error!("Failed to reload data: {}", e);
                    self.status = Some(format!("Reload failed: {e}"));
                }
            }
            self.is_loading = false;
        }
    }
}

async fn load_blocking(path: String) -> Result<Dataset> {
    tokio::task::spawn_blocking(move || Dataset::load(path))
        .await
        .map_err(|e| anyhow::anyhow!("load task failed: {}", e))?
}

/// Parse a `YYYY-MM-DD..YYYY-MM-DD` range, tolerating whitespace around the
/// separator. Returns `None` if either date fails to parse or the range is
/// reversed.
pub fn parse_date_range(input: &str) -> Option<(NaiveDate, NaiveDate)> {
    let (start, end) = input.split_once("..")?;
    let start = NaiveDate::parse_from_str(start.trim(), "%Y-%m-%d").ok()?;
    let end = NaiveDate::parse_from_str(end.trim(), "%Y-%m-%d").ok()?;
    if end < start {
        return None;
    }
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_plain_range() {
        let range = parse_date_range("2024-01-01..2024-03-31").unwrap();
        assert_eq!(range.0, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(range.1, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
    }

    #[test]
    fn tolerates_whitespace() {
        assert!(parse_date_range("2024-01-01 .. 2024-03-31").is_some());
    }

    #[test]
    fn rejects_reversed_and_malformed_ranges() {
        assert!(parse_date_range("2024-03-31..2024-01-01").is_none());
        assert!(parse_date_range("2024-01-01").is_none());
        assert!(parse_date_range("soon..later").is_none());
    }
}
