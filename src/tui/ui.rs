use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine},
        BarChart, Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Wrap,
    },
    Frame,
};

use crate::analysis::balloon::Balloon;
use crate::analysis::Sentiment;
use crate::app::{App, DetailTable, View};

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(0),    // Active view
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    match app.view {
        View::Balloon => render_balloon_view(frame, app, chunks[1]),
        View::Detail => render_detail_view(frame, app, chunks[1]),
    }

    render_status(frame, app, chunks[2]);

    // Render date input popup if active
    if app.date_input_active {
        render_date_input(frame, app);
    }

    // Render help popup if active
    if app.show_help {
        render_help(frame);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(" Balloon Board [{}] ", app.view.title());

    let filter_label = match app.view {
        View::Balloon => format!("App Version: {}", app.selected_app_version().label()),
        View::Detail => {
            let dates = match app.date_range {
                Some((start, end)) => format!("{start} to {end}"),
                None => "all dates".to_string(),
            };
            format!(
                "Release: {} | {}",
                app.selected_release_version().label(),
                dates
            )
        }
    };

    let stats = format!(
        " {} Reviews | {} Shown | {}",
        app.dataset.records.len(),
        app.filtered_records().len(),
        filter_label
    );

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = Paragraph::new(stats).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

// Balloon view

fn render_balloon_view(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(3, 5), // Balloon columns
            Constraint::Ratio(2, 5), // Feature descriptions
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[0]);

    let balloons = app.balloons();

    // One vertical scale shared across the three panels so stick lengths
    // stay comparable.
    let y_max = balloons
        .iter()
        .flatten()
        .map(|b| b.circle_y + b.data_radius)
        .fold(2.0_f64, f64::max);

    for (i, balloon) in balloons.iter().enumerate() {
        render_balloon_panel(frame, balloon.as_ref(), Sentiment::ORDER[i], y_max, columns[i]);
    }

    render_feature_list(frame, app, chunks[1]);
}

fn render_balloon_panel(
    frame: &mut Frame,
    balloon: Option<&Balloon>,
    sentiment: Sentiment,
    y_max: f64,
    area: Rect,
) {
    let color = sentiment_color(sentiment);
    let block = Block::default()
        .title(format!(" {sentiment} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let Some(balloon) = balloon else {
        let paragraph = Paragraph::new("No reviews").block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Balloon drawing
            Constraint::Length(3), // Stats
        ])
        .split(area);

    let stick_height = balloon.stick_height;
    let circle_y = balloon.circle_y;
    let radius = balloon.data_radius;

    let canvas = Canvas::default()
        .block(block)
        .x_bounds([-1.0, 1.0])
        .y_bounds([0.0, y_max])
        .paint(move |ctx| {
            ctx.draw(&CanvasLine {
                x1: 0.0,
                y1: 0.0,
                x2: 0.0,
                y2: stick_height,
                color: Color::Gray,
            });
            ctx.draw(&Circle {
                x: 0.0,
                y: circle_y,
                radius,
                color,
            });
        });
    frame.render_widget(canvas, chunks[0]);

    let stats = format!(
        "Avg Score: {:.2} | Reviews: {}\nDuration: {} days",
        balloon.avg_score, balloon.reviews, balloon.duration_days
    );
    let paragraph = Paragraph::new(stats)
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, chunks[1]);
}

fn render_feature_list(frame: &mut Frame, app: &App, area: Rect) {
    let features = app.feature_list();

    let block = Block::default()
        .title(" Feature Descriptions ")
        .borders(Borders::ALL);

    if features.is_empty() {
        let paragraph = Paragraph::new("No feature descriptions found for the selected version(s).")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = features
        .iter()
        .skip(app.table_offset)
        .map(|feature| {
            ListItem::new(Line::from(vec![
                Span::styled("• ", Style::default().fg(Color::Cyan)),
                Span::raw(feature.as_str()),
            ]))
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}

// Detail view

fn render_detail_view(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(12), // Chart row
            Constraint::Min(0),     // Active table
        ])
        .split(area);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(2, 5),
            Constraint::Ratio(2, 5),
            Constraint::Ratio(1, 5),
        ])
        .split(chunks[0]);

    render_timeline(frame, app, charts[0]);
    render_histogram(frame, app, charts[1]);
    render_distribution(frame, app, charts[2]);

    match app.detail_table {
        DetailTable::Traceability => render_traceability(frame, app, chunks[1]),
        DetailTable::Heatmap => render_heatmap(frame, app, chunks[1]),
        DetailTable::Sunburst => render_sunburst(frame, app, chunks[1]),
        DetailTable::Gantt => render_gantt(frame, app, chunks[1]),
    }
}

fn render_timeline(frame: &mut Frame, app: &App, area: Rect) {
    let counts = app.monthly_counts();
    let labeled: Vec<(String, u64)> = counts
        .iter()
        .map(|m| (m.month[2..].to_string(), m.count as u64))
        .collect();
    let data: Vec<(&str, u64)> = labeled
        .iter()
        .map(|(label, count)| (label.as_str(), *count))
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(" Reviews per Month ")
                .borders(Borders::ALL),
        )
        .data(&data)
        .bar_width(5)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));

    frame.render_widget(chart, area);
}

fn render_histogram(frame: &mut Frame, app: &App, area: Rect) {
    let buckets = app.score_histogram();
    let labeled: Vec<(String, u64)> = buckets
        .iter()
        .map(|b| (format!("{}*", b.score), b.count as u64))
        .collect();
    let data: Vec<(&str, u64)> = labeled
        .iter()
        .map(|(label, count)| (label.as_str(), *count))
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(" Score Distribution ")
                .borders(Borders::ALL),
        )
        .data(&data)
        .bar_width(4)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Yellow))
        .value_style(Style::default().fg(Color::Black).bg(Color::Yellow));

    frame.render_widget(chart, area);
}

fn render_distribution(frame: &mut Frame, app: &App, area: Rect) {
    let distribution = app.sentiment_distribution();
    let total: usize = distribution.iter().map(|s| s.count).sum();

    let lines: Vec<Line> = distribution
        .iter()
        .map(|slice| {
            let percent = if total > 0 {
                slice.count as f64 / total as f64 * 100.0
            } else {
                0.0
            };
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(sentiment_color(slice.sentiment))),
                Span::raw(format!("{}: {} ({percent:.0}%)", slice.sentiment, slice.count)),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Sentiment ")
            .borders(Borders::ALL),
    );
    frame.render_widget(paragraph, area);
}

fn render_traceability(frame: &mut Frame, app: &App, area: Rect) {
    let rows_data = app.traceability();
    let content_width = area.width.saturating_sub(44).max(20) as usize;

    let rows: Vec<Row> = rows_data
        .iter()
        .skip(app.table_offset)
        .map(|row| {
            let content = textwrap::wrap(&row.content, content_width)
                .into_iter()
                .take(2)
                .collect::<Vec<_>>()
                .join("\n");
            Row::new(vec![
                Cell::from(row.at.clone()),
                Cell::from(format!("{:.1}", row.score)),
                Cell::from(Span::styled(
                    row.sentiment.as_str(),
                    Style::default().fg(sentiment_color(row.sentiment)),
                )),
                Cell::from(row.review_created_version.clone()),
                Cell::from(content),
            ])
            .height(2)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(19),
            Constraint::Length(5),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Min(20),
        ],
    )
    .header(table_header(&["Date", "Score", "Sent.", "Version", "Review"]))
    .block(detail_block("Traceability (Reviews ↔ Features)", app));

    frame.render_widget(table, area);
}

fn render_heatmap(frame: &mut Frame, app: &App, area: Rect) {
    let cells = app.heatmap();

    let rows: Vec<Row> = cells
        .iter()
        .skip(app.table_offset)
        .map(|cell| {
            Row::new(vec![
                Cell::from(cell.release_version.clone()),
                Cell::from(cell.month.clone()),
                Cell::from(Span::styled(
                    format!("{:.2}", cell.avg_score),
                    Style::default().fg(score_color(cell.avg_score)),
                )),
                Cell::from(cell.review_count.to_string()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(16),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(8),
        ],
    )
    .header(table_header(&["Release", "Month", "Avg Score", "Reviews"]))
    .block(detail_block("Feature Impact Heatmap", app));

    frame.render_widget(table, area);
}

fn render_sunburst(frame: &mut Frame, app: &App, area: Rect) {
    let segments = app.sunburst();

    let rows: Vec<Row> = segments
        .iter()
        .skip(app.table_offset)
        .map(|segment| {
            Row::new(vec![
                Cell::from(segment.release_version.clone()),
                Cell::from(segment.month.clone()),
                Cell::from(Span::styled(
                    segment.sentiment.as_str(),
                    Style::default().fg(sentiment_color(segment.sentiment)),
                )),
                Cell::from(segment.count.to_string()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(16),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(8),
        ],
    )
    .header(table_header(&["Release", "Month", "Sentiment", "Count"]))
    .block(detail_block("Sentiment Spread by Version & Time", app));

    frame.render_widget(table, area);
}

fn render_gantt(frame: &mut Frame, app: &App, area: Rect) {
    let rows_data = app.gantt();

    let rows: Vec<Row> = rows_data
        .iter()
        .skip(app.table_offset)
        .map(|row| {
            Row::new(vec![
                Cell::from(row.release_version.clone()),
                Cell::from(
                    row.start
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::from(
                    row.end
                        .map(|dt| dt.date().to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::from(row.reviews.to_string()),
                Cell::from(truncate_label(row.description.as_deref().unwrap_or("-"), 40)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(16),
            Constraint::Length(11),
            Constraint::Length(11),
            Constraint::Length(8),
            Constraint::Min(20),
        ],
    )
    .header(table_header(&["Release", "Start", "End", "Reviews", "Features"]))
    .block(detail_block("Feature Relevance Timeline", app));

    frame.render_widget(table, area);
}

fn table_header(titles: &[&'static str]) -> Row<'static> {
    Row::new(
        titles
            .iter()
            .map(|t| Cell::from(*t))
            .collect::<Vec<Cell>>(),
    )
    .style(Style::default().add_modifier(Modifier::BOLD))
}

fn detail_block(title: &str, app: &App) -> Block<'static> {
    Block::default()
        .title(format!(" {} [{}] ", title, app.detail_table.label()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let status = if app.is_loading {
        "Reloading data...".to_string()
    } else if let Some(message) = &app.status {
        message.clone()
    } else {
        "Tab:view  j/k:version  J/K:scroll  t:table  d:dates  x:clear  e:export  r:reload  ?:help  q:quit"
            .to_string()
    };

    let paragraph = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn render_date_input(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 20, frame.area());

    let block = Block::default()
        .title(" Review Date Range (YYYY-MM-DD..YYYY-MM-DD, empty clears) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(area);

    // Clear the area first
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let input_text = format!("> {}_", app.date_input);
    let paragraph = Paragraph::new(input_text).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());

    let help_text = vec![
        "",
        " Views:",
        "   Tab      Switch between Balloon and Detail",
        "   t        Cycle the detail table",
        "",
        " Filters:",
        "   j / ↓    Next version",
        "   k / ↑    Previous version",
        "   d        Edit review date range",
        "   x        Clear review date range",
        "",
        " Actions:",
        "   J / K    Scroll the active table",
        "   e        Export filtered table as CSV",
        "   r        Reload the data file",
        "",
        " General:",
        "   ?        Toggle this help",
        "   q        Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn sentiment_color(sentiment: Sentiment) -> Color {
    match sentiment {
        Sentiment::Positive => Color::Green,
        Sentiment::Neutral => Color::Yellow,
        Sentiment::Negative => Color::Red,
    }
}

fn score_color(avg_score: f64) -> Color {
    if avg_score < 2.5 {
        Color::Red
    } else if avg_score < 3.5 {
        Color::Yellow
    } else {
        Color::Green
    }
}

fn truncate_label(label: &str, max: usize) -> String {
    if label.chars().count() > max {
        let prefix: String = label.chars().take(max).collect();
        format!("{prefix}...")
    } else {
        label.to_string()
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
