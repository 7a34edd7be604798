use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Paragraph, Tabs, Wrap},
};
use smartbin_core::{
    model::{BinStatus, FillSeverity, bar_width},
    monitor::LiveStatus,
};

use crate::app::{App, Route};

const CARD_HEIGHT: u16 = 7;
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const ORANGE: Color = Color::Rgb(255, 165, 0);

/// Draw the whole screen and return how many grid rows the live view can scroll.
pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) -> usize {
    let area = frame.area();

    // Outer layout: navigation, routed view, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [nav_area, content_area, status_area] = chunks else {
        return 0;
    };

    draw_nav(frame, app, *nav_area);

    let scroll_limit = match app.route {
        Route::Dashboard => {
            draw_dashboard(frame, *content_area);
            0
        }
        Route::LiveBins => draw_live_bins(frame, app, *content_area),
        Route::Prediction => {
            draw_prediction(frame, *content_area);
            0
        }
    };

    draw_status(frame, app, *status_area);
    scroll_limit
}

fn draw_nav(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let titles = Route::ALL
        .iter()
        .map(|route| format!("{} {}", route.index() + 1, route.label()));

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("🗑️ Smart Waste"))
        .select(app.route.index())
        .highlight_style(
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn draw_status(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let nav_hint = match app.route {
        Route::LiveBins => "1-3/Tab switch view · ↑/↓ scroll · q/Ctrl-C quit",
        Route::Dashboard | Route::Prediction => "1-3/Tab switch view · q/Ctrl-C quit",
    };

    let live = app.monitor.as_ref().map(|monitor| monitor.status());
    let failure = live.and_then(LiveStatus::last_failure);
    let loading = live.is_some_and(LiveStatus::is_loading);

    let status_text = if loading {
        format!("Loading… · {nav_hint}")
    } else if let Some(reason) = failure {
        format!("Last update failed: {reason} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if failure.is_some() {
        Style::default().fg(Color::Red)
    } else if loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(app.route.path()),
        )
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, area);
}

fn draw_dashboard(frame: &mut Frame<'_>, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [title_area, cards_area] = chunks else {
        return;
    };

    let title = Paragraph::new(vec![
        Line::from("Smart Waste Collection System").bold(),
        Line::from(""),
        Line::from("IoT-Powered Waste Management Solution").fg(Color::Gray),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(title, *title_area);

    let features = [
        ("🗑️", "Smart Bins", "Real-time monitoring with IoT sensors"),
        ("📊", "Analytics", "ML-powered waste predictions"),
        ("🚛", "Route Optimization", "AI-optimized collection routes"),
    ];

    let card_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(*cards_area);

    for ((icon, heading, blurb), card_area) in features.into_iter().zip(card_areas.iter()) {
        let card = Paragraph::new(vec![
            Line::from(icon),
            Line::from(heading).bold(),
            Line::from(blurb).fg(Color::Gray),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(card, *card_area);
    }
}

fn draw_prediction(frame: &mut Frame<'_>, area: Rect) {
    let paragraph =
        Paragraph::new("Fill-level predictions are not available in the terminal client yet.")
            .block(Block::default().borders(Borders::ALL).title("Prediction"))
            .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_live_bins(frame: &mut Frame<'_>, app: &App, area: Rect) -> usize {
    let Some(status) = app.monitor.as_ref().map(|monitor| monitor.status()) else {
        return 0;
    };

    if status.is_loading() {
        let spinner = SPINNER.get(app.tick % SPINNER.len()).copied().unwrap_or("…");
        let paragraph = Paragraph::new(format!("{spinner} Loading bins…"))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(paragraph, area);
        return 0;
    }

    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, grid_area] = chunks else {
        return 0;
    };

    draw_live_header(frame, status, *header_area);

    if status.is_empty() {
        let paragraph = Paragraph::new("No bins found. Start your IoT devices!")
            .alignment(Alignment::Center)
            .fg(Color::Gray)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(paragraph, *grid_area);
        return 0;
    }

    draw_bin_grid(frame, status.bins(), app.scroll, *grid_area)
}

fn draw_live_header(frame: &mut Frame<'_>, status: &LiveStatus, area: Rect) {
    let indicator = if status.is_stale() {
        Line::from("● Stale").fg(Color::Red)
    } else {
        Line::from("● Live").fg(Color::Green)
    };

    let summary = status.summary();
    let updated = status
        .last_success()
        .map(|at| format!(" · updated {}", at.format("%H:%M:%S")))
        .unwrap_or_default();
    let line = format!(
        "{} bins · critical {} · needs collection {} · moderate {} · good {}{updated}",
        summary.total(),
        summary.critical,
        summary.needs_collection,
        summary.moderate,
        summary.good,
    );

    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title_top(Line::from("🗑️ Live Bin Monitoring").bold())
            .title_top(indicator.right_aligned()),
    );
    frame.render_widget(header, area);
}

/// Returns the highest first row that still fills the grid.
fn draw_bin_grid(frame: &mut Frame<'_>, bins: &[BinStatus], scroll: usize, area: Rect) -> usize {
    let columns = columns_for_width(area.width);
    let column_share = u32::try_from(columns).unwrap_or(1);
    let visible_rows = usize::from((area.height / CARD_HEIGHT).max(1));
    let total_rows = bins.len().div_ceil(columns);
    let scroll_limit = total_rows.saturating_sub(visible_rows);
    let first_row = scroll.min(scroll_limit);

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
        .split(area);

    let rows = bins.chunks(columns).skip(first_row).take(visible_rows);
    for (row, row_area) in rows.zip(row_areas.iter()) {
        let card_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, column_share); columns])
            .split(*row_area);

        for (bin, card_area) in row.iter().zip(card_areas.iter()) {
            draw_bin_card(frame, bin, *card_area);
        }
    }
    scroll_limit
}

fn draw_bin_card(frame: &mut Frame<'_>, bin: &BinStatus, area: Rect) {
    let color = severity_color(bin.severity());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title_top(Line::from(bin.bin_id.to_string()).bold())
        .title_top(Line::from(bin.reported_status().icon()).right_aligned());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); 5])
        .split(inner);

    let chunks = layout_chunks.as_ref();
    let [area_line, fill_line, gauge_line, status_line, position_line] = chunks else {
        return;
    };

    frame.render_widget(Paragraph::new(bin.area.as_str()).fg(Color::Gray), *area_line);

    frame.render_widget(Paragraph::new("Fill Level"), *fill_line);
    frame.render_widget(
        Paragraph::new(format!("{:.1}%", bin.fill_level))
            .bold()
            .alignment(Alignment::Right),
        *fill_line,
    );

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color).bg(Color::DarkGray))
        .ratio(gauge_ratio(bin.fill_level))
        .label(bar_width(bin.fill_level));
    frame.render_widget(gauge, *gauge_line);

    frame.render_widget(
        Paragraph::new(format!("Status: {}", bin.status)).fg(Color::DarkGray),
        *status_line,
    );
    if let Some(time) = bin.last_update_time() {
        frame.render_widget(
            Paragraph::new(format!("Updated: {}", time.format("%H:%M:%S")))
                .fg(Color::DarkGray)
                .alignment(Alignment::Right),
            *status_line,
        );
    }

    if let (Some(lat), Some(lon)) = (bin.latitude, bin.longitude) {
        frame.render_widget(
            Paragraph::new(format!("{lat:.4}, {lon:.4}")).fg(Color::DarkGray),
            *position_line,
        );
    }
}

fn columns_for_width(width: u16) -> usize {
    match width {
        0..80 => 1,
        80..120 => 2,
        _ => 3,
    }
}

fn severity_color(severity: FillSeverity) -> Color {
    match severity {
        FillSeverity::Critical => Color::Red,
        FillSeverity::High => ORANGE,
        FillSeverity::Moderate => Color::Yellow,
        FillSeverity::Low => Color::Green,
    }
}

/// The gauge cannot draw outside `[0, 1]`, unlike the bar width label.
fn gauge_ratio(fill_level: f64) -> f64 {
    if fill_level.is_finite() {
        (fill_level / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    }
}
