//! Detail overlay rendering.
//!
//! Displays a modal overlay with detailed information about a site,
//! driven by the detail session's state.

use chrono::Utc;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::{timefmt, DetailsSession, SiteDetail, RECENT_HISTORY};

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 16;

/// Render the site detail as a modal overlay.
///
/// Shows the loading placeholder, the fetch error, or the full detail
/// with recent check history depending on the session state.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let overlay_width = (area.width * 80 / 100).clamp(MIN_OVERLAY_WIDTH, 90);
    let overlay_height = (area.height * 80 / 100).clamp(MIN_OVERLAY_HEIGHT, 30);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    match &app.session {
        DetailsSession::Closed => {}
        DetailsSession::Loading(_) => render_placeholder(frame, app, overlay_area, "Loading..."),
        DetailsSession::Failed { error, .. } => {
            render_placeholder(frame, app, overlay_area, &format!("Error: {} (r:retry)", error))
        }
        DetailsSession::Open { detail, .. } => render_detail(frame, app, overlay_area, detail),
    }
}

fn render_placeholder(frame: &mut Frame, app: &App, area: Rect, message: &str) {
    let block = Block::default()
        .title(" Site Detail ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", message),
            Style::default().add_modifier(Modifier::DIM),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "  Press Esc to close",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ])
    .block(block);

    frame.render_widget(paragraph, area);
}

fn render_detail(frame: &mut Frame, app: &App, area: Rect, detail: &SiteDetail) {
    let now = Utc::now();
    let site = &detail.site;

    let chunks = Layout::vertical([
        Constraint::Length(8), // Header with site info
        Constraint::Min(6),    // History table
        Constraint::Length(1), // Footer
    ])
    .split(area);

    // ===== HEADER SECTION =====
    let health = site.health();
    let health_style = app.theme.health_style(health);
    let severity = site.severity();

    let uptime = match site.uptime_percentage {
        Some(pct) => Span::styled(
            format!("{:.1}%", pct),
            app.theme.uptime_style(pct).add_modifier(Modifier::BOLD),
        ),
        None => Span::styled("-", Style::default().add_modifier(Modifier::DIM)),
    };

    let header_lines = vec![
        Line::from(vec![Span::styled(
            format!(" {} ", site.name),
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(vec![
            Span::raw(" "),
            Span::styled(site.url.clone(), Style::default().add_modifier(Modifier::DIM)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw(" Status: "),
            Span::styled(
                format!("{} {}", health.symbol(), site.status),
                health_style.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    Response: "),
            Span::styled(
                format!("{}ms", site.response_time),
                app.theme.severity_style(severity),
            ),
            Span::raw("    Uptime: "),
            uptime,
        ]),
        Line::from(vec![
            Span::raw(" Checked every "),
            Span::styled(
                format!("{}s", site.check_interval),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("    Last: "),
            Span::raw(timefmt::last_checked_label(site.last_checked.as_deref(), now)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw(" Badge: "),
            Span::styled(
                format!("![status]({})", site.badge_url()),
                Style::default().add_modifier(Modifier::DIM),
            ),
        ]),
    ];

    let header_block = Block::default()
        .title(" Site Detail ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let header = Paragraph::new(header_lines).block(header_block);
    frame.render_widget(header, chunks[0]);

    // ===== HISTORY SECTION =====
    // History arrives newest first; only the most recent few are shown
    let shown = detail.history.len().min(RECENT_HISTORY);

    if shown > 0 {
        let history_header = Row::new(vec![
            Cell::from("When"),
            Cell::from("Status"),
            Cell::from("Response"),
        ])
        .height(1)
        .style(app.theme.header);

        let history_rows: Vec<Row> = detail
            .history
            .iter()
            .take(RECENT_HISTORY)
            .map(|entry| {
                let health = crate::data::Health::of(&entry.status);
                let when = match timefmt::parse_timestamp(&entry.timestamp) {
                    Some(ts) => timefmt::time_ago(ts, now),
                    None => entry.timestamp.clone(),
                };
                Row::new(vec![
                    Cell::from(when),
                    Cell::from(format!("{} {}", health.symbol(), entry.status))
                        .style(app.theme.health_style(health)),
                    Cell::from(format!("{}ms", entry.response_time)),
                ])
            })
            .collect();

        let history_widths = [
            Constraint::Length(12), // When
            Constraint::Fill(2),    // Status
            Constraint::Length(10), // Response
        ];

        let history_table = Table::new(history_rows, history_widths)
            .header(history_header)
            .block(
                Block::default()
                    .title(format!(" Recent Checks ({}/{}) ", shown, detail.history.len()))
                    .borders(Borders::ALL)
                    .border_type(app.theme.border_type)
                    .border_style(Style::default().fg(app.theme.border)),
            );

        frame.render_widget(history_table, chunks[1]);
    } else {
        let empty_block = Block::default()
            .title(" Recent Checks (0) ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border));
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  No checks recorded yet",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .block(empty_block);
        frame.render_widget(empty, chunks[1]);
    }

    // ===== FOOTER =====
    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " c:check now  Esc:close ",
        Style::default().add_modifier(Modifier::DIM),
    )]));
    frame.render_widget(footer, chunks[2]);
}
