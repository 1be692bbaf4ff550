//! Sites table rendering.
//!
//! Displays a table of all monitored sites with status, response time,
//! and when each was last checked.

use chrono::Utc;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::timefmt;

/// Render the Sites view showing all sites in a table.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    if !app.loaded {
        return;
    }

    let now = Utc::now();
    let sites = app.store.all();

    let header = Row::new(vec![
        Cell::from("Name"),
        Cell::from("URL"),
        Cell::from("Status"),
        Cell::from("Response"),
        Cell::from("Last Checked"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = sites
        .iter()
        .map(|site| {
            let health_style = app.theme.health_style(site.health());
            let severity = site.severity();
            let severity_style = app.theme.severity_style(severity);

            let status = if app.checking == Some(site.id) {
                "Checking...".to_string()
            } else {
                format!("{} {}", site.health().symbol(), site.status)
            };

            // Annotate the band only when it is off nominal
            let response = match severity {
                crate::data::Severity::Normal => format!("{}ms", site.response_time),
                _ => format!("{}ms {}", site.response_time, severity.label()),
            };

            Row::new(vec![
                Cell::from(site.name.clone()),
                Cell::from(site.url.clone()).style(Style::default().add_modifier(Modifier::DIM)),
                Cell::from(status).style(health_style),
                Cell::from(response).style(severity_style),
                Cell::from(timefmt::last_checked_label(site.last_checked.as_deref(), now)),
            ])
        })
        .collect();

    // Use Fill to distribute space evenly while respecting minimum widths
    let widths = [
        Constraint::Fill(2),    // Name
        Constraint::Fill(3),    // URL - gets 3x share (largest)
        Constraint::Fill(2),    // Status
        Constraint::Min(12),    // Response
        Constraint::Min(18),    // Last Checked
    ];

    let selected = app.selected_index.min(sites.len().saturating_sub(1));

    // Show scroll position if there are items
    let position_info = if !sites.is_empty() {
        format!(" [{}/{}]", selected + 1, sites.len())
    } else {
        String::new()
    };

    let title = format!(" Sites ({}){} ", sites.len(), position_info);

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}
