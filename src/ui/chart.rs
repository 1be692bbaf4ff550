//! Response-time chart rendering.
//!
//! Displays a bar per site, colored by the same severity bands the table
//! uses, so a fleet-wide latency problem is visible at a glance.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Bar, BarChart, BarGroup, Block, Borders},
    Frame,
};

use crate::app::App;
use crate::data::Health;

/// Render the Chart view with one response-time bar per site.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    if !app.loaded {
        return;
    }

    let sites = app.store.all();

    let bars: Vec<Bar> = sites
        .iter()
        .map(|site| {
            // A down site renders as a zero-height critical bar rather
            // than charting a meaningless response time
            let (value, style) = if site.health() == Health::Down {
                (0, app.theme.health_style(Health::Down))
            } else {
                (site.response_time, app.theme.severity_style(site.severity()))
            };

            Bar::default()
                .label(truncate(&site.name, 12).into())
                .value(value)
                .text_value(format!("{}ms", site.response_time))
                .style(style)
                .value_style(style.add_modifier(ratatui::style::Modifier::REVERSED))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(format!(" Response Times ({} sites) ", sites.len()))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(13)
        .bar_gap(1);

    frame.render_widget(chart, area);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
