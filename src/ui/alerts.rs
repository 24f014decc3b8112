//! Alerts view.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::common::{position_info, search_info};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let alerts = app.alert_rows();
    let counts = app.alerts.counts(&app.alert_filter);

    let header = Row::new(vec!["ID", "Severity", "Status", "Device", "Subplant", "Raised", "Description"])
        .height(1)
        .style(app.theme.header);

    let rows: Vec<Row> = alerts
        .iter()
        .map(|a| {
            Row::new(vec![
                Cell::from(a.id.clone()),
                Cell::from(a.severity.as_str()).style(app.theme.severity_style(a.severity)),
                Cell::from(a.status.as_str()).style(app.theme.alert_status_style(a.status)),
                Cell::from(a.device.clone()),
                Cell::from(a.subplant.clone()),
                Cell::from(a.timestamp.format("%H:%M:%S").to_string()),
                Cell::from(a.description.clone()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(13),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Length(9),
        Constraint::Fill(4),
    ];

    let severity = app.alert_filter.severity.map_or("any", |s| s.as_str());
    let status = app.alert_filter.status.map_or("any", |s| s.as_str());
    let selected = app.selected_alert_index.min(alerts.len().saturating_sub(1));
    let title = format!(
        " Alerts ({}) crit:{} high:{} med:{} low:{} | new:{} ack:{} done:{} [sev:{} status:{}]{}{} ",
        alerts.len(),
        counts.critical,
        counts.high,
        counts.medium,
        counts.low,
        counts.new,
        counts.acknowledged,
        counts.resolved,
        severity,
        status,
        search_info(app),
        position_info(selected, alerts.len())
    );

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
