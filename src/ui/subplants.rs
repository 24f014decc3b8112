//! Subplants view: one row per subplant, grouped by stage.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use plantwatch_types::{HealthStatus, SubplantSummary};

use crate::app::App;
use crate::ui::common::{position_info, render_sparkline, search_info};

fn count_cell(app: &App, summary: &SubplantSummary, status: HealthStatus) -> Cell<'static> {
    let n = summary.assets_with(status);
    if n == 0 {
        Cell::from("-").style(Style::default().add_modifier(Modifier::DIM))
    } else {
        Cell::from(n.to_string()).style(app.theme.status_style(status))
    }
}

fn trend(delta: Option<i64>) -> String {
    match delta {
        Some(d) if d > 0 => format!("↑{}", d),
        Some(d) if d < 0 => format!("↓{}", -d),
        Some(_) => "→".to_string(),
        None => "-".to_string(),
    }
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let rows_data = app.subplant_rows();

    let header = Row::new(vec![
        "Stage", "Subplant", "Area", "Assets", "OK", "Warn", "Crit", "Off", "Nodes!", "Δ", "Trend", "Status",
    ])
    .height(1)
    .style(app.theme.header);

    let mut previous_stage: Option<&str> = None;
    let rows: Vec<Row> = rows_data
        .iter()
        .map(|row| {
            let s = &row.member.summary;
            // only label the first subplant of each stage
            let stage = if previous_stage == Some(row.stage.as_str()) {
                String::new()
            } else {
                row.stage.clone()
            };
            previous_stage = Some(row.stage.as_str());

            let worst = s.worst_status();
            let status = if s.is_hotspot() {
                format!("{} HOT", worst.symbol())
            } else {
                worst.symbol().to_string()
            };

            Row::new(vec![
                Cell::from(stage).style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(s.subplant.clone()),
                Cell::from(row.member.area.clone()),
                Cell::from(s.total_assets.to_string()),
                count_cell(app, s, HealthStatus::Healthy),
                count_cell(app, s, HealthStatus::Warning),
                count_cell(app, s, HealthStatus::Critical),
                count_cell(app, s, HealthStatus::Offline),
                Cell::from(format!("{}/{}", s.unhealthy_nodes(), s.total_nodes)),
                Cell::from(trend(app.history.delta(&s.subplant))),
                Cell::from(render_sparkline(&app.history.sparkline(&s.subplant))),
                Cell::from(status).style(app.theme.status_style(worst)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Length(6),
        Constraint::Length(4),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(4),
        Constraint::Length(7),
        Constraint::Length(4),
        Constraint::Min(10),
        Constraint::Min(9),
    ];

    let selected = app.selected_subplant_index.min(rows_data.len().saturating_sub(1));
    let title = format!(
        " Subplants ({}){}{} ",
        rows_data.len(),
        search_info(app),
        position_info(selected, rows_data.len())
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_arrows() {
        assert_eq!(trend(Some(3)), "↑3");
        assert_eq!(trend(Some(-2)), "↓2");
        assert_eq!(trend(Some(0)), "→");
        assert_eq!(trend(None), "-");
    }
}
