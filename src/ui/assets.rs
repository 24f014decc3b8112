//! Assets view: filtered asset table beside the nodes in scope.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::common::{position_info, search_info};

/// Node ids shown inline before truncating.
const INLINE_NODES: usize = 4;

fn node_summary(node_ids: &[String]) -> String {
    if node_ids.len() <= INLINE_NODES {
        node_ids.join(", ")
    } else {
        format!(
            "{}, +{}",
            node_ids[..INLINE_NODES].join(", "),
            node_ids.len() - INLINE_NODES
        )
    }
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)]).areas(area);

    render_assets(frame, app, left);
    render_nodes(frame, app, right);
}

fn render_assets(frame: &mut Frame, app: &App, area: Rect) {
    let assets = app.asset_rows();

    let header = Row::new(vec!["Asset", "Subplant", "Nodes", "Status"])
        .height(1)
        .style(app.theme.header);

    let rows: Vec<Row> = assets
        .iter()
        .map(|a| {
            Row::new(vec![
                Cell::from(a.asset_id.clone()),
                Cell::from(a.subplant.clone()),
                Cell::from(node_summary(&a.node_ids)),
                Cell::from(a.status.symbol()).style(app.theme.status_style(a.status)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Fill(3),
        Constraint::Min(6),
    ];

    let selected = app.selected_asset_index.min(assets.len().saturating_sub(1));
    let title = format!(
        " Assets ({}) [subplant:{} asset:{}]{}{} ",
        assets.len(),
        app.filters.subplant.label(),
        app.filters.asset.label(),
        search_info(app),
        position_info(selected, assets.len())
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

fn render_nodes(frame: &mut Frame, app: &App, area: Rect) {
    let nodes = app.node_rows();

    let header = Row::new(vec!["Node", "Asset", "Status"])
        .height(1)
        .style(app.theme.header);

    let rows: Vec<Row> = nodes
        .iter()
        .map(|r| {
            let status = match App::node_status(r) {
                Some(status) => Cell::from(status.as_str()).style(app.theme.status_style(status)),
                None => Cell::from(format!("?{}", r.node_status))
                    .style(Style::default().fg(app.theme.critical)),
            };
            Row::new(vec![
                Cell::from(r.node_id.clone()),
                Cell::from(r.asset_id.clone()),
                status,
            ])
        })
        .collect();

    let widths = [Constraint::Fill(2), Constraint::Fill(2), Constraint::Min(9)];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(format!(" Nodes ({}) ", nodes.len()))
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );

    frame.render_widget(table, area);
}
