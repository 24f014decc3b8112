//! Common UI components shared across views.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use plantwatch_types::HealthStatus;

use crate::app::{App, View};
use crate::data::duration::format_age;
use crate::data::AlertFilter;

/// Sparkline characters (8 levels of height).
pub const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub fn render_sparkline(levels: &[u8]) -> String {
    levels
        .iter()
        .map(|&l| SPARKLINE_CHARS[(l as usize).min(7)])
        .collect()
}

/// Fleet-wide header: worst status, asset counts, open alerts.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = Span::styled(" PLANTWATCH ", Style::default().add_modifier(Modifier::BOLD));

    let Some(ref data) = app.data else {
        let line = Line::from(vec![title, Span::raw("| Loading...")]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let totals = data.totals();
    let worst = totals.worst_status();
    let open_alerts = app.alerts.counts(&AlertFilter::default()).open();

    let count = |status: HealthStatus, label: &'static str| -> Vec<Span<'static>> {
        let n = totals.assets_with(status);
        let value = if n > 0 {
            Span::styled(n.to_string(), app.theme.status_style(status))
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        };
        vec![value, Span::raw(format!(" {} ", label))]
    };

    let mut spans = vec![
        Span::styled(" ● ", app.theme.status_style(worst)),
        Span::styled("PLANTWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
    ];
    spans.extend(count(HealthStatus::Healthy, "ok"));
    spans.extend(count(HealthStatus::Warning, "warn"));
    spans.extend(count(HealthStatus::Critical, "crit"));
    spans.extend(count(HealthStatus::Offline, "off"));
    spans.extend([
        Span::raw("│ "),
        Span::styled(totals.total_assets.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(
            " assets {} nodes in {} subplants │ ",
            totals.total_nodes,
            data.subplants.len()
        )),
        Span::styled(
            format!("{} open alerts", open_alerts),
            if open_alerts > 0 {
                Style::default().fg(app.theme.warning)
            } else {
                Style::default().add_modifier(Modifier::DIM)
            },
        ),
    ]);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, v)| Line::from(format!(" {}:{} ", i + 1, v.label())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.current_view.index())
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Placeholder shown until the first snapshot arrives.
pub fn render_waiting(frame: &mut Frame, app: &App, area: Rect) {
    let message = match &app.load_error {
        Some(err) => format!("Waiting for data from {}\n\n{}", app.source_description(), err),
        None => format!("Waiting for data from {}", app.source_description()),
    };
    let paragraph = Paragraph::new(message).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );
    frame.render_widget(paragraph, area);
}

/// Bottom line: messages and errors take priority over the key hints.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    // a refresh failed but older data is still on screen
    if let (Some(err), Some(_)) = (&app.load_error, &app.data) {
        let paragraph = Paragraph::new(format!(" Error: {} | r:retry q:quit", err))
            .style(Style::default().fg(app.theme.critical));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = match app.data_age() {
        Some(age) => {
            let controls = if app.filter_active {
                "Type to search | Enter:apply Esc:cancel"
            } else {
                match app.current_view {
                    View::Subplants => "/:search Enter:assets Tab:switch ?:help q:quit",
                    View::Assets => "/:search f/F:subplant n/N:asset x:clear ?:help q:quit",
                    View::Alerts => "a:ack d:resolve o:reopen v:severity t:status x:clear ?:help",
                }
            };
            format!(
                " {} | Updated {} ago | {}",
                app.source_description(),
                format_age(age),
                controls
            )
        }
        None => match &app.load_error {
            Some(err) => format!(" Error: {} | q:quit r:retry", err),
            None => " Loading... | q:quit".to_string(),
        },
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Search hint for table titles.
pub fn search_info(app: &App) -> String {
    if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    }
}

pub fn position_info(selected: usize, len: usize) -> String {
    if len == 0 {
        String::new()
    } else {
        format!(" [{}/{}]", selected.min(len - 1) + 1, len)
    }
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD)))
}

/// Centered help overlay.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  ←/→ h/l  1-3  Switch views"),
        Line::from("  ↑/↓ j/k       Navigate list"),
        Line::from("  PgUp/PgDn     Jump 10 items"),
        Line::from("  Home/End      Jump to first/last"),
        Line::from("  Enter         Open subplant assets"),
        Line::from("  Esc           Go back"),
        Line::from(""),
        section(" Assets"),
        Line::from("  f / F         Next/prev subplant"),
        Line::from("  n / N         Next/prev asset"),
        Line::from("  x             Clear filters"),
        Line::from(""),
        section(" Alerts"),
        Line::from("  a             Acknowledge"),
        Line::from("  d             Resolve"),
        Line::from("  o             Reopen"),
        Line::from("  v / t         Filter severity/status"),
        Line::from(""),
        section(" General"),
        Line::from("  /  c          Search / clear search"),
        Line::from("  r             Reload data"),
        Line::from("  e             Export to JSON"),
        Line::from("  q             Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let height = help_text.len() as u16 + 2;
    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 44u16.min(area.width.saturating_sub(4));
    let help_height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
