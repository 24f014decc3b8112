//! Light and dark palettes with terminal auto-detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use plantwatch_types::HealthStatus;

use crate::data::alerts::{AlertSeverity, AlertStatus};

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] to pick from the terminal background, or
/// [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for healthy status.
    pub healthy: Color,
    /// Color for warning status and medium alerts.
    pub warning: Color,
    /// Color for critical status and high alerts.
    pub critical: Color,
    /// Color for offline nodes and assets.
    pub offline: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for the selected row.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            healthy: Color::Green,
            warning: Color::Yellow,
            critical: Color::Red,
            offline: Color::Gray,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            healthy: Color::Green,
            warning: Color::Yellow,
            critical: Color::Red,
            offline: Color::DarkGray,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Pick a palette from the terminal's background luminance.
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Foreground color for a health status.
    pub fn status_color(&self, status: HealthStatus) -> Color {
        match status {
            HealthStatus::Healthy => self.healthy,
            HealthStatus::Warning => self.warning,
            HealthStatus::Critical => self.critical,
            HealthStatus::Offline => self.offline,
        }
    }

    /// Style for a health status. Critical is bold and offline is dimmed.
    pub fn status_style(&self, status: HealthStatus) -> Style {
        let style = Style::default().fg(self.status_color(status));
        match status {
            HealthStatus::Critical => style.add_modifier(Modifier::BOLD),
            HealthStatus::Offline => style.add_modifier(Modifier::DIM),
            _ => style,
        }
    }

    /// Style for an alert severity cell.
    pub fn severity_style(&self, severity: AlertSeverity) -> Style {
        match severity {
            AlertSeverity::Critical => Style::default().fg(self.critical).add_modifier(Modifier::BOLD),
            AlertSeverity::High => Style::default().fg(self.critical),
            AlertSeverity::Medium => Style::default().fg(self.warning),
            AlertSeverity::Low => Style::default().fg(self.highlight),
        }
    }

    /// Style for an alert lifecycle status cell.
    pub fn alert_status_style(&self, status: AlertStatus) -> Style {
        match status {
            AlertStatus::New => Style::default().add_modifier(Modifier::BOLD),
            AlertStatus::Acknowledged => Style::default().fg(self.highlight),
            AlertStatus::Resolved => Style::default().fg(self.healthy).add_modifier(Modifier::DIM),
        }
    }
}
