//! Top-level UI layout — header, cards grid, volume chart and share panel, status bar.

pub mod cards;
pub mod header;
pub mod overlays;
pub mod share_panel;
pub mod status_bar;
pub mod volume_chart;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{AppState, Overlay};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    f.render_widget(
        Block::default().style(Style::default().bg(theme::BACKGROUND)),
        f.area(),
    );

    // Split: header + body + 1-line status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(f.area());

    header::render(f, chunks[0], app);
    draw_body(f, chunks[1], app);
    status_bar::render(f, chunks[2], app);

    match &app.overlay {
        Overlay::Help => overlays::render_help(f, chunks[1]),
        Overlay::ErrorHistory => overlays::render_error_history(f, chunks[1], app),
        Overlay::Filter { .. } => overlays::render_filter(f, chunks[1], &app.filter_input),
        Overlay::None => {}
    }
}

fn draw_body(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(view) = app.shown_view() else {
        render_no_data(f, area, app);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[1]);

    cards::render(f, rows[0], view);
    volume_chart::render(f, charts[0], view);
    share_panel::render(f, charts[1], view);
}

/// Nothing to show for the current controls: loading, or the cold-start error.
fn render_no_data(f: &mut Frame, area: Rect, app: &AppState) {
    let block = panel_block("Markets");
    let lines = match &app.last_error {
        Some(error) => vec![
            Line::from(""),
            Line::from(Span::styled(
                "Could not load market data.",
                theme::negative(),
            )),
            Line::from(""),
            Line::from(Span::styled(error.to_string(), theme::warning())),
            Line::from(""),
            Line::from(Span::styled(
                format!(
                    "Retrying every {}s. Press r to retry now, e for error history.",
                    app.driver.interval().as_secs()
                ),
                theme::muted(),
            )),
        ],
        None => vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("Loading top {} in {}...", app.params.count, app.params.currency),
                theme::muted(),
            )),
        ],
    };
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

/// Bordered panel with the standard title style.
pub fn panel_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {title} "))
        .title_style(theme::panel_title(true))
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
