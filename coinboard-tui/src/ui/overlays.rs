//! Overlay widgets — help, error history, filter input.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::centered_rect;

pub fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Keys [any key]close ")
        .title_style(theme::accent_bold());

    let mut lines: Vec<Line> = Vec::new();
    section(&mut lines, "Controls");
    key(&mut lines, "/", "Edit name filter (Enter keep, Esc revert)");
    key(&mut lines, "Esc", "Clear the active filter");
    key(&mut lines, "c", "Cycle currency (USD, EUR, TRY, Toman)");
    key(&mut lines, "+ / -", "More / fewer assets (5 to 20)");
    key(&mut lines, "s", "Cycle sort (market cap, volume, price)");
    lines.push(Line::from(""));
    section(&mut lines, "Data");
    key(&mut lines, "r", "Refresh now, ignoring the cache");
    key(&mut lines, "e", "Error history");
    key(&mut lines, "q", "Quit");

    let para = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(para, popup);
}

fn section(lines: &mut Vec<Line>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key(lines: &mut Vec<Line>, keys: &str, action: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {keys:>6}  "), theme::warning()),
        Span::styled(action.to_string(), theme::text()),
    ]));
}

/// Error history overlay.
pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(format!(
            " Error History ({}) [Esc]close [j/k]scroll ",
            app.error_history.len()
        ))
        .title_style(theme::negative());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if app.error_history.is_empty() {
        let text = Paragraph::new(Span::styled("No errors recorded.", theme::muted()));
        f.render_widget(text, inner);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for (i, err) in app.error_history.iter().enumerate().skip(app.error_scroll) {
        if lines.len() >= inner.height as usize {
            break;
        }
        let style = if i == app.error_scroll {
            theme::negative().add_modifier(Modifier::BOLD)
        } else {
            theme::muted()
        };

        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", err.timestamp.format("%H:%M:%S")),
                theme::muted(),
            ),
            Span::styled(format!("[{}] ", err.category), theme::warning()),
            Span::styled(err.message.as_str(), style),
        ]));

        if !err.context.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(err.context.as_str(), theme::muted()),
            ]));
        }
    }

    f.render_widget(Paragraph::new(lines), inner);
}

/// Filter input overlay.
pub fn render_filter(f: &mut Frame, area: Rect, input: &str) {
    let popup = centered_rect(50, 30, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Filter by name [Enter]keep [Esc]revert ")
        .title_style(theme::accent_bold());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let text = vec![
        Line::from(Span::styled("Case-insensitive name match:", theme::muted())),
        Line::from(""),
        Line::from(vec![
            Span::styled("> ", theme::accent()),
            Span::styled(input, theme::accent_bold()),
            Span::styled("_", theme::accent()),
        ]),
    ];
    f.render_widget(Paragraph::new(text), inner);
}
