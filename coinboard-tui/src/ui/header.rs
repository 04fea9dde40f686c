//! Header — current controls and data freshness.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use coinboard_core::Freshness;

use crate::app::AppState;
use crate::theme;
use crate::ui::panel_block;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let p = &app.params;
    let filter = if p.filter.is_empty() {
        "none".to_string()
    } else {
        format!("\"{}\"", p.filter)
    };

    let mut spans = vec![
        Span::styled("Currency ", theme::muted()),
        Span::styled(p.currency.code().to_uppercase(), theme::accent_bold()),
        Span::styled("  Top ", theme::muted()),
        Span::styled(p.count.to_string(), theme::accent_bold()),
        Span::styled("  Sort ", theme::muted()),
        Span::styled(p.sort_field.label(), theme::accent_bold()),
        Span::styled("  Filter ", theme::muted()),
        Span::styled(filter, theme::accent_bold()),
        Span::raw("   "),
    ];
    spans.extend(freshness_spans(app));

    let block = panel_block("Coinboard");
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn freshness_spans(app: &AppState) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    if app.driver.is_in_flight() {
        spans.push(Span::styled("refreshing ", theme::neutral()));
    }
    let Some(view) = app.shown_view() else {
        return spans;
    };
    let updated = view
        .fetched_at
        .with_timezone(&chrono::Local)
        .format("%H:%M:%S")
        .to_string();
    match &view.freshness {
        Freshness::Stale { .. } => {
            spans.push(Span::styled("STALE ", theme::warning_bold()));
            spans.push(Span::styled(format!("data from {updated}"), theme::warning()));
        }
        Freshness::Fresh | Freshness::Cached => {
            spans.push(Span::styled(format!("updated {updated}"), theme::muted()));
        }
    }
    spans
}
