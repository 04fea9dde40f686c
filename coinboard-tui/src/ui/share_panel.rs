//! Volume share of total — a horizontal gauge per asset.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use coinboard_core::format::format_share;
use coinboard_core::DashboardView;

use crate::theme;
use crate::ui::panel_block;

const LABEL_WIDTH: usize = 10;
const PCT_WIDTH: usize = 7;

pub fn render(f: &mut Frame, area: Rect, view: &DashboardView) {
    let block = panel_block("Volume Share");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let share = view.volume_share();
    if share.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("No volume reported.", theme::muted())),
            inner,
        );
        return;
    }

    let gauge_width = (inner.width as usize).saturating_sub(LABEL_WIDTH + PCT_WIDTH + 2);
    let lines: Vec<Line> = share
        .iter()
        .zip(&view.cards)
        .map(|(slice, card)| {
            Line::from(vec![
                Span::styled(format!("{:<LABEL_WIDTH$} ", card.symbol), theme::accent()),
                Span::styled(gauge(slice.fraction, gauge_width), theme::neutral()),
                Span::styled(
                    format!(" {:>PCT_WIDTH$}", format_share(slice.fraction)),
                    theme::text(),
                ),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

/// Fixed-width bar: filled part `█`, remainder `░`.
fn gauge(fraction: f64, width: usize) -> String {
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (fraction * width as f64).round() as usize;
    let mut s = "█".repeat(filled.min(width));
    s.push_str(&"░".repeat(width - filled.min(width)));
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauge_fills_proportionally() {
        assert_eq!(gauge(0.5, 10), format!("{}{}", "█".repeat(5), "░".repeat(5)));
        assert_eq!(gauge(1.0, 4), "████");
        assert_eq!(gauge(0.0, 4), "░░░░");
        assert_eq!(gauge(f64::NAN, 3), "░░░");
        assert_eq!(gauge(0.3, 0), "");
    }
}
