//! 24h volume bar chart, one bar per asset in display order.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Paragraph};
use ratatui::Frame;

use coinboard_core::format::format_volume_billions;
use coinboard_core::DashboardView;

use crate::theme;
use crate::ui::panel_block;

/// Bar heights are whole millions of the quote currency.
const UNIT: f64 = 1e6;

pub fn render(f: &mut Frame, area: Rect, view: &DashboardView) {
    let block = panel_block("24h Volume");
    let series = view.volume_series();

    if series.is_empty() {
        let inner = block.inner(area);
        f.render_widget(block, area);
        f.render_widget(
            Paragraph::new(Span::styled("No volume data to chart.", theme::muted())),
            inner,
        );
        return;
    }

    let symbols: Vec<String> = view.cards.iter().map(|c| c.symbol.clone()).collect();
    let bars: Vec<Bar> = series
        .iter()
        .zip(&symbols)
        .map(|((_, volume), symbol)| {
            Bar::default()
                .value(bar_value(*volume))
                .label(Line::from(symbol.clone()))
                .text_value(format_volume_billions(*volume, view.currency()))
                .style(Style::default().fg(theme::NEUTRAL))
                .value_style(theme::accent_bold())
        })
        .collect();

    let inner_width = area.width.saturating_sub(2);
    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width(inner_width, bars.len()))
        .bar_gap(1)
        .label_style(theme::muted());
    f.render_widget(chart, area);
}

/// Non-negative whole units for the chart; raw values stay untouched on the view.
fn bar_value(volume: f64) -> u64 {
    if volume.is_finite() && volume > 0.0 {
        (volume / UNIT).round() as u64
    } else {
        0
    }
}

/// Widest bar that still fits every bar plus its gap.
fn bar_width(available: u16, bars: usize) -> u16 {
    if bars == 0 {
        return 1;
    }
    let per_bar = available as usize / bars;
    per_bar.saturating_sub(1).clamp(1, 12) as u16
}
