//! Plain-text rendering of a `DashboardView` for terminal output.

use std::fmt::Write;

use coinboard_core::format::{format_share, format_volume_billions};
use coinboard_core::{DashboardView, Freshness};

const BAR_WIDTH: usize = 30;
const NAME_WIDTH: usize = 14;

/// Header, ranked cards, volume bars, and volume share, in that order.
pub fn render_text(view: &DashboardView) -> String {
    let mut out = String::new();
    write_header(&mut out, view);
    out.push('\n');

    if view.is_empty() {
        if view.filter().is_empty() {
            out.push_str("No market data returned.\n");
        } else {
            let _ = writeln!(out, "No assets match \"{}\".", view.filter());
        }
        return out;
    }

    write_cards(&mut out, view);
    out.push('\n');
    write_volume_bars(&mut out, view);
    out.push('\n');
    write_share(&mut out, view);
    out
}

fn write_header(out: &mut String, view: &DashboardView) {
    let p = &view.params;
    let _ = write!(
        out,
        "Coinboard | {} | top {} | sorted by {}",
        p.currency.code(),
        p.count,
        p.sort_field.label()
    );
    if !p.filter.is_empty() {
        let _ = write!(out, " | filter \"{}\"", p.filter);
    }
    out.push('\n');

    let updated = view.fetched_at.format("%Y-%m-%d %H:%M:%S UTC");
    let _ = match &view.freshness {
        Freshness::Fresh => writeln!(out, "Updated {updated}"),
        Freshness::Cached => writeln!(out, "Updated {updated} (cached)"),
        Freshness::Stale { error } => {
            writeln!(out, "STALE: showing data from {updated}; refresh failed: {error}")
        }
    };
    let _ = writeln!(
        out,
        "Showing {} of {} fetched",
        view.entries.len(),
        view.fetched_count
    );
}

fn write_cards(out: &mut String, view: &DashboardView) {
    let _ = writeln!(
        out,
        "{:>3}  {:<NAME_WIDTH$} {:<7} {:>16} {:>9} {:>12}",
        "#", "Name", "Symbol", "Price", "24h", "Volume"
    );
    let _ = writeln!(out, "{}", "-".repeat(3 + 2 + NAME_WIDTH + 1 + 7 + 1 + 16 + 1 + 9 + 1 + 12));
    for card in &view.cards {
        let _ = writeln!(
            out,
            "{:>3}  {:<NAME_WIDTH$} {:<7} {:>16} {:>9} {:>12}",
            card.rank,
            truncate(&card.name, NAME_WIDTH),
            card.symbol,
            card.price_display,
            card.change_display,
            card.volume_display
        );
    }
}

fn write_volume_bars(out: &mut String, view: &DashboardView) {
    out.push_str("24h Volume\n");
    let series = view.volume_series();
    let max = series.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    for (name, volume) in &series {
        let _ = writeln!(
            out,
            "{:<NAME_WIDTH$} {:<BAR_WIDTH$} {}",
            truncate(name, NAME_WIDTH),
            bar(*volume, max, BAR_WIDTH),
            format_volume_billions(*volume, view.currency())
        );
    }
}

fn write_share(out: &mut String, view: &DashboardView) {
    out.push_str("Volume share\n");
    let share = view.volume_share();
    if share.is_empty() {
        out.push_str("(no volume reported)\n");
        return;
    }
    for slice in &share {
        let _ = writeln!(
            out,
            "{:<NAME_WIDTH$} {:>6}",
            truncate(&slice.name, NAME_WIDTH),
            format_share(slice.fraction)
        );
    }
}

/// `width`-scaled bar of `#` for `value` relative to `max`.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if !(max > 0.0) || !value.is_finite() || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * width as f64).round() as usize;
    "#".repeat(filled.clamp(1, width))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(max.saturating_sub(1)).collect();
        t.push('~');
        t
    }
}
