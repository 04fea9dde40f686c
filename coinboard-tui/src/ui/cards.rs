//! Ranked cards grid — one bordered card per asset, in projection order.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use coinboard_core::{Card, DashboardView};

use crate::theme;
use crate::ui::panel_block;

const CARD_WIDTH: u16 = 26;
const CARD_HEIGHT: u16 = 5;

pub fn render(f: &mut Frame, area: Rect, view: &DashboardView) {
    let block = panel_block(&format!("Top by {}", view.sort_field().label()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if view.cards.is_empty() {
        let msg = if view.filter().is_empty() {
            "No market data returned.".to_string()
        } else {
            format!("No assets match \"{}\".", view.filter())
        };
        f.render_widget(Paragraph::new(Span::styled(msg, theme::muted())), inner);
        return;
    }

    let cells = grid(inner, view.cards.len());
    for (card, cell) in view.cards.iter().zip(cells) {
        render_card(f, cell, card);
    }
}

/// Card slots laid out row by row; as many as fit in `area`.
pub fn grid(area: Rect, count: usize) -> Vec<Rect> {
    let columns = (area.width / CARD_WIDTH).max(1);
    let rows = area.height / CARD_HEIGHT;
    let width = area.width / columns;

    let mut cells = Vec::new();
    'rows: for row in 0..rows {
        for col in 0..columns {
            if cells.len() == count {
                break 'rows;
            }
            cells.push(Rect {
                x: area.x + col * width,
                y: area.y + row * CARD_HEIGHT,
                width,
                height: CARD_HEIGHT,
            });
        }
    }
    cells
}

fn render_card(f: &mut Frame, area: Rect, card: &Card) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(Line::from(vec![
            Span::styled(format!(" #{} ", card.rank), theme::neutral()),
            Span::styled(format!("{} ", card.symbol), theme::accent_bold()),
        ]));

    let lines = vec![
        Line::from(Span::styled(card.name.clone(), theme::text())),
        Line::from(vec![
            Span::styled(card.price_display.clone(), theme::accent()),
            Span::raw("  "),
            Span::styled(card.change_display.clone(), theme::change_style(card.change_pct_24h)),
        ]),
        Line::from(vec![
            Span::styled("Vol ", theme::muted()),
            Span::styled(card.volume_display.clone(), theme::text()),
        ]),
    ];
    f.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_fills_rows_left_to_right() {
        let area = Rect::new(0, 0, 80, 12);
        let cells = grid(area, 10);
        // 3 columns x 2 rows fit.
        assert_eq!(cells.len(), 6);
        assert_eq!((cells[0].x, cells[0].y), (0, 0));
        assert_eq!((cells[1].x, cells[1].y), (26, 0));
        assert_eq!((cells[3].x, cells[3].y), (0, 5));
    }

    #[test]
    fn grid_stops_at_count() {
        let cells = grid(Rect::new(0, 0, 200, 50), 4);
        assert_eq!(cells.len(), 4);
    }

    #[test]
    fn narrow_area_still_gets_one_column() {
        let cells = grid(Rect::new(0, 0, 10, 10), 3);
        assert_eq!(cells.len(), 2);
        assert!(cells.iter().all(|c| c.width == 10));
    }

    #[test]
    fn too_short_area_fits_nothing() {
        assert!(grid(Rect::new(0, 0, 100, 3), 5).is_empty());
    }
}
