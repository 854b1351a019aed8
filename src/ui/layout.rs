use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Below this height the key legend is dropped so cards keep their rows.
const MIN_ROWS_FOR_LEGEND: u16 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardLayout {
    pub status: Rect,
    pub cards: Rect,
    pub editor: Rect,
    pub legend: Rect,
}

/// Status line, card stack, field editor and key legend, top to bottom.
/// The editor grows with its content; the card stack takes what is left.
pub fn split_board_layout(area: Rect, editor_rows: u16) -> BoardLayout {
    let legend_rows = u16::from(area.height >= MIN_ROWS_FOR_LEGEND);
    let [status, cards, editor, legend] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(editor_rows.max(1)),
            Constraint::Length(legend_rows),
        ])
        .areas(area);

    BoardLayout {
        status,
        cards,
        editor,
        legend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_stacks_status_cards_editor_and_legend() {
        let panes = split_board_layout(Rect::new(0, 0, 80, 20), 4);

        assert_eq!(panes.status, Rect::new(0, 0, 80, 1));
        assert_eq!(panes.cards, Rect::new(0, 1, 80, 14));
        assert_eq!(panes.editor, Rect::new(0, 15, 80, 4));
        assert_eq!(panes.legend, Rect::new(0, 19, 80, 1));
    }

    #[test]
    fn test_short_terminals_drop_the_legend() {
        let panes = split_board_layout(Rect::new(0, 0, 80, 6), 2);

        assert_eq!(panes.legend.height, 0);
        assert_eq!(panes.editor.height, 2);
        assert_eq!(panes.cards.height, 3);
    }
}
