use crate::classify::BorderTone;
use crate::render::{ActionView, CardView, FocusTarget, Section};
use crate::ui::input_metrics::{
    char_display_width, cursor_row_col, truncate_to_display_width, wrap_input_lines,
};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn input_visual_rows(input: &str, width: usize) -> usize {
    wrap_input_lines(input, width).len().max(1)
}

pub fn tone_color(tone: BorderTone) -> Color {
    match tone {
        BorderTone::Neutral => Color::DarkGray,
        BorderTone::Blue => Color::Blue,
        BorderTone::Green => Color::Green,
        BorderTone::Yellow => Color::Yellow,
        BorderTone::Purple => Color::Magenta,
        BorderTone::Red => Color::Red,
    }
}

/// Editor pane for the focused field. With nothing focused a dim hint is
/// shown and the cursor stays hidden.
pub fn render_input(
    frame: &mut Frame<'_>,
    area: Rect,
    input: Option<(&str, usize)>,
    hint: &str,
) {
    if area.height == 0 || area.width <= 2 {
        return;
    }
    let style = Style::default().fg(Color::Gray).bg(Color::Rgb(24, 24, 24));

    let Some((input, cursor_byte)) = input else {
        frame.render_widget(
            Paragraph::new(truncate_line(hint, area.width as usize))
                .style(style.add_modifier(Modifier::DIM)),
            area,
        );
        return;
    };

    let input_width = area.width.saturating_sub(2).max(1) as usize;
    let lines = wrap_input_lines(input, input_width);
    let (cursor_row, cursor_col) = cursor_row_col(input, cursor_byte, input_width);
    let visible_rows = area.height as usize;
    let window_start = cursor_row.saturating_add(1).saturating_sub(visible_rows);

    let rendered: Vec<Line> = (0..visible_rows)
        .map(|offset| {
            let row_index = window_start + offset;
            let prefix = if row_index == 0 { "> " } else { "  " };
            let line = lines.get(row_index).cloned().unwrap_or_default();
            Line::from(format!("{prefix}{line}"))
        })
        .collect();

    frame.render_widget(Paragraph::new(rendered).style(style), area);

    let cursor_y = area
        .y
        .saturating_add(cursor_row.saturating_sub(window_start) as u16);
    let cursor_x = area
        .x
        .saturating_add(2 + cursor_col as u16)
        .min(area.x.saturating_add(area.width.saturating_sub(1)));
    frame.set_cursor_position((cursor_x, cursor_y));
}

pub fn render_status_line(frame: &mut Frame<'_>, area: Rect, status: &str) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    let text = truncate_line(status, area.width as usize);
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

/// Stack cards top to bottom, scrolled so the selected one is visible.
pub fn render_cards(
    frame: &mut Frame<'_>,
    area: Rect,
    cards: &[CardView],
    selected: Option<usize>,
    focus: Option<FocusTarget>,
) {
    if area.height == 0 || area.width <= 2 {
        return;
    }
    if cards.is_empty() {
        frame.render_widget(
            Paragraph::new("Waiting for the assistant...")
                .style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let blocks: Vec<(Vec<Line<'static>>, u16)> = cards
        .iter()
        .enumerate()
        .map(|(index, view)| {
            let card_focus = if Some(index) == selected { focus } else { None };
            let lines = card_lines(view, card_focus);
            let rows: usize = lines
                .iter()
                .map(|line| wrapped_rows(line, inner_width))
                .sum();
            let height = (rows as u16).saturating_add(2);
            (lines, height)
        })
        .collect();

    let first = first_visible_card(&blocks, selected.unwrap_or(0), area.height);
    let mut y = area.y;
    let bottom = area.y.saturating_add(area.height);
    for (index, (lines, height)) in blocks.into_iter().enumerate().skip(first) {
        if y >= bottom {
            break;
        }
        let height = height.min(bottom - y);
        let view = &cards[index];
        let mut border = Style::default().fg(tone_color(view.tone));
        if Some(index) == selected {
            border = border.add_modifier(Modifier::BOLD);
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!(" {} ", view.title));
        let rect = Rect::new(area.x, y, area.width, height);
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            rect,
        );
        y = y.saturating_add(height);
    }
}

fn first_visible_card(blocks: &[(Vec<Line<'static>>, u16)], selected: usize, rows: u16) -> usize {
    let selected = selected.min(blocks.len().saturating_sub(1));
    let mut used = 0u16;
    let mut first = selected;
    for index in (0..=selected).rev() {
        used = used.saturating_add(blocks[index].1);
        if used > rows && index != selected {
            break;
        }
        first = index;
    }
    first
}

fn wrapped_rows(line: &Line<'_>, width: usize) -> usize {
    let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
    wrap_input_lines(&text, width.max(1)).len().max(1)
}

/// Text content of a card, without the border.
pub fn card_lines(view: &CardView, focus: Option<FocusTarget>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let accent = Style::default().fg(tone_color(view.tone));
    let dim = Style::default().fg(Color::DarkGray);
    let bold = Style::default().add_modifier(Modifier::BOLD);

    if let Some(banner) = &view.banner {
        lines.push(Line::styled(
            banner.headline.clone(),
            accent.add_modifier(Modifier::BOLD),
        ));
        if let Some(detail) = &banner.detail {
            lines.extend(detail.lines().map(|line| Line::from(format!("  {line}"))));
        }
    }

    for section in &view.sections {
        match section {
            Section::Field(field) => {
                let focused = field.target.is_some() && field.target == focus;
                labelled(&mut lines, field.label, &field.value, field.placeholder, focused);
            }
            Section::Input(input) => {
                let focused = Some(input.target) == focus;
                labelled(&mut lines, input.label, &input.text, input.placeholder, focused);
            }
            Section::Text { label, text } => {
                lines.push(Line::styled(format!("{label}:"), bold));
                lines.extend(text.lines().map(|line| Line::from(format!("  {line}"))));
            }
            Section::Events(events) => {
                for event in events {
                    lines.push(Line::from(vec![
                        Span::styled(format!("• {}", event.summary), bold),
                        Span::styled(
                            format!("  {} – {}", event.start_time, event.end_time),
                            dim,
                        ),
                    ]));
                }
            }
            Section::Note(note) => {
                lines.push(Line::styled(
                    note.clone(),
                    dim.add_modifier(Modifier::ITALIC),
                ));
            }
        }
    }

    if !view.actions.is_empty() {
        lines.push(action_line(&view.actions));
    }
    if let Some(link) = &view.gmail_link {
        lines.push(Line::styled(format!("Open in Gmail: {link}"), dim));
    }
    lines
}

fn labelled(
    lines: &mut Vec<Line<'static>>,
    label: &str,
    value: &str,
    placeholder: &str,
    focused: bool,
) {
    let marker = if focused { "▸ " } else { "  " };
    let label_style = if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let head = Span::styled(format!("{marker}{label}: "), label_style);

    if value.is_empty() {
        lines.push(Line::from(vec![
            head,
            Span::styled(placeholder.to_string(), Style::default().fg(Color::DarkGray)),
        ]));
        return;
    }

    let mut rows = value.lines();
    let first = rows.next().unwrap_or_default().to_string();
    lines.push(Line::from(vec![head, Span::raw(first)]));
    lines.extend(rows.map(|row| Line::from(format!("    {row}"))));
}

fn action_line(actions: &[ActionView]) -> Line<'static> {
    let mut spans = Vec::new();
    for (index, action) in actions.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw("   "));
        }
        let style = if action.enabled {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("[{}] {}", action.keys, action.label), style));
    }
    Line::from(spans)
}

pub fn truncate_line(input: &str, width: usize) -> String {
    let width = width.max(1);
    let mut out = String::new();
    let mut used = 0usize;
    let mut truncated = false;

    for ch in input.chars() {
        let ch_width = char_display_width(ch);
        if used + ch_width > width {
            truncated = true;
            break;
        }
        out.push(ch);
        used += ch_width;
    }

    if truncated && width >= 4 {
        out = truncate_to_display_width(&out, width - 3);
        out.push_str("...");
    }
    out
}
