use unicode_width::UnicodeWidthChar;

/// Hard-wrap text to `width` display columns. `\n` starts a new row, `\r` is
/// ignored. Always returns at least one row.
pub fn wrap_input_lines(input: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows: Vec<(String, usize)> = vec![(String::new(), 0)];
    for ch in input.chars() {
        match ch {
            '\r' => {}
            '\n' => rows.push((String::new(), 0)),
            _ => {
                let ch_width = char_display_width(ch);
                let overflow = rows
                    .last()
                    .is_some_and(|(_, used)| *used > 0 && used + ch_width > width);
                if overflow {
                    rows.push((String::new(), 0));
                }
                if let Some((row, used)) = rows.last_mut() {
                    row.push(ch);
                    *used += ch_width;
                }
            }
        }
    }
    rows.into_iter().map(|(row, _)| row).collect()
}

/// Row and column of `cursor_byte` after wrapping to `width`.
pub fn cursor_row_col(input: &str, cursor_byte: usize, width: usize) -> (usize, usize) {
    let width = width.max(1);
    let cursor_byte = clamp_to_char_boundary_left(input, cursor_byte);
    let (mut row, mut col) = (0usize, 0usize);

    for ch in input[..cursor_byte].chars() {
        match ch {
            '\r' => {}
            '\n' => {
                row += 1;
                col = 0;
            }
            _ => {
                let ch_width = char_display_width(ch);
                if col > 0 && col + ch_width > width {
                    row += 1;
                    col = 0;
                }
                col += ch_width;
            }
        }
    }

    if col >= width {
        (row + 1, 0)
    } else {
        (row, col)
    }
}

pub fn truncate_to_display_width(text: &str, max_width: usize) -> String {
    let mut used = 0usize;
    text.chars()
        .take_while(|&ch| {
            let ch_width = char_display_width(ch);
            let fits = used == 0 || used + ch_width <= max_width;
            if fits {
                used += ch_width;
            }
            fits
        })
        .collect()
}

pub fn char_display_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

pub fn clamp_to_char_boundary_left(input: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(input.len());
    while cursor > 0 && !input.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_on_width_and_newlines() {
        assert_eq!(wrap_input_lines("abcdef", 4), vec!["abcd", "ef"]);
        assert_eq!(wrap_input_lines("ab\r\ncd", 4), vec!["ab", "cd"]);
        assert_eq!(wrap_input_lines("", 4), vec![""]);
    }

    #[test]
    fn test_wide_chars_count_double() {
        assert_eq!(wrap_input_lines("日本語", 4), vec!["日本", "語"]);
        assert_eq!(truncate_to_display_width("日本語", 5), "日本");
    }

    #[test]
    fn test_cursor_follows_wrapping() {
        assert_eq!(cursor_row_col("abcdef", 6, 4), (1, 2));
        assert_eq!(cursor_row_col("abcd", 4, 4), (1, 0));
        assert_eq!(cursor_row_col("ab\ncd", 4, 10), (1, 1));
    }

    #[test]
    fn test_clamps_inside_multibyte_chars() {
        assert_eq!(clamp_to_char_boundary_left("é", 1), 0);
        assert_eq!(clamp_to_char_boundary_left("abc", 10), 3);
    }
}
