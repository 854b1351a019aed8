use crate::ui::input_metrics::clamp_to_char_boundary_left;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorSnapshot {
    pub buffer: String,
    pub cursor: usize,
}

/// Keystrokes the field editor understands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditKey {
    Insert(String),
    Newline,
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Undo,
    Redo,
}

/// Single-buffer editor for whichever card field has focus. The buffer is
/// loaded from the field on focus change and written back after each edit.
#[derive(Default, Debug)]
pub struct FieldEditor {
    buffer: String,
    cursor: usize,
    undo_stack: Vec<EditorSnapshot>,
    redo_stack: Vec<EditorSnapshot>,
}

impl FieldEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the buffer, cursor at the end, history cleared.
    pub fn load(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.cursor = self.buffer.len();
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn clear(&mut self) {
        self.load("");
    }

    fn prev_char_boundary(&self, idx: usize) -> usize {
        let i = clamp_to_char_boundary_left(&self.buffer, idx);
        if i == 0 {
            return 0;
        }
        clamp_to_char_boundary_left(&self.buffer, i - 1)
    }

    fn next_char_boundary(&self, idx: usize) -> usize {
        let i = clamp_to_char_boundary_left(&self.buffer, idx);
        match self.buffer[i..].chars().next() {
            Some(ch) => i + ch.len_utf8(),
            None => self.buffer.len(),
        }
    }

    fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            buffer: self.buffer.clone(),
            cursor: self.cursor,
        }
    }

    fn push_undo(&mut self) {
        self.undo_stack.push(self.snapshot());
        self.redo_stack.clear();
    }

    fn restore(&mut self, snap: EditorSnapshot) {
        self.buffer = snap.buffer;
        self.cursor = clamp_to_char_boundary_left(&self.buffer, snap.cursor);
    }

    pub fn insert_str(&mut self, value: &str) {
        let cursor = clamp_to_char_boundary_left(&self.buffer, self.cursor);
        self.push_undo();
        self.buffer.insert_str(cursor, value);
        self.cursor = cursor + value.len();
    }

    pub fn backspace(&mut self) -> bool {
        let end = clamp_to_char_boundary_left(&self.buffer, self.cursor);
        if end == 0 {
            return false;
        }
        let start = self.prev_char_boundary(end);
        self.push_undo();
        self.buffer.replace_range(start..end, "");
        self.cursor = start;
        true
    }

    pub fn delete(&mut self) -> bool {
        let start = clamp_to_char_boundary_left(&self.buffer, self.cursor);
        if start >= self.buffer.len() {
            return false;
        }
        let end = self.next_char_boundary(start);
        self.push_undo();
        self.buffer.replace_range(start..end, "");
        self.cursor = start;
        true
    }

    pub fn undo(&mut self) -> bool {
        let Some(snap) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(self.snapshot());
        self.restore(snap);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snap) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push(self.snapshot());
        self.restore(snap);
        true
    }

    /// Returns true when the buffer text changed.
    pub fn apply(&mut self, key: EditKey, multiline: bool) -> bool {
        match key {
            EditKey::Insert(text) => {
                let text = if multiline {
                    text
                } else {
                    text.replace(['\r', '\n'], " ")
                };
                if text.is_empty() {
                    return false;
                }
                self.insert_str(&text);
                true
            }
            EditKey::Newline if multiline => {
                self.insert_str("\n");
                true
            }
            EditKey::Newline => false,
            EditKey::Backspace => self.backspace(),
            EditKey::Delete => self.delete(),
            EditKey::Undo => self.undo(),
            EditKey::Redo => self.redo(),
            EditKey::Left => {
                self.cursor = self.prev_char_boundary(self.cursor);
                false
            }
            EditKey::Right => {
                self.cursor = self.next_char_boundary(self.cursor);
                false
            }
            EditKey::Home => {
                self.cursor = 0;
                false
            }
            EditKey::End => {
                self.cursor = self.buffer.len();
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edits_respect_char_boundaries() {
        let mut editor = FieldEditor::new();
        editor.load("café");
        assert!(editor.apply(EditKey::Backspace, false));
        assert_eq!(editor.buffer(), "caf");
        editor.apply(EditKey::Home, false);
        assert!(editor.apply(EditKey::Delete, false));
        assert_eq!(editor.buffer(), "af");
        assert_eq!(editor.cursor(), 0);
    }

    #[test]
    fn test_single_line_fields_flatten_pasted_newlines() {
        let mut editor = FieldEditor::new();
        assert!(!editor.apply(EditKey::Newline, false));
        editor.apply(EditKey::Insert("Re:\nHello".to_string()), false);
        assert_eq!(editor.buffer(), "Re: Hello");

        let mut body = FieldEditor::new();
        body.apply(EditKey::Insert("Hi".to_string()), true);
        body.apply(EditKey::Newline, true);
        assert_eq!(body.buffer(), "Hi\n");
    }

    #[test]
    fn test_undo_and_redo_round_trip() {
        let mut editor = FieldEditor::new();
        editor.load("Hi");
        editor.apply(EditKey::Insert(" there".to_string()), false);
        assert!(editor.apply(EditKey::Undo, false));
        assert_eq!(editor.buffer(), "Hi");
        assert!(editor.apply(EditKey::Redo, false));
        assert_eq!(editor.buffer(), "Hi there");
        assert!(!editor.apply(EditKey::Redo, false));
    }

    #[test]
    fn test_load_resets_history() {
        let mut editor = FieldEditor::new();
        editor.apply(EditKey::Insert("draft".to_string()), false);
        editor.load("other");
        assert_eq!(editor.cursor(), 5);
        assert!(!editor.undo());
    }
}
