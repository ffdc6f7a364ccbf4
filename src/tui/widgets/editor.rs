use ratatui::layout::Rect;
use std::cmp;
use std::fmt;

/// Text buffer behind every input box.
///
/// Multi-line editors accept newlines (description, weekly brief, feedback);
/// single-line editors ignore them so Enter can mean "commit".
#[derive(Debug, Clone)]
pub struct Editor {
    pub lines: Vec<String>,
    pub cursor_line: usize,
    pub cursor_col: usize,
    pub scroll_offset: usize, // Vertical scroll (line offset)
    pub scroll_col: usize,    // Horizontal scroll (column offset)
    multi_line: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::single_line(String::new())
    }
}

impl Editor {
    pub fn single_line(content: String) -> Self {
        Self::build(content.replace('\n', " "), false)
    }

    pub fn multi_line(content: String) -> Self {
        Self::build(content, true)
    }

    fn build(content: String, multi_line: bool) -> Self {
        let lines: Vec<String> = if content.is_empty() {
            vec![String::new()]
        } else {
            content.split('\n').map(|s| s.to_string()).collect()
        };
        let cursor_line = lines.len().saturating_sub(1);
        // chars().count() for UTF-8 safe positions, not byte count
        let cursor_col = lines.last().map(|l| l.chars().count()).unwrap_or(0);
        Self {
            lines,
            cursor_line,
            cursor_col,
            scroll_offset: 0,
            scroll_col: 0,
            multi_line,
        }
    }

    pub fn is_multi_line(&self) -> bool {
        self.multi_line
    }

    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }

    fn current_line_len(&self) -> usize {
        self.lines.get(self.cursor_line).map(|l| l.chars().count()).unwrap_or(0)
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.insert_newline();
            return;
        }
        if let Some(line) = self.lines.get_mut(self.cursor_line) {
            let mut chars: Vec<char> = line.chars().collect();
            let col = cmp::min(self.cursor_col, chars.len());
            chars.insert(col, ch);
            *line = chars.into_iter().collect();
            self.cursor_col = col + 1;
        }
    }

    /// Backspace
    pub fn delete_char(&mut self) {
        if self.cursor_col > 0 {
            if let Some(line) = self.lines.get_mut(self.cursor_line) {
                let mut chars: Vec<char> = line.chars().collect();
                let col = cmp::min(self.cursor_col, chars.len());
                if col > 0 {
                    chars.remove(col - 1);
                    *line = chars.into_iter().collect();
                    self.cursor_col = col - 1;
                }
            }
        } else if self.cursor_line > 0 {
            let current = self.lines.remove(self.cursor_line);
            self.cursor_line -= 1;
            self.cursor_col = self.current_line_len();
            if let Some(prev) = self.lines.get_mut(self.cursor_line) {
                prev.push_str(&current);
            }
        }
    }

    /// Delete key
    pub fn delete_forward(&mut self) {
        let len = self.current_line_len();
        if self.cursor_col < len {
            if let Some(line) = self.lines.get_mut(self.cursor_line) {
                let mut chars: Vec<char> = line.chars().collect();
                chars.remove(self.cursor_col);
                *line = chars.into_iter().collect();
            }
        } else if self.cursor_line + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor_line + 1);
            if let Some(line) = self.lines.get_mut(self.cursor_line) {
                line.push_str(&next);
            }
        }
    }

    pub fn insert_newline(&mut self) {
        if !self.multi_line {
            return;
        }
        if let Some(line) = self.lines.get_mut(self.cursor_line) {
            let mut chars: Vec<char> = line.chars().collect();
            let col = cmp::min(self.cursor_col, chars.len());
            let remainder: String = chars.split_off(col).into_iter().collect();
            *line = chars.into_iter().collect();
            self.lines.insert(self.cursor_line + 1, remainder);
            self.cursor_line += 1;
            self.cursor_col = 0;
        }
    }

    pub fn move_cursor_up(&mut self) {
        if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = cmp::min(self.cursor_col, self.current_line_len());
        }
    }

    pub fn move_cursor_down(&mut self) {
        if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = cmp::min(self.cursor_col, self.current_line_len());
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.current_line_len();
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_col < self.current_line_len() {
            self.cursor_col += 1;
        } else if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = 0;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_col = self.current_line_len();
    }

    pub fn clear(&mut self) {
        self.lines = vec![String::new()];
        self.cursor_line = 0;
        self.cursor_col = 0;
        self.scroll_offset = 0;
        self.scroll_col = 0;
    }

    pub fn update_scroll(&mut self, viewport_height: usize) {
        let viewport_height = viewport_height.max(1);
        if self.cursor_line < self.scroll_offset {
            self.scroll_offset = self.cursor_line;
        } else if self.cursor_line >= self.scroll_offset + viewport_height {
            self.scroll_offset = self.cursor_line + 1 - viewport_height;
        }
    }

    /// `viewport_width` is the inner width, borders already removed
    pub fn update_horizontal_scroll(&mut self, viewport_width: usize) {
        let viewport_width = viewport_width.max(1);
        if self.cursor_col < self.scroll_col {
            self.scroll_col = self.cursor_col;
        } else if self.cursor_col >= self.scroll_col + viewport_width {
            self.scroll_col = self.cursor_col + 1 - viewport_width;
        }
    }

    pub fn visible_lines(&self, viewport_height: usize, viewport_width: usize) -> Vec<String> {
        let start = cmp::min(self.scroll_offset, self.lines.len());
        let end = cmp::min(start + viewport_height, self.lines.len());
        self.lines[start..end]
            .iter()
            .map(|line| line.chars().skip(self.scroll_col).take(viewport_width).collect())
            .collect()
    }

    /// Terminal position of the cursor for an editor drawn inside `inner`
    /// (the area within the borders), if it is visible.
    pub fn cursor_screen_pos(&self, inner: Rect) -> Option<(u16, u16)> {
        if self.cursor_line < self.scroll_offset || self.cursor_col < self.scroll_col {
            return None;
        }
        let y = (self.cursor_line - self.scroll_offset) as u16;
        let x = (self.cursor_col - self.scroll_col) as u16;
        if y >= inner.height || x >= inner.width {
            return None;
        }
        Some((inner.x + x, inner.y + y))
    }
}

impl fmt::Display for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_ignores_newline() {
        let mut editor = Editor::single_line("Jhub".to_string());
        editor.insert_char('\n');
        editor.insert_char('!');
        assert_eq!(editor.to_string(), "Jhub!");
        assert_eq!(editor.lines.len(), 1);
    }

    #[test]
    fn test_multi_line_split_and_merge() {
        let mut editor = Editor::multi_line("ab".to_string());
        editor.move_cursor_left();
        editor.insert_newline();
        assert_eq!(editor.to_string(), "a\nb");
        editor.delete_char();
        assert_eq!(editor.to_string(), "ab");
        assert_eq!(editor.cursor_col, 1);
    }

    #[test]
    fn test_utf8_editing() {
        let mut editor = Editor::single_line("Mañana".to_string());
        editor.delete_char();
        editor.move_cursor_home();
        editor.delete_forward();
        assert_eq!(editor.to_string(), "añan");
    }

    #[test]
    fn test_horizontal_scroll_keeps_cursor_visible() {
        let mut editor = Editor::single_line("abcdefghij".to_string());
        editor.update_horizontal_scroll(4);
        assert_eq!(editor.scroll_col, 7);
        assert_eq!(editor.visible_lines(1, 4), vec!["hij".to_string()]);
        assert_eq!(editor.cursor_screen_pos(Rect::new(10, 5, 4, 1)), Some((13, 5)));
    }
}
