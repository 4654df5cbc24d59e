use ropey::Rope;
use unicode_segmentation::UnicodeSegmentation;
use vim_engine::{Position, Span, TextBuffer, TextBufferMut};

pub struct MockBuffer {
    rope: Rope,
}

impl MockBuffer {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    pub fn from_lines(lines: &[&str]) -> Self {
        Self::new(&lines.join("\n"))
    }

    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    fn line_str(&self, line: u32) -> String {
        if line as usize >= self.rope.len_lines() {
            return String::new();
        }
        let line_ref = self.rope.line(line as usize);
        let mut s = line_ref.to_string();
        // Remove trailing newline if present
        if s.ends_with('\n') {
            s.pop();
        }
        s
    }

    /// Char index of a grapheme position, clamped to the line's end.
    fn char_index(&self, pos: Position) -> usize {
        let line = (pos.line as usize).min(self.rope.len_lines() - 1);
        let text = self.line_str(line as u32);
        let chars: usize = text
            .graphemes(true)
            .take(pos.col as usize)
            .map(|g| g.chars().count())
            .sum();
        self.rope.line_to_char(line) + chars
    }
}

impl TextBuffer for MockBuffer {
    fn line(&self, line: u32) -> String {
        self.line_str(line)
    }

    fn line_count(&self) -> u32 {
        self.rope.len_lines() as u32
    }
}

impl TextBufferMut for MockBuffer {
    fn delete(&mut self, span: &Span) {
        let lines = self.rope.len_lines();
        if span.is_linewise() {
            let first = (span.start.line as usize).min(lines - 1);
            let last = (span.end.line as usize).min(lines - 1);
            let (from, to) = if last + 1 < lines {
                (self.rope.line_to_char(first), self.rope.line_to_char(last + 1))
            } else if first > 0 {
                // Removing the final lines also removes the break before them.
                (self.rope.line_to_char(first) - 1, self.rope.len_chars())
            } else {
                (0, self.rope.len_chars())
            };
            self.rope.remove(from..to);
            return;
        }
        let from = self.char_index(span.start);
        let to = self.char_index(Position {
            line: span.end.line,
            col: span.end.col.saturating_add(1),
        });
        if from < to {
            self.rope.remove(from..to);
        }
    }

    fn insert(&mut self, at: Position, text: &str, linewise: bool) {
        if linewise {
            let lines = self.rope.len_lines();
            if (at.line as usize) < lines {
                let idx = self.rope.line_to_char(at.line as usize);
                self.rope.insert(idx, &format!("{text}\n"));
            } else {
                let end = self.rope.len_chars();
                self.rope.insert(end, &format!("\n{text}"));
            }
            return;
        }
        let idx = self.char_index(at);
        self.rope.insert(idx, text);
    }
}
