use crate::error::Result;
use crate::motion::{byte_index, extract_text, grapheme_len};
use crate::types::{Edit, Position, Span};

/// Read-only access to the host's text.
///
/// Only `line` and `line_count` are required; everything else has a
/// grapheme-aware default built on them.
pub trait TextBuffer {
    /// Content of `line` without its line terminator, or `""` when the line
    /// does not exist.
    fn line(&self, line: u32) -> String;

    /// Number of lines. An empty document still has one (empty) line.
    fn line_count(&self) -> u32;

    /// Length of `line` in grapheme columns.
    fn line_len(&self, line: u32) -> u32 {
        grapheme_len(&self.line(line))
    }

    /// Charwise text between two positions, end inclusive.
    fn text(&self, start: Position, end: Position) -> String {
        extract_text(self, start, end, false)
    }

    /// Clamps `pos` onto an existing character (or column 0 of an empty line).
    fn clamp(&self, pos: Position) -> Position {
        let last_line = self.line_count().saturating_sub(1);
        let line = pos.line.min(last_line);
        let col = pos.col.min(self.line_len(line).saturating_sub(1));
        Position { line, col }
    }
}

/// Mutation capability for buffers that let the engine apply its own edits.
///
/// Hosts that prefer to stay in control implement only [`TextBuffer`] and
/// apply the [`Edit`]s returned by [`crate::Engine::handle_key`].
pub trait TextBufferMut: TextBuffer {
    /// Removes the text covered by `span`. Linewise spans remove whole lines.
    fn delete(&mut self, span: &Span);

    /// Inserts `text` at `at`. Linewise text is a `\n`-joined list of lines
    /// inserted before line `at.line`.
    fn insert(&mut self, at: Position, text: &str, linewise: bool);

    fn apply(&mut self, edit: &Edit) {
        match edit {
            Edit::Delete { span } => self.delete(span),
            Edit::Insert { at, text, linewise } => self.insert(*at, text, *linewise),
        }
    }
}

/// Bridge to the host's system clipboard, used by the `"+` and `"*` registers.
///
/// Implementations must not block for long; failures are reported as errors
/// and the register bank logs and drops them.
pub trait Clipboard {
    /// Current clipboard text, or `None` when unavailable.
    fn get(&self) -> Option<String>;
    fn set(&self, text: &str) -> Result<()>;
}

impl<S: AsRef<str>> TextBuffer for [S] {
    fn line(&self, line: u32) -> String {
        self.get(line as usize)
            .map(|s| s.as_ref().to_string())
            .unwrap_or_default()
    }

    fn line_count(&self) -> u32 {
        self.len().max(1) as u32
    }
}

impl<S: AsRef<str>> TextBuffer for Vec<S> {
    fn line(&self, line: u32) -> String {
        self.as_slice().line(line)
    }

    fn line_count(&self) -> u32 {
        self.as_slice().line_count()
    }
}

impl TextBufferMut for Vec<String> {
    fn delete(&mut self, span: &Span) {
        if self.is_empty() {
            return;
        }
        let last = self.len() - 1;
        let first_line = (span.start.line as usize).min(last);
        let last_line = (span.end.line as usize).min(last);

        if span.is_linewise() {
            self.drain(first_line..=last_line);
            if self.is_empty() {
                self.push(String::new());
            }
            return;
        }

        let head_line = &self[first_line];
        let head = head_line[..byte_index(head_line, span.start.col)].to_string();
        let tail_line = &self[last_line];
        let tail = if span.end.line as usize > last {
            ""
        } else {
            &tail_line[byte_index(tail_line, span.end.col.saturating_add(1))..]
        };
        let joined = format!("{head}{tail}");
        self.drain(first_line + 1..=last_line);
        self[first_line] = joined;
    }

    fn insert(&mut self, at: Position, text: &str, linewise: bool) {
        if linewise {
            let index = (at.line as usize).min(self.len());
            let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
            self.splice(index..index, lines);
            return;
        }

        if self.is_empty() {
            self.push(String::new());
        }
        let index = (at.line as usize).min(self.len() - 1);
        let line = &self[index];
        let split = byte_index(line, at.col);
        let combined = format!("{}{}{}", &line[..split], text, &line[split..]);
        let lines: Vec<String> = combined.split('\n').map(str::to_string).collect();
        self.splice(index..=index, lines);
    }
}
