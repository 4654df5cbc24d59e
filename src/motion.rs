//! Motion lookup, resolution and range extraction.
//!
//! A [`Motion`] says how far a cursor or operator range extends. The
//! resolver turns it into a target [`Position`] against a [`TextBuffer`];
//! [`operator_span`] turns the pair (start, target) into the inclusive
//! [`Span`] an operator works on.

use unicode_segmentation::UnicodeSegmentation;

use crate::config::{MotionRules, WordBoundary};
use crate::traits::TextBuffer;
use crate::types::{Position, Span};

/// The unit a motion moves in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionType {
    Char,
    Line,
    Word,
    Paragraph,
    Document,
}

/// Every motion the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    /// `h`
    Left,
    /// `l`
    Right,
    /// `k`
    Up,
    /// `j`
    Down,
    /// `0`
    LineStart,
    /// `^`
    FirstNonBlank,
    /// `$`
    LineEnd,
    /// `w` / `W`
    WordForward { big: bool },
    /// `b` / `B`
    WordBackward { big: bool },
    /// `e` / `E`
    WordEnd { big: bool },
    /// `}`
    ParagraphForward,
    /// `{`
    ParagraphBackward,
    /// `gg` and `G`: line `count`, column 0.
    DocumentStart,
    /// `G` without a count when [`MotionRules::g_to_last_line`] is set: the
    /// last line.
    DocumentEnd,
    /// The cursor line and `count - 1` lines below; used by `yy`, `dd`, `cc`.
    Lines,
}

impl MotionKind {
    pub fn motion_type(self) -> MotionType {
        match self {
            MotionKind::Left
            | MotionKind::Right
            | MotionKind::LineStart
            | MotionKind::FirstNonBlank
            | MotionKind::LineEnd => MotionType::Char,
            MotionKind::Up | MotionKind::Down | MotionKind::Lines => MotionType::Line,
            MotionKind::WordForward { .. }
            | MotionKind::WordBackward { .. }
            | MotionKind::WordEnd { .. } => MotionType::Word,
            MotionKind::ParagraphForward | MotionKind::ParagraphBackward => MotionType::Paragraph,
            MotionKind::DocumentStart | MotionKind::DocumentEnd => MotionType::Document,
        }
    }

    fn inclusive(self) -> bool {
        matches!(
            self,
            MotionKind::LineEnd
                | MotionKind::WordEnd { .. }
                | MotionKind::Up
                | MotionKind::Down
                | MotionKind::Lines
                | MotionKind::DocumentStart
                | MotionKind::DocumentEnd
        )
    }
}

/// A motion with its repeat count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Motion {
    pub kind: MotionKind,
    /// Always at least 1.
    pub count: u32,
    /// Whether the character at the target belongs to an operator range.
    pub inclusive: bool,
    /// Operators over this motion act on whole lines.
    pub linewise: bool,
}

impl Motion {
    pub fn new(kind: MotionKind) -> Self {
        Self {
            kind,
            count: 1,
            inclusive: kind.inclusive(),
            linewise: kind.motion_type() == MotionType::Line,
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count.max(1);
        self
    }

    pub fn motion_type(&self) -> MotionType {
        self.kind.motion_type()
    }

    pub fn is_linewise(&self) -> bool {
        self.linewise
    }
}

/// Looks up a complete motion key sequence. Returns `None` for unknown
/// sequences and for prefixes such as `g` that need another key.
pub fn parse_motion_key(keys: &str) -> Option<Motion> {
    let kind = match keys {
        "h" => MotionKind::Left,
        "l" => MotionKind::Right,
        "j" => MotionKind::Down,
        "k" => MotionKind::Up,
        "w" => MotionKind::WordForward { big: false },
        "W" => MotionKind::WordForward { big: true },
        "b" => MotionKind::WordBackward { big: false },
        "B" => MotionKind::WordBackward { big: true },
        "e" => MotionKind::WordEnd { big: false },
        "E" => MotionKind::WordEnd { big: true },
        "$" => MotionKind::LineEnd,
        "^" => MotionKind::FirstNonBlank,
        "0" => MotionKind::LineStart,
        "G" => MotionKind::DocumentStart,
        "gg" => MotionKind::DocumentStart,
        "}" => MotionKind::ParagraphForward,
        "{" => MotionKind::ParagraphBackward,
        _ => return None,
    };
    Some(Motion::new(kind))
}

/// Looks up `keys` like [`parse_motion_key`] and adapts the motion to
/// `rules`. `counted` is whether the user typed a count, which always makes
/// `G` go to that line.
pub fn lookup_motion(keys: &str, rules: &MotionRules, counted: bool) -> Option<Motion> {
    let motion = parse_motion_key(keys)?;
    let kind = match motion.kind {
        MotionKind::DocumentStart if keys == "G" && rules.g_to_last_line && !counted => {
            MotionKind::DocumentEnd
        }
        kind if rules.word_boundary == WordBoundary::Whitespace => match kind {
            MotionKind::WordForward { .. } => MotionKind::WordForward { big: true },
            MotionKind::WordBackward { .. } => MotionKind::WordBackward { big: true },
            MotionKind::WordEnd { .. } => MotionKind::WordEnd { big: true },
            other => other,
        },
        kind => kind,
    };
    let mut motion = Motion::new(kind);
    if rules.linewise_document && motion.motion_type() == MotionType::Document {
        motion.linewise = true;
    }
    Some(motion)
}

/// True when `keys` is an incomplete motion that more keys could finish.
pub fn is_motion_prefix(keys: &str) -> bool {
    keys == "g"
}

/// Resolves `motion` from `start`.
///
/// Targets are clamped into the buffer, with one exception: a forward word
/// motion that runs off the end of the buffer lands one column past the
/// last character, which operators treat as an exclusive end. Cursor moves
/// should pass the result through [`TextBuffer::clamp`].
pub fn resolve<T: TextBuffer + ?Sized>(text: &T, start: Position, motion: &Motion) -> Position {
    let count = motion.count.max(1);
    let last_line = text.line_count().saturating_sub(1);
    let line = start.line.min(last_line);

    match motion.kind {
        MotionKind::Left => {
            Position::new(line, start.col.saturating_sub(count).min(last_col(text, line)))
        }
        MotionKind::Right => {
            Position::new(line, start.col.saturating_add(count).min(last_col(text, line)))
        }
        MotionKind::Up => Position::new(line.saturating_sub(count), start.col),
        MotionKind::Down => Position::new(line.saturating_add(count).min(last_line), start.col),
        MotionKind::LineStart => Position::new(line, 0),
        MotionKind::FirstNonBlank => Position::new(line, first_non_blank(text, line)),
        MotionKind::LineEnd => {
            let line = line.saturating_add(count - 1).min(last_line);
            Position::new(line, last_col(text, line))
        }
        MotionKind::WordForward { big } => {
            let mut pos = Position::new(line, start.col);
            for _ in 0..count {
                let next = word_forward(text, pos, big);
                if next == pos {
                    break;
                }
                pos = next;
            }
            pos
        }
        MotionKind::WordBackward { big } => {
            let mut pos = Position::new(line, start.col);
            for _ in 0..count {
                pos = word_backward(text, pos, big);
            }
            pos
        }
        MotionKind::WordEnd { big } => {
            let mut pos = Position::new(line, start.col);
            for _ in 0..count {
                pos = word_end(text, pos, big);
            }
            pos
        }
        MotionKind::ParagraphForward => {
            let mut pos = Position::new(line, start.col);
            for _ in 0..count {
                pos = paragraph_forward(text, pos.line);
            }
            pos
        }
        MotionKind::ParagraphBackward => {
            let mut pos = Position::new(line, start.col);
            for _ in 0..count {
                pos = paragraph_backward(text, pos.line);
            }
            pos
        }
        MotionKind::DocumentStart => {
            if count == 1 {
                Position::ZERO
            } else {
                Position::new((count - 1).min(last_line), 0)
            }
        }
        MotionKind::DocumentEnd => Position::new(last_line, 0),
        MotionKind::Lines => {
            Position::new(line.saturating_add(count - 1).min(last_line), start.col)
        }
    }
}

/// The inclusive range an operator covers when applied with `motion` from
/// `start`, or `None` when the range is empty.
pub fn operator_span<T: TextBuffer + ?Sized>(
    text: &T,
    start: Position,
    motion: &Motion,
) -> Option<Span> {
    let start = Position::new(start.line.min(text.line_count().saturating_sub(1)), start.col);
    let target = match motion.kind {
        // `dl`/`x` on the last character still reaches it.
        MotionKind::Right => Position::new(
            start.line,
            start
                .col
                .saturating_add(motion.count.max(1))
                .min(text.line_len(start.line)),
        ),
        _ => resolve(text, start, motion),
    };

    if motion.is_linewise() {
        return Some(Span::linewise(start.line, target.line));
    }

    let (a, b) = if start <= target {
        (start, target)
    } else {
        (target, start)
    };
    if motion.inclusive {
        return Some(Span::charwise(a, b));
    }
    if a == b {
        return None;
    }
    if b.col > 0 {
        return Some(Span::charwise(a, Position::new(b.line, b.col - 1)));
    }
    // Exclusive end at the start of a later line: stop at the end of the
    // previous line instead of taking its line break.
    let prev = b.line - 1;
    let end = Position::new(prev, text.line_len(prev).saturating_sub(1));
    Some(Span::charwise(a, end.max(a)))
}

/// Text between two positions.
///
/// Linewise extraction returns every line from the smaller to the larger
/// line joined by `\n`, ignoring columns. Charwise extraction includes the
/// character at `end`; multi-line ranges take the tail of the first line,
/// the full middle lines and the head of the last line, joined by `\n`.
/// An end past the last line reaches the end of the buffer.
pub fn extract_text<T: TextBuffer + ?Sized>(
    text: &T,
    start: Position,
    end: Position,
    linewise: bool,
) -> String {
    let (a, b) = if start <= end { (start, end) } else { (end, start) };
    let last_line = text.line_count().saturating_sub(1);
    let a = Position::new(a.line.min(last_line), a.col);
    let b = if b.line > last_line {
        Position::new(last_line, u32::MAX)
    } else {
        b
    };

    if linewise {
        return (a.line..=b.line)
            .map(|l| text.line(l))
            .collect::<Vec<_>>()
            .join("\n");
    }

    if a.line == b.line {
        let line = text.line(a.line);
        let from = byte_index(&line, a.col);
        let to = byte_index(&line, b.col.saturating_add(1));
        return line[from..to].to_string();
    }

    let mut parts = Vec::with_capacity((b.line - a.line + 1) as usize);
    let head = text.line(a.line);
    parts.push(head[byte_index(&head, a.col)..].to_string());
    for l in a.line + 1..b.line {
        parts.push(text.line(l));
    }
    let tail = text.line(b.line);
    parts.push(tail[..byte_index(&tail, b.col.saturating_add(1))].to_string());
    parts.join("\n")
}

/// Number of grapheme clusters in `s`.
pub fn grapheme_len(s: &str) -> u32 {
    s.graphemes(true).count() as u32
}

/// Byte offset of grapheme column `col`, or `s.len()` past the end.
pub fn byte_index(s: &str, col: u32) -> usize {
    s.grapheme_indices(true)
        .nth(col as usize)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn last_col<T: TextBuffer + ?Sized>(text: &T, line: u32) -> u32 {
    text.line_len(line).saturating_sub(1)
}

fn first_non_blank<T: TextBuffer + ?Sized>(text: &T, line: u32) -> u32 {
    let classes = classify(&text.line(line), false);
    classes
        .iter()
        .position(|c| *c != CharClass::Blank)
        .unwrap_or(0) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Blank,
    Word,
    Punct,
}

fn classify(line: &str, big: bool) -> Vec<CharClass> {
    line.graphemes(true)
        .map(|g| {
            let c = g.chars().next().unwrap_or(' ');
            if c.is_whitespace() {
                CharClass::Blank
            } else if big || c.is_alphanumeric() || c == '_' {
                CharClass::Word
            } else {
                CharClass::Punct
            }
        })
        .collect()
}

fn word_forward<T: TextBuffer + ?Sized>(text: &T, pos: Position, big: bool) -> Position {
    let last_line = text.line_count().saturating_sub(1);
    let line = pos.line;
    let classes = classify(&text.line(line), big);
    let mut col = pos.col as usize;

    if col < classes.len() {
        let class = classes[col];
        if class != CharClass::Blank {
            while col < classes.len() && classes[col] == class {
                col += 1;
            }
        }
        while col < classes.len() && classes[col] == CharClass::Blank {
            col += 1;
        }
        if col < classes.len() {
            return Position::new(line, col as u32);
        }
    }

    if line >= last_line {
        Position::new(line, classes.len() as u32)
    } else {
        Position::new(line + 1, 0)
    }
}

fn word_backward<T: TextBuffer + ?Sized>(text: &T, pos: Position, big: bool) -> Position {
    let mut scan = Scanner::new(text, pos, big);
    if !scan.backward() {
        return scan.position();
    }
    while scan.class() == CharClass::Blank && !scan.on_empty_line() {
        if !scan.backward() {
            return scan.position();
        }
    }
    let class = scan.class();
    while scan.col > 0 && scan.classes[scan.col - 1] == class {
        scan.col -= 1;
    }
    scan.position()
}

fn word_end<T: TextBuffer + ?Sized>(text: &T, pos: Position, big: bool) -> Position {
    let mut scan = Scanner::new(text, pos, big);
    if !scan.forward() {
        return scan.position();
    }
    while scan.class() == CharClass::Blank {
        if !scan.forward() {
            return scan.position();
        }
    }
    let class = scan.class();
    while scan.col + 1 < scan.classes.len() && scan.classes[scan.col + 1] == class {
        scan.col += 1;
    }
    scan.position()
}

fn is_blank_line<T: TextBuffer + ?Sized>(text: &T, line: u32) -> bool {
    text.line(line).trim().is_empty()
}

fn paragraph_forward<T: TextBuffer + ?Sized>(text: &T, start: u32) -> Position {
    let last_line = text.line_count().saturating_sub(1);
    let mut line = start;
    while line < last_line && is_blank_line(text, line) {
        line += 1;
    }
    while line < last_line && !is_blank_line(text, line) {
        line += 1;
    }
    if is_blank_line(text, line) {
        Position::new(line, 0)
    } else {
        Position::new(line, last_col(text, line))
    }
}

fn paragraph_backward<T: TextBuffer + ?Sized>(text: &T, start: u32) -> Position {
    let mut line = start;
    while line > 0 && is_blank_line(text, line) {
        line -= 1;
    }
    while line > 0 && !is_blank_line(text, line) {
        line -= 1;
    }
    Position::new(line, 0)
}

/// Grapheme-by-grapheme walker that crosses line boundaries.
struct Scanner<'a, T: TextBuffer + ?Sized> {
    text: &'a T,
    big: bool,
    last_line: u32,
    line: u32,
    col: usize,
    classes: Vec<CharClass>,
}

impl<'a, T: TextBuffer + ?Sized> Scanner<'a, T> {
    fn new(text: &'a T, pos: Position, big: bool) -> Self {
        let last_line = text.line_count().saturating_sub(1);
        let line = pos.line.min(last_line);
        let classes = classify(&text.line(line), big);
        let col = (pos.col as usize).min(classes.len().saturating_sub(1));
        Self {
            text,
            big,
            last_line,
            line,
            col,
            classes,
        }
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.col as u32)
    }

    fn class(&self) -> CharClass {
        self.classes
            .get(self.col)
            .copied()
            .unwrap_or(CharClass::Blank)
    }

    fn on_empty_line(&self) -> bool {
        self.classes.is_empty()
    }

    fn load(&mut self, line: u32) {
        self.line = line;
        self.classes = classify(&self.text.line(line), self.big);
    }

    fn forward(&mut self) -> bool {
        if self.col + 1 < self.classes.len() {
            self.col += 1;
            return true;
        }
        if self.line >= self.last_line {
            return false;
        }
        self.load(self.line + 1);
        self.col = 0;
        true
    }

    fn backward(&mut self) -> bool {
        if self.col > 0 {
            self.col -= 1;
            return true;
        }
        if self.line == 0 {
            return false;
        }
        self.load(self.line - 1);
        self.col = self.classes.len().saturating_sub(1);
        true
    }
}
