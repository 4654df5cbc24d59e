/// A position within a text buffer.
///
/// Positions are zero-indexed and column values are counted in grapheme clusters,
/// not bytes or chars. This ensures correct handling of emoji and combining characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Zero-based line number.
    pub line: u32,
    /// Zero-based column position in grapheme clusters.
    pub col: u32,
}

impl Position {
    /// The origin position (0, 0).
    pub const ZERO: Position = Position { line: 0, col: 0 };

    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

/// The current mode of the engine.
///
/// Vim is a modal editor where the same keys perform different
/// actions depending on the current mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Normal mode - for navigation and operators.
    #[default]
    Normal,
    /// Insert mode - the host inserts typed text.
    Insert,
    /// Visual mode - for selecting text.
    Visual(VisualKind),
}

impl Mode {
    pub fn is_visual(self) -> bool {
        matches!(self, Mode::Visual(_))
    }

    /// Status-line label.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Visual(VisualKind::CharWise) => "VISUAL",
            Mode::Visual(VisualKind::LineWise) => "V-LINE",
        }
    }
}

/// The type of visual selection.
///
/// Block selection is not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualKind {
    /// Character-wise selection (v).
    CharWise,
    /// Line-wise selection (V).
    LineWise,
}

/// A text selection with its type.
///
/// `start` is the anchor set when visual mode was entered and `end` follows
/// the cursor, so the two are not ordered. Use [`Selection::normalized`]
/// before treating it as a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// The anchor of the selection.
    pub start: Position,
    /// The live end of the selection (the cursor).
    pub end: Position,
    /// The type of selection (character or line).
    pub kind: VisualKind,
}

impl Selection {
    /// A selection covering a single position.
    pub fn at(anchor: Position, kind: VisualKind) -> Self {
        Self {
            start: anchor,
            end: anchor,
            kind,
        }
    }

    /// The endpoints in document order.
    pub fn normalized(&self) -> (Position, Position) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }

    /// The ordered, inclusive span this selection covers.
    pub fn span(&self) -> Span {
        let (start, end) = self.normalized();
        match self.kind {
            VisualKind::CharWise => Span::charwise(start, end),
            VisualKind::LineWise => Span::linewise(start.line, end.line),
        }
    }
}

/// Whether a span addresses exact columns or whole lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Char,
    Line,
}

/// An ordered range of text with an inclusive end.
///
/// For [`SpanKind::Line`] spans the columns are ignored: every line from
/// `start.line` to `end.line` is covered in full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// First covered position.
    pub start: Position,
    /// Last covered position (inclusive).
    pub end: Position,
    pub kind: SpanKind,
}

impl Span {
    /// A charwise span; the endpoints are ordered if needed.
    pub fn charwise(a: Position, b: Position) -> Self {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        Self {
            start,
            end,
            kind: SpanKind::Char,
        }
    }

    /// A linewise span over lines `a..=b` in either order.
    pub fn linewise(a: u32, b: u32) -> Self {
        Self {
            start: Position::new(a.min(b), 0),
            end: Position::new(a.max(b), 0),
            kind: SpanKind::Line,
        }
    }

    pub fn is_linewise(&self) -> bool {
        self.kind == SpanKind::Line
    }
}

/// Buffer edits computed by the engine.
///
/// The engine never mutates storage on its own. Hosts either apply these
/// themselves or hand the engine a [`crate::TextBufferMut`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Remove the text covered by `span`.
    Delete { span: Span },
    /// Insert `text` at `at`. Linewise inserts add whole lines before line
    /// `at.line` (which may equal the line count to append at the end).
    Insert {
        at: Position,
        text: String,
        linewise: bool,
    },
}
