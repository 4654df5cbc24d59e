use std::collections::BTreeMap;

use unicode_segmentation::UnicodeSegmentation;

use crate::clipboard::NoClipboard;
use crate::config::{EngineConfig, VisualClamp};
use crate::error::Result;
use crate::key::Key;
use crate::motion::{
    Motion, MotionKind, extract_text, is_motion_prefix, lookup_motion, operator_span, resolve,
};
use crate::parser::{Command, CommandParser, Operator, ParseStep};
use crate::register::{RegisterBank, RegisterSelector, Registers};
use crate::traits::{Clipboard, TextBuffer, TextBufferMut};
use crate::types::{Edit, Mode, Position, Selection, Span, VisualKind};

/// A snapshot of everything the engine tracks, handed to the host after
/// every key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineState {
    pub mode: Mode,
    pub position: Position,
    /// Present only in visual modes.
    pub selection: Option<Selection>,
    pub registers: Registers,
    /// Raw keys of the last command that took effect.
    pub last_command: String,
    /// Count typed for a command still in progress.
    pub count: Option<u32>,
    pub pending_operator: Option<Operator>,
    pub search_pattern: Option<String>,
    pub marks: BTreeMap<char, Position>,
}

/// A command resolved against the buffer, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Yank {
        span: Span,
        register: Option<RegisterSelector>,
    },
    Delete {
        span: Span,
        register: Option<RegisterSelector>,
    },
    Change {
        span: Span,
        register: Option<RegisterSelector>,
    },
    PasteAfter {
        register: Option<RegisterSelector>,
        count: u32,
    },
    PasteBefore {
        register: Option<RegisterSelector>,
        count: u32,
    },
}

/// Keys typed in visual mode that have not resolved yet.
#[derive(Debug, Default, Clone)]
struct VisualPending {
    raw: String,
    awaiting_register: bool,
    register: Option<RegisterSelector>,
    count: Option<u32>,
    motion_keys: String,
}

#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    mode: Mode,
    position: Position,
    selection: Option<Selection>,
    last_command: String,
    search_pattern: Option<String>,
    marks: BTreeMap<char, Position>,
    registers: RegisterBank,
    parser: CommandParser,
    visual: VisualPending,
}

pub struct EngineBuilder {
    mode: Mode,
    position: Position,
    config: EngineConfig,
    clipboard: Box<dyn Clipboard>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            mode: Mode::Normal,
            position: Position::ZERO,
            config: EngineConfig::default(),
            clipboard: Box::new(NoClipboard),
        }
    }
}

impl EngineBuilder {
    /// Starting mode. Visual modes start with a selection at `position`.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Clipboard backing the `"+` and `"*` registers.
    pub fn clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn build(self) -> Engine {
        let selection = match self.mode {
            Mode::Visual(kind) => Some(Selection::at(self.position, kind)),
            _ => None,
        };
        Engine {
            parser: CommandParser::new(self.config.max_pending_keys)
                .with_motion_rules(self.config.motion_rules),
            config: self.config,
            mode: self.mode,
            position: self.position,
            selection,
            last_command: String::new(),
            search_pattern: None,
            marks: BTreeMap::new(),
            registers: RegisterBank::new(self.clipboard),
            visual: VisualPending::default(),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        EngineBuilder::default().build()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn state(&self) -> EngineState {
        let (count, pending_operator) = match self.mode {
            Mode::Visual(_) => (self.visual.count, None),
            _ => (self.parser.pending_count(), self.parser.pending_operator()),
        };
        EngineState {
            mode: self.mode,
            position: self.position,
            selection: self.selection,
            registers: self.registers.registers().clone(),
            last_command: self.last_command.clone(),
            count,
            pending_operator,
            search_pattern: self.search_pattern.clone(),
            marks: self.marks.clone(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Moves the cursor, e.g. after the host applied an edit or a mouse click.
    /// In visual mode the selection end follows.
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
        if let Some(sel) = self.selection.as_mut() {
            sel.end = position;
        }
    }

    pub fn set_search_pattern(&mut self, pattern: Option<String>) {
        self.search_pattern = pattern;
    }

    pub fn registers(&self) -> &RegisterBank {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut RegisterBank {
        &mut self.registers
    }

    /// Same as pressing Escape: back to normal mode with nothing pending.
    pub fn reset(&mut self) {
        self.parser.reset();
        self.visual = VisualPending::default();
        self.selection = None;
        self.set_mode(Mode::Normal);
    }

    /// Processes one key and returns the new state plus the buffer edits the
    /// host should apply.
    pub fn handle_key<T: TextBuffer + ?Sized>(
        &mut self,
        text: &T,
        key: Key,
    ) -> (EngineState, Vec<Edit>) {
        log::trace!("Key {} in {:?}", key, self.mode);
        let mut edits = Vec::new();
        match self.mode {
            Mode::Insert => self.handle_insert(key),
            Mode::Normal => self.handle_normal(text, key, &mut edits),
            Mode::Visual(kind) => self.handle_visual(text, kind, key, &mut edits),
        }
        (self.state(), edits)
    }

    /// Like [`Engine::handle_key`], but applies the edits to `text` itself.
    pub fn handle_key_mut<T: TextBufferMut>(&mut self, text: &mut T, key: Key) -> EngineState {
        let (_, edits) = self.handle_key(&*text, key);
        if !edits.is_empty() {
            for edit in &edits {
                text.apply(edit);
            }
            self.position = match self.mode {
                Mode::Insert => {
                    let line = self.position.line.min(text.line_count().saturating_sub(1));
                    Position::new(line, self.position.col.min(text.line_len(line)))
                }
                _ => text.clamp(self.position),
            };
        }
        self.state()
    }

    /// Parses a host key token (`"j"`, `"Escape"`) and handles it.
    pub fn handle_token<T: TextBuffer + ?Sized>(
        &mut self,
        text: &T,
        token: &str,
    ) -> Result<(EngineState, Vec<Edit>)> {
        let key = token.parse::<Key>()?;
        Ok(self.handle_key(text, key))
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            log::debug!("Mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }

    fn handle_insert(&mut self, key: Key) {
        // Text entry belongs to the host.
        if key == Key::Esc {
            self.set_mode(Mode::Normal);
        }
    }

    fn handle_normal<T: TextBuffer + ?Sized>(&mut self, text: &T, key: Key, edits: &mut Vec<Edit>) {
        let c = match key {
            Key::Esc => {
                self.parser.reset();
                return;
            }
            Key::Char(c) => c,
            _ => return,
        };

        match self.parser.process_key(c) {
            ParseStep::Pending | ParseStep::Invalid => {}
            ParseStep::Complete(command) => self.execute(text, command, edits),
            ParseStep::Move { motion, .. } => {
                self.position = text.clamp(resolve(text, self.position, &motion));
            }
            ParseStep::SetMark(name) => {
                self.marks.insert(name, self.position);
            }
            ParseStep::JumpToMark { name, linewise } => {
                if let Some(mark) = self.marks.get(&name).copied() {
                    self.position = if linewise {
                        let line_start = text.clamp(Position::new(mark.line, 0));
                        resolve(text, line_start, &Motion::new(MotionKind::FirstNonBlank))
                    } else {
                        text.clamp(mark)
                    };
                }
            }
            ParseStep::Other(c) => self.switch_mode(text, c),
        }
    }

    fn switch_mode<T: TextBuffer + ?Sized>(&mut self, text: &T, c: char) {
        let line = self.position.line;
        match c {
            'i' => self.set_mode(Mode::Insert),
            'a' => {
                self.position.col = self.position.col.saturating_add(1).min(text.line_len(line));
                self.set_mode(Mode::Insert);
            }
            'I' => {
                let motion = Motion::new(MotionKind::FirstNonBlank);
                self.position = resolve(text, self.position, &motion);
                self.set_mode(Mode::Insert);
            }
            'A' => {
                self.position.col = text.line_len(line);
                self.set_mode(Mode::Insert);
            }
            'v' => self.enter_visual(VisualKind::CharWise),
            'V' => self.enter_visual(VisualKind::LineWise),
            _ => log::trace!("Ignoring key {:?} in normal mode", c),
        }
    }

    fn enter_visual(&mut self, kind: VisualKind) {
        self.visual = VisualPending::default();
        self.selection = Some(Selection::at(self.position, kind));
        self.set_mode(Mode::Visual(kind));
    }

    fn exit_visual(&mut self, mode: Mode) {
        self.visual = VisualPending::default();
        self.selection = None;
        self.set_mode(mode);
    }

    fn execute<T: TextBuffer + ?Sized>(
        &mut self,
        text: &T,
        command: Command,
        edits: &mut Vec<Edit>,
    ) {
        let register = command.register;
        let action = match (command.operator, command.motion) {
            (Operator::PasteAfter, _) => Action::PasteAfter {
                register,
                count: command.count,
            },
            (Operator::PasteBefore, _) => Action::PasteBefore {
                register,
                count: command.count,
            },
            (op, Some(mut motion)) => {
                // `cw` on a word changes to the end of that word only.
                if let (Operator::Change, MotionKind::WordForward { big }) = (op, motion.kind)
                    && !on_blank(text, self.position)
                {
                    motion.kind = MotionKind::WordEnd { big };
                    motion.inclusive = true;
                }
                let Some(span) = operator_span(text, self.position, &motion) else {
                    log::debug!("Empty range for {:?}", command.raw);
                    // `c` still enters insert mode over an empty range.
                    if op == Operator::Change {
                        self.set_mode(Mode::Insert);
                        self.last_command = command.raw;
                    }
                    return;
                };
                match op {
                    Operator::Yank => Action::Yank { span, register },
                    Operator::Delete => Action::Delete { span, register },
                    _ => Action::Change { span, register },
                }
            }
            (_, None) => return,
        };

        if self.run(text, action, edits) {
            self.last_command = command.raw;
        }
    }

    /// Runs an action. Returns false when it had nothing to do.
    fn run<T: TextBuffer + ?Sized>(
        &mut self,
        text: &T,
        action: Action,
        edits: &mut Vec<Edit>,
    ) -> bool {
        match action {
            Action::Yank { span, register } => {
                self.capture(text, span, register);
            }
            Action::Delete { span, register } => {
                self.capture(text, span, register);
                edits.push(Edit::Delete { span });
                self.position = span.start;
            }
            Action::Change { span, register } => {
                self.capture(text, span, register);
                edits.push(Edit::Delete { span });
                if span.is_linewise() {
                    edits.push(Edit::Insert {
                        at: span.start,
                        text: String::new(),
                        linewise: true,
                    });
                }
                self.position = span.start;
                self.set_mode(Mode::Insert);
            }
            Action::PasteAfter { register, count } | Action::PasteBefore { register, count } => {
                let after = matches!(action, Action::PasteAfter { .. });
                let Some(reg) = self.registers.read(register) else {
                    return false;
                };
                if reg.content.is_empty() && !reg.linewise {
                    return false;
                }
                let cur = self.position;
                let at = match (after, reg.linewise) {
                    (true, true) => Position::new(cur.line.saturating_add(1), 0),
                    (true, false) => Position::new(cur.line, cur.col.saturating_add(1)),
                    (false, true) => Position::new(cur.line, 0),
                    (false, false) => cur,
                };
                let count = count.max(1) as usize;
                let content = if reg.linewise {
                    vec![reg.content.as_str(); count].join("\n")
                } else {
                    reg.content.repeat(count)
                };
                edits.push(Edit::Insert {
                    at,
                    text: content,
                    linewise: reg.linewise,
                });
            }
        }
        true
    }

    /// Copies the text under `span` into `register`.
    fn capture<T: TextBuffer + ?Sized>(
        &mut self,
        text: &T,
        span: Span,
        register: Option<RegisterSelector>,
    ) {
        let content = extract_text(text, span.start, span.end, span.is_linewise());
        self.registers.write(register, content, span.is_linewise());
    }

    fn handle_visual<T: TextBuffer + ?Sized>(
        &mut self,
        text: &T,
        kind: VisualKind,
        key: Key,
        edits: &mut Vec<Edit>,
    ) {
        let c = match key {
            Key::Esc => {
                self.position = text.clamp(self.position);
                self.exit_visual(Mode::Normal);
                return;
            }
            Key::Char(c) => c,
            _ => return,
        };
        self.visual.raw.push(c);

        if self.visual.awaiting_register {
            self.visual.awaiting_register = false;
            match RegisterSelector::try_from(c) {
                Ok(selector) => self.visual.register = Some(selector),
                Err(_) => self.clear_visual_pending(),
            }
            return;
        }

        if self.visual.motion_keys.is_empty()
            && c.is_ascii_digit()
            && (c != '0' || self.visual.count.is_some())
        {
            let digit = c.to_digit(10).unwrap_or(0);
            let next = self
                .visual
                .count
                .unwrap_or(0)
                .saturating_mul(10)
                .saturating_add(digit);
            self.visual.count = Some(next);
            return;
        }

        if self.visual.motion_keys.is_empty() {
            match c {
                '"' if self.visual.register.is_none() => {
                    self.visual.awaiting_register = true;
                    return;
                }
                'y' | 'd' | 'x' | 'c' => {
                    self.visual_operator(text, c, edits);
                    return;
                }
                'o' => {
                    if let Some(sel) = self.selection.as_mut() {
                        std::mem::swap(&mut sel.start, &mut sel.end);
                        self.position = sel.end;
                    }
                    self.clear_visual_pending();
                    return;
                }
                'v' | 'V' => {
                    let wanted = if c == 'v' {
                        VisualKind::CharWise
                    } else {
                        VisualKind::LineWise
                    };
                    if wanted == kind {
                        self.position = text.clamp(self.position);
                        self.exit_visual(Mode::Normal);
                    } else {
                        if let Some(sel) = self.selection.as_mut() {
                            sel.kind = wanted;
                        }
                        self.clear_visual_pending();
                        self.set_mode(Mode::Visual(wanted));
                    }
                    return;
                }
                _ => {}
            }
        }

        self.visual.motion_keys.push(c);
        let rules = self.config.motion_rules;
        let counted = self.visual.count.is_some();
        if let Some(motion) = lookup_motion(&self.visual.motion_keys, &rules, counted) {
            let motion = match self.visual.count {
                Some(n) => motion.with_count(n),
                None => motion,
            };
            self.visual_move(text, &motion);
            self.clear_visual_pending();
        } else if !is_motion_prefix(&self.visual.motion_keys) {
            log::trace!("Ignoring {:?} in visual mode", self.visual.raw);
            self.clear_visual_pending();
        }
    }

    fn clear_visual_pending(&mut self) {
        self.visual = VisualPending::default();
    }

    fn visual_move<T: TextBuffer + ?Sized>(&mut self, text: &T, motion: &Motion) {
        let cur = self.position;
        let n = motion.count;
        let next = match (self.config.visual_clamp, motion.kind) {
            (VisualClamp::ZeroOnly, MotionKind::Left) => {
                Position::new(cur.line, cur.col.saturating_sub(n))
            }
            (VisualClamp::ZeroOnly, MotionKind::Right) => {
                Position::new(cur.line, cur.col.saturating_add(n))
            }
            (VisualClamp::ZeroOnly, MotionKind::Up) => {
                Position::new(cur.line.saturating_sub(n), cur.col)
            }
            (VisualClamp::ZeroOnly, MotionKind::Down) => {
                Position::new(cur.line.saturating_add(n), cur.col)
            }
            _ => text.clamp(resolve(text, cur, motion)),
        };
        self.position = next;
        if let Some(sel) = self.selection.as_mut() {
            sel.end = next;
        }
    }

    fn visual_operator<T: TextBuffer + ?Sized>(
        &mut self,
        text: &T,
        op: char,
        edits: &mut Vec<Edit>,
    ) {
        let Some(selection) = self.selection else {
            self.exit_visual(Mode::Normal);
            return;
        };
        let span = selection.span();
        let register = self.visual.register;
        let raw = std::mem::take(&mut self.visual.raw);
        let (first, _) = selection.normalized();

        let action = match op {
            'y' => Action::Yank { span, register },
            'c' => Action::Change { span, register },
            _ => Action::Delete { span, register },
        };
        self.exit_visual(Mode::Normal);
        self.position = first;
        self.run(text, action, edits);
        self.last_command = raw;
    }
}

/// True when the cursor sits on whitespace or past the end of its line.
fn on_blank<T: TextBuffer + ?Sized>(text: &T, pos: Position) -> bool {
    text.line(pos.line)
        .graphemes(true)
        .nth(pos.col as usize)
        .is_none_or(|g| g.trim().is_empty())
}
