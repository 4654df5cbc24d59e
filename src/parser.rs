//! Normal-mode key sequence parser.
//!
//! Keys are fed one at a time; the parser answers with a [`ParseStep`]
//! once the sequence means something, and keeps buffering otherwise:
//!
//! ```text
//! command := count? ('"' reg)? count? ( op op | op count? motion | 'p' | 'P' | shorthand )
//! ```
//!
//! Counts written in several places multiply (`2d3w` deletes six words).
//! A key that cannot continue any valid sequence is rejected at once.

use crate::config::MotionRules;
use crate::motion::{Motion, MotionKind, is_motion_prefix, lookup_motion};
use crate::register::RegisterSelector;

/// Keys accepted in the raw buffer before it is thrown away regardless.
const MAX_RAW_KEYS: usize = 32;

/// Default bound on the operator/motion part of a sequence.
pub const DEFAULT_MAX_PENDING_KEYS: usize = 3;

/// What a command does with its range or register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `y`
    Yank,
    /// `d`
    Delete,
    /// `c`
    Change,
    /// `p`
    PasteAfter,
    /// `P`
    PasteBefore,
}

impl Operator {
    /// Operators that take a motion.
    fn pending(c: char) -> Option<Self> {
        match c {
            'y' => Some(Operator::Yank),
            'd' => Some(Operator::Delete),
            'c' => Some(Operator::Change),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Operator::Yank => 'y',
            Operator::Delete => 'd',
            Operator::Change => 'c',
            Operator::PasteAfter => 'p',
            Operator::PasteBefore => 'P',
        }
    }
}

/// A complete normal-mode command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub operator: Operator,
    /// `None` for paste.
    pub motion: Option<Motion>,
    /// `None` means the unnamed register.
    pub register: Option<RegisterSelector>,
    /// Total count, at least 1.
    pub count: u32,
    /// The keys that produced this command, counts and register included.
    pub raw: String,
}

/// Result of feeding one key to the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseStep {
    /// More keys are needed.
    Pending,
    /// An operator or paste command is ready.
    Complete(Command),
    /// A bare motion: move the cursor.
    Move { motion: Motion, raw: String },
    /// `m{a-z}`
    SetMark(char),
    /// `` `{a-z} `` (charwise) or `'{a-z}` (linewise).
    JumpToMark { name: char, linewise: bool },
    /// A key outside the command grammar (mode switches and the like),
    /// left for the caller. The parser has already reset.
    Other(char),
    /// The sequence can never become valid and was discarded.
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkKey {
    Set,
    Jump { linewise: bool },
}

#[derive(Debug, Clone)]
pub struct CommandParser {
    raw: String,
    /// Product of count runs already closed by a register or operator.
    prefix: Option<u32>,
    /// The count run being typed.
    digits: Option<u32>,
    register: Option<RegisterSelector>,
    awaiting_register: bool,
    operator: Option<Operator>,
    mark: Option<MarkKey>,
    motion_keys: String,
    /// Operator and motion keys seen so far.
    tail: usize,
    max_pending_keys: usize,
    rules: MotionRules,
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PENDING_KEYS)
    }
}

impl CommandParser {
    pub fn new(max_pending_keys: usize) -> Self {
        Self {
            raw: String::new(),
            prefix: None,
            digits: None,
            register: None,
            awaiting_register: false,
            operator: None,
            mark: None,
            motion_keys: String::new(),
            tail: 0,
            max_pending_keys: max_pending_keys.max(1),
            rules: MotionRules::default(),
        }
    }

    /// Sets the rules used when looking up motion keys.
    pub fn with_motion_rules(mut self, rules: MotionRules) -> Self {
        self.rules = rules;
        self
    }

    /// Drops any partial sequence and register selection.
    pub fn reset(&mut self) {
        self.raw.clear();
        self.prefix = None;
        self.digits = None;
        self.register = None;
        self.awaiting_register = false;
        self.operator = None;
        self.mark = None;
        self.motion_keys.clear();
        self.tail = 0;
    }

    pub fn is_idle(&self) -> bool {
        self.raw.is_empty()
    }

    /// The keys buffered so far.
    pub fn pending_keys(&self) -> &str {
        &self.raw
    }

    pub fn pending_operator(&self) -> Option<Operator> {
        self.operator
    }

    pub fn pending_register(&self) -> Option<RegisterSelector> {
        self.register
    }

    /// The count typed so far, if any.
    pub fn pending_count(&self) -> Option<u32> {
        match (self.prefix, self.digits) {
            (None, None) => None,
            (p, d) => Some(p.unwrap_or(1).saturating_mul(d.unwrap_or(1))),
        }
    }

    pub fn process_key(&mut self, c: char) -> ParseStep {
        self.raw.push(c);
        if self.raw.chars().count() > MAX_RAW_KEYS {
            return self.invalid();
        }

        if self.awaiting_register {
            self.awaiting_register = false;
            return match RegisterSelector::try_from(c) {
                Ok(selector) => {
                    self.close_count();
                    self.register = Some(selector);
                    ParseStep::Pending
                }
                Err(_) => self.invalid(),
            };
        }

        if let Some(mark) = self.mark.take() {
            if !c.is_ascii_lowercase() {
                return self.invalid();
            }
            self.reset();
            return match mark {
                MarkKey::Set => ParseStep::SetMark(c),
                MarkKey::Jump { linewise } => ParseStep::JumpToMark { name: c, linewise },
            };
        }

        if self.motion_keys.is_empty() && self.is_count_digit(c) {
            let digit = c.to_digit(10).unwrap_or(0);
            let next = self
                .digits
                .unwrap_or(0)
                .saturating_mul(10)
                .saturating_add(digit);
            self.digits = Some(next);
            return ParseStep::Pending;
        }

        if self.operator.is_none()
            && self.motion_keys.is_empty()
            && let Some(step) = self.start_key(c)
        {
            return step;
        }

        if let Some(op) = self.operator
            && self.motion_keys.is_empty()
            && Operator::pending(c) == Some(op)
        {
            return self.complete(op, Some(Motion::new(MotionKind::Lines)));
        }

        self.motion_keys.push(c);
        self.tail += 1;

        let counted = self.pending_count().is_some();
        if let Some(motion) = lookup_motion(&self.motion_keys, &self.rules, counted) {
            return match self.operator {
                Some(op) => self.complete(op, Some(motion)),
                None => {
                    let motion = motion.with_count(self.total_count());
                    let raw = std::mem::take(&mut self.raw);
                    self.reset();
                    ParseStep::Move { motion, raw }
                }
            };
        }

        if is_motion_prefix(&self.motion_keys) && self.tail < self.max_pending_keys {
            return ParseStep::Pending;
        }

        if self.operator.is_none() && self.motion_keys.chars().count() == 1 {
            self.reset();
            return ParseStep::Other(c);
        }

        log::debug!("Discarding invalid key sequence {:?}", self.raw);
        self.invalid()
    }

    /// Keys that can only start the operator part of a sequence.
    fn start_key(&mut self, c: char) -> Option<ParseStep> {
        let step = match c {
            '"' if self.register.is_none() => {
                self.awaiting_register = true;
                ParseStep::Pending
            }
            'y' | 'd' | 'c' => {
                self.close_count();
                self.operator = Operator::pending(c);
                self.tail = 1;
                ParseStep::Pending
            }
            'p' => self.complete(Operator::PasteAfter, None),
            'P' => self.complete(Operator::PasteBefore, None),
            'x' => self.complete(Operator::Delete, Some(Motion::new(MotionKind::Right))),
            'X' => self.complete(Operator::Delete, Some(Motion::new(MotionKind::Left))),
            's' => self.complete(Operator::Change, Some(Motion::new(MotionKind::Right))),
            'D' => self.complete(Operator::Delete, Some(Motion::new(MotionKind::LineEnd))),
            'C' => self.complete(Operator::Change, Some(Motion::new(MotionKind::LineEnd))),
            'Y' => self.complete(Operator::Yank, Some(Motion::new(MotionKind::Lines))),
            'm' if self.register.is_none() && self.pending_count().is_none() => {
                self.mark = Some(MarkKey::Set);
                ParseStep::Pending
            }
            '`' | '\'' if self.register.is_none() => {
                self.mark = Some(MarkKey::Jump {
                    linewise: c == '\'',
                });
                ParseStep::Pending
            }
            _ => return None,
        };
        Some(step)
    }

    fn is_count_digit(&self, c: char) -> bool {
        // A leading zero is the "column 0" motion, not a count.
        c.is_ascii_digit() && (c != '0' || self.digits.is_some())
    }

    fn close_count(&mut self) {
        if let Some(d) = self.digits.take() {
            self.prefix = Some(self.prefix.unwrap_or(1).saturating_mul(d));
        }
    }

    fn total_count(&self) -> u32 {
        self.pending_count().unwrap_or(1).max(1)
    }

    fn complete(&mut self, operator: Operator, motion: Option<Motion>) -> ParseStep {
        let count = self.total_count();
        let command = Command {
            operator,
            motion: motion.map(|m| m.with_count(count)),
            register: self.register,
            count,
            raw: std::mem::take(&mut self.raw),
        };
        self.reset();
        ParseStep::Complete(command)
    }

    fn invalid(&mut self) -> ParseStep {
        self.reset();
        ParseStep::Invalid
    }
}
