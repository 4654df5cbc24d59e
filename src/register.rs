//! Register storage for yanked and deleted text.
//!
//! Every yank, delete and change writes a register; paste reads one. The
//! bank holds:
//!
//! - the unnamed register `""`, which always reflects the last write;
//! - named registers `"a`–`"z`, replaced through lowercase selectors and
//!   appended to through uppercase ones;
//! - numbered registers `"0`–`"9`, where unnamed writes push a history into
//!   `"1`–`"9` and `"0` is only written when addressed explicitly;
//! - read-only registers `"%`, `"#`, `".`, `":`, `"/`, which read as empty;
//! - clipboard registers `"+` and `"*`, which forward to the host clipboard
//!   and keep an in-memory mirror.

use std::collections::BTreeMap;
use std::fmt;

use crate::clipboard::NoClipboard;
use crate::error::{Error, Result};
use crate::traits::Clipboard;

/// Text captured by a yank or delete, plus how it was captured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Register {
    pub content: String,
    /// Whole lines were captured; paste goes above/below the cursor line.
    pub linewise: bool,
}

impl Register {
    pub fn new(content: impl Into<String>, linewise: bool) -> Self {
        Self {
            content: content.into(),
            linewise,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Appends `other`, joining with a newline when either side is linewise.
    fn append(&mut self, other: Register) {
        if self.linewise || other.linewise {
            self.content.push('\n');
            self.linewise = true;
        }
        self.content.push_str(&other.content);
    }
}

/// A validated register name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterSelector {
    /// `"`
    Unnamed,
    /// `a`–`z`: replace.
    Named(char),
    /// `A`–`Z`: append to the lowercase register.
    Append(char),
    /// `0`–`9`
    Numbered(u8),
    /// `%`, `#`, `.`, `:`, `/`
    ReadOnly(char),
    /// `+` or `*`
    Clipboard(char),
}

impl RegisterSelector {
    /// The character that names this register in key sequences.
    pub fn as_char(self) -> char {
        match self {
            RegisterSelector::Unnamed => '"',
            RegisterSelector::Named(c)
            | RegisterSelector::ReadOnly(c)
            | RegisterSelector::Clipboard(c) => c,
            RegisterSelector::Append(c) => c.to_ascii_uppercase(),
            RegisterSelector::Numbered(n) => char::from(b'0' + n),
        }
    }
}

impl TryFrom<char> for RegisterSelector {
    type Error = Error;

    fn try_from(c: char) -> Result<Self> {
        match c {
            '"' => Ok(RegisterSelector::Unnamed),
            'a'..='z' => Ok(RegisterSelector::Named(c)),
            'A'..='Z' => Ok(RegisterSelector::Append(c.to_ascii_lowercase())),
            '0'..='9' => Ok(RegisterSelector::Numbered(c as u8 - b'0')),
            '%' | '#' | '.' | ':' | '/' => Ok(RegisterSelector::ReadOnly(c)),
            '+' | '*' => Ok(RegisterSelector::Clipboard(c)),
            _ => Err(Error::InvalidRegister(c)),
        }
    }
}

impl fmt::Display for RegisterSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}", self.as_char())
    }
}

/// Plain register contents, cheap to snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registers {
    unnamed: Option<Register>,
    /// `a`–`z` plus the `+`/`*` clipboard mirrors.
    named: BTreeMap<char, Register>,
    numbered: [Option<Register>; 10],
}

impl Registers {
    pub fn unnamed(&self) -> Option<&Register> {
        self.unnamed.as_ref()
    }

    /// A named register by its lowercase letter, or a clipboard mirror.
    pub fn named(&self, name: char) -> Option<&Register> {
        self.named.get(&name.to_ascii_lowercase())
    }

    pub fn numbered(&self, index: usize) -> Option<&Register> {
        self.numbered.get(index).and_then(Option::as_ref)
    }

    /// Reads a register without consulting the host clipboard.
    pub fn get(&self, selector: RegisterSelector) -> Option<Register> {
        match selector {
            RegisterSelector::Unnamed => self.unnamed.clone(),
            RegisterSelector::Named(c)
            | RegisterSelector::Append(c)
            | RegisterSelector::Clipboard(c) => self.named.get(&c).cloned(),
            RegisterSelector::Numbered(n) => self.numbered(n as usize).cloned(),
            RegisterSelector::ReadOnly(_) => Some(Register::default()),
        }
    }

    /// Every populated register with the character that names it, in
    /// unnamed, numbered, named order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &Register)> {
        let unnamed = self.unnamed.iter().map(|r| ('"', r));
        let numbered = self
            .numbered
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().map(|r| (char::from(b'0' + i as u8), r)));
        let named = self.named.iter().map(|(c, r)| (*c, r));
        unnamed.chain(numbered).chain(named)
    }

    fn shift_history(&mut self, register: Register) {
        // "9 is lost, "8 -> "9, ..., "1 -> "2
        for i in (1..9).rev() {
            self.numbered[i + 1] = self.numbered[i].take();
        }
        self.numbered[1] = Some(register);
    }
}

/// The register bank: register contents plus the clipboard bridge.
pub struct RegisterBank {
    registers: Registers,
    clipboard: Box<dyn Clipboard>,
}

impl fmt::Debug for RegisterBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterBank")
            .field("registers", &self.registers)
            .finish_non_exhaustive()
    }
}

impl Default for RegisterBank {
    fn default() -> Self {
        Self::new(Box::new(NoClipboard))
    }
}

impl RegisterBank {
    pub fn new(clipboard: Box<dyn Clipboard>) -> Self {
        Self {
            registers: Registers::default(),
            clipboard,
        }
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    /// Stores `content` in the register named by `selector`.
    ///
    /// `None` means the unnamed register. Every write except one to a
    /// read-only register also replaces `""`.
    pub fn write(
        &mut self,
        selector: Option<RegisterSelector>,
        content: impl Into<String>,
        linewise: bool,
    ) {
        let register = Register::new(content, linewise);
        let regs = &mut self.registers;
        match selector.unwrap_or(RegisterSelector::Unnamed) {
            RegisterSelector::Unnamed => {
                regs.shift_history(register.clone());
                regs.unnamed = Some(register);
            }
            RegisterSelector::Named(c) => {
                regs.named.insert(c, register.clone());
                regs.unnamed = Some(register);
            }
            RegisterSelector::Append(c) => {
                let merged = match regs.named.remove(&c) {
                    Some(mut existing) => {
                        existing.append(register);
                        existing
                    }
                    None => register,
                };
                regs.named.insert(c, merged.clone());
                regs.unnamed = Some(merged);
            }
            RegisterSelector::Numbered(n) => {
                regs.numbered[n as usize] = Some(register.clone());
                regs.unnamed = Some(register);
            }
            RegisterSelector::Clipboard(c) => {
                if let Err(e) = self.clipboard.set(&register.content) {
                    log::warn!("Failed to write register \"{}: {}", c, e);
                }
                regs.named.insert(c, register.clone());
                regs.unnamed = Some(register);
            }
            RegisterSelector::ReadOnly(c) => {
                log::debug!("Ignoring write to read-only register \"{}", c);
            }
        }
    }

    /// Reads a register. `None` when it was never written; read-only
    /// registers read as empty.
    ///
    /// Clipboard registers prefer the host clipboard and fall back to the
    /// last value written through the bank.
    pub fn read(&self, selector: Option<RegisterSelector>) -> Option<Register> {
        let selector = selector.unwrap_or(RegisterSelector::Unnamed);
        if let RegisterSelector::Clipboard(c) = selector {
            let mirror = self.registers.named.get(&c);
            return Some(match self.clipboard.get() {
                Some(text) => match mirror {
                    Some(m) if m.content == text => m.clone(),
                    _ => {
                        let linewise = text.ends_with('\n');
                        Register::new(text, linewise)
                    }
                },
                None => mirror.cloned().unwrap_or_default(),
            });
        }
        self.registers.get(selector)
    }

    /// Clears one register, or the whole bank when `selector` is `None`.
    pub fn clear(&mut self, selector: Option<RegisterSelector>) {
        let regs = &mut self.registers;
        match selector {
            None => *regs = Registers::default(),
            Some(RegisterSelector::Unnamed) => regs.unnamed = None,
            Some(
                RegisterSelector::Named(c)
                | RegisterSelector::Append(c)
                | RegisterSelector::Clipboard(c),
            ) => {
                regs.named.remove(&c);
            }
            Some(RegisterSelector::Numbered(n)) => regs.numbered[n as usize] = None,
            Some(RegisterSelector::ReadOnly(_)) => {}
        }
    }

    /// Character-addressed write for hosts; rejects unknown and read-only
    /// register names.
    pub fn write_char(
        &mut self,
        name: char,
        content: impl Into<String>,
        linewise: bool,
    ) -> Result<()> {
        let selector = RegisterSelector::try_from(name)?;
        if let RegisterSelector::ReadOnly(c) = selector {
            return Err(Error::ReadOnlyRegister(c));
        }
        self.write(Some(selector), content, linewise);
        Ok(())
    }

    /// Character-addressed read for hosts.
    pub fn read_char(&self, name: char) -> Result<Option<Register>> {
        let selector = RegisterSelector::try_from(name)?;
        Ok(self.read(Some(selector)))
    }
}
