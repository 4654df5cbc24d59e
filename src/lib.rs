pub mod clipboard;
pub mod config;
pub mod engine;
pub mod error;
pub mod key;
pub mod motion;
pub mod parser;
pub mod register;
pub mod traits;
pub mod types;

#[cfg(feature = "clipboard")]
pub use crate::clipboard::SystemClipboard;
pub use crate::clipboard::NoClipboard;
pub use crate::config::{EngineConfig, MotionRules, VisualClamp, WordBoundary};
pub use crate::engine::{Engine, EngineBuilder, EngineState};
pub use crate::error::{Error, Result};
pub use crate::key::{Key, KeyEvent, Modifiers};
pub use crate::motion::{Motion, MotionKind, MotionType};
pub use crate::parser::{Command, CommandParser, Operator, ParseStep};
pub use crate::register::{Register, RegisterBank, RegisterSelector, Registers};
pub use crate::traits::{Clipboard, TextBuffer, TextBufferMut};
pub use crate::types::{Edit, Mode, Position, Selection, Span, SpanKind, VisualKind};
