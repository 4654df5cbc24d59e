use std::cell::RefCell;
use std::rc::Rc;

use vim_engine::{Clipboard, Error, Result};

/// In-memory clipboard. Clones share the same contents so tests can keep a
/// handle after giving one to the engine.
#[derive(Default, Debug, Clone)]
pub struct MockClipboard {
    content: Rc<RefCell<Option<String>>>,
    failing: bool,
}

impl MockClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose reads and writes always fail.
    pub fn failing() -> Self {
        Self {
            content: Rc::default(),
            failing: true,
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.content.borrow().clone()
    }
}

impl Clipboard for MockClipboard {
    fn get(&self) -> Option<String> {
        if self.failing {
            return None;
        }
        self.content.borrow().clone()
    }

    fn set(&self, text: &str) -> Result<()> {
        if self.failing {
            return Err(Error::Clipboard("display unavailable".to_string()));
        }
        *self.content.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}
