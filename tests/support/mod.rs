#![allow(dead_code)]

pub mod mock_buffer;
pub mod mock_clipboard;

use vim_engine::{Edit, Engine, EngineConfig, EngineState, Key, MotionRules, TextBuffer};

/// Feeds every character of `keys` to the engine. `<` stands for Escape.
pub fn feed<T: TextBuffer + ?Sized>(
    eng: &mut Engine,
    buf: &T,
    keys: &str,
) -> (EngineState, Vec<Edit>) {
    let mut state = eng.state();
    let mut edits = Vec::new();
    for c in keys.chars() {
        let key = if c == '<' { Key::Esc } else { Key::Char(c) };
        let (s, e) = eng.handle_key(buf, key);
        state = s;
        edits.extend(e);
    }
    (state, edits)
}

pub fn engine_at(line: u32, col: u32) -> Engine {
    Engine::builder()
        .position(vim_engine::Position { line, col })
        .build()
}

/// An engine at `(line, col)` using Vim's word, `G` and linewise rules.
pub fn vim_rules_at(line: u32, col: u32) -> Engine {
    let config = EngineConfig {
        motion_rules: MotionRules::vim(),
        ..EngineConfig::default()
    };
    Engine::builder()
        .position(vim_engine::Position { line, col })
        .config(config)
        .build()
}
