use vim_engine::{Engine, Error, Key, KeyEvent, Mode, Modifiers, Position};

mod support;
use support::mock_buffer::MockBuffer;
use support::{engine_at, feed, vim_rules_at};

fn key(c: char) -> Key {
    Key::Char(c)
}

#[test]
fn hjkl_moves() {
    let buf = MockBuffer::new("abc\nxyz");
    let mut eng = Engine::new();

    let (state, edits) = eng.handle_key(&buf, key('l'));
    assert_eq!(state.position, Position { line: 0, col: 1 });
    assert!(edits.is_empty());

    let (state, _) = eng.handle_key(&buf, key('j'));
    assert_eq!(state.position, Position { line: 1, col: 1 });

    let (state, _) = eng.handle_key(&buf, key('h'));
    assert_eq!(state.position, Position { line: 1, col: 0 });

    let (state, _) = eng.handle_key(&buf, key('k'));
    assert_eq!(state.position, Position { line: 0, col: 0 });
}

#[test]
fn motions_clamp_at_buffer_edges() {
    let buf = MockBuffer::new("abc\nxyz");
    let mut eng = Engine::new();

    let (state, _) = feed(&mut eng, &buf, "hk");
    assert_eq!(state.position, Position::ZERO);

    let (state, _) = feed(&mut eng, &buf, "llllljjj");
    assert_eq!(state.position, Position { line: 1, col: 2 });
}

#[test]
fn zero_and_dollar() {
    let buf = MockBuffer::new("abcdef\nxy");
    let mut eng = Engine::new();

    let (state, _) = eng.handle_key(&buf, key('$'));
    assert_eq!(state.position, Position { line: 0, col: 5 });

    let (state, _) = eng.handle_key(&buf, key('0'));
    assert_eq!(state.position, Position { line: 0, col: 0 });
}

#[test]
fn caret_goes_to_first_non_blank() {
    let buf = MockBuffer::new("    indented");
    let mut eng = engine_at(0, 9);

    let (state, _) = eng.handle_key(&buf, key('^'));
    assert_eq!(state.position, Position { line: 0, col: 4 });
}

#[test]
fn g_and_big_g() {
    let buf = MockBuffer::new("a\nb\nc\nd");
    let mut eng = engine_at(2, 0);

    // Without a count, `G` is line 1 like `gg`.
    let (state, _) = feed(&mut eng, &buf, "G");
    assert_eq!(state.position, Position::ZERO);

    let (state, _) = feed(&mut eng, &buf, "jgg");
    assert_eq!(state.position, Position { line: 0, col: 0 });

    let (state, _) = feed(&mut eng, &buf, "3G");
    assert_eq!(state.position, Position { line: 2, col: 0 });

    let (state, _) = feed(&mut eng, &buf, "2gg");
    assert_eq!(state.position, Position { line: 1, col: 0 });

    let (state, _) = feed(&mut eng, &buf, "10G");
    assert_eq!(state.position, Position { line: 3, col: 0 });
}

#[test]
fn big_g_goes_to_last_line_under_vim_rules() {
    let buf = MockBuffer::new("a\nb\nc\nd");
    let mut eng = vim_rules_at(0, 0);

    let (state, _) = feed(&mut eng, &buf, "G");
    assert_eq!(state.position, Position { line: 3, col: 0 });

    let (state, _) = feed(&mut eng, &buf, "2G");
    assert_eq!(state.position, Position { line: 1, col: 0 });
}

#[test]
fn single_g_waits_for_second_key() {
    let buf = MockBuffer::new("a\nb\nc");
    let mut eng = engine_at(2, 0);

    let (state, _) = eng.handle_key(&buf, key('g'));
    assert_eq!(state.position, Position { line: 2, col: 0 });

    // "gx" is not a motion; nothing moves and the next key starts fresh.
    let (state, _) = eng.handle_key(&buf, key('x'));
    assert_eq!(state.position, Position { line: 2, col: 0 });
    let (state, _) = eng.handle_key(&buf, key('k'));
    assert_eq!(state.position, Position { line: 1, col: 0 });
}

#[test]
fn counts_with_movements() {
    let buf = MockBuffer::new("abcdefgh\n1\n2\n3\n4");
    let mut eng = Engine::new();

    let (state, _) = feed(&mut eng, &buf, "3l");
    assert_eq!(state.position, Position { line: 0, col: 3 });

    let (state, _) = feed(&mut eng, &buf, "2h");
    assert_eq!(state.position, Position { line: 0, col: 1 });

    let (state, _) = feed(&mut eng, &buf, "20l");
    assert_eq!(state.position, Position { line: 0, col: 7 });

    let (state, _) = feed(&mut eng, &buf, "3j");
    assert_eq!(state.position.line, 3);
}

#[test]
fn pending_count_is_visible_in_state() {
    let buf = MockBuffer::new("abc");
    let mut eng = Engine::new();

    let (state, _) = feed(&mut eng, &buf, "12");
    assert_eq!(state.count, Some(12));

    let (state, _) = eng.handle_key(&buf, Key::Esc);
    assert_eq!(state.count, None);
}

#[test]
fn zero_as_motion_vs_count() {
    let buf = MockBuffer::new("abcdefghijklmnop");
    let mut eng = engine_at(0, 5);

    let (state, _) = eng.handle_key(&buf, key('0'));
    assert_eq!(state.position, Position { line: 0, col: 0 });

    let (state, _) = feed(&mut eng, &buf, "10l");
    assert_eq!(state.position, Position { line: 0, col: 10 });
}

#[test]
fn insert_mode_transitions() {
    let buf = MockBuffer::new("abc\ndef");
    let mut eng = Engine::new();

    let (state, _) = eng.handle_key(&buf, key('i'));
    assert_eq!(state.mode, Mode::Insert);

    // Keys are left to the host while inserting.
    let (state, edits) = feed(&mut eng, &buf, "jdd");
    assert_eq!(state.mode, Mode::Insert);
    assert_eq!(state.position, Position::ZERO);
    assert!(edits.is_empty());
    assert_eq!(state.last_command, "");

    let (state, _) = eng.handle_key(&buf, Key::Esc);
    assert_eq!(state.mode, Mode::Normal);
}

#[test]
fn insert_entry_variants() {
    let buf = MockBuffer::new("  abc");
    let mut eng = engine_at(0, 3);

    let (state, _) = eng.handle_key(&buf, key('a'));
    assert_eq!(state.mode, Mode::Insert);
    assert_eq!(state.position, Position { line: 0, col: 4 });
    eng.handle_key(&buf, Key::Esc);

    let (state, _) = eng.handle_key(&buf, key('A'));
    assert_eq!(state.position, Position { line: 0, col: 5 });
    eng.handle_key(&buf, Key::Esc);

    let (state, _) = eng.handle_key(&buf, key('I'));
    assert_eq!(state.position, Position { line: 0, col: 2 });
}

#[test]
fn unknown_keys_change_nothing() {
    let buf = MockBuffer::new("abc\ndef");
    let mut eng = engine_at(1, 1);
    let before = eng.state();

    let (state, edits) = feed(&mut eng, &buf, "QZ!&");
    assert_eq!(state, before);
    assert!(edits.is_empty());

    let (state, _) = eng.handle_key(&buf, Key::Enter);
    assert_eq!(state, before);
}

#[test]
fn escape_cancels_pending_operator() {
    let buf = MockBuffer::new("abc\ndef");
    let mut eng = Engine::new();

    let (state, _) = eng.handle_key(&buf, key('d'));
    assert!(state.pending_operator.is_some());

    let (state, _) = eng.handle_key(&buf, Key::Esc);
    assert_eq!(state.pending_operator, None);
    assert_eq!(state.mode, Mode::Normal);

    // The next "j" is a plain motion, not "dj".
    let (state, edits) = eng.handle_key(&buf, key('j'));
    assert!(edits.is_empty());
    assert_eq!(state.position, Position { line: 1, col: 0 });
}

#[test]
fn marks_set_and_jump() {
    let buf = MockBuffer::new("first\n   second\nthird");
    let mut eng = engine_at(1, 5);

    let (state, _) = feed(&mut eng, &buf, "ma");
    assert_eq!(state.marks.get(&'a'), Some(&Position { line: 1, col: 5 }));

    feed(&mut eng, &buf, "G");
    let (state, _) = feed(&mut eng, &buf, "`a");
    assert_eq!(state.position, Position { line: 1, col: 5 });

    feed(&mut eng, &buf, "gg");
    let (state, _) = feed(&mut eng, &buf, "'a");
    assert_eq!(state.position, Position { line: 1, col: 3 });

    // Unknown marks leave the cursor alone.
    let (state, _) = feed(&mut eng, &buf, "`z");
    assert_eq!(state.position, Position { line: 1, col: 3 });
}

#[test]
fn unicode_grapheme_handling() {
    let buf = MockBuffer::new("a👍b\né🇺🇸f");
    let mut eng = Engine::new();

    let (state, _) = eng.handle_key(&buf, key('l'));
    assert_eq!(state.position, Position { line: 0, col: 1 }); // at 👍

    let (state, _) = eng.handle_key(&buf, key('l'));
    assert_eq!(state.position, Position { line: 0, col: 2 }); // at 'b'

    let (state, _) = eng.handle_key(&buf, key('j'));
    assert_eq!(state.position, Position { line: 1, col: 2 }); // at 'f'

    let (state, _) = eng.handle_key(&buf, key('$'));
    assert_eq!(state.position, Position { line: 1, col: 2 });
}

#[test]
fn key_tokens() {
    let buf = MockBuffer::new("abc\ndef");
    let mut eng = Engine::new();

    let (state, _) = eng.handle_token(&buf, "i").unwrap();
    assert_eq!(state.mode, Mode::Insert);
    let (state, _) = eng.handle_token(&buf, "Escape").unwrap();
    assert_eq!(state.mode, Mode::Normal);

    assert!(matches!(
        eng.handle_token(&buf, "NotAKey"),
        Err(Error::UnknownKey(token)) if token == "NotAKey"
    ));
}

#[test]
fn ctrl_chords_normalize_to_escape() {
    let ctrl_c = KeyEvent::new(Key::Char('c'), Modifiers::CTRL);
    assert_eq!(ctrl_c.normalize(), Some(Key::Esc));

    let ctrl_bracket = KeyEvent::new(Key::Char('['), Modifiers::CTRL);
    assert_eq!(ctrl_bracket.normalize(), Some(Key::Esc));

    let ctrl_x = KeyEvent::new(Key::Char('x'), Modifiers::CTRL);
    assert_eq!(ctrl_x.normalize(), None);

    let shifted = KeyEvent::new(Key::Char('V'), Modifiers::SHIFT);
    assert_eq!(shifted.normalize(), Some(Key::Char('V')));
}

#[test]
fn host_state_setters() {
    let buf = MockBuffer::new("abc\ndef");
    let mut eng = Engine::new();

    eng.set_search_pattern(Some("de".to_string()));
    eng.set_position(Position { line: 1, col: 2 });
    let state = eng.state();
    assert_eq!(state.search_pattern.as_deref(), Some("de"));
    assert_eq!(state.position, Position { line: 1, col: 2 });

    // In visual mode the selection end follows the host's cursor.
    feed(&mut eng, &buf, "v");
    eng.set_position(Position { line: 0, col: 1 });
    let sel = eng.state().selection.unwrap();
    assert_eq!(sel.start, Position { line: 1, col: 2 });
    assert_eq!(sel.end, Position { line: 0, col: 1 });

    eng.reset();
    assert_eq!(eng.mode(), Mode::Normal);
    assert!(eng.state().selection.is_none());
    assert_eq!(eng.state().search_pattern.as_deref(), Some("de"));
}

#[test]
fn mode_labels() {
    use vim_engine::VisualKind;

    assert_eq!(Mode::Normal.label(), "NORMAL");
    assert_eq!(Mode::Insert.label(), "INSERT");
    assert_eq!(Mode::Visual(VisualKind::CharWise).label(), "VISUAL");
    assert_eq!(Mode::Visual(VisualKind::LineWise).label(), "V-LINE");
}
