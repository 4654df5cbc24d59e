use crate::parser::DEFAULT_MAX_PENDING_KEYS;

/// How visual-mode cursor keys are clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum VisualClamp {
    /// Keep the cursor on existing lines and characters.
    #[default]
    Buffer,
    /// Only stop at line 0 and column 0; the upper side is unbounded.
    ZeroOnly,
}

/// Where the lowercase word motions `w`, `b` and `e` break.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum WordBoundary {
    /// A word is any run of non-whitespace, the same as `W`.
    #[default]
    Whitespace,
    /// Keyword characters and punctuation form separate words.
    Keyword,
}

/// Motion behaviors that can follow Vim more closely than the defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct MotionRules {
    pub word_boundary: WordBoundary,
    /// `G` without a count jumps to the last line instead of the first.
    pub g_to_last_line: bool,
    /// Operators over `gg` and `G` take whole lines.
    pub linewise_document: bool,
}

impl MotionRules {
    /// Vim's behavior for all three rules.
    pub fn vim() -> Self {
        Self {
            word_boundary: WordBoundary::Keyword,
            g_to_last_line: true,
            linewise_document: true,
        }
    }
}

/// Tunables for an [`crate::Engine`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct EngineConfig {
    /// Operator and motion keys buffered before an unfinished sequence is
    /// discarded.
    pub max_pending_keys: usize,
    pub visual_clamp: VisualClamp,
    pub motion_rules: MotionRules,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_pending_keys: DEFAULT_MAX_PENDING_KEYS,
            visual_clamp: VisualClamp::default(),
            motion_rules: MotionRules::default(),
        }
    }
}
