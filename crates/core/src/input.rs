//! Input restriction applied while a quiz is active.
//!
//! The policy decides which key combinations are swallowed. The desktop
//! webview script is generated from `InputPolicy::blocked`, so this list is
//! the single source of truth.

use std::fmt;

/// Physical key of a combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable key; compared case-insensitively.
    Char(char),
    /// Function key `F1`..`F24`.
    Function(u8),
}

/// A key press together with its modifiers.
///
/// `primary` is Ctrl on Linux/Windows and Cmd on macOS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: KeyCode,
    pub primary: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyCombo {
    #[must_use]
    pub const fn plain(key: KeyCode) -> Self {
        Self {
            key,
            primary: false,
            shift: false,
            alt: false,
        }
    }

    #[must_use]
    pub const fn primary(c: char) -> Self {
        Self {
            key: KeyCode::Char(c),
            primary: true,
            shift: false,
            alt: false,
        }
    }

    #[must_use]
    pub const fn primary_shift(c: char) -> Self {
        Self {
            key: KeyCode::Char(c),
            primary: true,
            shift: true,
            alt: false,
        }
    }

    fn same_key(&self, other: &Self) -> bool {
        match (self.key, other.key) {
            (KeyCode::Char(a), KeyCode::Char(b)) => a.eq_ignore_ascii_case(&b),
            (a, b) => a == b,
        }
    }

    fn matches(&self, other: &Self) -> bool {
        self.same_key(other)
            && self.primary == other.primary
            && self.shift == other.shift
            && self.alt == other.alt
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.primary {
            f.write_str("Ctrl+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        match self.key {
            KeyCode::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            KeyCode::Function(n) => write!(f, "F{n}"),
        }
    }
}

/// Why a combination is blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    Copy,
    Paste,
    SelectAll,
    ViewSource,
    DevTools,
}

/// Decision for a single input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputVerdict {
    Allow,
    Block(BlockReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPolicy {
    blocked: Vec<(KeyCombo, BlockReason)>,
    block_context_menu: bool,
}

impl Default for InputPolicy {
    fn default() -> Self {
        Self::proctored()
    }
}

impl InputPolicy {
    /// Copy, paste, select-all, view-source and developer tools are blocked,
    /// along with the context menu.
    #[must_use]
    pub fn proctored() -> Self {
        Self {
            blocked: vec![
                (KeyCombo::primary('c'), BlockReason::Copy),
                (KeyCombo::primary('v'), BlockReason::Paste),
                (KeyCombo::primary('a'), BlockReason::SelectAll),
                (KeyCombo::primary('u'), BlockReason::ViewSource),
                (KeyCombo::primary_shift('i'), BlockReason::DevTools),
                (KeyCombo::plain(KeyCode::Function(12)), BlockReason::DevTools),
            ],
            block_context_menu: true,
        }
    }

    /// Lets everything through. Used when no session is active.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            blocked: Vec::new(),
            block_context_menu: false,
        }
    }

    #[must_use]
    pub fn check(&self, combo: &KeyCombo) -> InputVerdict {
        self.blocked
            .iter()
            .find(|(rule, _)| rule.matches(combo))
            .map_or(InputVerdict::Allow, |(_, reason)| InputVerdict::Block(*reason))
    }

    #[must_use]
    pub fn blocks_context_menu(&self) -> bool {
        self.block_context_menu
    }

    #[must_use]
    pub fn blocked(&self) -> impl Iterator<Item = &KeyCombo> {
        self.blocked.iter().map(|(combo, _)| combo)
    }
}
