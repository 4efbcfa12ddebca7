//! Core types for decoder-text.
//!
//! These types flow from the shuffle function through the controller and
//! define what a render sink understands.

use std::fmt;

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Special values: r=-1 means "terminal default", r=-2 marks an ANSI palette
/// index stored in `g`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: i16,
    pub g: i16,
    pub b: i16,
    pub a: i16,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as i16,
            g: g as i16,
            b: b as i16,
            a: a as i16,
        }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Terminal default color (let terminal decide).
    pub const TERMINAL_DEFAULT: Self = Self {
        r: -1,
        g: -1,
        b: -1,
        a: -1,
    };

    pub const CYAN: Self = Self::rgb(0, 255, 255);

    /// Create an ANSI palette color (0-255).
    pub const fn ansi(index: u8) -> Self {
        Self {
            r: -2,
            g: index as i16,
            b: 0,
            a: 255,
        }
    }

    /// Check if this is the terminal default color.
    #[inline]
    pub const fn is_terminal_default(&self) -> bool {
        self.r == -1
    }

    /// Check if this is an ANSI palette color.
    #[inline]
    pub const fn is_ansi(&self) -> bool {
        self.r == -2
    }

    /// Get ANSI palette index (only valid if is_ansi() returns true).
    #[inline]
    pub const fn ansi_index(&self) -> u8 {
        self.g as u8
    }
}

// =============================================================================
// Cell Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::ITALIC`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const BLINK = 1 << 4;
        const INVERSE = 1 << 5;
        const HIDDEN = 1 << 6;
        const STRIKETHROUGH = 1 << 7;
    }
}

// =============================================================================
// CharacterState
// =============================================================================

/// What is shown at one position of the decoding text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterState {
    /// The final, correct character.
    Resolved(char),
    /// A placeholder glyph. Not necessarily stable between frames.
    Noise(char),
}

impl CharacterState {
    /// The character currently displayed.
    #[inline]
    pub const fn value(&self) -> char {
        match *self {
            CharacterState::Resolved(c) | CharacterState::Noise(c) => c,
        }
    }

    #[inline]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, CharacterState::Resolved(_))
    }

    #[inline]
    pub const fn is_noise(&self) -> bool {
        matches!(self, CharacterState::Noise(_))
    }
}

// =============================================================================
// RevealState
// =============================================================================

/// One frame of the effect: a [`CharacterState`] per character of the target.
///
/// Positions below `floor(progress)` are resolved, the rest are noise.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RevealState {
    cells: Vec<CharacterState>,
}

impl RevealState {
    /// An empty state (no characters).
    pub const fn empty() -> Self {
        Self { cells: Vec::new() }
    }

    pub fn from_cells(cells: Vec<CharacterState>) -> Self {
        Self { cells }
    }

    /// A fully resolved state for `text`.
    pub fn resolved(text: &str) -> Self {
        Self {
            cells: text.chars().map(CharacterState::Resolved).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<CharacterState> {
        self.cells.get(index).copied()
    }

    pub fn cells(&self) -> &[CharacterState] {
        &self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = &CharacterState> {
        self.cells.iter()
    }

    /// Number of leading resolved positions.
    pub fn resolved_count(&self) -> usize {
        self.cells.iter().take_while(|c| c.is_resolved()).count()
    }

    /// Indices of every resolved position.
    pub fn resolved_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_resolved())
            .map(|(i, _)| i)
            .collect()
    }

    /// True when every position shows its final character.
    pub fn is_fully_resolved(&self) -> bool {
        self.cells.iter().all(CharacterState::is_resolved)
    }
}

impl fmt::Display for RevealState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            write!(f, "{}", cell.value())?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a RevealState {
    type Item = &'a CharacterState;
    type IntoIter = std::slice::Iter<'a, CharacterState>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

// =============================================================================
// Tests
// =============================================================================
