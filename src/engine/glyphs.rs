//! Glyph pool - placeholder characters shown while text decodes.
//!
//! A [`GlyphSet`] is fixed and never empty, so [`GlyphSet::pick`] has no
//! failure case. Built-in sets are `'static` and cost nothing to clone;
//! every decoder on screen can share them.

use std::borrow::Cow;

use rand::Rng;

use crate::config::ConfigError;

/// Katakana, the default decoding noise.
#[rustfmt::skip]
pub const KATAKANA: &[char] = &[
    'ア', 'イ', 'ウ', 'エ', 'オ',
    'カ', 'キ', 'ク', 'ケ', 'コ',
    'サ', 'シ', 'ス', 'セ', 'ソ',
    'タ', 'チ', 'ツ', 'テ', 'ト',
    'ナ', 'ニ', 'ヌ', 'ネ', 'ノ',
    'ハ', 'ヒ', 'フ', 'ヘ', 'ホ',
    'マ', 'ミ', 'ム', 'メ', 'モ',
    'ヤ', 'ユ', 'ヨ', 'ー',
    'ラ', 'リ', 'ル', 'レ', 'ロ',
    'ワ', 'ヰ', 'ヱ', 'ヲ', 'ン',
    'ガ', 'ギ', 'グ', 'ゲ', 'ゴ',
    'ザ', 'ジ', 'ズ', 'ゼ', 'ゾ',
    'ダ', 'ヂ', 'ヅ', 'デ', 'ド',
    'バ', 'ビ', 'ブ', 'ベ', 'ボ',
    'パ', 'ピ', 'プ', 'ペ', 'ポ',
];

/// ASCII letters, interleaved upper/lower case.
#[rustfmt::skip]
pub const LATIN: &[char] = &[
    'A', 'a', 'B', 'b', 'C', 'c', 'D', 'd', 'E', 'e', 'F', 'f', 'G', 'g',
    'H', 'h', 'I', 'i', 'J', 'j', 'K', 'k', 'L', 'l', 'M', 'm', 'N', 'n',
    'O', 'o', 'P', 'p', 'Q', 'q', 'R', 'r', 'S', 's', 'T', 't', 'U', 'u',
    'V', 'v', 'W', 'w', 'X', 'x', 'Y', 'y', 'Z', 'z',
];

/// An ordered, non-empty set of placeholder glyphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphSet {
    glyphs: Cow<'static, [char]>,
}

impl GlyphSet {
    /// Build a set from owned glyphs. Fails if `glyphs` is empty.
    pub fn new(glyphs: Vec<char>) -> Result<Self, ConfigError> {
        if glyphs.is_empty() {
            return Err(ConfigError::EmptyGlyphSet);
        }
        Ok(Self {
            glyphs: Cow::Owned(glyphs),
        })
    }

    /// Build a set from the characters of a string.
    pub fn from_str_chars(s: &str) -> Result<Self, ConfigError> {
        Self::new(s.chars().collect())
    }

    pub const fn katakana() -> Self {
        Self {
            glyphs: Cow::Borrowed(KATAKANA),
        }
    }

    pub const fn latin() -> Self {
        Self {
            glyphs: Cow::Borrowed(LATIN),
        }
    }

    /// Uniformly random glyph from the set.
    #[inline]
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        self.glyphs[rng.random_range(0..self.glyphs.len())]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    #[inline]
    pub fn contains(&self, c: char) -> bool {
        self.glyphs.contains(&c)
    }

    pub fn as_slice(&self) -> &[char] {
        &self.glyphs
    }
}

impl Default for GlyphSet {
    fn default() -> Self {
        Self::katakana()
    }
}

// =============================================================================
// TESTS
// =============================================================================
