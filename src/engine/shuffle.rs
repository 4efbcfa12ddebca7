//! Shuffle - derive the next frame of a decoding text.
//!
//! Given the target text, the previous frame and a progress value in
//! character units, every position below `floor(progress)` shows its real
//! character and the rest show noise.
//!
//! # Glyph holding
//!
//! Noise is redrawn during the first part of each unit of progress and held
//! for the rest of it, which halves the flicker while the text still looks
//! like it is decoding. The split point is `hold_threshold` (0.5 by
//! default) and is purely cosmetic.

use rand::Rng;

use super::glyphs::GlyphSet;
use crate::types::{CharacterState, RevealState};

/// Fraction of each progress unit during which noise is redrawn.
pub const DEFAULT_HOLD_THRESHOLD: f64 = 0.5;

/// Shuffle function bound to a glyph pool and hold threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Shuffler {
    glyphs: GlyphSet,
    hold_threshold: f64,
}

impl Shuffler {
    pub fn new(glyphs: GlyphSet, hold_threshold: f64) -> Self {
        let hold_threshold = if hold_threshold.is_nan() {
            DEFAULT_HOLD_THRESHOLD
        } else {
            hold_threshold.clamp(0.0, 1.0)
        };
        Self {
            glyphs,
            hold_threshold,
        }
    }

    pub fn glyphs(&self) -> &GlyphSet {
        &self.glyphs
    }

    pub fn hold_threshold(&self) -> f64 {
        self.hold_threshold
    }

    /// Compute the frame for `progress`.
    ///
    /// `text` is the target split into characters. `previous` may belong to
    /// another text (its length is not trusted); only its noise glyphs are
    /// ever reused.
    pub fn shuffle<R: Rng + ?Sized>(
        &self,
        text: &[char],
        previous: &RevealState,
        progress: f64,
        rng: &mut R,
    ) -> RevealState {
        let progress = normalize_progress(progress, text.len());
        let resolved = progress.floor() as usize;
        let redraw = progress.fract() < self.hold_threshold;

        let cells = text
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                if index < resolved {
                    return CharacterState::Resolved(value);
                }
                if !redraw {
                    if let Some(CharacterState::Noise(held)) = previous.get(index) {
                        return CharacterState::Noise(held);
                    }
                }
                CharacterState::Noise(self.glyphs.pick(rng))
            })
            .collect();

        RevealState::from_cells(cells)
    }
}

impl Default for Shuffler {
    fn default() -> Self {
        Self::new(GlyphSet::default(), DEFAULT_HOLD_THRESHOLD)
    }
}

/// Shuffle with the default katakana pool and hold threshold.
pub fn shuffle<R: Rng + ?Sized>(
    text: &str,
    previous: &RevealState,
    progress: f64,
    rng: &mut R,
) -> RevealState {
    let chars: Vec<char> = text.chars().collect();
    Shuffler::default().shuffle(&chars, previous, progress, rng)
}

/// Clamp progress into `[0, len]`; NaN reads as 0.
#[inline]
pub fn normalize_progress(progress: f64, len: usize) -> f64 {
    if progress.is_nan() || progress <= 0.0 {
        0.0
    } else {
        progress.min(len as f64)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0xdec0de)
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_full_progress_resolves_everything() {
        let state = shuffle("Hello", &RevealState::empty(), 5.0, &mut rng());
        assert!(state.is_fully_resolved());
        assert_eq!(state.to_string(), "Hello");
    }

    #[test]
    fn test_zero_progress_is_all_noise() {
        let state = shuffle("Hello", &RevealState::empty(), 0.0, &mut rng());
        assert_eq!(state.len(), 5);
        assert!(state.iter().all(|c| c.is_noise()));
        assert!(state.iter().all(|c| GlyphSet::katakana().contains(c.value())));
    }

    #[test]
    fn test_partial_progress_resolves_prefix() {
        let state = shuffle("abcdef", &RevealState::empty(), 2.3, &mut rng());
        assert_eq!(state.resolved_count(), 2);
        assert_eq!(state.get(0), Some(CharacterState::Resolved('a')));
        assert_eq!(state.get(1), Some(CharacterState::Resolved('b')));
        assert!(state.get(2).unwrap().is_noise());
    }

    #[test]
    fn test_negative_and_nan_progress_read_as_zero() {
        let a = shuffle("abc", &RevealState::empty(), -4.0, &mut rng());
        let b = shuffle("abc", &RevealState::empty(), f64::NAN, &mut rng());
        assert!(a.iter().all(|c| c.is_noise()));
        assert!(b.iter().all(|c| c.is_noise()));
    }

    #[test]
    fn test_overshoot_is_clamped() {
        let state = shuffle("ab", &RevealState::empty(), 40.0, &mut rng());
        assert_eq!(state, RevealState::resolved("ab"));
    }

    #[test]
    fn test_empty_text() {
        let state = shuffle("", &RevealState::empty(), 3.0, &mut rng());
        assert!(state.is_empty());
    }

    #[test]
    fn test_second_half_holds_previous_noise() {
        let shuffler = Shuffler::default();
        let text = chars("abcd");
        let mut rng = rng();
        let first = shuffler.shuffle(&text, &RevealState::empty(), 1.2, &mut rng);
        let second = shuffler.shuffle(&text, &first, 1.7, &mut rng);

        assert_eq!(second.get(0), Some(CharacterState::Resolved('a')));
        for i in 1..4 {
            assert_eq!(second.get(i), first.get(i));
        }
    }

    #[test]
    fn test_hold_redraws_over_resolved_previous() {
        // previous shows real characters (e.g. a restart); holding must not
        // leak them as noise
        let shuffler = Shuffler::new(GlyphSet::from_str_chars("#").unwrap(), 0.5);
        let text = chars("xy");
        let previous = RevealState::resolved("ABC");
        let state = shuffler.shuffle(&text, &previous, 0.9, &mut rng());
        assert_eq!(
            state.cells(),
            &[CharacterState::Noise('#'), CharacterState::Noise('#')]
        );
    }

    #[test]
    fn test_first_half_redraws() {
        let shuffler = Shuffler::new(GlyphSet::from_str_chars("#").unwrap(), 0.5);
        let previous = RevealState::from_cells(vec![CharacterState::Noise('?')]);
        let state = shuffler.shuffle(&chars("z"), &previous, 0.2, &mut rng());
        assert_eq!(state.get(0), Some(CharacterState::Noise('#')));
    }

    #[test]
    fn test_threshold_is_clamped() {
        assert_eq!(Shuffler::new(GlyphSet::latin(), 3.0).hold_threshold(), 1.0);
        assert_eq!(Shuffler::new(GlyphSet::latin(), -1.0).hold_threshold(), 0.0);
        assert_eq!(
            Shuffler::new(GlyphSet::latin(), f64::NAN).hold_threshold(),
            DEFAULT_HOLD_THRESHOLD
        );
    }

    #[test]
    fn test_seeded_output_is_reproducible() {
        let a = shuffle("decode me", &RevealState::empty(), 3.1, &mut rng());
        let b = shuffle("decode me", &RevealState::empty(), 3.1, &mut rng());
        assert_eq!(a, b);
    }
}
