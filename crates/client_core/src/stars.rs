//! Star rating glyphs for displayed comments and the interactive picker.

use shared::domain::{MAX_RATING, MIN_RATING};
use thiserror::Error;

pub const FILLED_STAR: char = '★';
pub const EMPTY_STAR: char = '☆';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Rating should be between 1 and 5, got {0}.")]
pub struct RatingError(pub i64);

/// Renders `rating` as five glyphs, filled first. Out-of-range ratings are rejected, never clamped.
pub fn render_stars(rating: i64) -> Result<String, RatingError> {
    if rating < i64::from(MIN_RATING) || rating > i64::from(MAX_RATING) {
        return Err(RatingError(rating));
    }
    let filled = rating as usize;
    let empty = usize::from(MAX_RATING) - filled;
    let mut out = String::with_capacity(usize::from(MAX_RATING) * FILLED_STAR.len_utf8());
    out.extend(std::iter::repeat(FILLED_STAR).take(filled));
    out.extend(std::iter::repeat(EMPTY_STAR).take(empty));
    Ok(out)
}

/// Single-select rating picker. Clicking the selected star clears the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarPicker {
    selected: Option<u8>,
}

impl Default for StarPicker {
    fn default() -> Self {
        Self {
            selected: Some(MIN_RATING),
        }
    }
}

impl StarPicker {
    pub fn selected(&self) -> Option<u8> {
        self.selected
    }

    pub fn click(&mut self, position: u8) -> Result<Option<u8>, RatingError> {
        if !(MIN_RATING..=MAX_RATING).contains(&position) {
            return Err(RatingError(i64::from(position)));
        }
        self.selected = if self.selected == Some(position) {
            None
        } else {
            Some(position)
        };
        Ok(self.selected)
    }

    pub fn is_lit(&self, position: u8) -> bool {
        self.selected.is_some_and(|selected| position <= selected)
    }

    pub fn glyph(&self, position: u8) -> char {
        if self.is_lit(position) {
            FILLED_STAR
        } else {
            EMPTY_STAR
        }
    }

    pub fn glyphs(&self) -> String {
        (MIN_RATING..=MAX_RATING).map(|p| self.glyph(p)).collect()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_every_valid_rating_as_five_glyphs() {
        for rating in 1..=5i64 {
            let stars = render_stars(rating).expect("valid rating");
            assert_eq!(stars.chars().count(), 5);
            let filled = stars.chars().take_while(|c| *c == FILLED_STAR).count();
            assert_eq!(filled as i64, rating);
            assert!(stars.chars().skip(filled).all(|c| c == EMPTY_STAR));
        }
        assert_eq!(render_stars(3).expect("three"), "★★★☆☆");
    }

    #[test]
    fn rejects_out_of_range_ratings() {
        assert_eq!(render_stars(0), Err(RatingError(0)));
        assert_eq!(render_stars(6), Err(RatingError(6)));
        assert_eq!(render_stars(-2), Err(RatingError(-2)));
        assert_eq!(
            RatingError(6).to_string(),
            "Rating should be between 1 and 5, got 6."
        );
    }

    #[test]
    fn picker_defaults_to_one_star() {
        let picker = StarPicker::default();
        assert_eq!(picker.selected(), Some(1));
        assert_eq!(picker.glyphs(), "★☆☆☆☆");
    }

    #[test]
    fn clicking_selected_star_clears_and_other_star_selects() {
        let mut picker = StarPicker::default();
        assert_eq!(picker.click(4), Ok(Some(4)));
        assert_eq!(picker.glyphs(), "★★★★☆");
        assert_eq!(picker.click(4), Ok(None));
        assert_eq!(picker.glyphs(), "☆☆☆☆☆");
        assert_eq!(picker.click(2), Ok(Some(2)));
        assert_eq!(picker.click(5), Ok(Some(5)));
        assert_eq!(picker.click(0), Err(RatingError(0)));
        assert_eq!(picker.selected(), Some(5));

        picker.reset();
        assert_eq!(picker.selected(), Some(1));
    }
}
