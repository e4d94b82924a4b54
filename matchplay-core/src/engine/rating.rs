//! ELO rating update.
//!
//! `expected_a = 1 / (1 + 10^((rating_b - rating_a) / 400))` and
//! `new_a = rating_a + k * (actual_a - expected_a)`, with `actual_a` being
//! 1, 0.5 or 0. New ratings are rounded half-up to integers.

use matchplay_sdk::objects::Side;

/// Result of a finished match from side A's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    SideAWins,
    SideBWins,
    Draw,
}

impl Outcome {
    pub fn winner(self) -> Option<Side> {
        match self {
            Outcome::SideAWins => Some(Side::A),
            Outcome::SideBWins => Some(Side::B),
            Outcome::Draw => None,
        }
    }

    /// Actual score credited to `side`: 1 for a win, 0.5 for a draw, 0 for a loss.
    pub fn actual_score(self, side: Side) -> f64 {
        match (self.winner(), side) {
            (None, _) => 0.5,
            (Some(w), s) if w == s => 1.0,
            _ => 0.0,
        }
    }
}

/// New ratings of both sides after one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingUpdate {
    pub rating_a: i32,
    pub rating_b: i32,
}

impl RatingUpdate {
    pub fn for_side(&self, side: Side) -> i32 {
        match side {
            Side::A => self.rating_a,
            Side::B => self.rating_b,
        }
    }
}

/// Probability that a player rated `rating` beats one rated `opponent`.
pub fn expected_score(rating: i32, opponent: i32) -> f64 {
    1.0 / (1.0 + 10f64.powf(f64::from(opponent - rating) / 400.0))
}

/// Rounds to the nearest integer, halves going up (towards +infinity).
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Computes both new ratings for a finished match.
pub fn apply_result(rating_a: i32, rating_b: i32, outcome: Outcome, k_factor: f64) -> RatingUpdate {
    let expected_a = expected_score(rating_a, rating_b);
    let expected_b = 1.0 - expected_a;
    let new_a = f64::from(rating_a) + k_factor * (outcome.actual_score(Side::A) - expected_a);
    let new_b = f64::from(rating_b) + k_factor * (outcome.actual_score(Side::B) - expected_b);
    RatingUpdate {
        rating_a: round_half_up(new_a),
        rating_b: round_half_up(new_b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_K_FACTOR;

    #[test]
    fn test_equal_ratings_expect_half() {
        assert!((expected_score(1200, 1200) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_equal_ratings_side_a_wins() {
        let update = apply_result(1200, 1200, Outcome::SideAWins, DEFAULT_K_FACTOR);
        assert_eq!(update.rating_a, 1216);
        assert_eq!(update.rating_b, 1184);
    }

    #[test]
    fn test_equal_ratings_side_b_wins() {
        let update = apply_result(1200, 1200, Outcome::SideBWins, DEFAULT_K_FACTOR);
        assert_eq!(update.for_side(Side::A), 1184);
        assert_eq!(update.for_side(Side::B), 1216);
    }

    #[test]
    fn test_underdog_win() {
        // expected_a = 1 / (1 + 10^0.25) ~ 0.35993
        let update = apply_result(1500, 1600, Outcome::SideAWins, DEFAULT_K_FACTOR);
        assert_eq!(update.rating_a, 1520);
        assert_eq!(update.rating_b, 1580);
    }

    #[test]
    fn test_draw_moves_ratings_towards_each_other() {
        let update = apply_result(1200, 1200, Outcome::Draw, DEFAULT_K_FACTOR);
        assert_eq!(update, RatingUpdate { rating_a: 1200, rating_b: 1200 });

        let update = apply_result(1400, 1200, Outcome::Draw, DEFAULT_K_FACTOR);
        assert_eq!(update.rating_a, 1392);
        assert_eq!(update.rating_b, 1208);
    }

    #[test]
    fn test_k_factor_scales_change() {
        let update = apply_result(1200, 1200, Outcome::SideAWins, 16.0);
        assert_eq!(update.rating_a, 1208);
        assert_eq!(update.rating_b, 1192);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(1215.5), 1216);
        assert_eq!(round_half_up(1183.5), 1184);
        assert_eq!(round_half_up(1183.49), 1183);
        assert_eq!(round_half_up(-0.5), 0);
        assert_eq!(round_half_up(-1.5), -1);
    }

    #[test]
    fn test_actual_scores() {
        assert_eq!(Outcome::SideAWins.actual_score(Side::A), 1.0);
        assert_eq!(Outcome::SideAWins.actual_score(Side::B), 0.0);
        assert_eq!(Outcome::Draw.actual_score(Side::B), 0.5);
        assert_eq!(Outcome::Draw.winner(), None);
    }
}
