//! Score reconciliation between two independently submitted claims.
//!
//! Each side reports `(score_for, score_against)` from its own point of
//! view. The claims agree when side A's pair equals side B's pair reversed.

use super::rating::Outcome;
use crate::error::MatchError;
use matchplay_sdk::objects::Side;

/// One side's claim about the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claim {
    pub score_for: i32,
    pub score_against: i32,
}

impl Claim {
    pub fn new(score_for: i32, score_against: i32) -> Self {
        Self {
            score_for,
            score_against,
        }
    }

    /// The same result seen from the other side.
    pub fn reversed(self) -> Claim {
        Claim {
            score_for: self.score_against,
            score_against: self.score_for,
        }
    }

    /// Turns a claim made by `side` into the score of the match.
    pub fn as_final(self, side: Side) -> FinalScore {
        match side {
            Side::A => FinalScore {
                score_a: self.score_for,
                score_b: self.score_against,
            },
            Side::B => FinalScore {
                score_a: self.score_against,
                score_b: self.score_for,
            },
        }
    }

    /// Rejects negative scores, and ties unless draws are allowed.
    pub fn validate(self, allow_draws: bool) -> Result<(), MatchError> {
        if self.score_for < 0 || self.score_against < 0 {
            return Err(MatchError::InvalidScore {
                score_for: self.score_for,
                score_against: self.score_against,
            });
        }
        if !allow_draws && self.score_for == self.score_against {
            return Err(MatchError::InvalidTieScore(self.score_for));
        }
        Ok(())
    }
}

/// The agreed score of a match, side A first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalScore {
    pub score_a: i32,
    pub score_b: i32,
}

impl FinalScore {
    pub fn outcome(self) -> Outcome {
        match self.score_a.cmp(&self.score_b) {
            std::cmp::Ordering::Greater => Outcome::SideAWins,
            std::cmp::Ordering::Less => Outcome::SideBWins,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }

    pub fn validate(self, allow_draws: bool) -> Result<(), MatchError> {
        Claim::new(self.score_a, self.score_b).validate(allow_draws)
    }
}

/// State of the current submission round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Nobody has submitted yet.
    Empty,
    /// Only `submitted` has reported a score.
    AwaitingOpponent { submitted: Side },
    /// Both claims describe the same result.
    Agreed(FinalScore),
    /// Both sides submitted and the claims differ.
    Mismatch,
}

impl Reconciliation {
    pub fn is_mismatch(self) -> bool {
        matches!(self, Reconciliation::Mismatch)
    }
}

/// Compares the claims of the current round.
pub fn reconcile(side_a: Option<Claim>, side_b: Option<Claim>) -> Reconciliation {
    match (side_a, side_b) {
        (None, None) => Reconciliation::Empty,
        (Some(_), None) => Reconciliation::AwaitingOpponent { submitted: Side::A },
        (None, Some(_)) => Reconciliation::AwaitingOpponent { submitted: Side::B },
        (Some(a), Some(b)) if a == b.reversed() => Reconciliation::Agreed(a.as_final(Side::A)),
        (Some(_), Some(_)) => Reconciliation::Mismatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agreeing_claims_complete_with_side_a_winning() {
        let result = reconcile(Some(Claim::new(11, 7)), Some(Claim::new(7, 11)));
        let Reconciliation::Agreed(score) = result else {
            panic!("expected agreement, got {result:?}");
        };
        assert_eq!(score, FinalScore { score_a: 11, score_b: 7 });
        assert_eq!(score.outcome(), Outcome::SideAWins);
    }

    #[test]
    fn test_disagreeing_claims_mismatch() {
        let result = reconcile(Some(Claim::new(11, 7)), Some(Claim::new(11, 9)));
        assert_eq!(result, Reconciliation::Mismatch);
        assert!(result.is_mismatch());
    }

    #[test]
    fn test_both_claiming_the_same_pair_is_a_mismatch() {
        // Both say "we won 11-7".
        let result = reconcile(Some(Claim::new(11, 7)), Some(Claim::new(11, 7)));
        assert_eq!(result, Reconciliation::Mismatch);
    }

    #[test]
    fn test_one_sided_submission_waits() {
        assert_eq!(
            reconcile(None, Some(Claim::new(5, 11))),
            Reconciliation::AwaitingOpponent { submitted: Side::B }
        );
        assert_eq!(
            reconcile(Some(Claim::new(5, 11)), None),
            Reconciliation::AwaitingOpponent { submitted: Side::A }
        );
        assert_eq!(reconcile(None, None), Reconciliation::Empty);
    }

    #[test]
    fn test_side_b_claim_converts_to_final_score() {
        let score = Claim::new(11, 4).as_final(Side::B);
        assert_eq!(score, FinalScore { score_a: 4, score_b: 11 });
        assert_eq!(score.outcome(), Outcome::SideBWins);
    }

    #[test]
    fn test_agreed_draw() {
        let result = reconcile(Some(Claim::new(5, 5)), Some(Claim::new(5, 5)));
        let Reconciliation::Agreed(score) = result else {
            panic!("expected agreement, got {result:?}");
        };
        assert_eq!(score.outcome(), Outcome::Draw);
    }

    #[test]
    fn test_claim_validation() {
        assert!(Claim::new(11, 7).validate(false).is_ok());
        assert!(matches!(
            Claim::new(7, 7).validate(false),
            Err(MatchError::InvalidTieScore(7))
        ));
        assert!(Claim::new(7, 7).validate(true).is_ok());
        assert!(matches!(
            Claim::new(-1, 7).validate(true),
            Err(MatchError::InvalidScore { .. })
        ));
        assert!(matches!(
            FinalScore { score_a: 3, score_b: 3 }.validate(false),
            Err(MatchError::InvalidTieScore(3))
        ));
    }
}
