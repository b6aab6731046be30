//! Point values for correct answers.

use crate::model::Difficulty;

/// Extra points per consecutive correct answer already banked.
pub const STREAK_BONUS_PER_ANSWER: u32 = 5;

/// Base points a correct answer earns for the question's difficulty.
#[must_use]
pub fn points_for_difficulty(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => 10,
        Difficulty::Medium => 20,
        Difficulty::Hard => 30,
    }
}

/// Bonus for a correct answer given the streak held before answering.
#[must_use]
pub fn streak_bonus(streak: u32) -> u32 {
    streak.saturating_mul(STREAK_BONUS_PER_ANSWER)
}

/// Total points for a correct answer on `difficulty` entered with `streak`.
#[must_use]
pub fn points_for_correct_answer(difficulty: Difficulty, streak: u32) -> u32 {
    points_for_difficulty(difficulty).saturating_add(streak_bonus(streak))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_table() {
        assert_eq!(points_for_difficulty(Difficulty::Easy), 10);
        assert_eq!(points_for_difficulty(Difficulty::Medium), 20);
        assert_eq!(points_for_difficulty(Difficulty::Hard), 30);
    }

    #[test]
    fn streak_adds_five_per_answer() {
        assert_eq!(points_for_correct_answer(Difficulty::Easy, 0), 10);
        assert_eq!(points_for_correct_answer(Difficulty::Hard, 2), 40);
        assert_eq!(points_for_correct_answer(Difficulty::Medium, 4), 40);
    }
}
