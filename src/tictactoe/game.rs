//! Game outcomes

use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::Mark;

/// Outcome of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win(Mark),
    Draw,
}

impl GameOutcome {
    /// Terminal reward from the point of view of `mark`: +1 win, -1 loss, 0 draw.
    pub fn reward_for(self, mark: Mark) -> f64 {
        match self {
            GameOutcome::Win(winner) if winner == mark => 1.0,
            GameOutcome::Win(_) => -1.0,
            GameOutcome::Draw => 0.0,
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Win(Mark::Agent) => f.write_str("agent win"),
            GameOutcome::Win(Mark::Player) => f.write_str("player win"),
            GameOutcome::Draw => f.write_str("draw"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_convention() {
        assert_eq!(GameOutcome::Win(Mark::Agent).reward_for(Mark::Agent), 1.0);
        assert_eq!(GameOutcome::Win(Mark::Player).reward_for(Mark::Agent), -1.0);
        assert_eq!(GameOutcome::Draw.reward_for(Mark::Agent), 0.0);
    }
}
