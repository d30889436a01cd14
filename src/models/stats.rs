//! Per-user match point totals.

/// Which side of a match record a user appears on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRole {
    Winner,
    Loser,
}

impl MatchRole {
    /// Column of the `matches` table holding the user's name for this role.
    pub fn name_column(&self) -> &'static str {
        match self {
            MatchRole::Winner => "winner",
            MatchRole::Loser => "loser",
        }
    }

    /// Column holding the points this role scored.
    pub fn scored_column(&self) -> &'static str {
        match self {
            MatchRole::Winner => "winscore",
            MatchRole::Loser => "losescore",
        }
    }

    /// Column holding the points the opponent scored against this role.
    pub fn conceded_column(&self) -> &'static str {
        match self {
            MatchRole::Winner => "losescore",
            MatchRole::Loser => "winscore",
        }
    }
}

/// Points summed over every match where a user played one role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contribution {
    /// Points the user scored
    pub scored: u64,

    /// Points the opponent scored in those same matches
    pub conceded: u64,
}

/// Aggregated match totals for one user.
///
/// Mixes the user's own points with the opponent's points in the same
/// matches: `win_losses` and `loss_losses` are what the opponents scored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserStats {
    /// Points scored in matches the user won
    pub wins: u64,

    /// Points scored in matches the user lost
    pub losses: u64,

    /// Points conceded in matches the user won
    pub win_losses: u64,

    /// Points conceded in matches the user lost
    pub loss_losses: u64,
}

impl UserStats {
    /// Combine the two contribution sources into one set of totals.
    pub fn merge(won: Contribution, lost: Contribution) -> Self {
        Self {
            wins: won.scored,
            win_losses: won.conceded,
            losses: lost.scored,
            loss_losses: lost.conceded,
        }
    }

    /// Points credited to the user.
    pub fn credited(&self) -> u64 {
        self.wins + self.losses
    }

    /// Every point recorded in the user's matches.
    pub fn total(&self) -> u64 {
        self.wins + self.losses + self.win_losses + self.loss_losses
    }
}
