use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How rare a badge is, as labelled by the achievements service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
    #[serde(other)]
    Unknown,
}

/// A badge the player can unlock.
///
/// The same shape is used for the full badge list and for the badges newly
/// unlocked by a game, where the service may omit the progress fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub requirement: u32,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub unlocked: bool,
    #[serde(default)]
    pub unlocked_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub progress: u32,
    #[serde(default)]
    pub max_progress: u32,
    #[serde(default)]
    pub percentage: u32,
}

impl Achievement {
    /// Progress toward unlocking, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn progress_ratio(&self) -> f64 {
        if self.unlocked {
            return 1.0;
        }
        if self.max_progress == 0 {
            return 0.0;
        }
        (f64::from(self.progress) / f64::from(self.max_progress)).min(1.0)
    }
}

/// Lifetime game statistics kept by the achievements service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub total_score: u64,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub perfect_games: u32,
}
