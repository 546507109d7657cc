pub mod competition_card;
pub mod leaderboard;

pub use competition_card::{competition_card, competition_cards};
pub use leaderboard::{leaderboard, leaderboard_rows, LeaderboardRow};
