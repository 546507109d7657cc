//! Wire types exchanged with the platform API

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use time::OffsetDateTime;

use crate::{effective_entry_fee, CoreError};

/// Kind of competition, each with its own required entry input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CompetitionKind {
    /// Submit a token address you expect to perform
    Callers,
    /// Submit a predicted price
    Prediction,
    /// Submit the trading wallet to be tracked
    Trading,
}

impl CompetitionKind {
    pub const ALL: [CompetitionKind; 3] = [
        CompetitionKind::Callers,
        CompetitionKind::Prediction,
        CompetitionKind::Trading,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Callers => "Callers",
            Self::Prediction => "Prediction",
            Self::Trading => "Trading",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Callers => "callers",
            Self::Prediction => "prediction",
            Self::Trading => "trading",
        }
    }
}

impl fmt::Display for CompetitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompetitionKind {
    type Err = CoreError;

    // The backend is inconsistent about casing ("Callers" vs "callers")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "callers" => Ok(Self::Callers),
            "prediction" => Ok(Self::Prediction),
            "trading" => Ok(Self::Trading),
            other => Err(CoreError::UnknownKind(other.to_string())),
        }
    }
}

impl TryFrom<String> for CompetitionKind {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<CompetitionKind> for String {
    fn from(kind: CompetitionKind) -> Self {
        kind.as_str().to_string()
    }
}

/// One user's entry into a competition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coin_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trading_address: Option<String>,
}

impl Submission {
    /// Name shown on the leaderboard, falling back to the user id
    pub fn display_name(&self) -> &str {
        self.user_name.as_deref().unwrap_or(&self.user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CompetitionKind,
    #[serde(default)]
    pub prize_pool: String,
    #[serde(default)]
    pub organizer_name: String,
    #[serde(default)]
    pub organizer_logo: String,
    /// Entry fee in SOL; the platform sends null when none is configured
    #[serde(default)]
    pub fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Status as stored by the backend: "live", "upcoming" or "ended"
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub submissions: Vec<Submission>,
    #[serde(with = "time::serde::rfc3339")]
    pub registration_start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub registration_end: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub announce_time: OffsetDateTime,
}

impl Competition {
    pub fn participants(&self) -> usize {
        self.submissions.len()
    }

    /// Fee actually charged on join, in SOL
    pub fn entry_fee(&self) -> f64 {
        effective_entry_fee(self.fee)
    }
}

/// Body of `POST /api/competitions/:id/join`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub transaction_signature: String,
    #[serde(flatten)]
    pub entry: JoinEntry,
}

/// Kind-specific input required to join a competition
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JoinEntry {
    Callers {
        #[serde(rename = "coinAddress")]
        coin_address: String,
    },
    Prediction {
        #[serde(rename = "predictedPrice")]
        predicted_price: f64,
    },
    Trading {
        #[serde(rename = "tradingAddress")]
        trading_address: String,
    },
}

impl JoinEntry {
    pub fn kind(&self) -> CompetitionKind {
        match self {
            Self::Callers { .. } => CompetitionKind::Callers,
            Self::Prediction { .. } => CompetitionKind::Prediction,
            Self::Trading { .. } => CompetitionKind::Trading,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalance {
    #[serde(default)]
    pub sol_balance: f64,
    #[serde(default)]
    pub usdc_balance: f64,
    #[serde(default)]
    pub sol_value_usd: f64,
}

/// Token the custodial wallet can withdraw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenSymbol {
    #[default]
    Sol,
    Usdc,
}

impl TokenSymbol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sol => "SOL",
            Self::Usdc => "USDC",
        }
    }
}

impl fmt::Display for TokenSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenSymbol {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SOL" => Ok(Self::Sol),
            "USDC" => Ok(Self::Usdc),
            other => Err(CoreError::Validation(format!("unsupported token: {}", other))),
        }
    }
}

/// Body of `POST /api/withdraw`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithdrawRequest {
    pub token: TokenSymbol,
    pub amount: String,
    pub destination: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub url: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start_date: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end_date: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QuestList {
    #[serde(default)]
    pub quests: Vec<Quest>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoryKind {
    Quest,
    Referral,
    ReferralUsed,
    #[serde(other)]
    Other,
}

/// One line of the points history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    #[serde(rename = "type")]
    pub kind: HistoryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quest_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub points: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct QuestSummary {
    #[serde(default)]
    pub user_points: i64,
    #[serde(default)]
    pub history: Vec<HistoryItem>,
}

impl QuestSummary {
    /// A quest counts as completed once a matching quest entry is in the history
    pub fn is_quest_completed(&self, quest_id: &str) -> bool {
        self.history.iter().any(|item| {
            item.kind == HistoryKind::Quest && item.quest_id.as_deref() == Some(quest_id)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReferralCode {
    #[serde(default)]
    pub referral_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsedReferral {
    pub code: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub used_at: Option<OffsetDateTime>,
}

/// Response of `GET /api/referral/from`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReferralSource {
    #[serde(default)]
    pub user_used_referral_code: Option<UsedReferral>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitReferral {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteQuest {
    pub quest_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    #[serde(default)]
    pub push_enabled: bool,
}

/// Error body returned by the platform API on non-2xx responses
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_ENTRY_FEE_SOL;

    const COMPETITION_JSON: &str = r#"{
        "_id": "65f0c1",
        "name": "SOL Price Guess",
        "type": "prediction",
        "prizePool": "10 SOL",
        "organizerName": "Finfun",
        "organizerLogo": "/images/logo.png",
        "fee": 0.05,
        "status": "live",
        "submissions": [
            {"userId": "u1", "predictedPrice": 182.5},
            {"userId": "u2", "userName": "andika"}
        ],
        "registrationStart": "2025-03-01T00:00:00.000Z",
        "registrationEnd": "2025-03-01T00:05:00.000Z",
        "announceTime": "2025-03-10T00:00:00.000Z",
        "createdAt": "2025-02-28T00:00:00.000Z",
        "__v": 0
    }"#;

    #[test]
    fn test_competition_from_backend_json() {
        let competition: Competition = serde_json::from_str(COMPETITION_JSON).unwrap();

        assert_eq!(competition.id, "65f0c1");
        assert_eq!(competition.kind, CompetitionKind::Prediction);
        assert_eq!(competition.participants(), 2);
        assert_eq!(competition.submissions[0].predicted_price, Some(182.5));
        assert_eq!(competition.submissions[0].display_name(), "u1");
        assert_eq!(competition.submissions[1].display_name(), "andika");
        assert!(competition.registration_start < competition.registration_end);
    }

    #[test]
    fn test_null_fee_falls_back_to_default() {
        let json = COMPETITION_JSON.replace(r#""fee": 0.05"#, r#""fee": null"#);
        let competition: Competition = serde_json::from_str(&json).unwrap();
        assert_eq!(competition.fee, None);
        assert_eq!(competition.entry_fee(), DEFAULT_ENTRY_FEE_SOL);

        let competition: Competition = serde_json::from_str(COMPETITION_JSON).unwrap();
        assert_eq!(competition.entry_fee(), 0.05);
    }

    #[test]
    fn test_kind_parsing_ignores_case() {
        assert_eq!("Callers".parse::<CompetitionKind>(), Ok(CompetitionKind::Callers));
        assert_eq!("TRADING".parse::<CompetitionKind>(), Ok(CompetitionKind::Trading));
        assert_eq!(
            "lottery".parse::<CompetitionKind>(),
            Err(CoreError::UnknownKind("lottery".to_string()))
        );
    }

    #[test]
    fn test_join_request_body_per_kind() {
        let request = JoinRequest {
            transaction_signature: "5sig".to_string(),
            entry: JoinEntry::Prediction {
                predicted_price: 150.25,
            },
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"transactionSignature": "5sig", "predictedPrice": 150.25})
        );

        let request = JoinRequest {
            transaction_signature: "5sig".to_string(),
            entry: JoinEntry::Callers {
                coin_address: "GrV1".to_string(),
            },
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"transactionSignature": "5sig", "coinAddress": "GrV1"})
        );
    }

    #[test]
    fn test_quest_completion_from_history() {
        let summary: QuestSummary = serde_json::from_str(
            r#"{
                "userPoints": 120,
                "history": [
                    {"type": "quest", "questId": "q1", "description": "Follow us", "points": 100, "date": "2025-03-02T10:00:00Z"},
                    {"type": "referral", "description": "Friend joined", "points": 20, "date": "2025-03-03T10:00:00Z"},
                    {"type": "airdrop", "description": "Bonus", "points": 0, "date": "2025-03-04T10:00:00Z"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(summary.user_points, 120);
        assert!(summary.is_quest_completed("q1"));
        assert!(!summary.is_quest_completed("q2"));
        assert_eq!(summary.history[2].kind, HistoryKind::Other);
    }

    #[test]
    fn test_withdraw_request_token_casing() {
        let request = WithdrawRequest {
            token: TokenSymbol::Usdc,
            amount: "12.5".to_string(),
            destination: "Dest111".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"token": "USDC", "amount": "12.5", "destination": "Dest111"})
        );
    }
}
