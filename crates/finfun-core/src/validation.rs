//! Validation of user input before it is sent to the platform API

use crate::{
    CompetitionKind, CoreError, JoinEntry, JoinRequest, SubmitReferral, TokenSymbol,
    WithdrawRequest,
};

pub const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

/// Charged when a competition has no usable fee configured
pub const DEFAULT_ENTRY_FEE_SOL: f64 = 0.01;

/// Raw join form input; only the field for the competition's kind is read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinInput {
    pub transaction_signature: Option<String>,
    pub coin_address: Option<String>,
    pub predicted_price: Option<String>,
    pub trading_address: Option<String>,
}

fn required(value: &Option<String>, field: &'static str) -> Result<String, CoreError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(CoreError::MissingField(field)),
    }
}

impl JoinEntry {
    /// Builds the entry for `kind` from the form, requiring that kind's field
    pub fn from_input(kind: CompetitionKind, input: &JoinInput) -> Result<Self, CoreError> {
        match kind {
            CompetitionKind::Callers => Ok(JoinEntry::Callers {
                coin_address: required(&input.coin_address, "token address")?,
            }),
            CompetitionKind::Prediction => {
                let raw = required(&input.predicted_price, "predicted price")?;
                let predicted_price: f64 = raw
                    .parse()
                    .map_err(|_| CoreError::InvalidAmount(raw.clone()))?;
                if !predicted_price.is_finite() || predicted_price < 0.0 {
                    return Err(CoreError::InvalidAmount(raw));
                }
                Ok(JoinEntry::Prediction { predicted_price })
            }
            CompetitionKind::Trading => Ok(JoinEntry::Trading {
                trading_address: required(&input.trading_address, "trading address")?,
            }),
        }
    }
}

impl JoinRequest {
    pub fn from_input(kind: CompetitionKind, input: &JoinInput) -> Result<Self, CoreError> {
        let transaction_signature =
            required(&input.transaction_signature, "transaction signature")?;
        let entry = JoinEntry::from_input(kind, input)?;
        Ok(Self {
            transaction_signature,
            entry,
        })
    }
}

/// Configured fee in SOL, or the default when it is missing or unusable
pub fn effective_entry_fee(fee_sol: Option<f64>) -> f64 {
    match fee_sol {
        Some(fee) if fee.is_finite() && fee > 0.0 => fee,
        _ => DEFAULT_ENTRY_FEE_SOL,
    }
}

/// Entry fee converted to lamports, rounding down
pub fn entry_fee_lamports(fee_sol: Option<f64>) -> u64 {
    (effective_entry_fee(fee_sol) * LAMPORTS_PER_SOL).floor() as u64
}

/// Transfer the wallet bridge must sign before the join request is sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferIntent {
    pub lamports: u64,
    pub destination: String,
}

impl TransferIntent {
    pub fn for_entry_fee(fee_sol: Option<f64>, destination: &str) -> Self {
        Self {
            lamports: entry_fee_lamports(fee_sol),
            destination: destination.to_string(),
        }
    }
}

/// Trims a referral code, rejecting blank input
pub fn validate_referral_code(code: &str) -> Result<SubmitReferral, CoreError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(CoreError::MissingField("referral code"));
    }
    if code.chars().any(char::is_whitespace) {
        return Err(CoreError::Validation(format!("invalid referral code: {}", code)));
    }
    Ok(SubmitReferral {
        code: code.to_string(),
    })
}

/// Raw withdraw form input
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WithdrawInput {
    pub token: Option<String>,
    pub amount: Option<String>,
    pub destination: Option<String>,
}

impl WithdrawRequest {
    pub fn from_input(input: &WithdrawInput) -> Result<Self, CoreError> {
        let (Some(amount), Some(destination)) = (
            input.amount.as_deref().map(str::trim).filter(|v| !v.is_empty()),
            input.destination.as_deref().map(str::trim).filter(|v| !v.is_empty()),
        ) else {
            return Err(CoreError::Validation("Please fill in all fields".to_string()));
        };

        let value: f64 = amount
            .parse()
            .map_err(|_| CoreError::InvalidAmount(amount.to_string()))?;
        if !value.is_finite() || value <= 0.0 {
            return Err(CoreError::InvalidAmount(amount.to_string()));
        }

        let token = match input.token.as_deref() {
            Some(token) => token.parse()?,
            None => TokenSymbol::default(),
        };

        Ok(Self {
            token,
            amount: amount.to_string(),
            destination: destination.to_string(),
        })
    }
}
