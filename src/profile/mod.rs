//! Financial profile validation and text encoding
//!
//! Profiles are checked here before anything leaves the process.

pub mod encoder;

pub use encoder::ProfileTextEncoder;

use crate::error::AdvisorError;
use crate::models::FinancialProfile;
use crate::Result;
use sha2::{Digest, Sha256};

pub const MIN_CREDIT_SCORE: u16 = 300;
pub const MAX_CREDIT_SCORE: u16 = 900;

/// Reject profiles with missing or out-of-range required fields.
pub fn validate(profile: &FinancialProfile) -> Result<()> {
    if !profile.annual_income.is_finite() || profile.annual_income <= 0.0 {
        return Err(AdvisorError::InvalidProfile(format!(
            "annual income must be a positive number (got {})",
            profile.annual_income
        )));
    }

    if !(MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&profile.credit_score) {
        return Err(AdvisorError::InvalidProfile(format!(
            "credit score must be within {}..={} (got {})",
            MIN_CREDIT_SCORE, MAX_CREDIT_SCORE, profile.credit_score
        )));
    }

    if profile
        .spending_categories
        .iter()
        .all(|category| category.trim().is_empty())
    {
        return Err(AdvisorError::InvalidProfile(
            "at least one spending category is required".to_string(),
        ));
    }

    Ok(())
}

/// Hex SHA-256 of an encoded profile, stable per profile version.
pub fn fingerprint(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}
