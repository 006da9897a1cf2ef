//! Core data models for the card advisor

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use uuid::Uuid;

//
// ================= Enums =================
//

/// Ordinal frequency used for travel and dining habits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Never,
    Occasionally,
    Frequently,
}

/// A panel-backed conversation domain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Flight,
    Hotel,
    Shopping,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Flight, Domain::Hotel, Domain::Shopping];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Flight => "flight",
            Domain::Hotel => "hotel",
            Domain::Shopping => "shopping",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "flight" | "flights" => Some(Domain::Flight),
            "hotel" | "hotels" => Some(Domain::Hotel),
            "shopping" | "shop" => Some(Domain::Shopping),
            _ => None,
        }
    }
}

/// Which panel is currently shown to the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceState {
    #[default]
    Welcome,
    Flight,
    Hotel,
    Shopping,
}

impl InterfaceState {
    /// The domain backing this panel, if any.
    pub fn domain(&self) -> Option<Domain> {
        match self {
            InterfaceState::Welcome => None,
            InterfaceState::Flight => Some(Domain::Flight),
            InterfaceState::Hotel => Some(Domain::Hotel),
            InterfaceState::Shopping => Some(Domain::Shopping),
        }
    }
}

impl From<Domain> for InterfaceState {
    fn from(domain: Domain) -> Self {
        match domain {
            Domain::Flight => InterfaceState::Flight,
            Domain::Hotel => InterfaceState::Hotel,
            Domain::Shopping => InterfaceState::Shopping,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

//
// ================= Profile =================
//

/// Structured financial profile captured during onboarding.
///
/// Owned by the user record; only referenced here by id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinancialProfile {
    pub profile_id: Uuid,
    pub user_id: Uuid,
    pub annual_income: f64,
    pub credit_score: u16,
    pub spending_categories: BTreeSet<String>,
    pub travel_frequency: Frequency,
    pub dining_frequency: Frequency,
    #[serde(default)]
    pub preferred_benefits: BTreeSet<String>,
    pub updated_at: DateTime<Utc>,
}

//
// ================= Cards =================
//

/// A card as returned to callers. Carries no similarity vector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardRecord {
    pub card_id: String,
    pub issuer: String,
    pub name: String,
    pub annual_fee: f64,
    pub min_credit_score: Option<u16>,
    pub min_income: Option<f64>,
    #[serde(default)]
    pub reward_rates: BTreeMap<String, f64>,
    #[serde(default)]
    pub benefits: BTreeSet<String>,
}

impl CardRecord {
    /// Both eligibility thresholds are present.
    pub fn has_eligibility_data(&self) -> bool {
        self.min_credit_score.is_some() && self.min_income.is_some()
    }

    /// Missing thresholds count as ineligible.
    pub fn is_eligible_for(&self, profile: &FinancialProfile) -> bool {
        match (self.min_credit_score, self.min_income) {
            (Some(min_score), Some(min_income)) => {
                profile.credit_score >= min_score && profile.annual_income >= min_income
            }
            _ => false,
        }
    }
}

/// Store-internal card document, vector included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDocument {
    #[serde(flatten)]
    pub card: CardRecord,
    pub embedding: Vec<f32>,
}

//
// ================= Recommendation =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationMode {
    /// Query vector came from the embedding service.
    Semantic,
    /// Query vector was random because embedding failed.
    Degraded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub profile_id: Uuid,
    /// Rank order, most relevant first.
    pub cards: Vec<CardRecord>,
    pub mode: RecommendationMode,
    pub query_fingerprint: String,
    pub limit: usize,
    pub generated_at: DateTime<Utc>,
}

impl RecommendationResult {
    pub fn is_degraded(&self) -> bool {
        self.mode == RecommendationMode::Degraded
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Caller-side eligibility filter, rank order preserved.
    pub fn eligible_for<'a>(
        &'a self,
        profile: &'a FinancialProfile,
    ) -> impl Iterator<Item = &'a CardRecord> + 'a {
        self.cards.iter().filter(move |card| card.is_eligible_for(profile))
    }
}

//
// ================= Chat =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
    pub position: u64,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>, position: u64) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
            position,
        }
    }

    pub fn assistant(content: impl Into<String>, position: u64) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
            position,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Frequency::Never => "never",
            Frequency::Occasionally => "occasionally",
            Frequency::Frequently => "frequently",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for InterfaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InterfaceState::Welcome => "welcome",
            InterfaceState::Flight => "flight",
            InterfaceState::Hotel => "hotel",
            InterfaceState::Shopping => "shopping",
        };
        write!(f, "{}", s)
    }
}
