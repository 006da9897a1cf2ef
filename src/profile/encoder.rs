//! Profile → natural-language query text
//!
//! Output is a pure function of the profile fields, so a given profile
//! version always embeds to the same query.

use crate::models::FinancialProfile;
use std::collections::BTreeSet;
use std::fmt::Write;

pub struct ProfileTextEncoder;

impl ProfileTextEncoder {
    /// Render the profile in a fixed field order.
    ///
    /// Sections: income, credit score, spending categories, travel and
    /// dining frequency, preferred benefits, eligibility constraints.
    pub fn encode(profile: &FinancialProfile) -> String {
        let income = format_amount(profile.annual_income);
        let categories = normalized_list(&profile.spending_categories);
        let benefits = normalized_list(&profile.preferred_benefits);

        let mut text = String::with_capacity(384);

        // write! into a String cannot fail
        let _ = write!(text, "Annual income: {}. ", income);
        let _ = write!(text, "Credit score: {}. ", profile.credit_score);
        let _ = write!(
            text,
            "Primary spending categories: {}. ",
            or_none(&categories)
        );
        let _ = write!(
            text,
            "Travel frequency: {}. Dining frequency: {}. ",
            profile.travel_frequency, profile.dining_frequency
        );
        let _ = write!(text, "Preferred benefits: {}. ", or_none(&benefits));
        let _ = write!(
            text,
            "Eligibility: only cards requiring credit score <= {} and income <= {}.",
            profile.credit_score, income
        );

        text
    }
}

/// Whole currency units; avoids float noise in the text.
fn format_amount(amount: f64) -> String {
    format!("${:.0}", amount)
}

fn normalized_list(tags: &BTreeSet<String>) -> String {
    tags.iter()
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>()
        .join(", ")
}

fn or_none(list: &str) -> &str {
    if list.is_empty() {
        "none"
    } else {
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Frequency;
    use chrono::Utc;
    use uuid::Uuid;

    fn create_test_profile() -> FinancialProfile {
        FinancialProfile {
            profile_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            annual_income: 85_000.0,
            credit_score: 742,
            spending_categories: ["Travel", "dining", "groceries"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            travel_frequency: Frequency::Frequently,
            dining_frequency: Frequency::Occasionally,
            preferred_benefits: ["lounge access", "no foreign transaction fees"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_encode_is_deterministic() {
        let profile = create_test_profile();
        let copy = profile.clone();
        assert_eq!(
            ProfileTextEncoder::encode(&profile),
            ProfileTextEncoder::encode(&copy)
        );
    }

    #[test]
    fn test_encode_ignores_insertion_order() {
        let a = create_test_profile();
        let mut b = a.clone();
        b.spending_categories = ["groceries", "dining", "Travel"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(ProfileTextEncoder::encode(&a), ProfileTextEncoder::encode(&b));
    }

    #[test]
    fn test_encode_field_order_and_constraints() {
        let text = ProfileTextEncoder::encode(&create_test_profile());

        let income = text.find("Annual income: $85000").unwrap();
        let score = text.find("Credit score: 742").unwrap();
        let categories = text
            .find("Primary spending categories: dining, groceries, travel")
            .unwrap();
        let travel = text.find("Travel frequency: frequently").unwrap();
        let dining = text.find("Dining frequency: occasionally").unwrap();
        let benefits = text
            .find("Preferred benefits: lounge access, no foreign transaction fees")
            .unwrap();
        let eligibility = text
            .find("credit score <= 742 and income <= $85000")
            .unwrap();

        assert!(income < score);
        assert!(score < categories);
        assert!(categories < travel);
        assert!(travel < dining);
        assert!(dining < benefits);
        assert!(benefits < eligibility);
    }

    #[test]
    fn test_encode_without_benefits() {
        let mut profile = create_test_profile();
        profile.preferred_benefits.clear();
        let text = ProfileTextEncoder::encode(&profile);
        assert!(text.contains("Preferred benefits: none."));
    }
}
