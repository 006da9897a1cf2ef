//! Intent Classifier
//!
//! Detects whether the recent chat is about flights, hotels or shopping.
//! Each domain is a row in a rule table: subject keywords, action keywords
//! and a priority. A domain matches when the trailing window contains at
//! least one of each, in any turn. When several match, the lowest priority
//! value wins (flight, hotel, shopping by default).

use crate::config::DEFAULT_INTENT_WINDOW;
use crate::models::{ChatTurn, Domain};

/// Static keyword lists — zero allocation
const FLIGHT_SUBJECTS: &[&str] = &[
    "flight", "fly", "flying", "airport", "airline", "plane", "travel", "airfare",
];

const HOTEL_SUBJECTS: &[&str] = &[
    "hotel", "motel", "resort", "accommodation", "lodging", "room", "stay",
];

const SHOPPING_SUBJECTS: &[&str] = &[
    "shop", "shopping", "product", "store", "deal", "purchase", "buy",
];

const ACTION_KEYWORDS: &[&str] = &[
    "book", "find", "search", "looking for", "look for", "show me", "need", "want", "get me",
    "compare",
];

/// One row of the classification table.
#[derive(Debug, Clone)]
pub struct DomainRule {
    pub domain: Domain,
    pub subjects: Vec<String>,
    pub actions: Vec<String>,
    /// Lower wins.
    pub priority: u8,
}

impl DomainRule {
    pub fn new(domain: Domain, subjects: &[&str], actions: &[&str], priority: u8) -> Self {
        Self {
            domain,
            subjects: subjects.iter().map(|s| s.to_lowercase()).collect(),
            actions: actions.iter().map(|s| s.to_lowercase()).collect(),
            priority,
        }
    }

    fn matches(&self, window: &[String]) -> bool {
        let has = |keywords: &[String]| {
            window
                .iter()
                .any(|text| keywords.iter().any(|kw| text.contains(kw.as_str())))
        };

        has(self.subjects.as_slice()) && has(self.actions.as_slice())
    }
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// How many trailing turns are inspected.
    pub window: usize,
    pub rules: Vec<DomainRule>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::with_priority(&Domain::ALL, DEFAULT_INTENT_WINDOW)
    }
}

impl ClassifierConfig {
    /// Default keyword table, ranked by `order`.
    ///
    /// Domains missing from `order` rank after the listed ones.
    pub fn with_priority(order: &[Domain], window: usize) -> Self {
        let rank = |domain: Domain| -> u8 {
            order
                .iter()
                .position(|d| *d == domain)
                .unwrap_or(order.len() + domain as usize) as u8
        };

        let rules = vec![
            DomainRule::new(Domain::Flight, FLIGHT_SUBJECTS, ACTION_KEYWORDS, rank(Domain::Flight)),
            DomainRule::new(Domain::Hotel, HOTEL_SUBJECTS, ACTION_KEYWORDS, rank(Domain::Hotel)),
            DomainRule::new(
                Domain::Shopping,
                SHOPPING_SUBJECTS,
                ACTION_KEYWORDS,
                rank(Domain::Shopping),
            ),
        ];

        Self { window, rules }
    }
}

/// Table-driven intent classifier
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    window: usize,
    /// Sorted by priority; stable, so equal priorities keep table order.
    rules: Vec<DomainRule>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl IntentClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        let mut rules = config.rules;
        rules.sort_by_key(|rule| rule.priority);

        Self {
            window: config.window.max(1),
            rules,
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// First matching domain in priority order, or `None`.
    pub fn classify(&self, turns: &[ChatTurn]) -> Option<Domain> {
        let window = self.lowered_window(turns);
        self.rules
            .iter()
            .find(|rule| rule.matches(&window))
            .map(|rule| rule.domain)
    }

    /// Every matching domain, in priority order.
    pub fn matches(&self, turns: &[ChatTurn]) -> Vec<Domain> {
        let window = self.lowered_window(turns);
        self.rules
            .iter()
            .filter(|rule| rule.matches(&window))
            .map(|rule| rule.domain)
            .collect()
    }

    fn lowered_window(&self, turns: &[ChatTurn]) -> Vec<String> {
        let start = turns.len().saturating_sub(self.window);
        turns[start..]
            .iter()
            .map(|turn| turn.content.to_lowercase())
            .collect()
    }
}
