//! Chat session registry
//!
//! Each session owns its history and router behind its own mutex, so two
//! messages for one session are applied one after the other. Sessions never
//! share state with each other.

pub mod history;

pub use history::ChatHistory;

use crate::classifier::{ClassifierConfig, IntentClassifier};
use crate::config::Settings;
use crate::error::AdvisorError;
use crate::models::{Domain, InterfaceState, TurnRole};
use crate::prefetch::{HttpPrefetcher, NoopPrefetcher, Prefetcher};
use crate::router::{InterfaceRouter, Transition};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};
use uuid::Uuid;

/// Per-session state.
#[derive(Debug)]
pub struct ChatSession {
    pub session_id: Uuid,
    pub user_id: Uuid,
    history: ChatHistory,
    router: InterfaceRouter,
}

impl ChatSession {
    fn new(session_id: Uuid, user_id: Uuid) -> Self {
        Self {
            session_id,
            user_id,
            history: ChatHistory::new(),
            router: InterfaceRouter::new(),
        }
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn state(&self) -> InterfaceState {
        self.router.state()
    }
}

/// What one message or navigation did to a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUpdate {
    pub session_id: Uuid,
    pub intent: Option<Domain>,
    pub transition: Transition,
    pub state: InterfaceState,
    /// A domain intent was seen; callers may show a card nudge.
    pub show_recommendation_nudge: bool,
}

pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Mutex<ChatSession>>>>>,
    classifier: IntentClassifier,
    prefetcher: Arc<dyn Prefetcher>,
}

impl SessionRegistry {
    pub fn new(classifier: IntentClassifier, prefetcher: Arc<dyn Prefetcher>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            classifier,
            prefetcher,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let classifier = IntentClassifier::new(ClassifierConfig::with_priority(
            &settings.intent_priority,
            settings.intent_window,
        ));

        let prefetcher: Arc<dyn Prefetcher> = match settings.prefetch_base_url.as_deref() {
            Some(url) => Arc::new(HttpPrefetcher::new(url)?),
            None => Arc::new(NoopPrefetcher),
        };

        Ok(Self::new(classifier, prefetcher))
    }

    /// Open a new chat session at the welcome panel.
    pub async fn start_session(&self, user_id: Uuid) -> Uuid {
        let session_id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(ChatSession::new(session_id, user_id)));

        self.sessions.write().await.insert(session_id, session);

        info!(%session_id, %user_id, "Chat session started");
        session_id
    }

    /// Clear the transcript and go back to welcome.
    pub async fn reset_session(&self, session_id: Uuid) -> Result<()> {
        let session = self.get(session_id).await?;
        let mut session = session.lock().await;

        session.history.clear();
        session.router.reset();

        info!(%session_id, "Chat session reset");
        Ok(())
    }

    pub async fn end_session(&self, session_id: Uuid) -> bool {
        self.sessions.write().await.remove(&session_id).is_some()
    }

    pub async fn state(&self, session_id: Uuid) -> Result<InterfaceState> {
        let session = self.get(session_id).await?;
        let state = session.lock().await.state();
        Ok(state)
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Record a chat message, classify the window and route.
    ///
    /// `navigation` is an explicit panel click in the same cycle and wins
    /// over whatever the classifier infers.
    pub async fn handle_message(
        &self,
        session_id: Uuid,
        role: TurnRole,
        content: &str,
        navigation: Option<InterfaceState>,
    ) -> Result<SessionUpdate> {
        let session = self.get(session_id).await?;
        let mut session = session.lock().await;

        session.history.push(role, content);
        let window = session.history.recent(self.classifier.window());
        let intent = self.classifier.classify(&window);
        let transition = session.router.apply(intent, navigation);

        Ok(self.finish(session_id, intent, transition))
    }

    /// Explicit panel switch without a chat message.
    pub async fn navigate(
        &self,
        session_id: Uuid,
        target: InterfaceState,
    ) -> Result<SessionUpdate> {
        let session = self.get(session_id).await?;
        let transition = session.lock().await.router.navigate(target);

        Ok(self.finish(session_id, None, transition))
    }

    async fn get(&self, session_id: Uuid) -> Result<Arc<Mutex<ChatSession>>> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .cloned()
            .ok_or(AdvisorError::SessionNotFound(session_id))
    }

    fn finish(
        &self,
        session_id: Uuid,
        intent: Option<Domain>,
        transition: Transition,
    ) -> SessionUpdate {
        if let Some(domain) = transition.prefetch {
            self.dispatch_prefetch(session_id, domain);
        }

        SessionUpdate {
            session_id,
            intent,
            transition,
            state: transition.to,
            show_recommendation_nudge: intent.is_some(),
        }
    }

    /// Fire-and-forget; the transition has already been applied.
    fn dispatch_prefetch(&self, session_id: Uuid, domain: Domain) {
        let prefetcher = Arc::clone(&self.prefetcher);
        tokio::spawn(async move {
            if let Err(e) = prefetcher.prefetch(session_id, domain).await {
                warn!(%session_id, %domain, "Prefetch failed: {}", e);
            }
        });
    }
}
