//! Booking service implementation.
//!
//! This module provides the `BookingService` which owns one
//! `BookingDialogueEngine` per visitor and routes widget traffic to the
//! right engine, keeping concurrent visitors fully isolated.

use std::collections::HashMap;
use std::sync::Arc;

use emily_core::backend::AdmissionsBackend;
use emily_core::booking::{BookingDialogueEngine, BookingStage, MessageOutcome};
use emily_core::config::EngineConfig;
use emily_core::enquiry::EnquiryData;
use emily_core::error::Result;
use tokio::sync::{Mutex, RwLock};

/// Service for managing per-visitor booking conversations.
///
/// `BookingService` creates engines lazily on first contact and keeps them
/// for the lifetime of the service. Each engine sits behind its own `Mutex`,
/// so turns from one visitor are processed strictly in order while distinct
/// visitors proceed concurrently.
///
/// # Thread Safety
///
/// The engine map is behind an `RwLock`; lookups take the read lock and
/// only first-contact insertion takes the write lock.
pub struct BookingService {
    backend: Arc<dyn AdmissionsBackend>,
    config: EngineConfig,
    engines: RwLock<HashMap<String, Arc<Mutex<BookingDialogueEngine>>>>,
}

impl BookingService {
    /// Creates a new service with no active conversations.
    pub fn new(backend: Arc<dyn AdmissionsBackend>, config: EngineConfig) -> Self {
        Self {
            backend,
            config,
            engines: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a service wired to the HTTP admissions backend, with the
    /// base URL taken from the environment.
    pub fn from_env(config: EngineConfig) -> Self {
        let backend = emily_backend::HttpAdmissionsBackend::try_from_env();
        Self::new(Arc::new(backend), config)
    }

    /// Routes one chat message to the visitor's engine.
    ///
    /// # Returns
    ///
    /// The engine's outcome: `Handled` with render events, or `NotHandled`
    /// when the caller should answer through its general Q&A path.
    pub async fn handle_message(&self, visitor_id: &str, message: &str) -> Result<MessageOutcome> {
        let engine = self.engine_for(visitor_id).await;
        let mut engine = engine.lock().await;
        engine.handle_message(message).await
    }

    /// Routes a completed enquiry form to the visitor's engine.
    pub async fn submit_enquiry_form(
        &self,
        visitor_id: &str,
        form: EnquiryData,
    ) -> Result<MessageOutcome> {
        let engine = self.engine_for(visitor_id).await;
        let mut engine = engine.lock().await;
        engine.submit_enquiry_form(form).await
    }

    /// Current stage of a visitor's conversation, if one exists.
    pub async fn stage(&self, visitor_id: &str) -> Option<BookingStage> {
        let engines = self.engines.read().await;
        match engines.get(visitor_id) {
            Some(engine) => Some(engine.lock().await.session().stage),
            None => None,
        }
    }

    /// Resets a visitor's conversation back to idle. A visitor with no
    /// conversation yet is left untouched.
    pub async fn reset(&self, visitor_id: &str) {
        let engines = self.engines.read().await;
        if let Some(engine) = engines.get(visitor_id) {
            engine.lock().await.reset();
        }
    }

    /// Drops a visitor's engine entirely (e.g. when their widget session
    /// expires).
    pub async fn remove(&self, visitor_id: &str) {
        let removed = self.engines.write().await.remove(visitor_id);
        if removed.is_some() {
            tracing::debug!(visitor_id, "booking conversation removed");
        }
    }

    /// Number of live conversations.
    pub async fn conversation_count(&self) -> usize {
        self.engines.read().await.len()
    }

    /// Returns the visitor's engine, creating it on first contact.
    async fn engine_for(&self, visitor_id: &str) -> Arc<Mutex<BookingDialogueEngine>> {
        {
            let engines = self.engines.read().await;
            if let Some(engine) = engines.get(visitor_id) {
                return engine.clone();
            }
        }

        let mut engines = self.engines.write().await;
        engines
            .entry(visitor_id.to_string())
            .or_insert_with(|| {
                tracing::info!(visitor_id, "new booking conversation");
                Arc::new(Mutex::new(BookingDialogueEngine::new(
                    self.backend.clone(),
                    self.config.clone(),
                )))
            })
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emily_core::backend::{BookingRequest, EnquiryOutcome};
    use emily_core::enquiry::VerifiedFamily;
    use emily_core::error::Result;
    use emily_core::event::OpenDayEvent;

    /// Backend that knows one family and no events.
    struct StubBackend;

    #[async_trait::async_trait]
    impl AdmissionsBackend for StubBackend {
        async fn verify_family(&self, email: &str) -> Result<Option<VerifiedFamily>> {
            if email == "sarah@example.com" {
                Ok(Some(VerifiedFamily {
                    name: "Sarah Smith".to_string(),
                    email: email.to_string(),
                    contact_number: "07700 900123".to_string(),
                    first_name: "Emma".to_string(),
                    family_surname: "Smith".to_string(),
                    age_group: "11-16".to_string(),
                    inquiry_id: 42,
                }))
            } else {
                Ok(None)
            }
        }

        async fn submit_enquiry(&self, _payload: &serde_json::Value) -> Result<EnquiryOutcome> {
            Ok(EnquiryOutcome::default())
        }

        async fn list_events(&self) -> Result<Vec<OpenDayEvent>> {
            Ok(vec![])
        }

        async fn create_booking(&self, _request: &BookingRequest) -> Result<serde_json::Value> {
            Ok(serde_json::json!({ "booking": { "id": 1 } }))
        }
    }

    fn service() -> BookingService {
        BookingService::new(Arc::new(StubBackend), EngineConfig::default())
    }

    #[tokio::test]
    async fn test_visitors_get_independent_conversations() {
        let service = service();

        let outcome = service.handle_message("visitor-a", "book a tour").await.unwrap();
        assert!(outcome.is_handled());
        assert_eq!(
            service.stage("visitor-a").await,
            Some(BookingStage::AskingRegistration)
        );

        // Visitor B's engine is untouched by A's progress.
        let outcome = service.handle_message("visitor-b", "hello").await.unwrap();
        assert_eq!(outcome, MessageOutcome::NotHandled);
        assert_eq!(service.stage("visitor-b").await, Some(BookingStage::Idle));

        assert_eq!(service.conversation_count().await, 2);
    }

    #[tokio::test]
    async fn test_reset_returns_visitor_to_idle() {
        let service = service();

        service.handle_message("visitor-a", "book a tour").await.unwrap();
        service.handle_message("visitor-a", "yes_registered").await.unwrap();
        service
            .handle_message("visitor-a", "sarah@example.com")
            .await
            .unwrap();
        assert_eq!(
            service.stage("visitor-a").await,
            Some(BookingStage::ChoosingEventType)
        );

        service.reset("visitor-a").await;
        assert_eq!(service.stage("visitor-a").await, Some(BookingStage::Idle));
    }

    #[tokio::test]
    async fn test_remove_drops_conversation() {
        let service = service();

        service.handle_message("visitor-a", "book a tour").await.unwrap();
        assert_eq!(service.conversation_count().await, 1);

        service.remove("visitor-a").await;
        assert_eq!(service.conversation_count().await, 0);
        assert_eq!(service.stage("visitor-a").await, None);
    }

    #[tokio::test]
    async fn test_unknown_visitor_has_no_stage() {
        let service = service();
        assert_eq!(service.stage("nobody").await, None);
        service.reset("nobody").await;
        assert_eq!(service.conversation_count().await, 0);
    }
}
