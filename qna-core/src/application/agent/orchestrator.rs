use super::errors::{OrchestratorError, SetupError};
use super::events::{ObserverSet, TaskObserver};
use super::intent::IntentClassifier;
use super::prompts::{AMBIGUOUS_INTENT_MESSAGE, UNRESOLVED_INTENT_MESSAGE};
use super::response::{IntentAgentResponse, TaskAgentResponse};
use super::task::TaskExecutor;
use crate::infrastructure::model::CompletionProvider;
use std::sync::Arc;
use tracing::{info, warn};

enum TaskRoute {
    Reply(String),
    Shift(String),
}

/// Routes each query to the classifier or the executor and owns the
/// session's active intent.
pub struct Orchestrator<P: CompletionProvider> {
    classifier: IntentClassifier<P>,
    executor: TaskExecutor<P>,
    active_intent: Option<String>,
    subscribers: ObserverSet,
}

impl<P: CompletionProvider> Orchestrator<P> {
    pub fn new(classifier: IntentClassifier<P>, executor: TaskExecutor<P>) -> Self {
        let subscribers = ObserverSet::default();
        executor.subscribe(Arc::new(subscribers.clone()));
        Self {
            classifier,
            executor,
            active_intent: None,
            subscribers,
        }
    }

    /// Load intents, persona and tools for both agents.
    pub async fn setup(&mut self) -> Result<(), SetupError> {
        self.classifier.setup().await?;
        self.executor.setup().await?;
        Ok(())
    }

    /// Receive executor progress events.
    pub fn subscribe(&self, observer: Arc<dyn TaskObserver>) {
        self.subscribers.subscribe(observer);
    }

    pub async fn handle_query(&mut self, query: &str) -> Result<String, OrchestratorError> {
        if let Some(intent) = self.active_intent.clone() {
            match self.route_task(query).await {
                TaskRoute::Reply(reply) => return Ok(reply),
                TaskRoute::Shift(reason) => {
                    info!(intent = intent.as_str(), %reason, "Intent shift detected, reclassifying");
                    self.active_intent = None;
                    return self.route_intent(query, true).await;
                }
            }
        }
        self.route_intent(query, false).await
    }

    /// Classify `query` and hand the restated request to the executor. A
    /// shift reported by the executor re-enters classification with the
    /// original query once per call; a second shift ends the call.
    async fn route_intent(
        &mut self,
        query: &str,
        mut reentered: bool,
    ) -> Result<String, OrchestratorError> {
        loop {
            let (recognized_intent, user_query) = match self.classifier.process(query).await? {
                IntentAgentResponse::ClarifyingQuestion { content } => return Ok(content),
                IntentAgentResponse::Ambiguous => {
                    warn!("Intent could not be determined; no active intent set");
                    return Ok(AMBIGUOUS_INTENT_MESSAGE.to_string());
                }
                IntentAgentResponse::Classified {
                    recognized_intent,
                    user_query,
                } => (recognized_intent, user_query),
            };

            self.executor.set_system_prompt(&recognized_intent)?;
            let intent = recognized_intent.trim().to_string();
            info!(intent = intent.as_str(), "Active intent set");
            self.active_intent = Some(intent.clone());

            match self.route_task(&user_query).await {
                TaskRoute::Reply(reply) => return Ok(reply),
                TaskRoute::Shift(reason) => {
                    self.active_intent = None;
                    if reentered {
                        warn!(
                            intent = intent.as_str(),
                            %reason,
                            "Intent shift after reclassification, giving up"
                        );
                        return Ok(UNRESOLVED_INTENT_MESSAGE.to_string());
                    }
                    info!(intent = intent.as_str(), %reason, "Intent shift detected, reclassifying");
                    reentered = true;
                }
            }
        }
    }

    async fn route_task(&mut self, query: &str) -> TaskRoute {
        match self.executor.process(query).await {
            TaskAgentResponse::Response { content } => TaskRoute::Reply(content),
            TaskAgentResponse::Error { message } => TaskRoute::Reply(message),
            TaskAgentResponse::IntentShiftDetected { reason } => TaskRoute::Shift(reason),
        }
    }

    pub fn active_intent(&self) -> Option<&str> {
        self.active_intent.as_deref()
    }

    /// Forget the active intent and both agents' conversations.
    pub fn reset(&mut self) {
        info!("Session reset");
        self.active_intent = None;
        self.classifier.reset();
        self.executor.reset();
    }

    pub fn classifier(&self) -> &IntentClassifier<P> {
        &self.classifier
    }

    pub fn executor(&self) -> &TaskExecutor<P> {
        &self.executor
    }
}
