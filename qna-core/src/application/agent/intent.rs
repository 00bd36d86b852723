use super::errors::{ClassifierError, SetupError};
use super::prompts::intent_classifier_prompt;
use super::resources::fetch_json;
use super::response::{IntentAgentResponse, parse_intent_response};
use crate::application::tooling::ProtocolClient;
use crate::constants::INTENTS_URI;
use crate::domain::{ConversationHistory, ConversationTurn, Intent};
use crate::infrastructure::model::{CompletionProvider, CompletionRequest, ResponseFormat};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// First stage: turns a free-text query into an intent, possibly after a
/// few clarifying questions. History lives only for one classification
/// thread and is dropped once the outcome is terminal.
pub struct IntentClassifier<P: CompletionProvider> {
    provider: Arc<P>,
    protocol: Arc<dyn ProtocolClient>,
    intents_uri: String,
    intents: Vec<Intent>,
    system_prompt: Option<String>,
    history: ConversationHistory,
    clarifications: usize,
}

impl<P: CompletionProvider> IntentClassifier<P> {
    pub fn new(provider: Arc<P>, protocol: Arc<dyn ProtocolClient>) -> Self {
        Self {
            provider,
            protocol,
            intents_uri: INTENTS_URI.to_string(),
            intents: Vec::new(),
            system_prompt: None,
            history: ConversationHistory::new(),
            clarifications: 0,
        }
    }

    pub fn with_intents_uri(mut self, uri: impl Into<String>) -> Self {
        self.intents_uri = uri.into();
        self
    }

    pub async fn setup(&mut self) -> Result<(), SetupError> {
        let intents: Vec<Intent> = fetch_json(self.protocol.as_ref(), &self.intents_uri).await?;
        self.system_prompt = Some(intent_classifier_prompt(&intents));
        info!(count = intents.len(), "Intent classifier ready");
        self.intents = intents;
        Ok(())
    }

    pub async fn process(&mut self, query: &str) -> Result<IntentAgentResponse, ClassifierError> {
        let system_prompt = self.system_prompt.clone().ok_or(ClassifierError::NotSetUp)?;
        self.history.push(ConversationTurn::user(query));

        let request = CompletionRequest {
            system_prompt: Some(system_prompt),
            history: self.history.snapshot(),
            tools: Vec::new(),
            response_format: ResponseFormat::Json,
            max_output_tokens: None,
        };
        let response = self.provider.submit(request).await?;
        let text = response.text.unwrap_or_default();
        self.history.push(ConversationTurn::model(text.as_str()));

        let parsed = match parse_intent_response(&text) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(error = %err, "Intent classifier returned an unusable response");
                return Err(err.into());
            }
        };

        match &parsed {
            IntentAgentResponse::ClarifyingQuestion { .. } => {
                self.clarifications += 1;
                info!(
                    clarifications = self.clarifications,
                    "Intent classifier asked a clarifying question"
                );
            }
            IntentAgentResponse::Ambiguous => {
                info!(
                    clarifications = self.clarifications,
                    "Intent classification ended ambiguous"
                );
            }
            IntentAgentResponse::Classified {
                recognized_intent, ..
            } => {
                info!(
                    intent = recognized_intent.as_str(),
                    clarifications = self.clarifications,
                    "Intent classified"
                );
            }
        }

        if parsed.is_terminal() {
            debug!(turns = self.history.len(), "Clearing classifier history");
            self.reset();
        }
        Ok(parsed)
    }

    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn clarifications(&self) -> usize {
        self.clarifications
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.clarifications = 0;
    }
}
