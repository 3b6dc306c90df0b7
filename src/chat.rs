//! Chat session: conversation state behind `finguard chat`.
//!
//! The session owns the transcript and the active [`Localizer`]. Each turn
//! appends the user's message, asks the analyzer, then appends either a
//! synthesized assistant reply or the localized apology. Nothing is
//! persisted.

use async_trait::async_trait;
use finguard_core::{analysis::AnalysisResponse, error::FinguardError};
use finguard_providers::proxy_client::ProxyClient;
use tracing::warn;
use uuid::Uuid;

use crate::i18n::{Locale, Localizer};

/// Id of the greeting that opens every session.
pub const WELCOME_ID: &str = "welcome";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
        }
    }
}

/// Anything that can turn a message into an analysis.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(
        &self,
        message: &str,
        language: &str,
    ) -> Result<AnalysisResponse, FinguardError>;
}

#[async_trait]
impl Analyzer for ProxyClient {
    async fn analyze(
        &self,
        message: &str,
        language: &str,
    ) -> Result<AnalysisResponse, FinguardError> {
        self.analyze_text(message, language).await
    }
}

/// One line typed at the chat prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum Input<'a> {
    Empty,
    Quit,
    /// `/lang <code>`; `None` when the code is not a supported locale.
    SetLang(Option<Locale>),
    Message(&'a str),
}

impl<'a> Input<'a> {
    pub fn parse(line: &'a str) -> Self {
        let text = line.trim();
        if text.is_empty() {
            return Self::Empty;
        }
        if matches!(text, "/quit" | "/exit") {
            return Self::Quit;
        }
        if let Some(code) = text.strip_prefix("/lang") {
            if code.is_empty() || code.starts_with(char::is_whitespace) {
                return Self::SetLang(Locale::parse(code.trim()));
            }
        }
        Self::Message(text)
    }
}

/// Build the assistant's reply from an analysis: risk line, explanation,
/// tips and contact, separated by blank lines.
pub fn make_assistant_reply(resp: &AnalysisResponse, l10n: &Localizer) -> String {
    let mut parts = Vec::with_capacity(4);

    let mut headline = format!("{}: {}", l10n.t("risk"), l10n.risk_label(resp.risk_score));
    if !resp.scam_type.is_empty() {
        headline.push_str(" · ");
        headline.push_str(&resp.scam_type);
    }
    parts.push(headline);

    let explanation = resp.preferred_explanation();
    if !explanation.is_empty() {
        parts.push(explanation.to_string());
    }

    let tips = resp.preferred_steps();
    if !tips.is_empty() {
        parts.push(format!("{}:\n- {}", l10n.t("tips"), tips.join("\n- ")));
    }

    if let Some(contact) = resp.contact.as_deref().filter(|c| !c.is_empty()) {
        parts.push(format!("{}: {contact}", l10n.t("contact")));
    }

    parts.join("\n\n")
}

pub struct ChatSession {
    messages: Vec<ChatMessage>,
    loading: bool,
    l10n: Localizer,
}

impl ChatSession {
    pub fn new(l10n: Localizer) -> Self {
        let welcome = ChatMessage {
            id: WELCOME_ID.to_string(),
            role: Role::Assistant,
            content: l10n.t("chat_welcome").to_string(),
        };
        Self {
            messages: vec![welcome],
            loading: false,
            l10n,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn l10n(&self) -> &Localizer {
        &self.l10n
    }

    pub fn set_lang(&mut self, locale: Locale) {
        self.l10n.set_lang(locale);
    }

    /// Run one turn. Returns the assistant message appended, or `None` when
    /// the input is blank or a turn is already in flight.
    pub async fn send(&mut self, input: &str, analyzer: &dyn Analyzer) -> Option<&ChatMessage> {
        let text = input.trim();
        if text.is_empty() || self.loading {
            return None;
        }

        self.messages.push(ChatMessage::new(Role::User, text));
        self.loading = true;

        let reply = match analyzer.analyze(text, self.l10n.lang().as_str()).await {
            Ok(resp) => make_assistant_reply(&resp, &self.l10n),
            Err(e) => {
                warn!("chat: analysis failed: {e}");
                self.l10n.t("chat_error").to_string()
            }
        };

        self.loading = false;
        self.messages.push(ChatMessage::new(Role::Assistant, reply));
        self.messages.last()
    }
}
