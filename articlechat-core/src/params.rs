use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// One editable field of the pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamField {
    Question,
    UserEmail,
    SessionId,
    ArticleReference,
}

impl ParamField {
    pub const ALL: [ParamField; 4] = [
        ParamField::Question,
        ParamField::UserEmail,
        ParamField::SessionId,
        ParamField::ArticleReference,
    ];

    /// Field name as it appears in the `/chat` request body.
    pub fn wire_name(self) -> &'static str {
        match self {
            ParamField::Question => "user_question",
            ParamField::UserEmail => "user_email",
            ParamField::SessionId => "session_id",
            ParamField::ArticleReference => "article_url",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ParamField::Question => "question",
            ParamField::UserEmail => "email",
            ParamField::SessionId => "session",
            ParamField::ArticleReference => "article",
        }
    }
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown parameter field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for ParamField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        ParamField::ALL
            .into_iter()
            .find(|f| f.label() == key || f.wire_name() == key)
            .or_else(|| match key.as_str() {
                "q" => Some(ParamField::Question),
                "sid" => Some(ParamField::SessionId),
                "url" | "article_reference" => Some(ParamField::ArticleReference),
                _ => None,
            })
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// The live, editable request parameters. All fields are opaque strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParams {
    pub question: String,
    pub user_email: String,
    pub session_id: String,
    pub article_reference: String,
}

impl RequestParams {
    pub fn set(&mut self, field: ParamField, value: impl Into<String>) {
        *self.slot_mut(field) = value.into();
    }

    pub fn get(&self, field: ParamField) -> &str {
        match field {
            ParamField::Question => &self.question,
            ParamField::UserEmail => &self.user_email,
            ParamField::SessionId => &self.session_id,
            ParamField::ArticleReference => &self.article_reference,
        }
    }

    fn slot_mut(&mut self, field: ParamField) -> &mut String {
        match field {
            ParamField::Question => &mut self.question,
            ParamField::UserEmail => &mut self.user_email,
            ParamField::SessionId => &mut self.session_id,
            ParamField::ArticleReference => &mut self.article_reference,
        }
    }

    /// Freeze the current values into the request that goes on the wire.
    pub fn snapshot(&self) -> ChatRequest {
        ChatRequest {
            user_question: self.question.clone(),
            user_email: self.user_email.clone(),
            session_id: self.session_id.clone(),
            article_url: self.article_reference.clone(),
        }
    }
}

/// Immutable request body for `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub user_question: String,
    pub user_email: String,
    pub session_id: String,
    pub article_url: String,
}

/// Fresh opaque session identifier for users that don't bring their own.
pub fn new_session_id() -> String {
    Uuid::new_v4().simple().to_string()
}
