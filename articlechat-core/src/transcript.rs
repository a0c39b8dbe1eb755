use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Answer text shown in place of a reply whenever a turn fails, whatever the cause.
pub const FALLBACK_ERROR_MESSAGE: &str =
    "Error: Could not connect to the server. Please check if the API is running.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOutcome {
    Answered,
    Failed,
}

/// One completed turn. Never mutated after it is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub question: String,
    pub answer: String,
    pub completed_at_unix_ms: i64,
    pub outcome: TurnOutcome,
}

impl TranscriptEntry {
    pub fn answered(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            completed_at_unix_ms: now_unix_ms(),
            outcome: TurnOutcome::Answered,
        }
    }

    pub fn failed(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: FALLBACK_ERROR_MESSAGE.into(),
            completed_at_unix_ms: now_unix_ms(),
            outcome: TurnOutcome::Failed,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.outcome == TurnOutcome::Failed
    }
}

pub fn now_unix_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis().try_into().unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_entry_carries_fallback_text() {
        let e = TranscriptEntry::failed("why?");
        assert_eq!(e.question, "why?");
        assert_eq!(e.answer, FALLBACK_ERROR_MESSAGE);
        assert!(e.is_failure());
        assert!(e.completed_at_unix_ms > 0);
    }

    #[test]
    fn answered_entry_keeps_answer() {
        let e = TranscriptEntry::answered("q", "It is about X.");
        assert_eq!(e.answer, "It is about X.");
        assert_eq!(e.outcome, TurnOutcome::Answered);
    }
}
