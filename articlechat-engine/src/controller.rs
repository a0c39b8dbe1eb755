use crate::traits::ChatEndpoint;
use crate::transcript::Transcript;
use articlechat_core::config::ClientConfig;
use articlechat_core::params::{ChatRequest, ParamField, RequestParams};
use articlechat_core::text::{is_submittable, preview_text};
use articlechat_core::transcript::TranscriptEntry;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyQuestion,
    InFlight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was sent and nothing was recorded.
    Skipped(SkipReason),
    /// The turn resolved and this entry was appended to the transcript.
    Completed(TranscriptEntry),
}

impl SubmitOutcome {
    pub fn entry(&self) -> Option<&TranscriptEntry> {
        match self {
            SubmitOutcome::Completed(e) => Some(e),
            SubmitOutcome::Skipped(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnPolicy {
    pub retain_question_on_failure: bool,
}

impl TurnPolicy {
    pub fn from_client_config(cfg: &ClientConfig) -> Self {
        Self {
            retain_question_on_failure: cfg.retain_question_on_failure,
        }
    }
}

/// Holds the in-flight flag for one turn. Dropping it reopens the gate, so an early return,
/// a panic in the endpoint or a dropped future all leave the controller `Idle`.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Owns the pending request parameters and runs at most one turn at a time.
pub struct TurnController {
    endpoint: Arc<dyn ChatEndpoint>,
    transcript: Arc<Transcript>,
    params: Mutex<RequestParams>,
    in_flight: AtomicBool,
    policy: TurnPolicy,
}

impl TurnController {
    pub fn new(
        endpoint: Arc<dyn ChatEndpoint>,
        transcript: Arc<Transcript>,
        initial: RequestParams,
        policy: TurnPolicy,
    ) -> Self {
        Self {
            endpoint,
            transcript,
            params: Mutex::new(initial),
            in_flight: AtomicBool::new(false),
            policy,
        }
    }

    pub fn update_parameter(&self, field: ParamField, value: impl Into<String>) {
        self.lock_params().set(field, value);
    }

    /// Copy of the live parameters.
    pub fn params(&self) -> RequestParams {
        self.lock_params().clone()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn state(&self) -> TurnState {
        if self.is_in_flight() {
            TurnState::Submitting
        } else {
            TurnState::Idle
        }
    }

    pub fn transcript(&self) -> &Arc<Transcript> {
        &self.transcript
    }

    /// Runs one turn: snapshot, send, record, release.
    pub async fn submit(&self) -> SubmitOutcome {
        self.submit_with_hook(|_state| async {}).await
    }

    /// Same as `submit`, but reports `Submitting` once the request is locked in and `Idle`
    /// after the transcript entry is recorded and the gate is open again.
    ///
    /// The hook is intended for UI progress and must be fast. It is not called for skipped
    /// submissions.
    pub async fn submit_with_hook<F, Fut>(&self, on_state: F) -> SubmitOutcome
    where
        F: Fn(TurnState) -> Fut + Send + Sync,
        Fut: Future<Output = ()> + Send,
    {
        // An empty question must never touch the gate, or it could refuse a concurrent valid turn.
        let submittable = is_submittable(&self.lock_params().question);
        if !submittable {
            log::debug!("submit ignored: question is empty");
            return SubmitOutcome::Skipped(SkipReason::EmptyQuestion);
        }

        let Some(guard) = InFlightGuard::try_acquire(&self.in_flight) else {
            log::debug!("submit ignored: a turn is already in flight");
            return SubmitOutcome::Skipped(SkipReason::InFlight);
        };

        // Checked again under the gate: the question may have been cleared in between.
        let Some(request) = self.snapshot_if_submittable() else {
            log::debug!("submit ignored: question is empty");
            return SubmitOutcome::Skipped(SkipReason::EmptyQuestion);
        };

        on_state(TurnState::Submitting).await;
        log::info!(
            "chat turn dispatched: session={:?} question={:?}",
            request.session_id,
            preview_text(&request.user_question)
        );

        let t0 = Instant::now();
        let entry = match self.endpoint.send(&request).await {
            Ok(answer) => {
                log::info!(
                    "chat turn answered in {}ms ({} chars)",
                    t0.elapsed().as_millis(),
                    answer.chars().count()
                );
                TranscriptEntry::answered(request.user_question, answer)
            }
            Err(e) => {
                log::warn!("chat turn failed after {}ms: {e:#}", t0.elapsed().as_millis());
                TranscriptEntry::failed(request.user_question)
            }
        };

        self.transcript.append(entry.clone());
        if !(entry.is_failure() && self.policy.retain_question_on_failure) {
            self.lock_params().question.clear();
        }

        drop(guard);
        on_state(TurnState::Idle).await;

        SubmitOutcome::Completed(entry)
    }

    fn snapshot_if_submittable(&self) -> Option<ChatRequest> {
        let params = self.lock_params();
        is_submittable(&params.question).then(|| params.snapshot())
    }

    fn lock_params(&self) -> MutexGuard<'_, RequestParams> {
        self.params.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
