//! The upload controller.
//!
//! Owns one [`UploadState`] and exposes commands (`select_file`, `submit`,
//! `reset`) and queries (`state`, `is_uploading`, `subscribe`). The state
//! lock is only held for transitions; the network call runs without it.
//!
//! The in-flight request is tracked apart from the tagged state: selecting a
//! new file mid-request moves the state to `Selected`, but `submit` stays
//! rejected and `is_uploading` stays true until that request resolves.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use tokio::sync::watch;
use uuid::Uuid;

use crate::client::service::WatermarkService;
use crate::client::types::{ImageFile, SubmitMode, UploadRequest, UploadResult};
use crate::controller::preview::PreviewRegistry;
use crate::controller::state::{StateKind, UploadSession, UploadSnapshot, UploadState};
use crate::error::UploadError;
use crate::observability::metrics;
use crate::settings::store::{is_complete, SettingsStore};

/// Shown when a submission is attempted without complete settings.
pub const INCOMPLETE_SETTINGS_MESSAGE: &str =
    "Please select a chain and provide a wallet key in settings.";

#[derive(Debug, Default)]
struct Slot {
    state: UploadState,
    /// Session id of the request on the wire, if any.
    in_flight: Option<Uuid>,
}

impl Slot {
    fn snapshot(&self) -> UploadSnapshot {
        let mut snapshot = self.state.snapshot();
        snapshot.in_flight = self.in_flight.is_some();
        snapshot
    }
}

struct Inner<S, T> {
    mode: SubmitMode,
    settings: S,
    service: T,
    previews: PreviewRegistry,
    slot: Mutex<Slot>,
    updates: watch::Sender<UploadSnapshot>,
}

/// File-selection / upload / result state machine.
///
/// Cloning yields another handle to the same session.
pub struct UploadController<S, T> {
    inner: Arc<Inner<S, T>>,
}

impl<S, T> Clone for UploadController<S, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: SettingsStore, T: WatermarkService> UploadController<S, T> {
    pub fn new(mode: SubmitMode, settings: S, service: T) -> Self {
        let (updates, _) = watch::channel(UploadSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                mode,
                settings,
                service,
                previews: PreviewRegistry::new(),
                slot: Mutex::new(Slot::default()),
                updates,
            }),
        }
    }

    pub fn mode(&self) -> SubmitMode {
        self.inner.mode
    }

    pub fn settings(&self) -> &S {
        &self.inner.settings
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.inner.previews
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> UploadSnapshot {
        self.lock_slot().snapshot()
    }

    /// True from `submit` until its request resolves, even if a new file
    /// was selected in between.
    pub fn is_uploading(&self) -> bool {
        self.lock_slot().in_flight.is_some()
    }

    /// Receiver that observes every transition.
    pub fn subscribe(&self) -> watch::Receiver<UploadSnapshot> {
        self.inner.updates.subscribe()
    }

    /// Select a new file from any state.
    ///
    /// Clears any result or error, releases the previous preview and returns
    /// the new preview URI. An in-flight request's outcome will be ignored.
    pub fn select_file(&self, file: ImageFile) -> String {
        let mut slot = self.lock_slot();
        let previous = slot.state.kind();

        let preview = self.inner.previews.register(&file);
        let uri = preview.uri().to_string();
        tracing::debug!(
            mode = %self.inner.mode,
            file = %file.name,
            size = file.len(),
            previous = %previous,
            "File selected"
        );

        slot.state = UploadState::Selected {
            session: UploadSession {
                id: Uuid::new_v4(),
                file,
                preview,
            },
        };
        self.publish(&slot);
        uri
    }

    /// Submit the selected file.
    ///
    /// Valid from `Selected` and `Error` while no request is in flight.
    /// Guard failures (`NoFileSelected`, `AlreadyUploading`, `InvalidState`)
    /// leave the state unchanged; every other failure moves the session to
    /// `Error`.
    pub async fn submit(&self) -> Result<UploadResult, UploadError> {
        let (session_id, request) = self.begin_submit()?;

        let started = Instant::now();
        let outcome = self.inner.service.submit(request).await;

        let outcome_label = match &outcome {
            Ok(_) => "success",
            Err(e) => e.kind(),
        };
        metrics::record_submission(self.inner.mode, outcome_label, started);

        self.finish_submit(session_id, &outcome);
        outcome
    }

    /// Back to `Idle`, discarding file, preview and result.
    ///
    /// A request already in flight keeps `is_uploading` true until it
    /// resolves; its outcome is discarded.
    pub fn reset(&self) {
        let mut slot = self.lock_slot();
        slot.state = UploadState::Idle;
        self.publish(&slot);
        tracing::debug!(mode = %self.inner.mode, "Session reset");
    }

    fn begin_submit(&self) -> Result<(Uuid, UploadRequest), UploadError> {
        let mut slot = self.lock_slot();

        let guard = if slot.in_flight.is_some() {
            Some(UploadError::AlreadyUploading)
        } else {
            match slot.state.kind() {
                StateKind::Selected | StateKind::Error => None,
                StateKind::Idle => Some(UploadError::NoFileSelected),
                StateKind::Uploading => Some(UploadError::AlreadyUploading),
                kind @ StateKind::Success => Some(UploadError::InvalidState(kind)),
            }
        };
        if let Some(error) = guard {
            tracing::debug!(mode = %self.inner.mode, reason = error.kind(), "Submit rejected");
            metrics::record_rejected_submit(self.inner.mode, error.kind());
            return Err(error);
        }

        let file = match slot.state.session() {
            Some(session) => session.file.clone(),
            None => return Err(UploadError::NoFileSelected),
        };

        let request = match self.build_request(file) {
            Ok(request) => request,
            Err(error) => {
                tracing::warn!(mode = %self.inner.mode, error = %error, "Submission not started");
                metrics::record_rejected_submit(self.inner.mode, error.kind());
                if let Some(session) = slot.state.take_session() {
                    slot.state = UploadState::Error {
                        session,
                        error: error.clone(),
                    };
                }
                self.publish(&slot);
                return Err(error);
            }
        };

        let session = match slot.state.take_session() {
            Some(session) => session,
            None => return Err(UploadError::NoFileSelected),
        };
        let session_id = session.id;
        tracing::info!(
            mode = %self.inner.mode,
            file = %session.file.name,
            "Submitting"
        );
        slot.state = UploadState::Uploading { session };
        slot.in_flight = Some(session_id);
        self.publish(&slot);

        Ok((session_id, request))
    }

    fn build_request(&self, file: ImageFile) -> Result<UploadRequest, UploadError> {
        match self.inner.mode {
            SubmitMode::Decode => Ok(UploadRequest::Decode { file }),
            SubmitMode::Embed => {
                let settings = self.inner.settings.load();
                match settings.chain {
                    Some(chain) if is_complete(&settings) => Ok(UploadRequest::Embed {
                        file,
                        chain,
                        wallet_key: settings.wallet_key,
                    }),
                    _ => Err(UploadError::Validation(INCOMPLETE_SETTINGS_MESSAGE.to_string())),
                }
            }
        }
    }

    fn finish_submit(&self, session_id: Uuid, outcome: &Result<UploadResult, UploadError>) {
        let mut slot = self.lock_slot();
        if slot.in_flight == Some(session_id) {
            slot.in_flight = None;
        }

        let current = matches!(&slot.state, UploadState::Uploading { session } if session.id == session_id);
        if !current {
            tracing::debug!(
                mode = %self.inner.mode,
                state = %slot.state.kind(),
                "Discarding outcome of superseded submission"
            );
            self.publish(&slot);
            return;
        }

        let Some(session) = slot.state.take_session() else {
            self.publish(&slot);
            return;
        };
        slot.state = match outcome {
            Ok(result) => {
                tracing::info!(
                    mode = %self.inner.mode,
                    file = %session.file.name,
                    chain = ?result.chain,
                    tx_hash = ?result.transaction_hash,
                    "Submission succeeded"
                );
                UploadState::Success {
                    session,
                    result: result.clone(),
                }
            }
            Err(error) => {
                tracing::warn!(
                    mode = %self.inner.mode,
                    file = %session.file.name,
                    kind = error.kind(),
                    error = %error,
                    "Submission failed"
                );
                UploadState::Error {
                    session,
                    error: error.clone(),
                }
            }
        };
        self.publish(&slot);
    }

    fn publish(&self, slot: &Slot) {
        self.inner.updates.send_replace(slot.snapshot());
    }

    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        self.inner
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use bytes::Bytes;
    use tokio::sync::Notify;

    use crate::blockchain::Chain;
    use crate::client::types::Artifact;
    use crate::settings::{ChainSettings, InMemorySettingsStore};

    /// Replays canned outcomes; optionally parks each call until released.
    #[derive(Default)]
    struct ScriptedService {
        calls: AtomicUsize,
        requests: Mutex<Vec<UploadRequest>>,
        responses: Mutex<VecDeque<Result<UploadResult, UploadError>>>,
        gated: bool,
        entered: Notify,
        release: Notify,
    }

    impl ScriptedService {
        fn with(responses: Vec<Result<UploadResult, UploadError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                ..Default::default()
            })
        }

        fn gated(responses: Vec<Result<UploadResult, UploadError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                gated: true,
                ..Default::default()
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl WatermarkService for ScriptedService {
        async fn submit(&self, request: UploadRequest) -> Result<UploadResult, UploadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request);
            if self.gated {
                self.entered.notify_one();
                self.release.notified().await;
            }
            let next = self.responses.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Ok(UploadResult::default()))
        }
    }

    type TestController = UploadController<Arc<InMemorySettingsStore>, Arc<ScriptedService>>;

    fn complete_settings() -> Arc<InMemorySettingsStore> {
        Arc::new(InMemorySettingsStore::with_settings(ChainSettings::new(
            Chain::Eth,
            "wallet-key",
        )))
    }

    fn embed_controller(service: Arc<ScriptedService>) -> TestController {
        UploadController::new(SubmitMode::Embed, complete_settings(), service)
    }

    fn image(name: &str) -> ImageFile {
        ImageFile::new(name, vec![0x89, b'P', b'N', b'G'])
    }

    fn embed_result() -> UploadResult {
        UploadResult {
            embedded: Some(Artifact {
                bytes: Bytes::from_static(b"A"),
                mime_type: "image/png".into(),
            }),
            extracted: Some(Artifact {
                bytes: Bytes::from_static(b"B"),
                mime_type: "image/png".into(),
            }),
            transaction_hash: Some("0xfeed".into()),
            image_hash: Some("abc".into()),
            decoded_link: None,
            chain: Some(Chain::Eth),
        }
    }

    #[test]
    fn test_starts_idle() {
        let controller = embed_controller(ScriptedService::with(vec![]));
        let state = controller.state();
        assert_eq!(state.status, StateKind::Idle);
        assert!(state.file_name.is_none());
        assert!(!controller.is_uploading());
    }

    #[test]
    fn test_select_file_moves_to_selected() {
        let controller = embed_controller(ScriptedService::with(vec![]));
        let uri = controller.select_file(image("cat.png"));

        let state = controller.state();
        assert_eq!(state.status, StateKind::Selected);
        assert_eq!(state.file_name.as_deref(), Some("cat.png"));
        assert_eq!(state.preview_uri.as_deref(), Some(uri.as_str()));
        assert!(controller.previews().resolve(&uri).is_some());
    }

    #[tokio::test]
    async fn test_submit_without_file() {
        let service = ScriptedService::with(vec![]);
        let controller = embed_controller(service.clone());

        assert_eq!(controller.submit().await, Err(UploadError::NoFileSelected));
        assert_eq!(controller.state().status, StateKind::Idle);
        assert_eq!(service.calls(), 0);
    }

    #[tokio::test]
    async fn test_incomplete_settings_fail_before_network() {
        let service = ScriptedService::with(vec![Ok(embed_result())]);
        let settings = Arc::new(InMemorySettingsStore::new());
        let controller = UploadController::new(SubmitMode::Embed, settings.clone(), service.clone());
        controller.select_file(image("cat.png"));

        let err = controller.submit().await.unwrap_err();
        assert!(matches!(err, UploadError::Validation(_)));
        assert_eq!(err.to_string(), INCOMPLETE_SETTINGS_MESSAGE);
        assert_eq!(service.calls(), 0);

        let state = controller.state();
        assert_eq!(state.status, StateKind::Error);
        assert_eq!(state.error_message().as_deref(), Some(INCOMPLETE_SETTINGS_MESSAGE));
        assert_eq!(state.file_name.as_deref(), Some("cat.png"));

        // Key without a chain is still incomplete.
        settings
            .save(&ChainSettings {
                chain: None,
                wallet_key: "key".into(),
            })
            .unwrap();
        assert!(matches!(controller.submit().await, Err(UploadError::Validation(_))));
        assert_eq!(service.calls(), 0);

        // Retry from Error with the same file once settings are complete.
        settings.save(&ChainSettings::new(Chain::Eth, "key")).unwrap();
        let result = controller.submit().await.unwrap();
        assert_eq!(result, embed_result());
        assert_eq!(service.calls(), 1);
        assert_eq!(controller.state().status, StateKind::Success);
    }

    #[tokio::test]
    async fn test_embed_request_carries_settings() {
        let service = ScriptedService::with(vec![Ok(embed_result())]);
        let settings = Arc::new(InMemorySettingsStore::with_settings(ChainSettings::new(
            Chain::Sol,
            "sol-secret",
        )));
        let controller = UploadController::new(SubmitMode::Embed, settings, service.clone());
        controller.select_file(image("cat.png"));
        controller.submit().await.unwrap();

        let requests = service.requests.lock().unwrap();
        match &requests[0] {
            UploadRequest::Embed { file, chain, wallet_key } => {
                assert_eq!(file.name, "cat.png");
                assert_eq!(*chain, Chain::Sol);
                assert_eq!(wallet_key.expose(), "sol-secret");
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_success_populates_result() {
        let controller = embed_controller(ScriptedService::with(vec![Ok(embed_result())]));
        controller.select_file(image("cat.png"));
        controller.submit().await.unwrap();

        let state = controller.state();
        assert_eq!(state.status, StateKind::Success);
        assert_eq!(state.result, Some(embed_result()));
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_select_file_clears_previous_result() {
        let controller = embed_controller(ScriptedService::with(vec![Ok(embed_result())]));
        controller.select_file(image("first.png"));
        controller.submit().await.unwrap();

        controller.select_file(image("second.png"));
        let state = controller.state();
        assert_eq!(state.status, StateKind::Selected);
        assert!(state.result.is_none());
        assert!(state.error.is_none());
        assert_eq!(state.file_name.as_deref(), Some("second.png"));
    }

    #[tokio::test]
    async fn test_select_file_clears_previous_error() {
        let service = ScriptedService::with(vec![Err(UploadError::Network("connection refused".into()))]);
        let controller = embed_controller(service);
        controller.select_file(image("first.png"));
        assert!(controller.submit().await.is_err());
        assert_eq!(controller.state().status, StateKind::Error);

        controller.select_file(image("second.png"));
        let state = controller.state();
        assert_eq!(state.status, StateKind::Selected);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_previews_released_on_reselect_and_reset() {
        let controller = embed_controller(ScriptedService::with(vec![]));
        let first = controller.select_file(image("a.png"));
        for name in ["b.png", "c.png", "d.png"] {
            controller.select_file(image(name));
        }
        assert_eq!(controller.previews().live_count(), 1);
        assert!(controller.previews().resolve(&first).is_none());

        controller.reset();
        assert_eq!(controller.previews().live_count(), 0);
        assert_eq!(controller.state().status, StateKind::Idle);
    }

    #[tokio::test]
    async fn test_submit_from_success_is_rejected() {
        let service = ScriptedService::with(vec![Ok(embed_result())]);
        let controller = embed_controller(service.clone());
        controller.select_file(image("cat.png"));
        controller.submit().await.unwrap();

        assert_eq!(
            controller.submit().await,
            Err(UploadError::InvalidState(StateKind::Success))
        );
        assert_eq!(controller.state().status, StateKind::Success);
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn test_errors_are_retryable() {
        let service = ScriptedService::with(vec![
            Err(UploadError::Server {
                status: 500,
                detail: Some("boom".into()),
            }),
            Ok(embed_result()),
        ]);
        let controller = embed_controller(service.clone());
        controller.select_file(image("cat.png"));

        let err = controller.submit().await.unwrap_err();
        assert_eq!(err.to_string(), "Server error (500): boom");
        assert_eq!(controller.state().status, StateKind::Error);
        assert!(!controller.is_uploading());

        controller.submit().await.unwrap();
        assert_eq!(controller.state().status, StateKind::Success);
        assert_eq!(service.calls(), 2);
    }

    #[tokio::test]
    async fn test_uploading_flag_spans_request_and_blocks_second_submit() {
        let service = ScriptedService::gated(vec![Ok(embed_result())]);
        let controller = embed_controller(service.clone());
        controller.select_file(image("cat.png"));
        assert!(!controller.is_uploading());

        let task = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit().await })
        };
        service.entered.notified().await;

        assert!(controller.is_uploading());
        assert!(controller.state().is_uploading());
        assert_eq!(controller.submit().await, Err(UploadError::AlreadyUploading));
        assert!(controller.is_uploading());

        service.release.notify_one();
        task.await.unwrap().unwrap();

        assert!(!controller.is_uploading());
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn test_uploading_flag_cleared_on_error() {
        let service = ScriptedService::gated(vec![Err(UploadError::Decode("missing field".into()))]);
        let controller = embed_controller(service.clone());
        controller.select_file(image("cat.png"));

        let task = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit().await })
        };
        service.entered.notified().await;
        assert!(controller.is_uploading());

        service.release.notify_one();
        assert!(matches!(task.await.unwrap(), Err(UploadError::Decode(_))));
        assert!(!controller.is_uploading());
        assert_eq!(controller.state().status, StateKind::Error);
    }

    #[tokio::test]
    async fn test_new_selection_discards_in_flight_outcome() {
        let service = ScriptedService::gated(vec![Ok(embed_result())]);
        let controller = embed_controller(service.clone());
        controller.select_file(image("first.png"));

        let task = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit().await })
        };
        service.entered.notified().await;

        controller.select_file(image("second.png"));
        service.release.notify_one();
        task.await.unwrap().unwrap();

        let state = controller.state();
        assert_eq!(state.status, StateKind::Selected);
        assert_eq!(state.file_name.as_deref(), Some("second.png"));
        assert!(state.result.is_none());
        assert!(!state.in_flight);
    }

    #[tokio::test]
    async fn test_reselect_keeps_request_in_flight_until_it_resolves() {
        let service = ScriptedService::gated(vec![Ok(embed_result()), Ok(embed_result())]);
        let controller = embed_controller(service.clone());
        controller.select_file(image("a.png"));

        let task = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit().await })
        };
        service.entered.notified().await;

        controller.select_file(image("b.png"));
        let state = controller.state();
        assert_eq!(state.status, StateKind::Selected);
        assert!(state.is_uploading());
        assert!(controller.is_uploading());
        assert_eq!(controller.submit().await, Err(UploadError::AlreadyUploading));
        assert_eq!(service.calls(), 1);

        controller.reset();
        assert!(controller.is_uploading());

        service.release.notify_one();
        task.await.unwrap().unwrap();
        assert!(!controller.is_uploading());
        assert!(!controller.state().is_uploading());
        assert_eq!(controller.state().status, StateKind::Idle);

        controller.select_file(image("b.png"));
        let second = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit().await })
        };
        service.entered.notified().await;
        service.release.notify_one();
        second.await.unwrap().unwrap();
        assert_eq!(service.calls(), 2);
        assert_eq!(controller.state().status, StateKind::Success);
    }

    #[tokio::test]
    async fn test_decode_mode_ignores_settings() {
        let service = ScriptedService::with(vec![Ok(UploadResult {
            decoded_link: Some("https://example.com/proof".into()),
            ..UploadResult::default()
        })]);
        let controller = UploadController::new(
            SubmitMode::Decode,
            Arc::new(InMemorySettingsStore::new()),
            service.clone(),
        );
        controller.select_file(image("marked.png"));

        let result = controller.submit().await.unwrap();
        assert_eq!(result.decoded_link.as_deref(), Some("https://example.com/proof"));
        assert!(matches!(
            service.requests.lock().unwrap()[0],
            UploadRequest::Decode { .. }
        ));
    }

    #[tokio::test]
    async fn test_subscribers_see_transitions() {
        let service = ScriptedService::gated(vec![Ok(embed_result())]);
        let controller = embed_controller(service.clone());
        let mut updates = controller.subscribe();

        controller.select_file(image("cat.png"));
        assert_eq!(updates.borrow_and_update().status, StateKind::Selected);

        let task = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit().await })
        };
        service.entered.notified().await;
        assert_eq!(updates.borrow_and_update().status, StateKind::Uploading);

        service.release.notify_one();
        task.await.unwrap().unwrap();
        updates.changed().await.unwrap();
        let snapshot = updates.borrow_and_update().clone();
        assert_eq!(snapshot.status, StateKind::Success);
        assert_eq!(snapshot.result, Some(embed_result()));
    }
}
