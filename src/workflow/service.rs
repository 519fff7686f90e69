//! Fund-request actions and the per-view request board.
//!
//! [`FundRequestService`] asks the gate before every mutating call, so a
//! denied action never reaches the network. [`RequestBoard`] is the state
//! behind one list view: the records, the last notice, and a cancellation
//! token that stops in-flight loads from touching a torn-down view.

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::gate::{DenialReason, FundStatus, Gate, GateDecision, Transition};
use crate::api::models::{ApprovalAction, FundRequest, NewFundRequest, ValidationError};
use crate::api::{ApiClient, ClientError};
use crate::auth::Capability;

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Not permitted: {0}")]
    Denied(DenialReason),

    #[error("Invalid input: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Fund request {0} is not in the current list")]
    UnknownRecord(i64),

    #[error("The view has been closed")]
    Closed,

    #[error("Request failed: {0}")]
    Remote(#[from] ClientError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Error,
}

/// Message for the user, scoped to one view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Gated fund-request operations for the current session
#[derive(Debug, Clone)]
pub struct FundRequestService {
    api: ApiClient,
}

impl FundRequestService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn capability(&self) -> Capability {
        Capability::for_session(&self.api.session().current_session())
    }

    fn ensure_allowed(
        &self,
        current: Option<FundStatus>,
        transition: Transition,
    ) -> Result<(), ActionError> {
        match Gate::check(current, self.capability(), transition) {
            GateDecision::Allowed => Ok(()),
            GateDecision::Denied(reason) => {
                debug!(transition = %transition, reason = %reason, "Gate denied action");
                Err(ActionError::Denied(reason))
            }
        }
    }

    /// Create a new request as the logged-in Maker.
    ///
    /// `dibuat_oleh` defaults to the session's user id.
    pub async fn submit(&self, mut req: NewFundRequest) -> Result<FundRequest, ActionError> {
        self.ensure_allowed(None, Transition::Submit)?;

        if req.dibuat_oleh.is_none() {
            req.dibuat_oleh = self.api.session().current_session().user_id();
        }

        let created = self.api.create_fund_request(&req).await?;
        info!(id = created.id, jumlah = created.jumlah, "Fund request submitted");
        Ok(created)
    }

    /// Move an existing record along the workflow
    pub async fn apply(
        &self,
        record: &FundRequest,
        transition: Transition,
    ) -> Result<(), ActionError> {
        self.ensure_allowed(Some(record.status), transition)?;

        match transition {
            Transition::Submit => {
                return Err(ActionError::Denied(DenialReason::WrongState {
                    current: Some(record.status),
                    expected: None,
                }))
            }
            Transition::SendToApproval => self.api.send_to_approval(record.id).await?,
            Transition::Approve => self.api.decide(record.id, ApprovalAction::Approved).await?,
            Transition::Reject => self.api.decide(record.id, ApprovalAction::Rejected).await?,
            Transition::MarkDone => self.api.mark_done(record.id).await?,
        }

        info!(
            id = record.id,
            from = %record.status,
            to = %transition.target(),
            "Fund request transition accepted"
        );
        Ok(())
    }

    /// Records the caller's view shows.
    ///
    /// Each capability sees the queue it acts on; Guest and Unknown see
    /// nothing and no request is made.
    pub async fn list_for(&self, capability: Capability) -> Result<Vec<FundRequest>, ClientError> {
        match capability {
            Capability::Admin => self.api.list_fund_requests().await,
            Capability::Maker => {
                let all = self.api.list_fund_requests().await?;
                match self.api.session().current_session().user_id() {
                    Some(uid) => Ok(all
                        .into_iter()
                        .filter(|r| r.created_by == Some(uid))
                        .collect()),
                    None => Ok(all),
                }
            }
            Capability::Checker => {
                self.api
                    .list_fund_requests_by_status(FundStatus::Submitted)
                    .await
            }
            Capability::Approver => {
                self.api
                    .list_fund_requests_by_status(FundStatus::Checking)
                    .await
            }
            Capability::Guest | Capability::Unknown => Ok(Vec::new()),
        }
    }
}

/// Text shown when a view's list is empty
pub fn empty_message(capability: Capability) -> &'static str {
    match capability {
        Capability::Checker => "No fund requests waiting to be checked.",
        Capability::Approver => "No fund requests waiting for approval.",
        Capability::Admin | Capability::Maker => "No fund requests yet.",
        Capability::Guest | Capability::Unknown => "No data available.",
    }
}

/// State behind one fund-request list view
#[derive(Debug)]
pub struct RequestBoard {
    service: FundRequestService,
    items: Vec<FundRequest>,
    notice: Option<Notice>,
    cancel: CancellationToken,
}

impl RequestBoard {
    pub fn new(service: FundRequestService) -> Self {
        Self {
            service,
            items: Vec::new(),
            notice: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn items(&self) -> &[FundRequest] {
        &self.items
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn capability(&self) -> Capability {
        self.service.capability()
    }

    /// Token that tears the view down; cancel it from anywhere
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn teardown(&self) {
        self.cancel.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Buttons to enable for a record
    pub fn actions_for(&self, record: &FundRequest) -> Vec<Transition> {
        Gate::available(record.status, self.capability())
    }

    /// Reload the list.
    ///
    /// A failed fetch empties the list and leaves a notice; nothing is
    /// retried. If the view is torn down while the request is in flight the
    /// result is dropped and the board is left as it was.
    pub async fn refresh(&mut self) {
        if self.cancel.is_cancelled() {
            return;
        }

        let capability = self.capability();
        let result = tokio::select! {
            _ = self.cancel.cancelled() => {
                debug!("Board torn down during refresh, dropping result");
                return;
            }
            result = self.service.list_for(capability) => result,
        };

        match result {
            Ok(items) => {
                self.notice = if items.is_empty() {
                    Some(Notice::info(empty_message(capability)))
                } else {
                    None
                };
                self.items = items;
            }
            Err(e) => {
                warn!(error = %e, capability = %capability, "Failed to load fund requests");
                self.items.clear();
                self.notice = Some(Notice::error(format!(
                    "{} ({})",
                    empty_message(capability),
                    e
                )));
            }
        }
    }

    /// Run a transition on a listed record and refresh on success.
    ///
    /// On failure the list is left untouched and an error notice is set. A
    /// torn-down board issues no call; a call that completes after teardown
    /// leaves the board as it was.
    pub async fn act(&mut self, id: i64, transition: Transition) -> Result<(), ActionError> {
        if self.is_torn_down() {
            return Err(ActionError::Closed);
        }

        let record = self
            .items
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(ActionError::UnknownRecord(id))?;

        let result = self.service.apply(&record, transition).await;
        if self.is_torn_down() {
            debug!(id = id, transition = %transition, "Board torn down during action");
            return result;
        }

        match result {
            Ok(()) => {
                self.notice = Some(Notice::success(format!(
                    "\"{}\" is now {}",
                    record.judul,
                    transition.target()
                )));
                let notice = self.notice.clone();
                self.refresh().await;
                // Keep the success message unless the refresh itself failed.
                if !matches!(self.notice, Some(Notice { kind: NoticeKind::Error, .. })) {
                    self.notice = notice;
                }
                Ok(())
            }
            Err(e) => {
                warn!(id = id, transition = %transition, error = %e, "Fund request action failed");
                self.notice = Some(Notice::error(e.to_string()));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SessionStore, User};
    use crate::test_support::{client_for, spawn_stub};
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::routing::{get, patch, post};
    use axum::{Json, Router};
    use parking_lot::Mutex;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Minimal backend that keeps records in memory and counts calls
    #[derive(Clone, Default)]
    struct Backend {
        records: Arc<Mutex<Vec<FundRequest>>>,
        calls: Arc<AtomicUsize>,
        fail_mutations: Arc<std::sync::atomic::AtomicBool>,
    }

    impl Backend {
        fn seed(&self, id: i64, status: FundStatus, created_by: Option<i64>) {
            self.records.lock().push(FundRequest {
                id,
                judul: format!("Request {}", id),
                deskripsi: None,
                divisi: "Acara".into(),
                jumlah: 100_000,
                status,
                created_by,
                created_at: None,
            });
        }

        fn set_status(&self, id: i64, status: FundStatus) -> StatusCode {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_mutations.load(Ordering::SeqCst) {
                return StatusCode::INTERNAL_SERVER_ERROR;
            }
            let mut records = self.records.lock();
            match records.iter_mut().find(|r| r.id == id) {
                Some(r) => {
                    r.status = status;
                    StatusCode::OK
                }
                None => StatusCode::NOT_FOUND,
            }
        }

        fn router(&self) -> Router {
            async fn decide(
                State(b): State<Backend>,
                Path(id): Path<i64>,
                Json(body): Json<Value>,
            ) -> StatusCode {
                let status = if body["action"] == "approved" {
                    FundStatus::Approved
                } else {
                    FundStatus::Rejected
                };
                b.set_status(id, status)
            }

            Router::new()
                .route(
                    "/api/pengajuan/all",
                    get(|State(b): State<Backend>| async move {
                        Json(b.records.lock().clone())
                    }),
                )
                .route(
                    "/api/pengajuan/status/:status",
                    get(|State(b): State<Backend>, Path(status): Path<String>| async move {
                        let status: FundStatus = status.parse().unwrap();
                        let items: Vec<FundRequest> = b
                            .records
                            .lock()
                            .iter()
                            .filter(|r| r.status == status)
                            .cloned()
                            .collect();
                        Json(items)
                    }),
                )
                .route(
                    "/api/pengajuan",
                    post(|State(b): State<Backend>, Json(body): Json<Value>| async move {
                        b.calls.fetch_add(1, Ordering::SeqCst);
                        let mut records = b.records.lock();
                        let record = FundRequest {
                            id: records.len() as i64 + 100,
                            judul: body["judul"].as_str().unwrap_or_default().to_string(),
                            deskripsi: body["deskripsi"].as_str().map(str::to_string),
                            divisi: body["divisi"].as_str().unwrap_or_default().to_string(),
                            jumlah: body["jumlah"].as_u64().unwrap(),
                            status: FundStatus::Submitted,
                            created_by: body["dibuat_oleh"].as_i64(),
                            created_at: None,
                        };
                        records.push(record.clone());
                        Json(record)
                    }),
                )
                .route(
                    "/api/pengajuan/send/:id",
                    patch(|State(b): State<Backend>, Path(id): Path<i64>| async move {
                        b.set_status(id, FundStatus::Checking)
                    }),
                )
                .route("/api/pengajuan/approve/:id", patch(decide))
                .route(
                    "/api/pengajuan/done/:id",
                    patch(|State(b): State<Backend>, Path(id): Path<i64>| async move {
                        b.set_status(id, FundStatus::Done)
                    }),
                )
                .with_state(self.clone())
        }
    }

    async fn service_as(backend: &Backend, role: &str, user_id: Option<i64>) -> FundRequestService {
        let base = spawn_stub(backend.router()).await;
        let session = SessionStore::in_memory();
        let user = user_id.map(|id| User {
            id,
            username: format!("user{}", id),
            display_name: None,
        });
        session.login("tok", role, user).unwrap();
        FundRequestService::new(client_for(&base, session))
    }

    #[tokio::test]
    async fn test_maker_submits_integer_amount() {
        let backend = Backend::default();
        let service = service_as(&backend, "ketua divisi", Some(7)).await;
        assert_eq!(service.capability(), Capability::Maker);

        let req =
            NewFundRequest::from_form("Panggung", "Rigging", "Acara", "5000000", None).unwrap();
        let created = service.submit(req).await.unwrap();

        assert_eq!(created.status, FundStatus::Submitted);
        assert_eq!(created.jumlah, 5_000_000);
        assert_eq!(created.created_by, Some(7));
    }

    #[tokio::test]
    async fn test_non_maker_submit_denied_without_network() {
        let backend = Backend::default();
        let service = service_as(&backend, "bendahara", None).await;

        let req = NewFundRequest::from_form("Panggung", "", "Acara", "1", None).unwrap();
        let err = service.submit(req).await.unwrap_err();

        assert!(matches!(
            err,
            ActionError::Denied(DenialReason::MissingCapability { .. })
        ));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_checker_approving_submitted_is_denied_before_network() {
        let backend = Backend::default();
        backend.seed(1, FundStatus::Submitted, None);
        let service = service_as(&backend, "wakil", None).await;

        let record = backend.records.lock()[0].clone();
        let err = service.apply(&record, Transition::Approve).await.unwrap_err();

        assert!(matches!(err, ActionError::Denied(_)));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert_eq!(backend.records.lock()[0].status, FundStatus::Submitted);
    }

    #[tokio::test]
    async fn test_checker_board_sends_and_refreshes() {
        let backend = Backend::default();
        backend.seed(1, FundStatus::Submitted, None);
        backend.seed(2, FundStatus::Submitted, None);
        backend.seed(3, FundStatus::Checking, None);
        let mut board = RequestBoard::new(service_as(&backend, "checker", None).await);

        board.refresh().await;
        assert_eq!(board.items().len(), 2);
        assert_eq!(board.actions_for(&board.items()[0]), vec![Transition::SendToApproval]);

        board.act(1, Transition::SendToApproval).await.unwrap();

        assert_eq!(board.items().len(), 1);
        assert_eq!(board.items()[0].id, 2);
        assert_eq!(board.notice().unwrap().kind, NoticeKind::Success);
    }

    #[tokio::test]
    async fn test_approver_rejects_checked_request() {
        let backend = Backend::default();
        backend.seed(3, FundStatus::Checking, None);
        let mut board = RequestBoard::new(service_as(&backend, "pengurus rw", None).await);

        board.refresh().await;
        board.act(3, Transition::Reject).await.unwrap();

        assert!(board.items().is_empty());
        assert_eq!(backend.records.lock()[0].status, FundStatus::Rejected);
    }

    #[tokio::test]
    async fn test_admin_marks_done_and_cannot_touch_checking() {
        let backend = Backend::default();
        backend.seed(4, FundStatus::Approved, None);
        backend.seed(5, FundStatus::Checking, None);
        let mut board = RequestBoard::new(service_as(&backend, "admin", None).await);

        board.refresh().await;
        assert_eq!(board.items().len(), 2);

        assert!(matches!(
            board.act(5, Transition::Approve).await,
            Err(ActionError::Denied(_))
        ));
        board.act(4, Transition::MarkDone).await.unwrap();

        let done = board.items().iter().find(|r| r.id == 4).unwrap();
        assert_eq!(done.status, FundStatus::Done);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_list_unchanged() {
        let backend = Backend::default();
        backend.seed(1, FundStatus::Submitted, None);
        let mut board = RequestBoard::new(service_as(&backend, "checker", None).await);
        board.refresh().await;
        let before = board.items().to_vec();

        backend.fail_mutations.store(true, Ordering::SeqCst);
        let err = board.act(1, Transition::SendToApproval).await.unwrap_err();

        assert!(matches!(err, ActionError::Remote(_)));
        assert_eq!(board.items(), before.as_slice());
        assert_eq!(board.notice().unwrap().kind, NoticeKind::Error);
    }

    #[tokio::test]
    async fn test_unknown_record() {
        let backend = Backend::default();
        let mut board = RequestBoard::new(service_as(&backend, "checker", None).await);
        board.refresh().await;
        assert!(matches!(
            board.act(42, Transition::SendToApproval).await,
            Err(ActionError::UnknownRecord(42))
        ));
    }

    #[tokio::test]
    async fn test_maker_sees_own_requests() {
        let backend = Backend::default();
        backend.seed(1, FundStatus::Submitted, Some(7));
        backend.seed(2, FundStatus::Approved, Some(8));
        let mut board = RequestBoard::new(service_as(&backend, "maker", Some(7)).await);

        board.refresh().await;
        assert_eq!(board.items().len(), 1);
        assert_eq!(board.items()[0].id, 1);
        assert!(board.actions_for(&board.items()[0]).is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_falls_back_to_empty() {
        let session = SessionStore::in_memory();
        session.login("tok", "admin", None).unwrap();
        let service = FundRequestService::new(client_for("http://127.0.0.1:9/api", session));
        let mut board = RequestBoard::new(service);

        board.refresh().await;

        assert!(board.items().is_empty());
        let notice = board.notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.message.starts_with("No fund requests yet."));
    }

    #[tokio::test]
    async fn test_empty_list_notice() {
        let backend = Backend::default();
        let mut board = RequestBoard::new(service_as(&backend, "approver", None).await);
        board.refresh().await;
        assert_eq!(
            board.notice(),
            Some(&Notice::info("No fund requests waiting for approval."))
        );
    }

    #[tokio::test]
    async fn test_torn_down_board_ignores_refresh() {
        let backend = Backend::default();
        backend.seed(1, FundStatus::Submitted, None);
        let mut board = RequestBoard::new(service_as(&backend, "checker", None).await);

        board.teardown();
        board.refresh().await;

        assert!(board.is_torn_down());
        assert!(board.items().is_empty());
        assert!(board.notice().is_none());
    }

    #[tokio::test]
    async fn test_torn_down_board_makes_no_calls() {
        let backend = Backend::default();
        backend.seed(1, FundStatus::Submitted, None);
        let mut board = RequestBoard::new(service_as(&backend, "checker", None).await);
        board.refresh().await;
        let before = board.items().to_vec();

        board.teardown();
        let err = board.act(1, Transition::SendToApproval).await.unwrap_err();

        assert!(matches!(err, ActionError::Closed));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert_eq!(backend.records.lock()[0].status, FundStatus::Submitted);
        assert_eq!(board.items(), before.as_slice());
        assert!(board.notice().is_none());
    }

    #[tokio::test]
    async fn test_guest_board_makes_no_requests() {
        let service = FundRequestService::new(client_for(
            "http://127.0.0.1:9/api",
            SessionStore::in_memory(),
        ));
        let mut board = RequestBoard::new(service);
        board.refresh().await;
        assert_eq!(board.capability(), Capability::Guest);
        assert_eq!(board.notice(), Some(&Notice::info("No data available.")));
    }
}
