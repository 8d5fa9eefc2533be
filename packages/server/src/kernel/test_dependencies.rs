// TestDependencies - in-memory implementations for testing
//
// Provides an in-memory store and a mock PDF renderer that can be injected
// into ServerDeps for tests, mirroring how PgStore wires the production
// backend. Scripted failures let tests exercise race and fan-out edges.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use crate::common::auth::Role;
use crate::common::{
    CoreError, FormatId, NotificationId, Principal, SubmissionId, UserId, ValidationId,
};
use crate::domains::documents::renderer::PageConfig;
use crate::domains::formats::models::format::{Format, FormatChanges, FormatStatus, NewFormat};
use crate::domains::notifications::models::notification::{Notification, NotificationStats};
use crate::domains::submissions::models::submission::{Submission, SubmissionStatus};
use crate::domains::submissions::models::validation::Validation;
use crate::kernel::{
    BaseFormatStore, BaseNotificationStore, BasePdfRenderer, BasePrincipalDirectory,
    BaseSubmissionStore, BaseValidationStore, ServerDeps,
};

// =============================================================================
// In-memory store (implements every storage trait, like PgStore)
// =============================================================================

#[derive(Default)]
struct MemState {
    formats: Vec<Format>,
    submissions: Vec<Submission>,
    validations: Vec<Validation>,
    notifications: Vec<Notification>,
    users: Vec<Principal>,
}

pub struct MemStore {
    state: Mutex<MemState>,
    next_id: AtomicI64,
    fail_next_transition: AtomicBool,
    failing_recipients: Mutex<HashSet<i64>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemState::default()),
            next_id: AtomicI64::new(1),
            fail_next_transition: AtomicBool::new(false),
            failing_recipients: Mutex::new(HashSet::new()),
        }
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Register a user with the directory and return their principal.
    pub fn user(&self, name: &str, role: Role) -> Principal {
        let id = UserId::from_i64(self.next_id());
        let principal = Principal::new(
            id,
            name,
            format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            role,
        );
        self.state.lock().unwrap().users.push(principal.clone());
        principal
    }

    /// Script the next `transition_status` call to lose its compare-and-set,
    /// as if a concurrent decision committed first.
    pub fn fail_next_transition(&self) {
        self.fail_next_transition.store(true, Ordering::SeqCst);
    }

    /// Script every `insert` for this recipient to fail with a storage error.
    pub fn fail_notify_for(&self, recipient: UserId) {
        self.failing_recipients
            .lock()
            .unwrap()
            .insert(recipient.into_i64());
    }

    /// Insert a notification with a chosen read flag and `updated_at`,
    /// bypassing the trait (for retention tests).
    pub fn insert_backdated_notification(
        &self,
        recipient_id: UserId,
        message: &str,
        read: bool,
        updated_at: DateTime<Utc>,
    ) -> Notification {
        let notification = Notification {
            id: NotificationId::from_i64(self.next_id()),
            recipient_id,
            message: message.to_string(),
            read,
            created_at: updated_at,
            updated_at,
        };
        self.state
            .lock()
            .unwrap()
            .notifications
            .push(notification.clone());
        notification
    }

    /// Every stored notification, insertion order (for assertions).
    pub fn all_notifications(&self) -> Vec<Notification> {
        self.state.lock().unwrap().notifications.clone()
    }

    /// Every stored validation for a submission, insertion order.
    pub fn validations_for(&self, submission_id: SubmissionId) -> Vec<Validation> {
        self.state
            .lock()
            .unwrap()
            .validations
            .iter()
            .filter(|v| v.submission_id == submission_id)
            .cloned()
            .collect()
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseFormatStore for MemStore {
    async fn insert(&self, new: &NewFormat) -> Result<Format, CoreError> {
        let now = Utc::now();
        let format = Format {
            id: FormatId::from_i64(self.next_id()),
            title: new.title.clone(),
            body_template: new.body_template.clone(),
            variable_defs: new.variable_defs.clone(),
            status: FormatStatus::Active,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().unwrap().formats.push(format.clone());
        Ok(format)
    }

    async fn find_by_id(&self, id: FormatId) -> Result<Option<Format>, CoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .formats
            .iter()
            .find(|f| f.id == id)
            .cloned())
    }

    async fn find_active(&self) -> Result<Vec<Format>, CoreError> {
        let mut active: Vec<Format> = self
            .state
            .lock()
            .unwrap()
            .formats
            .iter()
            .filter(|f| f.status == FormatStatus::Active)
            .cloned()
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(active)
    }

    async fn update(
        &self,
        id: FormatId,
        changes: &FormatChanges,
    ) -> Result<Option<Format>, CoreError> {
        let mut state = self.state.lock().unwrap();
        let Some(format) = state.formats.iter_mut().find(|f| f.id == id) else {
            return Ok(None);
        };
        if let Some(title) = &changes.title {
            format.title = title.clone();
        }
        if let Some(body) = &changes.body_template {
            format.body_template = body.clone();
        }
        if let Some(defs) = &changes.variable_defs {
            format.variable_defs = defs.clone();
        }
        format.updated_at = Utc::now();
        Ok(Some(format.clone()))
    }

    async fn set_status(
        &self,
        id: FormatId,
        status: FormatStatus,
    ) -> Result<Option<Format>, CoreError> {
        let mut state = self.state.lock().unwrap();
        let Some(format) = state.formats.iter_mut().find(|f| f.id == id) else {
            return Ok(None);
        };
        format.status = status;
        format.updated_at = Utc::now();
        Ok(Some(format.clone()))
    }

    async fn is_referenced(&self, id: FormatId) -> Result<bool, CoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .submissions
            .iter()
            .any(|s| s.format_id == id))
    }
}

#[async_trait]
impl BaseSubmissionStore for MemStore {
    async fn insert(
        &self,
        format_id: FormatId,
        submitter_id: UserId,
        data: &Map<String, Value>,
    ) -> Result<Submission, CoreError> {
        let now = Utc::now();
        let submission = Submission {
            id: SubmissionId::from_i64(self.next_id()),
            format_id,
            submitter_id,
            data: data.clone(),
            status: SubmissionStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.state
            .lock()
            .unwrap()
            .submissions
            .push(submission.clone());
        Ok(submission)
    }

    async fn find_by_id(&self, id: SubmissionId) -> Result<Option<Submission>, CoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .submissions
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn find_by_submitter(&self, submitter_id: UserId) -> Result<Vec<Submission>, CoreError> {
        let mut own: Vec<Submission> = self
            .state
            .lock()
            .unwrap()
            .submissions
            .iter()
            .filter(|s| s.submitter_id == submitter_id)
            .cloned()
            .collect();
        own.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(own)
    }

    async fn find_all(&self) -> Result<Vec<Submission>, CoreError> {
        let mut all = self.state.lock().unwrap().submissions.clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn find_pending(&self) -> Result<Vec<Submission>, CoreError> {
        let mut pending: Vec<Submission> = self
            .state
            .lock()
            .unwrap()
            .submissions
            .iter()
            .filter(|s| s.status == SubmissionStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(pending)
    }

    async fn update_data(
        &self,
        id: SubmissionId,
        data: &Map<String, Value>,
    ) -> Result<Option<Submission>, CoreError> {
        let mut state = self.state.lock().unwrap();
        let Some(submission) = state.submissions.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        submission.data = data.clone();
        submission.updated_at = Utc::now();
        Ok(Some(submission.clone()))
    }

    async fn transition_status(
        &self,
        id: SubmissionId,
        from: SubmissionStatus,
        to: SubmissionStatus,
    ) -> Result<Option<Submission>, CoreError> {
        if self.fail_next_transition.swap(false, Ordering::SeqCst) {
            return Ok(None);
        }
        // Check-and-set under one lock: the in-memory equivalent of the
        // conditional UPDATE.
        let mut state = self.state.lock().unwrap();
        let Some(submission) = state.submissions.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        if submission.status != from {
            return Ok(None);
        }
        submission.status = to;
        submission.updated_at = Utc::now();
        Ok(Some(submission.clone()))
    }
}

#[async_trait]
impl BaseValidationStore for MemStore {
    async fn insert_shell(&self, submission_id: SubmissionId) -> Result<Validation, CoreError> {
        let now = Utc::now();
        let validation = Validation {
            id: ValidationId::from_i64(self.next_id()),
            submission_id,
            validator_id: None,
            status: SubmissionStatus::Pending,
            observations: None,
            created_at: now,
            updated_at: now,
        };
        self.state
            .lock()
            .unwrap()
            .validations
            .push(validation.clone());
        Ok(validation)
    }

    async fn find_by_id(&self, id: ValidationId) -> Result<Option<Validation>, CoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .validations
            .iter()
            .find(|v| v.id == id)
            .cloned())
    }

    async fn find_open_by_submission(
        &self,
        submission_id: SubmissionId,
    ) -> Result<Option<Validation>, CoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .validations
            .iter()
            .find(|v| v.submission_id == submission_id && v.status == SubmissionStatus::Pending)
            .cloned())
    }

    async fn find_by_submission(
        &self,
        submission_id: SubmissionId,
    ) -> Result<Vec<Validation>, CoreError> {
        let mut history: Vec<Validation> = self
            .state
            .lock()
            .unwrap()
            .validations
            .iter()
            .filter(|v| v.submission_id == submission_id)
            .cloned()
            .collect();
        history.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(history)
    }

    async fn finalize(
        &self,
        id: ValidationId,
        validator_id: UserId,
        decision: SubmissionStatus,
        observations: Option<&str>,
    ) -> Result<Option<Validation>, CoreError> {
        let mut state = self.state.lock().unwrap();
        let Some(validation) = state.validations.iter_mut().find(|v| v.id == id) else {
            return Ok(None);
        };
        validation.validator_id = Some(validator_id);
        validation.status = decision;
        validation.observations = observations.map(str::to_string);
        validation.updated_at = Utc::now();
        Ok(Some(validation.clone()))
    }
}

#[async_trait]
impl BaseNotificationStore for MemStore {
    async fn insert(
        &self,
        recipient_id: UserId,
        message: &str,
    ) -> Result<Notification, CoreError> {
        if self
            .failing_recipients
            .lock()
            .unwrap()
            .contains(&recipient_id.into_i64())
        {
            return Err(CoreError::Storage(format!(
                "scripted failure for recipient {recipient_id}"
            )));
        }
        let now = Utc::now();
        let notification = Notification {
            id: NotificationId::from_i64(self.next_id()),
            recipient_id,
            message: message.to_string(),
            read: false,
            created_at: now,
            updated_at: now,
        };
        self.state
            .lock()
            .unwrap()
            .notifications
            .push(notification.clone());
        Ok(notification)
    }

    async fn find_by_recipient(
        &self,
        recipient_id: UserId,
    ) -> Result<Vec<Notification>, CoreError> {
        let mut own: Vec<Notification> = self
            .state
            .lock()
            .unwrap()
            .notifications
            .iter()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect();
        own.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(own)
    }

    async fn mark_read(&self, id: NotificationId) -> Result<u64, CoreError> {
        let mut state = self.state.lock().unwrap();
        match state
            .notifications
            .iter_mut()
            .find(|n| n.id == id && !n.read)
        {
            Some(notification) => {
                notification.read = true;
                notification.updated_at = Utc::now();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_read_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, CoreError> {
        let mut state = self.state.lock().unwrap();
        let before = state.notifications.len();
        state
            .notifications
            .retain(|n| !(n.read && n.updated_at < cutoff));
        Ok((before - state.notifications.len()) as u64)
    }

    async fn stats(&self, cutoff: DateTime<Utc>) -> Result<NotificationStats, CoreError> {
        let state = self.state.lock().unwrap();
        let total = state.notifications.len() as u64;
        let read = state.notifications.iter().filter(|n| n.read).count() as u64;
        let expired = state
            .notifications
            .iter()
            .filter(|n| n.read && n.updated_at < cutoff)
            .count() as u64;
        Ok(NotificationStats {
            total,
            read,
            unread: total - read,
            expired,
        })
    }
}

#[async_trait]
impl BasePrincipalDirectory for MemStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<Principal>, CoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn find_validators(&self) -> Result<Vec<Principal>, CoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .users
            .iter()
            .filter(|u| matches!(u.role, Role::Validator | Role::Admin))
            .cloned()
            .collect())
    }
}

// =============================================================================
// Mock PDF Renderer
// =============================================================================

pub struct MockPdfRenderer {
    rendered: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl MockPdfRenderer {
    pub fn new() -> Self {
        Self {
            rendered: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    /// Script every render call to fail.
    pub fn with_failure(self) -> Self {
        self.fail.store(true, Ordering::SeqCst);
        self
    }

    /// Get all HTML documents that were rendered
    pub fn rendered(&self) -> Vec<String> {
        self.rendered.lock().unwrap().clone()
    }

    /// Check if a document containing the given text was rendered
    pub fn was_rendered_containing(&self, text: &str) -> bool {
        self.rendered
            .lock()
            .unwrap()
            .iter()
            .any(|html| html.contains(text))
    }
}

impl Default for MockPdfRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BasePdfRenderer for MockPdfRenderer {
    async fn render(&self, html: &str, _page: &PageConfig) -> Result<Vec<u8>, CoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CoreError::RenderFailure("scripted failure".to_string()));
        }
        self.rendered.lock().unwrap().push(html.to_string());
        Ok(b"%PDF-1.4\nmock".to_vec())
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub store: Arc<MemStore>,
    pub pdf: Arc<MockPdfRenderer>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemStore::new()),
            pdf: Arc::new(MockPdfRenderer::new()),
        }
    }

    /// Set a mock PDF renderer
    pub fn mock_pdf(mut self, pdf: MockPdfRenderer) -> Self {
        self.pdf = Arc::new(pdf);
        self
    }

    /// Build ServerDeps backed by the in-memory store
    pub fn deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.pdf.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
