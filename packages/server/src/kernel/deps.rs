//! Server dependencies for domain actions (using traits for testability)
//!
//! This module provides the central dependency container used by all domain
//! actions. All external collaborators (storage, principal directory, PDF
//! renderer) sit behind trait abstractions to enable testing.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::common::CoreError;
use crate::kernel::{
    BaseFormatStore, BaseNotificationStore, BasePdfRenderer, BasePrincipalDirectory,
    BaseSubmissionStore, BaseValidationStore,
};

/// Default bound on storage collaborator calls.
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default bound on PDF renderer calls (HTML conversion is slow).
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Server dependencies accessible to domain actions
#[derive(Clone)]
pub struct ServerDeps {
    pub formats: Arc<dyn BaseFormatStore>,
    pub submissions: Arc<dyn BaseSubmissionStore>,
    pub validations: Arc<dyn BaseValidationStore>,
    pub notifications: Arc<dyn BaseNotificationStore>,
    pub directory: Arc<dyn BasePrincipalDirectory>,
    pub pdf: Arc<dyn BasePdfRenderer>,
    /// Bound applied to every storage call; overruns surface as `Timeout`.
    pub storage_timeout: Duration,
    /// Bound applied to PDF renderer calls.
    pub render_timeout: Duration,
}

impl ServerDeps {
    /// Create new ServerDeps with the given collaborators and default bounds
    pub fn new(
        formats: Arc<dyn BaseFormatStore>,
        submissions: Arc<dyn BaseSubmissionStore>,
        validations: Arc<dyn BaseValidationStore>,
        notifications: Arc<dyn BaseNotificationStore>,
        directory: Arc<dyn BasePrincipalDirectory>,
        pdf: Arc<dyn BasePdfRenderer>,
    ) -> Self {
        Self {
            formats,
            submissions,
            validations,
            notifications,
            directory,
            pdf,
            storage_timeout: DEFAULT_STORAGE_TIMEOUT,
            render_timeout: DEFAULT_RENDER_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, storage: Duration, render: Duration) -> Self {
        self.storage_timeout = storage;
        self.render_timeout = render;
        self
    }

    /// Run a storage call under the storage deadline.
    ///
    /// The core never retries; overruns surface as `Timeout("storage")` and
    /// retry policy belongs to the collaborator.
    pub async fn store<T, F>(&self, fut: F) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, CoreError>>,
    {
        match tokio::time::timeout(self.storage_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(CoreError::Timeout("storage")),
        }
    }

    /// Run a PDF renderer call under the render deadline.
    pub async fn render_call<T, F>(&self, fut: F) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, CoreError>>,
    {
        match tokio::time::timeout(self.render_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(CoreError::Timeout("pdf renderer")),
        }
    }
}
