//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod pdf_client;
pub mod pg_store;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

pub use deps::{ServerDeps, DEFAULT_RENDER_TIMEOUT, DEFAULT_STORAGE_TIMEOUT};
pub use pdf_client::PdfServiceClient;
pub use pg_store::PgStore;
pub use scheduled_tasks::start_scheduler;
pub use test_dependencies::{MemStore, MockPdfRenderer, TestDependencies};
pub use traits::*;
