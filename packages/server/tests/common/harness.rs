//! Test harness wiring ServerDeps to the in-memory backend.
//!
//! Each test gets a fresh store, so tests never share state and can run
//! concurrently.

use std::sync::Arc;
use test_context::AsyncTestContext;

use server_core::common::auth::Role;
use server_core::common::Principal;
use server_core::domains::formats::models::format::{NewFormat, VariableDef, VariableKind};
use server_core::kernel::{MemStore, MockPdfRenderer, ServerDeps, TestDependencies};

pub struct TestHarness {
    pub testdeps: TestDependencies,
    pub deps: ServerDeps,
}

impl TestHarness {
    pub fn store(&self) -> &Arc<MemStore> {
        &self.testdeps.store
    }

    pub fn pdf(&self) -> &Arc<MockPdfRenderer> {
        &self.testdeps.pdf
    }

    /// Register a user with the directory.
    pub fn user(&self, name: &str, role: Role) -> Principal {
        self.testdeps.store.user(name, role)
    }

    /// The fixture template used across lifecycle tests.
    pub fn leave_request_format(&self) -> NewFormat {
        NewFormat {
            title: "Leave Request".to_string(),
            body_template: "Name: {{name}}, Days: {{days}}".to_string(),
            variable_defs: vec![
                VariableDef {
                    name: "name".to_string(),
                    kind: VariableKind::Text,
                    required: true,
                },
                VariableDef {
                    name: "days".to_string(),
                    kind: VariableKind::Number,
                    required: true,
                },
            ],
        }
    }
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let testdeps = TestDependencies::new();
        let deps = testdeps.deps();
        Self { testdeps, deps }
    }
}
