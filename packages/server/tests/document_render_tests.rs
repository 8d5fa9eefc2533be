//! End-to-end document rendering tests: lifecycle output through the
//! renderer and the PDF collaborator seam.

mod common;

use crate::common::TestHarness;
use serde_json::{json, Map, Value};
use test_context::test_context;

use server_core::common::auth::Role;
use server_core::common::CoreError;
use server_core::domains::documents::{
    generate_pdf, generate_pdf_preview, render_approved, render_draft,
};
use server_core::domains::formats::actions::create_format;
use server_core::domains::submissions::actions::{
    create_submission, decide_submission, get_validation_history, Decision,
};
use server_core::domains::submissions::events::SubmissionEvent;
use server_core::domains::submissions::models::submission::{Submission, SubmissionStatus};
use server_core::kernel::{MockPdfRenderer, TestDependencies};

fn data(value: Value) -> Map<String, Value> {
    value.as_object().unwrap().clone()
}

/// The full §happy-path: format → submission → approval → approved PDF.
#[test_context(TestHarness)]
#[tokio::test]
async fn leave_request_approval_renders_the_expected_document(ctx: &mut TestHarness) {
    let creator = ctx.user("Cleo", Role::Creator);
    let validator = ctx.user("Vera", Role::Validator);
    let submitter = ctx.user("Ana", Role::User);

    let format = create_format(&ctx.deps, &creator, ctx.leave_request_format())
        .await
        .unwrap();

    let submission: Submission = match create_submission(
        &ctx.deps,
        &submitter,
        format.id,
        data(json!({"name": "Ana", "days": 3})),
    )
    .await
    .unwrap()
    {
        SubmissionEvent::SubmissionCreated { submission, .. } => submission,
        _ => unreachable!(),
    };

    let (submission, validation) = match decide_submission(
        &ctx.deps,
        &validator,
        submission.id,
        Decision::Approved,
        Some("ok".to_string()),
    )
    .await
    .unwrap()
    {
        SubmissionEvent::SubmissionDecided {
            submission,
            validation,
        } => (submission, validation),
        _ => unreachable!(),
    };
    assert_eq!(submission.status, SubmissionStatus::Approved);

    let spec = render_approved(&format, &submission, &validation, &submitter, &validator);
    assert_eq!(spec.body, "Name: Ana, Days: 3");
    assert_eq!(spec.observations.as_deref(), Some("ok"));

    let bytes = generate_pdf(&ctx.deps, &spec).await.unwrap();
    assert!(!bytes.is_empty());
    assert!(ctx.pdf().was_rendered_containing("APPROVED"));
    assert!(ctx.pdf().was_rendered_containing("Name: Ana, Days: 3"));
    assert!(ctx.pdf().was_rendered_containing("Validated by: Vera"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn draft_document_renders_plain(ctx: &mut TestHarness) {
    let creator = ctx.user("Cleo", Role::Creator);
    let submitter = ctx.user("Ana", Role::User);
    let format = create_format(&ctx.deps, &creator, ctx.leave_request_format())
        .await
        .unwrap();
    let submission = match create_submission(
        &ctx.deps,
        &submitter,
        format.id,
        data(json!({"name": "Ana", "days": 3})),
    )
    .await
    .unwrap()
    {
        SubmissionEvent::SubmissionCreated { submission, .. } => submission,
        _ => unreachable!(),
    };

    let spec = render_draft(&format, &submission);
    let html = spec.to_html();
    assert!(html.contains("Leave Request"));
    assert!(html.contains("Name: Ana, Days: 3"));
    assert!(!html.contains("APPROVED"));
    assert!(html.contains(&format!("Generated by: User {}", submitter.id)));
}

/// A rejected cycle still renders as a draft; the history keeps the verdict.
#[test_context(TestHarness)]
#[tokio::test]
async fn rejected_submissions_render_without_approval_chrome(ctx: &mut TestHarness) {
    let creator = ctx.user("Cleo", Role::Creator);
    let validator = ctx.user("Vera", Role::Validator);
    let submitter = ctx.user("Ana", Role::User);
    let format = create_format(&ctx.deps, &creator, ctx.leave_request_format())
        .await
        .unwrap();
    let submission = match create_submission(&ctx.deps, &submitter, format.id, data(json!({})))
        .await
        .unwrap()
    {
        SubmissionEvent::SubmissionCreated { submission, .. } => submission,
        _ => unreachable!(),
    };

    let submission = match decide_submission(
        &ctx.deps,
        &validator,
        submission.id,
        Decision::Rejected,
        Some("incomplete".to_string()),
    )
    .await
    .unwrap()
    {
        SubmissionEvent::SubmissionDecided { submission, .. } => submission,
        _ => unreachable!(),
    };

    let spec = render_draft(&format, &submission);
    assert!(spec.badge.is_none());
    assert!(spec.validation.is_none());

    let history = get_validation_history(&ctx.deps, &submitter, submission.id)
        .await
        .unwrap();
    assert_eq!(history[0].observations.as_deref(), Some("incomplete"));
}

#[tokio::test]
async fn renderer_failures_propagate_as_render_failure() {
    let testdeps = TestDependencies::new().mock_pdf(MockPdfRenderer::new().with_failure());
    let deps = testdeps.deps();

    let creator = testdeps.store.user("Cleo", Role::Creator);
    let format = create_format(
        &deps,
        &creator,
        server_core::domains::formats::models::format::NewFormat {
            title: "T".to_string(),
            body_template: "b".to_string(),
            variable_defs: vec![],
        },
    )
    .await
    .unwrap();
    let submission = match create_submission(&deps, &creator, format.id, Map::new())
        .await
        .unwrap()
    {
        SubmissionEvent::SubmissionCreated { submission, .. } => submission,
        _ => unreachable!(),
    };

    let spec = render_draft(&format, &submission);
    let result = generate_pdf(&deps, &spec).await;
    assert!(matches!(result, Err(CoreError::RenderFailure(_))));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn preview_is_base64_of_the_rendered_bytes(ctx: &mut TestHarness) {
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    let creator = ctx.user("Cleo", Role::Creator);
    let submitter = ctx.user("Ana", Role::User);
    let format = create_format(&ctx.deps, &creator, ctx.leave_request_format())
        .await
        .unwrap();
    let submission = match create_submission(&ctx.deps, &submitter, format.id, data(json!({})))
        .await
        .unwrap()
    {
        SubmissionEvent::SubmissionCreated { submission, .. } => submission,
        _ => unreachable!(),
    };

    let spec = render_draft(&format, &submission);
    let encoded = generate_pdf_preview(&ctx.deps, &spec).await.unwrap();
    let decoded = STANDARD.decode(encoded).unwrap();
    assert!(decoded.starts_with(b"%PDF"));
}
