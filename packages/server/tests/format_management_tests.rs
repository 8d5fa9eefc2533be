//! Integration tests for format template management.

mod common;

use crate::common::TestHarness;
use serde_json::{json, Map, Value};
use test_context::test_context;

use server_core::common::auth::Role;
use server_core::common::CoreError;
use server_core::domains::formats::actions::{
    create_format, get_format, list_active_formats, set_format_status, update_format,
};
use server_core::domains::formats::models::format::{FormatChanges, FormatStatus, NewFormat};
use server_core::domains::submissions::actions::create_submission;

fn data(value: Value) -> Map<String, Value> {
    value.as_object().unwrap().clone()
}

#[test_context(TestHarness)]
#[tokio::test]
async fn creators_and_admins_manage_formats_users_do_not(ctx: &mut TestHarness) {
    let creator = ctx.user("Cleo", Role::Creator);
    let admin = ctx.user("Adam", Role::Admin);
    let user = ctx.user("Ana", Role::User);
    let validator = ctx.user("Vera", Role::Validator);

    assert!(create_format(&ctx.deps, &creator, ctx.leave_request_format()).await.is_ok());
    assert!(create_format(&ctx.deps, &admin, ctx.leave_request_format()).await.is_ok());
    for principal in [&user, &validator] {
        let result = create_format(&ctx.deps, principal, ctx.leave_request_format()).await;
        assert!(matches!(result, Err(CoreError::Forbidden(_))));
    }
}

#[test_context(TestHarness)]
#[tokio::test]
async fn blank_titles_and_bodies_are_rejected(ctx: &mut TestHarness) {
    let creator = ctx.user("Cleo", Role::Creator);

    for (title, body) in [("  ", "body"), ("title", "")] {
        let result = create_format(
            &ctx.deps,
            &creator,
            NewFormat {
                title: title.to_string(),
                body_template: body.to_string(),
                variable_defs: vec![],
            },
        )
        .await;
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }
}

#[test_context(TestHarness)]
#[tokio::test]
async fn formats_become_immutable_once_referenced(ctx: &mut TestHarness) {
    let creator = ctx.user("Cleo", Role::Creator);
    let submitter = ctx.user("Ana", Role::User);
    let format = create_format(&ctx.deps, &creator, ctx.leave_request_format())
        .await
        .unwrap();

    // Editable before any submission references it
    let updated = update_format(
        &ctx.deps,
        &creator,
        format.id,
        FormatChanges {
            title: Some("Leave Request v2".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.title, "Leave Request v2");

    create_submission(&ctx.deps, &submitter, format.id, data(json!({"name": "Ana"})))
        .await
        .unwrap();

    let result = update_format(
        &ctx.deps,
        &creator,
        format.id,
        FormatChanges {
            title: Some("Leave Request v3".to_string()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(result, Err(CoreError::Validation(_))));
    assert_eq!(
        get_format(&ctx.deps, format.id).await.unwrap().title,
        "Leave Request v2"
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn deactivation_removes_a_format_from_the_active_list(ctx: &mut TestHarness) {
    let creator = ctx.user("Cleo", Role::Creator);
    let format = create_format(&ctx.deps, &creator, ctx.leave_request_format())
        .await
        .unwrap();
    assert_eq!(list_active_formats(&ctx.deps).await.unwrap().len(), 1);

    set_format_status(&ctx.deps, &creator, format.id, FormatStatus::Inactive)
        .await
        .unwrap();
    assert!(list_active_formats(&ctx.deps).await.unwrap().is_empty());

    // Still fetchable directly; deactivation is not deletion
    assert_eq!(
        get_format(&ctx.deps, format.id).await.unwrap().status,
        FormatStatus::Inactive
    );
}
