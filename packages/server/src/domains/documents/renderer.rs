//! Semantic document construction for draft and approved submissions.
//!
//! This component builds an immutable `DocumentSpec` and converts it to the
//! HTML handed to the external PDF collaborator; it never performs PDF-level
//! rendering itself.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::template::substitute;
use crate::common::{CoreError, Principal};
use crate::domains::formats::models::format::Format;
use crate::domains::submissions::models::submission::Submission;
use crate::domains::submissions::models::validation::Validation;
use crate::kernel::ServerDeps;

/// Fixed page configuration handed unchanged to the PDF collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct PageConfig {
    pub format: &'static str,
    pub margin_top: &'static str,
    pub margin_right: &'static str,
    pub margin_bottom: &'static str,
    pub margin_left: &'static str,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            format: "A4",
            margin_top: "20mm",
            margin_right: "20mm",
            margin_bottom: "20mm",
            margin_left: "20mm",
        }
    }
}

/// Identity block shown on approved documents.
#[derive(Debug, Clone)]
pub struct ValidationInfo {
    pub validator_name: String,
    pub validated_at: DateTime<Utc>,
    pub submitter_name: String,
}

/// The semantic document: what to render, not how.
#[derive(Debug, Clone)]
pub struct DocumentSpec {
    /// Centered document title.
    pub title: String,
    /// Header badge, present only on approved documents.
    pub badge: Option<&'static str>,
    /// Validator identity block, present only on approved documents.
    pub validation: Option<ValidationInfo>,
    /// Justified, variable-substituted body.
    pub body: String,
    /// Validator observations; omitted when empty.
    pub observations: Option<String>,
    /// Footer lines, small print under a separator.
    pub footer: Vec<String>,
}

/// Build the document for a pending or rejected submission.
pub fn render_draft(format: &Format, submission: &Submission) -> DocumentSpec {
    DocumentSpec {
        title: format.title.clone(),
        badge: None,
        validation: None,
        body: substitute(&format.body_template, &submission.data),
        observations: None,
        footer: vec![
            format!("Generated by: User {}", submission.submitter_id),
            format!("Date: {}", fmt_ts(submission.created_at)),
        ],
    }
}

/// Build the document for an approved submission: adds the APPROVED badge,
/// the validator identity block and, when present, the observations section.
pub fn render_approved(
    format: &Format,
    submission: &Submission,
    validation: &Validation,
    submitter: &Principal,
    validator: &Principal,
) -> DocumentSpec {
    let observations = validation
        .observations
        .as_deref()
        .filter(|o| !o.trim().is_empty())
        .map(str::to_string);

    DocumentSpec {
        title: format.title.clone(),
        badge: Some("APPROVED"),
        validation: Some(ValidationInfo {
            validator_name: validator.display_name.clone(),
            validated_at: validation.updated_at,
            submitter_name: submitter.display_name.clone(),
        }),
        body: substitute(&format.body_template, &submission.data),
        observations,
        footer: vec![
            format!("Submission id: {}", submission.id),
            format!("Status: {}", submission.status.as_str().to_uppercase()),
        ],
    }
}

const STYLE: &str = "\
body { font-family: 'Times New Roman', serif; font-size: 12px; line-height: 1.6; color: #000; }
.header { text-align: center; margin-bottom: 30px; }
.badge { font-size: 20px; font-weight: bold; color: #2563eb; border-bottom: 1px solid #e5e7eb; padding-bottom: 10px; }
.title { font-size: 18px; font-weight: bold; text-align: center; margin: 20px 0 30px 0; }
.validation-box { background-color: #f8fafc; border: 1px solid #e2e8f0; padding: 20px; margin: 20px 0; }
.validation-info { color: #374151; font-size: 11px; line-height: 1.4; }
.content { text-align: justify; margin: 30px 0; }
.observations { margin-top: 40px; }
.observations-title { font-size: 14px; font-weight: bold; text-decoration: underline; margin-bottom: 10px; }
.observations-text { font-size: 11px; color: #374151; text-align: justify; }
.footer { margin-top: 40px; padding-top: 10px; border-top: 1px solid #ccc; font-size: 10px; color: #6b7280; }
";

impl DocumentSpec {
    /// The HTML handed to the PDF collaborator.
    pub fn to_html(&self) -> String {
        let mut html = String::with_capacity(self.body.len() + STYLE.len() + 512);
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<style>\n");
        html.push_str(STYLE);
        html.push_str("</style>\n</head>\n<body>\n");

        if let Some(badge) = self.badge {
            html.push_str("<div class=\"header\"><div class=\"badge\">");
            html.push_str(badge);
            html.push_str("</div></div>\n");
        }

        html.push_str("<div class=\"title\">");
        html.push_str(&self.title);
        html.push_str("</div>\n");

        if let Some(info) = &self.validation {
            html.push_str("<div class=\"validation-box\"><div class=\"validation-info\">");
            html.push_str(&format!("<div>Validated by: {}</div>", info.validator_name));
            html.push_str(&format!(
                "<div>Validation date: {}</div>",
                fmt_ts(info.validated_at)
            ));
            html.push_str(&format!(
                "<div>Submitted by: {}</div>",
                info.submitter_name
            ));
            html.push_str("</div></div>\n");
        }

        html.push_str("<div class=\"content\">");
        html.push_str(&self.body);
        html.push_str("</div>\n");

        if let Some(observations) = &self.observations {
            html.push_str("<div class=\"observations\">");
            html.push_str("<div class=\"observations-title\">Validator observations:</div>");
            html.push_str("<div class=\"observations-text\">");
            html.push_str(observations);
            html.push_str("</div></div>\n");
        }

        html.push_str("<div class=\"footer\">\n");
        for line in &self.footer {
            html.push_str("<p>");
            html.push_str(line);
            html.push_str("</p>\n");
        }
        html.push_str("</div>\n</body>\n</html>\n");
        html
    }
}

fn fmt_ts(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Render a document through the external PDF collaborator.
///
/// Renderer failures propagate as `RenderFailure`; deadline overruns as
/// `Timeout`.
pub async fn generate_pdf(deps: &ServerDeps, spec: &DocumentSpec) -> Result<Vec<u8>, CoreError> {
    let html = spec.to_html();
    let page = PageConfig::default();
    deps.render_call(deps.pdf.render(&html, &page)).await
}

/// Base64 variant used by clients for in-browser preview.
pub async fn generate_pdf_preview(
    deps: &ServerDeps,
    spec: &DocumentSpec,
) -> Result<String, CoreError> {
    let bytes = generate_pdf(deps, spec).await?;
    Ok(BASE64.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{FormatId, SubmissionId, UserId, ValidationId};
    use crate::common::auth::Role;
    use crate::domains::formats::models::format::FormatStatus;
    use crate::domains::submissions::models::submission::SubmissionStatus;
    use serde_json::json;

    fn fixture_format() -> Format {
        Format {
            id: FormatId::from_i64(1),
            title: "Leave Request".to_string(),
            body_template: "Name: {{name}}, Days: {{days}}".to_string(),
            variable_defs: vec![],
            status: FormatStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn fixture_submission(status: SubmissionStatus) -> Submission {
        Submission {
            id: SubmissionId::from_i64(10),
            format_id: FormatId::from_i64(1),
            submitter_id: UserId::from_i64(5),
            data: json!({"name": "Ana", "days": 3}).as_object().unwrap().clone(),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn fixture_validation(observations: Option<&str>) -> Validation {
        Validation {
            id: ValidationId::from_i64(20),
            submission_id: SubmissionId::from_i64(10),
            validator_id: Some(UserId::from_i64(9)),
            status: SubmissionStatus::Approved,
            observations: observations.map(str::to_string),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn draft_has_substituted_body_and_no_badge() {
        let spec = render_draft(&fixture_format(), &fixture_submission(SubmissionStatus::Pending));
        assert_eq!(spec.body, "Name: Ana, Days: 3");
        assert!(spec.badge.is_none());
        assert!(spec.validation.is_none());
        assert!(spec.footer[0].contains("User 5"));
    }

    #[test]
    fn approved_carries_badge_identity_and_uppercased_status() {
        let submitter = Principal::new(UserId::from_i64(5), "Ana", "ana@example.com", Role::User);
        let validator =
            Principal::new(UserId::from_i64(9), "Val", "val@example.com", Role::Validator);
        let spec = render_approved(
            &fixture_format(),
            &fixture_submission(SubmissionStatus::Approved),
            &fixture_validation(Some("ok")),
            &submitter,
            &validator,
        );
        assert_eq!(spec.badge, Some("APPROVED"));
        assert_eq!(spec.body, "Name: Ana, Days: 3");
        assert_eq!(spec.observations.as_deref(), Some("ok"));
        let info = spec.validation.as_ref().unwrap();
        assert_eq!(info.validator_name, "Val");
        assert_eq!(info.submitter_name, "Ana");
        assert!(spec.footer.iter().any(|l| l.contains("APPROVED")));
        assert!(spec.footer.iter().any(|l| l.contains("10")));
    }

    #[test]
    fn empty_observations_are_omitted() {
        let submitter = Principal::new(UserId::from_i64(5), "Ana", "ana@example.com", Role::User);
        let validator =
            Principal::new(UserId::from_i64(9), "Val", "val@example.com", Role::Validator);
        for obs in [None, Some(""), Some("   ")] {
            let spec = render_approved(
                &fixture_format(),
                &fixture_submission(SubmissionStatus::Approved),
                &fixture_validation(obs),
                &submitter,
                &validator,
            );
            assert!(spec.observations.is_none(), "observations {obs:?} should be dropped");
            assert!(!spec.to_html().contains("observations-title"));
        }
    }

    #[test]
    fn html_places_sections_in_order() {
        let submitter = Principal::new(UserId::from_i64(5), "Ana", "ana@example.com", Role::User);
        let validator =
            Principal::new(UserId::from_i64(9), "Val", "val@example.com", Role::Validator);
        let html = render_approved(
            &fixture_format(),
            &fixture_submission(SubmissionStatus::Approved),
            &fixture_validation(Some("ok")),
            &submitter,
            &validator,
        )
        .to_html();

        let badge = html.find("APPROVED").unwrap();
        let title = html.find("Leave Request").unwrap();
        let body = html.find("Name: Ana, Days: 3").unwrap();
        let observations = html.find("Validator observations").unwrap();
        assert!(badge < title && title < body && body < observations);
    }

    #[test]
    fn page_config_is_a4_with_20mm_margins() {
        let page = PageConfig::default();
        assert_eq!(page.format, "A4");
        for margin in [
            page.margin_top,
            page.margin_right,
            page.margin_bottom,
            page.margin_left,
        ] {
            assert_eq!(margin, "20mm");
        }
    }
}
