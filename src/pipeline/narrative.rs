//! Free-text helpers: the holistic report, Q&A and mitigation suggestions.
//!
//! None of these fail. A cascade failure or an empty answer is logged and
//! replaced by a fixed fallback string.

use super::context::AuditContext;
use super::dispatch::dispatch;
use super::prompt::{
    build_mitigation_prompt, build_question_prompt, build_report_prompt, ReportContext,
    SYSTEM_INSTRUCTION,
};
use super::types::GenerationRequest;
use crate::models::project::{ProjectData, RiskItem};

pub const REPORT_FALLBACK: &str = "<h1>Error generando reporte holístico</h1>";
pub const QUESTION_FALLBACK: &str = "No pude generar una respuesta.";
pub const MITIGATION_FALLBACK: &str = "Error generando mitigación.";

/// HTML audit report for the whole project.
pub async fn generate_report(
    ctx: &AuditContext,
    project: &ProjectData,
    report: &ReportContext,
) -> String {
    let request =
        GenerationRequest::prompt(build_report_prompt(project, report)).with_system(SYSTEM_INSTRUCTION);
    narrate(ctx, &ctx.models.report, &request, "report", REPORT_FALLBACK).await
}

pub async fn ask_question(ctx: &AuditContext, project: &ProjectData, question: &str) -> String {
    let prompt = match build_question_prompt(project, question) {
        Ok(prompt) => prompt,
        Err(e) => {
            tracing::warn!(error = %e, "Could not build question prompt");
            return QUESTION_FALLBACK.to_string();
        }
    };
    let request = GenerationRequest::prompt(prompt);
    narrate(ctx, &ctx.models.analysis, &request, "question", QUESTION_FALLBACK).await
}

pub async fn mitigation_suggestion(
    ctx: &AuditContext,
    project: &ProjectData,
    risk: &RiskItem,
) -> String {
    let request = GenerationRequest::prompt(build_mitigation_prompt(project, risk));
    narrate(ctx, &ctx.models.analysis, &request, "mitigation", MITIGATION_FALLBACK).await
}

async fn narrate(
    ctx: &AuditContext,
    model: &str,
    request: &GenerationRequest,
    kind: &'static str,
    fallback: &str,
) -> String {
    match dispatch(ctx, model, request).await {
        Ok(out) if !out.response.text.is_empty() => out.response.text,
        Ok(out) => {
            tracing::warn!(kind, model = %out.model, "Empty narrative answer");
            fallback.to_string()
        }
        Err(e) => {
            tracing::warn!(kind, error = %e, "Narrative generation failed");
            fallback.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ANALYSIS_MODEL, REPORT_MODEL};
    use crate::pipeline::gemini::MockClient;
    use crate::pipeline::types::ContentPart;
    use crate::pipeline::ServiceError;
    use std::sync::Arc;

    fn project() -> ProjectData {
        let mut p = ProjectData::baseline();
        p.project_name = "Muro de contención".into();
        p
    }

    #[tokio::test]
    async fn report_uses_report_model_without_schema() {
        let client = Arc::new(MockClient::new("<h2>Resumen</h2>"));
        let ctx = AuditContext::new(client.clone());
        let report = ReportContext::from_project(&project(), None);

        let html = generate_report(&ctx, &project(), &report).await;
        assert_eq!(html, "<h2>Resumen</h2>");
        assert_eq!(client.models_called(), vec![REPORT_MODEL]);
        let request = &client.requests()[0];
        assert!(!request.expects_json());
        assert_eq!(request.system_instruction.as_deref(), Some(SYSTEM_INSTRUCTION));
    }

    #[tokio::test]
    async fn report_falls_back_on_failure() {
        let ctx = AuditContext::new(Arc::new(MockClient::failing(ServiceError::Connection(
            "http://localhost".into(),
        ))));
        let report = ReportContext::default();
        assert_eq!(generate_report(&ctx, &project(), &report).await, REPORT_FALLBACK);
    }

    #[tokio::test]
    async fn report_falls_back_on_empty_text() {
        let ctx = AuditContext::new(Arc::new(MockClient::new("")));
        let report = ReportContext::default();
        assert_eq!(generate_report(&ctx, &project(), &report).await, REPORT_FALLBACK);
    }

    #[tokio::test]
    async fn whitespace_answer_is_returned_as_is() {
        let ctx = AuditContext::new(Arc::new(MockClient::new("\n")));
        assert_eq!(ask_question(&ctx, &project(), "x").await, "\n");
    }

    #[tokio::test]
    async fn question_answer_and_fallback() {
        let client = Arc::new(MockClient::new("Sí, hay sobrecostos del 12%."));
        let ctx = AuditContext::new(client.clone());
        let answer = ask_question(&ctx, &project(), "¿Hay sobrecostos?").await;
        assert_eq!(answer, "Sí, hay sobrecostos del 12%.");
        assert_eq!(client.models_called(), vec![ANALYSIS_MODEL]);
        assert!(matches!(&client.requests()[0].parts[0], ContentPart::Text(t) if t.contains("¿Hay sobrecostos?")));

        let failing = AuditContext::new(Arc::new(MockClient::failing(ServiceError::Timeout(
            std::time::Duration::from_secs(60),
        ))));
        assert_eq!(ask_question(&failing, &project(), "x").await, QUESTION_FALLBACK);
    }

    #[tokio::test]
    async fn mitigation_fallback() {
        let ctx = AuditContext::new(Arc::new(MockClient::new("")));
        let out = mitigation_suggestion(&ctx, &project(), &RiskItem::default()).await;
        assert_eq!(out, MITIGATION_FALLBACK);
    }
}
