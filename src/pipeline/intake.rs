//! Primary extraction: evidence in, fully formed `ProjectData` out.

use super::context::AuditContext;
use super::evidence::Evidence;
use super::extraction::extract;
use super::merge::merge_project;
use super::prompt::{PROJECT_EXTRACTION_PROMPT, SYSTEM_INSTRUCTION};
use super::schema::Schema;
use super::types::{ContentPart, GenerationRequest};
use super::AuditError;
use crate::config::STRUCTURED_TEMPERATURE;
use crate::models::enums::{
    ActorCategory, FinancialType, Intensity, MilestoneStatus, ProjectPhase, RiskLevel,
    StrategicType,
};
use crate::models::project::ProjectData;

/// Shape requested for the primary extraction. Kept shallow: deep nesting
/// makes the service slow on long documents.
pub fn project_schema() -> Schema {
    let location = Schema::object([
        ("latitude", Schema::number()),
        ("longitude", Schema::number()),
        ("address", Schema::string()),
        ("municipality", Schema::string()),
        ("department", Schema::string()),
    ]);

    let actor = Schema::object([
        ("name", Schema::string()),
        ("role", Schema::string()),
        ("category", ActorCategory::schema()),
        ("impactLevel", Intensity::schema()),
    ]);

    let social = Schema::object([
        ("directJobs", Schema::number()),
        ("indirectJobs", Schema::number()),
        ("beneficiaries", Schema::number()),
        ("beneficiaryDescription", Schema::string()),
        ("demographicHighlight", Schema::string()),
        ("socialReturnScore", Schema::number()),
        ("socialReturnQuote", Schema::string()),
        ("socialRisks", Schema::string_list()),
        ("actors", Schema::array(actor)),
    ]);

    let risk = Schema::object([
        ("risk", Schema::string()),
        ("probability", RiskLevel::schema()),
        ("impact", RiskLevel::schema()),
        ("mitigation", Schema::string()),
        ("isSPF", Schema::boolean()),
    ]);

    let milestone = Schema::object([
        ("description", Schema::string()),
        ("date", Schema::string()),
        ("status", MilestoneStatus::schema()),
        ("progress", Schema::number()),
        ("estimatedCost", Schema::number()),
        ("startDate", Schema::string()),
        ("endDate", Schema::string()),
        ("financialType", FinancialType::schema()),
        ("strategicType", StrategicType::schema()),
        ("isSPF", Schema::boolean()),
    ]);

    Schema::object([
        ("projectName", Schema::string()),
        ("contractId", Schema::string()),
        ("projectPhase", ProjectPhase::schema()),
        ("contractor", Schema::string()),
        ("nit", Schema::string()),
        ("generalObjective", Schema::string()),
        ("location", location),
        ("totalBudget", Schema::number()),
        ("spentBudget", Schema::number()),
        ("progressPercentage", Schema::number()),
        ("startDate", Schema::string()),
        ("endDate", Schema::string()),
        ("socialEcosystem", social),
        ("risks", Schema::array(risk)),
        ("milestones", Schema::array(milestone)),
    ])
    .with_required(&["projectName", "totalBudget", "milestones"])
}

pub fn project_request(evidence: &Evidence) -> GenerationRequest {
    GenerationRequest::from_parts(vec![
        evidence.to_part(),
        ContentPart::Text(PROJECT_EXTRACTION_PROMPT.to_string()),
    ])
    .with_system(SYSTEM_INSTRUCTION)
    .with_temperature(STRUCTURED_TEMPERATURE)
    .with_schema(project_schema())
}

/// Build the canonical project from a contract document or text.
///
/// Fails only when both models are unavailable. A malformed or partial
/// answer yields a baseline-filled project.
pub async fn analyze_project(
    ctx: &AuditContext,
    evidence: &Evidence,
) -> Result<ProjectData, AuditError> {
    let extraction = extract(ctx, &ctx.models.extraction, &project_request(evidence)).await?;
    if !extraction.validation_gaps.is_empty() {
        tracing::info!(
            gaps = extraction.validation_gaps.len(),
            "Project extraction incomplete, baseline values fill the gaps"
        );
    }
    Ok(merge_project(&extraction.value, &ProjectData::baseline()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::gemini::MockClient;
    use std::sync::Arc;

    #[test]
    fn schema_requires_core_fields() {
        let wire = project_schema().to_wire();
        assert_eq!(
            wire["required"],
            serde_json::json!(["projectName", "totalBudget", "milestones"])
        );
        assert_eq!(
            wire["properties"]["projectPhase"]["enum"],
            serde_json::json!(["Formulation", "Execution", "Closed"])
        );
        assert_eq!(
            wire["properties"]["milestones"]["items"]["properties"]["status"]["enum"][1],
            "in-progress"
        );
    }

    #[test]
    fn request_puts_evidence_first() {
        let request = project_request(&Evidence::pdf(b"%PDF-1.4"));
        assert!(matches!(request.parts[0], ContentPart::InlineData { .. }));
        assert!(matches!(request.parts[1], ContentPart::Text(_)));
        assert_eq!(request.temperature, Some(STRUCTURED_TEMPERATURE));
        assert!(request.expects_json());
    }

    #[tokio::test]
    async fn analyze_merges_answer_onto_baseline() {
        let answer = r#"Aquí está:
```json
{"projectName":"Box culvert Manaure","totalBudget":850000000,"milestones":[{"description":"Excavación","status":"delayed"}],"location":{"municipality":"Manaure"}}
```"#;
        let client = Arc::new(MockClient::new(answer));
        let ctx = AuditContext::new(client.clone());

        let project = analyze_project(&ctx, &Evidence::text("Contrato 045")).await.unwrap();
        assert_eq!(project.project_name, "Box culvert Manaure");
        assert_eq!(project.total_budget, 850_000_000.0);
        assert_eq!(project.milestones.len(), 1);
        assert_eq!(project.milestones[0].status, MilestoneStatus::Delayed);
        assert_eq!(project.location.municipality, "Manaure");
        assert_eq!(project.kpis.cpi, 1.0);
        assert_eq!(client.models_called(), vec![crate::config::EXTRACTION_MODEL]);
    }

    #[tokio::test]
    async fn garbage_answer_gives_baseline() {
        let ctx = AuditContext::new(Arc::new(MockClient::new("prefix {broken json here} suffix")));
        let project = analyze_project(&ctx, &Evidence::text("x")).await.unwrap();
        assert_eq!(project, ProjectData::baseline());
    }
}
