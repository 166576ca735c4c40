//! Incremental progress updates with an audit trail.
//!
//! New evidence is run through a narrow extraction. Reported scalars replace
//! the current ones only when non-zero, one evolution entry is prepended, and
//! milestone deltas are handed back untouched for the caller to review.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::context::AuditContext;
use super::evidence::Evidence;
use super::extraction::extract;
use super::merge::{scalar, sequence};
use super::prompt::{build_update_prompt, SYSTEM_INSTRUCTION};
use super::schema::Schema;
use super::types::{ContentPart, GenerationRequest};
use super::AuditError;
use crate::config::STRUCTURED_TEMPERATURE;
use crate::models::enums::{MilestoneStatus, Verdict};
use crate::models::evolution::{EvolutionEntry, FieldChange, DEFAULT_EVOLUTION_SUMMARY};
use crate::models::project::ProjectData;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MilestoneUpdate {
    pub description: String,
    pub progress: f64,
    pub status: MilestoneStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EvolutionSummary {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub efficiency_verdict: Option<Verdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub efficiency_rationale: Option<String>,
    pub changes: Vec<FieldChange>,
}

/// What the model reported about the new evidence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectUpdate {
    pub progress_percentage: f64,
    pub spent_budget: f64,
    pub milestone_updates: Vec<MilestoneUpdate>,
    pub evolution_log: EvolutionSummary,
}

impl ProjectUpdate {
    /// Field-by-field decode: a mistyped field only loses itself.
    pub fn from_value(raw: &Value) -> Self {
        let empty = Map::new();
        let fields = raw.as_object().unwrap_or(&empty);
        let base = Self::default();
        Self {
            progress_percentage: scalar(fields, "progressPercentage", &base.progress_percentage),
            spent_budget: scalar(fields, "spentBudget", &base.spent_budget),
            milestone_updates: sequence(fields, "milestoneUpdates", &base.milestone_updates),
            evolution_log: EvolutionSummary::from_value(fields.get("evolutionLog")),
        }
    }
}

impl EvolutionSummary {
    /// Per-field decode; a malformed change entry is skipped, not the whole list.
    pub fn from_value(raw: Option<&Value>) -> Self {
        let Some(Value::Object(fields)) = raw else {
            return Self::default();
        };
        Self {
            summary: scalar(fields, "summary", &String::new()),
            efficiency_verdict: scalar(fields, "efficiencyVerdict", &None),
            efficiency_rationale: scalar(fields, "efficiencyRationale", &None),
            changes: sequence(fields, "changes", &[]),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
    pub project: ProjectData,
    pub delta: ProjectUpdate,
}

impl UpdateOutcome {
    /// The entry this update prepended.
    pub fn entry(&self) -> Option<&EvolutionEntry> {
        self.project.evolution_history.first()
    }
}

pub fn update_schema() -> Schema {
    let milestone = Schema::object([
        ("description", Schema::string()),
        ("progress", Schema::number()),
        ("status", MilestoneStatus::schema()),
    ]);
    let change = Schema::object([
        ("field", Schema::string()),
        ("oldValue", Schema::string()),
        ("newValue", Schema::string()),
        ("comment", Schema::string()),
    ]);
    let log = Schema::object([
        ("summary", Schema::string()),
        ("efficiencyVerdict", Verdict::schema()),
        ("efficiencyRationale", Schema::string()),
        ("changes", Schema::array(change)),
    ]);

    Schema::object([
        ("progressPercentage", Schema::number()),
        ("spentBudget", Schema::number()),
        ("milestoneUpdates", Schema::array(milestone)),
        ("evolutionLog", log),
    ])
}

/// A reported zero, or NaN, counts as "not reported" and keeps `previous`.
///
/// A genuine drop to zero cannot be recorded through this path.
pub fn coalesce_reported(reported: f64, previous: f64) -> f64 {
    if reported != 0.0 && !reported.is_nan() {
        reported
    } else {
        previous
    }
}

/// Apply a delta to `current`. Pure: the clock and source label are inputs.
pub fn apply_update(
    current: &ProjectData,
    delta: ProjectUpdate,
    source: &str,
    now: DateTime<Utc>,
) -> UpdateOutcome {
    let log = &delta.evolution_log;
    let summary = if log.summary.trim().is_empty() {
        DEFAULT_EVOLUTION_SUMMARY
    } else {
        log.summary.as_str()
    };

    let mut entry = EvolutionEntry::new(now, source, summary);
    entry.changes = log.changes.clone();
    entry.efficiency_verdict = log.efficiency_verdict;
    entry.efficiency_rationale = log.efficiency_rationale.clone();

    let mut project = current.clone();
    project.progress_percentage =
        coalesce_reported(delta.progress_percentage, current.progress_percentage);
    project.spent_budget = coalesce_reported(delta.spent_budget, current.spent_budget);
    project.evolution_history.insert(0, entry);

    UpdateOutcome { project, delta }
}

pub fn update_request(current: &ProjectData, evidence: &Evidence) -> Result<GenerationRequest, AuditError> {
    Ok(GenerationRequest::from_parts(vec![
        ContentPart::Text(build_update_prompt(current)?),
        evidence.to_part(),
    ])
    .with_system(SYSTEM_INSTRUCTION)
    .with_temperature(STRUCTURED_TEMPERATURE)
    .with_schema(update_schema()))
}

/// Run an incremental update over new evidence.
pub async fn update_project(
    ctx: &AuditContext,
    current: &ProjectData,
    evidence: &Evidence,
) -> Result<UpdateOutcome, AuditError> {
    let request = update_request(current, evidence)?;
    let extraction = extract(ctx, &ctx.models.analysis, &request).await?;
    let delta = ProjectUpdate::from_value(&extraction.value);

    let outcome = apply_update(current, delta, evidence.source_label(), Utc::now());
    tracing::info!(
        source = evidence.source_label(),
        progress = outcome.project.progress_percentage,
        milestone_updates = outcome.delta.milestone_updates.len(),
        "Project updated"
    );
    Ok(outcome)
}
