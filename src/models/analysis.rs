//! Typed records returned by the deep-analysis extractors.
//!
//! All fields default, so an empty decode yields an all-default record.

use serde::{Deserialize, Serialize};

use super::enums::{
    CommandClarity, PrincipleStatus, Priority, ProjectedStatus, StepStatus,
};

// ═══════════════════════════════════════════════════════════
// Risk transfer and bottlenecks
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FinancialProtectionDeepAnalysis {
    pub efficiency_score: f64,
    pub overall_strategy: String,
    pub steps: Vec<FinancialProtectionStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FinancialProtectionStep {
    pub step_number: f64,
    pub title: String,
    pub status: StepStatus,
    pub description: String,
    pub action_items: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kpi: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BottleneckDeepAnalysis {
    pub root_cause: String,
    pub legal_framework: String,
    pub financial_impact_estimate: String,
    pub strategic_actions: Vec<String>,
    pub probability_of_resolution: f64,
}

/// Single point of failure review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpfDeepAnalysis {
    pub spf_diagnosis: String,
    pub failure_mode: String,
    pub redundancy_strategy: String,
    pub testing_protocol: String,
    pub contingency_plan: String,
    pub catastrophe_probability: f64,
    pub impact_beneficiaries: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegalDocument {
    pub title: String,
    pub content: String,
    pub recipient: String,
}

// ═══════════════════════════════════════════════════════════
// Resources and money
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceAnalysis {
    pub sufficiency_assessment: String,
    pub personnel_recommendations: Vec<String>,
    pub machinery_recommendations: Vec<String>,
    pub technology_suggestions: Vec<TechnologySuggestion>,
    pub efficiency_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TechnologySuggestion {
    pub name: String,
    pub application: String,
    pub benefit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FinancialDeepAnalysis {
    pub health_score: f64,
    pub diagnosis: String,
    pub forecast: Forecast,
    pub concatenation_analysis: ConcatenationAnalysis,
    pub optimization_strategies: Vec<OptimizationStrategy>,
    pub risk_items: Vec<FinancialRiskItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub big_mac_index: Option<BigMacIndex>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Forecast {
    /// Estimate at completion.
    pub eac: f64,
    /// Variance at completion.
    pub vac: f64,
    pub projected_status: ProjectedStatus,
}

/// Budget lines cross-checked against execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConcatenationAnalysis {
    pub budget_vs_execution_gap: String,
    pub flagged_discrepancies: Vec<FlaggedDiscrepancy>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlaggedDiscrepancy {
    pub activity_name: String,
    pub budgeted_amount: f64,
    pub execution_cost: f64,
    pub variance: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptimizationStrategy {
    pub title: String,
    pub impact: String,
    pub action: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FinancialRiskItem {
    pub item: String,
    pub risk_level: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BigMacIndex {
    pub local_currency_code: String,
    pub local_price: f64,
    pub dollar_price: f64,
    pub implied_exchange_rate: f64,
    pub actual_exchange_rate: f64,
    pub currency_valuation_percent: f64,
    pub description: String,
    pub purchasing_power_parity_action: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContractorProfile {
    pub name: String,
    pub nit: String,
    pub suitability_score: f64,
    /// Residual contracting capacity ("capacidad K").
    pub k_capacity: String,
    pub financial_health: String,
    pub disbursement_risk: String,
    pub disbursement_rationale: String,
    pub red_flags: Vec<String>,
    pub summary: String,
}

// ═══════════════════════════════════════════════════════════
// Engineering
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CorrectiveDeepAnalysis {
    pub threat_diagnosis: String,
    pub engineering_solution_audit: String,
    pub transversal_checks: TransversalChecks,
    pub vulnerability_assessment: String,
    pub technical_rigor_score: f64,
    pub risk_of_failure: String,
    pub holistic_recommendations: Vec<String>,
    pub alternative_solutions: Vec<AlternativeSolution>,
    pub resource_optimization_audit: String,
    pub cost_benefit_analysis: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransversalChecks {
    pub budget_sufficiency: String,
    pub timeline_feasibility: String,
    pub regulatory_compliance: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlternativeSolution {
    pub solution_name: String,
    pub description: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub estimated_cost_impact: String,
    pub resilience_score: f64,
}

/// Per-activity critical path flags as answered by the model.
///
/// Omitted fields stay `None` so they leave the milestone untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CriticalPathUpdate {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_critical_path: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical_path_reasoning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inferred_resources: Option<Vec<crate::models::project::ActivityResource>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CriticalPathResponse {
    pub analysis_summary: String,
    pub updated_milestones: Vec<CriticalPathUpdate>,
}

/// Critical path result with the updates already applied to the milestones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CriticalPathAnalysis {
    pub analysis_summary: String,
    pub updated_milestones: Vec<crate::models::project::ProjectMilestone>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActivityDeepAnalysis {
    pub optimization_strategy: String,
    pub suggested_technologies: Vec<SuggestedTechnology>,
    pub specific_execution_risks: Vec<String>,
    pub efficiency_gain_estimate: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SuggestedTechnology {
    pub name: String,
    pub benefit: String,
}

// ═══════════════════════════════════════════════════════════
// Disaster risk management
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KnowledgeDeepAnalysis {
    pub overall_knowledge_score: f64,
    pub risk_characterization: String,
    pub critical_data_gaps: Vec<DataGap>,
    pub modeling_alternatives: Vec<TechnicalAlternative>,
    pub monitoring_alternatives: Vec<TechnicalAlternative>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataGap {
    pub gap: String,
    pub criticality: Priority,
    pub impact: String,
    pub action_plan: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TechnicalAlternative {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub estimated_cost: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ManagementDeepAnalysis {
    pub preparedness_score: f64,
    pub contingency_plan_audit: String,
    pub evacuation_protocols: StrengthsWeaknesses,
    pub command_chain: CommandChain,
    pub response_logistics: StrengthsWeaknesses,
    pub communication_systems_audit: String,
    pub actionable_recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StrengthsWeaknesses {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommandChain {
    pub clarity: CommandClarity,
    pub recommendations: Vec<String>,
}

/// Land-use plan (POT) compliance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PotAnalysis {
    pub compliance_score: f64,
    pub land_use_restrictions: Vec<PotFinding>,
    pub risk_zones_identified: Vec<PotFinding>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PotFinding {
    pub issue: String,
    pub mitigation: String,
}

// ═══════════════════════════════════════════════════════════
// Management standards and schedule
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PmbokAnalysis {
    pub overall_observation: String,
    pub audit_date: String,
    pub principles: Vec<PmbokPrinciple>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PmbokPrinciple {
    pub name: String,
    pub english_name: String,
    pub score: f64,
    pub status: PrincipleStatus,
    pub reasoning: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PmbokDeepAnalysis {
    pub diagnosis: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub actionable_steps: Vec<String>,
    pub kpi_impact: String,
    pub consequence_simulation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScheduleDeepAnalysis {
    pub analysis_date: String,
    pub projected_completion_date: String,
    pub days_variance: f64,
    pub timeline_diagnosis: String,
    pub root_causes: Vec<String>,
    pub accelerator_strategies: Vec<AcceleratorStrategy>,
    pub impact_on_budget: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AcceleratorStrategy {
    pub strategy_name: String,
    pub description: String,
    pub impact_days: f64,
}
