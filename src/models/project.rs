//! Canonical project aggregate.
//!
//! Every struct decodes with `#[serde(default)]` so a partial answer still
//! yields a fully formed value. Wire names are camelCase.

use serde::{Deserialize, Serialize};

use super::analysis::{
    ActivityDeepAnalysis, BottleneckDeepAnalysis, CorrectiveDeepAnalysis,
    FinancialProtectionDeepAnalysis, KnowledgeDeepAnalysis, ManagementDeepAnalysis, PotAnalysis,
    ResourceAnalysis, SpfDeepAnalysis,
};
use super::enums::{
    ActorCategory, AlertKind, BottleneckImpact, BottleneckStatus, FinancialType, Intensity,
    MilestoneStatus, PolicyStatus, PrimaryProcess, Priority, ProjectPhase, ProjectType,
    ResourceType, RiskLevel, StakeholderType, StrategicType, TechnicalConcept,
};
use super::evolution::EvolutionEntry;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectData {
    pub project_name: String,
    pub contract_id: String,
    pub project_phase: ProjectPhase,
    pub project_type: ProjectType,
    pub contractor: String,
    pub nit: String,
    pub general_objective: String,
    pub specific_objectives: Vec<String>,
    pub location: GeoLocation,
    pub summary: String,
    pub total_budget: f64,
    pub spent_budget: f64,
    pub progress_percentage: f64,
    pub start_date: String,
    pub end_date: String,
    pub stakeholders: Vec<Stakeholder>,
    pub insurance_policies: Vec<InsurancePolicy>,
    pub bottlenecks: Vec<Bottleneck>,
    pub risks: Vec<RiskItem>,
    pub milestones: Vec<ProjectMilestone>,
    pub budget_breakdown: Vec<BudgetDistribution>,
    pub financial_line_items: Vec<FinancialLineItem>,
    pub resource_inventory: ResourceInventory,
    pub ungrd_analysis: UngrdAnalysis,
    pub kpis: ProjectKpis,
    pub alerts: Vec<ProjectAlert>,
    /// Most recent first.
    pub evolution_history: Vec<EvolutionEntry>,
    pub social_ecosystem: SocialEcosystem,
}

impl ProjectData {
    /// Baseline every extraction is merged onto.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Spent budget as a percentage of the total, 0 when no budget is known.
    pub fn financial_progress(&self) -> f64 {
        if self.total_budget > 0.0 {
            self.spent_budget / self.total_budget * 100.0
        } else {
            0.0
        }
    }

    /// Risks and milestones flagged as single points of failure.
    pub fn spf_count(&self) -> usize {
        self.risks.iter().filter(|r| r.is_spf).count()
            + self.milestones.iter().filter(|m| m.is_spf).count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub municipality: String,
    pub department: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stakeholder {
    pub name: String,
    pub role: String,
    #[serde(rename = "type")]
    pub kind: StakeholderType,
    pub is_community: bool,
    pub relevance: Priority,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InsurancePolicy {
    pub policy_number: String,
    pub insurer: String,
    pub policy_name: String,
    /// Guarantee class, e.g. "Cumplimiento" or "Parametric".
    #[serde(rename = "type")]
    pub kind: String,
    pub coverage_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_condition: Option<String>,
    pub status: PolicyStatus,
    pub start_date: String,
    pub expiration_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Bottleneck {
    pub process_name: String,
    pub responsible_entity: String,
    pub status: BottleneckStatus,
    pub days_delayed: f64,
    pub description: String,
    pub impact_level: BottleneckImpact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    #[serde(rename = "isRelatedToSPF")]
    pub is_related_to_spf: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep_analysis: Option<BottleneckDeepAnalysis>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RiskItem {
    pub risk: String,
    pub probability: RiskLevel,
    pub impact: RiskLevel,
    pub mitigation: String,
    #[serde(rename = "isSPF")]
    pub is_spf: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<String>,
}

impl RiskItem {
    pub fn is_critical(&self) -> bool {
        self.impact == RiskLevel::High
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActivityResource {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectMilestone {
    /// Activity code from the schedule, e.g. "1.1".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub description: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub status: MilestoneStatus,
    pub progress: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financial_type: Option<FinancialType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategic_type: Option<StrategicType>,
    #[serde(rename = "isSPF")]
    pub is_spf: bool,
    pub is_critical_path: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical_path_reasoning: Option<String>,
    pub dependencies: Vec<String>,
    pub inferred_resources: Vec<ActivityResource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep_analysis: Option<ActivityDeepAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spf_analysis: Option<SpfDeepAnalysis>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BudgetDistribution {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FinancialLineItem {
    pub description: String,
    pub unit: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_amount: f64,
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceInventory {
    pub personnel: Vec<Personnel>,
    pub machinery: Vec<Machinery>,
    pub equipment: Vec<Equipment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep_analysis: Option<ResourceAnalysis>,
}

impl ResourceInventory {
    pub fn is_empty(&self) -> bool {
        self.personnel.is_empty() && self.machinery.is_empty() && self.equipment.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Personnel {
    pub role: String,
    pub quantity: f64,
    pub required_experience: String,
    pub unit_price: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Machinery {
    #[serde(rename = "type")]
    pub kind: String,
    pub quantity: f64,
    pub capacity: String,
    pub unit_price: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Equipment {
    #[serde(rename = "type")]
    pub kind: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_cost: f64,
}

// ═══════════════════════════════════════════════════════════
// Risk management (Ley 1523 de 2012)
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UngrdAnalysis {
    pub knowledge: RiskKnowledge,
    pub reduction: RiskReduction,
    pub management: DisasterManagement,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RiskKnowledge {
    pub has_risk_analysis: bool,
    pub scenarios_identified: Vec<String>,
    pub observation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep_analysis: Option<KnowledgeDeepAnalysis>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RiskReduction {
    pub primary_process: PrimaryProcess,
    pub technical_concept: TechnicalConcept,
    pub corrective: CorrectiveIntervention,
    pub prospective: ProspectiveIntervention,
    pub financial_protection: FinancialProtection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CorrectiveIntervention {
    pub has_mitigation_works: bool,
    pub is_bioengineering: bool,
    pub threat_type: String,
    pub work_type: String,
    pub beneficiaries: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep_forensic_analysis: Option<CorrectiveDeepAnalysis>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProspectiveIntervention {
    #[serde(rename = "alignsWithPOT")]
    pub aligns_with_pot: bool,
    pub has_climate_change_adaptation: bool,
    pub has_early_warning_system: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pot_analysis: Option<PotAnalysis>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FinancialProtection {
    pub has_public_asset_insurance: bool,
    pub has_retention_mechanism: bool,
    pub observation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep_analysis: Option<FinancialProtectionDeepAnalysis>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DisasterManagement {
    pub has_contingency_plan: bool,
    pub protocols: Vec<String>,
    pub observation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep_analysis: Option<ManagementDeepAnalysis>,
}

// ═══════════════════════════════════════════════════════════
// Indicators
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectKpis {
    /// Cost performance index.
    pub cpi: f64,
    /// Schedule performance index.
    pub spi: f64,
    pub estimated_daily_overhead: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected_completion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financial_health: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub van: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tir: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bc_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub burn_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_variance: Option<f64>,
}

impl Default for ProjectKpis {
    fn default() -> Self {
        Self {
            cpi: 1.0,
            spi: 1.0,
            estimated_daily_overhead: 0.0,
            projected_completion: None,
            financial_health: None,
            van: None,
            tir: None,
            bc_ratio: None,
            burn_rate: None,
            cost_variance: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectAlert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
}

// ═══════════════════════════════════════════════════════════
// Social ecosystem
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SocialEcosystem {
    pub direct_jobs: f64,
    pub indirect_jobs: f64,
    pub beneficiaries: f64,
    pub beneficiary_description: String,
    pub demographic_highlight: String,
    pub social_return_score: f64,
    pub social_return_quote: String,
    pub social_risks: Vec<String>,
    pub actors: Vec<ProjectActor>,
    pub target_population: TargetPopulation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectActor {
    pub name: String,
    pub role: String,
    pub category: ActorCategory,
    pub impact_level: Intensity,
    pub interest: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TargetPopulation {
    pub description: String,
    pub characteristics: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn baseline_defaults() {
        let p = ProjectData::baseline();
        assert_eq!(p.project_phase, ProjectPhase::Formulation);
        assert_eq!(p.project_type, ProjectType::Infrastructure);
        assert_eq!(p.kpis.cpi, 1.0);
        assert_eq!(p.kpis.spi, 1.0);
        assert_eq!(p.kpis.estimated_daily_overhead, 0.0);
        assert_eq!(
            p.ungrd_analysis.reduction.primary_process,
            PrimaryProcess::Corrective
        );
        assert_eq!(
            p.ungrd_analysis.reduction.technical_concept,
            TechnicalConcept::NotViable
        );
        assert_eq!(p.location, GeoLocation::default());
        assert!(p.milestones.is_empty());
        assert!(p.evolution_history.is_empty());
    }

    #[test]
    fn baseline_serializes_camel_case() {
        let value = serde_json::to_value(ProjectData::baseline()).unwrap();
        assert_eq!(value["projectPhase"], "Formulation");
        assert_eq!(value["totalBudget"], 0.0);
        assert_eq!(value["kpis"]["cpi"], 1.0);
        assert_eq!(
            value["ungrdAnalysis"]["reduction"]["primaryProcess"],
            "Intervención Correctiva"
        );
        assert_eq!(value["ungrdAnalysis"]["reduction"]["technicalConcept"], "No Viable");
        assert!(value["socialEcosystem"]["actors"].as_array().unwrap().is_empty());
    }

    #[test]
    fn partial_milestone_decodes() {
        let m: ProjectMilestone = serde_json::from_value(json!({
            "code": "2.1",
            "description": "Excavación",
            "status": "in-progress",
            "isSPF": true,
            "financialType": "CAPEX"
        }))
        .unwrap();
        assert_eq!(m.code.as_deref(), Some("2.1"));
        assert_eq!(m.status, MilestoneStatus::InProgress);
        assert!(m.is_spf);
        assert_eq!(m.financial_type, Some(FinancialType::Capex));
        assert!(!m.is_critical_path);
    }

    #[test]
    fn financial_progress_and_spf_count() {
        let mut p = ProjectData::baseline();
        assert_eq!(p.financial_progress(), 0.0);
        p.total_budget = 200.0;
        p.spent_budget = 50.0;
        assert_eq!(p.financial_progress(), 25.0);

        p.risks.push(RiskItem {
            is_spf: true,
            ..RiskItem::default()
        });
        p.milestones.push(ProjectMilestone {
            is_spf: true,
            ..ProjectMilestone::default()
        });
        p.milestones.push(ProjectMilestone::default());
        assert_eq!(p.spf_count(), 2);
    }
}
