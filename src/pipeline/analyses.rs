//! Deep-analysis extractors.
//!
//! Every topic is data: a prompt, a schema and optionally a piece of evidence.
//! A single generic runner sends it through the extraction pipeline and
//! decodes the answer into the topic's record type.

use serde::de::DeserializeOwned;
use serde_json::json;

use super::context::AuditContext;
use super::evidence::Evidence;
use super::extraction::extract;
use super::prompt::SYSTEM_INSTRUCTION;
use super::schema::Schema;
use super::types::{ContentPart, GenerationRequest};
use super::AuditError;
use crate::config::STRUCTURED_TEMPERATURE;
use crate::models::analysis::{
    ActivityDeepAnalysis, BottleneckDeepAnalysis, ContractorProfile, CorrectiveDeepAnalysis,
    CriticalPathAnalysis, CriticalPathResponse, CriticalPathUpdate, FinancialDeepAnalysis,
    FinancialProtectionDeepAnalysis, KnowledgeDeepAnalysis, LegalDocument,
    ManagementDeepAnalysis, PmbokAnalysis, PmbokDeepAnalysis, PotAnalysis, ResourceAnalysis,
    ScheduleDeepAnalysis, SpfDeepAnalysis,
};
use crate::models::enums::{
    ActorCategory, CommandClarity, DocumentKind, Intensity, PrincipleStatus, Priority,
    ProjectedStatus, ResourceType, StepStatus,
};
use crate::models::project::{Bottleneck, ProjectData, ProjectMilestone, SocialEcosystem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisTopic {
    FinancialProtection,
    Bottleneck,
    SinglePointOfFailure,
    AdministrativeDocument,
    ResourceSufficiency,
    Financial,
    ContractorRisk,
    Corrective,
    CriticalPath,
    Activity,
    RiskKnowledge,
    DisasterManagement,
    LandUsePlan,
    Pmbok,
    PmbokPrinciple,
    SocialEcosystem,
    Schedule,
}

impl AnalysisTopic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FinancialProtection => "financial_protection",
            Self::Bottleneck => "bottleneck",
            Self::SinglePointOfFailure => "single_point_of_failure",
            Self::AdministrativeDocument => "administrative_document",
            Self::ResourceSufficiency => "resource_sufficiency",
            Self::Financial => "financial",
            Self::ContractorRisk => "contractor_risk",
            Self::Corrective => "corrective",
            Self::CriticalPath => "critical_path",
            Self::Activity => "activity",
            Self::RiskKnowledge => "risk_knowledge",
            Self::DisasterManagement => "disaster_management",
            Self::LandUsePlan => "land_use_plan",
            Self::Pmbok => "pmbok",
            Self::PmbokPrinciple => "pmbok_principle",
            Self::SocialEcosystem => "social_ecosystem",
            Self::Schedule => "schedule",
        }
    }
}

/// One deep-analysis call, fully described.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub topic: AnalysisTopic,
    pub prompt: String,
    pub schema: Schema,
    pub evidence: Option<Evidence>,
}

impl AnalysisRequest {
    pub fn new(topic: AnalysisTopic, prompt: String, schema: Schema) -> Self {
        Self {
            topic,
            prompt,
            schema,
            evidence: None,
        }
    }

    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence = Some(evidence);
        self
    }

    pub fn to_generation_request(&self) -> GenerationRequest {
        let mut parts = Vec::with_capacity(2);
        if let Some(evidence) = &self.evidence {
            parts.push(evidence.to_part());
        }
        parts.push(ContentPart::Text(self.prompt.clone()));

        GenerationRequest::from_parts(parts)
            .with_system(SYSTEM_INSTRUCTION)
            .with_temperature(STRUCTURED_TEMPERATURE)
            .with_schema(self.schema.clone())
    }
}

/// Run any deep analysis. Malformed answers decode to `T::default()`.
pub async fn run_analysis<T>(ctx: &AuditContext, request: AnalysisRequest) -> Result<T, AuditError>
where
    T: DeserializeOwned + Default,
{
    let generation = request.to_generation_request();
    tracing::debug!(topic = request.topic.as_str(), "Running deep analysis");
    let extraction = extract(ctx, &ctx.models.analysis, &generation).await?;
    Ok(extraction.into_typed())
}

// ──────────────────────────────────────────────
// Topic requests
// ──────────────────────────────────────────────

pub fn financial_protection_request(project: &ProjectData) -> Result<AnalysisRequest, AuditError> {
    let risks: Vec<_> = project.risks.iter().take(10).collect();
    let context = serde_json::to_string(&json!({
        "projectName": project.project_name,
        "budget": project.total_budget,
        "risks": risks,
        "location": project.location,
    }))?;
    let prompt = format!(
        "ROL: subdirector de reducción del riesgo (UNGRD), experto en aseguramiento.\n\
         TAREA: estructurar la transferencia del riesgo según la Guía de Aseguramiento de Bienes \
         Inmuebles Públicos (metodología de 5 pasos).\nCONTEXTO: {context}\n\
         Genera un análisis JSON estricto para los 5 pasos."
    );
    let step = Schema::object([
        ("stepNumber", Schema::number()),
        ("title", Schema::string()),
        ("status", StepStatus::schema()),
        ("description", Schema::string()),
        ("actionItems", Schema::string_list()),
        ("kpi", Schema::string()),
    ]);
    let schema = Schema::object([
        ("efficiencyScore", Schema::number()),
        ("overallStrategy", Schema::string()),
        ("steps", Schema::array(step)),
    ])
    .with_required(&["efficiencyScore", "overallStrategy", "steps"]);
    Ok(AnalysisRequest::new(AnalysisTopic::FinancialProtection, prompt, schema))
}

pub fn bottleneck_request(bottleneck: &Bottleneck, project: &ProjectData) -> AnalysisRequest {
    let prompt = format!(
        "Analiza este cuello de botella: \"{}: {}\". Proyecto: {}. Identifica la causa raíz, el \
         marco legal colombiano aplicable (Ley 80 de 1993, Ley 1150 de 2007, etc.), el impacto \
         financiero y las acciones estratégicas.",
        bottleneck.process_name, bottleneck.description, project.project_name
    );
    let schema = Schema::object([
        ("rootCause", Schema::string()),
        ("legalFramework", Schema::string()),
        ("financialImpactEstimate", Schema::string()),
        ("strategicActions", Schema::string_list()),
        ("probabilityOfResolution", Schema::number()),
    ]);
    AnalysisRequest::new(AnalysisTopic::Bottleneck, prompt, schema)
}

pub fn spf_request(item_description: &str, project: &ProjectData) -> AnalysisRequest {
    let prompt = format!(
        "Metodología de punto único de fallo (SPF) aplicada a gestión del riesgo. Analiza el \
         punto crítico: \"{item_description}\". Proyecto: {}. Ubicación: {}. Entrega diagnóstico \
         del SPF, modo de fallo, estrategia de redundancia, protocolo de pruebas, plan de \
         contingencia, probabilidad de catástrofe (0-100) e impacto en beneficiarios.",
        project.project_name, project.location.municipality
    );
    let schema = Schema::object([
        ("spfDiagnosis", Schema::string()),
        ("failureMode", Schema::string()),
        ("redundancyStrategy", Schema::string()),
        ("testingProtocol", Schema::string()),
        ("contingencyPlan", Schema::string()),
        ("catastropheProbability", Schema::number()),
        ("impactBeneficiaries", Schema::string()),
    ]);
    AnalysisRequest::new(AnalysisTopic::SinglePointOfFailure, prompt, schema)
}

pub fn administrative_document_request(
    bottleneck: &Bottleneck,
    kind: DocumentKind,
    project: &ProjectData,
) -> AnalysisRequest {
    let prompt = format!(
        "Redacta un documento administrativo de tipo \"{}\" para destrabar: \"{}\". Proyecto: {}. \
         Contratista: {}. Debe ser formal, jurídicamente sólido y listo para firma.",
        kind.as_str(),
        bottleneck.process_name,
        project.project_name,
        project.contractor
    );
    let schema = Schema::object([
        ("title", Schema::string()),
        ("content", Schema::string()),
        ("recipient", Schema::string()),
    ]);
    AnalysisRequest::new(AnalysisTopic::AdministrativeDocument, prompt, schema)
}

pub fn resource_sufficiency_request(project: &ProjectData) -> AnalysisRequest {
    let prompt = format!(
        "Audita la suficiencia de recursos del proyecto \"{}\" con presupuesto {}. Determina si \
         el personal y la maquinaria son adecuados para el alcance descrito.",
        project.project_name, project.total_budget
    );
    let technology = Schema::object([
        ("name", Schema::string()),
        ("application", Schema::string()),
        ("benefit", Schema::string()),
    ]);
    let schema = Schema::object([
        ("sufficiencyAssessment", Schema::string()),
        ("personnelRecommendations", Schema::string_list()),
        ("machineryRecommendations", Schema::string_list()),
        ("technologySuggestions", Schema::array(technology)),
        ("efficiencyScore", Schema::number()),
    ]);
    AnalysisRequest::new(AnalysisTopic::ResourceSufficiency, prompt, schema)
}

pub fn financial_request(project: &ProjectData) -> AnalysisRequest {
    let prompt = format!(
        "Realiza una auditoría financiera forense predictiva del proyecto \"{}\". Presupuesto: {}, \
         ejecutado: {}.\n\
         Calcula además la paridad de poder adquisitivo Colombia vs. EE. UU. con el índice Big Mac \
         (precio local aprox. 22900 COP, precio en EE. UU. aprox. 6.12 USD): tasa implícita, \
         comparación con la TRM vigente, sobre o subvaluación del peso y su efecto en la \
         importación de materiales del proyecto.",
        project.project_name, project.total_budget, project.spent_budget
    );
    let forecast = Schema::object([
        ("eac", Schema::number()),
        ("vac", Schema::number()),
        ("projectedStatus", ProjectedStatus::schema()),
    ]);
    let discrepancy = Schema::object([
        ("activityName", Schema::string()),
        ("budgetedAmount", Schema::number()),
        ("executionCost", Schema::number()),
        ("variance", Schema::string()),
    ]);
    let concatenation = Schema::object([
        ("budgetVsExecutionGap", Schema::string()),
        ("flaggedDiscrepancies", Schema::array(discrepancy)),
    ]);
    let strategy = Schema::object([
        ("title", Schema::string()),
        ("impact", Schema::string()),
        ("action", Schema::string()),
    ]);
    let risk_item = Schema::object([
        ("item", Schema::string()),
        ("riskLevel", Schema::string()),
        ("reason", Schema::string()),
    ]);
    let big_mac = Schema::object([
        ("localCurrencyCode", Schema::string()),
        ("localPrice", Schema::number()),
        ("dollarPrice", Schema::number()),
        ("impliedExchangeRate", Schema::number()),
        ("actualExchangeRate", Schema::number()),
        ("currencyValuationPercent", Schema::number()),
        ("description", Schema::string()),
        ("purchasingPowerParityAction", Schema::string()),
    ]);
    let schema = Schema::object([
        ("healthScore", Schema::number()),
        ("diagnosis", Schema::string()),
        ("forecast", forecast),
        ("concatenationAnalysis", concatenation),
        ("optimizationStrategies", Schema::array(strategy)),
        ("riskItems", Schema::array(risk_item)),
        ("bigMacIndex", big_mac),
    ]);
    AnalysisRequest::new(AnalysisTopic::Financial, prompt, schema)
}

pub fn contractor_risk_request(project: &ProjectData) -> AnalysisRequest {
    let prompt = format!(
        "Elabora un perfil forense de riesgo del contratista \"{}\" (NIT: {}). Evalúa capacidad \
         financiera, experiencia probable y riesgos de corrupción o incumplimiento.",
        project.contractor, project.nit
    );
    let schema = Schema::object([
        ("name", Schema::string()),
        ("nit", Schema::string()),
        ("suitabilityScore", Schema::number()),
        ("kCapacity", Schema::string()),
        ("financialHealth", Schema::string()),
        ("disbursementRisk", Schema::string()),
        ("disbursementRationale", Schema::string()),
        ("redFlags", Schema::string_list()),
        ("summary", Schema::string()),
    ]);
    AnalysisRequest::new(AnalysisTopic::ContractorRisk, prompt, schema)
}

pub fn corrective_request(project: &ProjectData) -> AnalysisRequest {
    let prompt = format!(
        "Evaluación técnica forense de la intervención correctiva en \"{}\". Analiza idoneidad \
         técnica, vulnerabilidad y alternativas de ingeniería.",
        project.project_name
    );
    let checks = Schema::object([
        ("budgetSufficiency", Schema::string()),
        ("timelineFeasibility", Schema::string()),
        ("regulatoryCompliance", Schema::string()),
    ]);
    let alternative = Schema::object([
        ("solutionName", Schema::string()),
        ("description", Schema::string()),
        ("pros", Schema::string_list()),
        ("cons", Schema::string_list()),
        ("estimatedCostImpact", Schema::string()),
        ("resilienceScore", Schema::number()),
    ]);
    let schema = Schema::object([
        ("threatDiagnosis", Schema::string()),
        ("engineeringSolutionAudit", Schema::string()),
        ("transversalChecks", checks),
        ("vulnerabilityAssessment", Schema::string()),
        ("technicalRigorScore", Schema::number()),
        ("riskOfFailure", Schema::string()),
        ("holisticRecommendations", Schema::string_list()),
        ("alternativeSolutions", Schema::array(alternative)),
        ("resourceOptimizationAudit", Schema::string()),
        ("costBenefitAnalysis", Schema::string()),
    ]);
    AnalysisRequest::new(AnalysisTopic::Corrective, prompt, schema)
}

pub fn critical_path_request(
    milestones: &[ProjectMilestone],
    project_name: &str,
) -> Result<AnalysisRequest, AuditError> {
    let activities: Vec<_> = milestones
        .iter()
        .map(|m| {
            json!({
                "code": m.code,
                "desc": m.description,
                "dates": [m.start_date, m.end_date],
            })
        })
        .collect();
    let input = serde_json::to_string(&activities)?;
    let prompt = format!(
        "Calcula la ruta crítica (CPM) de las actividades del proyecto \"{project_name}\". \
         Identifica actividades críticas, dependencias lógicas, fechas estimadas y recursos \
         inferidos. Actividades: {input}"
    );
    let resource = Schema::object([
        ("name", Schema::string()),
        ("quantity", Schema::number()),
        ("unit", Schema::string()),
        ("type", ResourceType::schema()),
    ]);
    let update = Schema::object([
        ("code", Schema::string()),
        ("isCriticalPath", Schema::boolean()),
        ("criticalPathReasoning", Schema::string()),
        ("inferredResources", Schema::array(resource)),
    ]);
    let schema = Schema::object([
        ("analysisSummary", Schema::string()),
        ("updatedMilestones", Schema::array(update)),
    ]);
    Ok(AnalysisRequest::new(AnalysisTopic::CriticalPath, prompt, schema))
}

/// Fold critical-path flags back into the milestones.
///
/// An update matches a milestone when its code equals the milestone's code
/// or appears in the milestone's description. Updates with an empty code
/// match nothing. Fields the update omits keep the milestone's value.
/// Unmatched milestones are returned unchanged.
pub fn apply_critical_path(
    milestones: &[ProjectMilestone],
    response: CriticalPathResponse,
) -> CriticalPathAnalysis {
    let find = |m: &ProjectMilestone| -> Option<&CriticalPathUpdate> {
        response.updated_milestones.iter().find(|u| {
            !u.code.is_empty()
                && (m.code.as_deref() == Some(u.code.as_str()) || m.description.contains(&u.code))
        })
    };

    let updated = milestones
        .iter()
        .map(|m| match find(m) {
            Some(update) => ProjectMilestone {
                code: Some(update.code.clone()),
                is_critical_path: update.is_critical_path.unwrap_or(m.is_critical_path),
                critical_path_reasoning: update
                    .critical_path_reasoning
                    .clone()
                    .or_else(|| m.critical_path_reasoning.clone()),
                inferred_resources: update
                    .inferred_resources
                    .clone()
                    .unwrap_or_else(|| m.inferred_resources.clone()),
                ..m.clone()
            },
            None => m.clone(),
        })
        .collect();

    CriticalPathAnalysis {
        analysis_summary: response.analysis_summary.clone(),
        updated_milestones: updated,
    }
}

pub fn activity_request(milestone: &ProjectMilestone, project: &ProjectData) -> AnalysisRequest {
    let prompt = format!(
        "Ingeniería de valor para la actividad \"{}\". Proyecto: {}. Ubicación: {}. Entrega la \
         estrategia de optimización técnica, tecnologías modernas aplicables, riesgos de \
         ejecución y la ganancia de eficiencia cuantificada.",
        milestone.description, project.project_name, project.location.municipality
    );
    let technology = Schema::object([("name", Schema::string()), ("benefit", Schema::string())]);
    let schema = Schema::object([
        ("optimizationStrategy", Schema::string()),
        ("suggestedTechnologies", Schema::array(technology)),
        ("specificExecutionRisks", Schema::string_list()),
        ("efficiencyGainEstimate", Schema::string()),
    ]);
    AnalysisRequest::new(AnalysisTopic::Activity, prompt, schema)
}

pub fn knowledge_request(project: &ProjectData) -> AnalysisRequest {
    let prompt = format!(
        "Análisis de conocimiento del riesgo (Ley 1523 de 2012) para \"{}\". Evalúa los estudios \
         técnicos, los vacíos de información y las alternativas de modelamiento y monitoreo.",
        project.project_name
    );
    let gap = Schema::object([
        ("gap", Schema::string()),
        ("criticality", Priority::schema()),
        ("impact", Schema::string()),
        ("actionPlan", Schema::string()),
    ]);
    let alternative = Schema::object([
        ("name", Schema::string()),
        ("type", Schema::string()),
        ("estimatedCost", Schema::string()),
    ]);
    let schema = Schema::object([
        ("overallKnowledgeScore", Schema::number()),
        ("riskCharacterization", Schema::string()),
        ("criticalDataGaps", Schema::array(gap)),
        ("modelingAlternatives", Schema::array(alternative.clone())),
        ("monitoringAlternatives", Schema::array(alternative)),
    ]);
    AnalysisRequest::new(AnalysisTopic::RiskKnowledge, prompt, schema)
}

pub fn management_request(project: &ProjectData) -> AnalysisRequest {
    let prompt = format!(
        "Evalúa la preparación para la respuesta a desastres del proyecto \"{}\": plan de \
         contingencia, protocolos de evacuación, cadena de mando, logística y comunicaciones.",
        project.project_name
    );
    let strengths = || {
        Schema::object([
            ("strengths", Schema::string_list()),
            ("weaknesses", Schema::string_list()),
        ])
    };
    let command = Schema::object([
        ("clarity", CommandClarity::schema()),
        ("recommendations", Schema::string_list()),
    ]);
    let schema = Schema::object([
        ("preparednessScore", Schema::number()),
        ("contingencyPlanAudit", Schema::string()),
        ("evacuationProtocols", strengths()),
        ("commandChain", command),
        ("responseLogistics", strengths()),
        ("communicationSystemsAudit", Schema::string()),
        ("actionableRecommendations", Schema::string_list()),
    ]);
    AnalysisRequest::new(AnalysisTopic::DisasterManagement, prompt, schema)
}

/// Land-use plan alignment; the plan itself travels as evidence.
pub fn land_use_plan_request(project: &ProjectData, plan: Evidence) -> AnalysisRequest {
    let prompt = format!(
        "Analiza si el proyecto \"{}\" cumple el Plan de Ordenamiento Territorial (POT) adjunto. \
         Identifica restricciones de uso del suelo, zonas de riesgo y cumplimiento normativo.",
        project.project_name
    );
    let finding = Schema::object([("issue", Schema::string()), ("mitigation", Schema::string())]);
    let schema = Schema::object([
        ("complianceScore", Schema::number()),
        ("landUseRestrictions", Schema::array(finding.clone())),
        ("riskZonesIdentified", Schema::array(finding)),
        ("recommendations", Schema::string_list()),
    ]);
    AnalysisRequest::new(AnalysisTopic::LandUsePlan, prompt, schema).with_evidence(plan)
}

pub fn pmbok_request(project: &ProjectData) -> AnalysisRequest {
    let prompt = format!(
        "Auditoría bajo el estándar PMI PMBOK 7. Evalúa los 12 principios de entrega de valor \
         para \"{}\" con puntaje de 0 a 100 por principio.",
        project.project_name
    );
    let principle = Schema::object([
        ("name", Schema::string()),
        ("englishName", Schema::string()),
        ("score", Schema::number()),
        ("status", PrincipleStatus::schema()),
        ("reasoning", Schema::string()),
    ]);
    let schema = Schema::object([
        ("overallObservation", Schema::string()),
        ("auditDate", Schema::string()),
        ("principles", Schema::array(principle)),
    ]);
    AnalysisRequest::new(AnalysisTopic::Pmbok, prompt, schema)
}

pub fn pmbok_principle_request(project: &ProjectData, principle: &str) -> AnalysisRequest {
    let prompt = format!(
        "Análisis a fondo del principio PMBOK 7 \"{principle}\" en el proyecto \"{}\": \
         diagnóstico, fortalezas, debilidades, pasos accionables, impacto en KPI y simulación \
         de consecuencias.",
        project.project_name
    );
    let schema = Schema::object([
        ("diagnosis", Schema::string()),
        ("strengths", Schema::string_list()),
        ("weaknesses", Schema::string_list()),
        ("actionableSteps", Schema::string_list()),
        ("kpiImpact", Schema::string()),
        ("consequenceSimulation", Schema::string()),
    ]);
    AnalysisRequest::new(AnalysisTopic::PmbokPrinciple, prompt, schema)
}

pub fn social_ecosystem_request(project: &ProjectData) -> AnalysisRequest {
    let prompt = format!(
        "ROL: analista socioeconómico. PROYECTO: \"{}\".\nTAREA: generar un mapa de actores \
         detallado (categoría Executor, Control, Beneficiario o Afectado; impacto Alto, Medio o \
         Bajo), empleos directos e indirectos, beneficiarios, población objetivo y análisis de \
         retorno social.",
        project.project_name
    );
    let population = Schema::object([
        ("description", Schema::string()),
        ("characteristics", Schema::string_list()),
    ]);
    let actor = Schema::object([
        ("name", Schema::string()),
        ("role", Schema::string()),
        ("category", ActorCategory::schema()),
        ("impactLevel", Intensity::schema()),
        ("interest", Schema::string()),
    ]);
    let schema = Schema::object([
        ("directJobs", Schema::number()),
        ("indirectJobs", Schema::number()),
        ("beneficiaries", Schema::number()),
        ("beneficiaryDescription", Schema::string()),
        ("demographicHighlight", Schema::string()),
        ("socialReturnScore", Schema::number()),
        ("socialReturnQuote", Schema::string()),
        ("socialRisks", Schema::string_list()),
        ("targetPopulation", population),
        ("actors", Schema::array(actor)),
    ]);
    AnalysisRequest::new(AnalysisTopic::SocialEcosystem, prompt, schema)
}

pub fn schedule_request(project: &ProjectData) -> AnalysisRequest {
    let prompt = format!(
        "Análisis de cronograma para \"{}\" (inicio {}, fin {}, avance {}%). Detecta desviaciones, \
         proyecta la fecha de terminación y sugiere estrategias de aceleración.",
        project.project_name, project.start_date, project.end_date, project.progress_percentage
    );
    let strategy = Schema::object([
        ("strategyName", Schema::string()),
        ("description", Schema::string()),
        ("impactDays", Schema::number()),
    ]);
    let schema = Schema::object([
        ("analysisDate", Schema::string()),
        ("projectedCompletionDate", Schema::string()),
        ("daysVariance", Schema::number()),
        ("timelineDiagnosis", Schema::string()),
        ("rootCauses", Schema::string_list()),
        ("acceleratorStrategies", Schema::array(strategy)),
        ("impactOnBudget", Schema::string()),
    ]);
    AnalysisRequest::new(AnalysisTopic::Schedule, prompt, schema)
}

// ──────────────────────────────────────────────
// Entry points
// ──────────────────────────────────────────────

pub async fn analyze_financial_protection(
    ctx: &AuditContext,
    project: &ProjectData,
) -> Result<FinancialProtectionDeepAnalysis, AuditError> {
    run_analysis(ctx, financial_protection_request(project)?).await
}

pub async fn analyze_bottleneck(
    ctx: &AuditContext,
    bottleneck: &Bottleneck,
    project: &ProjectData,
) -> Result<BottleneckDeepAnalysis, AuditError> {
    run_analysis(ctx, bottleneck_request(bottleneck, project)).await
}

pub async fn analyze_spf(
    ctx: &AuditContext,
    item_description: &str,
    project: &ProjectData,
) -> Result<SpfDeepAnalysis, AuditError> {
    run_analysis(ctx, spf_request(item_description, project)).await
}

pub async fn generate_administrative_document(
    ctx: &AuditContext,
    bottleneck: &Bottleneck,
    kind: DocumentKind,
    project: &ProjectData,
) -> Result<LegalDocument, AuditError> {
    run_analysis(ctx, administrative_document_request(bottleneck, kind, project)).await
}

pub async fn analyze_resource_sufficiency(
    ctx: &AuditContext,
    project: &ProjectData,
) -> Result<ResourceAnalysis, AuditError> {
    run_analysis(ctx, resource_sufficiency_request(project)).await
}

pub async fn analyze_financial(
    ctx: &AuditContext,
    project: &ProjectData,
) -> Result<FinancialDeepAnalysis, AuditError> {
    run_analysis(ctx, financial_request(project)).await
}

pub async fn analyze_contractor_risk(
    ctx: &AuditContext,
    project: &ProjectData,
) -> Result<ContractorProfile, AuditError> {
    run_analysis(ctx, contractor_risk_request(project)).await
}

pub async fn analyze_corrective(
    ctx: &AuditContext,
    project: &ProjectData,
) -> Result<CorrectiveDeepAnalysis, AuditError> {
    run_analysis(ctx, corrective_request(project)).await
}

pub async fn analyze_critical_path(
    ctx: &AuditContext,
    milestones: &[ProjectMilestone],
    project_name: &str,
) -> Result<CriticalPathAnalysis, AuditError> {
    let response: CriticalPathResponse =
        run_analysis(ctx, critical_path_request(milestones, project_name)?).await?;
    Ok(apply_critical_path(milestones, response))
}

pub async fn analyze_activity(
    ctx: &AuditContext,
    milestone: &ProjectMilestone,
    project: &ProjectData,
) -> Result<ActivityDeepAnalysis, AuditError> {
    run_analysis(ctx, activity_request(milestone, project)).await
}

pub async fn analyze_risk_knowledge(
    ctx: &AuditContext,
    project: &ProjectData,
) -> Result<KnowledgeDeepAnalysis, AuditError> {
    run_analysis(ctx, knowledge_request(project)).await
}

pub async fn analyze_disaster_management(
    ctx: &AuditContext,
    project: &ProjectData,
) -> Result<ManagementDeepAnalysis, AuditError> {
    run_analysis(ctx, management_request(project)).await
}

pub async fn analyze_land_use_plan(
    ctx: &AuditContext,
    project: &ProjectData,
    plan: Evidence,
) -> Result<PotAnalysis, AuditError> {
    run_analysis(ctx, land_use_plan_request(project, plan)).await
}

pub async fn analyze_pmbok(
    ctx: &AuditContext,
    project: &ProjectData,
) -> Result<PmbokAnalysis, AuditError> {
    run_analysis(ctx, pmbok_request(project)).await
}

pub async fn analyze_pmbok_principle(
    ctx: &AuditContext,
    project: &ProjectData,
    principle: &str,
) -> Result<PmbokDeepAnalysis, AuditError> {
    run_analysis(ctx, pmbok_principle_request(project, principle)).await
}

pub async fn analyze_social_ecosystem(
    ctx: &AuditContext,
    project: &ProjectData,
) -> Result<SocialEcosystem, AuditError> {
    run_analysis(ctx, social_ecosystem_request(project)).await
}

pub async fn analyze_schedule(
    ctx: &AuditContext,
    project: &ProjectData,
) -> Result<ScheduleDeepAnalysis, AuditError> {
    run_analysis(ctx, schedule_request(project)).await
}
