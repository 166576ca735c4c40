//! Prompt text sent to the generative service.
//!
//! All prompts are Spanish: the documents audited are Colombian public works
//! contracts and answers are shown to Spanish-speaking auditors.

use serde_json::json;

use crate::models::analysis::PmbokAnalysis;
use crate::models::project::{ProjectData, RiskItem};
use super::AuditError;

pub const SYSTEM_INSTRUCTION: &str = "Eres 'El Greko', auditor forense de infraestructura pública. \
Dominas la econometría de proyectos, el estándar PMI (PMBOK 7), la gestión del riesgo \
(ISO 31000, Ley 1523 de 2012) y el análisis de sistemas complejos con puntos únicos de fallo \
(SPF). Tu misión es proteger el patrimonio público con rigor técnico absoluto.";

pub const PROJECT_EXTRACTION_PROMPT: &str = r#"
ACTÚA COMO AUDITOR FORENSE INTEGRAL (TÉCNICO, FINANCIERO Y SOCIAL).

TAREA: extraer y analizar los datos del proyecto contenidos en el material adjunto.

1. Presupuesto / cantidades de obra: extrae los ítems y clasifícalos como CAPEX u OPEX.
2. Ecosistema social: actores, empleos directos e indirectos (estímalos si no son explícitos), beneficiarios.
3. Contrato: fechas, valores, ubicación y riesgos, marcando los puntos únicos de fallo (isSPF).

Responde solo con JSON válido. Si falta información, infiérela con criterio profesional o déjala vacía.
"#;

/// Prompt for an incremental progress update. Carries a compact snapshot of
/// the current project so the model can spot deltas.
pub fn build_update_prompt(current: &ProjectData) -> Result<String, AuditError> {
    let snapshot = serde_json::to_string(&json!({
        "name": current.project_name,
        "budget": current.total_budget,
        "progress": current.progress_percentage,
    }))?;

    Ok(format!(
        "ACTUALIZACIÓN DE PROYECTO (AUDITORÍA DE AVANCE).\n\
         Proyecto actual: {snapshot}.\n\
         Analiza la NUEVA información adjunta y determina: avances nuevos, cambios en fechas \
         y la bitácora forense de cambios (evolutionLog) con su veredicto de eficiencia.\n\
         Devuelve solo los campos actualizados."
    ))
}

/// Metrics rendered into the holistic report prompt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportContext {
    pub cpi: f64,
    pub spi: f64,
    pub financial_progress: f64,
    pub spf_count: usize,
    pub critical_risks: usize,
    pub active_bottlenecks: usize,
    pub pmbok_observation: Option<String>,
}

impl ReportContext {
    pub fn from_project(project: &ProjectData, pmbok: Option<&PmbokAnalysis>) -> Self {
        Self {
            cpi: project.kpis.cpi,
            spi: project.kpis.spi,
            financial_progress: project.financial_progress(),
            spf_count: project.spf_count(),
            critical_risks: project.risks.iter().filter(|r| r.is_critical()).count(),
            active_bottlenecks: project.bottlenecks.len(),
            pmbok_observation: pmbok
                .map(|p| p.overall_observation.clone())
                .filter(|o| !o.is_empty()),
        }
    }
}

const REPORT_SECTION_STYLE: &str = "color:#1e3a8a; border-bottom: 2px solid #1e3a8a;";

pub fn build_report_prompt(project: &ProjectData, ctx: &ReportContext) -> String {
    let cpi_note = if ctx.cpi < 1.0 { "(ALERTA: SOBRECOSTOS)" } else { "(Eficiente)" };
    let spi_note = if ctx.spi < 1.0 { "(ALERTA: RETRASO)" } else { "(A tiempo)" };
    let pmbok = ctx
        .pmbok_observation
        .as_deref()
        .unwrap_or("No auditado bajo PMBOK aún.");
    let h2 = |title: &str| format!("<h2 style=\"{REPORT_SECTION_STYLE}\">{title}</h2>");

    format!(
        r#"ROL: AUDITOR GENERAL DE LA REPÚBLICA, ESPECIALISTA EN INFRAESTRUCTURA.
TAREA: redactar un INFORME TÉCNICO DE AUDITORÍA FORENSE HOLÍSTICA en HTML profesional.

DATOS DEL PROYECTO:
- Nombre: {name}
- Contratista: {contractor}
- Presupuesto: ${budget}
- Ubicación: {municipality}

MÉTRICAS ECONOMÉTRICAS:
- CPI (eficiencia en costo): {cpi:.2} {cpi_note}
- SPI (eficiencia en tiempo): {spi:.2} {spi_note}
- Ejecución financiera: {financial:.1}%

RIESGOS SISTÉMICOS:
- Puntos únicos de fallo (SPF): {spfs} detectados.
- Riesgos críticos: {critical}
- Cuellos de botella activos: {bottlenecks}

ALINEACIÓN PMBOK 7:
{pmbok}

ESTRUCTURA OBLIGATORIA (usa estilos CSS en línea, tipografía serif y texto justificado):
{s1}
   Dictamen sobre viabilidad y salud del proyecto, en un párrafo para el Contralor.
{s2}
   Interpretación del CPI y SPI y proyección al cierre (Estimate at Completion).
{s3}
   Detalle de los puntos únicos de fallo y probabilidad de colapso operativo.
{s4}
   Bloqueos técnicos y su impacto en la ruta crítica.
{s5}
   Entre 3 y 5 recomendaciones obligatorias y la decisión final: continuar, intervenir o liquidar.

Sé técnico, crítico y preciso. No incluyas etiquetas <html> ni <body>, solo el contenido del informe."#,
        name = project.project_name,
        contractor = project.contractor,
        budget = project.total_budget,
        municipality = project.location.municipality,
        cpi = ctx.cpi,
        spi = ctx.spi,
        financial = ctx.financial_progress,
        spfs = ctx.spf_count,
        critical = ctx.critical_risks,
        bottlenecks = ctx.active_bottlenecks,
        s1 = h2("1. RESUMEN EJECUTIVO FORENSE"),
        s2 = h2("2. ANÁLISIS ECONOMÉTRICO Y FINANCIERO"),
        s3 = h2("3. MATRIZ DE RIESGOS SISTÉMICOS (SPF)"),
        s4 = h2("4. HALLAZGOS OPERATIVOS Y CUELLOS DE BOTELLA"),
        s5 = h2("5. VEREDICTO Y HOJA DE RUTA"),
    )
}

pub fn build_question_prompt(project: &ProjectData, question: &str) -> Result<String, AuditError> {
    let context = serde_json::to_string(&json!({
        "name": project.project_name,
        "budget": project.total_budget,
        "risks": project.risks,
        "status": project.progress_percentage,
    }))?;
    Ok(format!(
        "Contexto del proyecto: {context}.\nPregunta del usuario: \"{question}\".\n\
         Responde como consultor experto, de forma breve y directa."
    ))
}

pub fn build_mitigation_prompt(project: &ProjectData, risk: &RiskItem) -> String {
    format!(
        "Genera una estrategia de mitigación detallada (ISO 31000) para el riesgo: \"{}\" \
         (impacto: {}). Proyecto: {}.",
        risk.risk,
        risk.impact.as_str(),
        project.project_name
    )
}

pub fn build_search_prompt(project: &ProjectData) -> String {
    format!(
        "Busca noticias recientes, controversias, hallazgos fiscales o denuncias sobre el \
         proyecto \"{}\" del contratista \"{}\" en {}. Entrega un resumen ejecutivo.",
        project.project_name, project.contractor, project.location.municipality
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::RiskLevel;
    use crate::models::project::Bottleneck;

    fn project() -> ProjectData {
        let mut p = ProjectData::baseline();
        p.project_name = "Muro de contención".into();
        p.contractor = "Consorcio Guajira".into();
        p.total_budget = 1000.0;
        p.spent_budget = 250.0;
        p.progress_percentage = 36.0;
        p.location.municipality = "Uribia".into();
        p
    }

    #[test]
    fn update_prompt_embeds_snapshot() {
        let prompt = build_update_prompt(&project()).unwrap();
        assert!(prompt.contains(r#""name":"Muro de contención""#));
        assert!(prompt.contains(r#""progress":36.0"#));
        assert!(prompt.contains("evolutionLog"));
    }

    #[test]
    fn report_context_from_project() {
        let mut p = project();
        p.kpis.cpi = 0.9;
        p.risks.push(RiskItem {
            impact: RiskLevel::High,
            is_spf: true,
            ..RiskItem::default()
        });
        p.risks.push(RiskItem::default());
        p.bottlenecks.push(Bottleneck::default());

        let ctx = ReportContext::from_project(&p, None);
        assert_eq!(ctx.cpi, 0.9);
        assert_eq!(ctx.financial_progress, 25.0);
        assert_eq!(ctx.spf_count, 1);
        assert_eq!(ctx.critical_risks, 1);
        assert_eq!(ctx.active_bottlenecks, 1);
        assert!(ctx.pmbok_observation.is_none());
    }

    #[test]
    fn report_prompt_flags_inefficiency() {
        let ctx = ReportContext {
            cpi: 0.85,
            spi: 1.1,
            financial_progress: 25.0,
            ..ReportContext::default()
        };
        let prompt = build_report_prompt(&project(), &ctx);
        assert!(prompt.contains("0.85 (ALERTA: SOBRECOSTOS)"));
        assert!(prompt.contains("1.10 (A tiempo)"));
        assert!(prompt.contains("25.0%"));
        assert!(prompt.contains("No auditado bajo PMBOK aún."));
        assert!(prompt.contains("Uribia"));
    }

    #[test]
    fn report_prompt_uses_pmbok_observation() {
        let pmbok = PmbokAnalysis {
            overall_observation: "Gobernanza débil".into(),
            ..PmbokAnalysis::default()
        };
        let ctx = ReportContext::from_project(&project(), Some(&pmbok));
        assert!(build_report_prompt(&project(), &ctx).contains("Gobernanza débil"));
    }

    #[test]
    fn question_and_mitigation_prompts() {
        let q = build_question_prompt(&project(), "¿Hay sobrecostos?").unwrap();
        assert!(q.contains("¿Hay sobrecostos?"));
        assert!(q.contains(r#""status":36.0"#));

        let risk = RiskItem {
            risk: "Avenida torrencial".into(),
            impact: RiskLevel::High,
            ..RiskItem::default()
        };
        let m = build_mitigation_prompt(&project(), &risk);
        assert!(m.contains("Avenida torrencial"));
        assert!(m.contains("impacto: High"));
    }
}
