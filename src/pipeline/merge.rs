//! Field-level overlay of a decoded answer onto the project baseline.
//!
//! A field from the answer wins only when it is present, non-null and fits
//! the field's type. Anything else keeps the baseline value for exactly that
//! field, so the result is always a fully formed `ProjectData`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::project::ProjectData;

/// Merge a decoded extraction onto `baseline`.
pub fn merge_project(raw: &Value, baseline: &ProjectData) -> ProjectData {
    let empty = Map::new();
    let fields = raw.as_object().unwrap_or(&empty);
    let b = baseline;

    ProjectData {
        project_name: scalar(fields, "projectName", &b.project_name),
        contract_id: scalar(fields, "contractId", &b.contract_id),
        project_phase: scalar(fields, "projectPhase", &b.project_phase),
        project_type: scalar(fields, "projectType", &b.project_type),
        contractor: scalar(fields, "contractor", &b.contractor),
        nit: scalar(fields, "nit", &b.nit),
        general_objective: scalar(fields, "generalObjective", &b.general_objective),
        specific_objectives: sequence(fields, "specificObjectives", &b.specific_objectives),
        location: composite(fields, "location", &b.location),
        summary: scalar(fields, "summary", &b.summary),
        total_budget: scalar(fields, "totalBudget", &b.total_budget),
        spent_budget: scalar(fields, "spentBudget", &b.spent_budget),
        progress_percentage: scalar(fields, "progressPercentage", &b.progress_percentage),
        start_date: scalar(fields, "startDate", &b.start_date),
        end_date: scalar(fields, "endDate", &b.end_date),
        stakeholders: sequence(fields, "stakeholders", &b.stakeholders),
        insurance_policies: sequence(fields, "insurancePolicies", &b.insurance_policies),
        bottlenecks: sequence(fields, "bottlenecks", &b.bottlenecks),
        risks: sequence(fields, "risks", &b.risks),
        milestones: sequence(fields, "milestones", &b.milestones),
        budget_breakdown: sequence(fields, "budgetBreakdown", &b.budget_breakdown),
        financial_line_items: sequence(fields, "financialLineItems", &b.financial_line_items),
        resource_inventory: composite(fields, "resourceInventory", &b.resource_inventory),
        ungrd_analysis: composite(fields, "ungrdAnalysis", &b.ungrd_analysis),
        kpis: composite(fields, "kpis", &b.kpis),
        alerts: sequence(fields, "alerts", &b.alerts),
        evolution_history: sequence(fields, "evolutionHistory", &b.evolution_history),
        social_ecosystem: composite(fields, "socialEcosystem", &b.social_ecosystem),
    }
}

/// Present, non-null and well-typed, or the fallback.
pub(crate) fn scalar<T>(fields: &Map<String, Value>, key: &str, fallback: &T) -> T
where
    T: DeserializeOwned + Clone,
{
    match fields.get(key) {
        Some(value) if !value.is_null() => {
            let mut value = value.clone();
            strip_nulls(&mut value);
            serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::debug!(field = key, error = %e, "Field does not fit, keeping baseline");
                fallback.clone()
            })
        }
        _ => fallback.clone(),
    }
}

/// Nested object overlaid key by key onto the baseline's object.
pub(crate) fn composite<T>(fields: &Map<String, Value>, key: &str, base: &T) -> T
where
    T: Serialize + DeserializeOwned + Clone,
{
    let Some(Value::Object(raw)) = fields.get(key) else {
        return base.clone();
    };
    let Ok(Value::Object(mut merged)) = serde_json::to_value(base) else {
        return base.clone();
    };

    for (name, value) in raw {
        if value.is_null() {
            continue;
        }
        let mut value = value.clone();
        strip_nulls(&mut value);
        let previous = merged.insert(name.clone(), value);
        if serde_json::from_value::<T>(Value::Object(merged.clone())).is_err() {
            tracing::debug!(field = key, key = %name, "Nested key does not fit, keeping baseline");
            match previous {
                Some(old) => merged.insert(name.clone(), old),
                None => merged.remove(name),
            };
        }
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or_else(|_| base.clone())
}

/// Array decoded item by item; items that do not fit are skipped.
pub(crate) fn sequence<T>(fields: &Map<String, Value>, key: &str, base: &[T]) -> Vec<T>
where
    T: DeserializeOwned + Clone,
{
    let Some(Value::Array(items)) = fields.get(key) else {
        return base.to_vec();
    };

    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let mut item = item.clone();
        strip_nulls(&mut item);
        match serde_json::from_value::<T>(item) {
            Ok(parsed) => out.push(parsed),
            Err(e) => {
                tracing::debug!(field = key, index = i, error = %e, "Skipping item that does not fit");
            }
        }
    }
    out
}

/// Remove null members from objects, recursively, so they read as absent.
pub fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}
