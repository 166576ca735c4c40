use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::Instrument;
use uuid::Uuid;

use super::context::AuditContext;
use super::dispatch::{dispatch, FallbackEvent};
use super::merge::strip_nulls;
use super::salvage::{salvage_json, SalvageTier};
use super::types::GenerationRequest;
use super::AuditError;

/// Decoded answer of one structured call.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Always a JSON object; `{}` when nothing could be decoded.
    pub value: Value,
    pub salvage: SalvageTier,
    /// False when the salvaged text failed to decode into an object.
    pub decoded: bool,
    /// Required schema properties that were absent or null.
    pub validation_gaps: Vec<String>,
    pub model: String,
    pub fallback: Option<FallbackEvent>,
}

impl Extraction {
    /// Decode into a typed record, falling back to its default when the
    /// object does not fit. Nulls are dropped first so they read as absent.
    pub fn into_typed<T: DeserializeOwned + Default>(self) -> T {
        decode_typed(self.value)
    }
}

pub fn decode_typed<T: DeserializeOwned + Default>(mut value: Value) -> T {
    strip_nulls(&mut value);
    serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::warn!(
            target_type = std::any::type_name::<T>(),
            error = %e,
            "Decoded object does not fit record, using defaults"
        );
        T::default()
    })
}

/// Parse salvaged text as a JSON object. Anything else yields `{}`.
pub fn decode_object(text: &str) -> (Value, bool) {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) => (value, true),
        Ok(other) => {
            tracing::warn!(kind = json_kind(&other), "Decoded answer is not an object");
            (Value::Object(Map::new()), false)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Salvaged answer failed to decode");
            (Value::Object(Map::new()), false)
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Dispatch, salvage, decode.
///
/// Only dispatch failures are errors. Malformed answers degrade to `{}`.
pub async fn extract(
    ctx: &AuditContext,
    model: &str,
    request: &GenerationRequest,
) -> Result<Extraction, AuditError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("extract", %request_id, model);

    async move {
        let dispatched = dispatch(ctx, model, request).await?;
        let salvaged = salvage_json(&dispatched.response.text);
        let (value, decoded) = decode_object(salvaged.text);

        let validation_gaps = request
            .schema
            .as_ref()
            .map(|schema| schema.missing_required(&value))
            .unwrap_or_default();
        if !validation_gaps.is_empty() {
            tracing::warn!(gaps = ?validation_gaps, "Answer is missing required fields");
        }

        tracing::info!(
            served_by = %dispatched.model,
            tier = salvaged.tier.as_str(),
            decoded,
            "Extraction complete"
        );

        Ok(Extraction {
            value,
            salvage: salvaged.tier,
            decoded,
            validation_gaps,
            model: dispatched.model,
            fallback: dispatched.fallback,
        })
    }
    .instrument(span)
    .await
}

/// Typed front-end over [`extract`].
pub async fn extract_as<T: DeserializeOwned + Default>(
    ctx: &AuditContext,
    model: &str,
    request: &GenerationRequest,
) -> Result<T, AuditError> {
    Ok(extract(ctx, model, request).await?.into_typed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::gemini::{MockClient, MockReply};
    use crate::pipeline::schema::Schema;
    use crate::pipeline::ServiceError;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Arc;

    fn ctx(client: MockClient) -> AuditContext {
        AuditContext::new(Arc::new(client))
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default, rename_all = "camelCase")]
    struct Probe {
        root_cause: String,
        probability_of_resolution: f64,
    }

    #[tokio::test]
    async fn verbatim_answer_decodes() {
        let ctx = ctx(MockClient::new(r#"{"a":1}"#));
        let out = extract(&ctx, "m", &GenerationRequest::prompt("x")).await.unwrap();
        assert_eq!(out.value, json!({ "a": 1 }));
        assert_eq!(out.salvage, SalvageTier::Verbatim);
        assert!(out.decoded);
    }

    #[tokio::test]
    async fn fenced_answer_decodes() {
        let ctx = ctx(MockClient::new("Here you go:\n```json\n{\"a\":1}\n```\nThanks"));
        let out = extract(&ctx, "m", &GenerationRequest::prompt("x")).await.unwrap();
        assert_eq!(out.value, json!({ "a": 1 }));
        assert_eq!(out.salvage, SalvageTier::FencedBlock);
    }

    #[tokio::test]
    async fn unparseable_brace_span_becomes_empty_object() {
        let ctx = ctx(MockClient::new("prefix {broken json here} suffix"));
        let out = extract(&ctx, "m", &GenerationRequest::prompt("x")).await.unwrap();
        assert_eq!(out.value, json!({}));
        assert_eq!(out.salvage, SalvageTier::BraceSpan);
        assert!(!out.decoded);
    }

    #[tokio::test]
    async fn non_object_answer_becomes_empty_object() {
        let ctx = ctx(MockClient::new("[1,2,3]"));
        let out = extract(&ctx, "m", &GenerationRequest::prompt("x")).await.unwrap();
        assert_eq!(out.value, json!({}));
        assert!(!out.decoded);
    }

    #[tokio::test]
    async fn empty_answer_is_empty_object() {
        let ctx = ctx(MockClient::new(""));
        let out = extract(&ctx, "m", &GenerationRequest::prompt("x")).await.unwrap();
        assert_eq!(out.value, json!({}));
        assert_eq!(out.salvage, SalvageTier::Empty);
        assert!(out.decoded);
    }

    #[tokio::test]
    async fn dispatch_failure_propagates() {
        let ctx = ctx(MockClient::failing(ServiceError::Connection("x".into())));
        let err = extract(&ctx, "m", &GenerationRequest::prompt("x")).await.unwrap_err();
        assert!(matches!(err, AuditError::ServiceUnavailable { .. }));
    }

    #[tokio::test]
    async fn reports_validation_gaps_without_rejecting() {
        let schema = Schema::object([
            ("projectName", Schema::string()),
            ("totalBudget", Schema::number()),
        ])
        .with_required(&["projectName", "totalBudget"]);
        let ctx = ctx(MockClient::new(r#"{"projectName":"Muro"}"#));
        let request = GenerationRequest::prompt("x").with_schema(schema);

        let out = extract(&ctx, "m", &request).await.unwrap();
        assert_eq!(out.validation_gaps, vec!["totalBudget"]);
        assert_eq!(out.value, json!({ "projectName": "Muro" }));
    }

    #[tokio::test]
    async fn records_fallback_on_outcome() {
        let client = MockClient::new(r#"{"a":1}"#)
            .with_model("primary", MockReply::Fail(ServiceError::HttpClient("x".into())));
        let ctx = ctx(client);
        let out = extract(&ctx, "primary", &GenerationRequest::prompt("x")).await.unwrap();
        assert_eq!(out.model, crate::config::FALLBACK_MODEL);
        assert_eq!(out.fallback.unwrap().failed_model, "primary");
    }

    #[tokio::test]
    async fn typed_front_end_fills_defaults() {
        let ctx = ctx(MockClient::new(r#"{"rootCause":"Falta de licencia","extra":true}"#));
        let probe: Probe = extract_as(&ctx, "m", &GenerationRequest::prompt("x")).await.unwrap();
        assert_eq!(probe.root_cause, "Falta de licencia");
        assert_eq!(probe.probability_of_resolution, 0.0);
    }

    #[test]
    fn typed_decode_treats_null_as_absent() {
        let probe: Probe = decode_typed(json!({ "rootCause": null, "probabilityOfResolution": 40 }));
        assert_eq!(probe.root_cause, "");
        assert_eq!(probe.probability_of_resolution, 40.0);
    }

    #[test]
    fn typed_decode_mismatch_gives_default() {
        let probe: Probe = decode_typed(json!({ "probabilityOfResolution": "alta" }));
        assert_eq!(probe, Probe::default());
    }
}
