//! Timeout-bounded call with a single fallback attempt.
//!
//! The preferred model gets one attempt raced against the configured
//! deadline. Any error or timeout moves to the fallback model, under the same
//! deadline. There is no further retry and no backoff.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use super::context::AuditContext;
use super::types::{GenerationRequest, GenerationResponse};
use super::{AuditError, ServiceError};
use crate::config::AbandonPolicy;

/// Record of a primary attempt that was given up on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FallbackEvent {
    pub failed_model: String,
    pub cause: String,
}

/// Successful cascade outcome.
#[derive(Debug, Clone)]
pub struct Dispatched {
    pub response: GenerationResponse,
    /// Model that produced the response.
    pub model: String,
    pub fallback: Option<FallbackEvent>,
}

impl Dispatched {
    pub fn used_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

pub async fn dispatch(
    ctx: &AuditContext,
    model: &str,
    request: &GenerationRequest,
) -> Result<Dispatched, AuditError> {
    let primary_error = match attempt(ctx, model, request).await {
        Ok(response) => {
            return Ok(Dispatched {
                response,
                model: model.to_string(),
                fallback: None,
            })
        }
        Err(e) => e,
    };

    let fallback_model = ctx.dispatch.fallback_model.as_str();
    tracing::warn!(
        model,
        fallback = fallback_model,
        error = %primary_error,
        "Primary model failed, retrying with fallback"
    );

    match attempt(ctx, fallback_model, request).await {
        Ok(response) => Ok(Dispatched {
            response,
            model: fallback_model.to_string(),
            fallback: Some(FallbackEvent {
                failed_model: model.to_string(),
                cause: primary_error.to_string(),
            }),
        }),
        Err(fallback_error) => {
            tracing::error!(
                model,
                fallback = fallback_model,
                primary_error = %primary_error,
                error = %fallback_error,
                "Fallback model failed"
            );
            Err(AuditError::ServiceUnavailable {
                primary: primary_error,
                fallback: fallback_error,
            })
        }
    }
}

async fn attempt(
    ctx: &AuditContext,
    model: &str,
    request: &GenerationRequest,
) -> Result<GenerationResponse, ServiceError> {
    let limit = ctx.dispatch.timeout;
    match ctx.dispatch.abandon {
        AbandonPolicy::Detach => {
            let client = Arc::clone(&ctx.client);
            let model = model.to_string();
            let request = request.clone();
            let call = tokio::spawn(async move { client.generate(&model, &request).await });
            // Dropping the JoinHandle on timeout leaves the task running.
            match tokio::time::timeout(limit, call).await {
                Ok(Ok(result)) => result,
                Ok(Err(join_error)) => Err(ServiceError::Aborted(join_error.to_string())),
                Err(_) => Err(timed_out(limit)),
            }
        }
        AbandonPolicy::Cancel => tokio::time::timeout(limit, ctx.client.generate(model, request))
            .await
            .unwrap_or_else(|_| Err(timed_out(limit))),
    }
}

fn timed_out(limit: Duration) -> ServiceError {
    ServiceError::Timeout(limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DispatchConfig;
    use crate::pipeline::gemini::{MockClient, MockReply};

    const PRIMARY: &str = "gemini-3-flash-preview";
    const FALLBACK: &str = "gemini-1.5-flash";

    fn context(client: Arc<MockClient>, abandon: AbandonPolicy) -> AuditContext {
        AuditContext::new(client).with_dispatch(DispatchConfig::default().with_abandon(abandon))
    }

    fn request() -> GenerationRequest {
        GenerationRequest::prompt("Analiza el contrato")
    }

    #[tokio::test]
    async fn primary_success_makes_one_call() {
        let client = Arc::new(MockClient::new(r#"{"a":1}"#));
        let ctx = context(client.clone(), AbandonPolicy::Detach);

        let out = dispatch(&ctx, PRIMARY, &request()).await.unwrap();
        assert_eq!(out.response.text, r#"{"a":1}"#);
        assert_eq!(out.model, PRIMARY);
        assert!(!out.used_fallback());
        assert_eq!(client.models_called(), vec![PRIMARY]);
    }

    #[tokio::test]
    async fn primary_error_falls_back_once() {
        let client = Arc::new(
            MockClient::new("fallback answer").with_model(
                PRIMARY,
                MockReply::Fail(ServiceError::Status {
                    status: 500,
                    body: "internal".into(),
                }),
            ),
        );
        let ctx = context(client.clone(), AbandonPolicy::Detach);

        let out = dispatch(&ctx, PRIMARY, &request()).await.unwrap();
        assert_eq!(out.response.text, "fallback answer");
        assert_eq!(out.model, FALLBACK);
        let event = out.fallback.unwrap();
        assert_eq!(event.failed_model, PRIMARY);
        assert!(event.cause.contains("500"));
        assert_eq!(client.models_called(), vec![PRIMARY, FALLBACK]);
    }

    #[tokio::test]
    async fn both_failures_are_service_unavailable() {
        let client = Arc::new(MockClient::failing(ServiceError::Connection(
            "http://localhost".into(),
        )));
        let ctx = context(client.clone(), AbandonPolicy::Detach);

        let err = dispatch(&ctx, PRIMARY, &request()).await.unwrap_err();
        assert!(matches!(err, AuditError::ServiceUnavailable { .. }));
        assert!(err.remediation_hint().is_some());
        // Never a third attempt.
        assert_eq!(client.models_called().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_primary_is_detached_not_cancelled() {
        let client = Arc::new(
            MockClient::new("fallback answer").with_model(
                PRIMARY,
                MockReply::text("too late").delayed(Duration::from_secs(120)),
            ),
        );
        let ctx = context(client.clone(), AbandonPolicy::Detach);

        let start = tokio::time::Instant::now();
        let out = dispatch(&ctx, PRIMARY, &request()).await.unwrap();
        assert_eq!(out.response.text, "fallback answer");
        assert_eq!(out.model, FALLBACK);
        assert!(out.fallback.unwrap().cause.contains("60s"));
        assert!(start.elapsed() >= Duration::from_secs(60));
        assert!(start.elapsed() < Duration::from_secs(120));
        // Only the fallback call has finished so far.
        assert_eq!(client.completed(), 1);

        tokio::time::sleep(Duration::from_secs(90)).await;
        assert_eq!(client.completed(), 2, "abandoned primary kept running");
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_primary_is_dropped_under_cancel() {
        let client = Arc::new(
            MockClient::new("fallback answer").with_model(
                PRIMARY,
                MockReply::text("too late").delayed(Duration::from_secs(120)),
            ),
        );
        let ctx = context(client.clone(), AbandonPolicy::Cancel);

        let out = dispatch(&ctx, PRIMARY, &request()).await.unwrap();
        assert_eq!(out.model, FALLBACK);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(client.completed(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn fallback_is_also_time_bounded() {
        let slow = MockReply::text("late").delayed(Duration::from_secs(300));
        let client = Arc::new(MockClient::with_default(slow));
        let ctx = AuditContext::new(client.clone()).with_dispatch(
            DispatchConfig::default().with_timeout(Duration::from_secs(10)),
        );

        let start = tokio::time::Instant::now();
        let err = dispatch(&ctx, PRIMARY, &request()).await.unwrap_err();
        match err {
            AuditError::ServiceUnavailable { primary, fallback } => {
                assert_eq!(primary, ServiceError::Timeout(Duration::from_secs(10)));
                assert_eq!(fallback, ServiceError::Timeout(Duration::from_secs(10)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(start.elapsed() < Duration::from_secs(30));
    }

    #[tokio::test]
    async fn fallback_reuses_the_same_request() {
        let client = Arc::new(
            MockClient::new("ok")
                .with_model(PRIMARY, MockReply::Fail(ServiceError::HttpClient("reset".into()))),
        );
        let ctx = context(client.clone(), AbandonPolicy::Detach);
        let req = request().with_system("Auditor");

        dispatch(&ctx, PRIMARY, &req).await.unwrap();
        let requests = client.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], requests[1]);
    }
}
