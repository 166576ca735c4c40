use std::process::ExitCode;
use std::sync::Arc;

use greko_lib::config::{DispatchConfig, ServiceConfig};
use greko_lib::pipeline::analyze_project;
use greko_lib::{AuditContext, AuditError, Evidence, GeminiClient};

#[tokio::main]
async fn main() -> ExitCode {
    greko_lib::init_tracing();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: greko <contract.pdf|report.txt>");
        return ExitCode::from(2);
    };

    match run(&path).await {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            if let Some(hint) = e.remediation_hint() {
                eprintln!("{hint}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(path: &str) -> Result<String, AuditError> {
    let bytes = tokio::fs::read(path).await?;
    let evidence = Evidence::from_bytes(&bytes);
    tracing::info!(path, source = evidence.source_label(), "Analyzing document");

    let client = GeminiClient::new(ServiceConfig::from_env())?;
    let ctx = AuditContext::new(Arc::new(client)).with_dispatch(DispatchConfig::from_env());

    let project = analyze_project(&ctx, &evidence).await?;
    Ok(serde_json::to_string_pretty(&project)?)
}
