//! Web-grounded search for public information about a project.

use serde::{Deserialize, Serialize};

use super::context::AuditContext;
use super::dispatch::dispatch;
use super::prompt::build_search_prompt;
use super::types::{GenerationRequest, GroundingSource};
use crate::models::project::ProjectData;

pub const SEARCH_FALLBACK: &str = "Error en la búsqueda.";
pub const SEARCH_EMPTY: &str = "No se encontró información relevante.";
pub const UNTITLED_SOURCE: &str = "Fuente Web";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub title: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub summary: String,
    pub sources: Vec<Citation>,
}

/// Citations with a URI, in service order. Untitled ones get a generic label.
pub fn citations(sources: &[GroundingSource]) -> Vec<Citation> {
    sources
        .iter()
        .filter_map(|s| {
            let uri = s.uri.as_deref().filter(|u| !u.is_empty())?;
            let title = s
                .title
                .as_deref()
                .filter(|t| !t.is_empty())
                .unwrap_or(UNTITLED_SOURCE);
            Some(Citation {
                title: title.to_string(),
                uri: uri.to_string(),
            })
        })
        .collect()
}

/// Never fails: a cascade failure yields a fixed summary and no sources.
pub async fn search_project_info(ctx: &AuditContext, project: &ProjectData) -> SearchResult {
    let request = GenerationRequest::prompt(build_search_prompt(project)).with_web_search();

    match dispatch(ctx, &ctx.models.extraction, &request).await {
        Ok(out) => {
            let sources = citations(&out.response.sources);
            let summary = if out.response.text.is_empty() {
                SEARCH_EMPTY.to_string()
            } else {
                out.response.text
            };
            tracing::debug!(sources = sources.len(), "Search completed");
            SearchResult { summary, sources }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Project search failed");
            SearchResult {
                summary: SEARCH_FALLBACK.to_string(),
                sources: Vec::new(),
            }
        }
    }
}
