//! Read-only catalog routes: the laid-out graph, prompt list and detail, PRD.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::command::{self, CommandKind};
use crate::error::ApiError;
use crate::graph::{self, LayoutResult};
use crate::prompts::{self, Artifact, DevUnit, PromptRecord, imports};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PromptSummary {
    pub id: String,
    pub label: String,
    pub path: String,
    pub includes: Vec<String>,
}

/// One command button of the detail view.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PromptAction {
    pub artifact: Artifact,
    pub kind: CommandKind,
    pub command: String,
}

#[derive(Debug, Serialize)]
pub struct PromptDetail {
    pub id: String,
    pub label: String,
    pub path: String,
    pub dev_unit: DevUnit,
    /// Prompt text with every `# Imports` bullet inlined.
    pub expanded_prompt: String,
    pub actions: Vec<PromptAction>,
}

#[derive(Debug, Deserialize)]
pub struct PromptQuery {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct PrdResponse {
    pub content: String,
}

/// `GET /api/graph`: the layered dependency graph with coordinates.
pub async fn get_graph(State(state): State<AppState>) -> Json<LayoutResult> {
    let result = graph::layout(state.catalog.records(), &state.layout);
    info!(
        nodes = result.nodes.len(),
        edges = result.edges.len(),
        layers = result.layers.len(),
        has_overflow = result.has_overflow,
        "graph: layout computed"
    );
    Json(result)
}

/// `GET /api/prompts`: every prompt in catalog order.
pub async fn list_prompts(State(state): State<AppState>) -> Json<Vec<PromptSummary>> {
    Json(state.catalog.records().iter().map(to_summary).collect())
}

/// `GET /api/prompt?id=`: one prompt's dev unit, expansion and actions.
pub async fn get_prompt(
    State(state): State<AppState>,
    Query(query): Query<PromptQuery>,
) -> Result<Json<PromptDetail>, ApiError> {
    let Some(record) = state.catalog.get(&query.id) else {
        return Err(unknown_prompt(&query.id));
    };
    let expanded_prompt = imports::expand_imports(&state.catalog, &record.id).ok_or_else(|| unknown_prompt(&query.id))?;

    Ok(Json(PromptDetail {
        id: record.id.clone(),
        label: prompts::label_for(&record.id).to_owned(),
        path: record.id.clone(),
        dev_unit: record.dev_unit.clone(),
        expanded_prompt,
        actions: actions_for_prompt(&record.id),
    }))
}

/// `GET /api/prd`: the product requirements document.
pub async fn get_prd(State(state): State<AppState>) -> Json<PrdResponse> {
    Json(PrdResponse { content: state.catalog.prd().to_owned() })
}

fn to_summary(record: &PromptRecord) -> PromptSummary {
    PromptSummary {
        id: record.id.clone(),
        label: prompts::label_for(&record.id).to_owned(),
        path: record.id.clone(),
        includes: record.includes.clone(),
    }
}

/// Every artifact tab's commands, pre-filled with the prompt path.
pub(crate) fn actions_for_prompt(path: &str) -> Vec<PromptAction> {
    let values = command::setup_for_prompt(path);
    Artifact::ALL
        .into_iter()
        .flat_map(|artifact| {
            command::actions_for(artifact)
                .iter()
                .map(move |&kind| (artifact, kind))
        })
        .map(|(artifact, kind)| PromptAction { artifact, kind, command: command::format_command(kind, &values) })
        .collect()
}

fn unknown_prompt(id: &str) -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "E_UNKNOWN_PROMPT", format!("unknown prompt: {id}"))
}

#[cfg(test)]
#[path = "prompts_test.rs"]
mod tests;
