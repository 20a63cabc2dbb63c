//! Command builder routes: the option table and formatted `pdd` lines.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::command::{self, BuiltCommand, CommandConfig, CommandError, CommandKind, Values};
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct BuildCommandBody {
    #[serde(default)]
    pub values: Values,
}

#[derive(Debug, Deserialize)]
pub struct SetupCommandBody {
    pub prompt: String,
}

/// `GET /api/commands`: every subcommand with its option table.
pub async fn list_commands() -> Json<&'static [CommandConfig]> {
    Json(command::commands())
}

/// `POST /api/commands/:name`: format a command from option values.
pub async fn build_command(
    Path(name): Path<String>,
    Json(body): Json<BuildCommandBody>,
) -> Result<Json<BuiltCommand>, ApiError> {
    let kind = parse_kind(&name)?;
    Ok(Json(command::build(kind, &body.values)))
}

/// `POST /api/commands/:name/setup`: the command pre-filled for one prompt.
pub async fn setup_command(
    Path(name): Path<String>,
    Json(body): Json<SetupCommandBody>,
) -> Result<Json<BuiltCommand>, ApiError> {
    let kind = parse_kind(&name)?;
    command::setup(kind, &body.prompt)
        .map(Json)
        .map_err(|e| ApiError::from_err(command_error_to_status(&e), &e))
}

/// `GET /api/architecture/regenerate`: the architecture regeneration preset.
pub async fn regenerate_architecture() -> Json<BuiltCommand> {
    let (kind, values) = command::regenerate_architecture();
    Json(command::build(kind, &values))
}

fn parse_kind(name: &str) -> Result<CommandKind, ApiError> {
    name.parse::<CommandKind>()
        .map_err(|e| ApiError::from_err(command_error_to_status(&e), &e))
}

pub(crate) fn command_error_to_status(err: &CommandError) -> StatusCode {
    match err {
        CommandError::UnknownCommand(_) => StatusCode::NOT_FOUND,
        CommandError::NoPromptOption(_) => StatusCode::BAD_REQUEST,
    }
}

#[cfg(test)]
#[path = "commands_test.rs"]
mod tests;
