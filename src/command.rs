//! Command builder: `pdd <subcommand>` lines from a fixed option table.
//!
//! DESIGN
//! ======
//! The subcommand → options table is immutable configuration, built once on
//! first use. `format_command` is pure: flags follow the table's option
//! order (never the order values were entered), values outside the table are
//! ignored, and each subcommand names the options it takes positionally.
//! Those are appended after every flag.
//!
//! Quoting follows the front-end's rule: a value containing a space is
//! wrapped in double quotes with inner `"` escaped as `\"`. Nothing else is
//! escaped.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;
use crate::prompts::Artifact;

const TOOL: &str = "pdd";

const ARCHITECTURE_TEMPLATE: &str = "pdd/templates/architecture/architecture_json.prompt";
const ARCHITECTURE_OUTPUT: &str = "architecture.json";
const ARCHITECTURE_ENV: &str = "PRD_FILE=docs/specs.md";

// =============================================================================
// TYPES
// =============================================================================

/// Every subcommand the builder knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandKind {
    Scaffold,
    Gen,
    Review,
    Commit,
    Test,
    Example,
    Crash,
    Verify,
    Fix,
    Split,
    Conflict,
    AutoDeps,
}

impl CommandKind {
    pub const ALL: [CommandKind; 12] = [
        Self::Scaffold,
        Self::Gen,
        Self::Review,
        Self::Commit,
        Self::Test,
        Self::Example,
        Self::Crash,
        Self::Verify,
        Self::Fix,
        Self::Split,
        Self::Conflict,
        Self::AutoDeps,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scaffold => "scaffold",
            Self::Gen => "gen",
            Self::Review => "review",
            Self::Commit => "commit",
            Self::Test => "test",
            Self::Example => "example",
            Self::Crash => "crash",
            Self::Verify => "verify",
            Self::Fix => "fix",
            Self::Split => "split",
            Self::Conflict => "conflict",
            Self::AutoDeps => "auto-deps",
        }
    }

    /// Options this subcommand takes as trailing positional arguments.
    #[must_use]
    pub fn positional(self) -> &'static [&'static str] {
        match self {
            Self::Gen | Self::Example | Self::Verify => &["prompt"],
            _ => &[],
        }
    }

    #[must_use]
    pub fn config(self) -> &'static CommandConfig {
        // The table holds exactly one entry per kind, in `ALL` order.
        &commands()[self as usize]
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandKind {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CommandError::UnknownCommand(s.to_owned()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Text,
    Textarea,
}

/// One form field of a subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOption {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: OptionKind,
    pub placeholder: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// A subcommand with its ordered option list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandConfig {
    pub name: CommandKind,
    pub description: &'static str,
    pub options: Vec<CommandOption>,
    pub positional: &'static [&'static str],
}

/// Form values keyed by option name.
pub type Values = HashMap<String, String>;

/// A formatted command line plus the required options left empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuiltCommand {
    pub command: String,
    pub missing: Vec<&'static str>,
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("{0} has no prompt option to pre-fill")]
    NoPromptOption(CommandKind),
}

impl ErrorCode for CommandError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCommand(_) => "E_UNKNOWN_COMMAND",
            Self::NoPromptOption(_) => "E_NO_PROMPT_OPTION",
        }
    }
}

// =============================================================================
// FORMATTING
// =============================================================================

/// Format `pdd <kind> [--opt value]... [positional]...`.
#[must_use]
pub fn format_command(kind: CommandKind, values: &Values) -> String {
    let mut command = format!("{TOOL} {kind}");
    let mut positional = String::new();
    let takes_positional = kind.positional();

    for option in &kind.config().options {
        let Some(value) = values.get(option.name).filter(|v| !v.is_empty()) else {
            continue;
        };
        let value = quote_value(value);
        if takes_positional.contains(&option.name) {
            positional.push(' ');
            positional.push_str(&value);
        } else {
            command.push_str(" --");
            command.push_str(option.name);
            command.push(' ');
            command.push_str(&value);
        }
    }

    command.push_str(&positional);
    command
}

/// Required options of `kind` with no value, in table order.
#[must_use]
pub fn missing_required(kind: CommandKind, values: &Values) -> Vec<&'static str> {
    kind.config()
        .options
        .iter()
        .filter(|option| option.required)
        .filter(|option| values.get(option.name).is_none_or(String::is_empty))
        .map(|option| option.name)
        .collect()
}

#[must_use]
pub fn build(kind: CommandKind, values: &Values) -> BuiltCommand {
    BuiltCommand { command: format_command(kind, values), missing: missing_required(kind, values) }
}

/// Wrap in double quotes when the value holds a space, escaping inner quotes.
#[must_use]
pub fn quote_value(value: &str) -> String {
    if value.contains(' ') {
        format!("\"{}\"", value.replace('"', "\\\""))
    } else {
        value.to_owned()
    }
}

// =============================================================================
// PRESETS
// =============================================================================

/// Values a dev-unit action pre-fills: the prompt path and nothing else.
#[must_use]
pub fn setup_for_prompt(prompt_path: &str) -> Values {
    Values::from([("prompt".to_owned(), prompt_path.to_owned())])
}

/// The command `kind` pre-filled for one prompt.
///
/// # Errors
///
/// Returns [`CommandError::NoPromptOption`] if `kind` takes no `prompt`.
pub fn setup(kind: CommandKind, prompt_path: &str) -> Result<BuiltCommand, CommandError> {
    if !kind.config().options.iter().any(|option| option.name == "prompt") {
        return Err(CommandError::NoPromptOption(kind));
    }
    Ok(build(kind, &setup_for_prompt(prompt_path)))
}

/// The "regenerate architecture" preset: `gen` over the architecture template.
#[must_use]
pub fn regenerate_architecture() -> (CommandKind, Values) {
    let values = Values::from([
        ("prompt".to_owned(), ARCHITECTURE_TEMPLATE.to_owned()),
        ("output-file".to_owned(), ARCHITECTURE_OUTPUT.to_owned()),
        ("env-file".to_owned(), ARCHITECTURE_ENV.to_owned()),
    ]);
    (CommandKind::Gen, values)
}

/// Commands offered from each artifact tab of the detail view.
#[must_use]
pub fn actions_for(artifact: Artifact) -> &'static [CommandKind] {
    match artifact {
        Artifact::Prompt | Artifact::Code => &[CommandKind::Gen],
        Artifact::Example => &[CommandKind::Example, CommandKind::Verify, CommandKind::Crash],
        Artifact::Test => &[CommandKind::Test, CommandKind::Fix],
    }
}

// =============================================================================
// TABLE
// =============================================================================

/// All subcommand configs, in [`CommandKind::ALL`] order.
pub fn commands() -> &'static [CommandConfig] {
    static TABLE: OnceLock<Vec<CommandConfig>> = OnceLock::new();
    TABLE.get_or_init(|| CommandKind::ALL.into_iter().map(build_config).collect())
}

fn text(name: &'static str, placeholder: &'static str, description: &'static str) -> CommandOption {
    CommandOption { name, kind: OptionKind::Text, placeholder, description, required: false }
}

fn textarea(name: &'static str, placeholder: &'static str, description: &'static str) -> CommandOption {
    CommandOption { name, kind: OptionKind::Textarea, placeholder, description, required: false }
}

impl CommandOption {
    fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

fn model(placeholder: &'static str, description: &'static str) -> CommandOption {
    text("model", placeholder, description)
}

#[allow(clippy::too_many_lines)]
fn build_config(kind: CommandKind) -> CommandConfig {
    let (description, options) = match kind {
        CommandKind::Scaffold => (
            "Create a new project from a prompt or template.",
            vec![
                textarea(
                    "prompt",
                    "e.g., A React SPA with TypeScript and TailwindCSS",
                    "The main prompt describing the project to create.",
                )
                .required(),
                model("e.g., gemini-2.5-pro", "The model to use for generation."),
                text("dir", "e.g., ./my-new-app", "The output directory for the new project."),
                text("template", "e.g., react-ts", "An optional template to start from."),
            ],
        ),
        CommandKind::Gen => (
            "Generate new code or modify existing code.",
            vec![
                textarea(
                    "prompt",
                    "e.g., Create a button component with a primary and secondary variant.",
                    "The main prompt describing the code to generate.",
                )
                .required(),
                model("e.g., gemini-2.5-pro", "The model to use for generation."),
                text("input-file", "e.g., ./src/components/Button.tsx", "File(s) to use as input for modification."),
                text("output-file", "e.g., ./src/components/Button.tsx", "File to write the generated code to."),
                text("context-file", "e.g., ./src/types.ts", "Additional file(s) to provide as context."),
                text("env-file", "e.g., PRD_FILE=docs/specs.md", "Variables substituted into a parameterized prompt."),
            ],
        ),
        CommandKind::Review => (
            "Review a file for improvements.",
            vec![
                text("input-file", "e.g., ./src/services/api.ts", "The file to be reviewed.").required(),
                textarea(
                    "prompt",
                    "e.g., Check for performance issues and suggest improvements.",
                    "A specific prompt to guide the review.",
                ),
                model("e.g., gemini-2.5-pro", "The model to use for the review."),
            ],
        ),
        CommandKind::Commit => (
            "Generate a commit message based on staged changes.",
            vec![
                textarea(
                    "prompt",
                    "e.g., Use conventional commit format.",
                    "A specific prompt to guide the commit message generation.",
                ),
                model("e.g., gemini-2.5-flash", "The model to use for the commit message."),
            ],
        ),
        CommandKind::Test => (
            "Generate tests for a specific file.",
            vec![
                text("input-file", "e.g., ./src/utils/math.ts", "The file to generate tests for.").required(),
                textarea(
                    "prompt",
                    "e.g., Use Jest and cover all edge cases.",
                    "A specific prompt to guide the test generation.",
                ),
                model("e.g., gemini-2.5-pro", "The model to use for test generation."),
            ],
        ),
        CommandKind::Example => (
            "Generate a compact example showing how to use the functionality defined in a prompt.",
            vec![
                text("prompt", "e.g., prompts/api/routes_python.prompt", "The prompt file the example is built from.")
                    .required(),
                text("code-file", "e.g., ./src/routes.py", "The generated code the example exercises."),
                text("output-file", "e.g., ./examples/routes_example.py", "File to write the example to."),
                model("e.g., gemini-2.5-pro", "The model to use for example generation."),
            ],
        ),
        CommandKind::Crash => (
            "Fix errors in a code module and its calling program that caused a crash.",
            vec![
                text("prompt", "e.g., prompts/api/routes_python.prompt", "The prompt that generated the code.")
                    .required(),
                text("code-file", "e.g., ./src/routes.py", "The code module that crashed."),
                text("program-file", "e.g., ./examples/routes_example.py", "The program that triggered the crash."),
                text("error-file", "e.g., ./crash.log", "File holding the stack trace."),
                model("e.g., gemini-2.5-pro", "The model to use for the fix."),
            ],
        ),
        CommandKind::Verify => (
            "Verify that a program's output matches the intent of its prompt.",
            vec![
                text("prompt", "e.g., prompts/api/routes_python.prompt", "The prompt describing the intent.")
                    .required(),
                text("code-file", "e.g., ./src/routes.py", "The code under verification."),
                text("program-file", "e.g., ./examples/routes_example.py", "The program to run."),
                text("output-file", "e.g., ./verify_report.md", "File to write the verification report to."),
                model("e.g., gemini-2.5-pro", "The model that judges the output."),
            ],
        ),
        CommandKind::Fix => (
            "Fix failing code and unit tests using the original prompt as context.",
            vec![
                text("prompt", "e.g., prompts/api/routes_python.prompt", "The prompt that generated the code.")
                    .required(),
                text("code-file", "e.g., ./src/routes.py", "The code under test."),
                text("test-file", "e.g., ./tests/test_routes.py", "The failing test file."),
                text("error-file", "e.g., ./pytest.log", "File holding the test failures."),
                model("e.g., gemini-2.5-pro", "The model to use for the fix."),
            ],
        ),
        CommandKind::Split => (
            "Split a large prompt file into smaller ones.",
            vec![
                text("input-file", "e.g., prompts/api/routes_python.prompt", "The prompt file to split.").required(),
                text("example-code", "e.g., ./examples/routes_example.py", "Example showing the interface to keep."),
                text("output-sub", "e.g., prompts/api/sub_routes_python.prompt", "File for the extracted sub-prompt."),
                text("output-modified", "e.g., prompts/api/routes_python.prompt", "File for the reduced prompt."),
                model("e.g., gemini-2.5-pro", "The model to use for splitting."),
            ],
        ),
        CommandKind::Conflict => (
            "Find and suggest resolutions for conflicts between two prompt files.",
            vec![
                text("prompt1", "e.g., prompts/services/task_service_python.prompt", "The first prompt file.")
                    .required(),
                text("prompt2", "e.g., prompts/services/auth_service_python.prompt", "The second prompt file.")
                    .required(),
                text("output-file", "e.g., ./conflicts.csv", "File to write the suggested resolutions to."),
                model("e.g., gemini-2.5-pro", "The model to use for the analysis."),
            ],
        ),
        CommandKind::AutoDeps => (
            "Analyze a prompt and insert the dependencies it needs.",
            vec![
                text("prompt", "e.g., prompts/api/routes_python.prompt", "The prompt file to update.").required(),
                text("directory", "e.g., \"context/*.py\"", "Glob of files to consider as dependencies."),
                text("output-file", "e.g., prompts/api/routes_python.prompt", "File to write the updated prompt to."),
                text("csv-file", "e.g., ./project_dependencies.csv", "Cache of dependency summaries."),
                model("e.g., gemini-2.5-pro", "The model to use for the analysis."),
            ],
        ),
    };

    CommandConfig { name: kind, description, options, positional: kind.positional() }
}

#[cfg(test)]
#[path = "command_test.rs"]
mod tests;
