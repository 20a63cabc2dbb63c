//! `# Imports` scanning and nested import expansion.
//!
//! A prompt lists the prompts it builds on as bullet lines under an
//! `# Imports` heading:
//!
//! ```text
//! # Imports
//! - prompts/core/models.prompt
//! - prompts/core/errors.prompt
//! ```
//!
//! The section ends at the next Markdown heading. Expansion inlines each
//! imported prompt after its bullet, depth first, and guards against cycles
//! with the ids on the current call chain. Shared imports are inlined once per
//! path, so the imported text inlined into one expansion is capped at
//! [`MAX_INLINED_BYTES`]; past that, imports are replaced by a sentinel.

use std::collections::HashSet;
use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::{Catalog, PromptRecord};

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s{0,3}#{1,6}\s+(.+?)\s*#*\s*$").expect("heading regex"));

static IMPORT_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*]\s+`?([^\s`]+)`?\s*$").expect("import bullet regex"));

const INDENT: &str = "  ";

/// Budget of imported prompt text one expansion may inline.
pub const MAX_INLINED_BYTES: usize = 1 << 20;

/// Charged per inlined import on top of its text, for the frame lines.
const FRAME_BYTES: usize = 32;

/// Import references in the `# Imports` section, in order, without repeats.
#[must_use]
pub fn scan_imports(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    classify_lines(text)
        .into_iter()
        .filter_map(|(_, reference)| reference)
        .filter(|reference| seen.insert(*reference))
        .map(str::to_owned)
        .collect()
}

/// The sentinel substituted for an import that would recurse into itself.
#[must_use]
pub fn circular_sentinel(id: &str) -> String {
    format!("[circular import: {id}]")
}

/// The sentinel substituted for an import once the inline budget is spent.
#[must_use]
pub fn limit_sentinel(id: &str) -> String {
    format!("[import limit reached: {id}]")
}

/// Prompt text of `id` with every resolvable import inlined.
///
/// Returns `None` if `id` is not in the catalog.
#[must_use]
pub fn expand_imports(catalog: &Catalog, id: &str) -> Option<String> {
    let record = catalog.get(id)?;
    let mut expansion = Expansion {
        catalog,
        visiting: HashSet::new(),
        remaining: MAX_INLINED_BYTES,
        truncated: false,
    };
    let out = expansion.record(record);
    if expansion.truncated {
        warn!(id, limit = MAX_INLINED_BYTES, "imports: expansion truncated");
    }
    Some(out)
}

struct Expansion<'a> {
    catalog: &'a Catalog,
    visiting: HashSet<&'a str>,
    remaining: usize,
    truncated: bool,
}

impl<'a> Expansion<'a> {
    fn record(&mut self, record: &'a PromptRecord) -> String {
        self.visiting.insert(record.id.as_str());

        let text = &record.dev_unit.prompt;
        let mut out = String::with_capacity(text.len());
        for (line, reference) in classify_lines(text) {
            out.push_str(line);
            out.push('\n');

            let Some(child) = reference.and_then(|r| self.catalog.get(r)) else {
                continue;
            };
            if self.visiting.contains(child.id.as_str()) {
                let _ = writeln!(out, "{INDENT}{}", circular_sentinel(&child.id));
                continue;
            }

            let cost = child.dev_unit.prompt.len() + child.id.len() + FRAME_BYTES;
            if cost > self.remaining {
                self.truncated = true;
                let _ = writeln!(out, "{INDENT}{}", limit_sentinel(&child.id));
                continue;
            }
            self.remaining -= cost;

            let body = self.record(child);
            let _ = writeln!(out, "{INDENT}<import id=\"{}\">", child.id);
            for inner in body.lines() {
                if inner.is_empty() {
                    out.push('\n');
                } else {
                    let _ = writeln!(out, "{INDENT}{inner}");
                }
            }
            let _ = writeln!(out, "{INDENT}</import>");
        }

        if !text.ends_with('\n') && out.ends_with('\n') {
            out.pop();
        }

        self.visiting.remove(record.id.as_str());
        out
    }
}

/// Pair every line with the import reference it carries, if any.
fn classify_lines(text: &str) -> Vec<(&str, Option<&str>)> {
    let mut in_imports = false;
    text.lines()
        .map(|line| {
            if let Some(caps) = HEADING.captures(line) {
                in_imports = caps
                    .get(1)
                    .is_some_and(|m| m.as_str().eq_ignore_ascii_case("imports"));
                return (line, None);
            }
            if !in_imports {
                return (line, None);
            }
            let reference = IMPORT_BULLET
                .captures(line)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str());
            (line, reference)
        })
        .collect()
}

#[cfg(test)]
#[path = "imports_test.rs"]
mod tests;
