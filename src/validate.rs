//! Strict-mode validation: detect unknown keys in TOML inputs.
//!
//! Uses `serde_ignored` to deserialize into a target type and capture any keys
//! it doesn't consume. Reports each unknown key with its file path and
//! best-effort line number. Serves both settings files and manifests.

use std::path::Path;

use serde::Deserialize;

use crate::error::SupervisorError;

/// Validate that TOML `content` contains no keys unknown to `L`.
///
/// Parse errors are reported as [`SupervisorError::ParseError`] so callers
/// get the same error whether or not strict mode is on.
pub fn validate_unknown_keys<L>(content: &str, path: &Path) -> Result<(), SupervisorError>
where
    L: for<'de> Deserialize<'de>,
{
    let mut unknown_keys: Vec<String> = Vec::new();

    let deserializer = toml::Deserializer::new(content);
    let _parsed: L = serde_ignored::deserialize(deserializer, |ignored_path| {
        unknown_keys.push(dotted(&ignored_path.to_string()));
    })
    .map_err(|e| SupervisorError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    if unknown_keys.is_empty() {
        return Ok(());
    }

    let errors: Vec<SupervisorError> = unknown_keys
        .into_iter()
        .map(|key| {
            let line = find_key_line(content, &key);
            SupervisorError::UnknownKey {
                key,
                path: path.to_path_buf(),
                line,
            }
        })
        .collect();

    Err(SupervisorError::UnknownKeys(errors))
}

/// `serde_ignored` writes `?` for each `Option` it passes through
/// (`group.?.typo`); drop those so the key reads as it does in the file.
fn dotted(path: &str) -> String {
    path.split('.')
        .filter(|segment| *segment != "?")
        .collect::<Vec<_>>()
        .join(".")
}

/// Find the 1-indexed line number for a key in TOML content.
///
/// Dotted keys name their section: `"group.typo"` lives under `[group]`, and
/// `"program.1.typo"` under the second `[[program]]` header. Headers are
/// tracked while scanning and the leaf only matches inside the right one.
///
/// Handles standard `[section]` and `[[array]]` headers with bare keys. Quoted
/// keys and inline tables are not located. Returns 0 if the key is not found.
fn find_key_line(content: &str, dotted_key: &str) -> usize {
    let segments: Vec<&str> = dotted_key.split('.').collect();
    let leaf = segments.last().unwrap_or(&dotted_key);
    let expected_section = &segments[..segments.len() - 1];

    let mut current_section: Vec<String> = Vec::new();
    let mut array_counts: Vec<(String, usize)> = Vec::new();

    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if let Some(header) = trimmed
            .strip_prefix("[[")
            .and_then(|rest| rest.strip_suffix("]]"))
        {
            let header = header.trim().to_string();
            let index = match array_counts.iter_mut().find(|(name, _)| *name == header) {
                Some((_, count)) => {
                    *count += 1;
                    *count
                }
                None => {
                    array_counts.push((header.clone(), 0));
                    0
                }
            };
            current_section = header.split('.').map(|s| s.trim().to_string()).collect();
            current_section.push(index.to_string());
            continue;
        }

        if trimmed.starts_with('[') {
            let header = trimmed.trim_start_matches('[').trim_end_matches(']').trim();
            current_section = header.split('.').map(|s| s.trim().to_string()).collect();
            continue;
        }

        let in_right_section = expected_section.len() == current_section.len()
            && expected_section
                .iter()
                .zip(&current_section)
                .all(|(a, b)| *a == b);

        if in_right_section
            && let Some(after_key) = trimmed.strip_prefix(leaf)
            && after_key.trim_start().starts_with('=')
        {
            return i + 1;
        }
    }
    0
}
