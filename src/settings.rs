//! Generator settings: how manifests are rendered.
//!
//! Settings are a small [`confique`] struct resolved from layers, lowest
//! priority first:
//!
//! ```text
//! Compiled defaults     #[config(default = ...)]
//!        ↑ overridden by
//! Settings file         --settings / .settings_file()
//!        ↑ overridden by
//! Environment vars      SUPERVISORGEN__POLICY, SUPERVISORGEN__COMMAND_DIR
//!        ↑ overridden by
//! Overrides             .override_policy() / .override_command_dir()
//! ```
//!
//! Resolution operates on pre-loaded data ([`SettingsInput`]) with no I/O.

use std::path::PathBuf;

use confique::Config;
use toml::{Table, Value};
use tracing::debug;

use crate::error::SupervisorError;
use crate::render::Renderer;
use crate::types::RenderPolicy;
use crate::validate;

/// Environment variable prefix; keys follow a double underscore.
pub const ENV_PREFIX: &str = "SUPERVISORGEN";

#[derive(Config, Debug, Clone, PartialEq)]
pub struct Settings {
    /// Which optional program fields are rendered.
    ///
    /// "explicit" emits every field that was set, even to its default value.
    /// "non-default" emits only fields whose value differs from supervisord's
    /// default.
    #[config(default = "explicit")]
    pub policy: RenderPolicy,

    /// Directory under each program root holding the program binary.
    #[config(default = "bin")]
    pub command_dir: String,
}

impl From<&Settings> for Renderer {
    fn from(settings: &Settings) -> Self {
        Renderer::new(settings.policy).command_dir(settings.command_dir.clone())
    }
}

/// Generate a commented TOML template from the settings doc comments.
pub fn settings_template() -> String {
    confique::toml::template::<Settings>(confique::toml::FormatOptions::default())
}

/// All pre-loaded data needed to resolve settings. No I/O happens here.
pub struct SettingsInput {
    /// Settings file path and contents, if any.
    pub file: Option<(PathBuf, String)>,
    /// Raw environment variable pairs (`std::env::vars()` or synthetic data).
    pub env_vars: Vec<(String, String)>,
    /// Programmatic overrides, highest priority.
    pub overrides: Table,
    /// Whether to reject unknown keys in the settings file.
    pub strict: bool,
}

pub fn resolve(input: SettingsInput) -> Result<Settings, SupervisorError> {
    let mut merged = Table::new();

    if let Some((path, content)) = &input.file {
        if input.strict {
            validate::validate_unknown_keys::<<Settings as Config>::Layer>(content, path)?;
        }
        let table: Table = toml::from_str(content).map_err(|e| SupervisorError::ParseError {
            path: path.clone(),
            source: e,
        })?;
        merged.extend(table);
    }

    merged.extend(env_to_table(ENV_PREFIX, input.env_vars));
    merged.extend(input.overrides);

    let layer: <Settings as Config>::Layer =
        Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| SupervisorError::InvalidSetting {
                reason: e.to_string(),
            })?;

    let settings = Settings::builder().preloaded(layer).load()?;
    debug!(
        policy = %settings.policy,
        command_dir = %settings.command_dir,
        "resolved settings"
    );
    Ok(settings)
}

/// Build a flat `toml::Table` from variables named `{PREFIX}__{KEY}`.
///
/// Keys are lowercased to match field names. Values stay strings; every
/// setting is string-typed.
fn env_to_table(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> Table {
    let needle = format!("{prefix}__");
    let mut table = Table::new();

    for (key, value) in vars {
        let Some(rest) = key.strip_prefix(&needle) else {
            continue;
        };
        if rest.is_empty() {
            continue;
        }
        table.insert(rest.to_lowercase(), Value::String(value));
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_input() -> SettingsInput {
        SettingsInput {
            file: None,
            env_vars: vec![],
            overrides: Table::new(),
            strict: true,
        }
    }

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_only() {
        let settings = resolve(empty_input()).unwrap();
        assert_eq!(settings.policy, RenderPolicy::Explicit);
        assert_eq!(settings.command_dir, "bin");
    }

    #[test]
    fn file_overrides_default() {
        let input = SettingsInput {
            file: Some((
                "settings.toml".into(),
                "policy = \"non-default\"\n".into(),
            )),
            ..empty_input()
        };
        let settings = resolve(input).unwrap();
        assert_eq!(settings.policy, RenderPolicy::NonDefault);
        assert_eq!(settings.command_dir, "bin");
    }

    #[test]
    fn env_overrides_file() {
        let input = SettingsInput {
            file: Some(("settings.toml".into(), "command_dir = \"sbin\"\n".into())),
            env_vars: vars(&[("SUPERVISORGEN__COMMAND_DIR", "libexec")]),
            ..empty_input()
        };
        let settings = resolve(input).unwrap();
        assert_eq!(settings.command_dir, "libexec");
    }

    #[test]
    fn overrides_beat_env() {
        let mut overrides = Table::new();
        overrides.insert("policy".into(), Value::String("explicit".into()));
        let input = SettingsInput {
            env_vars: vars(&[("SUPERVISORGEN__POLICY", "non-default")]),
            overrides,
            ..empty_input()
        };
        let settings = resolve(input).unwrap();
        assert_eq!(settings.policy, RenderPolicy::Explicit);
    }

    #[test]
    fn unrelated_env_vars_ignored() {
        let input = SettingsInput {
            env_vars: vars(&[
                ("HOME", "/root"),
                ("SUPERVISORGEN_POLICY", "non-default"),
                ("SUPERVISORGEN__", "x"),
            ]),
            ..empty_input()
        };
        let settings = resolve(input).unwrap();
        assert_eq!(settings.policy, RenderPolicy::Explicit);
    }

    #[test]
    fn strict_rejects_unknown_key() {
        let input = SettingsInput {
            file: Some(("settings.toml".into(), "polcy = \"explicit\"\n".into())),
            ..empty_input()
        };
        let err = resolve(input).unwrap_err();
        assert!(matches!(err, SupervisorError::UnknownKeys(_)));
    }

    #[test]
    fn lenient_mode_ignores_unknown_key() {
        let input = SettingsInput {
            file: Some(("settings.toml".into(), "polcy = \"explicit\"\n".into())),
            strict: false,
            ..empty_input()
        };
        assert!(resolve(input).is_ok());
    }

    #[test]
    fn invalid_policy_is_reported() {
        let input = SettingsInput {
            env_vars: vars(&[("SUPERVISORGEN__POLICY", "sometimes")]),
            ..empty_input()
        };
        let err = resolve(input).unwrap_err();
        assert!(matches!(err, SupervisorError::InvalidSetting { .. }));
    }

    #[test]
    fn renderer_follows_settings() {
        let settings = Settings {
            policy: RenderPolicy::NonDefault,
            command_dir: "sbin".into(),
        };
        let renderer = Renderer::from(&settings);
        assert_eq!(renderer.policy(), RenderPolicy::NonDefault);
        assert_eq!(
            renderer,
            Renderer::new(RenderPolicy::NonDefault).command_dir("sbin")
        );
    }

    #[test]
    fn template_documents_settings() {
        let template = settings_template();
        assert!(template.contains("policy"));
        assert!(template.contains("command_dir"));
        assert!(template.contains("non-default"));
    }
}
