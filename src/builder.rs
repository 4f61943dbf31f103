use std::path::{Path, PathBuf};

use toml::{Table, Value};

use crate::error::SupervisorError;
use crate::manifest::Manifest;
use crate::ops::{self, RenderResult};
use crate::render::Renderer;
use crate::settings::{self, Settings, SettingsInput};
use crate::types::{RenderAction, RenderPolicy};

/// Entry point for building a generator.
pub struct Supervisorgen;

impl Supervisorgen {
    pub fn builder() -> GeneratorBuilder {
        GeneratorBuilder::new()
    }
}

/// Builder for resolving settings and rendering manifests.
///
/// Settings come from compiled defaults, an optional settings file,
/// `SUPERVISORGEN__*` environment variables and programmatic overrides, in
/// ascending priority. See [`settings`](crate::settings).
pub struct GeneratorBuilder {
    settings_file: Option<PathBuf>,
    env_enabled: bool,
    strict: bool,
    overrides: Vec<(String, Value)>,
}

impl GeneratorBuilder {
    fn new() -> Self {
        Self {
            settings_file: None,
            env_enabled: true,
            strict: true,
            overrides: Vec::new(),
        }
    }

    /// Read settings from this TOML file. A missing file is an error.
    pub fn settings_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_file = Some(path.into());
        self
    }

    /// Disable environment variable loading entirely.
    pub fn no_env(mut self) -> Self {
        self.env_enabled = false;
        self
    }

    /// Enable or disable strict mode (default: `true`).
    /// In strict mode, unknown keys in settings files and manifests produce errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Force the render policy. `None` is ignored (useful for optional clap args).
    pub fn override_policy(mut self, policy: Option<RenderPolicy>) -> Self {
        if let Some(p) = policy {
            self.overrides
                .push(("policy".into(), Value::String(p.as_str().into())));
        }
        self
    }

    /// Force the command directory. `None` is ignored.
    pub fn override_command_dir<S: Into<String>>(mut self, dir: Option<S>) -> Self {
        if let Some(d) = dir {
            self.overrides
                .push(("command_dir".into(), Value::String(d.into())));
        }
        self
    }

    fn build_input(&self) -> Result<SettingsInput, SupervisorError> {
        let file = match &self.settings_file {
            Some(path) => {
                let content =
                    std::fs::read_to_string(path).map_err(|e| SupervisorError::IoError {
                        path: path.clone(),
                        source: e,
                    })?;
                Some((path.clone(), content))
            }
            None => None,
        };

        let env_vars: Vec<(String, String)> = if self.env_enabled {
            std::env::vars().collect()
        } else {
            Vec::new()
        };

        let overrides: Table = self.overrides.iter().cloned().collect();

        Ok(SettingsInput {
            file,
            env_vars,
            overrides,
            strict: self.strict,
        })
    }

    /// Resolve settings through all layers.
    pub fn settings(&self) -> Result<Settings, SupervisorError> {
        settings::resolve(self.build_input()?)
    }

    /// A renderer configured from the resolved settings.
    pub fn renderer(&self) -> Result<Renderer, SupervisorError> {
        Ok(Renderer::from(&self.settings()?))
    }

    pub fn load_manifest(&self, path: &Path) -> Result<Manifest, SupervisorError> {
        Manifest::load(path, self.strict)
    }

    /// Load a manifest and render it with the resolved settings.
    pub fn render_manifest(&self, path: &Path) -> Result<String, SupervisorError> {
        let renderer = self.renderer()?;
        self.load_manifest(path)?.render(&renderer)
    }

    /// Handle a `RenderAction` and print the result to stdout.
    pub fn handle_and_print(&self, action: &RenderAction) -> Result<(), SupervisorError> {
        let result = self.handle(action)?;
        print!("{result}");
        Ok(())
    }

    /// Handle a `RenderAction` (render / check / template).
    pub fn handle(&self, action: &RenderAction) -> Result<RenderResult, SupervisorError> {
        match action {
            RenderAction::Render { manifest, output } => {
                let text = self.render_manifest(manifest)?;
                match output {
                    Some(path) => {
                        write_with_parents(path, &text)?;
                        Ok(RenderResult::Written { path: path.clone() })
                    }
                    None => Ok(RenderResult::Rendered(text)),
                }
            }
            RenderAction::Check { manifest } => {
                let loaded = self.load_manifest(manifest)?;
                let programs = loaded
                    .programs()
                    .iter()
                    .map(|p| p.name().to_string())
                    .collect();
                Ok(RenderResult::Checked { programs })
            }
            RenderAction::Template { output } => {
                let template = settings::settings_template();
                match output {
                    Some(path) => {
                        write_with_parents(path, &template)?;
                        Ok(RenderResult::TemplateWritten { path: path.clone() })
                    }
                    None => Ok(RenderResult::Template(template)),
                }
            }
        }
    }
}

fn write_with_parents(path: &Path, content: &str) -> Result<(), SupervisorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| SupervisorError::WriteError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    ops::write_file(path, content)
}
