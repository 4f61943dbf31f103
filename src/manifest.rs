//! TOML manifests describing programs and an optional group.
//!
//! ```toml
//! [group]
//! name = "microservices"
//!
//! [[program]]
//! name = "api-server"
//! directory = "/opt/api-server"
//! user = "deploy"
//! log_directory = "/var/log/services"
//! startretries = 3
//! environment = { APP_ENV = "production" }
//! ```
//!
//! Every optional key present in a `[[program]]` table goes through the
//! field's setter, so it counts as explicitly set even when it repeats the
//! supervisord default. Absent keys keep their unset defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::SupervisorError;
use crate::program::{GroupConfig, ProgramConfig};
use crate::render::Renderer;
use crate::types::AutoRestart;
use crate::validate;

#[derive(Debug, Deserialize)]
struct ManifestFile {
    group: Option<GroupEntry>,
    #[serde(default)]
    program: Vec<ProgramEntry>,
}

#[derive(Debug, Deserialize)]
struct GroupEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ProgramEntry {
    name: String,
    directory: String,
    user: String,
    log_directory: String,

    environment: Option<BTreeMap<String, String>>,
    autostart: Option<bool>,
    autorestart: Option<AutoRestart>,
    startretries: Option<u32>,
    startsecs: Option<u32>,
    log_max_bytes: Option<String>,
    log_backups: Option<u32>,
    redirect_stderr: Option<bool>,
    stopasgroup: Option<bool>,
    stopwaitsecs: Option<u32>,
    killasgroup: Option<bool>,
    stopsignal: Option<String>,
    priority: Option<i32>,
    exitcodes: Option<Vec<i32>>,
    numprocs: Option<u32>,
    process_name: Option<String>,
}

macro_rules! apply {
    ($program:ident, $entry:ident, [$($field:ident),* $(,)?]) => {
        $(
            if let Some(value) = $entry.$field {
                $program.$field.set(value);
            }
        )*
    };
}

fn build_program(entry: ProgramEntry) -> Result<ProgramConfig, SupervisorError> {
    let mut program = ProgramConfig::new(
        entry.name,
        entry.directory,
        entry.user,
        entry.log_directory,
    )?;
    apply!(
        program,
        entry,
        [
            environment,
            autostart,
            autorestart,
            startretries,
            startsecs,
            log_max_bytes,
            log_backups,
            redirect_stderr,
            stopasgroup,
            stopwaitsecs,
            killasgroup,
            stopsignal,
            priority,
            exitcodes,
            numprocs,
            process_name,
        ]
    );
    Ok(program)
}

/// What a manifest declares.
#[derive(Debug, Clone)]
pub enum Contents {
    /// A `[group]` table plus its programs.
    Group(GroupConfig),
    /// Standalone programs, in file order.
    Programs(Vec<ProgramConfig>),
}

/// A loaded manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    contents: Contents,
}

impl Manifest {
    /// Read and parse a manifest file.
    pub fn load(path: &Path, strict: bool) -> Result<Self, SupervisorError> {
        let content = std::fs::read_to_string(path).map_err(|e| SupervisorError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content, path, strict)
    }

    /// Parse manifest text. `path` is only used in error messages.
    ///
    /// In strict mode unknown keys fail with [`SupervisorError::UnknownKeys`].
    pub fn parse(content: &str, path: &Path, strict: bool) -> Result<Self, SupervisorError> {
        if strict {
            validate::validate_unknown_keys::<ManifestFile>(content, path)?;
        }
        let file: ManifestFile =
            toml::from_str(content).map_err(|e| SupervisorError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

        if file.program.is_empty() {
            return Err(SupervisorError::EmptyManifest {
                path: path.to_path_buf(),
            });
        }

        let programs = file
            .program
            .into_iter()
            .map(build_program)
            .collect::<Result<Vec<_>, _>>()?;

        let contents = match file.group {
            Some(group) => {
                let mut config = GroupConfig::new(group.name)?;
                for program in programs {
                    config.push(program);
                }
                Contents::Group(config)
            }
            None => Contents::Programs(programs),
        };

        let manifest = Self {
            path: path.to_path_buf(),
            contents,
        };
        debug!(
            path = %manifest.path.display(),
            programs = manifest.programs().len(),
            grouped = manifest.group().is_some(),
            "loaded manifest"
        );
        Ok(manifest)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contents(&self) -> &Contents {
        &self.contents
    }

    pub fn group(&self) -> Option<&GroupConfig> {
        match &self.contents {
            Contents::Group(group) => Some(group),
            Contents::Programs(_) => None,
        }
    }

    pub fn programs(&self) -> &[ProgramConfig] {
        match &self.contents {
            Contents::Group(group) => group.programs(),
            Contents::Programs(programs) => programs,
        }
    }

    /// Render the whole manifest.
    ///
    /// A group renders as a `[group:x]` section. A lone program renders
    /// exactly as [`Renderer::render_program`] would. Several ungrouped
    /// programs are trimmed and separated by one blank line.
    pub fn render(&self, renderer: &Renderer) -> Result<String, SupervisorError> {
        match &self.contents {
            Contents::Group(group) => renderer.render_group(group),
            Contents::Programs(programs) if programs.len() == 1 => {
                renderer.render_program(&programs[0])
            }
            Contents::Programs(programs) => {
                let sections = programs
                    .iter()
                    .map(|p| {
                        renderer
                            .render_program(p)
                            .map(|text| text.trim().to_string())
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("{}\n", sections.join("\n\n")))
            }
        }
    }
}
