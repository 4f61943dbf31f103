//! Clap adapter for supervisorgen.
//!
//! Compiled only with the `clap` Cargo feature (on by default). Provides
//! [`GenerateArgs`] and [`GenerateSubcommand`], derive types that give an app
//! `render|check|template` subcommands. [`GenerateArgs::into_action()`] is the
//! only bridge to the core; everything else flows through
//! [`GeneratorBuilder::handle()`](crate::GeneratorBuilder::handle).

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::types::{RenderAction, RenderPolicy};

/// Clap-derived args for the generator.
///
/// The global flags feed the builder, not the action:
/// ```ignore
/// let builder = Supervisorgen::builder()
///     .override_policy(args.policy)
///     .override_command_dir(args.command_dir.clone());
/// builder.handle_and_print(&args.into_action())?;
/// ```
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Which optional fields to render (default from settings: explicit).
    #[arg(long, global = true, value_enum)]
    pub policy: Option<RenderPolicy>,

    /// Directory under each program root holding its binary (default: bin).
    #[arg(long, global = true)]
    pub command_dir: Option<String>,

    /// Read generator settings from this TOML file.
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Accept unknown keys in manifests and settings files.
    #[arg(long, global = true)]
    pub lenient: bool,

    #[command(subcommand)]
    pub action: GenerateSubcommand,
}

/// Available generator subcommands.
#[derive(Debug, Subcommand)]
pub enum GenerateSubcommand {
    /// Render a manifest to supervisord configuration.
    Render {
        /// Path to the TOML manifest.
        manifest: PathBuf,
        /// Write to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a manifest without rendering it.
    Check {
        /// Path to the TOML manifest.
        manifest: PathBuf,
    },
    /// Print a commented settings file template.
    Template {
        /// Write to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl GenerateArgs {
    /// Convert clap-parsed args into a framework-agnostic `RenderAction`.
    pub fn into_action(self) -> RenderAction {
        match self.action {
            GenerateSubcommand::Render { manifest, output } => {
                RenderAction::Render { manifest, output }
            }
            GenerateSubcommand::Check { manifest } => RenderAction::Check { manifest },
            GenerateSubcommand::Template { output } => RenderAction::Template { output },
        }
    }
}
