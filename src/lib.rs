//! Typed, programmatic generation of supervisord configuration.
//!
//! Describe programs as Rust values, starting from supervisord's own
//! defaults, and render `[program:x]` / `[group:x]` sections whose text
//! matches what you would write by hand.
//!
//! ```
//! use supervisorgen::{ProgramConfig, render_program};
//!
//! let program = ProgramConfig::new("myapp", "/opt/myapp", "deploy", "/var/log/myapp")?
//!     .with_startretries(10)
//!     .with_env("APP_ENV", "production");
//!
//! let text = render_program(&program)?;
//! assert!(text.starts_with("[program:myapp]\nuser            = deploy\n"));
//! assert!(text.contains("\nstartretries    = 10\n"));
//! # Ok::<(), supervisorgen::SupervisorError>(())
//! ```
//!
//! # Explicit vs default
//!
//! Every optional field is an [`Opt`]: the supervisord default plus a flag
//! recording whether a setter was called. [`ProgramConfig::new`] seeds all of
//! them unset. Rendering then follows a [`RenderPolicy`]:
//!
//! - **[`Explicit`](RenderPolicy::Explicit)** (default): a field appears iff
//!   it was set, even to the default value. `.with_stopasgroup(false)` writes
//!   `stopasgroup = false`.
//! - **[`NonDefault`](RenderPolicy::NonDefault)**: a field appears iff its
//!   value differs from the supervisord default. This is the older behavior,
//!   kept for configs generated before explicit tracking existed.
//!
//! `user`, `directory`, `command`, `stdout_logfile` and `stderr_logfile`
//! always render.
//!
//! # Layout
//!
//! Lines within a program come in a fixed order and are grouped: header and
//! paths, process control, stdout logging, stderr logging, advanced control.
//! A blank line follows each group that wrote something, except the last. A
//! group section lists its programs and then renders each one, separated by
//! one blank line.
//!
//! # Manifests
//!
//! [`Manifest`] loads the same descriptions from TOML. Keys present in the
//! file count as explicitly set. Unknown keys are rejected with their line
//! number unless strict mode is off.
//!
//! # Settings
//!
//! [`GeneratorBuilder`] resolves [`Settings`] (render policy, command
//! directory) from defaults, a settings file, `SUPERVISORGEN__*` environment
//! variables and overrides, then renders manifests or handles a
//! [`RenderAction`]. With the `clap` feature (on by default), [`GenerateArgs`]
//! provides ready-made `render|check|template` subcommands.
//!
//! # Error handling
//!
//! All fallible operations return [`SupervisorError`]. Empty required
//! strings, empty groups and invalid `autorestart` keywords are rejected
//! where they enter, never by panicking.

pub mod error;
pub mod settings;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod manifest;
mod opt;
mod ops;
mod program;
mod render;
mod validate;

#[cfg(test)]
mod fixtures;

pub use builder::{GeneratorBuilder, Supervisorgen};
#[cfg(feature = "clap")]
pub use cli::{GenerateArgs, GenerateSubcommand};
pub use error::SupervisorError;
pub use manifest::{Contents, Manifest};
pub use ops::RenderResult;
pub use opt::Opt;
pub use program::{GroupConfig, ProgramConfig};
pub use render::{
    DEFAULT_COMMAND_DIR, Renderer, render_group, render_group_with, render_program,
    render_program_with,
};
pub use settings::Settings;
pub use types::{AutoRestart, RenderAction, RenderPolicy, RestartMode};
