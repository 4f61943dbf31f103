//! Render engine: descriptors in, supervisord INI text out.
//!
//! A program section is laid out as a fixed sequence of [`Block`]s. Each block
//! writes its mandatory lines, then the optional fields the active
//! [`RenderPolicy`] admits, in table order. A blank line follows every block
//! that wrote anything, except the last one. The same table serves both
//! policies, so adding a key means adding one table entry.
//!
//! ```text
//! [program:myapp]              ┐
//! user            = deploy     │ header block
//! directory       = /opt/myapp │ (environment is optional)
//! command         = ...        ┘
//!
//! startretries    = 10         ─ process control
//!
//! stdout_logfile  = ...        ─ stdout
//!
//! stderr_logfile  = ...        ─ stderr
//!
//! stopwaitsecs    = 60         ─ advanced control
//! ```

use std::collections::BTreeMap;
use std::borrow::Cow;
use std::path::{Component, Path};

use tracing::{debug, trace};

use crate::error::SupervisorError;
use crate::program::{GroupConfig, ProgramConfig, ensure_non_empty};
use crate::types::{AutoRestart, RenderPolicy};

/// Subdirectory of the program root holding its binary.
pub const DEFAULT_COMMAND_DIR: &str = "bin";

/// Render one program with the [`Explicit`](RenderPolicy::Explicit) policy.
pub fn render_program(program: &ProgramConfig) -> Result<String, SupervisorError> {
    Renderer::default().render_program(program)
}

pub fn render_program_with(
    program: &ProgramConfig,
    policy: RenderPolicy,
) -> Result<String, SupervisorError> {
    Renderer::new(policy).render_program(program)
}

/// Render a group header followed by each member program with the
/// [`Explicit`](RenderPolicy::Explicit) policy.
pub fn render_group(group: &GroupConfig) -> Result<String, SupervisorError> {
    Renderer::default().render_group(group)
}

pub fn render_group_with(
    group: &GroupConfig,
    policy: RenderPolicy,
) -> Result<String, SupervisorError> {
    Renderer::new(policy).render_group(group)
}

/// Render options: which fields to emit and where the binary lives.
#[derive(Debug, Clone, PartialEq)]
pub struct Renderer {
    policy: RenderPolicy,
    command_dir: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderPolicy::default())
    }
}

impl Renderer {
    pub fn new(policy: RenderPolicy) -> Self {
        Self {
            policy,
            command_dir: DEFAULT_COMMAND_DIR.to_string(),
        }
    }

    /// Override the `bin` segment of `command = {directory}/bin/{name}`.
    pub fn command_dir(mut self, dir: impl Into<String>) -> Self {
        self.command_dir = dir.into();
        self
    }

    pub fn policy(&self) -> RenderPolicy {
        self.policy
    }

    pub fn render_program(&self, program: &ProgramConfig) -> Result<String, SupervisorError> {
        program.validate()?;

        let baseline = program.baseline();
        let mut sink = LineSink::default();

        for (i, block) in LAYOUT.iter().enumerate() {
            let mark = sink.lines();
            (block.lead)(program, self, &mut sink);
            for field in block.fields {
                if self.admits(field, program, &baseline) {
                    trace!(program = program.name(), key = field.key, "emit");
                    sink.entry(field.key, &(field.value)(program));
                }
            }
            if sink.lines() > mark && i + 1 < LAYOUT.len() {
                sink.blank();
            }
        }

        debug!(
            program = program.name(),
            policy = %self.policy,
            lines = sink.lines(),
            "rendered program"
        );
        Ok(sink.into_string())
    }

    pub fn render_group(&self, group: &GroupConfig) -> Result<String, SupervisorError> {
        ensure_non_empty("group name", group.name())?;
        if group.programs().is_empty() {
            return Err(SupervisorError::EmptyGroup {
                group: group.name().to_string(),
            });
        }

        let names: Vec<&str> = group.programs().iter().map(|p| p.name()).collect();

        let mut sink = LineSink::default();
        sink.line(&format!("[group:{}]", group.name()));
        sink.line(&format!("programs={}", names.join(",")));
        sink.blank();

        for program in group.programs() {
            sink.blank();
            let section = self.render_program(program)?;
            sink.line(section.trim());
        }

        debug!(
            group = group.name(),
            programs = names.len(),
            policy = %self.policy,
            "rendered group"
        );
        Ok(sink.into_string())
    }

    fn admits(&self, field: &Field, program: &ProgramConfig, baseline: &ProgramConfig) -> bool {
        let wanted = match self.policy {
            RenderPolicy::Explicit => (field.is_set)(program),
            RenderPolicy::NonDefault => (field.differs)(program, baseline),
        };
        wanted && (field.present)(program)
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// One optional `key = value` line.
struct Field {
    key: &'static str,
    is_set: fn(&ProgramConfig) -> bool,
    differs: fn(&ProgramConfig, &ProgramConfig) -> bool,
    /// Extra gate on top of the policy (empty environment never renders).
    present: fn(&ProgramConfig) -> bool,
    value: fn(&ProgramConfig) -> String,
}

struct Block {
    lead: fn(&ProgramConfig, &Renderer, &mut LineSink),
    fields: &'static [Field],
}

macro_rules! field {
    ($key:literal, $name:ident) => {
        field!($key, $name, |_: &ProgramConfig| true)
    };
    ($key:literal, $name:ident, $present:expr) => {
        Field {
            key: $key,
            is_set: |p: &ProgramConfig| p.$name.is_set(),
            differs: |p: &ProgramConfig, d: &ProgramConfig| p.$name.get() != d.$name.get(),
            present: $present,
            value: |p: &ProgramConfig| WireValue::wire(p.$name.get()),
        }
    };
}

const LAYOUT: &[Block] = &[
    Block {
        lead: program_lead,
        fields: &[field!("environment", environment, |p: &ProgramConfig| {
            !p.environment.get().is_empty()
        })],
    },
    Block {
        lead: no_lead,
        fields: &[
            field!("autostart", autostart),
            field!("autorestart", autorestart),
            field!("startretries", startretries),
            field!("startsecs", startsecs),
        ],
    },
    Block {
        lead: stdout_lead,
        fields: &[
            field!("stdout_logfile_maxbytes", log_max_bytes),
            field!("stdout_logfile_backups", log_backups),
        ],
    },
    Block {
        lead: stderr_lead,
        fields: &[
            field!("stderr_logfile_maxbytes", log_max_bytes),
            field!("stderr_logfile_backups", log_backups),
            field!("redirect_stderr", redirect_stderr),
        ],
    },
    Block {
        lead: no_lead,
        fields: &[
            field!("stopasgroup", stopasgroup),
            field!("stopwaitsecs", stopwaitsecs),
            field!("killasgroup", killasgroup),
            field!("stopsignal", stopsignal),
            field!("priority", priority),
            field!("exitcodes", exitcodes),
            field!("numprocs", numprocs),
            field!("process_name", process_name),
        ],
    },
];

fn program_lead(p: &ProgramConfig, r: &Renderer, sink: &mut LineSink) {
    let command = clean_join(&[p.directory(), &r.command_dir, p.name()]);
    sink.line(&format!("[program:{}]", p.name()));
    sink.entry("user", p.user());
    sink.entry("directory", p.directory());
    sink.entry("command", &command);
}

fn stdout_lead(p: &ProgramConfig, _: &Renderer, sink: &mut LineSink) {
    sink.entry("stdout_logfile", &log_path(p, "log"));
}

fn stderr_lead(p: &ProgramConfig, _: &Renderer, sink: &mut LineSink) {
    sink.entry("stderr_logfile", &log_path(p, "err"));
}

fn no_lead(_: &ProgramConfig, _: &Renderer, _: &mut LineSink) {}

fn log_path(p: &ProgramConfig, ext: &str) -> String {
    clean_join(&[p.log_directory(), &format!("{}.{ext}", p.name())])
}

/// Join path segments lexically with `/`.
///
/// Only the first segment may root the result; later segments are always
/// relative to it. Repeated separators and `.` disappear and `..` pops the
/// previous component (never above the root).
fn clean_join(segments: &[&str]) -> String {
    let mut rooted = false;
    let mut started = false;
    let mut parts: Vec<Cow<'_, str>> = Vec::new();

    for segment in segments {
        for component in Path::new(segment).components() {
            match component {
                Component::RootDir if !started => rooted = true,
                Component::RootDir | Component::Prefix(_) | Component::CurDir => {}
                Component::ParentDir => match parts.last() {
                    Some(last) if last != ".." => {
                        parts.pop();
                    }
                    _ if rooted => {}
                    _ => parts.push(Cow::Borrowed("..")),
                },
                Component::Normal(name) => parts.push(name.to_string_lossy()),
            }
            started = true;
        }
    }

    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

// ---------------------------------------------------------------------------
// Values and output
// ---------------------------------------------------------------------------

/// Text form of a field value on the right of `=`.
trait WireValue {
    fn wire(&self) -> String;
}

impl WireValue for bool {
    fn wire(&self) -> String {
        self.to_string()
    }
}

impl WireValue for u32 {
    fn wire(&self) -> String {
        self.to_string()
    }
}

impl WireValue for i32 {
    fn wire(&self) -> String {
        self.to_string()
    }
}

impl WireValue for String {
    fn wire(&self) -> String {
        self.clone()
    }
}

impl WireValue for AutoRestart {
    fn wire(&self) -> String {
        self.to_string()
    }
}

impl WireValue for Vec<i32> {
    fn wire(&self) -> String {
        self.iter()
            .map(|code| code.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl WireValue for BTreeMap<String, String> {
    fn wire(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Append-only text buffer, one `\n`-terminated line per call.
#[derive(Default)]
struct LineSink {
    buf: String,
    lines: usize,
}

impl LineSink {
    fn line(&mut self, text: &str) {
        self.buf.push_str(text);
        self.buf.push('\n');
        self.lines += 1;
    }

    /// `key` is padded to 15 columns: `user            = deploy`.
    fn entry(&mut self, key: &str, value: &str) {
        self.line(&format!("{key:<15} = {value}"));
    }

    fn blank(&mut self) {
        self.line("");
    }

    fn lines(&self) -> usize {
        self.lines
    }

    fn into_string(self) -> String {
        self.buf
    }
}
