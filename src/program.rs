//! Program and group descriptors.
//!
//! [`ProgramConfig::new`] is the default provider: it validates the four
//! required strings and seeds every optional field with the supervisor's own
//! default, unset. The chained `with_*` setters mark fields as explicitly set.

use std::collections::BTreeMap;

use crate::error::SupervisorError;
use crate::opt::Opt;
use crate::types::AutoRestart;

/// Reject an empty required string.
pub(crate) fn ensure_non_empty(field: &'static str, value: &str) -> Result<(), SupervisorError> {
    if value.is_empty() {
        return Err(SupervisorError::EmptyField { field });
    }
    Ok(())
}

/// One `[program:x]` section.
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    name: String,
    directory: String,
    user: String,
    log_directory: String,

    pub environment: Opt<BTreeMap<String, String>>,

    pub autostart: Opt<bool>,
    pub autorestart: Opt<AutoRestart>,
    pub startretries: Opt<u32>,
    pub startsecs: Opt<u32>,

    /// Applies to both `stdout_logfile_maxbytes` and `stderr_logfile_maxbytes`.
    pub log_max_bytes: Opt<String>,
    /// Applies to both `stdout_logfile_backups` and `stderr_logfile_backups`.
    pub log_backups: Opt<u32>,
    pub redirect_stderr: Opt<bool>,

    pub stopasgroup: Opt<bool>,
    pub stopwaitsecs: Opt<u32>,
    pub killasgroup: Opt<bool>,
    pub stopsignal: Opt<String>,
    pub priority: Opt<i32>,
    pub exitcodes: Opt<Vec<i32>>,

    pub numprocs: Opt<u32>,
    pub process_name: Opt<String>,
}

impl ProgramConfig {
    /// Create a program with supervisord's documented defaults, none of them
    /// marked as set.
    ///
    /// `directory` is the program root; the command resolves to
    /// `{directory}/bin/{name}` and logs land in `log_directory`.
    pub fn new(
        name: impl Into<String>,
        directory: impl Into<String>,
        user: impl Into<String>,
        log_directory: impl Into<String>,
    ) -> Result<Self, SupervisorError> {
        let program = Self::with_required(
            name.into(),
            directory.into(),
            user.into(),
            log_directory.into(),
        );
        program.validate()?;
        Ok(program)
    }

    fn with_required(name: String, directory: String, user: String, log_directory: String) -> Self {
        Self {
            name,
            directory,
            user,
            log_directory,

            environment: Opt::new(BTreeMap::new()),

            autostart: Opt::new(true),
            autorestart: Opt::new(AutoRestart::default()),
            startretries: Opt::new(3),
            startsecs: Opt::new(1),

            log_max_bytes: Opt::new("50MB".to_string()),
            log_backups: Opt::new(10),
            redirect_stderr: Opt::new(false),

            stopasgroup: Opt::new(false),
            stopwaitsecs: Opt::new(10),
            killasgroup: Opt::new(false),
            stopsignal: Opt::new("TERM".to_string()),
            priority: Opt::new(999),
            exitcodes: Opt::new(vec![0]),

            numprocs: Opt::new(1),
            process_name: Opt::new("%(program_name)s".to_string()),
        }
    }

    /// A fresh all-defaults descriptor sharing this program's required fields.
    /// Baseline for [`RenderPolicy::NonDefault`](crate::RenderPolicy::NonDefault).
    pub(crate) fn baseline(&self) -> Self {
        Self::with_required(
            self.name.clone(),
            self.directory.clone(),
            self.user.clone(),
            self.log_directory.clone(),
        )
    }

    pub(crate) fn validate(&self) -> Result<(), SupervisorError> {
        ensure_non_empty("name", &self.name)?;
        ensure_non_empty("directory", &self.directory)?;
        ensure_non_empty("user", &self.user)?;
        ensure_non_empty("log_directory", &self.log_directory)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn log_directory(&self) -> &str {
        &self.log_directory
    }

    /// Replace the environment map.
    pub fn with_environment<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.environment.set(map);
        self
    }

    /// Add one variable on top of the current environment.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut map = self.environment.get().clone();
        map.insert(key.into(), value.into());
        self.environment.set(map);
        self
    }

    pub fn with_autostart(mut self, autostart: bool) -> Self {
        self.autostart.set(autostart);
        self
    }

    /// Accepts a `bool` or a [`RestartMode`](crate::RestartMode).
    pub fn with_autorestart(mut self, autorestart: impl Into<AutoRestart>) -> Self {
        self.autorestart.set(autorestart.into());
        self
    }

    /// Keyword form (`"true"`, `"false"`, `"unexpected"`). Anything else
    /// fails with [`SupervisorError::InvalidAutoRestart`], consuming the
    /// descriptor.
    pub fn with_autorestart_str(mut self, keyword: &str) -> Result<Self, SupervisorError> {
        self.autorestart.set(keyword.parse()?);
        Ok(self)
    }

    pub fn with_startretries(mut self, startretries: u32) -> Self {
        self.startretries.set(startretries);
        self
    }

    pub fn with_startsecs(mut self, startsecs: u32) -> Self {
        self.startsecs.set(startsecs);
        self
    }

    pub fn with_log_max_bytes(mut self, log_max_bytes: impl Into<String>) -> Self {
        self.log_max_bytes.set(log_max_bytes.into());
        self
    }

    pub fn with_log_backups(mut self, log_backups: u32) -> Self {
        self.log_backups.set(log_backups);
        self
    }

    pub fn with_redirect_stderr(mut self, redirect_stderr: bool) -> Self {
        self.redirect_stderr.set(redirect_stderr);
        self
    }

    pub fn with_stopasgroup(mut self, stopasgroup: bool) -> Self {
        self.stopasgroup.set(stopasgroup);
        self
    }

    pub fn with_stopwaitsecs(mut self, stopwaitsecs: u32) -> Self {
        self.stopwaitsecs.set(stopwaitsecs);
        self
    }

    pub fn with_killasgroup(mut self, killasgroup: bool) -> Self {
        self.killasgroup.set(killasgroup);
        self
    }

    pub fn with_stopsignal(mut self, stopsignal: impl Into<String>) -> Self {
        self.stopsignal.set(stopsignal.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority.set(priority);
        self
    }

    /// Rendered in the given order, duplicates kept.
    pub fn with_exitcodes(mut self, exitcodes: impl Into<Vec<i32>>) -> Self {
        self.exitcodes.set(exitcodes.into());
        self
    }

    pub fn with_numprocs(mut self, numprocs: u32) -> Self {
        self.numprocs.set(numprocs);
        self
    }

    pub fn with_process_name(mut self, process_name: impl Into<String>) -> Self {
        self.process_name.set(process_name.into());
        self
    }
}

/// One `[group:x]` section and its member programs, in render order.
#[derive(Debug, Clone)]
pub struct GroupConfig {
    name: String,
    programs: Vec<ProgramConfig>,
}

impl GroupConfig {
    pub fn new(name: impl Into<String>) -> Result<Self, SupervisorError> {
        let name = name.into();
        ensure_non_empty("group name", &name)?;
        Ok(Self {
            name,
            programs: Vec::new(),
        })
    }

    /// Append a program. Insertion order is the `programs=` order and the
    /// order the program sections are rendered in.
    pub fn add_program(mut self, program: ProgramConfig) -> Self {
        self.programs.push(program);
        self
    }

    pub fn push(&mut self, program: ProgramConfig) {
        self.programs.push(program);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn programs(&self) -> &[ProgramConfig] {
        &self.programs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RestartMode;

    fn program() -> ProgramConfig {
        ProgramConfig::new("myapp", "/opt/myapp", "deploy", "/var/log/myapp").unwrap()
    }

    #[test]
    fn defaults_match_supervisord() {
        let p = program();
        assert!(*p.autostart.get());
        assert_eq!(
            *p.autorestart.get(),
            AutoRestart::Mode(RestartMode::Unexpected)
        );
        assert_eq!(*p.startretries.get(), 3);
        assert_eq!(*p.startsecs.get(), 1);
        assert_eq!(p.log_max_bytes.get(), "50MB");
        assert_eq!(*p.log_backups.get(), 10);
        assert!(!*p.redirect_stderr.get());
        assert!(!*p.stopasgroup.get());
        assert_eq!(*p.stopwaitsecs.get(), 10);
        assert!(!*p.killasgroup.get());
        assert_eq!(p.stopsignal.get(), "TERM");
        assert_eq!(*p.priority.get(), 999);
        assert_eq!(p.exitcodes.get(), &vec![0]);
        assert_eq!(*p.numprocs.get(), 1);
        assert_eq!(p.process_name.get(), "%(program_name)s");
        assert!(p.environment.get().is_empty());
    }

    #[test]
    fn defaults_are_all_unset() {
        let p = program();
        let flags = [
            p.environment.is_set(),
            p.autostart.is_set(),
            p.autorestart.is_set(),
            p.startretries.is_set(),
            p.startsecs.is_set(),
            p.log_max_bytes.is_set(),
            p.log_backups.is_set(),
            p.redirect_stderr.is_set(),
            p.stopasgroup.is_set(),
            p.stopwaitsecs.is_set(),
            p.killasgroup.is_set(),
            p.stopsignal.is_set(),
            p.priority.is_set(),
            p.exitcodes.is_set(),
            p.numprocs.is_set(),
            p.process_name.is_set(),
        ];
        assert!(flags.iter().all(|set| !set));
    }

    #[test]
    fn required_fields_are_kept() {
        let p = program();
        assert_eq!(p.name(), "myapp");
        assert_eq!(p.directory(), "/opt/myapp");
        assert_eq!(p.user(), "deploy");
        assert_eq!(p.log_directory(), "/var/log/myapp");
    }

    #[test]
    fn empty_required_field_is_rejected() {
        let err = ProgramConfig::new("myapp", "/opt/myapp", "", "/var/log/myapp").unwrap_err();
        assert!(matches!(err, SupervisorError::EmptyField { field: "user" }));

        let err = ProgramConfig::new("", "/opt/myapp", "deploy", "/var/log").unwrap_err();
        assert!(matches!(err, SupervisorError::EmptyField { field: "name" }));
    }

    #[test]
    fn setters_mark_fields() {
        let p = program().with_startretries(3).with_priority(5);
        assert!(p.startretries.is_set());
        assert_eq!(*p.startretries.get(), 3);
        assert!(p.priority.is_set());
        assert!(!p.startsecs.is_set());
    }

    #[test]
    fn with_env_accumulates() {
        let p = program()
            .with_env("APP_ENV", "production")
            .with_env("PORT", "8080");
        assert!(p.environment.is_set());
        assert_eq!(p.environment.get().len(), 2);
        assert_eq!(p.environment.get()["PORT"], "8080");
    }

    #[test]
    fn with_environment_replaces() {
        let p = program()
            .with_env("OLD", "1")
            .with_environment([("APP_ENV", "production")]);
        assert_eq!(p.environment.get().len(), 1);
        assert!(!p.environment.get().contains_key("OLD"));
    }

    #[test]
    fn autorestart_keyword_setter_validates() {
        let p = program().with_autorestart_str("true").unwrap();
        assert_eq!(*p.autorestart.get(), AutoRestart::Mode(RestartMode::True));
        assert!(p.autorestart.is_set());

        let err = program().with_autorestart_str("yes").unwrap_err();
        assert!(matches!(err, SupervisorError::InvalidAutoRestart(_)));
    }

    #[test]
    fn autorestart_accepts_bool_and_mode() {
        let p = program().with_autorestart(false);
        assert_eq!(*p.autorestart.get(), AutoRestart::Flag(false));
        let p = program().with_autorestart(RestartMode::Unexpected);
        assert!(p.autorestart.is_set());
    }

    #[test]
    fn baseline_drops_customization() {
        let p = program().with_startretries(10).with_env("A", "b");
        let base = p.baseline();
        assert_eq!(base.name(), "myapp");
        assert_eq!(*base.startretries.get(), 3);
        assert!(!base.startretries.is_set());
        assert!(base.environment.get().is_empty());
    }

    #[test]
    fn group_keeps_insertion_order() {
        let a = ProgramConfig::new("a", "/opt/a", "u", "/var/log").unwrap();
        let b = ProgramConfig::new("b", "/opt/b", "u", "/var/log").unwrap();
        let group = GroupConfig::new("g").unwrap().add_program(b).add_program(a);
        let names: Vec<&str> = group.programs().iter().map(|p| p.name()).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn group_requires_name() {
        let err = GroupConfig::new("").unwrap_err();
        assert!(matches!(err, SupervisorError::EmptyField { .. }));
    }
}
