use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SupervisorError;

/// The three keywords supervisord accepts for `autorestart`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestartMode {
    False,
    True,
    Unexpected,
}

impl RestartMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RestartMode::False => "false",
            RestartMode::True => "true",
            RestartMode::Unexpected => "unexpected",
        }
    }
}

/// Value of the `autorestart` key: either a plain boolean or one of the
/// keyword spellings.
///
/// Both shapes render to the same text (`Flag(true)` and `Mode(True)` both
/// print `true`) but they are distinct values, so the non-default policy
/// treats `Flag(true)` as a change from the `unexpected` default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawAutoRestart")]
pub enum AutoRestart {
    Flag(bool),
    Mode(RestartMode),
}

impl Default for AutoRestart {
    fn default() -> Self {
        AutoRestart::Mode(RestartMode::Unexpected)
    }
}

impl From<bool> for AutoRestart {
    fn from(flag: bool) -> Self {
        AutoRestart::Flag(flag)
    }
}

impl From<RestartMode> for AutoRestart {
    fn from(mode: RestartMode) -> Self {
        AutoRestart::Mode(mode)
    }
}

impl FromStr for AutoRestart {
    type Err = SupervisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "false" => Ok(AutoRestart::Mode(RestartMode::False)),
            "true" => Ok(AutoRestart::Mode(RestartMode::True)),
            "unexpected" => Ok(AutoRestart::Mode(RestartMode::Unexpected)),
            other => Err(SupervisorError::InvalidAutoRestart(other.to_string())),
        }
    }
}

impl fmt::Display for AutoRestart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutoRestart::Flag(b) => write!(f, "{b}"),
            AutoRestart::Mode(m) => f.write_str(m.as_str()),
        }
    }
}

/// Wire shape accepted in manifests: `autorestart = true` or
/// `autorestart = "unexpected"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAutoRestart {
    Flag(bool),
    Text(String),
}

impl TryFrom<RawAutoRestart> for AutoRestart {
    type Error = SupervisorError;

    fn try_from(raw: RawAutoRestart) -> Result<Self, Self::Error> {
        match raw {
            RawAutoRestart::Flag(b) => Ok(AutoRestart::Flag(b)),
            RawAutoRestart::Text(s) => s.parse(),
        }
    }
}

/// Which optional fields make it into the rendered text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum RenderPolicy {
    /// Emit a field iff its setter was called, even with the default value.
    #[default]
    Explicit,
    /// Emit a field iff its value differs from the supervisor default.
    NonDefault,
}

impl RenderPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderPolicy::Explicit => "explicit",
            RenderPolicy::NonDefault => "non-default",
        }
    }
}

impl fmt::Display for RenderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generator operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderAction {
    /// Render a manifest to stdout, or to `output` when given.
    Render {
        manifest: PathBuf,
        output: Option<PathBuf>,
    },
    /// Load and validate a manifest without rendering it.
    Check { manifest: PathBuf },
    /// Produce the commented settings template.
    Template { output: Option<PathBuf> },
}
