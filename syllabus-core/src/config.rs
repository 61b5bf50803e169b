//! Global configuration at ~/.config/syllabus/config.toml, overridable with
//! `SYLLABUS_*` environment variables.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{SyllabusError, SyllabusResult};
use crate::weekday::WeekdayTable;

const DEFAULT_TIME_ZONE: &str = "UTC";
const DEFAULT_CALENDAR_ID: &str = "primary";
const DEFAULT_SERVER_PORT: u16 = 4096;

fn default_time_zone() -> String {
    DEFAULT_TIME_ZONE.to_string()
}

fn default_calendar_id() -> String {
    DEFAULT_CALENDAR_ID.to_string()
}

fn default_server_port() -> u16 {
    DEFAULT_SERVER_PORT
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyllabusConfig {
    /// Course label used in task titles when the syllabus has no `Course:` line
    #[serde(default)]
    pub course: Option<String>,

    /// IANA zone for timed calendar events
    #[serde(default = "default_time_zone")]
    pub time_zone: String,

    #[serde(default)]
    pub database_path: Option<PathBuf>,

    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,

    /// Google account whose session is used for calendar calls
    #[serde(default)]
    pub account: Option<String>,

    #[serde(default = "default_server_port")]
    pub server_port: u16,

    /// Extra or replacement weekday abbreviations, e.g. `T = "thursday"`
    #[serde(default)]
    pub weekday_abbreviations: BTreeMap<String, String>,
}

impl Default for SyllabusConfig {
    fn default() -> Self {
        SyllabusConfig {
            course: None,
            time_zone: default_time_zone(),
            database_path: None,
            calendar_id: default_calendar_id(),
            account: None,
            server_port: default_server_port(),
            weekday_abbreviations: BTreeMap::new(),
        }
    }
}

/// ~/.config/syllabus
pub fn config_dir() -> SyllabusResult<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| SyllabusError::Config("Could not determine config directory".into()))?
        .join("syllabus"))
}

impl SyllabusConfig {
    pub fn config_path() -> SyllabusResult<PathBuf> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load the global config, creating a commented default file on first use.
    pub fn load() -> SyllabusResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> SyllabusResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("SYLLABUS"))
            .build()
            .map_err(|e| SyllabusError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| SyllabusError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> SyllabusResult<()> {
        let contents = format!(
            "\
# syllabus configuration

# Course label used in event titles:
# course = \"Contracts\"

# Time zone for timed events:
# time_zone = \"{}\"

# Where saved tasks are stored:
# database_path = \"~/.local/share/syllabus/tasks.db\"

# Calendar to create events in:
# calendar_id = \"{}\"

# Google account to sync with:
# account = \"me@example.com\"

# Port for syllabus-server:
# server_port = {}

# Weekday abbreviations, added to or replacing the defaults:
# [weekday_abbreviations]
# R = \"thursday\"
",
            DEFAULT_TIME_ZONE, DEFAULT_CALENDAR_ID, DEFAULT_SERVER_PORT
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SyllabusError::Config(format!("Could not create config directory: {e}")))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| SyllabusError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    pub fn tz(&self) -> SyllabusResult<Tz> {
        self.time_zone
            .parse()
            .map_err(|_| SyllabusError::Config(format!("Unknown time zone '{}'", self.time_zone)))
    }

    pub fn weekday_table(&self) -> SyllabusResult<WeekdayTable> {
        WeekdayTable::with_overrides(&self.weekday_abbreviations)
    }

    /// Task database path with `~` expanded. Defaults to the platform data dir.
    pub fn database_path(&self) -> SyllabusResult<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(PathBuf::from(
                shellexpand::tilde(&path.to_string_lossy()).into_owned(),
            )),
            None => Ok(dirs::data_dir()
                .ok_or_else(|| SyllabusError::Config("Could not determine data directory".into()))?
                .join("syllabus")
                .join("tasks.db")),
        }
    }

    /// Account to use, or an error telling the user how to set one.
    pub fn require_account(&self) -> SyllabusResult<&str> {
        self.account.as_deref().ok_or_else(|| {
            SyllabusError::Config(
                "No account configured. Set `account` in config.toml or SYLLABUS_ACCOUNT.".to_string(),
            )
        })
    }
}
