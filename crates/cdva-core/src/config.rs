//! Settings store for the persistent configuration record
//!
//! The configuration lives as pretty-printed JSON at
//! `<home>/cdva-create.json`. Loading always runs the record through a pure
//! defaulting step: any recognized field missing from the file is filled with
//! an OS-appropriate default, and if anything was filled the whole file is
//! rewritten. Writes are whole-file overwrites with no locking; this is a
//! single-shot local tool, last write wins.

use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the configuration record inside the user's home folder
pub const CONFIG_FILE_NAME: &str = "cdva-create.json";

/// Default platform lists per host OS branch
const DEFAULT_PLATFORMS_WINDOWS: &[&str] = &["android", "windows"];
const DEFAULT_PLATFORMS_LINUX: &[&str] = &["ubuntu"];
const DEFAULT_PLATFORMS_FALLBACK: &[&str] = &["android", "ios"];

/// Default plugin trio added to every new project
const DEFAULT_PLUGINS: &[&str] = &[
    "org.apache.cordova.console",
    "org.apache.cordova.dialogs",
    "org.apache.cordova.device",
];

/// Errors from the settings store. All of these are fatal at the binary.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to determine home folder ({0} is not set)")]
    HomeNotSet(&'static str),

    #[error("unable to read configuration file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("configuration file {path} is not valid JSON")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unable to write configuration file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to set file permissions on {path}")]
    Permissions {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Host operating system classification
///
/// Drives which home-folder environment variable is consulted and which
/// default platform list a fresh configuration gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    Linux,
    Other,
}

impl HostOs {
    /// Classify the OS this process is running on
    pub fn current() -> Self {
        if cfg!(windows) {
            HostOs::Windows
        } else if cfg!(target_os = "linux") {
            HostOs::Linux
        } else {
            HostOs::Other
        }
    }

    pub fn is_windows(self) -> bool {
        matches!(self, HostOs::Windows)
    }

    /// Environment variable holding the user's home folder on this OS
    pub fn home_var(self) -> &'static str {
        if self.is_windows() {
            "USERPROFILE"
        } else {
            "HOME"
        }
    }

    fn default_platforms(self) -> &'static [&'static str] {
        match self {
            HostOs::Windows => DEFAULT_PLATFORMS_WINDOWS,
            HostOs::Linux => DEFAULT_PLATFORMS_LINUX,
            HostOs::Other => DEFAULT_PLATFORMS_FALLBACK,
        }
    }
}

/// The persistent configuration record
///
/// `copyFrom` and `linkTo` are mutually exclusive in effect: a non-empty,
/// resolvable `copyFrom` wins and `linkTo` is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Platforms added to a new project when none are given on the command line
    pub platform_list: Vec<String>,

    /// Plugins added to every new project, in order
    pub plugin_list: Vec<String>,

    /// Pass `-d` to every delegated cordova command
    pub enable_debug: bool,

    /// Path handed to `cordova create --copy-from` (empty = unused)
    pub copy_from: String,

    /// Path handed to `cordova create --link-to` (empty = unused)
    pub link_to: String,

    /// Extra arguments appended verbatim to the create command (empty = none)
    pub create_parms: String,
}

impl AppConfig {
    /// The record a fresh install gets on the given OS
    pub fn default_for(os: HostOs) -> Self {
        let (config, _) = apply_defaults(os, PartialConfig::default());
        config
    }
}

/// What a possibly-incomplete configuration file deserializes into
///
/// Every field is optional so that files written by older versions (or edited
/// by hand) still load; [`apply_defaults`] fills in the rest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialConfig {
    pub platform_list: Option<Vec<String>>,
    pub plugin_list: Option<Vec<String>>,
    pub enable_debug: Option<bool>,
    pub copy_from: Option<String>,
    pub link_to: Option<String>,
    pub create_parms: Option<String>,
}

fn string_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Defaulting step: fill every missing field with its OS-appropriate default
///
/// Pure function of the OS branch and the partial record. The returned flag
/// reports whether any field had to be filled, i.e. whether the file on disk
/// is out of date. Running it on a complete record changes nothing.
pub fn apply_defaults(os: HostOs, partial: PartialConfig) -> (AppConfig, bool) {
    let mut changed = false;
    let mut fill = |missing: bool| {
        changed |= missing;
    };

    fill(partial.platform_list.is_none());
    fill(partial.plugin_list.is_none());
    fill(partial.enable_debug.is_none());
    fill(partial.copy_from.is_none());
    fill(partial.link_to.is_none());
    fill(partial.create_parms.is_none());

    let config = AppConfig {
        platform_list: partial
            .platform_list
            .unwrap_or_else(|| string_vec(os.default_platforms())),
        plugin_list: partial
            .plugin_list
            .unwrap_or_else(|| string_vec(DEFAULT_PLUGINS)),
        enable_debug: partial.enable_debug.unwrap_or(false),
        copy_from: partial.copy_from.unwrap_or_default(),
        link_to: partial.link_to.unwrap_or_default(),
        create_parms: partial.create_parms.unwrap_or_default(),
    };

    (config, changed)
}

/// Configuration file path inside the given home folder
pub fn config_file_in(home: impl AsRef<Path>) -> PathBuf {
    home.as_ref().join(CONFIG_FILE_NAME)
}

/// Resolve the configuration file location from the OS home variable
///
/// Fails when the variable is unset or empty; there is nowhere sensible to
/// put the file in that case.
pub fn config_path(os: HostOs) -> Result<PathBuf, ConfigError> {
    let var = os.home_var();
    match env::var_os(var) {
        Some(home) if !home.is_empty() => Ok(config_file_in(home)),
        _ => Err(ConfigError::HomeNotSet(var)),
    }
}

/// Serialize the record the way the file is persisted: 4-space indent
pub fn to_pretty_json(config: &AppConfig) -> String {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    config
        .serialize(&mut ser)
        .expect("configuration record serializes to JSON");
    String::from_utf8(buf).expect("serde_json emits UTF-8")
}

/// Load the configuration record, creating or upgrading the file as needed
///
/// If the file does not exist an empty record is synthesized; either way the
/// record passes through [`apply_defaults`], and any filled field triggers a
/// full rewrite of the file. On Unix the rewritten file is made
/// world-writable.
pub fn load(path: &Path, os: HostOs) -> Result<AppConfig, ConfigError> {
    let partial = if path.exists() {
        println!("Reading configuration file");
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        println!("Creating configuration file");
        PartialConfig::default()
    };

    let (config, changed) = apply_defaults(os, partial);
    if changed {
        write_config(path, &config)?;
    }
    Ok(config)
}

/// Resolve the path from the environment, then load
pub fn load_default(os: HostOs) -> Result<AppConfig, ConfigError> {
    let path = config_path(os)?;
    load(&path, os)
}

fn write_config(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    println!("{}", format!("Writing configuration to {}", path.display()).cyan());
    fs::write(path, to_pretty_json(config)).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o777)).map_err(|source| {
            ConfigError::Permissions {
                path: path.to_path_buf(),
                source,
            }
        })?;
    }

    Ok(())
}
