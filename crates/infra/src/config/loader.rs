//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads `.env` (if present) into the process environment
//! 2. Attempts to load from environment variables (`SITECAL_DB_PATH` marks an
//!    environment-configured deployment)
//! 3. Otherwise loads the first config file found by [`probe_config_paths`]
//!    and overlays any `SITECAL_*` variables that are set
//! 4. With no file at all, starts from defaults
//!
//! ## Environment Variables
//! - `SITECAL_DB_PATH`, `SITECAL_DB_POOL_SIZE`
//! - `SITECAL_BIND_ADDR`
//! - `SITECAL_PROJECT_CALENDAR_ID`, `SITECAL_WORK_ORDER_CALENDAR_ID`,
//!   `SITECAL_ADHOC_CALENDAR_ID`, `SITECAL_CONFIG_ENDPOINT`
//! - `SITECAL_GOOGLE_API_BASE`, `SITECAL_GOOGLE_TOKEN_URL`,
//!   `SITECAL_GOOGLE_ACCESS_TOKEN`, `SITECAL_GOOGLE_CLIENT_ID`,
//!   `SITECAL_GOOGLE_CLIENT_SECRET`, `SITECAL_GOOGLE_REFRESH_TOKEN`
//! - `SITECAL_WEBHOOK_TOKEN`, `SITECAL_WEBHOOK_URL`
//! - `SITECAL_DEFAULT_PROJECT_ID`, `SITECAL_CALENDAR_PROJECTS`
//!   (`calendar_id=project_id` pairs separated by commas)
//! - `SITECAL_RETRY_MAX_RETRIES`, `SITECAL_RETRY_BASE_DELAY_MS`
//!
//! ## File Locations
//! `sitecal.{toml,json}` then `config.{toml,json}`, in the working directory,
//! its parent and grandparent, then next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use sitecal_domain::{Config, Result, SiteCalError};

const FILE_STEMS: [&str; 2] = ["sitecal", "config"];
const EXTENSIONS: [&str; 2] = ["toml", "json"];

/// Load configuration with automatic fallback strategy.
///
/// # Errors
/// Returns `SiteCalError::Config` when a variable or the probed file holds an
/// invalid value.
pub fn load() -> Result<Config> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            return Ok(config);
        }
        Err(SiteCalError::Config(reason)) if reason.starts_with("Missing") => {
            tracing::debug!(%reason, "Environment incomplete, trying file");
        }
        Err(err) => return Err(err),
    }

    let mut config = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::warn!("No config file found, using defaults");
            Config::default()
        }
    };
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Load configuration from `SITECAL_*` environment variables on top of
/// defaults.
///
/// # Errors
/// Returns `SiteCalError::Config` if `SITECAL_DB_PATH` is missing or a
/// numeric variable does not parse.
pub fn load_from_env() -> Result<Config> {
    env_var("SITECAL_DB_PATH")?;
    let mut config = Config::default();
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Load configuration from a file.
///
/// If `path` is `None`, probes the standard locations. Format is chosen by
/// extension (`.toml` or `.json`).
///
/// # Errors
/// Returns `SiteCalError::Config` if the file is missing or malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SiteCalError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            SiteCalError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SiteCalError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SiteCalError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SiteCalError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(SiteCalError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file among the standard locations.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        roots.push(exe_dir);
    }

    roots
        .iter()
        .flat_map(|root| {
            FILE_STEMS.iter().flat_map(move |stem| {
                EXTENSIONS.iter().map(move |ext| root.join(format!("{stem}.{ext}")))
            })
        })
        .find(|path| path.exists())
}

fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Some(path) = optional_var("SITECAL_DB_PATH") {
        config.database.path = path;
    }
    if let Some(size) = parsed_var("SITECAL_DB_POOL_SIZE")? {
        config.database.pool_size = size;
    }
    if let Some(addr) = optional_var("SITECAL_BIND_ADDR") {
        config.server.bind_addr = addr;
    }

    let calendar = &mut config.calendar;
    override_opt(&mut calendar.project_calendar_id, "SITECAL_PROJECT_CALENDAR_ID");
    override_opt(&mut calendar.work_order_calendar_id, "SITECAL_WORK_ORDER_CALENDAR_ID");
    override_opt(&mut calendar.adhoc_calendar_id, "SITECAL_ADHOC_CALENDAR_ID");
    override_opt(&mut calendar.config_endpoint, "SITECAL_CONFIG_ENDPOINT");
    override_opt(&mut calendar.access_token, "SITECAL_GOOGLE_ACCESS_TOKEN");
    override_opt(&mut calendar.client_id, "SITECAL_GOOGLE_CLIENT_ID");
    override_opt(&mut calendar.client_secret, "SITECAL_GOOGLE_CLIENT_SECRET");
    override_opt(&mut calendar.refresh_token, "SITECAL_GOOGLE_REFRESH_TOKEN");
    if let Some(base) = optional_var("SITECAL_GOOGLE_API_BASE") {
        calendar.google_api_base = base;
    }
    if let Some(url) = optional_var("SITECAL_GOOGLE_TOKEN_URL") {
        calendar.token_url = url;
    }
    if let Some(project) = optional_var("SITECAL_DEFAULT_PROJECT_ID") {
        calendar.default_project_id = project;
    }
    if let Some(pairs) = optional_var("SITECAL_CALENDAR_PROJECTS") {
        calendar.calendar_projects.extend(parse_pairs(&pairs)?);
    }

    override_opt(&mut config.webhook.token, "SITECAL_WEBHOOK_TOKEN");
    override_opt(&mut config.webhook.url, "SITECAL_WEBHOOK_URL");

    if let Some(retries) = parsed_var("SITECAL_RETRY_MAX_RETRIES")? {
        config.retry.max_retries = retries;
    }
    if let Some(delay) = parsed_var("SITECAL_RETRY_BASE_DELAY_MS")? {
        config.retry.base_delay_ms = delay;
    }
    Ok(())
}

fn parse_pairs(raw: &str) -> Result<Vec<(String, String)>> {
    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (calendar, project) = pair.split_once('=').ok_or_else(|| {
                SiteCalError::Config(format!("Invalid calendar project pair: {pair}"))
            })?;
            Ok((calendar.trim().to_string(), project.trim().to_string()))
        })
        .collect()
}

fn env_var(key: &str) -> Result<String> {
    optional_var(key)
        .ok_or_else(|| SiteCalError::Config(format!("Missing required environment variable: {key}")))
}

/// Set and non-blank value of `key`.
fn optional_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn override_opt(slot: &mut Option<String>, key: &str) {
    if let Some(value) = optional_var(key) {
        *slot = Some(value);
    }
}

fn parsed_var<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    optional_var(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| SiteCalError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}
