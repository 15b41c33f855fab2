/// Configuration system for seodash.
///
/// Layered configuration hierarchy:
///
/// 1. **Built-in defaults**: [`schema::DashConfig::default()`]
/// 2. **User global config**: `~/.seodash/config.toml`
/// 3. **Project local config**: `.seodash.toml` in the current directory
/// 4. **Environment variables**: `SEODASH_*` overrides (highest precedence)
///
/// The transport mode is read here once; nothing downstream re-detects it.
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::backend::TransportMode;

pub use schema::DashConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges defaults → global TOML → project TOML → env vars.
pub fn load() -> DashConfig {
    let mut config = DashConfig::default();

    if let Some(global) = load_toml_file(global_config_path()) {
        config = global;
    }

    if let Some(project) = load_toml_file(project_config_path()) {
        config = project;
    }

    apply_env_overrides(&mut config);

    config
}

/// Load a TOML config file. Missing or malformed files yield `None` so a
/// bad file never prevents the dashboard from starting.
fn load_toml_file(path: Option<PathBuf>) -> Option<DashConfig> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    toml::from_str(&content).ok()
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// `~/.seodash`, home of the global config and the diagnostics log.
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".seodash"))
}

fn global_config_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("config.toml"))
}

fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".seodash.toml"))
}

/// Path of the global config file, for display.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Path of the project config file, for display.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply `SEODASH_*` overrides.
///
/// - `SEODASH_TRANSPORT`: `direct` | `proxy`
/// - `SEODASH_BACKEND_URL`: direct-mode base URL
/// - `SEODASH_RELAY_URL`: proxy relay URL
/// - `SEODASH_PLATFORM`: platform sent with start requests
/// - `SEODASH_LOG_CAPACITY`: activity log capacity
/// - `SEODASH_POLL_INTERVAL_SECS`: connection poll interval
/// - `SEODASH_ACTIVITY_SECS`: background tool activity interval
/// - `SEODASH_ADDR`: dashboard listen address
fn apply_env_overrides(config: &mut DashConfig) {
    if let Ok(val) = std::env::var("SEODASH_TRANSPORT")
        && let Some(mode) = parse_transport(&val)
    {
        config.backend.transport = mode;
    }
    if let Ok(val) = std::env::var("SEODASH_BACKEND_URL")
        && !val.is_empty()
    {
        config.backend.base_url = val;
    }
    if let Ok(val) = std::env::var("SEODASH_RELAY_URL")
        && !val.is_empty()
    {
        config.proxy.relay_url = val;
    }
    if let Ok(val) = std::env::var("SEODASH_PLATFORM")
        && !val.is_empty()
    {
        config.backend.platform = val;
    }
    if let Ok(val) = std::env::var("SEODASH_LOG_CAPACITY")
        && let Ok(n) = val.parse::<usize>()
        && n > 0
    {
        config.log.capacity = n;
    }
    if let Ok(val) = std::env::var("SEODASH_POLL_INTERVAL_SECS")
        && let Ok(secs) = val.parse::<u64>()
        && secs > 0
    {
        config.monitor.interval_secs = secs;
    }
    if let Ok(val) = std::env::var("SEODASH_ACTIVITY_SECS")
        && let Ok(secs) = val.parse::<u64>()
        && secs > 0
    {
        config.monitor.activity_secs = secs;
    }
    if let Ok(val) = std::env::var("SEODASH_ADDR")
        && !val.is_empty()
    {
        config.dashboard.addr = val;
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Parse a transport mode string.
pub fn parse_transport(val: &str) -> Option<TransportMode> {
    match val.trim().to_ascii_lowercase().as_str() {
        "direct" | "local" | "localhost" => Some(TransportMode::Direct),
        "proxy" => Some(TransportMode::Proxy),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the annotated default config to `~/.seodash/config.toml`.
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.seodash/ directory")?;
    }

    fs::write(&path, DashConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a dotted key (e.g. `backend.transport`) in the global config file.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let content = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&DashConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    // Reject edits that no longer deserialize (e.g. an unknown transport).
    let updated = toml::to_string_pretty(&root).context("failed to serialize config")?;
    toml::from_str::<DashConfig>(&updated)
        .with_context(|| format!("invalid value '{value}' for '{key}'"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, updated).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML tree using a dotted key path, keeping the type of
/// the existing value.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let Some((leaf, sections)) = parts.split_last() else {
        anyhow::bail!("empty config key");
    };

    let mut current = root;
    for &part in sections {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let table = current
        .as_table_mut()
        .with_context(|| format!("expected table at '{key}'"))?;

    let new_value = match table.get(*leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Array(_)) => toml::Value::Array(
            raw_value
                .split(',')
                .map(|s| toml::Value::String(s.trim().to_string()))
                .filter(|v| v.as_str().is_some_and(|s| !s.is_empty()))
                .collect(),
        ),
        Some(_) => toml::Value::String(raw_value.to_string()),
        None => anyhow::bail!("unknown config key '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults.
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_transport_handles_variants() {
        assert_eq!(parse_transport("direct"), Some(TransportMode::Direct));
        assert_eq!(parse_transport("LOCALHOST"), Some(TransportMode::Direct));
        assert_eq!(parse_transport(" proxy "), Some(TransportMode::Proxy));
        assert_eq!(parse_transport("pages"), None);
    }

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("YES"));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn set_toml_value_keeps_types() {
        let mut root: toml::Value = toml::from_str(
            r#"
[log]
capacity = 100
diagnostics = true

[backend]
transport = "direct"

[proxy]
capabilities = ["safetyCheck"]
"#,
        )
        .unwrap();

        set_toml_value(&mut root, "log.capacity", "25").unwrap();
        set_toml_value(&mut root, "log.diagnostics", "off").unwrap();
        set_toml_value(&mut root, "backend.transport", "proxy").unwrap();
        set_toml_value(&mut root, "proxy.capabilities", "safetyCheck, createCampaign").unwrap();

        assert_eq!(root["log"]["capacity"].as_integer(), Some(25));
        assert_eq!(root["log"]["diagnostics"].as_bool(), Some(false));
        assert_eq!(root["backend"]["transport"].as_str(), Some("proxy"));
        assert_eq!(root["proxy"]["capabilities"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn set_toml_value_rejects_bad_input() {
        let mut root: toml::Value = toml::from_str("[log]\ncapacity = 100\n").unwrap();
        assert!(set_toml_value(&mut root, "log.capacity", "many").is_err());
        assert!(set_toml_value(&mut root, "nope.key", "1").is_err());
        assert!(set_toml_value(&mut root, "log.unknown", "1").is_err());
    }

    #[test]
    fn show_effective_config_round_trips() {
        let toml_str = show_effective_config().unwrap();
        let _: DashConfig = toml::from_str(&toml_str).unwrap();
    }
}
