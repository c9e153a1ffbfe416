use std::collections::HashMap;
use std::path::PathBuf;

pub const SKYNOW_CONFIG_DIR_ENV: &str = "SKYNOW_CONFIG_DIR";
const XDG_CONFIG_HOME_ENV: &str = "XDG_CONFIG_HOME";
const HOME_ENV: &str = "HOME";

pub const PROVIDER_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub config_dir: PathBuf,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_pairs(std::env::vars())
    }

    pub(crate) fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            config_dir: resolve_config_dir(&map),
        }
    }
}

fn resolve_config_dir(env_map: &HashMap<String, String>) -> PathBuf {
    let home = env_map.get(HOME_ENV).map(String::as_str);

    if let Some(dir) = non_empty(env_map.get(SKYNOW_CONFIG_DIR_ENV)) {
        return PathBuf::from(expand_home_path(dir, home));
    }

    if let Some(xdg) = non_empty(env_map.get(XDG_CONFIG_HOME_ENV)) {
        return PathBuf::from(expand_home_path(xdg, home)).join("skynow");
    }

    if let Some(home) = home.map(str::trim).filter(|value| !value.is_empty()) {
        return PathBuf::from(home).join(".config").join("skynow");
    }

    std::env::temp_dir().join("skynow")
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).map(str::trim).filter(|v| !v.is_empty())
}

fn expand_home_path(raw: &str, home: Option<&str>) -> String {
    let trimmed = raw.trim();
    let Some(home) = home.map(str::trim).filter(|value| !value.is_empty()) else {
        return trimmed.to_string();
    };

    let home = home.trim_end_matches('/');
    let mut expanded = trimmed.replace("$HOME", home);

    if expanded == "~" {
        expanded = home.to_string();
    } else if let Some(rest) = expanded.strip_prefix("~/") {
        expanded = format!("{home}/{rest}");
    }

    expanded
}
