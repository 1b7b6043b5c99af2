use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    time::Duration,
};

use directories::BaseDirs;

use crate::introspect::DEFAULT_ENTRY;

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    overrides: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        let config_path = env::var_os("RANALYSIS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(default_config_path);
        Self::load_from(&config_path)
    }

    /// Defaults, then `KEY=VALUE` lines from `config_path`, then environment.
    pub fn load_from(config_path: &Path) -> Self {
        let mut map = default_map();

        if config_path.exists() {
            if let Ok(file) = fs::File::open(config_path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    if let Some((k, v)) = line.split_once('=') {
                        map.insert(k.trim().to_string(), v.trim().to_string());
                    }
                }
            }
        }

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self {
            inner: map,
            overrides: HashMap::new(),
            config_path: config_path.to_path_buf(),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(v) = self.overrides.get(key) {
            return Some(v.clone());
        }
        // ENV next
        if let Ok(v) = env::var(key) {
            return Some(v);
        }
        self.inner.get(key).cloned()
    }

    /// Override a key for this process, ahead of environment and rc file.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.overrides.insert(key.to_string(), value.into());
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
    }

    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from)
    }

    pub fn rscript_path(&self) -> String {
        self.get("RSCRIPT_PATH").unwrap_or_else(|| "Rscript".into())
    }

    pub fn entry_function(&self) -> String {
        self.get("ENTRY_FUNCTION")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENTRY.into())
    }

    /// Script extension without the leading dot.
    pub fn script_extension(&self) -> String {
        self.get("SCRIPT_EXTENSION")
            .map(|v| v.trim_start_matches('.').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "R".into())
    }

    /// `None` when `EXECUTION_TIMEOUT` is `0` or unset.
    pub fn execution_timeout(&self) -> Option<Duration> {
        self.get_u64("EXECUTION_TIMEOUT")
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn analysis_directory(&self) -> Option<PathBuf> {
        self.get_path("ANALYSIS_DIRECTORY")
    }

    pub fn state_path(&self) -> PathBuf {
        self.get_path("STATE_PATH")
            .unwrap_or_else(|| config_dir().join("state.json"))
    }
}

fn is_config_key(k: &str) -> bool {
    // Accept known keys or RANALYSIS_* for forward-compat
    const KEYS: &[&str] = &[
        "RSCRIPT_PATH",
        "ENTRY_FUNCTION",
        "SCRIPT_EXTENSION",
        "EXECUTION_TIMEOUT",
        "ANALYSIS_DIRECTORY",
        "DEFAULT_COLOR",
        "STATE_PATH",
        "REMEMBER_STATE",
    ];

    KEYS.contains(&k) || k.starts_with("RANALYSIS_")
}

fn config_dir() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("ranalysis")
}

fn default_config_path() -> PathBuf {
    config_dir().join(".ranalysisrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    m.insert(
        "STATE_PATH".into(),
        config_dir().join("state.json").to_string_lossy().into_owned(),
    );

    m.insert("RSCRIPT_PATH".into(), "Rscript".into());
    m.insert("ENTRY_FUNCTION".into(), DEFAULT_ENTRY.into());
    m.insert("SCRIPT_EXTENSION".into(), "R".into());
    m.insert("DEFAULT_COLOR".into(), "cyan".into());

    // Seconds; 0 disables the deadline
    m.insert("EXECUTION_TIMEOUT".into(), "0".into());

    m.insert("REMEMBER_STATE".into(), "true".into());

    m
}
