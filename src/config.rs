use std::path::PathBuf;

/// Dataset used when `SNAP_DATA_PATH` is not set.
pub const DEFAULT_DATA_PATH: &str = "snap_1989_2025_monthly_2025_1.csv";

/// Startup settings, read from the environment (a `.env` file is loaded
/// into it first).
///
/// * `SNAP_DATA_PATH`     – table to load at startup
/// * `SNAP_DEFAULT_STATE` – state selected initially (first state otherwise)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_path: PathBuf,
    pub default_state: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Config {
            data_path: get("SNAP_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            default_state: get("SNAP_DEFAULT_STATE").map(|s| s.trim().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_when_unset() {
        let cfg = Config::from_lookup(|_| None);
        assert_eq!(cfg.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        assert_eq!(cfg.default_state, None);
    }

    #[test]
    fn reads_values_and_ignores_blanks() {
        let vars: HashMap<&str, &str> =
            [("SNAP_DATA_PATH", "/data/snap.parquet"), ("SNAP_DEFAULT_STATE", " ")]
                .into_iter()
                .collect();
        let cfg = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.data_path, PathBuf::from("/data/snap.parquet"));
        assert_eq!(cfg.default_state, None);

        let cfg = Config::from_lookup(|k| (k == "SNAP_DEFAULT_STATE").then(|| "GA".to_string()));
        assert_eq!(cfg.default_state.as_deref(), Some("GA"));
    }
}
