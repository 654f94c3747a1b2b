//! Engine configuration
//!
//! Defaults: MUTCD 2009 embedded tables, tie-breaks rejected, sequential
//! evaluation. Every setting can be overridden from the environment:
//!
//! | Variable              | Values                        |
//! |-----------------------|-------------------------------|
//! | `WARRANT_EDITION`     | `mutcd_2009`                  |
//! | `WARRANT_TIE_BREAK`   | `reject`, `functional_class`  |
//! | `WARRANT_PARALLEL`    | `true`, `false`               |
//! | `WARRANT_TABLES_PATH` | path to a tables JSON file    |

use crate::classify::TieBreak;
use crate::error::{EngineResult, WarrantError};
use crate::tables::Edition;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub edition: Edition,
    pub tie_break: TieBreak,
    /// Fan the nine evaluators out over the rayon pool
    pub parallel: bool,
    /// External tables file; embedded tables when absent
    pub tables_path: Option<PathBuf>,
}

impl EngineConfig {
    /// Defaults overridden by `WARRANT_*` environment variables
    pub fn from_env() -> EngineResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(edition) = lookup("WARRANT_EDITION") {
            config.edition = edition.parse()?;
        }
        if let Some(policy) = lookup("WARRANT_TIE_BREAK") {
            config.tie_break = policy.parse()?;
        }
        if let Some(parallel) = lookup("WARRANT_PARALLEL") {
            config.parallel = match parallel.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                other => {
                    return Err(WarrantError::configuration(format!(
                        "WARRANT_PARALLEL must be true or false, got '{}'",
                        other
                    )))
                }
            };
        }
        if let Some(path) = lookup("WARRANT_TABLES_PATH") {
            if !path.trim().is_empty() {
                config.tables_path = Some(PathBuf::from(path));
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.tie_break, TieBreak::Reject);
        assert!(!config.parallel);
        assert!(config.tables_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("WARRANT_EDITION", "mutcd_2009"),
            ("WARRANT_TIE_BREAK", "functional_class"),
            ("WARRANT_PARALLEL", "true"),
            ("WARRANT_TABLES_PATH", "/etc/warrants/tables.json"),
        ]))
        .unwrap();
        assert_eq!(config.tie_break, TieBreak::FunctionalClass);
        assert!(config.parallel);
        assert_eq!(config.tables_path, Some(PathBuf::from("/etc/warrants/tables.json")));
    }

    #[test]
    fn test_unknown_values_rejected() {
        for vars in [
            [("WARRANT_EDITION", "mutcd_2023")],
            [("WARRANT_TIE_BREAK", "street_name")],
            [("WARRANT_PARALLEL", "sometimes")],
        ] {
            let err = EngineConfig::from_lookup(lookup(&vars)).unwrap_err();
            assert!(matches!(err, WarrantError::Configuration { .. }));
        }
    }
}
