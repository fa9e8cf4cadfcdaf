//! Application configuration.
//!
//! Credentials live in a Java-style properties file (`key=value` or
//! `key: value` lines), by default `private/conf.properties`. Environment variables override the file, so a
//! run can also be configured without any file at all.

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Duration;
use tracing::debug;

use crate::cache::DEFAULT_CACHE_DIR;
use crate::domain::{Coordinate, Workplace};
use crate::pipeline::PipelineConfig;
use crate::sources::DatasetClientConfig;

/// Properties file read when `COMMUTE_FINDER_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "private/conf.properties";

const CONFIG_PATH_VAR: &str = "COMMUTE_FINDER_CONFIG";

const NAVITIA_KEY: &str = "navitia.api.key";
const GOOGLE_KEY: &str = "google.api.key";
const CACHE_DIR_KEY: &str = "cache.dir";
const MAX_COMMUTE_KEY: &str = "commute.max.minutes";
const CAR_WORKPLACE_KEY: &str = "workplace.car";
const TRANSIT_WORKPLACE_KEY: &str = "workplace.transit";

/// Environment overrides, as (property, variable) pairs.
const ENV_OVERRIDES: [(&str, &str); 4] = [
    (NAVITIA_KEY, "NAVITIA_API_KEY"),
    (GOOGLE_KEY, "GOOGLE_API_KEY"),
    (CACHE_DIR_KEY, "COMMUTE_FINDER_CACHE_DIR"),
    (MAX_COMMUTE_KEY, "COMMUTE_FINDER_MAX_COMMUTE_MINS"),
];

/// Errors while assembling the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The properties file exists but could not be opened
    #[error("cannot open {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The properties file is not valid properties syntax
    #[error("cannot parse {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: java_properties::PropertiesError,
    },

    /// A required credential is set nowhere
    #[error("missing `{key}` (set it in {path} or via {var})")]
    MissingKey {
        key: &'static str,
        path: PathBuf,
        var: &'static str,
    },

    /// A value could not be interpreted
    #[error("invalid value for `{key}`: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Everything a run needs, built once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding cached responses.
    pub cache_dir: PathBuf,
    /// Workplaces and commute threshold.
    pub pipeline: PipelineConfig,
    /// Credentials and endpoints of the remote services.
    pub dataset: DatasetClientConfig,
}

impl AppConfig {
    /// Load from the properties file and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let pairs = read_properties(&path)?;
        Self::from_pairs(&path, pairs, |var| std::env::var(var).ok())
    }

    /// Assemble from file properties and an environment lookup.
    ///
    /// `path` only serves error messages.
    pub fn from_pairs<F>(
        path: &Path,
        mut pairs: HashMap<String, String>,
        env: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for (key, var) in ENV_OVERRIDES {
            if let Some(value) = env(var) {
                debug!(key, var, "environment override");
                pairs.insert(key.to_string(), value);
            }
        }

        let navitia = required(&pairs, NAVITIA_KEY, path)?;
        let google = required(&pairs, GOOGLE_KEY, path)?;

        let cache_dir = pairs
            .get(CACHE_DIR_KEY)
            .map(|dir| dir.trim())
            .filter(|dir| !dir.is_empty())
            .unwrap_or(DEFAULT_CACHE_DIR);

        let mut pipeline = PipelineConfig::default();
        if let Some(raw) = pairs.get(MAX_COMMUTE_KEY) {
            let mins = raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|mins| *mins > 0 && Duration::try_minutes(*mins).is_some())
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: MAX_COMMUTE_KEY,
                    value: raw.clone(),
                })?;
            pipeline = pipeline.with_max_commute_mins(mins);
        }
        if let Some(raw) = pairs.get(CAR_WORKPLACE_KEY) {
            let location = parse_location(CAR_WORKPLACE_KEY, raw)?;
            pipeline.car_workplace = Workplace::new(pipeline.car_workplace.name, location);
        }
        if let Some(raw) = pairs.get(TRANSIT_WORKPLACE_KEY) {
            let location = parse_location(TRANSIT_WORKPLACE_KEY, raw)?;
            pipeline.transit_workplace = Workplace::new(pipeline.transit_workplace.name, location);
        }

        Ok(Self {
            cache_dir: PathBuf::from(cache_dir),
            pipeline,
            dataset: DatasetClientConfig::new(navitia, google),
        })
    }
}

/// Read the properties file. A missing file yields no pairs.
fn read_properties(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no properties file");
            return Ok(HashMap::new());
        }
        Err(source) => {
            return Err(ConfigError::Unreadable {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    java_properties::read(io::BufReader::new(file)).map_err(|source| ConfigError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// `lat,lon` in decimal degrees.
fn parse_location(key: &'static str, raw: &str) -> Result<Coordinate, ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    };

    let (lat, lon) = raw.split_once(',').ok_or_else(invalid)?;
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let lon: f64 = lon.trim().parse().map_err(|_| invalid())?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(invalid());
    }

    Ok(Coordinate::new(lat, lon))
}

fn required(
    pairs: &HashMap<String, String>,
    key: &'static str,
    path: &Path,
) -> Result<String, ConfigError> {
    let missing = || ConfigError::MissingKey {
        key,
        path: path.to_path_buf(),
        var: env_var_for(key),
    };

    match pairs.get(key).map(|v| v.trim()) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(missing()),
    }
}

fn env_var_for(key: &str) -> &'static str {
    ENV_OVERRIDES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, var)| *var)
        .unwrap_or(CONFIG_PATH_VAR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn pairs(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_PATH)
    }

    #[test]
    fn credentials_from_file() {
        let config = AppConfig::from_pairs(
            &path(),
            pairs(&[(NAVITIA_KEY, "nav"), (GOOGLE_KEY, "goo")]),
            no_env,
        )
        .unwrap();

        assert_eq!(config.dataset.navitia_api_key, "nav");
        assert_eq!(config.dataset.google_api_key, "goo");
        assert_eq!(config.cache_dir, PathBuf::from("cache"));
        assert_eq!(config.pipeline.max_commute_mins, 90);
    }

    #[test]
    fn environment_wins() {
        let env = |var: &str| match var {
            "NAVITIA_API_KEY" => Some("from-env".to_string()),
            "COMMUTE_FINDER_CACHE_DIR" => Some("/tmp/responses".to_string()),
            "COMMUTE_FINDER_MAX_COMMUTE_MINS" => Some("60".to_string()),
            _ => None,
        };

        let config = AppConfig::from_pairs(
            &path(),
            pairs(&[(NAVITIA_KEY, "nav"), (GOOGLE_KEY, "goo")]),
            env,
        )
        .unwrap();

        assert_eq!(config.dataset.navitia_api_key, "from-env");
        assert_eq!(config.dataset.google_api_key, "goo");
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/responses"));
        assert_eq!(config.pipeline.max_commute_mins, 60);
    }

    #[test]
    fn missing_credential() {
        let err = AppConfig::from_pairs(&path(), pairs(&[(NAVITIA_KEY, "nav")]), no_env)
            .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::MissingKey {
                key: GOOGLE_KEY,
                var: "GOOGLE_API_KEY",
                ..
            }
        ));
    }

    #[test]
    fn blank_credential_is_missing() {
        let err = AppConfig::from_pairs(
            &path(),
            pairs(&[(NAVITIA_KEY, "  "), (GOOGLE_KEY, "goo")]),
            no_env,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::MissingKey { key: NAVITIA_KEY, .. }));
    }

    #[test]
    fn invalid_threshold() {
        for raw in ["ninety", "0", "-5", "999999999999999999"] {
            let err = AppConfig::from_pairs(
                &path(),
                pairs(&[(NAVITIA_KEY, "nav"), (GOOGLE_KEY, "goo"), (MAX_COMMUTE_KEY, raw)]),
                no_env,
            )
            .unwrap_err();

            assert!(matches!(err, ConfigError::InvalidValue { .. }), "{raw}");
        }
    }

    #[test]
    fn workplaces_from_file() {
        let config = AppConfig::from_pairs(
            &path(),
            pairs(&[
                (NAVITIA_KEY, "nav"),
                (GOOGLE_KEY, "goo"),
                (CAR_WORKPLACE_KEY, "48.85, 2.35"),
            ]),
            no_env,
        )
        .unwrap();

        assert_eq!(config.pipeline.car_workplace.name, "GR");
        assert_eq!(config.pipeline.car_workplace.location, Coordinate::new(48.85, 2.35));
        assert_eq!(config.pipeline.transit_workplace, Workplace::default_transit());
    }

    #[test]
    fn invalid_workplace() {
        for raw in ["48.85", "north,2.35", "95.0,2.35"] {
            let err = AppConfig::from_pairs(
                &path(),
                pairs(&[(NAVITIA_KEY, "nav"), (GOOGLE_KEY, "goo"), (TRANSIT_WORKPLACE_KEY, raw)]),
                no_env,
            )
            .unwrap_err();

            assert!(
                matches!(err, ConfigError::InvalidValue { key: TRANSIT_WORKPLACE_KEY, .. }),
                "{raw}"
            );
        }
    }

    #[test]
    fn reads_properties_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# credentials").unwrap();
        writeln!(file, "navitia.api.key=nav-123").unwrap();
        writeln!(file, "google.api.key=goo-456").unwrap();
        writeln!(file, "cache.dir=responses").unwrap();

        let pairs = read_properties(file.path()).unwrap();
        let config = AppConfig::from_pairs(file.path(), pairs, no_env).unwrap();

        assert_eq!(config.dataset.navitia_api_key, "nav-123");
        assert_eq!(config.dataset.google_api_key, "goo-456");
        assert_eq!(config.cache_dir, PathBuf::from("responses"));
    }

    #[test]
    fn properties_syntax_is_honoured() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "! legacy comment").unwrap();
        writeln!(file, "navitia.api.key=a$b").unwrap();
        writeln!(file, "google.api.key: abc").unwrap();

        let pairs = read_properties(file.path()).unwrap();

        assert_eq!(pairs.get(NAVITIA_KEY).map(String::as_str), Some("a$b"));
        assert_eq!(pairs.get(GOOGLE_KEY).map(String::as_str), Some("abc"));
    }

    #[test]
    fn directory_is_not_a_properties_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_properties(dir.path()).is_err());
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let pairs = read_properties(&dir.path().join("absent.properties")).unwrap();
        assert!(pairs.is_empty());

        let env = |var: &str| match var {
            "NAVITIA_API_KEY" => Some("nav".to_string()),
            "GOOGLE_API_KEY" => Some("goo".to_string()),
            _ => None,
        };
        assert!(AppConfig::from_pairs(&path(), pairs, env).is_ok());
    }

    #[test]
    fn error_names_the_variable() {
        let err = ConfigError::MissingKey {
            key: NAVITIA_KEY,
            path: path(),
            var: "NAVITIA_API_KEY",
        };
        assert_eq!(
            err.to_string(),
            "missing `navitia.api.key` (set it in private/conf.properties or via NAVITIA_API_KEY)"
        );
    }
}
