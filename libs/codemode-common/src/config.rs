use std::env;

pub const DEFAULT_EXECUTOR_URL: &str = "http://localhost:2358";
pub const DEFAULT_SUBMIT_PATH: &str = "/submissions?base64_encoded=false&wait=true";
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_AUTH_HEADER: &str = "X-Auth-Token";
pub const DEFAULT_LANGUAGE_CONFIG_PATH: &str = "config/languages.json";

/// Application configuration
/// Provides defaults with environment variable overrides
#[derive(Debug, Clone)]
pub struct Config {
    pub executor_url: String,
    pub executor_submit_path: String,
    pub executor_timeout_ms: u64,
    pub executor_auth_token: Option<String>,
    pub executor_auth_header: String,
    pub language_config_path: String,
    pub max_parallel_tests: usize,
    pub redis_url: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| lookup(*k).filter(|v| !v.is_empty()))
        };

        Self {
            executor_url: first(&["EXECUTOR_URL", "RUNNER_URL"])
                .unwrap_or_else(|| DEFAULT_EXECUTOR_URL.to_string()),
            executor_submit_path: first(&["EXECUTOR_SUBMIT_PATH"])
                .unwrap_or_else(|| DEFAULT_SUBMIT_PATH.to_string()),
            executor_timeout_ms: first(&["EXECUTOR_TIMEOUT_MS", "RUNNER_TIMEOUT_MS"])
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(DEFAULT_TIMEOUT_MS),
            executor_auth_token: first(&["EXECUTOR_AUTH_TOKEN"]),
            executor_auth_header: first(&["EXECUTOR_AUTH_HEADER"])
                .unwrap_or_else(|| DEFAULT_AUTH_HEADER.to_string()),
            language_config_path: first(&["LANGUAGE_CONFIG_PATH"])
                .unwrap_or_else(|| DEFAULT_LANGUAGE_CONFIG_PATH.to_string()),
            max_parallel_tests: first(&["MAX_PARALLEL_TESTS"])
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(1)
                .max(1),
            redis_url: first(&["REDIS_URL"])
                .unwrap_or_else(|| "redis://127.0.0.1:6379".to_string()),
            port: first(&["PORT"])
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(3000),
        }
    }

    /// Full URL the executor client posts submissions to
    pub fn submit_url(&self) -> String {
        let base = self.executor_url.trim_end_matches('/');
        if self.executor_submit_path.starts_with('/') {
            format!("{}{}", base, self.executor_submit_path)
        } else {
            format!("{}/{}", base, self.executor_submit_path)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.executor_url, "http://localhost:2358");
        assert_eq!(config.executor_timeout_ms, 15_000);
        assert_eq!(config.executor_auth_token, None);
        assert_eq!(config.executor_auth_header, "X-Auth-Token");
        assert_eq!(config.max_parallel_tests, 1);
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_legacy_runner_variables() {
        let config = Config::from_lookup(lookup_from(&[
            ("RUNNER_URL", "http://runner:8080"),
            ("RUNNER_TIMEOUT_MS", "2500"),
        ]));
        assert_eq!(config.executor_url, "http://runner:8080");
        assert_eq!(config.executor_timeout_ms, 2500);
    }

    #[test]
    fn test_executor_variables_win_over_legacy() {
        let config = Config::from_lookup(lookup_from(&[
            ("EXECUTOR_URL", "http://judge0:2358"),
            ("RUNNER_URL", "http://runner:8080"),
        ]));
        assert_eq!(config.executor_url, "http://judge0:2358");
    }

    #[test]
    fn test_bad_numbers_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("EXECUTOR_TIMEOUT_MS", "soon"),
            ("MAX_PARALLEL_TESTS", "0"),
            ("PORT", "-1"),
        ]));
        assert_eq!(config.executor_timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.max_parallel_tests, 1);
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_submit_url_joins_cleanly() {
        let mut config = Config::from_lookup(lookup_from(&[("EXECUTOR_URL", "http://judge0:2358/")]));
        assert_eq!(
            config.submit_url(),
            "http://judge0:2358/submissions?base64_encoded=false&wait=true"
        );

        config.executor_submit_path = "judge/run".to_string();
        assert_eq!(config.submit_url(), "http://judge0:2358/judge/run");
    }
}
