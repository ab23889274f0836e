/// Execution Engine - Remote Executor Client
///
/// **Core Responsibility:**
/// Send one (code, language, stdin) triple to the external execution
/// service and normalize whatever it answers into an `ExecutionResult`.
///
/// **Critical Architectural Boundary:**
/// - Engine knows HOW to reach the executor (URL, auth, language codes)
/// - Engine does NOT know test cases or expected outputs
/// - Engine does NOT evaluate correctness
/// - Engine never retries; callers wanting retries wrap a `CodeEngine`
///
/// Exactly one outbound request per `run`, none at all when the language
/// has no mapping.

use async_trait::async_trait;
use codemode_common::types::{ExecutionRequest, ExecutionResult};
use codemode_common::Config;
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::ExecutorError;
use crate::language_config::{ExecutorLanguageCode, LanguageTable};

/// Placeholder used when the error body of a failed request cannot be read
const UNREADABLE_BODY: &str = "<unreadable response body>";

/// Seam between the orchestrator and whatever runs the code
#[async_trait]
pub trait CodeEngine: Send + Sync {
    /// Fails with `UnsupportedLanguage` when the language cannot be run at all
    fn check_language(&self, language: &str) -> Result<(), ExecutorError>;

    async fn run(&self, request: &ExecutionRequest) -> Result<ExecutionResult, ExecutorError>;
}

/// Submission body in the Judge0 shape
#[derive(Debug, Serialize)]
struct SubmissionBody<'a> {
    source_code: &'a str,
    language_id: &'a ExecutorLanguageCode,
    stdin: &'a str,
}

/// HTTP client for the remote code-execution service
pub struct RemoteEngine {
    client: reqwest::Client,
    submit_url: String,
    timeout: Duration,
    auth: Option<(String, String)>,
    languages: LanguageTable,
}

impl RemoteEngine {
    pub fn new(submit_url: impl Into<String>, languages: LanguageTable) -> Self {
        Self {
            client: reqwest::Client::new(),
            submit_url: submit_url.into(),
            timeout: Duration::from_millis(codemode_common::config::DEFAULT_TIMEOUT_MS),
            auth: None,
            languages,
        }
    }

    /// Build from application configuration
    pub fn from_config(config: &Config, languages: LanguageTable) -> Self {
        let engine = Self::new(config.submit_url(), languages)
            .with_timeout(Duration::from_millis(config.executor_timeout_ms));

        match &config.executor_auth_token {
            Some(token) => engine.with_auth(config.executor_auth_header.clone(), token.clone()),
            None => engine,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_auth(mut self, header: impl Into<String>, token: impl Into<String>) -> Self {
        self.auth = Some((header.into(), token.into()));
        self
    }

    pub fn languages(&self) -> &LanguageTable {
        &self.languages
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn submit(
        &self,
        request: &ExecutionRequest,
        code: &ExecutorLanguageCode,
    ) -> Result<ExecutionResult, ExecutorError> {
        let body = SubmissionBody {
            source_code: &request.source_code,
            language_id: code,
            stdin: &request.stdin,
        };

        let mut builder = self.client.post(&self.submit_url).json(&body);
        if let Some((header, token)) = &self.auth {
            builder = builder.header(header.as_str(), token.as_str());
        }

        let response = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();

        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| UNREADABLE_BODY.to_string());
            warn!(status = status.as_u16(), "Executor returned non-success status");
            return Err(ExecutorError::TransportFailure {
                status: Some(status.as_u16()),
                message: format!("HTTP {}: {}", status.as_u16(), text),
            });
        }

        let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;
        normalize_response(&bytes)
    }

    fn transport_error(&self, err: reqwest::Error) -> ExecutorError {
        if err.is_timeout() {
            ExecutorError::Timeout {
                timeout_ms: self.timeout_ms(),
            }
        } else {
            ExecutorError::TransportFailure {
                status: err.status().map(|s| s.as_u16()),
                message: err.to_string(),
            }
        }
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

#[async_trait]
impl CodeEngine for RemoteEngine {
    fn check_language(&self, language: &str) -> Result<(), ExecutorError> {
        self.languages.resolve(language).map(|_| ())
    }

    async fn run(&self, request: &ExecutionRequest) -> Result<ExecutionResult, ExecutorError> {
        let code = self.languages.resolve(&request.language)?;

        debug!(
            language = %request.language,
            executor_code = %code,
            stdin_size = request.stdin.len(),
            source_size = request.source_code.len(),
            "Submitting to executor"
        );

        // Dropping the request future cancels the in-flight call
        match tokio::time::timeout(self.timeout, self.submit(request, code)).await {
            Ok(result) => result,
            Err(_) => Err(ExecutorError::Timeout {
                timeout_ms: self.timeout_ms(),
            }),
        }
    }
}

/// Defensive field-by-field extraction of an executor response body
///
/// `output` and `result` are legacy aliases of `stdout`, folded in here once.
pub fn normalize_response(body: &[u8]) -> Result<ExecutionResult, ExecutorError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ExecutorError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    let obj = match value {
        Value::Object(obj) => obj,
        other => {
            return Err(ExecutorError::MalformedResponse(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )))
        }
    };

    let stdout = ["stdout", "output", "result"]
        .iter()
        .find_map(|key| string_field(&obj, key).filter(|s| !s.is_empty()))
        .or_else(|| string_field(&obj, "stdout"));

    let raw_status = obj.get("status").filter(|v| !v.is_null()).cloned();
    let status_message = string_field(&obj, "message").or_else(|| {
        raw_status
            .as_ref()
            .and_then(|s| s.get("description"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    Ok(ExecutionResult {
        stdout,
        stderr: string_field(&obj, "stderr"),
        compile_output: string_field(&obj, "compile_output")
            .or_else(|| string_field(&obj, "compileOutput")),
        status_message,
        raw_status,
    })
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(value: Value) -> Result<ExecutionResult, ExecutorError> {
        normalize_response(value.to_string().as_bytes())
    }

    #[test]
    fn test_normalize_judge0_success() {
        let result = normalize(json!({
            "stdout": "5\n",
            "stderr": null,
            "compile_output": null,
            "message": null,
            "status": {"id": 3, "description": "Accepted"}
        }))
        .unwrap();

        assert_eq!(result.stdout.as_deref(), Some("5\n"));
        assert_eq!(result.stderr, None);
        assert_eq!(result.compile_output, None);
        assert_eq!(result.status_message.as_deref(), Some("Accepted"));
        assert_eq!(result.raw_status, Some(json!({"id": 3, "description": "Accepted"})));
    }

    #[test]
    fn test_normalize_compile_error() {
        let result = normalize(json!({
            "compile_output": "main.c:1: syntax error",
            "message": "Exited with error status 1",
            "status": {"id": 6, "description": "Compilation Error"}
        }))
        .unwrap();

        assert_eq!(result.compile_error(), Some("main.c:1: syntax error"));
        assert_eq!(result.status_message.as_deref(), Some("Exited with error status 1"));
        assert_eq!(result.stdout, None);
    }

    #[test]
    fn test_normalize_camel_case_compile_output() {
        let result = normalize(json!({"compileOutput": "error"})).unwrap();
        assert_eq!(result.compile_output.as_deref(), Some("error"));
    }

    #[test]
    fn test_legacy_output_aliases() {
        let result = normalize(json!({"output": "42"})).unwrap();
        assert_eq!(result.stdout.as_deref(), Some("42"));

        let result = normalize(json!({"result": "7"})).unwrap();
        assert_eq!(result.stdout.as_deref(), Some("7"));

        let result = normalize(json!({"stdout": "", "output": "from output"})).unwrap();
        assert_eq!(result.stdout.as_deref(), Some("from output"));

        let result = normalize(json!({"stdout": "preferred", "output": "other"})).unwrap();
        assert_eq!(result.stdout.as_deref(), Some("preferred"));

        let result = normalize(json!({"stdout": ""})).unwrap();
        assert_eq!(result.stdout.as_deref(), Some(""));
    }

    #[test]
    fn test_wrongly_typed_fields_are_dropped() {
        let result = normalize(json!({
            "stdout": 5,
            "stderr": ["x"],
            "message": {"text": "no"},
            "status": "Accepted"
        }))
        .unwrap();

        assert_eq!(result.stdout, None);
        assert_eq!(result.stderr, None);
        assert_eq!(result.status_message, None);
        assert_eq!(result.raw_status, Some(json!("Accepted")));
    }

    #[test]
    fn test_non_object_body_is_malformed() {
        let bodies: [&[u8]; 4] = [b"[1, 2]", b"\"ok\"", b"null", b"<html>bad gateway</html>"];
        for body in bodies {
            let err = normalize_response(body).unwrap_err();
            assert!(matches!(err, ExecutorError::MalformedResponse(_)), "{:?}", err);
        }
    }

    #[test]
    fn test_from_config_uses_timeout_and_url() {
        let mut config = Config::default();
        config.executor_url = "http://judge0:2358".to_string();
        config.executor_timeout_ms = 1234;
        config.executor_auth_token = Some("secret".to_string());

        let engine = RemoteEngine::from_config(&config, LanguageTable::builtin());
        assert_eq!(engine.timeout(), Duration::from_millis(1234));
        assert_eq!(
            engine.submit_url,
            "http://judge0:2358/submissions?base64_encoded=false&wait=true"
        );
        assert_eq!(
            engine.auth,
            Some(("X-Auth-Token".to_string(), "secret".to_string()))
        );
    }

    #[test]
    fn test_check_language() {
        let engine = RemoteEngine::new("http://127.0.0.1:9", LanguageTable::builtin());
        assert!(engine.check_language("Python").is_ok());
        assert_eq!(
            engine.check_language("brainfuck"),
            Err(ExecutorError::UnsupportedLanguage("brainfuck".to_string()))
        );
    }
}
