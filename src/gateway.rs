use anyhow::{anyhow, Context, Result};
use futures::future::{select, Either};
use futures::{pin_mut, Future};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use leptos::logging::log;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;

pub const UPLOAD_PATH: &str = "/upload";
pub const UPLOAD_JSON_PATH: &str = "/upload-json";
pub const QUERY_PATH: &str = "/query";
pub const FILE_FIELD: &str = "file";
pub const SUCCESS_STATUS: &str = "success";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct UploadResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct JsonUploadResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub rows: Option<u64>,
    pub columns: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QueryResponse {
    pub status: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    question: &'a str,
}

/// Shape of the body the backend sends along with a non-2xx status.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    detail: Option<Value>,
}

impl UploadResponse {
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }
}

impl JsonUploadResponse {
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }
}

impl QueryResponse {
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }
}

/// Thin client for the question-answering backend. Every call is a single
/// round trip; nothing is retried.
#[derive(Debug, Clone)]
pub struct Gateway {
    config: Config,
}

impl Gateway {
    pub fn new(config: Config) -> Self {
        Gateway { config }
    }

    pub async fn upload_file(&self, file: &web_sys::File) -> Result<UploadResponse> {
        let form_data = web_sys::FormData::new()
            .map_err(|e| anyhow!("[Gateway] Upload: Failed to create form data: {:?}", e))?;
        form_data
            .append_with_blob_and_filename(FILE_FIELD, file, &file.name())
            .map_err(|e| anyhow!("[Gateway] Upload: Failed to attach file: {:?}", e))?;

        let request = Request::post(&self.config.endpoint(UPLOAD_PATH))
            .body(form_data)
            .context("[Gateway] Upload: Failed to build request")?;
        log!("[DEBUG] [Gateway] Uploading file '{}'", file.name());
        self.send("Upload", request).await
    }

    pub async fn upload_json(&self, records: &[Value]) -> Result<JsonUploadResponse> {
        let request = Request::post(&self.config.endpoint(UPLOAD_JSON_PATH))
            .json(records)
            .context("[Gateway] UploadJson: Failed to serialize records")?;
        log!("[DEBUG] [Gateway] Uploading {} JSON records", records.len());
        self.send("UploadJson", request).await
    }

    pub async fn query(&self, question: &str) -> Result<QueryResponse> {
        let request = Request::post(&self.config.endpoint(QUERY_PATH))
            .json(&QueryRequest { question })
            .context("[Gateway] Query: Failed to serialize question")?;
        self.send("Query", request).await
    }

    async fn send<T: DeserializeOwned>(&self, operation: &str, request: Request) -> Result<T> {
        let round_trip = async move {
            let response = request
                .send()
                .await
                .with_context(|| format!("[Gateway] {operation}: Request failed"))?;
            let status = response.status();
            let text = response
                .text()
                .await
                .with_context(|| format!("[Gateway] {operation}: Failed to read body"))?;
            parse_body(operation, status, response.ok(), &text)
        };
        with_timeout(operation, round_trip, self.config.request_timeout_ms).await
    }
}

/// Turns a raw HTTP reply into `T`, rejecting non-2xx statuses and bodies that do
/// not match the expected shape.
pub fn parse_body<T: DeserializeOwned>(
    operation: &str,
    status: u16,
    ok: bool,
    text: &str,
) -> Result<T> {
    if !ok {
        let server_message = serde_json::from_str::<ErrorBody>(text)
            .ok()
            .and_then(|body| {
                body.message.or_else(|| {
                    body.detail.map(|detail| match detail {
                        Value::String(s) => s,
                        other => other.to_string(),
                    })
                })
            });
        return Err(match server_message {
            Some(message) => anyhow!("[Gateway] {operation}: HTTP {status}: {message}"),
            None => anyhow!("[Gateway] {operation}: HTTP {status}"),
        });
    }
    serde_json::from_str(text)
        .with_context(|| format!("[Gateway] {operation}: Malformed response body"))
}

async fn with_timeout<T>(
    operation: &str,
    request: impl Future<Output = Result<T>>,
    timeout_ms: Option<u32>,
) -> Result<T> {
    match timeout_ms {
        Some(timeout_ms) => {
            race_deadline(operation, request, TimeoutFuture::new(timeout_ms), timeout_ms).await
        }
        None => request.await,
    }
}

/// Whichever finishes first wins. The losing request is dropped, which aborts it.
async fn race_deadline<T>(
    operation: &str,
    request: impl Future<Output = Result<T>>,
    deadline: impl Future<Output = ()>,
    timeout_ms: u32,
) -> Result<T> {
    pin_mut!(request, deadline);
    match select(request, deadline).await {
        Either::Left((result, _)) => result,
        Either::Right(_) => Err(anyhow!(
            "[Gateway] {operation}: No response after {timeout_ms} ms"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::future::{pending, ready};

    #[test]
    fn query_success_is_exact_status_match() {
        let response: QueryResponse = parse_body(
            "Query",
            200,
            true,
            r#"{"status":"success","question":"Summarize this data","answer":"42 rows."}"#,
        )
        .unwrap();
        assert!(response.is_success());
        assert_eq!(response.answer, "42 rows.");

        let response: QueryResponse =
            parse_body("Query", 200, true, r#"{"status":"Success"}"#).unwrap();
        assert!(!response.is_success());
        assert_eq!(response.answer, "");
    }

    #[test]
    fn json_upload_counts_are_optional() {
        let with_counts: JsonUploadResponse = parse_body(
            "UploadJson",
            200,
            true,
            r#"{"status":"success","message":"ok","rows":2,"columns":3}"#,
        )
        .unwrap();
        assert_eq!((with_counts.rows, with_counts.columns), (Some(2), Some(3)));

        let without: JsonUploadResponse =
            parse_body("UploadJson", 200, true, r#"{"status":"error","message":"bad"}"#).unwrap();
        assert!(!without.is_success());
        assert_eq!(without.rows, None);
        assert_eq!(without.message, "bad");
    }

    #[test]
    fn non_2xx_is_an_error_carrying_the_server_message() {
        let err = parse_body::<UploadResponse>(
            "Upload",
            422,
            false,
            r#"{"detail":"File must be a CSV"}"#,
        )
        .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("422"));
        assert!(text.contains("File must be a CSV"));

        let err = parse_body::<UploadResponse>("Upload", 502, false, "<html>").unwrap_err();
        assert_eq!(err.to_string(), "[Gateway] Upload: HTTP 502");
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(parse_body::<QueryResponse>("Query", 200, true, "not json").is_err());
        assert!(parse_body::<QueryResponse>("Query", 200, true, r#"{"answer":"x"}"#).is_err());
    }

    #[test]
    fn deadline_turns_a_silent_backend_into_an_error() {
        let result: Result<QueryResponse> =
            block_on(race_deadline("Query", pending(), ready(()), 50));
        let message = result.unwrap_err().to_string();
        assert!(message.contains("Query"));
        assert!(message.contains("50 ms"));
    }

    #[test]
    fn reply_before_the_deadline_is_passed_through() {
        let reply = parse_body::<QueryResponse>(
            "Query",
            200,
            true,
            r#"{"status":"success","answer":"7"}"#,
        );
        let result = block_on(race_deadline("Query", ready(reply), pending::<()>(), 50));
        assert_eq!(result.unwrap().answer, "7");
    }

    #[test]
    fn backend_error_wins_over_a_later_deadline() {
        let reply = parse_body::<QueryResponse>("Query", 503, false, "");
        let result = block_on(race_deadline("Query", ready(reply), pending::<()>(), 50));
        assert!(result.unwrap_err().to_string().contains("HTTP 503"));
    }
}
