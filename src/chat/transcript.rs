use anyhow::Result;

use super::types::{Message, Role};
use crate::gateway::QueryResponse;

pub const WELCOME_MESSAGE: &str = "Welcome to Build Fast With AI RAG ChatBot ! Upload a CSV file or JSON data to start asking questions about your data.";
pub const UPLOAD_SUCCESS_MESSAGE: &str =
    "Data uploaded successfully! You can now ask questions about your data.";
pub const NO_DATA_MESSAGE: &str = "Please upload data first before asking questions.";
pub const NO_ANSWER_MESSAGE: &str = "Failed to get response from the chatbot.";
pub const SERVER_UNREACHABLE_MESSAGE: &str =
    "Failed to communicate with the server. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    Blank,
    NoData,
    Busy,
}

/// The conversation log plus the flags that gate the composer.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    messages: Vec<Message>,
    next_id: u64,
    has_uploaded_data: bool,
    in_flight: bool,
    error: Option<String>,
    /// Bumped on every raised error so a banner timer can tell its own error apart.
    error_serial: u64,
}

impl Transcript {
    pub fn new(now_ms: f64) -> Self {
        let mut transcript = Transcript {
            messages: Vec::new(),
            next_id: 1,
            has_uploaded_data: false,
            in_flight: false,
            error: None,
            error_serial: 0,
        };
        transcript.push(Role::System, WELCOME_MESSAGE.to_string(), now_ms);
        transcript
    }

    fn push(&mut self, role: Role, content: String, now_ms: f64) {
        self.messages.push(Message {
            id: self.next_id,
            role,
            content,
            timestamp_ms: now_ms,
        });
        self.next_id += 1;
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn has_uploaded_data(&self) -> bool {
        self.has_uploaded_data
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn composer_disabled(&self) -> bool {
        self.in_flight || !self.has_uploaded_data
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn error_serial(&self) -> u64 {
        self.error_serial
    }

    fn raise(&mut self, message: &str) {
        self.error = Some(message.to_string());
        self.error_serial += 1;
    }

    /// Clears the banner only if nothing newer replaced the error from `serial`.
    pub fn expire_error(&mut self, serial: u64) -> bool {
        if self.error.is_none() || serial != self.error_serial {
            return false;
        }
        self.error = None;
        true
    }

    /// Appends the user's message right away and hands back the question to send.
    /// The message stays in the log whatever the query's fate.
    pub fn begin_query(&mut self, input: &str, now_ms: f64) -> Result<String, SubmitRejection> {
        if input.trim().is_empty() {
            return Err(SubmitRejection::Blank);
        }
        if !self.has_uploaded_data {
            self.raise(NO_DATA_MESSAGE);
            return Err(SubmitRejection::NoData);
        }
        if self.in_flight {
            return Err(SubmitRejection::Busy);
        }
        self.push(Role::User, input.to_string(), now_ms);
        self.in_flight = true;
        self.error = None;
        Ok(input.to_string())
    }

    pub fn finish_query(&mut self, outcome: &Result<QueryResponse>, now_ms: f64) {
        self.in_flight = false;
        match outcome {
            Ok(response) if response.is_success() => {
                self.push(Role::Assistant, response.answer.clone(), now_ms);
            }
            Ok(_) => self.raise(NO_ANSWER_MESSAGE),
            Err(_) => self.raise(SERVER_UNREACHABLE_MESSAGE),
        }
    }

    /// There is no way back to "no data" once this has run.
    pub fn record_upload(&mut self, now_ms: f64) {
        self.has_uploaded_data = true;
        self.error = None;
        self.push(Role::System, UPLOAD_SUCCESS_MESSAGE.to_string(), now_ms);
    }
}
