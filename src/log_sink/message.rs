use crate::log_sink::Level;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;

/// An error attached to a log message. Its trace replaces the message body when written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exception {
    pub class: String,
    pub message: String,
    pub trace: String,
}

impl Exception {
    pub fn new(class: &str, message: &str, trace: &str) -> Exception {
        Exception {
            class: class.to_string(),
            message: message.to_string(),
            trace: trace.to_string(),
        }
    }

    /// capture an error and its source chain, one numbered frame per cause
    pub fn from_error<E: Error + ?Sized>(err: &E) -> Exception {
        let mut frames = vec![format!("#0 {}", err)];
        let mut source = err.source();
        while let Some(cause) = source {
            frames.push(format!("#{} {}", frames.len(), cause));
            source = cause.source();
        }

        Exception {
            class: std::any::type_name::<E>().to_string(),
            message: err.to_string(),
            trace: frames.join("\n"),
        }
    }

    pub fn trace_as_string(&self) -> &str {
        &self.trace
    }
}

/// One log call. `trace` and `exception` are transient and never persisted as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct LogMessage {
    pub time: DateTime<Utc>,
    pub level: Level,
    pub body: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub class: Option<String>,
    pub function: Option<String>,
    pub trace: Option<String>,
    pub exception: Option<Exception>,
}

impl LogMessage {
    pub fn new(level: Level, body: &str) -> LogMessage {
        LogMessage {
            time: Utc::now(),
            level,
            body: body.to_string(),
            file: None,
            line: None,
            class: None,
            function: None,
            trace: None,
            exception: None,
        }
    }

    /// build a message from a `log` crate record; the target stands in for the class
    pub fn from_record(record: &log::Record) -> LogMessage {
        let mut msg = LogMessage::new(record.level().into(), &record.args().to_string());
        msg.file = record.file().map(str::to_string);
        msg.line = record.line();
        msg.class = Some(record.target().to_string());
        msg
    }

    pub fn at(mut self, time: DateTime<Utc>) -> LogMessage {
        self.time = time;
        self
    }

    pub fn with_location(mut self, file: &str, line: u32) -> LogMessage {
        self.file = Some(file.to_string());
        self.line = Some(line);
        self
    }

    pub fn with_origin(mut self, class: &str, function: &str) -> LogMessage {
        self.class = Some(class.to_string());
        self.function = Some(function.to_string());
        self
    }

    pub fn with_trace(mut self, trace: &str) -> LogMessage {
        self.trace = Some(trace.to_string());
        self
    }

    pub fn with_exception(mut self, exception: Exception) -> LogMessage {
        self.exception = Some(exception);
        self
    }
}

/// The request a batch was logged under. Passed to the writer explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub client_ip: String,
    pub user_agent: String,
    pub uri: String,
    pub referrer: Option<String>,
}

impl RequestContext {
    pub fn new(client_ip: &str, user_agent: &str, uri: &str) -> RequestContext {
        RequestContext {
            client_ip: client_ip.to_string(),
            user_agent: user_agent.to_string(),
            uri: uri.to_string(),
            referrer: None,
        }
    }

    pub fn with_referrer(mut self, referrer: &str) -> RequestContext {
        self.referrer = Some(referrer.to_string());
        self
    }
}
