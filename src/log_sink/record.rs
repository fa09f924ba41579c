/// the document persisted for each log message
///
use crate::error::Result;
use crate::log_sink::{Level, LogMessage, RequestContext};
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// a timestamp in the document store's native date form, `{"$date": <epoch millis>}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentDate(pub DateTime<Utc>);

impl DocumentDate {
    pub fn millis(&self) -> i64 {
        self.0.timestamp_millis()
    }
}

impl Serialize for DocumentDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("$date", &self.millis())?;
        map.end()
    }
}

/// request fields merged into every record of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enrichment {
    pub hostname: String,
    pub user_agent: String,
    pub url: String,
    pub refer: String,
}

impl Enrichment {
    pub fn from_context(ctx: &RequestContext) -> Enrichment {
        Enrichment {
            hostname: ctx.client_ip.clone(),
            user_agent: ctx.user_agent.clone(),
            url: plain(&ctx.uri),
            refer: ctx.referrer.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    #[serde(flatten)]
    pub enrichment: Enrichment,
    pub time: DocumentDate,
    pub level: Level,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
}

impl LogRecord {
    /// A message carrying an exception is rewritten: the body becomes the exception
    /// trace and the level becomes `trace_level`. The raw exception and trace are dropped.
    pub fn build(msg: &LogMessage, enrichment: &Enrichment, trace_level: Level) -> LogRecord {
        let (level, body) = match &msg.exception {
            Some(exc) => (trace_level, exc.trace_as_string().to_string()),
            None => (msg.level, msg.body.clone()),
        };

        LogRecord {
            enrichment: enrichment.clone(),
            time: DocumentDate(msg.time),
            level,
            body,
            file: msg.file.clone(),
            line: msg.line,
            class: msg.class.clone(),
            function: msg.function.clone(),
        }
    }

    pub fn to_document(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// escape html special characters so request text can be embedded safely
pub fn plain(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}
