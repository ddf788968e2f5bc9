use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use log::{debug, warn};
use serde_json::Value;
use thiserror::Error;

use crate::model::{Name, Record, RecordId};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::File(crate::config::expand_tilde(trimmed))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

/// What to do with an array entry that does not decode as a record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    #[default]
    Reject,
    Skip,
    Default,
}

impl MalformedPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "reject" | "strict" => Some(Self::Reject),
            "skip" => Some(Self::Skip),
            "default" | "defaults" => Some(Self::Default),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LoadOptions {
    pub policy: MalformedPolicy,
    pub timeout: Option<Duration>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            policy: MalformedPolicy::Reject,
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read data file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch '{url}': {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} from '{url}'")]
    Status { url: String, status: u16 },

    #[error("failed to parse data: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("data document must be a JSON array")]
    NotAnArray,

    #[error("malformed entry at index {index}: {reason}")]
    MalformedEntry { index: usize, reason: String },

    #[error("duplicate record id '{id}' at index {index}")]
    DuplicateId { id: RecordId, index: usize },
}

/// Reads the whole dataset once. There is no retry.
pub async fn load(source: &DataSource, options: &LoadOptions) -> Result<Vec<Record>, LoadError> {
    let body = fetch(source, options.timeout).await?;
    let records = parse_records(&body, options.policy)?;
    debug!("loaded {} records from {source}", records.len());
    Ok(records)
}

async fn fetch(source: &DataSource, timeout: Option<Duration>) -> Result<String, LoadError> {
    match source {
        DataSource::File(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| LoadError::Io {
                    path: path.display().to_string(),
                    source: e,
                })
        }
        DataSource::Url(url) => {
            let http_err = |e| LoadError::Http {
                url: url.clone(),
                source: e,
            };
            let mut builder = reqwest::Client::builder();
            if let Some(timeout) = timeout {
                builder = builder.timeout(timeout);
            }
            let client = builder.build().map_err(http_err)?;
            let response = client.get(url).send().await.map_err(http_err)?;
            let status = response.status();
            if !status.is_success() {
                return Err(LoadError::Status {
                    url: url.clone(),
                    status: status.as_u16(),
                });
            }
            response.text().await.map_err(http_err)
        }
    }
}

pub fn parse_records(body: &str, policy: MalformedPolicy) -> Result<Vec<Record>, LoadError> {
    let document: Value = serde_json::from_str(body)?;
    let entries = match document {
        Value::Array(entries) => entries,
        _ => return Err(LoadError::NotAnArray),
    };

    let mut records = Vec::with_capacity(entries.len());
    let mut seen: HashSet<RecordId> = HashSet::new();
    for (index, entry) in entries.into_iter().enumerate() {
        let decoded = match policy {
            MalformedPolicy::Default => decode_with_defaults(&entry),
            MalformedPolicy::Reject | MalformedPolicy::Skip => {
                serde_json::from_value::<Record>(entry).map_err(|e| e.to_string())
            }
        };
        let record = match decoded {
            Ok(record) => record,
            Err(reason) if policy == MalformedPolicy::Reject => {
                return Err(LoadError::MalformedEntry { index, reason });
            }
            Err(reason) => {
                warn!("skipping malformed entry at index {index}: {reason}");
                continue;
            }
        };
        if !seen.insert(record.id.clone()) {
            return Err(LoadError::DuplicateId {
                id: record.id,
                index,
            });
        }
        records.push(record);
    }
    Ok(records)
}

fn decode_with_defaults(entry: &Value) -> Result<Record, String> {
    let object = entry
        .as_object()
        .ok_or_else(|| "entry is not an object".to_string())?;
    let id = match object.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err("missing field `id`".to_string()),
    };
    let text = |value: Option<&Value>| -> String {
        value.and_then(Value::as_str).unwrap_or_default().to_string()
    };
    let name = object.get("name").and_then(Value::as_object);
    Ok(Record {
        id: RecordId::new(id),
        name: Name {
            first_name: text(name.and_then(|n| n.get("firstName"))),
            last_name: text(name.and_then(|n| n.get("lastName"))),
        },
        about: text(object.get("about")),
        eye_color: text(object.get("eyeColor")),
    })
}
