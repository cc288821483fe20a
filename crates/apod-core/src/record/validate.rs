//! Validate raw decoded JSON into [`Record`]s.
//!
//! Every offending field is reported, not just the first one. Unknown keys
//! are ignored.

use serde_json::{Map, Value};
use std::fmt;

use super::{MediaType, Record};

const ROOT: &str = "<root>";

/// What is wrong with one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    NotAnObject,
    NotAnArray,
    Missing,
    NotAString,
    UnknownMediaType(String),
    InvalidUrl(String),
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::NotAnObject => write!(f, "expected object"),
            Problem::NotAnArray => write!(f, "expected array"),
            Problem::Missing => write!(f, "required"),
            Problem::NotAString => write!(f, "expected string"),
            Problem::UnknownMediaType(got) => {
                write!(f, "expected \"image\" or \"video\", got {:?}", got)
            }
            Problem::InvalidUrl(reason) => write!(f, "invalid URL ({})", reason),
        }
    }
}

/// One offending field, addressed by path (`title`, `[3].url`, `<root>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub path: String,
    pub problem: Problem,
}

/// Decoded JSON did not have the record shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// All offending fields, in document order. Never empty.
    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// True if some issue is reported for exactly `path`.
    pub fn mentions(&self, path: &str) -> bool {
        self.issues.iter().any(|i| i.path == path)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid record")?;
        for (i, issue) in self.issues.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}: {}", sep, issue.path, issue.problem)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Validate a single record object.
pub fn validate_one(raw: &Value) -> Result<Record, ValidationError> {
    let mut issues = Vec::new();
    match check_record(raw, "", &mut issues) {
        Some(record) if issues.is_empty() => Ok(record),
        _ => Err(ValidationError { issues }),
    }
}

/// Validate an array of record objects, preserving order.
///
/// An empty array is valid. Issues from every element are collected, with
/// paths prefixed by the element index.
pub fn validate_many(raw: &Value) -> Result<Vec<Record>, ValidationError> {
    let Some(items) = raw.as_array() else {
        return Err(ValidationError {
            issues: vec![FieldIssue {
                path: ROOT.to_string(),
                problem: Problem::NotAnArray,
            }],
        });
    };

    let mut issues = Vec::new();
    let mut records = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        if let Some(record) = check_record(item, &format!("[{}]", i), &mut issues) {
            records.push(record);
        }
    }

    if issues.is_empty() {
        Ok(records)
    } else {
        Err(ValidationError { issues })
    }
}

/// Check one candidate record, appending issues. Returns the record only if
/// this candidate added no issues.
fn check_record(raw: &Value, prefix: &str, issues: &mut Vec<FieldIssue>) -> Option<Record> {
    let Some(obj) = raw.as_object() else {
        let path = if prefix.is_empty() { ROOT } else { prefix };
        issues.push(FieldIssue {
            path: path.to_string(),
            problem: Problem::NotAnObject,
        });
        return None;
    };

    let mut fields = Fields {
        obj,
        prefix,
        issues,
        failed: false,
    };

    let date = fields.required_str("date");
    let title = fields.required_str("title");
    let explanation = fields.required_str("explanation");
    let media_type = fields.media_type("media_type");
    let url = fields
        .required_str("url")
        .and_then(|u| fields.absolute_url("url", u));
    let hdurl = match fields.optional_str("hdurl") {
        Some(Some(u)) => fields.absolute_url("hdurl", u).map(Some),
        other => other,
    };
    let service_version = fields.required_str("service_version");
    let copyright = fields.optional_str("copyright");

    if fields.failed {
        return None;
    }

    match (
        date,
        title,
        explanation,
        media_type,
        url,
        hdurl,
        service_version,
        copyright,
    ) {
        (
            Some(date),
            Some(title),
            Some(explanation),
            Some(media_type),
            Some(url),
            Some(hdurl),
            Some(service_version),
            Some(copyright),
        ) => Some(Record {
            date,
            title,
            explanation,
            media_type,
            url,
            hdurl,
            service_version,
            copyright,
        }),
        _ => None,
    }
}

/// Field accessor that records issues against one object.
struct Fields<'a> {
    obj: &'a Map<String, Value>,
    prefix: &'a str,
    issues: &'a mut Vec<FieldIssue>,
    failed: bool,
}

impl Fields<'_> {
    fn report(&mut self, key: &str, problem: Problem) {
        let path = if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.prefix, key)
        };
        self.issues.push(FieldIssue { path, problem });
        self.failed = true;
    }

    fn required_str(&mut self, key: &str) -> Option<String> {
        match self.obj.get(key) {
            None => {
                self.report(key, Problem::Missing);
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.report(key, Problem::NotAString);
                None
            }
        }
    }

    /// `Some(None)` when absent, `None` when present but not a string.
    /// `null` counts as present.
    fn optional_str(&mut self, key: &str) -> Option<Option<String>> {
        match self.obj.get(key) {
            None => Some(None),
            Some(Value::String(s)) => Some(Some(s.clone())),
            Some(_) => {
                self.report(key, Problem::NotAString);
                None
            }
        }
    }

    fn media_type(&mut self, key: &str) -> Option<MediaType> {
        let raw = self.required_str(key)?;
        let parsed = MediaType::from_wire(&raw);
        if parsed.is_none() {
            self.report(key, Problem::UnknownMediaType(raw));
        }
        parsed
    }

    fn absolute_url(&mut self, key: &str, value: String) -> Option<String> {
        match url::Url::parse(&value) {
            Ok(_) => Some(value),
            Err(e) => {
                self.report(key, Problem::InvalidUrl(e.to_string()));
                None
            }
        }
    }
}
