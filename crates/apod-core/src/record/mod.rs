//! Feed record shape and validation of decoded JSON into it.

mod validate;

use serde::Serialize;
use std::fmt;

pub use validate::{validate_many, validate_one, FieldIssue, Problem, ValidationError};

/// Kind of media a record points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }

    /// Parse the wire value. Exact, lowercase match only.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "image" => Some(MediaType::Image),
            "video" => Some(MediaType::Video),
            _ => None,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validated feed entry.
///
/// Only [`validate_one`] / [`validate_many`] build these, so a `Record` always
/// satisfies the shape rules: a known media type and absolute `url`/`hdurl`.
/// Serializes back to the wire field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    date: String,
    title: String,
    explanation: String,
    media_type: MediaType,
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hdurl: Option<String>,
    service_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    copyright: Option<String>,
}

impl Record {
    /// Calendar date, `YYYY-MM-DD`.
    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// High-resolution image URL; usually absent for videos.
    pub fn hdurl(&self) -> Option<&str> {
        self.hdurl.as_deref()
    }

    pub fn service_version(&self) -> &str {
        &self.service_version
    }

    pub fn copyright(&self) -> Option<&str> {
        self.copyright.as_deref()
    }
}
