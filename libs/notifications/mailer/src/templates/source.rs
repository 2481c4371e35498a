use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::bundled;
use crate::error::{ParseResult, TemplateParseError};

/// Where a single template's text comes from
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TemplateSource {
    /// A file on disk
    File(PathBuf),
    /// A resource compiled into the binary, by identifier
    Bundled(String),
}

impl TemplateSource {
    /// Registered template name: the file stem of the path or identifier
    pub fn name(&self) -> String {
        let path = match self {
            Self::File(path) => path.as_path(),
            Self::Bundled(id) => Path::new(id.as_str()),
        };

        path.file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| path.display().to_string())
    }

    /// Read the template text
    pub(crate) fn read(&self) -> ParseResult<Cow<'static, str>> {
        match self {
            Self::File(path) => match fs::read_to_string(path) {
                Ok(text) => Ok(Cow::Owned(text)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    Err(TemplateParseError::NotFound(path.clone()))
                }
                Err(source) => Err(TemplateParseError::Read {
                    path: path.clone(),
                    source,
                }),
            },
            Self::Bundled(id) => bundled::get(id)
                .map(Cow::Borrowed)
                .ok_or_else(|| TemplateParseError::NotBundled(id.clone())),
        }
    }
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Bundled(id) => write!(f, "bundled:{}", id),
        }
    }
}

/// How a store turns identifiers into sources
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplateOrigin {
    /// Identifiers are file names under this directory
    Directory(PathBuf),
    /// Identifiers name bundled resources
    Bundled,
}

impl TemplateOrigin {
    pub fn resolve(&self, id: &str) -> TemplateSource {
        match self {
            Self::Directory(dir) => TemplateSource::File(dir.join(id)),
            Self::Bundled => TemplateSource::Bundled(id.to_string()),
        }
    }
}

/// Outcome of the last parse attempt for a source
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseStatus {
    Parsed,
    Failed(String),
}

/// A template the store has attempted to load
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateDefinition {
    pub name: String,
    pub source: TemplateSource,
    pub status: ParseStatus,
}

impl TemplateDefinition {
    pub fn is_parsed(&self) -> bool {
        self.status == ParseStatus::Parsed
    }
}
