//! Job states, export formats and naming attributes.
//!
//! Enums that travel over the wire expose `from_wire()`/`as_str()` pairs; the
//! remote API is loose about casing, so parsing never fails and unknown values
//! map to the non-terminal state.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// JobState
// ---------------------------------------------------------------------------

/// Lifecycle of a queued search job.
///
/// ```text
/// submitted → running(progress) → completed
///                               → failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JobState {
    Submitted,
    Running { progress: u8 },
    Completed,
    Failed,
}

impl JobState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Progress percentage, if the job reported one.
    #[must_use]
    pub const fn progress(self) -> Option<u8> {
        match self {
            Self::Running { progress } => Some(progress),
            Self::Completed => Some(100),
            Self::Submitted | Self::Failed => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Running { .. } => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running { progress } => write!(f, "running ({progress}%)"),
            other => f.write_str(other.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// DomainEventState
// ---------------------------------------------------------------------------

/// State of an export domain event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DomainEventState {
    Pending,
    Success,
    Failed,
}

impl DomainEventState {
    /// Parse the `state` field of a domain event. Anything other than
    /// `success` or `failed` (including a missing state) is still pending.
    #[must_use]
    pub fn from_wire(state: Option<&str>) -> Self {
        match state.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("success") => Self::Success,
            Some(s) if s.eq_ignore_ascii_case("failed") => Self::Failed,
            _ => Self::Pending,
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for DomainEventState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ExportFormat
// ---------------------------------------------------------------------------

/// `output_format` query value of `POST /exports/structure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// One PDB text file (multi-model when several structures are exported).
    PdbText,
    /// A ZIP archive with one PDB file per structure.
    PdbZip,
}

impl ExportFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PdbText => "structures-pdb-txt",
            Self::PdbZip => "structures-pdb-zip",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// NamingAttribute
// ---------------------------------------------------------------------------

/// Which attribute names a structure when it is handed to the host viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingAttribute {
    #[default]
    Label,
    Title,
    ExternalCode,
    InternalId,
}

impl NamingAttribute {
    pub const ALL: [Self; 4] = [Self::Label, Self::Title, Self::ExternalCode, Self::InternalId];

    /// Parse a persisted setting, falling back to [`NamingAttribute::Label`]
    /// for anything unrecognised.
    #[must_use]
    pub fn from_setting(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Title => "title",
            Self::ExternalCode => "external_code",
            Self::InternalId => "internal_id",
        }
    }
}

impl FromStr for NamingAttribute {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|attr| attr.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownNamingAttribute(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for NamingAttribute {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_setting(&raw))
    }
}

impl fmt::Display for NamingAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
