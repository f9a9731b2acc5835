//! Track descriptor records as they appear in a session file.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::track::{Track, TrackFormat};
use crate::error::{DjError, Result};

/// Track variant named by a descriptor's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    #[serde(alias = "mp3", alias = "MP3")]
    Compressed,
    #[serde(alias = "wav", alias = "WAV")]
    Uncompressed,
    /// Any other `type` value. Parses so the record can be skipped on its
    /// own instead of failing the whole session file.
    #[serde(other)]
    Unsupported,
}

impl TrackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackKind::Compressed => "compressed",
            TrackKind::Uncompressed => "uncompressed",
            TrackKind::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Second variant-specific parameter: a flag for compressed tracks, a
/// bit depth for uncompressed ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtraParam {
    Flag(bool),
    Number(i64),
}

impl ExtraParam {
    /// `true`, or any number greater than zero.
    pub fn is_truthy(&self) -> bool {
        match *self {
            ExtraParam::Flag(flag) => flag,
            ExtraParam::Number(n) => n > 0,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match *self {
            ExtraParam::Flag(_) => None,
            ExtraParam::Number(n) => Some(n),
        }
    }
}

/// A track record consumed from the session file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDescriptor {
    #[serde(rename = "type")]
    pub kind: TrackKind,
    pub title: String,
    #[serde(default)]
    pub artists: Vec<String>,
    pub duration_seconds: i64,
    pub bpm: i64,
    /// Bitrate (compressed) or sample rate (uncompressed).
    pub extra_param1: i64,
    /// ID3 flag (compressed) or bit depth (uncompressed).
    pub extra_param2: ExtraParam,
}

impl TryFrom<&TrackDescriptor> for Track {
    type Error = DjError;

    fn try_from(desc: &TrackDescriptor) -> Result<Self> {
        if desc.title.trim().is_empty() {
            return Err(DjError::invalid_descriptor(&desc.title, "title is empty"));
        }

        let duration_seconds = non_negative(desc, "duration_seconds", desc.duration_seconds)?;
        let bpm = non_negative(desc, "bpm", desc.bpm)?;
        let param1 = non_negative(desc, "extra_param1", desc.extra_param1)?;

        let format = match desc.kind {
            TrackKind::Compressed => TrackFormat::Compressed {
                bitrate_kbps: param1,
                has_id3_tags: desc.extra_param2.is_truthy(),
            },
            TrackKind::Unsupported => {
                return Err(DjError::invalid_descriptor(
                    &desc.title,
                    "unsupported track type",
                ));
            }
            TrackKind::Uncompressed => {
                let bit_depth = desc.extra_param2.as_number().ok_or_else(|| {
                    DjError::invalid_descriptor(&desc.title, "bit depth must be an integer")
                })?;
                TrackFormat::Uncompressed {
                    sample_rate: param1,
                    bit_depth: non_negative(desc, "extra_param2", bit_depth)?,
                }
            }
        };

        Ok(Track::new(
            desc.title.clone(),
            desc.artists.clone(),
            duration_seconds,
            bpm,
            format,
        ))
    }
}

fn non_negative(desc: &TrackDescriptor, field: &str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        DjError::invalid_descriptor(
            &desc.title,
            format!("{} out of range: {}", field, value),
        )
    })
}
