//! Deployment configuration
//!
//! All naming conventions and limits are externally configurable but
//! semantically fixed within one deployment. Configuration is an explicit
//! struct handed to constructors; there is no process-wide SDK state.

use std::path::Path;

use serde::Deserialize;

use crate::{Error, Result};

/// Placeholder value shipped in unconfigured deployments
const UNCONFIGURED_PREFIX: &str = "Change_this_prefix";

/// Naming conventions tying primary objects to their derived artifacts,
/// plus the limits the upload and preview paths enforce.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Folder holding transcription outputs
    pub transcribe_folder: String,
    /// Suffix of the word-timed transcription JSON
    pub transcription_suffix: String,
    /// Suffix of the formatted transcript document
    pub transcript_doc_suffix: String,
    /// Prefix marking a redacted primary media file
    pub redacted_media_prefix: String,
    /// Prefix the transcription pipeline uses for redacted outputs
    pub redacted_transcription_prefix: String,
    /// Token standing in for redacted words inside a transcription
    pub redaction_indicator: String,
    /// Folder holding EXIF metadata and image recognition outputs
    pub image_folder: String,
    /// Suffix of the EXIF metadata JSON
    pub image_metadata_suffix: String,
    /// Suffix of the image recognition JSON
    pub image_recognition_suffix: String,
    /// Folder holding video label outputs
    pub video_label_folder: String,
    /// Suffix of the video label JSON
    pub video_label_suffix: String,
    /// Signed URL validity in seconds
    pub link_expiration_secs: u64,
    /// Transcript display block duration in seconds
    pub block_seconds: f64,
    /// Longest accepted upload file name
    pub max_file_name_length: usize,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            transcribe_folder: "transcribed_files".to_string(),
            transcription_suffix: "-transcribed.json".to_string(),
            transcript_doc_suffix: ".docx".to_string(),
            redacted_media_prefix: "audio_redacted-".to_string(),
            redacted_transcription_prefix: "redacted-".to_string(),
            redaction_indicator: "[PII]".to_string(),
            image_folder: "image_metadata".to_string(),
            image_metadata_suffix: ".json".to_string(),
            image_recognition_suffix: ".rekog.json".to_string(),
            video_label_folder: "video_labels".to_string(),
            video_label_suffix: ".rek.json".to_string(),
            link_expiration_secs: 24 * 60 * 60,
            block_seconds: 10.0,
            max_file_name_length: 1024,
        }
    }
}

/// Top-level configuration for one vault instance
#[derive(Debug, Clone, Deserialize)]
pub struct VaultConfig {
    /// Object store bucket name
    pub bucket: String,
    /// Store region, when the transport needs one
    #[serde(default)]
    pub region: Option<String>,
    /// Storage prefix isolating this deployment's objects
    pub prefix: String,
    /// Optional record scope appended below the prefix
    #[serde(default)]
    pub record_id: Option<String>,
    /// Naming conventions (defaults match the standard pipeline)
    #[serde(default)]
    pub naming: NamingConfig,
}

impl VaultConfig {
    /// Parse configuration from a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: VaultConfig =
            toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Reject configurations still carrying shipped placeholders
    pub fn validate(&self) -> Result<()> {
        if self.bucket.is_empty() {
            return Err(Error::Config("bucket must not be empty".to_string()));
        }
        if self.prefix == UNCONFIGURED_PREFIX {
            return Err(Error::Config(
                "prefix is still set to the unconfigured placeholder".to_string(),
            ));
        }
        Ok(())
    }

    /// Key prefix under which this instance's objects live:
    /// `{prefix}/` plus `{record_id}/` when a record scope is set.
    /// An empty prefix contributes no path segment.
    pub fn scoped_prefix(&self) -> String {
        let mut scoped = String::new();
        if !self.prefix.is_empty() {
            scoped.push_str(&self.prefix);
            scoped.push('/');
        }
        if let Some(record) = self.record_id.as_deref() {
            if !record.is_empty() {
                scoped.push_str(record);
                scoped.push('/');
            }
        }
        scoped
    }
}
