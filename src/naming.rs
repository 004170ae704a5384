//! Naming convention resolver
//!
//! Single source of truth for the key conventions tying a primary media
//! object to its derived artifacts. Both the preview path and the deletion
//! path resolve keys through here, so read and delete can never disagree on
//! a suffix again. All transforms are pure string work.

use crate::classify::MediaKind;
use crate::config::NamingConfig;

/// The full set of derived-artifact keys one primary object can have.
///
/// Which fields are populated depends on the media kind: audio gets the two
/// transcript keys, video additionally gets image metadata and video labels,
/// images get image metadata and recognition, and anything else gets nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedKeySet {
    /// Word-timed transcription JSON
    pub transcript_json: Option<String>,
    /// Formatted transcript document
    pub transcript_doc: Option<String>,
    /// EXIF-style metadata JSON
    pub image_metadata: Option<String>,
    /// Image recognition labels JSON
    pub image_recognition: Option<String>,
    /// Video label JSON
    pub video_labels: Option<String>,
}

impl DerivedKeySet {
    /// Populated keys in convention order
    pub fn keys(&self) -> Vec<String> {
        [
            &self.transcript_json,
            &self.transcript_doc,
            &self.image_metadata,
            &self.image_recognition,
            &self.video_labels,
        ]
        .into_iter()
        .flatten()
        .cloned()
        .collect()
    }

    /// Number of populated keys
    pub fn len(&self) -> usize {
        self.keys().len()
    }

    /// Whether no derived keys exist for the kind
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolver bound to one deployment's naming conventions and key prefix
#[derive(Debug, Clone)]
pub struct NamingResolver {
    naming: NamingConfig,
    prefix: String,
}

impl NamingResolver {
    /// `prefix` is the scoped storage prefix all keys live under
    pub fn new(naming: NamingConfig, prefix: impl Into<String>) -> Self {
        Self {
            naming,
            prefix: prefix.into(),
        }
    }

    /// Naming conventions this resolver applies
    pub fn naming(&self) -> &NamingConfig {
        &self.naming
    }

    /// Scoped storage prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Full store key of a primary file name
    pub fn primary_key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    /// Relative name of a full key, with the scoped prefix stripped
    pub fn relative_name<'a>(&self, key: &'a str) -> &'a str {
        key.strip_prefix(self.prefix.as_str()).unwrap_or(key)
    }

    /// Transcription outputs for a redacted media file carry the redacted
    /// transcription prefix instead of the redacted media prefix. The
    /// substitution applies at most once, and only at the start of the name.
    fn transcription_base(&self, name: &str) -> String {
        match name.strip_prefix(&self.naming.redacted_media_prefix) {
            Some(rest) => format!("{}{}", self.naming.redacted_transcription_prefix, rest),
            None => name.to_string(),
        }
    }

    /// Key of the word-timed transcription JSON
    pub fn transcript_json_key(&self, name: &str) -> String {
        format!(
            "{}{}/{}{}",
            self.prefix,
            self.naming.transcribe_folder,
            self.transcription_base(name),
            self.naming.transcription_suffix
        )
    }

    /// Key of the formatted transcript document
    pub fn transcript_doc_key(&self, name: &str) -> String {
        format!(
            "{}{}/{}{}",
            self.prefix,
            self.naming.transcribe_folder,
            self.transcription_base(name),
            self.naming.transcript_doc_suffix
        )
    }

    /// Key of the EXIF metadata JSON
    pub fn image_metadata_key(&self, name: &str) -> String {
        format!(
            "{}{}/{}{}",
            self.prefix, self.naming.image_folder, name, self.naming.image_metadata_suffix
        )
    }

    /// Key of the image recognition JSON
    pub fn image_recognition_key(&self, name: &str) -> String {
        format!(
            "{}{}/{}{}",
            self.prefix, self.naming.image_folder, name, self.naming.image_recognition_suffix
        )
    }

    /// Key of the video label JSON
    pub fn video_label_key(&self, name: &str) -> String {
        format!(
            "{}{}/{}{}",
            self.prefix, self.naming.video_label_folder, name, self.naming.video_label_suffix
        )
    }

    /// All derived-artifact keys for a primary file of the given kind
    pub fn derived_keys(&self, name: &str, kind: MediaKind) -> DerivedKeySet {
        let mut set = DerivedKeySet::default();
        match kind {
            MediaKind::Audio => {
                set.transcript_json = Some(self.transcript_json_key(name));
                set.transcript_doc = Some(self.transcript_doc_key(name));
            }
            MediaKind::Video => {
                set.transcript_json = Some(self.transcript_json_key(name));
                set.transcript_doc = Some(self.transcript_doc_key(name));
                set.image_metadata = Some(self.image_metadata_key(name));
                set.video_labels = Some(self.video_label_key(name));
            }
            MediaKind::Image => {
                set.image_metadata = Some(self.image_metadata_key(name));
                set.image_recognition = Some(self.image_recognition_key(name));
            }
            MediaKind::Other => {}
        }
        set
    }

    /// Whether a relative name lives inside one of the derived-artifact
    /// folders. Checked per path segment, so a primary file whose name merely
    /// contains a folder string does not get misfiled.
    pub fn is_derived_artifact(&self, name: &str) -> bool {
        let folders = [
            self.naming.transcribe_folder.as_str(),
            self.naming.image_folder.as_str(),
            self.naming.video_label_folder.as_str(),
        ];
        // Only directory segments count; the final segment is the file name
        let mut segments = name.split('/').collect::<Vec<_>>();
        segments.pop();
        segments
            .iter()
            .any(|segment| folders.contains(segment))
    }
}
