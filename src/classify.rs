//! File classification
//!
//! Maps a file name to its media kind and display icons using fixed,
//! case-insensitive extension tables. Total: every name yields exactly one
//! kind (possibly [`MediaKind::Other`]) and one icon.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

/// Extensions treated as audio media
const AUDIO_EXTENSIONS: &[&str] = &[
    "aac", "amr", "flac", "m4a", "mp3", "oga", "ogg", "opus", "wav", "wma",
];

/// Extensions treated as video media
const VIDEO_EXTENSIONS: &[&str] = &[
    "3gp", "avi", "m4v", "mkv", "mov", "mp4", "mpeg", "mpg", "webm", "wmv",
];

/// Extensions treated as still images
const IMAGE_EXTENSIONS: &[&str] = &[
    "bmp", "gif", "heic", "jpeg", "jpg", "png", "tif", "tiff", "webp",
];

/// Icon shown for extensions with no dedicated entry
const DEFAULT_ICON: &str = "doctype:unknown";

/// Extension to icon lookup, broader than the media kinds (documents,
/// archives, spreadsheets and so on all get a recognizable icon).
static ICON_TABLE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut table = HashMap::new();
    for ext in AUDIO_EXTENSIONS {
        table.insert(*ext, "doctype:audio");
    }
    for ext in VIDEO_EXTENSIONS {
        table.insert(*ext, "doctype:video");
    }
    for ext in IMAGE_EXTENSIONS {
        table.insert(*ext, "doctype:image");
    }
    table.insert("pdf", "doctype:pdf");
    table.insert("doc", "doctype:word");
    table.insert("docx", "doctype:word");
    table.insert("xls", "doctype:excel");
    table.insert("xlsx", "doctype:excel");
    table.insert("ppt", "doctype:ppt");
    table.insert("pptx", "doctype:ppt");
    table.insert("csv", "doctype:csv");
    table.insert("txt", "doctype:txt");
    table.insert("rtf", "doctype:rtf");
    table.insert("htm", "doctype:html");
    table.insert("html", "doctype:html");
    table.insert("xml", "doctype:xml");
    table.insert("json", "doctype:xml");
    table.insert("zip", "doctype:zip");
    table.insert("gz", "doctype:zip");
    table.insert("tar", "doctype:zip");
    table.insert("7z", "doctype:zip");
    table.insert("rar", "doctype:zip");
    table
});

/// Media kind of a primary object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
    Image,
    Other,
}

impl MediaKind {
    /// Whether an inline preview exists for this kind
    pub fn is_viewable(self) -> bool {
        !matches!(self, MediaKind::Other)
    }
}

/// Classification result: kind plus display icons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: MediaKind,
    /// Document-type icon for the file list
    pub icon: &'static str,
    /// Icon shown on the preview control, media kinds only
    pub view_icon: Option<&'static str>,
}

/// Classify a file name by extension.
pub fn classify(name: &str) -> Classification {
    let ext = extension_of(name);
    let ext = ext.as_deref().unwrap_or("");

    let kind = if AUDIO_EXTENSIONS.contains(&ext) {
        MediaKind::Audio
    } else if VIDEO_EXTENSIONS.contains(&ext) {
        MediaKind::Video
    } else if IMAGE_EXTENSIONS.contains(&ext) {
        MediaKind::Image
    } else {
        MediaKind::Other
    };

    let view_icon = match kind {
        MediaKind::Video => Some("utility:video"),
        MediaKind::Audio => Some("utility:volume_high"),
        MediaKind::Image => Some("utility:image"),
        MediaKind::Other => None,
    };

    Classification {
        kind,
        icon: ICON_TABLE.get(ext).copied().unwrap_or(DEFAULT_ICON),
        view_icon,
    }
}

/// Lower-cased extension of `name`, if any
fn extension_of(name: &str) -> Option<String> {
    let dot = name.rfind('.')?;
    let ext = &name[dot + 1..];
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_ascii_lowercase())
    }
}

/// Format a byte count for display ("312 B", "4.2 MB", ...)
pub fn human_readable_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    for next in &UNITS[1..] {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{:.1} {}", value, unit)
}
