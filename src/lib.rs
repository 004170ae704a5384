//! # media-vault
//!
//! Media-asset orchestration core for an object-store backed media browser:
//! - Derives a navigable file catalog from flat object-store keys, excluding
//!   derived-artifact folders
//! - Maps each primary media object to its family of derived artifacts
//!   (transcript, redactions, recognition labels, EXIF metadata) under
//!   deterministic naming conventions
//! - Segments word-timed transcriptions into playback-aligned display blocks
//!   with redaction handling
//! - Projects image metadata and recognition payloads into structured records
//!   with geocoordinate extraction
//!
//! The store transport and the rendering layer live outside this crate:
//! transports implement [`store::ObjectStore`], renderers consume the plain
//! data structures and [`Notice`] values the core produces.

pub mod catalog;
pub mod classify;
pub mod config;
pub mod deletion;
pub mod error;
pub mod image_meta;
pub mod library;
pub mod naming;
pub mod notice;
pub mod preview;
pub mod store;
pub mod transcript;
pub mod upload;

pub use catalog::{Catalog, CatalogItem};
pub use classify::{classify, human_readable_size, Classification, MediaKind};
pub use config::{NamingConfig, VaultConfig};
pub use deletion::build_deletion_keys;
pub use error::{Error, Result};
pub use image_meta::{GeoCoordinates, ImageMetadataRecord, RecognitionLabel};
pub use library::MediaLibrary;
pub use naming::{DerivedKeySet, NamingResolver};
pub use notice::{Notice, Severity};
pub use preview::{ImagePreview, MediaPreview, Preview};
pub use store::{MemoryStore, ObjectEntry, ObjectStore, StoreError};
pub use transcript::{TranscriptBlock, TranscriptWord};
pub use upload::{normalize_file_name, UploadEvent, UploadPlan, UploadTask, UploadTracker};
