//! Preview assembly
//!
//! Builds the data a preview surface needs when a file is opened: media
//! playback URL plus transcript blocks for audio/video, metadata and
//! recognition labels plus coordinates for images. Each derived artifact is
//! fetched independently; a missing artifact only clears its availability
//! flag and never fails the preview. Everything here is discarded when the
//! preview closes.

use tracing::{debug, warn};

use crate::catalog::CatalogItem;
use crate::classify::MediaKind;
use crate::image_meta::{self, GeoCoordinates, ImageMetadataRecord, RecognitionLabel};
use crate::naming::NamingResolver;
use crate::store::{ObjectStore, StoreError};
use crate::transcript::{self, TranscriptBlock};

/// Preview data for an audio or video file
#[derive(Debug, Clone)]
pub struct MediaPreview {
    pub name: String,
    pub signed_url: String,
    pub is_video: bool,
    pub is_audio: bool,
    pub view_icon: Option<&'static str>,
    /// Whether a transcription artifact was found and parsed
    pub has_transcription: bool,
    pub blocks: Vec<TranscriptBlock>,
    /// Signed link to the formatted transcript document, when resolvable
    pub transcript_doc_url: Option<String>,
}

/// Preview data for an image file
#[derive(Debug, Clone)]
pub struct ImagePreview {
    pub name: String,
    pub signed_url: String,
    pub view_icon: Option<&'static str>,
    pub has_metadata: bool,
    pub metadata: Vec<ImageMetadataRecord>,
    pub has_recognition: bool,
    pub labels: Vec<RecognitionLabel>,
    /// Present only when both GPS fields parsed; drives the map marker
    pub coordinates: Option<GeoCoordinates>,
}

/// Either preview shape, keyed by the file's media kind
#[derive(Debug, Clone)]
pub enum Preview {
    Media(MediaPreview),
    Image(ImagePreview),
}

/// Assemble the preview for a catalog item. Returns `None` for kinds with no
/// inline preview.
pub async fn open_preview(
    store: &dyn ObjectStore,
    resolver: &NamingResolver,
    item: &CatalogItem,
) -> Option<Preview> {
    match item.kind {
        MediaKind::Audio | MediaKind::Video => {
            Some(Preview::Media(open_media_preview(store, resolver, item).await))
        }
        MediaKind::Image => {
            Some(Preview::Image(open_image_preview(store, resolver, item).await))
        }
        MediaKind::Other => None,
    }
}

/// Build the audio/video preview: transcript document link plus segmented
/// transcript blocks. Transcript fetch or parse failure means "no
/// transcription for this file", nothing more.
pub async fn open_media_preview(
    store: &dyn ObjectStore,
    resolver: &NamingResolver,
    item: &CatalogItem,
) -> MediaPreview {
    let naming = resolver.naming();
    let doc_key = resolver.transcript_doc_key(&item.name);
    let transcript_doc_url = match store
        .signed_url(&doc_key, naming.link_expiration_secs)
        .await
    {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(key = %doc_key, error = %e, "could not sign transcript document link");
            None
        }
    };

    let json_key = resolver.transcript_json_key(&item.name);
    let (has_transcription, blocks) = match store.get_object(&json_key).await {
        Ok(bytes) => match transcript::parse_and_segment(&bytes, naming) {
            Ok(blocks) => (true, blocks),
            Err(e) => {
                warn!(key = %json_key, error = %e, "transcription payload did not parse");
                (false, Vec::new())
            }
        },
        Err(StoreError::NotFound(_)) => {
            debug!(key = %json_key, "no transcription for this file");
            (false, Vec::new())
        }
        Err(e) => {
            warn!(key = %json_key, error = %e, "transcription fetch failed");
            (false, Vec::new())
        }
    };

    MediaPreview {
        name: item.name.clone(),
        signed_url: item.signed_url.clone(),
        is_video: item.kind == MediaKind::Video,
        is_audio: item.kind == MediaKind::Audio,
        view_icon: item.view_icon,
        has_transcription,
        blocks,
        transcript_doc_url,
    }
}

/// Build the image preview. Metadata and recognition are fetched
/// concurrently and fail independently.
pub async fn open_image_preview(
    store: &dyn ObjectStore,
    resolver: &NamingResolver,
    item: &CatalogItem,
) -> ImagePreview {
    let metadata_key = resolver.image_metadata_key(&item.name);
    let recognition_key = resolver.image_recognition_key(&item.name);

    let (metadata_result, recognition_result) = tokio::join!(
        store.get_object(&metadata_key),
        store.get_object(&recognition_key)
    );

    let (has_metadata, metadata) = match metadata_result {
        Ok(bytes) => match image_meta::parse_metadata(&bytes) {
            Ok(records) => (true, records),
            Err(e) => {
                warn!(key = %metadata_key, error = %e, "metadata payload did not parse");
                (false, Vec::new())
            }
        },
        Err(StoreError::NotFound(_)) => {
            debug!(key = %metadata_key, "no metadata for this file");
            (false, Vec::new())
        }
        Err(e) => {
            warn!(key = %metadata_key, error = %e, "metadata fetch failed");
            (false, Vec::new())
        }
    };

    let (has_recognition, labels) = match recognition_result {
        Ok(bytes) => match image_meta::parse_labels(&bytes) {
            Ok(labels) => (true, labels),
            Err(e) => {
                warn!(key = %recognition_key, error = %e, "recognition payload did not parse");
                (false, Vec::new())
            }
        },
        Err(StoreError::NotFound(_)) => {
            debug!(key = %recognition_key, "no recognition labels for this file");
            (false, Vec::new())
        }
        Err(e) => {
            warn!(key = %recognition_key, error = %e, "recognition fetch failed");
            (false, Vec::new())
        }
    };

    let coordinates = image_meta::derive_coordinates(&metadata);

    ImagePreview {
        name: item.name.clone(),
        signed_url: item.signed_url.clone(),
        view_icon: item.view_icon,
        has_metadata,
        metadata,
        has_recognition,
        labels,
        coordinates,
    }
}
