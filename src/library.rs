//! Media library orchestrator
//!
//! Owns one deployment's catalog state and drives the store boundary:
//! wholesale catalog refreshes, atomic deletion of a selection and its
//! derived artifacts, upload planning and launching, preview assembly.
//! Single-threaded ownership: the catalog is mutated only through this
//! instance, never aliased into store responses.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info};

use crate::catalog::{Catalog, CatalogItem};
use crate::config::VaultConfig;
use crate::deletion::build_deletion_keys;
use crate::naming::NamingResolver;
use crate::notice::Notice;
use crate::preview::{self, Preview};
use crate::store::ObjectStore;
use crate::upload::{self, UploadEvent, UploadPlan, UploadTask};
use crate::Result;

/// One configured media library instance
pub struct MediaLibrary {
    config: VaultConfig,
    resolver: NamingResolver,
    store: Arc<dyn ObjectStore>,
    catalog: Catalog,
}

impl MediaLibrary {
    /// Validate the configuration and bind to a store
    pub fn new(config: VaultConfig, store: Arc<dyn ObjectStore>) -> Result<Self> {
        config.validate()?;
        let resolver = NamingResolver::new(config.naming.clone(), config.scoped_prefix());
        Ok(Self {
            config,
            resolver,
            store,
            catalog: Catalog::new(),
        })
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn resolver(&self) -> &NamingResolver {
        &self.resolver
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    /// Rebuild the catalog from a fresh listing. On failure the catalog is
    /// left empty and a sticky error notice is returned; a stale list is
    /// never shown.
    pub async fn refresh(&mut self) -> Vec<Notice> {
        match self.catalog.refresh(self.store.as_ref(), &self.resolver).await {
            Ok(count) => {
                info!(count, "catalog refreshed");
                Vec::new()
            }
            Err(e) => {
                error!(error = %e, "could not refresh catalog");
                vec![Notice::error("Could not get file list", e.to_string())]
            }
        }
    }

    /// Delete every selected file together with its derived artifacts, then
    /// refresh. The deletion closure may name artifacts that were never
    /// produced; the store ignores those.
    pub async fn delete_selected(&mut self) -> Vec<Notice> {
        let keys = build_deletion_keys(self.catalog.selected_items(), &self.resolver);
        if keys.is_empty() {
            return Vec::new();
        }

        let mut notices = Vec::new();
        match self.store.delete_objects(&keys).await {
            Ok(()) => {
                info!(count = keys.len(), "deleted selection and derived artifacts");
                notices.push(Notice::success("Files deleted."));
            }
            Err(e) => {
                error!(error = %e, "deletion failed");
                notices.push(Notice::error("Could not delete files", e.to_string()));
            }
        }
        // Refresh either way so the catalog reflects whatever the store now holds
        notices.extend(self.refresh().await);
        notices
    }

    /// Validate and normalize a batch of upload file names
    pub fn plan_uploads<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> UploadPlan {
        upload::plan_uploads(names, &self.resolver)
    }

    /// Launch the planned uploads as independent concurrent transfers and
    /// return the event stream to track them on. The transfers outlive the
    /// receiver: dropping it dismisses the progress view, nothing else.
    pub fn start_uploads(
        &self,
        files: Vec<(UploadTask, Vec<u8>)>,
    ) -> mpsc::UnboundedReceiver<UploadEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        upload::run_uploads(Arc::clone(&self.store), files, tx);
        rx
    }

    /// Assemble the preview for the item with the given key. `None` when the
    /// key is unknown or the kind has no inline preview.
    pub async fn open_preview(&self, key: &str) -> Option<Preview> {
        let item = self.catalog.find_by_key(key)?;
        preview::open_preview(self.store.as_ref(), &self.resolver, item).await
    }

    /// Items currently selected, for rendering
    pub fn selected_items(&self) -> Vec<&CatalogItem> {
        self.catalog.selected_items()
    }
}
