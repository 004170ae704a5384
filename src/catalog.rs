//! File catalog
//!
//! Projects the store's flat object listing into the deduplicated, sorted,
//! UI-ready file list. Derived artifacts never show up here; they surface
//! only through previews. The catalog is rebuilt wholesale on every refresh,
//! with no identity carried across rebuilds.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::classify::{classify, human_readable_size, MediaKind};
use crate::naming::NamingResolver;
use crate::store::{ObjectEntry, ObjectStore, StoreError};

/// One primary file as the rendering layer sees it
#[derive(Debug, Clone)]
pub struct CatalogItem {
    /// Key relative to the scoped storage prefix
    pub name: String,
    /// Name with the redacted-media prefix stripped
    pub display_name: String,
    /// Whether this is a redacted variant
    pub is_redacted: bool,
    pub kind: MediaKind,
    /// Whether an inline preview exists
    pub viewable: bool,
    /// Document-type icon
    pub icon: &'static str,
    /// Preview control icon, media kinds only
    pub view_icon: Option<&'static str>,
    /// Full store key
    pub key: String,
    /// Time-limited retrieval URL
    pub signed_url: String,
    /// Human-readable size
    pub size: String,
    pub size_bytes: u64,
    pub last_modified: DateTime<Utc>,
    /// UI selection flag, mutable in place
    pub selected: bool,
}

/// Pure projection of one store entry, before the signed URL is attached.
/// Returns `None` for entries living under a derived-artifact folder.
pub fn project_entry(entry: &ObjectEntry, resolver: &NamingResolver) -> Option<ProjectedEntry> {
    let name = resolver.relative_name(&entry.key).to_string();
    if name.is_empty() || resolver.is_derived_artifact(&name) {
        return None;
    }
    let redacted_prefix = &resolver.naming().redacted_media_prefix;
    let is_redacted = name.contains(redacted_prefix.as_str());
    let display_name = if is_redacted {
        name.replacen(redacted_prefix.as_str(), "", 1)
    } else {
        name.clone()
    };
    Some(ProjectedEntry {
        name,
        display_name,
        is_redacted,
    })
}

/// Intermediate projection result
#[derive(Debug, Clone)]
pub struct ProjectedEntry {
    pub name: String,
    pub display_name: String,
    pub is_redacted: bool,
}

/// Ordering key: redacted variants sort immediately after their base file.
/// Case-insensitive, deterministic for a fixed input set.
pub fn sort_key(display_name: &str, is_redacted: bool) -> String {
    let mut key = display_name.to_lowercase();
    if is_redacted {
        key.push_str("-redacted");
    }
    key
}

/// The owned, mutable file list
#[derive(Debug, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Rebuild the catalog from a fresh listing.
    ///
    /// On failure the catalog is left empty; a stale partial list is never
    /// shown. Selection state does not survive a rebuild.
    pub async fn refresh(
        &mut self,
        store: &dyn ObjectStore,
        resolver: &NamingResolver,
    ) -> Result<usize, StoreError> {
        self.items.clear();

        let entries = store.list(resolver.prefix()).await?;
        debug!(count = entries.len(), prefix = resolver.prefix(), "listed objects");

        let mut items = Vec::new();
        for entry in &entries {
            let Some(projected) = project_entry(entry, resolver) else {
                continue;
            };
            let classification = classify(&projected.name);
            let signed_url = store
                .signed_url(&entry.key, resolver.naming().link_expiration_secs)
                .await?;
            items.push(CatalogItem {
                name: projected.name,
                display_name: projected.display_name,
                is_redacted: projected.is_redacted,
                kind: classification.kind,
                viewable: classification.kind.is_viewable(),
                icon: classification.icon,
                view_icon: classification.view_icon,
                key: entry.key.clone(),
                signed_url,
                size: human_readable_size(entry.size),
                size_bytes: entry.size,
                last_modified: entry.last_modified,
                selected: false,
            });
        }

        items.sort_by(|a, b| {
            sort_key(&a.display_name, a.is_redacted)
                .cmp(&sort_key(&b.display_name, b.is_redacted))
                .then_with(|| a.name.cmp(&b.name))
        });

        self.items = items;
        Ok(self.items.len())
    }

    /// Set the selection flag of the item with the given key
    pub fn set_selected(&mut self, key: &str, selected: bool) -> bool {
        match self.items.iter_mut().find(|item| item.key == key) {
            Some(item) => {
                item.selected = selected;
                true
            }
            None => {
                warn!(key, "selection change for unknown catalog key");
                false
            }
        }
    }

    /// Set every item's selection flag
    pub fn select_all(&mut self, selected: bool) {
        for item in &mut self.items {
            item.selected = selected;
        }
    }

    /// Whether every item is selected (true for an empty catalog)
    pub fn all_selected(&self) -> bool {
        self.items.iter().all(|item| item.selected)
    }

    /// Whether at least one item is selected
    pub fn any_selected(&self) -> bool {
        self.items.iter().any(|item| item.selected)
    }

    /// Currently selected items
    pub fn selected_items(&self) -> Vec<&CatalogItem> {
        self.items.iter().filter(|item| item.selected).collect()
    }

    /// Look up an item by its full store key
    pub fn find_by_key(&self, key: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.key == key)
    }
}
