//! Upload planning and progress tracking
//!
//! Validates and normalizes file names before any transport call, then runs
//! each upload as an independent concurrent transfer. Progress is tracked per
//! destination key; the aggregate "all done" signal is the AND of every
//! per-file finished flag. In-flight transfers are never cancelled by the
//! caller going away.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::classify::{classify, human_readable_size};
use crate::naming::NamingResolver;
use crate::notice::Notice;
use crate::store::{ObjectStore, ProgressEvent};

/// Replace runs of whitespace, then runs of `+`, with a single underscore.
///
/// The transcription/redaction pipeline cannot handle those characters in
/// object keys. Idempotent: normalizing a normalized name is a no-op.
pub fn normalize_file_name(name: &str) -> String {
    collapse_runs(&collapse_runs(name, char::is_whitespace), |c| c == '+')
}

fn collapse_runs(text: &str, mut is_member: impl FnMut(char) -> bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for ch in text.chars() {
        if is_member(ch) {
            if !in_run {
                out.push('_');
                in_run = true;
            }
        } else {
            out.push(ch);
            in_run = false;
        }
    }
    out
}

/// One accepted upload
#[derive(Debug, Clone)]
pub struct UploadTask {
    /// Name as the user supplied it
    pub original_name: String,
    /// Normalized name used in the store key
    pub name: String,
    /// Destination key
    pub key: String,
    /// Document-type icon for the progress list
    pub icon: &'static str,
}

/// Accepted tasks plus the notices produced while planning
#[derive(Debug, Default)]
pub struct UploadPlan {
    pub tasks: Vec<UploadTask>,
    pub notices: Vec<Notice>,
}

/// Validate and normalize a batch of file names.
///
/// Over-long names are rejected with a sticky error notice each; the rest of
/// the batch still uploads. Renamed files get an informational notice naming
/// the substitution.
pub fn plan_uploads<'a>(
    names: impl IntoIterator<Item = &'a str>,
    resolver: &NamingResolver,
) -> UploadPlan {
    let max_length = resolver.naming().max_file_name_length;
    let mut plan = UploadPlan::default();

    for original in names {
        if original.chars().count() > max_length {
            warn!(length = original.chars().count(), max_length, "rejecting over-long file name");
            plan.notices.push(Notice::error_untitled(format!(
                "File \"{}\" name length ({}) exceeds the maximum length of {} characters and will not be uploaded.",
                original,
                original.chars().count(),
                max_length
            )));
            continue;
        }

        let normalized = normalize_file_name(original);
        if normalized != original {
            plan.notices.push(Notice::info_sticky(
                format!(
                    "File name \"{}\" contains whitespace or \"+\" characters",
                    original
                ),
                format!("The file will be uploaded as \"{}\".", normalized),
            ));
        }

        plan.tasks.push(UploadTask {
            original_name: original.to_string(),
            key: resolver.primary_key(&normalized),
            icon: classify(original).icon,
            name: normalized,
        });
    }

    plan
}

/// Progress row for one upload, keyed by destination key
#[derive(Debug, Clone)]
pub struct UploadProgress {
    pub name: String,
    pub key: String,
    pub icon: &'static str,
    /// 0 to 100
    pub percent: u8,
    /// Humanized bytes transferred so far
    pub loaded: String,
    /// Humanized total bytes
    pub total: String,
    pub finished: bool,
    pub succeeded: bool,
}

/// Event stream feeding the tracker
#[derive(Debug, Clone)]
pub enum UploadEvent {
    Progress { key: String, loaded: u64, total: u64 },
    Completed { key: String },
    Failed { key: String, message: String },
}

/// Per-file progress state for a batch of uploads
#[derive(Debug, Default)]
pub struct UploadTracker {
    files: Vec<UploadProgress>,
}

impl UploadTracker {
    /// Start tracking the accepted tasks of a plan
    pub fn new(tasks: &[UploadTask]) -> Self {
        Self {
            files: tasks
                .iter()
                .map(|task| UploadProgress {
                    name: task.original_name.clone(),
                    key: task.key.clone(),
                    icon: task.icon,
                    percent: 0,
                    loaded: String::new(),
                    total: String::new(),
                    finished: false,
                    succeeded: false,
                })
                .collect(),
        }
    }

    pub fn files(&self) -> &[UploadProgress] {
        &self.files
    }

    /// Apply one event; failure events produce the notice to surface.
    /// Events for unknown keys are ignored (a transfer the caller never
    /// planned, or a stale completion after a rebuild).
    pub fn apply(&mut self, event: &UploadEvent) -> Option<Notice> {
        match event {
            UploadEvent::Progress { key, loaded, total } => {
                if let Some(file) = self.file_mut(key) {
                    file.percent = if *total == 0 {
                        100
                    } else {
                        ((loaded * 100) / total) as u8
                    };
                    file.loaded = human_readable_size(*loaded);
                    file.total = human_readable_size(*total);
                }
                None
            }
            UploadEvent::Completed { key } => {
                if let Some(file) = self.file_mut(key) {
                    file.finished = true;
                    file.succeeded = true;
                }
                None
            }
            UploadEvent::Failed { key, message } => {
                let name = match self.file_mut(key) {
                    Some(file) => {
                        file.finished = true;
                        file.succeeded = false;
                        file.name.clone()
                    }
                    None => key.clone(),
                };
                Some(Notice::error(
                    format!("Error uploading file \"{}\"", name),
                    message.clone(),
                ))
            }
        }
    }

    /// True once every tracked file has finished, successfully or not.
    /// An empty batch counts as finished.
    pub fn all_finished(&self) -> bool {
        self.files.iter().all(|file| file.finished)
    }

    fn file_mut(&mut self, key: &str) -> Option<&mut UploadProgress> {
        self.files.iter_mut().find(|file| file.key == key)
    }
}

/// Run a batch of uploads as independent concurrent transfers.
///
/// Each file gets its own task; one failure never affects the others. Events
/// arrive on `events` in per-file order, with no ordering guarantee between
/// files. The supervisor task owns the transfers: dropping the caller's
/// receiver does not cancel anything.
pub fn run_uploads(
    store: Arc<dyn ObjectStore>,
    files: Vec<(UploadTask, Vec<u8>)>,
    events: mpsc::UnboundedSender<UploadEvent>,
) {
    tokio::spawn(async move {
        let transfers = files.into_iter().map(|(task, body)| {
            let store = Arc::clone(&store);
            let events = events.clone();
            tokio::spawn(async move {
                let (progress_tx, mut progress_rx) = mpsc::unbounded_channel::<ProgressEvent>();
                let forwarder_events = events.clone();
                let forwarder = tokio::spawn(async move {
                    while let Some(progress) = progress_rx.recv().await {
                        let _ = forwarder_events.send(UploadEvent::Progress {
                            key: progress.key,
                            loaded: progress.loaded,
                            total: progress.total,
                        });
                    }
                });

                let result = store.put_object(&task.key, body, Some(progress_tx)).await;
                // Progress sender is dropped by put_object's completion
                let _ = forwarder.await;
                match result {
                    Ok(()) => {
                        info!(key = %task.key, "upload complete");
                        let _ = events.send(UploadEvent::Completed { key: task.key });
                    }
                    Err(e) => {
                        warn!(key = %task.key, error = %e, "upload failed");
                        let _ = events.send(UploadEvent::Failed {
                            key: task.key,
                            message: e.to_string(),
                        });
                    }
                }
            })
        });
        join_all(transfers).await;
    });
}
