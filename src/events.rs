#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::sync::Mutex;

use crate::model::NodeTag;

/// Notifications fired while courses are created, imported and locked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentEvent {
    /// A content node was modified (locked).
    Modified {
        /// NTIID of the node.
        ntiid: String,
        /// Kind of node.
        tag:   NodeTag,
    },
    /// A course or section shell was created.
    CourseCreated {
        /// Catalog NTIID of the new course.
        ntiid: String,
    },
    /// Content was imported into a course.
    CourseImported {
        /// Catalog NTIID of the course.
        ntiid: String,
    },
}

/// Receiver of [`ContentEvent`]s.
pub trait EventSink: Send + Sync {
    /// Handles one event.
    fn notify(&self, event: &ContentEvent);
}

/// Forwards every event to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn notify(&self, event: &ContentEvent) {
        tracing::debug!(?event, "content event");
    }
}

/// Keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Events received so far.
    events: Mutex<Vec<ContentEvent>>,
}

impl RecordingSink {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far.
    pub fn events(&self) -> Vec<ContentEvent> {
        self.events.lock().expect("event log poisoned").clone()
    }

    /// NTIIDs of every `Modified` event, in arrival order.
    pub fn modified(&self) -> Vec<String> {
        self.events
            .lock()
            .expect("event log poisoned")
            .iter()
            .filter_map(|e| match e {
                ContentEvent::Modified { ntiid, .. } => Some(ntiid.clone()),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn notify(&self, event: &ContentEvent) {
        self.events
            .lock()
            .expect("event log poisoned")
            .push(event.clone());
    }
}
