//! RefetchAdapter - invalidates cached lists when the server reports a change.
//!
//! Never touches the notification store; it only tells the data layer which
//! collection is stale.

use std::sync::Arc;

use crate::domain::foundation::{names, DomainError, PayloadReader, RealtimeEvent};
use crate::ports::{EventHandler, ResourceKind, UiSignal, UiSignalSink};

/// Handles every domain event that changes a server-side collection.
pub struct RefetchAdapter {
    signals: Arc<dyn UiSignalSink>,
}

impl RefetchAdapter {
    pub fn new(signals: Arc<dyn UiSignalSink>) -> Self {
        Self { signals }
    }

    /// Events this adapter subscribes to.
    pub fn events() -> Vec<&'static str> {
        names::INCIDENT_EVENTS
            .iter()
            .chain(names::PPE_EVENTS)
            .chain(names::TRAINING_EVENTS)
            .chain(names::PROJECT_EVENTS)
            .chain(&[names::NOTIFICATION_CREATED])
            .copied()
            .filter(|event| resource_for(event).is_some())
            .collect()
    }
}

/// The collection an event invalidates, and where its entity ID lives.
fn resource_for(event: &str) -> Option<(ResourceKind, &'static [&'static str])> {
    const INCIDENT: &[&str] = &["incident._id", "incidentId", "_id"];
    const ASSIGNMENT: &[&str] = &["assignment._id", "assignmentId", "_id"];
    const ITEM: &[&str] = &["item._id", "ppe._id", "itemId", "ppeId", "_id"];
    const SESSION: &[&str] = &["session._id", "sessionId", "training._id", "_id"];
    const ENROLLMENT: &[&str] = &["enrollment._id", "enrollmentId", "_id"];
    const PROJECT: &[&str] = &["project._id", "projectId", "_id"];
    const NONE: &[&str] = &[];

    let resource = match event {
        e if names::INCIDENT_EVENTS.contains(&e) => (ResourceKind::Incidents, INCIDENT),
        names::PPE_LOW_STOCK | names::PPE_ITEM_CREATED | names::PPE_ITEM_UPDATED => {
            (ResourceKind::PpeInventory, ITEM)
        }
        e if names::PPE_EVENTS.contains(&e) => (ResourceKind::PpeAssignments, ASSIGNMENT),
        names::TRAINING_SESSION_CREATED => (ResourceKind::TrainingSessions, SESSION),
        e if names::TRAINING_EVENTS.contains(&e) => {
            (ResourceKind::TrainingEnrollments, ENROLLMENT)
        }
        e if names::PROJECT_EVENTS.contains(&e) => (ResourceKind::Projects, PROJECT),
        names::NOTIFICATION_CREATED => (ResourceKind::Notifications, NONE),
        _ => return None,
    };
    Some(resource)
}

impl EventHandler for RefetchAdapter {
    fn handle(&self, event: &RealtimeEvent) -> Result<(), DomainError> {
        let Some((resource, id_paths)) = resource_for(&event.name) else {
            return Ok(());
        };

        let entity_id = PayloadReader::new(&event.payload).id(id_paths);
        self.signals.signal(UiSignal::Refetch {
            resource,
            entity_id,
        });
        Ok(())
    }

    fn name(&self) -> &'static str {
        "RefetchAdapter"
    }
}
