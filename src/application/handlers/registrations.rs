//! Registration of the domain adapter set, and the guard that undoes it.

use std::sync::Arc;

use tracing::debug;

use crate::domain::foundation::ListenerId;
use crate::ports::{EventHandler, EventSubscriber, UiSignalSink};

use super::{
    AdapterContext, ConnectionAdapter, IncidentAdapter, PpeAdapter, PresenceAdapter,
    ProjectAdapter, RefetchAdapter, ServerNotificationAdapter, TrainingAdapter,
};

/// Every listener registered on behalf of one owning scope.
///
/// Dropping the guard (or calling [`unregister`](Self::unregister)) removes
/// exactly these registrations, leaving other listeners on the same events
/// untouched.
pub struct AdapterRegistrations {
    subscriber: Arc<dyn EventSubscriber>,
    listeners: Vec<(String, ListenerId)>,
}

impl AdapterRegistrations {
    pub fn new(subscriber: Arc<dyn EventSubscriber>) -> Self {
        Self {
            subscriber,
            listeners: Vec::new(),
        }
    }

    /// Registers `handler` for each of `events`.
    pub fn register(&mut self, events: &[&str], handler: Arc<dyn EventHandler>) -> &mut Self {
        let name = handler.name();
        let added = self.subscriber.on_all(events, handler);
        debug!(handler = name, events = added.len(), "Registered adapter");
        self.listeners.extend(added);
        self
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Removes every registration held by this guard. Returns how many were removed.
    pub fn unregister(&mut self) -> usize {
        self.listeners
            .drain(..)
            .filter(|(event, id)| self.subscriber.off(event, *id))
            .count()
    }
}

impl Drop for AdapterRegistrations {
    fn drop(&mut self) {
        let removed = self.unregister();
        if removed > 0 {
            debug!(removed, "Adapter registrations dropped");
        }
    }
}

/// Registers the full domain adapter set.
///
/// Notification adapters are registered before the refetch adapter, so a
/// refetch signal for an event is raised after its notification exists.
pub fn register_domain_adapters(
    subscriber: Arc<dyn EventSubscriber>,
    ctx: AdapterContext,
    signals: Arc<dyn UiSignalSink>,
) -> AdapterRegistrations {
    let mut registrations = AdapterRegistrations::new(subscriber);
    let placeholders = ctx.placeholders().clone();

    registrations
        .register(
            ConnectionAdapter::EVENTS,
            Arc::new(ConnectionAdapter::new(ctx.clone(), Arc::clone(&signals))),
        )
        .register(IncidentAdapter::EVENTS, Arc::new(IncidentAdapter::new(ctx.clone())))
        .register(PpeAdapter::EVENTS, Arc::new(PpeAdapter::new(ctx.clone())))
        .register(TrainingAdapter::EVENTS, Arc::new(TrainingAdapter::new(ctx.clone())))
        .register(ProjectAdapter::EVENTS, Arc::new(ProjectAdapter::new(ctx.clone())))
        .register(
            ServerNotificationAdapter::EVENTS,
            Arc::new(ServerNotificationAdapter::new(ctx)),
        )
        .register(
            &RefetchAdapter::events(),
            Arc::new(RefetchAdapter::new(Arc::clone(&signals))),
        )
        .register(
            PresenceAdapter::EVENTS,
            Arc::new(PresenceAdapter::new(signals, placeholders)),
        );

    registrations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InProcessEventRegistry;
    use crate::adapters::signals::BroadcastSignalSink;
    use crate::application::handlers::context::test_support;
    use crate::domain::foundation::{names, DomainError, RealtimeEvent, ALL_EVENTS};
    use crate::ports::EventPublisher;
    use serde_json::json;

    struct Noop;

    impl EventHandler for Noop {
        fn handle(&self, _: &RealtimeEvent) -> Result<(), DomainError> {
            Ok(())
        }

        fn name(&self) -> &'static str {
            "Noop"
        }
    }

    #[test]
    fn drop_removes_only_own_listeners() {
        let registry = InProcessEventRegistry::new_shared();
        registry.on(names::INCIDENT_REPORTED, Arc::new(Noop));

        {
            let mut guard = AdapterRegistrations::new(registry.clone());
            guard.register(&[names::INCIDENT_REPORTED, names::PPE_ISSUED], Arc::new(Noop));
            assert_eq!(registry.listener_count(names::INCIDENT_REPORTED), 2);
        }

        assert_eq!(registry.listener_count(names::INCIDENT_REPORTED), 1);
        assert_eq!(registry.listener_count(names::PPE_ISSUED), 0);
    }

    #[test]
    fn unregister_is_idempotent() {
        let registry = InProcessEventRegistry::new_shared();
        let mut guard = AdapterRegistrations::new(registry.clone());
        guard.register(&[names::USER_TYPING], Arc::new(Noop));

        assert_eq!(guard.unregister(), 1);
        assert_eq!(guard.unregister(), 0);
        assert!(guard.is_empty());
    }

    #[test]
    fn domain_adapters_cover_every_event() {
        let registry = InProcessEventRegistry::new_shared();
        let ctx = test_support::context();
        let _guard = register_domain_adapters(
            registry.clone(),
            ctx,
            Arc::new(BroadcastSignalSink::default()),
        );

        for event in ALL_EVENTS.iter() {
            assert!(registry.listener_count(event) > 0, "{} has no listener", event);
        }
    }

    #[test]
    fn reregistering_after_teardown_does_not_accumulate() {
        let registry = InProcessEventRegistry::new_shared();
        let ctx = test_support::context();
        let signals: Arc<dyn UiSignalSink> = Arc::new(BroadcastSignalSink::default());

        let first = register_domain_adapters(registry.clone(), ctx.clone(), signals.clone());
        let count = registry.total_listeners();
        drop(first);
        let _second = register_domain_adapters(registry.clone(), ctx.clone(), signals);

        assert_eq!(registry.total_listeners(), count);

        registry.emit(RealtimeEvent::new(
            names::INCIDENT_REPORTED,
            json!({"incident": {"_id": "i1", "title": "Fire"}}),
        ));
        assert_eq!(ctx.store().len(), 1);
    }
}
