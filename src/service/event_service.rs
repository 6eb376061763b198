// service/event_service.rs
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Notifications emitted after a workflow commits. Consumers subscribe for
/// side effects (notifications, audit feeds); publishing never blocks or
/// fails the originating request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    BidAccepted {
        job_id: Uuid,
        bid_id: Uuid,
        provider_id: Uuid,
    },
    JobAssigned {
        job_id: Uuid,
        customer_id: Uuid,
        provider_id: Uuid,
    },
    JobCompleted {
        job_id: Uuid,
        customer_id: Uuid,
        provider_id: Uuid,
    },
}

#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        EventPublisher { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }

    /// Fire-and-forget: a send error only means nobody is listening.
    pub fn publish(&self, event: DomainEvent) {
        tracing::debug!(?event, "publishing domain event");
        let _ = self.sender.send(event);
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        EventPublisher::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let publisher = EventPublisher::new(8);
        let mut rx = publisher.subscribe();

        let event = DomainEvent::JobAssigned {
            job_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
        };
        publisher.publish(event.clone());

        let received = rx.recv().await.unwrap();
        assert_eq!(received, event);
    }

    #[test]
    fn publishing_without_subscribers_does_not_panic() {
        let publisher = EventPublisher::new(8);
        publisher.publish(DomainEvent::BidAccepted {
            job_id: Uuid::new_v4(),
            bid_id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
        });
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let event = DomainEvent::JobCompleted {
            job_id: Uuid::nil(),
            customer_id: Uuid::nil(),
            provider_id: Uuid::nil(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "job_completed");
    }
}
