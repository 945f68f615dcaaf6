//! Event types for the TutorTrack event system
//!
//! Provides shared event definitions and the EventBus used by the
//! recording-ingest service.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// TutorTrack event types
///
/// Events are broadcast via EventBus and can be serialized for SSE
/// transmission. All events carry a UTC timestamp so clients can order
/// them independently of delivery time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum IngestEvent {
    /// Resolution pass started
    ///
    /// Triggers:
    /// - SSE: Show resolution progress UI
    ResolveStarted {
        /// Resolution session UUID
        session_id: Uuid,
        /// Number of recordings submitted
        recording_count: usize,
        /// When the pass started
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// One recording resolved to a week
    ///
    /// Emitted per recording during a resolution pass.
    ///
    /// Triggers:
    /// - SSE: Update per-recording progress rows
    WeekInferred {
        /// Resolution session UUID
        session_id: Uuid,
        /// Recording key (primary id or synthetic)
        recording_key: String,
        /// Inferred program week (1-52)
        week: u8,
        /// Inference confidence on the cascade scale
        confidence: f32,
        /// Inference method name
        method: String,
        /// When the inference was made
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Resolution pass completed successfully
    ///
    /// Triggers:
    /// - SSE: Show completion notification
    ResolveCompleted {
        /// Resolution session UUID
        session_id: Uuid,
        /// Number of recordings resolved
        recordings_processed: usize,
        /// Pass duration in milliseconds
        duration_ms: u64,
        /// When the pass completed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Resolution pass failed
    ///
    /// Triggers:
    /// - SSE: Show error notification
    ResolveFailed {
        /// Resolution session UUID
        session_id: Uuid,
        /// Error message details
        error_message: String,
        /// Recordings resolved before the failure
        recordings_processed: usize,
        /// When the pass failed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Reconciliation pass completed
    ///
    /// Triggers:
    /// - SSE: Show reconciliation summary
    ReconcileCompleted {
        /// Reconciliation session UUID
        session_id: Uuid,
        /// Exact identity matches
        exact_matches: usize,
        /// High-confidence fuzzy matches
        fuzzy_matches: usize,
        /// Low-confidence candidates needing review
        possible_matches: usize,
        /// Recordings with no counterpart
        not_found: usize,
        /// Match rate percentage (0.0-100.0)
        match_rate: f32,
        /// When the pass completed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Database error occurred
    ///
    /// Triggers:
    /// - Error logging
    /// - SSE: Show error notification
    DatabaseError {
        /// Database operation that failed
        operation: String,
        /// Error message
        error: String,
        /// When error occurred
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl IngestEvent {
    /// Get event type as string for filtering
    pub fn event_type(&self) -> &str {
        match self {
            IngestEvent::ResolveStarted { .. } => "ResolveStarted",
            IngestEvent::WeekInferred { .. } => "WeekInferred",
            IngestEvent::ResolveCompleted { .. } => "ResolveCompleted",
            IngestEvent::ResolveFailed { .. } => "ResolveFailed",
            IngestEvent::ReconcileCompleted { .. } => "ReconcileCompleted",
            IngestEvent::DatabaseError { .. } => "DatabaseError",
        }
    }
}

// ========================================
// EventBus Implementation
// ========================================

/// Central event distribution bus for application-wide events
///
/// The EventBus uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
/// - Lagged message detection for slow subscribers
///
/// # Examples
///
/// ```
/// use tutortrack_common::events::{EventBus, IngestEvent};
/// use uuid::Uuid;
///
/// let event_bus = EventBus::new(100);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit(IngestEvent::ResolveStarted {
///     session_id: Uuid::new_v4(),
///     recording_count: 12,
///     timestamp: chrono::Utc::now(),
/// }).ok();
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<IngestEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of events to buffer before dropping old events
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Returns a receiver that will receive all events emitted after
    /// subscription. Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<IngestEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: IngestEvent,
    ) -> Result<usize, broadcast::error::SendError<IngestEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// Useful for progress events where it is acceptable if no client is
    /// currently connected.
    pub fn emit_lossy(&self, event: IngestEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> IngestEvent {
        IngestEvent::ResolveStarted {
            session_id: Uuid::new_v4(),
            recording_count: 3,
            timestamp: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_eventbus_new() {
        let bus = EventBus::new(100);
        assert_eq!(bus.capacity(), 100);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_eventbus_subscribe() {
        let bus = EventBus::new(10);
        let _rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        let _rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[test]
    fn test_eventbus_emit() {
        let bus = EventBus::new(10);
        let mut rx = bus.subscribe();

        bus.emit(sample_event()).expect("emit should succeed");

        let received = rx.try_recv().expect("Should receive event");
        assert_eq!(received.event_type(), "ResolveStarted");
    }

    #[test]
    fn test_eventbus_emit_lossy_never_panics_when_full() {
        let bus = EventBus::new(2);
        let mut _rx = bus.subscribe(); // Subscribe but don't receive

        for _ in 0..10 {
            bus.emit_lossy(sample_event());
        }

        assert_eq!(bus.capacity(), 2);
    }

    #[test]
    fn test_eventbus_multiple_subscribers() {
        let bus = EventBus::new(10);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        assert_eq!(bus.subscriber_count(), 2);

        bus.emit(sample_event()).expect("emit should succeed");

        assert_eq!(rx1.try_recv().unwrap().event_type(), "ResolveStarted");
        assert_eq!(rx2.try_recv().unwrap().event_type(), "ResolveStarted");
    }

    #[test]
    fn test_event_serialization_tags_type() {
        let event = IngestEvent::WeekInferred {
            session_id: Uuid::new_v4(),
            recording_key: "rec-001".to_string(),
            week: 4,
            confidence: 90.0,
            method: "interpolation".to_string(),
            timestamp: chrono::Utc::now(),
        };

        let json = serde_json::to_string(&event).expect("serialization should succeed");
        assert!(json.contains("\"type\":\"WeekInferred\""));
        assert!(json.contains("\"week\":4"));

        let back: IngestEvent = serde_json::from_str(&json).expect("deserialization should succeed");
        assert_eq!(back.event_type(), "WeekInferred");
    }

    #[test]
    fn test_event_type_method() {
        let events = vec![
            (sample_event(), "ResolveStarted"),
            (
                IngestEvent::ReconcileCompleted {
                    session_id: Uuid::new_v4(),
                    exact_matches: 5,
                    fuzzy_matches: 2,
                    possible_matches: 1,
                    not_found: 0,
                    match_rate: 87.5,
                    timestamp: chrono::Utc::now(),
                },
                "ReconcileCompleted",
            ),
            (
                IngestEvent::DatabaseError {
                    operation: "insert_ledger_row".to_string(),
                    error: "database is locked".to_string(),
                    timestamp: chrono::Utc::now(),
                },
                "DatabaseError",
            ),
        ];

        for (event, expected_type) in events {
            assert_eq!(event.event_type(), expected_type);
        }
    }
}
