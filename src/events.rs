use std::sync::Arc;

/// Pool lifecycle events a caller can subscribe to through `on`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolEventKind {
    /// A connection was handed to a caller.
    Acquire,
    /// A new underlying connection was opened.
    Connection,
    /// A request had to wait because the pool was exhausted.
    Enqueue,
    /// A connection was returned to the idle set.
    Release,
}

/// Payload delivered to event listeners.
#[derive(Debug, Clone)]
pub struct PoolEvent {
    pub kind: PoolEventKind,
    /// Driver-assigned id of the connection involved, when there is one.
    pub connection_id: Option<u64>,
}

/// Listener registered through the adapter's `on` pass-through.
///
/// Listeners may be invoked from driver-owned threads; keep them cheap.
pub type EventListener = Arc<dyn Fn(&PoolEvent) + Send + Sync>;
