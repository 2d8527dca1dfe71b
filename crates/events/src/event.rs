use chrono::{DateTime, Utc};

/// Notification that the domain state changed.
///
/// Events are facts: once published they are never edited. Subscribers use
/// them to decide what to re-render.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Dotted name, e.g. `"inventory.item.restocked"`.
    fn event_type(&self) -> &'static str;

    /// Payload schema version of this event type.
    fn version(&self) -> u32;

    /// When the change was applied.
    fn occurred_at(&self) -> DateTime<Utc>;
}
