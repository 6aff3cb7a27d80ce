use crate::protocol::GameEvent;

/// Outbound fan-out seam. Implementations deliver the event to every
/// subscriber of the channel with best-effort semantics: they must not block
/// the caller, and failures are theirs to log, never to surface.
pub trait Broadcast: Send + Sync {
  fn publish(&self, channel: &str, event: GameEvent);
}
