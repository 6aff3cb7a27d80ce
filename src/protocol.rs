use crate::game::grid::Position;
use serde::Serialize;

/// One outbound event on the game channel. Serialized shape is part of the
/// client contract: `{"event":"...","data":...}`, with `data` omitted for the
/// tag-only `dead` and `kill` events.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum GameEvent {
  Join(Vec<SnakeEntry>),
  Leave(String),
  Update(Vec<SnakeDiff>),
  Dead,
  Kill,
}

/// Full description of one snake, sent when a player joins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnakeEntry {
  pub id: String,
  pub color: String,
  pub body: Vec<Position>,
}

/// Incremental update for a snake whose head moved since the last diff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnakeDiff {
  pub id: String,
  pub body: Vec<Position>,
}
