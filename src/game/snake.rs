use super::constants::DEFAULT_LENGTH;
use super::grid::{self, Direction, Position};
use crate::protocol::{SnakeDiff, SnakeEntry};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// One player's body in the simulation. Identity and color are fixed at
/// creation; everything that moves lives behind a single per-snake mutex so a
/// direction change arriving from a request task cannot interleave with the
/// tick loop mid-update.
#[derive(Debug)]
pub struct Snake {
  id: String,
  color: String,
  state: Mutex<SnakeState>,
}

#[derive(Debug)]
struct SnakeState {
  direction: Direction,
  length: usize,
  head: Position,
  last_head: Option<Position>,
  body: VecDeque<Position>,
}

/// Point-in-time view of a snake, captured once at the start of a tick and
/// used for that tick's whole collision evaluation.
#[derive(Debug, Clone)]
pub struct SnakeView {
  pub id: String,
  pub head: Position,
  pub tail: Vec<Position>,
  pub dead: bool,
  pub length: usize,
}

impl Snake {
  /// A new snake spawns dead (direction `None`) at a random grid position and
  /// only starts moving once the player sets a direction.
  pub fn new() -> Self {
    Self {
      id: Uuid::new_v4().to_string(),
      color: grid::random_color(),
      state: Mutex::new(SnakeState {
        direction: Direction::None,
        length: DEFAULT_LENGTH,
        head: grid::random_position(),
        last_head: None,
        body: VecDeque::new(),
      }),
    }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn color(&self) -> &str {
    &self.color
  }

  fn state(&self) -> MutexGuard<'_, SnakeState> {
    self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  /// Unconditional: there is deliberately no guard against reversing into
  /// one's own neck, matching observable gameplay.
  pub fn set_direction(&self, direction: Direction) {
    self.state().direction = direction;
  }

  /// Movement phase of one tick. A dead snake stays put; a live snake pushes
  /// its old head onto the body, trims the body to `length`, and takes one
  /// grid step. Returns the post-move head for collision evaluation.
  pub fn step(&self) -> Position {
    let mut state = self.state();
    if state.direction != Direction::None {
      let next = grid::advance(state.head, state.direction);
      let old_head = state.head;
      state.body.push_front(old_head);
      let length = state.length;
      state.body.truncate(length);
      state.head = next;
    }
    state.head
  }

  /// Resets to the unspawned state at a fresh random position. Length is kept:
  /// earned growth survives death.
  pub fn kill(&self) {
    let mut state = self.state();
    state.direction = Direction::None;
    state.head = grid::random_position();
    state.body.clear();
    tracing::debug!(snake_id = %self.id, "snake killed, resetting state");
  }

  /// Credits one kill; the tail catches up to the new length over the
  /// following ticks.
  pub fn reward(&self) {
    self.state().length += 1;
  }

  pub fn is_dead(&self) -> bool {
    self.state().direction == Direction::None
  }

  pub fn length(&self) -> usize {
    self.state().length
  }

  /// Test constructor with a deterministic spawn point.
  #[cfg(test)]
  pub fn with_head(head: Position) -> Self {
    let snake = Self::new();
    snake.state().head = head;
    snake
  }

  pub fn view(&self) -> SnakeView {
    let state = self.state();
    SnakeView {
      id: self.id.clone(),
      head: state.head,
      tail: state.body.iter().copied().collect(),
      dead: state.direction == Direction::None,
      length: state.length,
    }
  }

  /// Edge-triggered diff: yields the body only when the head differs from the
  /// head recorded at the last emitted diff, so idle snakes produce no
  /// broadcast traffic.
  pub fn diff(&self) -> Option<SnakeDiff> {
    let mut state = self.state();
    if state.last_head == Some(state.head) {
      return None;
    }
    state.last_head = Some(state.head);
    Some(SnakeDiff {
      id: self.id.clone(),
      body: Self::locations(&state),
    })
  }

  /// Full entry for join broadcasts: id, color, and body head-first.
  pub fn entry(&self) -> SnakeEntry {
    let state = self.state();
    SnakeEntry {
      id: self.id.clone(),
      color: self.color.clone(),
      body: Self::locations(&state),
    }
  }

  fn locations(state: &SnakeState) -> Vec<Position> {
    let mut body = Vec::with_capacity(1 + state.body.len());
    body.push(state.head);
    body.extend(state.body.iter().copied());
    body
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::game::constants::GRID_SIZE;

  #[test]
  fn fresh_snake_is_unspawned_with_aligned_head() {
    let snake = Snake::new();
    assert!(snake.is_dead());
    let view = snake.view();
    assert!(view.tail.is_empty());
    assert_eq!(view.length, DEFAULT_LENGTH);
    assert_eq!(view.head.x % GRID_SIZE, 0);
    assert_eq!(view.head.y % GRID_SIZE, 0);
  }

  #[test]
  fn step_without_direction_does_not_move() {
    let snake = Snake::new();
    let before = snake.view().head;
    assert_eq!(snake.step(), before);
    assert!(snake.view().tail.is_empty());
  }

  #[test]
  fn step_moves_head_and_pushes_old_head_onto_body() {
    let snake = Snake::new();
    snake.set_direction(Direction::East);
    assert!(!snake.is_dead());
    let before = snake.view().head;
    let after = snake.step();
    assert_ne!(after, before);
    assert_eq!(snake.view().tail, vec![before]);
  }

  #[test]
  fn body_never_exceeds_length() {
    let snake = Snake::new();
    snake.set_direction(Direction::South);
    for _ in 0..20 {
      snake.step();
      let view = snake.view();
      assert!(view.tail.len() <= view.length);
    }
    assert_eq!(snake.view().tail.len(), DEFAULT_LENGTH);

    snake.reward();
    for _ in 0..5 {
      snake.step();
    }
    let view = snake.view();
    assert_eq!(view.length, DEFAULT_LENGTH + 1);
    assert_eq!(view.tail.len(), DEFAULT_LENGTH + 1);
  }

  #[test]
  fn kill_resets_position_but_keeps_length() {
    let snake = Snake::new();
    snake.set_direction(Direction::West);
    snake.reward();
    for _ in 0..3 {
      snake.step();
    }
    snake.kill();
    assert!(snake.is_dead());
    let view = snake.view();
    assert!(view.tail.is_empty());
    assert_eq!(view.length, DEFAULT_LENGTH + 1);
  }

  #[test]
  fn diff_is_edge_triggered_on_head_movement() {
    let snake = Snake::new();
    // The first diff always fires: nothing has been emitted yet.
    assert!(snake.diff().is_some());
    assert!(snake.diff().is_none());

    snake.set_direction(Direction::North);
    snake.step();
    let diff = snake.diff().expect("head moved");
    assert_eq!(diff.id, snake.id());
    assert_eq!(diff.body.len(), 2);
    assert_eq!(diff.body[0], snake.view().head);

    // No movement between ticks, no diff.
    assert!(snake.diff().is_none());
  }
}
