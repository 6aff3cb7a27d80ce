use super::grid::Position;
use super::snake::SnakeView;
use std::collections::HashSet;

/// A snake's post-move head position for the current tick.
#[derive(Debug, Clone)]
pub struct MovedHead {
  pub id: String,
  pub head: Position,
}

/// Deaths and kill credits for one tick, applied batched after every snake
/// has moved.
#[derive(Debug, Default)]
pub struct Resolution {
  pub dead: Vec<String>,
  pub rewarded: Vec<String>,
}

/// Evaluates every moved snake against the start-of-tick snapshot.
///
/// A snake dies when its new head lands on another snake's head, or anywhere
/// in any tail from the snapshot (its own tail included, which is what
/// catches self-collision). A counterpart is credited one reward per victim
/// it killed, unless it is itself dying this tick or is the victim.
pub fn resolve(moved: &[MovedHead], snapshot: &[SnakeView]) -> Resolution {
  let mut dying: HashSet<&str> = HashSet::new();
  for snake in moved {
    for other in snapshot {
      let head_collision = other.id != snake.id && other.head == snake.head;
      let tail_collision = other.tail.contains(&snake.head);
      if head_collision || tail_collision {
        dying.insert(snake.id.as_str());
        break;
      }
    }
  }

  let mut resolution = Resolution::default();
  for snake in moved {
    if !dying.contains(snake.id.as_str()) {
      continue;
    }
    resolution.dead.push(snake.id.clone());
    for other in snapshot {
      if other.id == snake.id || dying.contains(other.id.as_str()) {
        continue;
      }
      if other.head == snake.head || other.tail.contains(&snake.head) {
        resolution.rewarded.push(other.id.clone());
      }
    }
  }
  resolution
}

#[cfg(test)]
mod tests {
  use super::*;

  fn view(id: &str, head: Position, tail: &[Position]) -> SnakeView {
    SnakeView {
      id: id.to_string(),
      head,
      tail: tail.to_vec(),
      dead: false,
      length: 5,
    }
  }

  fn moved(id: &str, x: i32, y: i32) -> MovedHead {
    MovedHead {
      id: id.to_string(),
      head: Position { x, y },
    }
  }

  #[test]
  fn no_contact_resolves_to_nothing() {
    let snapshot = vec![
      view("a", Position { x: 0, y: 0 }, &[]),
      view("b", Position { x: 100, y: 100 }, &[]),
    ];
    let resolution = resolve(&[moved("a", 10, 0), moved("b", 110, 100)], &snapshot);
    assert!(resolution.dead.is_empty());
    assert!(resolution.rewarded.is_empty());
  }

  #[test]
  fn head_to_head_kills_both_and_credits_neither() {
    // Adjacent snakes moving toward each other: each new head lands on the
    // other's start-of-tick head.
    let snapshot = vec![
      view("a", Position { x: 100, y: 100 }, &[]),
      view("b", Position { x: 110, y: 100 }, &[]),
    ];
    let resolution = resolve(&[moved("a", 110, 100), moved("b", 100, 100)], &snapshot);
    assert_eq!(resolution.dead, vec!["a".to_string(), "b".to_string()]);
    assert!(resolution.rewarded.is_empty());
  }

  #[test]
  fn tail_collision_kills_the_runner_and_rewards_the_owner() {
    let snapshot = vec![
      view("a", Position { x: 90, y: 100 }, &[]),
      view(
        "b",
        Position { x: 100, y: 130 },
        &[Position { x: 100, y: 110 }, Position { x: 100, y: 120 }],
      ),
    ];
    let resolution = resolve(&[moved("a", 100, 110), moved("b", 100, 140)], &snapshot);
    assert_eq!(resolution.dead, vec!["a".to_string()]);
    assert_eq!(resolution.rewarded, vec!["b".to_string()]);
  }

  #[test]
  fn self_collision_kills_without_credit() {
    let snapshot = vec![view(
      "a",
      Position { x: 100, y: 100 },
      &[Position { x: 110, y: 100 }, Position { x: 120, y: 100 }],
    )];
    let resolution = resolve(&[moved("a", 110, 100)], &snapshot);
    assert_eq!(resolution.dead, vec!["a".to_string()]);
    assert!(resolution.rewarded.is_empty());
  }

  #[test]
  fn dying_counterpart_is_not_credited() {
    // "a" runs into "b"'s tail, but "b" self-collides in the same tick.
    let snapshot = vec![
      view("a", Position { x: 90, y: 100 }, &[]),
      view(
        "b",
        Position { x: 100, y: 120 },
        &[Position { x: 100, y: 110 }, Position { x: 110, y: 120 }],
      ),
    ];
    let resolution = resolve(&[moved("a", 100, 110), moved("b", 110, 120)], &snapshot);
    assert_eq!(resolution.dead, vec!["a".to_string(), "b".to_string()]);
    assert!(resolution.rewarded.is_empty());
  }

  #[test]
  fn stationary_snake_dies_when_sitting_in_a_tail() {
    // A dead snake does not move but its head is still evaluated: an idle
    // snake whose spawn point sits in another tail dies again.
    let snapshot = vec![
      view(
        "a",
        Position { x: 200, y: 200 },
        &[Position { x: 50, y: 50 }],
      ),
      view("b", Position { x: 50, y: 50 }, &[]),
    ];
    let resolution = resolve(&[moved("a", 210, 200), moved("b", 50, 50)], &snapshot);
    assert_eq!(resolution.dead, vec!["b".to_string()]);
    assert_eq!(resolution.rewarded, vec!["a".to_string()]);
  }
}
