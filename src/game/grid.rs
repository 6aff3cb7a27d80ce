use super::constants::{GRID_SIZE, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
  pub x: i32,
  pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
  None,
  North,
  South,
  East,
  West,
}

impl Direction {
  pub fn parse(token: &str) -> Option<Self> {
    match token {
      "north" => Some(Direction::North),
      "south" => Some(Direction::South),
      "east" => Some(Direction::East),
      "west" => Some(Direction::West),
      _ => None,
    }
  }
}

/// One grid step along the direction's axis, wrapping at the playfield edges.
/// The wrap intentionally clamps to the opposite boundary value instead of
/// taking a modulus: the literal coordinates 640 and 480 stay reachable for
/// one step, and clients render them as the seam position.
pub fn advance(position: Position, direction: Direction) -> Position {
  let mut next = match direction {
    Direction::None => return position,
    Direction::North => Position {
      x: position.x,
      y: position.y - GRID_SIZE,
    },
    Direction::South => Position {
      x: position.x,
      y: position.y + GRID_SIZE,
    },
    Direction::East => Position {
      x: position.x + GRID_SIZE,
      y: position.y,
    },
    Direction::West => Position {
      x: position.x - GRID_SIZE,
      y: position.y,
    },
  };
  if next.x >= PLAYFIELD_WIDTH {
    next.x = 0;
  }
  if next.y >= PLAYFIELD_HEIGHT {
    next.y = 0;
  }
  if next.x < 0 {
    next.x = PLAYFIELD_WIDTH;
  }
  if next.y < 0 {
    next.y = PLAYFIELD_HEIGHT;
  }
  next
}

pub fn random_position() -> Position {
  let mut rng = rand::thread_rng();
  Position {
    x: round_to_grid(rng.gen_range(0..PLAYFIELD_WIDTH)),
    y: round_to_grid(rng.gen_range(0..PLAYFIELD_HEIGHT)),
  }
}

// Round-half-up to the nearest grid multiple.
fn round_to_grid(value: i32) -> i32 {
  (value + GRID_SIZE / 2) / GRID_SIZE * GRID_SIZE
}

/// Pastel display color: random hue, low saturation, high brightness.
pub fn random_color() -> String {
  let mut rng = rand::thread_rng();
  let hue = rng.gen::<f32>();
  let saturation = rng.gen_range(0.1..0.3);
  let (r, g, b) = hsb_to_rgb(hue, saturation, 0.9);
  format!("#{r:02x}{g:02x}{b:02x}")
}

fn hsb_to_rgb(hue: f32, saturation: f32, brightness: f32) -> (u8, u8, u8) {
  let h = (hue - hue.floor()) * 6.0;
  let f = h - h.floor();
  let p = brightness * (1.0 - saturation);
  let q = brightness * (1.0 - saturation * f);
  let t = brightness * (1.0 - saturation * (1.0 - f));
  let (r, g, b) = match h as i32 {
    0 => (brightness, t, p),
    1 => (q, brightness, p),
    2 => (p, brightness, t),
    3 => (p, q, brightness),
    4 => (t, p, brightness),
    _ => (brightness, p, q),
  };
  (
    (r * 255.0 + 0.5) as u8,
    (g * 255.0 + 0.5) as u8,
    (b * 255.0 + 0.5) as u8,
  )
}
