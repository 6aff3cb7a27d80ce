use super::broadcast::Broadcast;
use super::collision::{self, MovedHead};
use super::constants::{GAME_CHANNEL, TICK_MS};
use super::grid::Direction;
use super::snake::{Snake, SnakeView};
use crate::protocol::GameEvent;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Ties player identities to snakes and owns the tick driver. All map
/// mutations and the driver's start/stop run under one lock, so the
/// empty-to-non-empty transition can never start two drivers or strand one.
pub struct Registry {
  state: Mutex<RegistryState>,
  broadcast: Arc<dyn Broadcast>,
}

struct RegistryState {
  snakes: HashMap<String, Arc<Snake>>,
  players: HashMap<String, String>,
  ticker: Option<JoinHandle<()>>,
}

impl Registry {
  pub fn new(broadcast: Arc<dyn Broadcast>) -> Self {
    Self {
      state: Mutex::new(RegistryState {
        snakes: HashMap::new(),
        players: HashMap::new(),
        ticker: None,
      }),
      broadcast,
    }
  }

  /// Creates a snake for the player, starts the tick driver if this is the
  /// first snake, and broadcasts the full roster so clients can render
  /// everyone already in the game.
  pub async fn join(self: &Arc<Self>, player_id: &str) {
    let snake = Arc::new(Snake::new());
    let entries = {
      let mut state = self.state.lock().await;
      state
        .players
        .insert(player_id.to_string(), snake.id().to_string());
      state.snakes.insert(snake.id().to_string(), snake);
      if state.ticker.is_none() {
        state.ticker = Some(self.spawn_ticker());
      }
      state.snakes.values().map(|s| s.entry()).collect::<Vec<_>>()
    };
    tracing::debug!(player_id, "player joined");
    self.broadcast.publish(GAME_CHANNEL, GameEvent::Join(entries));
  }

  /// Removes the player's snake; an unknown player is a silent no-op. The
  /// driver is cancelled while the lock is still held when the last snake
  /// goes, so a concurrent join cannot observe a half-stopped driver.
  pub async fn leave(&self, player_id: &str) {
    let snake_id = {
      let mut state = self.state.lock().await;
      let Some(snake_id) = state.players.remove(player_id) else {
        return;
      };
      state.snakes.remove(&snake_id);
      if state.snakes.is_empty() {
        if let Some(ticker) = state.ticker.take() {
          ticker.abort();
        }
      }
      snake_id
    };
    tracing::debug!(player_id, snake_id, "player left");
    self
      .broadcast
      .publish(GAME_CHANNEL, GameEvent::Leave(snake_id));
  }

  /// Unknown players and unparseable direction tokens are ignored.
  pub async fn change_direction(&self, player_id: &str, token: &str) {
    let Some(direction) = Direction::parse(token) else {
      return;
    };
    let snake = {
      let state = self.state.lock().await;
      state
        .players
        .get(player_id)
        .and_then(|snake_id| state.snakes.get(snake_id).cloned())
    };
    if let Some(snake) = snake {
      snake.set_direction(direction);
    }
  }

  /// One simulation step: snapshot every snake, move them all, resolve
  /// collisions batched against the snapshot, then broadcast whichever of the
  /// update/dead/kill events apply. Snakes joining or leaving mid-tick do not
  /// affect this tick's evaluation.
  pub async fn tick(&self) {
    let snakes: Vec<Arc<Snake>> = {
      let state = self.state.lock().await;
      state.snakes.values().cloned().collect()
    };

    let snapshot: Vec<SnakeView> = snakes.iter().map(|snake| snake.view()).collect();
    let moved: Vec<MovedHead> = snakes
      .iter()
      .map(|snake| MovedHead {
        id: snake.id().to_string(),
        head: snake.step(),
      })
      .collect();

    let resolution = collision::resolve(&moved, &snapshot);
    for snake_id in &resolution.dead {
      if let Some(snake) = Self::find(&snakes, snake_id) {
        snake.kill();
      }
    }
    for snake_id in &resolution.rewarded {
      if let Some(snake) = Self::find(&snakes, snake_id) {
        snake.reward();
      }
    }

    let mut updates = Vec::new();
    let mut dead_snakes = Vec::new();
    let mut killer_snakes = Vec::new();
    for (snake, before) in snakes.iter().zip(&snapshot) {
      if let Some(diff) = snake.diff() {
        updates.push(diff);
      }
      if !before.dead && resolution.dead.contains(&before.id) {
        dead_snakes.push(before.id.clone());
      }
      if snake.length() > before.length {
        killer_snakes.push(before.id.clone());
      }
    }

    if !updates.is_empty() {
      self
        .broadcast
        .publish(GAME_CHANNEL, GameEvent::Update(updates));
    }
    if !dead_snakes.is_empty() {
      self.broadcast.publish(GAME_CHANNEL, GameEvent::Dead);
    }
    if !killer_snakes.is_empty() {
      self.broadcast.publish(GAME_CHANNEL, GameEvent::Kill);
    }
  }

  /// Cancels a running tick driver. Idempotent; used on process shutdown.
  pub async fn shutdown(&self) {
    let mut state = self.state.lock().await;
    if let Some(ticker) = state.ticker.take() {
      ticker.abort();
    }
  }

  fn find<'a>(snakes: &'a [Arc<Snake>], snake_id: &str) -> Option<&'a Arc<Snake>> {
    snakes.iter().find(|snake| snake.id() == snake_id)
  }

  fn spawn_ticker(self: &Arc<Self>) -> JoinHandle<()> {
    let registry = Arc::clone(self);
    tokio::spawn(async move {
      let period = Duration::from_millis(TICK_MS);
      let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
      // Fixed-delay discipline: a slow tick pushes the next one out instead
      // of triggering a catch-up burst.
      interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
      loop {
        interval.tick().await;
        registry.tick().await;
      }
    })
  }
}
