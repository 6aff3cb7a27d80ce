pub const PLAYFIELD_WIDTH: i32 = 640;
pub const PLAYFIELD_HEIGHT: i32 = 480;
pub const GRID_SIZE: i32 = 10;
pub const DEFAULT_LENGTH: usize = 5;
pub const TICK_MS: u64 = 100;
pub const GAME_CHANNEL: &str = "snake";
