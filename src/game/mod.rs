pub mod broadcast;
pub mod collision;
pub mod constants;
pub mod grid;
pub mod registry;
pub mod snake;
