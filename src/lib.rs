pub mod app;
pub mod cli;
pub mod render;
pub mod storage;
pub mod store;
pub mod terminal;
pub mod types;
pub mod utils;
pub mod workout;
