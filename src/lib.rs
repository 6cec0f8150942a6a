pub mod app;
pub mod braille;
pub mod cli;
pub mod data;
pub mod engine;
mod hash;
pub mod logging;
pub mod map;
pub mod ui;
