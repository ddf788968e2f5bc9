pub mod app;
pub mod cli;
pub mod config;
pub mod events;
pub mod loader;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod utils;
pub mod view;

#[cfg(test)]
mod tests;
