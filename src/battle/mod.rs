pub mod actions;
pub mod ai;
pub mod calculators;
pub mod context;
pub mod engine;
pub mod history;
pub mod move_processor;
pub mod rng;
pub mod state;
pub mod stats;
pub mod targets;

#[cfg(test)]
mod tests;
