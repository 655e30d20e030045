//! Minimal scan-point cover: coverage matrix, greedy set cover, repair and the engine around them.
pub mod cache;
pub mod config;
pub mod coverage;
pub mod engine;
pub mod events;
pub mod greedy;
pub mod repair;
