pub mod config;
pub mod engine;
pub mod filter;
pub mod frequency;
pub mod sampler;
pub mod score;
