// Pipeline stages
pub mod analyzer;
pub mod confidence;
pub mod indicators;
pub mod market_phase;
pub mod prediction;
pub mod risk;
pub mod sentiment;
pub mod signals;
pub mod strategy;

// Dashboard services
pub mod featured_coins;
