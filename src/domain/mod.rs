// Analysis result entities
pub mod analysis;

// Domain-specific error types
pub mod errors;

// Port interfaces
pub mod ports;

// Market data and news value objects
pub mod types;
