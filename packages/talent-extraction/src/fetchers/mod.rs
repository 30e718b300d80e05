//! Fetcher implementations.
//!
//! - `SimulatedFetcher` - latency plus deterministic synthetic content
//! - `MockFetcher` - canned sources and injected failures for tests

pub mod mock;
pub mod simulated;

pub use mock::MockFetcher;
pub use simulated::SimulatedFetcher;
