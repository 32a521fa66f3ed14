//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound fetch:
//!     → deadline enforced by the HTTP client (fetch.timeout_secs)
//!     → On transient failure: retries.rs (check policy, sleep with backoff)
//!     → backoff.rs (exponential delay with jitter)
//! ```
//!
//! # Design Decisions
//! - Every outbound fetch has a deadline
//! - Only network failures are retried; origin statuses are mirrored as-is
//! - Retries are off by default: one attempt per proxied resource

pub mod backoff;
pub mod retries;

pub use retries::RetryPolicy;
