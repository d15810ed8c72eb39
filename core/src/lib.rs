//! tagdraw-core — Monte Carlo simulator for the Nevada bonus-point
//! tag draw.
//!
//! Given a pool of applicants bucketed by bonus-point level and a
//! fixed quota of tags, the simulator estimates the probability that
//! an applicant holding a specific bonus-point value is drawn, by
//! replaying the draw mechanic over many randomized trials.
//!
//! RULES:
//!   - All randomness flows through a `UniformSource`. Nothing in the
//!     simulation calls a platform RNG directly.
//!   - A seeded run is bit-reproducible across platforms and runs.
//!   - Degenerate inputs resolve by policy, never by panic or error.

pub mod error;
pub mod request;
pub mod rng;
pub mod score;
pub mod simulator;
pub mod types;
