//! Shared primitive types used across the simulator.

/// A bonus-point level. Accumulated one per unsuccessful season.
pub type BonusPoints = u32;

/// Number of trials in one simulation batch.
pub type TrialCount = u64;

/// Master seed for a reproducible run.
pub type Seed = u64;
