//! Simulation request and result value types.
//!
//! Inputs are validated at construction. A field out of range is a
//! `SimError::InvalidField` naming the offending field; nothing is
//! clamped. Degenerate but well-typed values (zero trials, quota
//! larger than the pool) are legal here — the simulator resolves
//! those by policy.

use serde::{Deserialize, Serialize};

use crate::{
    error::{SimError, SimResult},
    types::{BonusPoints, Seed, TrialCount},
};

/// Applicants holding one BP level, for one draw choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BpBucket {
    pub bp: BonusPoints,
    pub applicants: u64,
}

impl BpBucket {
    /// Build a bucket from signed inputs, rejecting out-of-range
    /// values field by field.
    pub fn new(bp: i64, applicants: i64) -> SimResult<Self> {
        if bp < 0 {
            return Err(SimError::InvalidField {
                field: "bp",
                reason: format!("must be non-negative, got {bp}"),
            });
        }
        if bp > i64::from(u32::MAX) {
            return Err(SimError::InvalidField {
                field: "bp",
                reason: format!("exceeds supported maximum, got {bp}"),
            });
        }
        if applicants < 0 {
            return Err(SimError::InvalidField {
                field: "applicants",
                reason: format!("must be non-negative, got {applicants}"),
            });
        }
        Ok(Self {
            bp: bp as BonusPoints,
            applicants: applicants as u64,
        })
    }
}

/// One full simulation request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub pool: Vec<BpBucket>,
    pub quota: i64,
    pub subject_bp: BonusPoints,
    pub trials: TrialCount,
    #[serde(default)]
    pub seed: Option<Seed>,
}

impl SimulationRequest {
    /// Build a request, validating the subject's BP from a signed
    /// input. Pool buckets carry their own validation via
    /// [`BpBucket::new`].
    pub fn new(
        pool: Vec<BpBucket>,
        quota: i64,
        subject_bp: i64,
        trials: TrialCount,
        seed: Option<Seed>,
    ) -> SimResult<Self> {
        if subject_bp < 0 {
            return Err(SimError::InvalidField {
                field: "subject_bp",
                reason: format!("must be non-negative, got {subject_bp}"),
            });
        }
        if subject_bp > i64::from(u32::MAX) {
            return Err(SimError::InvalidField {
                field: "subject_bp",
                reason: format!("exceeds supported maximum, got {subject_bp}"),
            });
        }
        Ok(Self {
            pool,
            quota,
            subject_bp: subject_bp as BonusPoints,
            trials,
            seed,
        })
    }

    /// Total applicants across the pool. Empty buckets contribute
    /// nothing, so they are effectively dropped before simulation.
    pub fn total_applicants(&self) -> u64 {
        self.pool.iter().map(|b| b.applicants).sum()
    }
}

/// Aggregate outcome of one simulation batch. Created once, never
/// mutated afterward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub trials: u64,
    pub wins: u64,
    pub win_rate: f64,
}

impl SimulationResult {
    pub(crate) fn from_counts(trials: u64, wins: u64) -> Self {
        let win_rate = if trials > 0 {
            wins as f64 / trials as f64
        } else {
            0.0
        };
        Self {
            trials,
            wins,
            win_rate,
        }
    }
}
