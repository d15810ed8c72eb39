//! The draw simulator — the heart of tagdraw.
//!
//! One batch replays the draw mechanic `trials` times against a
//! single uniform source and reports the fraction of trials the
//! subject was awarded a tag.
//!
//! RULES:
//!   - Degenerate inputs resolve by policy before any trial runs.
//!     The check order is fixed and never reordered: trials first,
//!     then exhausted quota/pool, then everyone-wins. The order
//!     guarantees the tie path always sees a positive slot count.
//!   - Within a trial the source is consumed pool-first, subject
//!     second, tie-break roll last. Draw order is part of the seeded
//!     reproducibility contract.
//!   - A trial is atomic: cancellation is observed between trials
//!     only and never corrupts the running aggregate.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::{
    request::{SimulationRequest, SimulationResult},
    rng::{DrawRng, UniformSource},
    score::draw_score,
};

/// Outcome of a cancellable batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunOutcome {
    /// Every requested trial completed.
    Complete(SimulationResult),
    /// Canceled between trials; aggregates completed trials only.
    Partial(SimulationResult),
}

impl RunOutcome {
    pub fn result(&self) -> SimulationResult {
        match self {
            Self::Complete(r) | Self::Partial(r) => *r,
        }
    }
}

/// Resolution of the degenerate-input policy for one batch.
enum BatchPlan {
    NoTrials,
    AllLose,
    AllWin,
    Run { quota: usize },
}

/// Apply the degenerate-input policy. Check order is fixed; see the
/// module rules.
fn plan(request: &SimulationRequest) -> BatchPlan {
    if request.trials == 0 {
        return BatchPlan::NoTrials;
    }
    let total = request.total_applicants();
    if request.quota <= 0 || total == 0 {
        return BatchPlan::AllLose;
    }
    if request.quota as u64 >= total {
        return BatchPlan::AllWin;
    }
    BatchPlan::Run {
        quota: request.quota as usize,
    }
}

static NEVER_CANCELED: AtomicBool = AtomicBool::new(false);

/// Runs simulation batches. Owns its score buffer exclusively and
/// reuses it across trials, so a batch allocates once regardless of
/// trial count.
pub struct DrawSimulator {
    scores: Vec<f64>,
}

impl DrawSimulator {
    pub fn new() -> Self {
        Self { scores: Vec::new() }
    }

    /// Run the full batch. A seeded request replays bit-identically;
    /// an unseeded one draws its seed from OS entropy.
    pub fn simulate(&mut self, request: &SimulationRequest) -> SimulationResult {
        let mut rng = Self::source_for(request);
        self.run(request, &mut rng, &NEVER_CANCELED).result()
    }

    /// Run the full batch against a caller-supplied source. This is
    /// the deterministic-testing boundary: a scripted source drives
    /// the simulator value by value.
    pub fn simulate_with_source(
        &mut self,
        request: &SimulationRequest,
        source: &mut dyn UniformSource,
    ) -> SimulationResult {
        self.run(request, source, &NEVER_CANCELED).result()
    }

    /// Run the batch, observing `cancel` between trials. A canceled
    /// batch returns `RunOutcome::Partial` over completed trials only.
    pub fn simulate_cancellable(
        &mut self,
        request: &SimulationRequest,
        cancel: &AtomicBool,
    ) -> RunOutcome {
        let mut rng = Self::source_for(request);
        self.run(request, &mut rng, cancel)
    }

    fn source_for(request: &SimulationRequest) -> DrawRng {
        match request.seed {
            Some(seed) => DrawRng::seeded(seed),
            None => DrawRng::from_entropy(),
        }
    }

    fn run(
        &mut self,
        request: &SimulationRequest,
        source: &mut dyn UniformSource,
        cancel: &AtomicBool,
    ) -> RunOutcome {
        let quota = match plan(request) {
            BatchPlan::NoTrials => {
                log::debug!("batch resolved by policy: no trials requested");
                return RunOutcome::Complete(SimulationResult::from_counts(0, 0));
            }
            BatchPlan::AllLose => {
                log::debug!(
                    "batch resolved by policy: quota {} against pool of {} — all trials lose",
                    request.quota,
                    request.total_applicants()
                );
                return RunOutcome::Complete(SimulationResult::from_counts(request.trials, 0));
            }
            BatchPlan::AllWin => {
                log::debug!(
                    "batch resolved by policy: quota {} covers pool of {} — all trials win",
                    request.quota,
                    request.total_applicants()
                );
                return RunOutcome::Complete(SimulationResult::from_counts(
                    request.trials,
                    request.trials,
                ));
            }
            BatchPlan::Run { quota } => quota,
        };

        let mut wins: u64 = 0;
        let mut completed: u64 = 0;
        for _ in 0..request.trials {
            if cancel.load(Ordering::Relaxed) {
                log::debug!(
                    "batch canceled after {completed} of {} trials",
                    request.trials
                );
                return RunOutcome::Partial(SimulationResult::from_counts(completed, wins));
            }
            if self.trial(request, quota, source) {
                wins += 1;
            }
            completed += 1;
        }

        let result = SimulationResult::from_counts(request.trials, wins);
        log::debug!(
            "batch done: trials={} wins={} win_rate={:.4}",
            result.trials,
            result.wins,
            result.win_rate
        );
        RunOutcome::Complete(result)
    }

    /// One full simulated draw. Returns true if the subject is
    /// awarded a tag.
    fn trial(
        &mut self,
        request: &SimulationRequest,
        quota: usize,
        source: &mut dyn UniformSource,
    ) -> bool {
        self.scores.clear();
        for bucket in &request.pool {
            for _ in 0..bucket.applicants {
                self.scores.push(draw_score(bucket.bp, source));
            }
        }
        // Pool first, subject second — see the module rules.
        let subject = draw_score(request.subject_bp, source);

        self.scores.sort_unstable_by(f64::total_cmp);
        // Worst score still inside the awarded set.
        let cutoff = self.scores[quota - 1];

        if subject < cutoff {
            return true;
        }
        if subject > cutoff {
            return false;
        }

        // Tied exactly at the cutoff (exact float equality — the tie
        // path must survive structural collisions, e.g. many BP-0
        // single draws). `less` scores are safely inside the quota;
        // the subject joins `eq` pool ties contending for the slots
        // still open. One more roll decides proportionally.
        let less = self.scores.partition_point(|s| *s < cutoff);
        let eq = self.scores[less..].partition_point(|s| *s <= cutoff);
        let slots_left = quota - less;
        source.next_uniform() < slots_left as f64 / (eq as f64 + 1.0)
    }
}

impl Default for DrawSimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::BpBucket;
    use crate::rng::ScriptedSource;

    fn request(pool: Vec<(i64, i64)>, quota: i64, subject_bp: i64, trials: u64) -> SimulationRequest {
        let buckets = pool
            .into_iter()
            .map(|(bp, n)| BpBucket::new(bp, n).unwrap())
            .collect();
        SimulationRequest::new(buckets, quota, subject_bp, trials, None).unwrap()
    }

    #[test]
    fn subject_below_cutoff_wins() {
        // Pool of two BP-0 applicants, one tag. Scripted draws:
        // pool 0.4, 0.6; subject 0.2. Cutoff is 0.4, subject is under.
        let req = request(vec![(0, 2)], 1, 0, 1);
        let mut src = ScriptedSource::new(vec![0.4, 0.6, 0.2]);
        let result = DrawSimulator::new().simulate_with_source(&req, &mut src);
        assert_eq!(result.wins, 1);
        assert_eq!(src.remaining(), 0, "no tie-break roll expected");
    }

    #[test]
    fn subject_above_cutoff_loses_without_tiebreak_roll() {
        let req = request(vec![(0, 2)], 1, 0, 1);
        let mut src = ScriptedSource::new(vec![0.4, 0.6, 0.9]);
        let result = DrawSimulator::new().simulate_with_source(&req, &mut src);
        assert_eq!(result.wins, 0);
        assert_eq!(src.remaining(), 0, "no tie-break roll expected");
    }

    #[test]
    fn tie_at_cutoff_consumes_one_extra_roll() {
        // Two pool ties at the cutoff, quota 1: slots_left = 1, the
        // subject is one of 3 contenders, threshold 1/3.
        let req = request(vec![(0, 2)], 1, 0, 2);
        let mut src = ScriptedSource::new(vec![
            0.5, 0.5, 0.5, 0.2, // trial 1: roll 0.2 < 1/3 — win
            0.5, 0.5, 0.5, 0.5, // trial 2: roll 0.5 ≥ 1/3 — loss
        ]);
        let result = DrawSimulator::new().simulate_with_source(&req, &mut src);
        assert_eq!(result.wins, 1);
        assert_eq!(result.trials, 2);
        assert_eq!(src.remaining(), 0);
    }

    #[test]
    fn already_canceled_batch_returns_empty_partial() {
        let req = request(vec![(0, 10)], 2, 0, 1000);
        let cancel = AtomicBool::new(true);
        let outcome = DrawSimulator::new().simulate_cancellable(&req, &cancel);
        match outcome {
            RunOutcome::Partial(result) => {
                assert_eq!(result.trials, 0);
                assert_eq!(result.wins, 0);
                assert_eq!(result.win_rate, 0.0);
            }
            RunOutcome::Complete(_) => panic!("canceled batch reported Complete"),
        }
    }

    #[test]
    fn policy_branches_skip_the_source_entirely() {
        // Everyone-wins and everyone-loses branches never touch the
        // uniform source.
        let mut src = ScriptedSource::new(vec![]);
        let mut sim = DrawSimulator::new();

        let all_win = request(vec![(0, 5)], 5, 0, 10);
        assert_eq!(sim.simulate_with_source(&all_win, &mut src).win_rate, 1.0);

        let all_lose = request(vec![(0, 5)], 0, 0, 10);
        assert_eq!(sim.simulate_with_source(&all_lose, &mut src).win_rate, 0.0);
    }
}
