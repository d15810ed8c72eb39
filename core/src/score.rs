//! The draw-score mechanic.
//!
//! RULE: an applicant holding `bp` bonus points draws `bp² + 1`
//! independent uniforms from [0, 1) and keeps the minimum. Lower
//! score wins. BP 0 gets exactly one draw; every additional point
//! adds draws, each one lowering the expected minimum. This is how
//! bonus points improve the odds without guaranteeing a tag.

use crate::{rng::UniformSource, types::BonusPoints};

/// Score one applicant. Pure function of `(bp, source)` — consumes
/// exactly `bp² + 1` values from the source, no hidden state.
pub fn draw_score(bp: BonusPoints, source: &mut dyn UniformSource) -> f64 {
    let draws = u64::from(bp) * u64::from(bp) + 1;
    let mut best = source.next_uniform();
    for _ in 1..draws {
        let u = source.next_uniform();
        if u < best {
            best = u;
        }
    }
    best
}
