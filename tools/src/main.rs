//! draw-runner: headless odds estimator for the Nevada tag draw.
//!
//! Usage:
//!   draw-runner --pool 0:4300,1:2100,2:950 --quota 66 --bp 2 --trials 100000
//!   draw-runner --pool 0:4300,1:2100 --quota 66 --bp 2 --seed 42
//!   draw-runner --request request.json
//!
//! `--pool` takes `bp:applicants` pairs. `--request` loads a JSON
//! `SimulationRequest` instead. Output is the raw result as one JSON
//! object on stdout — rounding and display belong to the caller.

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use tagdraw_core::{
    request::{BpBucket, SimulationRequest},
    simulator::DrawSimulator,
};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let request = if let Some(path) = find_arg(&args, "--request") {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading request file {path}"))?;
        serde_json::from_str::<SimulationRequest>(&raw)
            .with_context(|| format!("parsing request file {path}"))?
    } else {
        request_from_args(&args)?
    };

    log::info!(
        "simulating {} trials: pool of {} applicants, quota {}, subject BP {}",
        request.trials,
        request.total_applicants(),
        request.quota,
        request.subject_bp
    );

    let mut simulator = DrawSimulator::new();
    let result = simulator.simulate(&request);

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn request_from_args(args: &[String]) -> Result<SimulationRequest> {
    let pool_spec = find_arg(args, "--pool")
        .context("--pool is required (format: bp:applicants,bp:applicants,...)")?;
    let quota: i64 = parse_arg(args, "--quota")?.context("--quota is required")?;
    let subject_bp: i64 = parse_arg(args, "--bp")?.context("--bp is required")?;
    let trials: u64 = parse_arg(args, "--trials")?.unwrap_or(100_000);
    let seed: Option<u64> = parse_arg(args, "--seed")?;

    let pool = parse_pool(pool_spec)?;
    let request = SimulationRequest::new(pool, quota, subject_bp, trials, seed)?;
    Ok(request)
}

fn parse_pool(spec: &str) -> Result<Vec<BpBucket>> {
    let mut pool = Vec::new();
    for entry in spec.split(',').filter(|e| !e.is_empty()) {
        let Some((bp, applicants)) = entry.split_once(':') else {
            bail!("bad pool entry '{entry}': expected bp:applicants");
        };
        let bp: i64 = bp
            .trim()
            .parse()
            .with_context(|| format!("bad BP in pool entry '{entry}'"))?;
        let applicants: i64 = applicants
            .trim()
            .parse()
            .with_context(|| format!("bad applicant count in pool entry '{entry}'"))?;
        pool.push(BpBucket::new(bp, applicants)?);
    }
    Ok(pool)
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match find_arg(args, flag) {
        Some(raw) => {
            let value = raw
                .parse::<T>()
                .with_context(|| format!("bad value for {flag}: '{raw}'"))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}
