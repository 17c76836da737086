//! Lag Recovery Example
//!
//! Demonstrates how to:
//! 1. Build two unevenly sampled light curves with a known delay
//! 2. Configure the engine from the environment
//! 3. Sweep a lag grid and locate the correlation peak
//!
//! Run with: `RUST_LOG=miccf=debug cargo run --example shift_recovery`

use miccf::{CcfConfig, CcfEngine, LagSet, LightCurve};
use tracing_subscriber::EnvFilter;

fn flare(t: f64) -> f64 {
    10.0 + 4.0 * (-(t - 60.0).powi(2) / 72.0).exp() + 1.5 * (-(t - 110.0).powi(2) / 30.0).exp()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    println!("📈 Lag Recovery Example\n");

    let delay = 12.5;

    // Continuum: roughly daily with jitter
    let continuum_times: Vec<f64> = (0..160)
        .map(|k| k as f64 + 0.35 * (k as f64 * 2.3).sin())
        .collect();
    let continuum_flux: Vec<f64> = continuum_times.iter().map(|&t| flare(t)).collect();

    // Emission line: sparser sampling, responds `delay` days later
    let line_times: Vec<f64> = (0..70)
        .map(|k| 2.0 + 2.2 * k as f64 + 0.5 * (k as f64 * 0.9).cos())
        .collect();
    let line_flux: Vec<f64> = line_times.iter().map(|&t| 0.6 * flare(t - delay)).collect();

    let continuum = LightCurve::new(continuum_times, continuum_flux)?;
    let line = LightCurve::new(line_times, line_flux)?;

    println!("🔭 Continuum: {} epochs", continuum.len());
    println!("🔭 Line:      {} epochs", line.len());
    println!("⏱  True delay: {:.2} days\n", delay);

    let config = CcfConfig::from_env();
    println!("⚙️  Execution: {:?} (threshold {})", config.execution, config.parallel_threshold);

    let lags = LagSet::from_range(-30.0, 30.0, 0.25)?;
    let engine = CcfEngine::new(config);
    let curve = engine.compute(&continuum, &line, &lags);

    let defined = curve.iter().filter(|point| point.is_defined()).count();
    println!("   ✓ {} lags swept, {} defined\n", curve.len(), defined);

    println!("📊 Correlation around the peak:");
    for point in curve.iter().filter(|point| (point.lag - delay).abs() <= 2.0) {
        match point.value {
            Some(value) => println!("   τ = {:>6.2}  r = {:.4}  (n = {})", point.lag, value, point.n_valid),
            None => println!("   τ = {:>6.2}  undefined", point.lag),
        }
    }

    match curve.peak() {
        Some(peak) => println!(
            "\n✅ Peak at τ = {:.2} days (r = {:.4})",
            peak.lag,
            peak.value.unwrap_or(f64::NAN)
        ),
        None => println!("\n⚠️  No defined lag in the sweep"),
    }

    Ok(())
}
