//! synchroscope CLI - headless session driver.
//!
//! Runs a scripted synchroscope session without a renderer: ticks the
//! engine at the configured cadence, prints a per-second readout, then
//! issues a breaker-close command and reports its outcome.

use std::process::ExitCode;
use std::time::Duration;

use synchroscope::prelude::*;

fn print_readout(snap: &ScopeSnapshot) {
    let lights = format!(
        "[{}|{}|{}]",
        if snap.zones.within_5 { "5" } else { "-" },
        if snap.zones.within_10 { "10" } else { "--" },
        if snap.zones.within_20 { "20" } else { "--" },
    );
    println!(
        "t={:>6} | Grid: {:.2} Hz | Gen: {:.2} Hz | \u{394}f = {:+.2} Hz | \
         Phase: {:5.1}\u{b0} | {} | {}",
        snap.elapsed.to_string(),
        snap.grid_freq_hz,
        snap.gen_freq_hz,
        snap.phase.freq_diff_hz,
        snap.phase.phase_deg,
        lights,
        snap.phase.direction,
    );

    if !snap.rotations.is_empty() {
        let times: Vec<String> = snap.rotations.iter().map(|t| format!("{t:.2}")).collect();
        println!("         full rotation at t(s): {}", times.join(", "));
    }
}

fn run() -> SyncResult<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => ScopeConfig::load(path)?,
        None => ScopeConfig::default(),
    };

    let interval = Duration::from_secs_f64(config.tick.interval_ms / 1000.0);
    let frames_per_second = (1000.0 / config.tick.interval_ms).round() as u64;
    let scope = Synchroscope::new(config)?;

    println!("synchroscope v{}", env!("CARGO_PKG_VERSION"));
    println!("running 10 s of simulated time, then closing the breaker");
    println!();

    for frame in 0..=frames_per_second * 10 {
        let snap = scope.tick(frame);
        if frame % frames_per_second == 0 {
            print_readout(&snap);
        }
    }

    let closing_ms = scope.snapshot().closing.closing_time_ms;
    println!();
    println!("issuing breaker close command ({closing_ms:.0} ms closing time)");
    scope.apply(OperatorCommand::CloseBreaker)?;

    // The delay runs on wall-clock time; give it a margin to fire.
    std::thread::sleep(Duration::from_secs_f64(closing_ms / 1000.0) + interval);

    let snap = scope.snapshot();
    match snap.breaker.map(|cmd| cmd.outcome) {
        Some(CommandOutcome::Success) => {
            println!("breaker closed in sync (phase error {:.1}\u{b0})", snap.phase.phase_error_deg);
        }
        Some(CommandOutcome::Failure) => {
            println!(
                "breaker closed OUT of sync (phase error {:.1}\u{b0})",
                snap.phase.phase_error_deg
            );
        }
        _ => println!("breaker command did not resolve"),
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
