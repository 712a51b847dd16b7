//! Run ledger detection on a configured sheet and print a summary.
//!
//! Usage: `ledger_demo <config.json>`; see [`glyph_detector::config`] for
//! the expected layout.

use glyph_detector::config::{load_config, RuntimeConfig};
use glyph_detector::io::{load_run_image, write_json_file};
use glyph_detector::{DetectError, LedgerParams, SheetDetector, SheetInput, SystemInput};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let Some(config_path) = std::env::args().nth(1).map(PathBuf::from) else {
        eprintln!("usage: ledger_demo <config.json>");
        return ExitCode::FAILURE;
    };

    match run(&config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ledger_demo: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: &std::path::Path) -> Result<(), DetectError> {
    let config: RuntimeConfig = load_config(config_path)?;
    let sheet = load_run_image(&config.input_path)?;
    let no_staff = match &config.no_staff_path {
        Some(path) => load_run_image(path)?,
        None => sheet.clone(),
    };

    let systems = config
        .systems
        .into_iter()
        .map(|geometry| SystemInput {
            geometry,
            // Without an upstream partitioner every unit sees the whole
            // sheet; the per-staff regions narrow the search anyway.
            sections: sheet.clone(),
            no_staff: no_staff.clone(),
        })
        .collect();

    let params: LedgerParams = config.params;
    let detector = SheetDetector::new(params);
    let outcome = detector.detect(SheetInput {
        scale: config.scale,
        systems,
    });

    println!(
        "systems={} ledgers={} glyphs={} latency={:.1} ms",
        outcome.systems.len(),
        outcome.report.ledger_count(),
        outcome.report.registered_glyphs,
        outcome.report.latency_ms
    );
    for system in &outcome.report.systems {
        for staves in &system.staves {
            for line in &staves.lines {
                println!(
                    "  system#{} staff#{} line {:+}: tried={} graded={} accepted={}",
                    system.system, staves.staff, line.index, line.tried, line.graded, line.accepted
                );
            }
        }
    }

    if let Some(json_out) = &config.output.json_out {
        write_json_file(&outcome.report, json_out)?;
        println!("report written to {}", json_out.display());
    }
    Ok(())
}
