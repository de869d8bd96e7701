use bevy::app::App;
use bevy::log::{Level, LogPlugin};
use clap::Parser;
use orbitchaos::cli::{Args, format_summary, format_sweep, load_and_apply_config};
use orbitchaos::plugins::{ChaosStudyPlugin, StudyOutcome, SweepOutcome};
use orbitchaos::study::write_results;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_and_apply_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut app = App::new();
    app.add_plugins((
        LogPlugin {
            level: if args.verbose {
                Level::DEBUG
            } else {
                Level::INFO
            },
            ..Default::default()
        },
        ChaosStudyPlugin::new(config).with_mass_ratios(args.mass_ratios.clone()),
    ));

    // Startup systems run the whole study on the first update
    app.update();

    let world = app.world_mut();
    let Some(StudyOutcome(outcome)) = world.remove_resource::<StudyOutcome>() else {
        eprintln!("Error: study did not run");
        return ExitCode::FAILURE;
    };

    let output = match outcome {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("{}", format_summary(&output.report));

    if let Some(SweepOutcome(sweep)) = world.remove_resource::<SweepOutcome>() {
        match sweep {
            Ok(points) => println!("\n{}", format_sweep(&points)),
            Err(e) => {
                eprintln!("Error: mass-ratio sweep failed: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    if let Some(directory) = &args.output {
        match write_results(&output, directory) {
            Ok(paths) => {
                for path in paths {
                    println!("Wrote {}", path.display());
                }
            }
            Err(e) => {
                eprintln!("Error: failed to write results: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
