//! Mini-grid sizer entry point: CLI wiring and scenario-driven sizing runs.

use std::path::Path;
use std::process;

use minigrid_sizer::config::ScenarioConfig;
use minigrid_sizer::io::export::export_csv;
use minigrid_sizer::io::import::read_series_csv;
use minigrid_sizer::task::SizingTask;
use tracing::{error, info};

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    series_path: Option<String>,
    seed_override: Option<u64>,
    dispatch_out: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("minigrid-sizer: off-grid PV / battery / diesel / hydro capacity sizing");
    eprintln!();
    eprintln!("Usage: minigrid-sizer [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        ScenarioConfig::PRESETS.join(", ")
    );
    eprintln!("  --series <path>          Read load,pv_unit[,hydro_unit] from CSV");
    eprintln!("  --seed <u64>             Override solver and profile seeds");
    eprintln!("  --dispatch-out <path>    Export the hourly dispatch trace to CSV");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after sizing");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
    eprintln!("Without --series, input series are synthesized from the scenario profile.");
    eprintln!("Set RUST_LOG=debug for per-generation progress.");
}

/// Returns the value following flag `args[*i]`, or exits with an error.
fn flag_value<'a>(args: &'a [String], i: &mut usize, what: &str) -> &'a str {
    *i += 1;
    match args.get(*i) {
        Some(v) => v.as_str(),
        None => {
            eprintln!("error: {} requires {what}", args[*i - 1]);
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        series_path: None,
        seed_override: None,
        dispatch_out: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                cli.scenario_path = Some(flag_value(&args, &mut i, "a path argument").into());
            }
            "--preset" => {
                cli.preset = Some(flag_value(&args, &mut i, "a name argument").into());
            }
            "--series" => {
                cli.series_path = Some(flag_value(&args, &mut i, "a path argument").into());
            }
            "--seed" => {
                let v = flag_value(&args, &mut i, "a u64 argument");
                if let Ok(s) = v.parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{v}\" is not a valid u64");
                    process::exit(1);
                }
            }
            "--dispatch-out" => {
                cli.dispatch_out = Some(flag_value(&args, &mut i, "a path argument").into());
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                let v = flag_value(&args, &mut i, "a u16 argument");
                if let Ok(p) = v.parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{v}\" is not a valid u16");
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn main() {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then baseline default
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    // Apply seed override
    if let Some(seed) = cli.seed_override {
        scenario.solver.seed = Some(seed);
        scenario.profile.seed = seed;
    }

    // Validate
    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let params = match cli.series_path {
        Some(ref path) => match read_series_csv(Path::new(path)) {
            Ok(series) => {
                info!(path = %path, hours = series.load.len(), "loaded input series");
                series.into_params(scenario.options.clone())
            }
            Err(e) => {
                eprintln!("error: failed to read series: {e}");
                process::exit(1);
            }
        },
        None => scenario.build_params(),
    };

    // Size on a worker thread
    let result = match SizingTask::spawn(params, scenario.solver.clone())
        .and_then(SizingTask::blocking_join)
    {
        Ok(result) => result,
        Err(e) => {
            error!("sizing failed: {e}");
            process::exit(1);
        }
    };

    println!("{result}");

    // Export CSV if requested
    if let Some(ref path) = cli.dispatch_out {
        if let Err(e) = export_csv(&result, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Dispatch written to {path}");
    }

    // Start API server if requested
    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(minigrid_sizer::api::AppState {
            options: scenario.options,
            solver: scenario.solver,
            result,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(minigrid_sizer::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
