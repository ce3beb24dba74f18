// src/main.rs

use std::env;
use std::error::Error;
use std::path::{Path, PathBuf};

use ndarray::Array1;

use uav_power_forecast::constants::DEFAULT_SAMPLE_INTERVAL_S;
use uav_power_forecast::crate_version;
use uav_power_forecast::data_analysis::evaluation::Evaluator;
use uav_power_forecast::data_analysis::model_variants::{ForceVelocityModel, MeanUsageModel};
use uav_power_forecast::data_analysis::power_model::PowerModel;
use uav_power_forecast::data_input::flight_parser::parse_flight_file;
use uav_power_forecast::data_input::parameters::{FlightCondition, ParameterTable};
use uav_power_forecast::data_input::paths::DataPaths;
use uav_power_forecast::plot_functions::plot_flight_route::plot_flight_route;

fn print_usage(program: &str) {
    eprintln!("Usage: {} <data_dir> [options]", program);
    eprintln!();
    eprintln!("Expects <data_dir>/parameters.csv and <data_dir>/flights/<id>.csv.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --model <force-velocity|mean-usage>  model variant to train (default: force-velocity)");
    eprintln!("  --delta <seconds>                    sample interval used for finite differences (default: {})", DEFAULT_SAMPLE_INTERVAL_S);
    eprintln!("  --min-payload <grams>                train only on flights with payload >= value (default: 0)");
    eprintln!("  --route <name>                       train only on flights recorded on this route");
    eprintln!("  --test <id,id,...>                   evaluate the trained model on these flights");
    eprintln!("  --forecast <id,id,...>               write forecast CSVs for these flights");
    eprintln!("  --routes                             render route plots (test/forecast flights, or training flights if neither is given)");
    eprintln!("  --out <dir>                          results directory (default: results)");
}

/// Returns the value following a flag, or an error naming the flag.
fn flag_value<'a>(args: &'a [String], index: usize, flag: &str) -> Result<&'a str, Box<dyn Error>> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| format!("flag {} expects a value", flag).into())
}

/// Parses a comma-separated flight id list such as `3,7,12`.
fn parse_id_list(list: &str) -> Result<Vec<u32>, Box<dyn Error>> {
    list.split(',')
        .map(|part| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| format!("invalid flight id '{}' in list '{}'", part, list).into())
        })
        .collect()
}

fn write_forecast_csv(
    output_file: &Path,
    times: &Array1<f64>,
    power: &Array1<f64>,
) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_path(output_file)
        .map_err(|e| format!("cannot create forecast file '{}': {}", output_file.display(), e))?;
    writer.write_record(["time", "power"])?;
    for (t, p) in times.iter().zip(power.iter()) {
        writer.write_record([t.to_string(), p.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    // --- Argument Parsing ---
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let mut data_dir: Option<PathBuf> = None;
    let mut results_dir = PathBuf::from("results");
    let mut model_name = String::from("force-velocity");
    let mut sample_interval_s = DEFAULT_SAMPLE_INTERVAL_S;
    let mut min_payload = 0.0_f64;
    let mut route_filter: Option<String> = None;
    let mut test_ids: Vec<u32> = Vec::new();
    let mut forecast_ids: Vec<u32> = Vec::new();
    let mut plot_routes = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--model" => {
                i += 1;
                model_name = flag_value(&args, i, "--model")?.to_string();
            }
            "--delta" => {
                i += 1;
                let value = flag_value(&args, i, "--delta")?;
                sample_interval_s = value
                    .parse::<f64>()
                    .map_err(|_| format!("--delta expects a number, got '{}'", value))?;
                if sample_interval_s <= 0.0 {
                    return Err(format!("--delta must be positive, got {}", sample_interval_s).into());
                }
            }
            "--min-payload" => {
                i += 1;
                let value = flag_value(&args, i, "--min-payload")?;
                min_payload = value
                    .parse::<f64>()
                    .map_err(|_| format!("--min-payload expects a number, got '{}'", value))?;
            }
            "--route" => {
                i += 1;
                route_filter = Some(flag_value(&args, i, "--route")?.to_string());
            }
            "--test" => {
                i += 1;
                test_ids = parse_id_list(flag_value(&args, i, "--test")?)?;
            }
            "--forecast" => {
                i += 1;
                forecast_ids = parse_id_list(flag_value(&args, i, "--forecast")?)?;
            }
            "--routes" => {
                plot_routes = true;
            }
            "--out" => {
                i += 1;
                results_dir = PathBuf::from(flag_value(&args, i, "--out")?);
            }
            other if other.starts_with("--") => {
                eprintln!("Unknown option '{}'.", other);
                print_usage(&args[0]);
                std::process::exit(1);
            }
            positional => {
                if data_dir.is_some() {
                    eprintln!("Unexpected argument '{}'.", positional);
                    print_usage(&args[0]);
                    std::process::exit(1);
                }
                data_dir = Some(PathBuf::from(positional));
            }
        }
        i += 1;
    }

    let data_dir = match data_dir {
        Some(dir) => dir,
        None => {
            print_usage(&args[0]);
            std::process::exit(1);
        }
    };

    let mut model = match model_name.as_str() {
        "force-velocity" => PowerModel::new(Box::new(ForceVelocityModel::with_sample_interval(
            sample_interval_s,
        ))),
        "mean-usage" => PowerModel::new(Box::new(MeanUsageModel)),
        other => {
            eprintln!("Unknown model variant '{}'. Expected 'force-velocity' or 'mean-usage'.", other);
            std::process::exit(1);
        }
    };

    println!("uav-power-forecast v{}", crate_version());
    println!(
        "Data directory: '{}', results directory: '{}'",
        data_dir.display(),
        results_dir.display()
    );

    let paths = DataPaths::new(&data_dir, &results_dir);

    // --- Training-Flight Selection ---
    let parameter_table = ParameterTable::from_file(&paths.parameters_file())?;
    println!(
        "Parameter table: {} flights, columns: {}",
        parameter_table.row_count(),
        parameter_table.headers().join(", ")
    );

    let mut conditions: Vec<FlightCondition> = Vec::new();
    conditions.push(FlightCondition::numeric("payload", move |p| p >= min_payload));
    if let Some(route) = route_filter {
        conditions.push(FlightCondition::text("route", move |r| r == route));
    }

    let train_ids = parameter_table.flight_ids(&conditions)?;
    if train_ids.is_empty() {
        return Err("no flights satisfy the training conditions; nothing to train on".into());
    }

    // --- Training ---
    println!(
        "\n--- Training '{}' on {} flights: {:?} ---",
        model.name(),
        train_ids.len(),
        train_ids
    );
    let mut train_flights = Vec::with_capacity(train_ids.len());
    for &flight_id in &train_ids {
        train_flights.push(parse_flight_file(&paths.flight_file(flight_id), flight_id)?);
    }
    model.train(&train_flights)?;

    println!("\n--- Training Results ---");
    println!("{}", model.report()?);

    // --- Evaluation ---
    if !test_ids.is_empty() {
        let mut evaluator = Evaluator::new(&model, &paths);
        evaluator.execute(&test_ids)?;
    }

    // --- Forecast Export ---
    if !forecast_ids.is_empty() {
        println!("\n--- Forecast Export ---");
        paths.ensure_results_dirs()?;
        for &flight_id in &forecast_ids {
            let flight = parse_flight_file(&paths.flight_file(flight_id), flight_id)?;
            let (times, power) = model.forecast_with_times(&flight)?;
            let output_file = paths.forecast_file(flight_id);
            write_forecast_csv(&output_file, &times, &power)?;
            println!(
                "  Forecast for flight {} saved as '{}'.",
                flight_id,
                output_file.display()
            );
        }
    }

    // --- Route Plots ---
    if plot_routes {
        println!("\n--- Route Plots ---");
        paths.ensure_results_dirs()?;
        let mut route_ids: Vec<u32> = Vec::new();
        for &flight_id in test_ids.iter().chain(forecast_ids.iter()) {
            if !route_ids.contains(&flight_id) {
                route_ids.push(flight_id);
            }
        }
        if route_ids.is_empty() {
            route_ids = train_ids.clone();
        }
        for &flight_id in &route_ids {
            let flight = parse_flight_file(&paths.flight_file(flight_id), flight_id)?;
            if !flight.columns.has_gps() {
                println!(
                    "  Skipping route plot for flight {}: log has no GPS columns.",
                    flight_id
                );
                continue;
            }
            let output_file = paths.route_plot_file(flight_id);
            plot_flight_route(&output_file.to_string_lossy(), &flight)?;
        }
    }

    Ok(())
}

// src/main.rs
