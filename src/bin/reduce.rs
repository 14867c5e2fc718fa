//! Scenario suite reduction CLI.
//!
//! Subcommands:
//!   analyze   — Load records, score, select, write analysis_report.json
//!   stats     — Load records and print initial-suite statistics only
//!
//! Usage:
//!   scenario-reduce analyze --input simulation_output [OPTIONS]
//!   scenario-reduce stats --input simulation_output [OPTIONS]

use std::time::Instant;

use scenario_reduce::pipeline::{analyze_suite, run_analysis, AnalysisConfig, AnalyzedSuite};
use scenario_reduce::records::DEFAULT_EXEC_TIME_SECONDS;
use scenario_reduce::select::max_exec_time;

// ── CLI parsing ──

struct Args {
    subcommand: String,
    input_dir: String,
    output_dir: String,
    exec_time: f64,
    exec_times_file: Option<String>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut a = Args {
        subcommand: String::new(),
        input_dir: String::from("simulation_output"),
        output_dir: String::from("analysis_results"),
        exec_time: DEFAULT_EXEC_TIME_SECONDS,
        exec_times_file: None,
    };

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    a.subcommand = args[1].clone();
    if a.subcommand == "--help" || a.subcommand == "-h" {
        print_usage();
        std::process::exit(0);
    }

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                a.input_dir = args[i].clone();
            }
            "--output" => {
                i += 1;
                a.output_dir = args[i].clone();
            }
            "--exec-time" => {
                i += 1;
                a.exec_time = args[i].parse().expect("Invalid --exec-time");
            }
            "--exec-times" => {
                i += 1;
                a.exec_times_file = Some(args[i].clone());
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    a
}

fn print_usage() {
    println!("Usage: scenario-reduce <COMMAND> [OPTIONS]");
    println!();
    println!("Commands:");
    println!("  analyze     Select a reduced suite → run_<timestamp>/analysis_report.json");
    println!("  stats       Load records and print initial-suite statistics only");
    println!();
    println!("Options:");
    println!("  --input DIR        Record store to ingest (default: simulation_output)");
    println!("  --output DIR       Root for report run dirs (default: analysis_results)");
    println!("  --exec-time SECS   Assumed execution time per scenario (default: 60)");
    println!("  --exec-times FILE  JSON object of record file name → measured seconds");
}

fn config_from(a: &Args) -> AnalysisConfig {
    AnalysisConfig {
        input_dir: a.input_dir.clone().into(),
        output_dir: a.output_dir.clone().into(),
        default_exec_time: a.exec_time,
        exec_times_file: a.exec_times_file.clone().map(Into::into),
    }
}

// ── Console summaries ──

fn print_suite_overview(suite: &AnalyzedSuite) {
    println!("\n--- Suite Overview ---");
    println!("Scenarios loaded: {}", suite.len());

    let flags: Vec<u8> = suite.collisions.iter().map(|&c| c as u8).collect();
    println!("Collision flags (1=yes, 0=no): {:?}", flags);

    let times: Vec<String> = suite
        .exec_times
        .iter()
        .map(|t| format!("{:.2}", t))
        .collect();
    println!("Execution times (seconds): {:?}", times);

    let divs: Vec<String> = suite
        .diversity
        .iter()
        .map(|d| format!("{:.3}", d))
        .collect();
    println!("Diversity scores: {:?}", divs);
    println!(
        "Max execution time: {:.2} seconds",
        max_exec_time(&suite.exec_times)
    );

    let totals = suite.totals();
    println!("\n--- Initial Suite Statistics ---");
    println!("Total collisions detected: {}", totals.collisions);
    println!(
        "Combined execution time: {:.2} seconds",
        totals.exec_time_seconds
    );
    println!("Sum of diversity scores: {:.3}", totals.diversity);
}

fn print_selection(suite: &AnalyzedSuite, selected: &[usize]) {
    println!("\n--- Greedy Selection Results ---");
    println!("Scenarios selected: {}", selected.len());
    println!("Selected indices (pick order): {:?}", selected);

    println!(
        "\n{:>4} {:>14} {:>14} {:>9} {:>8} {:>28}",
        "Id", "Event", "Town", "Exec(s)", "Div", "File"
    );
    println!("{}", "-".repeat(82));
    for &id in selected {
        let o = &suite.outcomes[id];
        println!(
            "{:>4} {:>14} {:>14} {:>9.2} {:>8.3} {:>28}",
            id,
            truncate(o.kind.label().unwrap_or("-"), 14),
            truncate(o.town.as_deref().unwrap_or("-"), 14),
            o.exec_time_seconds,
            suite.diversity[id],
            truncate(&o.source_name, 28),
        );
    }

    let totals = suite.totals_for(selected);
    println!("\n--- Selected Suite Statistics ---");
    println!("Collisions covered: {}", totals.collisions);
    println!(
        "Selected execution time: {:.2} seconds",
        totals.exec_time_seconds
    );
    println!(
        "Sum of selected diversity scores: {:.3}",
        totals.diversity
    );
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

// ── Subcommands ──

fn cmd_analyze(config: &AnalysisConfig) {
    println!("Analyzing record store {}", config.input_dir.display());
    match run_analysis(config) {
        Ok((suite, selected, report_path)) => {
            print_suite_overview(&suite);
            print_selection(&suite, &selected);
            println!("\nReport written to {}", report_path.display());
        }
        Err(e) => {
            eprintln!("Analysis failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_stats(config: &AnalysisConfig) {
    println!("Analyzing record store {}", config.input_dir.display());
    match analyze_suite(config) {
        Ok(suite) => print_suite_overview(&suite),
        Err(e) => {
            eprintln!("Analysis failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args();
    let config = config_from(&args);
    let total_start = Instant::now();

    match args.subcommand.as_str() {
        "analyze" => cmd_analyze(&config),
        "stats" => cmd_stats(&config),
        other => {
            eprintln!("Unknown subcommand: {}. Use analyze or stats.", other);
            print_usage();
            std::process::exit(1);
        }
    }

    println!("\nTotal: {:.1}s", total_start.elapsed().as_secs_f64());
}
