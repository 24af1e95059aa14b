use anyhow::{Context, Result};
use clap::Parser;
use cpuload::cli::{Cli, OutputFormat};
use cpuload::csv_output::CsvLoadOutput;
use cpuload::interval_input::IntervalSet;
use cpuload::json_output::JsonLoadReport;
use cpuload::load::{EngineConfig, LoadEngine, LoadMatrix};
use cpuload::profiling::{ProfilingCategory, ProfilingContext};
use cpuload::summary::LoadSummary;
use cpuload::window_plan::{ResolvedWindows, WindowPlan, NS_PER_MS};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; errors are always shown, --debug shows everything
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Print the chosen window parameters and matrix shape
fn print_text(matrix: &LoadMatrix, resolved: &ResolvedWindows, input: &IntervalSet) {
    let params = resolved.params;
    if resolved.dynamic {
        println!(
            "Calculated window parameters for ~{} points:",
            resolved.num_windows
        );
    } else {
        println!("Window parameters:");
    }
    println!(
        "  Window Size: {:.2} ms",
        params.window_size_ns as f64 / NS_PER_MS as f64
    );
    println!(
        "  Window Move: {:.2} ms",
        params.window_step_ns as f64 / NS_PER_MS as f64
    );
    println!();
    println!(
        "Intervals: {} on {} CPUs, trace duration {:.3} ms",
        input.len(),
        input.distinct_cpus(),
        params.trace_duration_ns as f64 / NS_PER_MS as f64
    );
    println!(
        "Load matrix: {} rows x {} windows",
        matrix.rows().len(),
        matrix.num_windows()
    );
    println!();

    let summary = LoadSummary::from_matrix(matrix);
    print!("{}", summary.to_table());

    let over = summary.over_capacity_cpus();
    if !over.is_empty() {
        println!();
        println!(
            "Note: {} CPU row(s) exceed 100%; the input has overlapping slices on the same CPU.",
            over.len()
        );
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let mut profiler = args.profile_self.then(ProfilingContext::new);

    let input = {
        let read = || {
            IntervalSet::from_path(&args.file)
                .with_context(|| format!("Failed to read intervals from {}", args.file.display()))
        };
        match profiler.as_mut() {
            Some(p) => p.measure(ProfilingCategory::Input, read)?,
            None => read()?,
        }
    };

    let trace_duration_ns = input
        .trace_duration_ns()
        .context("No intervals found in the input")?;

    let plan = WindowPlan {
        window_size_ms: args.window_size_ms,
        window_step_ms: args.window_move_ms,
        desired_points: args.points,
        max_windows: args.max_windows,
    };
    let resolved = plan.resolve(trace_duration_ns)?;

    let config = EngineConfig {
        max_windows: args.max_windows,
        ..if args.cap_per_cpu {
            EngineConfig::per_cpu_capped()
        } else {
            EngineConfig::default()
        }
    };
    let cap_policy = config.cap_policy;
    let engine = LoadEngine::new(config)?;

    let matrix = match profiler.as_mut() {
        Some(p) => engine.compute_profiled(&input.to_intervals(), resolved.params, p)?,
        None => input.compute(&engine, resolved.params)?,
    };

    let write_output = || -> Result<()> {
        match args.format {
            OutputFormat::Text => print_text(&matrix, &resolved, &input),
            OutputFormat::Json => {
                let report = JsonLoadReport::from_matrix(&matrix, cap_policy)
                    .with_summary(LoadSummary::from_matrix(&matrix));
                println!("{}", report.to_json()?);
            }
            OutputFormat::Csv => print!("{}", CsvLoadOutput::new(&matrix).overall_csv()),
        }

        if let Some(base) = &args.output {
            let paths = CsvLoadOutput::new(&matrix)
                .write_files(base)
                .with_context(|| format!("Failed to save CSV files to {}", base.display()))?;
            eprintln!("Overall CPU load data saved to {}", paths.overall.display());
            eprintln!("Per-CPU load data saved to {}", paths.per_core.display());
        }
        Ok(())
    };

    match profiler.as_mut() {
        Some(p) => p.measure(ProfilingCategory::Output, write_output)?,
        None => write_output()?,
    }

    if let Some(p) = &profiler {
        p.print_summary();
    }

    Ok(())
}
