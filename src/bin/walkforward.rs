//! Command line entrypoint: loads a series from CSV, runs walk-forward
//! validation with the configured forecaster and prints the report.

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use walkforward::config::{generate_commented_config_template, Config, DEFAULT_CONFIG_FILE};
use walkforward::data::{CsvSeriesProvider, SeriesProvider};
use walkforward::forecast::{ForecasterFactory, ModelConfig};
use walkforward::telemetry;
use walkforward::utils::init_logging;
use walkforward::validation::{ValidationRunner, WindowSplitter};

#[derive(Debug, Parser)]
#[command(name = "walkforward", author, version, about = "Walk-forward validation of forecasting models", long_about = None)]
struct Args {
    /// Path to the configuration file (TOML)
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    config: String,

    /// Print the default configuration to stdout and exit
    #[arg(long)]
    print_default_config: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run walk-forward validation over a CSV series
    Run {
        /// Path to the series (CSV with a header row)
        #[arg(long, value_name = "CSV")]
        data: Option<String>,
        /// Column holding the observations
        #[arg(long)]
        column: Option<String>,
        /// Column holding timestamp labels
        #[arg(long)]
        timestamp_column: Option<String>,
        /// Observations per training window
        #[arg(long)]
        window_size: Option<usize>,
        /// Steps forecast and held out per window
        #[arg(long)]
        horizon: Option<usize>,
        /// Forecaster kind with default parameters (naive, mean, ses, holt, ...)
        #[arg(long)]
        model: Option<String>,
        /// Stop after this many windows
        #[arg(long)]
        max_windows: Option<usize>,
        /// Log per-window inspection output
        #[arg(long)]
        debug: bool,
        /// Evaluate windows in parallel
        #[arg(long)]
        parallel: bool,
        /// Write the JSON report here
        #[arg(long, value_name = "JSON")]
        output: Option<String>,
        /// Write per-window scores here
        #[arg(long, value_name = "CSV")]
        records: Option<String>,
        /// Write concatenated fitted values here
        #[arg(long, value_name = "CSV")]
        fitted: Option<String>,
        /// Write run metrics (Prometheus text format) here
        #[arg(long, value_name = "PATH")]
        metrics: Option<String>,
        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },
    /// Write a commented default configuration to the --config path
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        println!("{}", Config::default_toml()?);
        return Ok(());
    }

    match args.command {
        | Some(Command::Init { force }) => {
            let path = Path::new(&args.config);
            if path.exists() && !force {
                bail!("{} already exists. Use --force to overwrite.", path.display());
            }
            generate_commented_config_template(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✅ Wrote default config to {}", path.display());
            Ok(())
        }
        | Some(Command::Completions { shell }) => {
            clap_complete::generate(shell, &mut Args::command(), "walkforward", &mut std::io::stdout());
            Ok(())
        }
        | Some(Command::Run {
            data,
            column,
            timestamp_column,
            window_size,
            horizon,
            model,
            max_windows,
            debug,
            parallel,
            output,
            records,
            fitted,
            metrics,
            no_progress,
        }) => {
            let config_found = Path::new(&args.config).exists();
            let mut config = if config_found {
                Config::from_file(&args.config).context("Failed to load configuration")?
            } else {
                Config::load().context("Failed to load configuration")?
            };

            // command line flags override the file
            if let Some(data) = data {
                config.data.path = Some(data);
            }
            if let Some(column) = column {
                config.data.column = column;
            }
            if timestamp_column.is_some() {
                config.data.timestamp_column = timestamp_column;
            }
            if let Some(window_size) = window_size {
                config.validation.window_size = window_size;
            }
            if let Some(horizon) = horizon {
                config.validation.horizon = horizon;
            }
            if let Some(name) = model {
                config.model = ModelConfig::from_name(&name)?;
            }
            if max_windows.is_some() {
                config.validation.max_windows = max_windows;
            }
            config.validation.debug |= debug;
            config.validation.parallel |= parallel;
            if output.is_some() {
                config.output.report_path = output;
            }
            if records.is_some() {
                config.output.records_path = records;
            }
            if fitted.is_some() {
                config.output.fitted_path = fitted;
            }
            if metrics.is_some() {
                config.output.metrics_path = metrics;
            }
            if config.output.fitted_path.is_some() {
                config.validation.collect_fitted = true;
            }

            init_logging(&config.logging.level);
            if !config_found {
                log::warn!("Configuration file '{}' not found, falling back to user config dir or defaults", args.config);
            }
            config.validate().context("Invalid configuration")?;
            run_validation(&config, no_progress)
        }
        | None => {
            Args::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

fn run_validation(config: &Config, no_progress: bool) -> Result<()> {
    let Some(data_path) = config.data.path.as_deref() else {
        bail!("No data file given: pass --data or set data.path in the configuration");
    };

    let mut provider = CsvSeriesProvider::new(config.data.column.clone());
    if let Some(ts) = &config.data.timestamp_column {
        provider = provider.with_timestamp_column(ts.clone());
    }
    let series = provider
        .load(Path::new(data_path))
        .with_context(|| format!("Failed to load series from {}", data_path))?;

    if config.output.metrics_path.is_some() {
        telemetry::init()?;
    }

    let forecaster = ForecasterFactory::create(&config.model)?;
    let runner = ValidationRunner::new(forecaster, config.validation.clone())?;

    let splitter = WindowSplitter::new(series.len(), config.validation.window_size, config.validation.horizon)?;
    let windows = config
        .validation
        .max_windows
        .map_or(splitter.window_count(), |max| max.min(splitter.window_count()));
    let progress = if no_progress || config.validation.debug {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(windows as u64);
        pb.set_style(ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} windows ({eta})")?);
        pb
    };

    println!(
        "⚙️  Validating '{}' on {} observations from {}",
        config.model.kind(),
        series.len(),
        data_path
    );
    let report = runner.run_with(&series, |_| progress.inc(1))?;
    progress.finish_and_clear();
    report.print();

    if let Some(path) = &config.output.report_path {
        report.save_json(path).with_context(|| format!("Failed to write {}", path))?;
        println!("✅ Report written to {}", path);
    }
    if let Some(path) = &config.output.records_path {
        report.write_records_csv(path).with_context(|| format!("Failed to write {}", path))?;
        println!("✅ Window scores written to {}", path);
    }
    if let Some(path) = &config.output.fitted_path {
        report.write_fitted_csv(path).with_context(|| format!("Failed to write {}", path))?;
        println!("✅ Fitted values written to {}", path);
    }
    if let Some(path) = &config.output.metrics_path {
        telemetry::write_to(path).with_context(|| format!("Failed to write {}", path))?;
        println!("✅ Metrics written to {}", path);
    }
    Ok(())
}
