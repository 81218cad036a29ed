//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvTradeLogAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, BacktestResult};
use crate::domain::config_validation::{
    read_percent, read_percent_list, validate_backtest_config, validate_strategy_config,
    validate_sweep_config,
};
use crate::domain::error::SimError;
use crate::domain::highlight::render_highlighted;
use crate::domain::metrics::{PerformanceStats, trade_statistics};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::SignalCategories;
use crate::domain::strategy::StrategySpec;
use crate::domain::sweep::{SweepResult, rank_by_pnl, run_sweep, sweep_grid};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "replaylab", about = "Deterministic strategy backtester")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// OHLCV CSV file, overrides [backtest] data
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Write the trade log as CSV
        #[arg(short, long)]
        trades: Option<PathBuf>,
    },
    /// Validate a strategy configuration
    Validate {
        #[arg(short, long)]
        strategy: PathBuf,
    },
    /// Run the strategy over a grid of take-profit and stop-loss values
    Sweep {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
    /// List the CSV data sets in a directory
    Symbols {
        #[arg(short, long)]
        dir: PathBuf,
    },
}

/// Install the stderr subscriber. `RUST_LOG` takes precedence over `--verbose`.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub fn run(cli: Cli) -> ExitCode {
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn execute(cli: Cli) -> Result<(), SimError> {
    match cli.command {
        Command::Backtest {
            config,
            data,
            trades,
        } => run_backtest(&config, data.as_deref(), trades.as_deref()),
        Command::Validate { strategy } => run_validate(&strategy),
        Command::Sweep { config, data } => run_sweep_command(&config, data.as_deref()),
        Command::Symbols { dir } => run_symbols(&CsvAdapter::new(dir)),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, SimError> {
    info!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

fn run_backtest(
    config_path: &Path,
    data_override: Option<&Path>,
    trades_path: Option<&Path>,
) -> Result<(), SimError> {
    let adapter = load_config(config_path)?;
    validate_backtest_config(&adapter)?;
    validate_strategy_config(&adapter)?;

    let strategy = build_strategy(&adapter);
    let bt_config = build_backtest_config(&adapter)?;
    let data_path = resolve_data_path(data_override, &adapter, config_path)?;
    let (data_port, symbol) = CsvAdapter::for_file(&data_path)?;
    let series = fetch_series(&data_port, &symbol)?;

    info!(
        strategy = %strategy.title,
        bars = series.len(),
        take_profit = bt_config.take_profit_pct,
        stop_loss = bt_config.stop_loss_pct,
        "running backtest"
    );
    let result = backtest_engine::run_backtest(&series, &strategy, &bt_config);
    let stats = trade_statistics(&result);

    print!(
        "{}",
        Summary {
            strategy: &strategy,
            config: &bt_config,
            result: &result,
            stats: &stats,
        }
    );

    if let Some(path) = trades_path {
        CsvTradeLogAdapter.write(&result, &strategy, &path.to_string_lossy())?;
    }
    Ok(())
}

fn run_validate(strategy_path: &Path) -> Result<(), SimError> {
    let adapter = load_config(strategy_path)?;
    validate_strategy_config(&adapter)?;
    let strategy = build_strategy(&adapter);

    print!("{}", ValidationReport(&strategy));
    Ok(())
}

fn run_symbols(data_port: &dyn DataPort) -> Result<(), SimError> {
    let symbols = data_port.list_symbols()?;
    if symbols.is_empty() {
        eprintln!("No CSV data sets found");
    }
    for symbol in &symbols {
        println!("{}", symbol);
    }
    Ok(())
}

fn run_sweep_command(config_path: &Path, data_override: Option<&Path>) -> Result<(), SimError> {
    let adapter = load_config(config_path)?;
    validate_strategy_config(&adapter)?;
    validate_sweep_config(&adapter)?;

    let strategy = build_strategy(&adapter);
    let grid = build_sweep_grid(&adapter)?;
    let data_path = resolve_data_path(data_override, &adapter, config_path)?;
    let (data_port, symbol) = CsvAdapter::for_file(&data_path)?;
    let series = fetch_series(&data_port, &symbol)?;

    let mut results = run_sweep(&series, &strategy, &grid);
    rank_by_pnl(&mut results);

    print!(
        "{}",
        SweepReport {
            strategy: &strategy,
            results: &results,
        }
    );
    Ok(())
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, SimError> {
    let defaults = BacktestConfig::default();
    Ok(BacktestConfig {
        take_profit_pct: read_percent(
            adapter,
            "backtest",
            "take_profit",
            defaults.take_profit_pct * 100.0,
        )?,
        stop_loss_pct: read_percent(
            adapter,
            "backtest",
            "stop_loss",
            defaults.stop_loss_pct * 100.0,
        )?,
    })
}

pub fn build_strategy(adapter: &dyn ConfigPort) -> StrategySpec {
    let title = adapter
        .get_string("strategy", "title")
        .unwrap_or_else(|| "Untitled".to_string());
    let rules = adapter.get_numbered("strategy", "rule");
    let checklist = adapter.get_numbered("strategy", "check");

    StrategySpec::new(title.trim(), rules).with_checklist(checklist)
}

pub fn build_sweep_grid(adapter: &dyn ConfigPort) -> Result<Vec<BacktestConfig>, SimError> {
    let take_profits = read_percent_list(adapter, "sweep", "take_profit")?;
    let stop_losses = read_percent_list(adapter, "sweep", "stop_loss")?;
    Ok(sweep_grid(&take_profits, &stop_losses))
}

/// `--data` wins; otherwise `[backtest] data`, relative to the config file.
pub fn resolve_data_path(
    data_override: Option<&Path>,
    config: &dyn ConfigPort,
    config_path: &Path,
) -> Result<PathBuf, SimError> {
    if let Some(path) = data_override {
        return Ok(path.to_path_buf());
    }

    let raw = config
        .get_string("backtest", "data")
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| SimError::ConfigMissing {
            section: "backtest".into(),
            key: "data".into(),
        })?;
    let path = PathBuf::from(raw.trim());

    if path.is_relative() {
        if let Some(dir) = config_path.parent() {
            return Ok(dir.join(path));
        }
    }
    Ok(path)
}

/// Fetch a series, treating an empty one as an error.
pub fn fetch_series(data_port: &dyn DataPort, symbol: &str) -> Result<PriceSeries, SimError> {
    info!("Loading bars for {}", symbol);
    let series = data_port.fetch_series(symbol)?;
    if series.is_empty() {
        return Err(SimError::NoData {
            origin: symbol.to_string(),
        });
    }
    Ok(series)
}

/// Console summary of one backtest.
pub struct Summary<'a> {
    pub strategy: &'a StrategySpec,
    pub config: &'a BacktestConfig,
    pub result: &'a BacktestResult,
    pub stats: &'a PerformanceStats,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Summary {
            strategy,
            config,
            result,
            stats,
        } = self;
        let signals = SignalCategories::interpret(&strategy.rules).labels();
        let signals = if signals.is_empty() {
            "none".to_string()
        } else {
            signals.join(", ")
        };

        writeln!(f, "=== {} ===", strategy.title)?;
        writeln!(f, "Signals:          {}", signals)?;
        writeln!(
            f,
            "Take Profit:      {:.2}%   Stop Loss: {:.2}%",
            config.take_profit_pct * 100.0,
            config.stop_loss_pct * 100.0
        )?;
        writeln!(f, "Total Trades:     {}", result.total_trades)?;
        writeln!(
            f,
            "Win Rate:         {:.1}% ({}W / {}L)",
            result.win_rate, stats.wins, stats.losses
        )?;
        writeln!(f, "Total PnL:        {:.2}%", result.total_pnl * 100.0)?;
        writeln!(f, "Avg Win:          {:.2}%", stats.avg_win)?;
        writeln!(f, "Avg Loss:         {:.2}%", stats.avg_loss)?;
        writeln!(f, "Largest Win:      {:.2}%", stats.largest_win)?;
        writeln!(f, "Largest Loss:     {:.2}%", stats.largest_loss)?;
        writeln!(f, "Profit Factor:    {:.2}", stats.profit_factor)?;
        writeln!(
            f,
            "Streaks:          {} wins / {} losses",
            stats.max_consecutive_wins, stats.max_consecutive_losses
        )?;
        writeln!(f, "Avg Duration:     {:.1} bars", stats.avg_trade_duration)?;
        writeln!(f, "Max Drawdown:     -{:.2}%", stats.max_drawdown)?;
        writeln!(f, "Sharpe Ratio:     {:.2}", stats.sharpe_ratio)
    }
}

/// Highlighted rules and the signal categories they enable.
pub struct ValidationReport<'a>(pub &'a StrategySpec);

impl fmt::Display for ValidationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strategy = self.0;
        let categories = SignalCategories::interpret(&strategy.rules);

        writeln!(f, "Strategy: {}", strategy.title)?;

        if strategy.rules.is_empty() {
            writeln!(f, "\nNo rules: this strategy never enters.")?;
        } else {
            writeln!(f, "\nRules:")?;
            for (n, rule) in strategy.rules.iter().enumerate() {
                writeln!(f, "  {}. {}", n + 1, render_highlighted(rule))?;
            }
        }

        if !strategy.checklist.is_empty() {
            writeln!(f, "\nChecklist:")?;
            for item in &strategy.checklist {
                writeln!(f, "  - {}", item)?;
            }
        }

        writeln!(f, "\nSignals:")?;
        if categories.is_inert() {
            writeln!(f, "  none")?;
        }
        for label in categories.labels() {
            writeln!(f, "  {}", label)?;
        }
        if categories.has_rules {
            writeln!(f, "  fallback (close above prior high on volume expansion)")?;
        }

        writeln!(f, "\nStrategy configuration is valid.")
    }
}

/// Sweep results, one row per grid point.
pub struct SweepReport<'a> {
    pub strategy: &'a StrategySpec,
    pub results: &'a [SweepResult],
}

impl fmt::Display for SweepReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "=== {} sweep: {} runs ===",
            self.strategy.title,
            self.results.len()
        )?;
        writeln!(
            f,
            "{:>6} {:>6} {:>7} {:>7} {:>9} {:>8} {:>7}",
            "TP%", "SL%", "trades", "win%", "pnl%", "maxDD%", "sharpe"
        )?;
        for r in self.results {
            writeln!(
                f,
                "{:>6.2} {:>6.2} {:>7} {:>7.1} {:>9.2} {:>8.2} {:>7.2}",
                r.config.take_profit_pct * 100.0,
                r.config.stop_loss_pct * 100.0,
                r.result.total_trades,
                r.result.win_rate,
                r.result.total_pnl * 100.0,
                r.stats.max_drawdown,
                r.stats.sharpe_ratio,
            )?;
        }
        Ok(())
    }
}
