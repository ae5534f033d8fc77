// src/main.rs
mod aggregation;
mod config;
mod file_utils;
mod markdown_report;
mod models;
mod report_parser;
mod tui;

use aggregation::{FolderStatus, ResultsCache};
use anyhow::{Context, Result};
use clap::Parser;
use config::load_config;
use models::ViewState;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tui::{App, TuiApp};

/// Browse cross-validated grid results in the terminal
#[derive(Parser, Debug)]
#[command(name = "grid-explorer", version, about)]
struct Cli {
    /// Results folder with one subdirectory per configuration
    results_folder: Option<String>,

    /// Path to a settings file (TOML, or YAML for .yaml/.yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a markdown summary to stdout instead of starting the TUI
    #[arg(long)]
    print: bool,

    /// Configurations to include (comma-separated, default: all)
    #[arg(long, value_delimiter = ',')]
    select: Vec<String>,

    /// Include the raw data tables
    #[arg(long)]
    raw: bool,

    /// Include the per-configuration intent errors
    #[arg(long)]
    errors: bool,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置文件
    let config = load_config(cli.config.as_deref())?;

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.general.log_file.as_ref().map(PathBuf::from));
    init_logging(log_file.as_deref(), !cli.print)?;

    let results_folder = cli
        .results_folder
        .clone()
        .unwrap_or_else(|| config.general.results_folder.clone());
    tracing::info!("Using results folder {}", results_folder);

    let mut state = ViewState::new(results_folder);
    state.show_raw_data = cli.raw;
    state.show_intent_errors = cli.errors;
    state.preselect(cli.select.clone());

    if cli.print {
        return print_summary(config, state);
    }

    let app = App::new(config, state);
    let mut tui_app = TuiApp::new(app)?;
    tui_app.run()
}

/// 初始化日志：TUI模式下只写入日志文件（未配置时丢弃），打印模式下写到stderr
fn init_logging(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false)
                .init();
        }
        // 终端被TUI占用，没有日志文件时不安装订阅者
        None if interactive => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
    }

    Ok(())
}

/// 非交互模式：读取一次结果目录并输出markdown汇总
fn print_summary(config: models::Config, mut state: ViewState) -> Result<()> {
    let mut cache = ResultsCache::new(&config.general, config.reports.clone());

    let data = match cache.get_or_load(Path::new(&state.results_folder))? {
        FolderStatus::Missing => {
            println!("Are you sure this results folder `{}` exists?", state.results_folder);
            return Ok(());
        }
        FolderStatus::Loaded(data) => data,
    };

    state.sync_selection(&data.possible_configs());

    print!("{}", markdown_report::generate_report(&state, &data)?);
    Ok(())
}
