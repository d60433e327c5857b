// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use runtime::CliRuntime;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use sublist_app::{PageSpec, RecordSource};
use sublist_data::{ColumnVisibilityStore, SubgroupFileSource};
use sublist_tui::{ListingScreen, ScreenOptions};
use sublist_view::{CellPolicy, ListingModel, ReloadEvent, ReloadPipeline};

const CHECK_TIMEOUT: Duration = Duration::from_secs(60);

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `sublist --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let log_path = match &options.log_file {
        Some(path) => path.clone(),
        None => sublist_data::default_log_path()?,
    };
    logging::init(&log_path)?;

    let policy = CellPolicy::subgroup_listing(&config.link_bases(), config.max_line_chars())
        .with_context(|| {
            format!(
                "invalid [links] config in {}; link bases must be http(s) URLs",
                options.config_path.display()
            )
        })?;
    let data_root = config.data_root();
    tracing::info!(root = %data_root.display(), "starting subgroup listing");
    let source: Arc<dyn RecordSource> = Arc::new(SubgroupFileSource::new(&data_root));

    if options.check_only {
        let report = check_listing(source, policy, config.page_size(), CHECK_TIMEOUT)
            .with_context(|| {
                format!(
                    "load subgroups under {} -- set [data].root or SUBLIST_DATA_ROOT if this path is wrong",
                    data_root.display()
                )
            })?;
        println!("{report}");
        return Ok(());
    }

    let screen_options = ScreenOptions {
        policy,
        page_size: config.page_size(),
        filter_debounce: config.filter_debounce()?,
    };
    let mut screen = ListingScreen::new(screen_options, source);
    let mut runtime = CliRuntime::new(
        ColumnVisibilityStore::new(config.columns_path()?),
        config.export_dir(),
    );
    sublist_tui::run_app(&mut screen, &mut runtime)
}

/// Loads the listing once without a terminal and summarizes the result.
fn check_listing(
    source: Arc<dyn RecordSource>,
    policy: CellPolicy,
    page_size: usize,
    timeout: Duration,
) -> Result<String> {
    let mut model = ListingModel::with_page_spec(policy, PageSpec::new(page_size, 1));
    let mut pipeline = ReloadPipeline::new(source);
    pipeline.trigger()?;

    match pipeline.wait(&mut model, timeout) {
        Some(ReloadEvent::Ready { rows }) => {
            let page = model.page();
            Ok(format!(
                "subgroups: {rows}\ncolumns: {}\npages: {} (page size {})",
                model.columns().len(),
                page.total_pages(),
                if page.page_size() == 0 {
                    "all".to_owned()
                } else {
                    page.page_size().to_string()
                }
            ))
        }
        Some(ReloadEvent::Failed { message }) => bail!("load failed: {message}"),
        Some(ReloadEvent::Loading) | None => {
            bail!("load did not finish within {}s", timeout.as_secs())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    log_file: Option<PathBuf>,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        log_file: None,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--log-file" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--log-file requires a file path"))?;
                options.log_file = Some(PathBuf::from(value.as_ref()));
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("sublist: browse RDE subgroups in the terminal");
    println!("  --config <path>          Use a specific config path");
    println!("  --log-file <path>        Write logs to this file (level via SUBLIST_LOG)");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Load config + subgroup data once and print counts");
    println!("  --help                   Show this help");
}
