// src/main.rs
use bmtk::cli::args::Cli;
use bmtk::cli::commands::CommandContext;
use bmtk::cli::display::use_color;
use bmtk::config::{generate_default_config, load_settings};
use bmtk::exitcode;
use bmtk::util::path::expand_path;
use clap::Parser;
use crossterm::style::Stylize;
use tracing::{debug, info, instrument};
use tracing_subscriber::{
    filter::{filter_fn, LevelFilter},
    fmt::{self, format::FmtSpan},
    prelude::*,
};

#[instrument]
fn main() {
    let cli = Cli::parse();
    setup_logging(cli.debug, cli.no_color);

    if cli.generate_config {
        println!("{}", generate_default_config());
        std::process::exit(exitcode::SUCCESS);
    }

    let config_path = cli.config.as_deref().map(expand_path);
    let settings = match load_settings(config_path.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", format!("Invalid configuration: {}", e).red());
            std::process::exit(exitcode::USAGE);
        }
    };
    debug!("Settings: {:?}", settings);

    let ctx = CommandContext::new(settings, cli.lang, use_color(cli.no_color));
    if let Err(e) = bmtk::cli::execute_command(cli, &ctx) {
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(e.exit_code());
    }
}

fn setup_logging(verbosity: u8, no_color: bool) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    // Create a noisy module filter
    let noisy_modules = ["encoding_rs", "csv", "mio"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    // Log to stderr so stdout stays clean for tables and JSON
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(!no_color)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    let filtered_layer = fmt_layer.with_filter(filter).with_filter(module_filter);

    tracing_subscriber::registry().with(filtered_layer).init();

    match filter {
        LevelFilter::INFO => info!("Debug mode: info"),
        LevelFilter::DEBUG => debug!("Debug mode: debug"),
        LevelFilter::TRACE => debug!("Debug mode: trace"),
        _ => {}
    }
}
