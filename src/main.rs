use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use certmail::attachments::Resolver;
use certmail::cli::{CheckArgs, Command, RootArgs, RunArgs};
use certmail::config::Config;
use certmail::gateway::MailjetGateway;
use certmail::pipeline;
use certmail::roster::Roster;

fn main() -> Result<()> {
    let args = RootArgs::parse();

    match args.command {
        Command::Run(args) => cmd_run(&args),
        Command::Check(args) => cmd_check(&args),
    }
}

fn cmd_run(args: &RunArgs) -> Result<()> {
    init_logging(args.log_file.as_deref(), args.verbose)?;

    let config = Config::load(&args.config)?;
    let roster = Roster::load(&config.roster_path, config.template)?;
    let resolver = Resolver::new(&config.attachments_folder, config.template);
    let gateway = MailjetGateway::new(&config.api_key, &config.api_secret);

    let report = pipeline::run(&config, &roster, &resolver, &gateway);
    println!("{}", report.summary.report_text());
    Ok(())
}

fn cmd_check(args: &CheckArgs) -> Result<()> {
    init_logging(None, args.verbose)?;

    let config = Config::load(&args.config)?;
    let roster = Roster::load(&config.roster_path, config.template)?;
    let resolver = Resolver::new(&config.attachments_folder, config.template);

    let report = pipeline::audit(&config, &roster, &resolver);
    println!(
        "Rows: {}\nReady: {}\nInvalid: {}\nMissing files: {}",
        report.total, report.ready, report.invalid, report.missing_files
    );
    Ok(())
}

// Line-oriented audit trail: timestamp, level, message. The file writer
// appends, so reruns extend the same log.
fn init_logging(log_file: Option<&Path>, verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Arc::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}
