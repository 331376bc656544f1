//! Relayout CLI - Meson install script that reorganizes the staged tree

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use relayout::core::env::EnvError;
use relayout::ops::default_rewriter;
use relayout::util::config::{project_config_path, LayoutConfig};
use relayout::util::diagnostic::{emit, suggestions, Diagnostic};
use relayout::{HostPlatform, InstallEnv, Product, Reorganizer, ReorganizeReport};

mod cli;

use cli::Cli;

const RULE: &str = "====================================================";

fn main() {
    if let Err(e) = run() {
        let suggestion = if e.downcast_ref::<EnvError>().is_some() {
            suggestions::RUN_FROM_INSTALL
        } else {
            suggestions::CHECK_PERMISSIONS
        };
        let diag = Diagnostic::from_error(&e).with_suggestion(suggestion);
        emit(&diag, std::io::stderr().is_terminal());
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("relayout=debug")
    } else {
        EnvFilter::new("relayout=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let Some(env) = InstallEnv::from_env()? else {
        tracing::debug!("DESTDIR is not set; nothing to reorganize");
        return Ok(());
    };

    let mut config = match &cli.config {
        Some(path) => LayoutConfig::load(path)?,
        None => LayoutConfig::load_or_default(&project_config_path(&env.source_root)),
    };
    if let Some(name) = cli.product {
        config.product.name = name;
    }

    let product = Product::new(config.product.name.clone(), HostPlatform::current());

    tracing::info!("");
    tracing::info!("{}", RULE);
    tracing::info!("Executing Custom Install Script");
    tracing::info!("{}", RULE);
    for line in env.to_string().lines() {
        tracing::info!("{}", line);
    }
    tracing::info!("PRODUCT_BIN: {}", product.executable());

    let rewriter = default_rewriter(product.platform());
    let reorganizer = Reorganizer::new(&env, &config, product, &*rewriter);

    if cli.dry_run {
        let plan = reorganizer.plan();
        tracing::info!("STRATEGY: {}", plan.strategy);
        tracing::info!("HEADERS: {}", plan.headers_dest.display());
        tracing::info!("{}", RULE);
        return Ok(());
    }

    let report = reorganizer.run()?;
    print_summary(&report);
    tracing::info!("{}", RULE);

    Ok(())
}

fn print_summary(report: &ReorganizeReport) {
    tracing::info!(
        "relocated {} entries, removed {} directories, merged {} headers",
        report.relocated.len(),
        report.removed.len(),
        report.merged.len()
    );
    if let Some(ref console) = report.console {
        tracing::info!("console executable: {}", console.display());
    }
    if let Some(ref change) = report.load_path {
        tracing::debug!("load path: {} -> {}", change.old, change.new);
    }
}
