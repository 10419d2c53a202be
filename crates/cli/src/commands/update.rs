//! Update and recheck commands - run the check loop over the registry

use anyhow::{Context, Result};
use pagewatch_adapters::{
    Html2textRenderer, InferSniffer, ReqwestFetcher, ScraperParser, registry::FsRegistryStore,
};
use pagewatch_domain::{
    CheckOutcome, CheckStatus, PageEntry, RegistryStore, SystemClock,
    usecases::{CheckLoop, CheckLoopConfig},
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::args::UpdateArgs;
use crate::config::AppConfig;

pub async fn execute(args: UpdateArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let store = open_store(&config)?;
    let registry = registry_entries(store.as_ref(), &config).await?;

    if registry.is_empty() {
        println!("No pages registered. Use `pagewatch add` or seed [[pages]] in the config.");
        return Ok(());
    }

    tracing::info!(
        pages = registry.len(),
        mode = %config.general.mode,
        dry_run = args.dry_run,
        "Starting update cycle"
    );

    let check_loop = build_check_loop(&config, store, args.dry_run)?;
    let outcomes = check_loop.update(&registry).await?;
    report(&outcomes);

    Ok(())
}

pub async fn recheck(config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let store = open_store(&config)?;
    let registry = registry_entries(store.as_ref(), &config).await?;

    if registry.is_empty() {
        println!("No pages registered.");
        return Ok(());
    }

    tracing::info!(pages = registry.len(), "Rebaselining cache");

    let check_loop = build_check_loop(&config, store, false)?;
    let outcomes = check_loop.recheck(&registry).await?;

    for (name, outcome) in &outcomes {
        if let CheckOutcome::Failed { error } = outcome {
            println!("{}: {}", name, error);
        }
    }

    Ok(())
}

pub(crate) fn open_store(config: &AppConfig) -> Result<Arc<FsRegistryStore>> {
    let store = FsRegistryStore::new(&config.general.cache_dir).with_context(|| {
        format!(
            "Failed to open cache directory {}",
            config.general.cache_dir.display()
        )
    })?;
    Ok(Arc::new(store))
}

/// Current registry for this run: stored entries (minus removed ones) plus
/// config seeds for URLs not yet known.
pub(crate) async fn registry_entries(
    store: &FsRegistryStore,
    config: &AppConfig,
) -> Result<Vec<PageEntry>> {
    let resources = store
        .load()
        .await
        .context("Failed to load cached registry")?;

    let mut entries: Vec<PageEntry> = resources
        .iter()
        .filter(|r| r.status != CheckStatus::Removed)
        .map(|r| PageEntry {
            name: r.name.clone(),
            url: r.url.clone(),
        })
        .collect();

    for seed in &config.pages {
        if !entries.iter().any(|e| e.url == seed.url) {
            entries.push(PageEntry {
                name: seed.name.clone(),
                url: seed.url.clone(),
            });
        }
    }

    Ok(entries)
}

fn build_check_loop(
    config: &AppConfig,
    store: Arc<FsRegistryStore>,
    dry_run: bool,
) -> Result<
    CheckLoop<ReqwestFetcher, ScraperParser, InferSniffer, Html2textRenderer, FsRegistryStore, SystemClock>,
> {
    let mode = config.check_mode()?;

    Ok(CheckLoop::new(
        Arc::new(ReqwestFetcher::new(Duration::from_secs(
            config.general.timeout_secs,
        ))),
        Arc::new(ScraperParser),
        Arc::new(InferSniffer),
        Arc::new(Html2textRenderer::new(config.general.render_width)),
        store,
        Arc::new(SystemClock),
        CheckLoopConfig { mode, dry_run },
    ))
}

fn report(outcomes: &[(String, CheckOutcome)]) {
    let mut updated = 0usize;
    let mut failed = 0usize;

    for (name, outcome) in outcomes {
        match outcome {
            CheckOutcome::Updated { summary, .. } => {
                updated += 1;
                println!("=== {}", name);
                if summary.is_empty() {
                    println!("(changed, nothing new to report)");
                } else {
                    println!("{}", summary);
                }
            }
            CheckOutcome::Unchanged { .. } => {}
            CheckOutcome::Failed { error } => {
                failed += 1;
                println!("=== {} (failed: {})", name, error);
            }
        }
    }

    println!(
        "{} checked, {} updated, {} failed",
        outcomes.len(),
        updated,
        failed
    );
}
