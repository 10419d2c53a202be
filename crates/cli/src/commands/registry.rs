//! Registry editing commands: add, delete, rename, import, export, list,
//! print

use anyhow::{Context, Result, bail};
use pagewatch_domain::{CheckStatus, PageEntry, RegistryStore, Resource, ResourceId};
use std::path::PathBuf;
use time::format_description::well_known::Rfc3339;

use crate::args::{AddArgs, DeleteArgs, ExportArgs, ImportArgs, ListArgs, PrintArgs, RenameArgs};
use crate::commands::update::open_store;
use crate::config::AppConfig;

pub async fn add(args: AddArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let store = open_store(&config)?;

    let mut resources = store.load().await.context("Failed to load registry")?;

    let id = ResourceId::from_url(&args.url);
    if let Some(position) = resources.iter().position(|r| r.id == id) {
        if resources[position].status != CheckStatus::Removed {
            bail!(
                "URL already registered as '{}': {}",
                resources[position].name,
                resources[position].url
            );
        }
        // A removed leftover only holds the slot; re-adding starts fresh.
        resources.remove(position);
    }
    if resources.iter().any(|r| r.name == args.name) {
        bail!("Name '{}' is already in use", args.name);
    }

    resources.push(Resource::new(&args.name, &args.url));
    store.save(&resources).await.context("Failed to save registry")?;

    println!("Added {} ({})", args.name, args.url);
    Ok(())
}

pub async fn delete(args: DeleteArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let store = open_store(&config)?;

    let mut resources = store.load().await.context("Failed to load registry")?;

    let Some(position) = resources.iter().position(|r| r.name == args.name) else {
        bail!("No page named '{}'", args.name);
    };

    let removed = resources.remove(position);
    if let Err(error) = store.delete_snapshot(&removed.id).await {
        tracing::warn!(%error, "Failed to delete cached snapshot");
    }
    store.save(&resources).await.context("Failed to save registry")?;

    println!("Deleted {} ({})", removed.name, removed.url);
    Ok(())
}

pub async fn rename(args: RenameArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let store = open_store(&config)?;

    let mut resources = store.load().await.context("Failed to load registry")?;

    if resources.iter().any(|r| r.name == args.to) {
        bail!("Name '{}' is already in use", args.to);
    }
    let Some(resource) = resources.iter_mut().find(|r| r.name == args.from) else {
        bail!("No page named '{}'", args.from);
    };

    resource.name = args.to.clone();
    store.save(&resources).await.context("Failed to save registry")?;

    println!("Renamed {} -> {}", args.from, args.to);
    Ok(())
}

/// Replace the registry with the imported entries. Cached state of
/// entries that survive (same URL) is kept; entries absent from the
/// import are marked removed and their snapshots dropped.
pub async fn import(args: ImportArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let store = open_store(&config)?;

    let text = std::fs::read_to_string(&args.path)
        .with_context(|| format!("Failed to read {}", args.path.display()))?;
    let entries: Vec<PageEntry> =
        serde_json::from_str(&text).context("Import file must be a JSON list of {name, url}")?;

    let cached = store.load().await.context("Failed to load registry")?;
    let mut by_id: std::collections::HashMap<ResourceId, Resource> =
        cached.into_iter().map(|r| (r.id.clone(), r)).collect();

    let mut resources = Vec::with_capacity(entries.len());
    let mut seen = std::collections::HashSet::new();
    for entry in &entries {
        let id = ResourceId::from_url(&entry.url);
        if !seen.insert(id.clone()) {
            tracing::warn!(name = %entry.name, url = %entry.url, "Duplicate URL in import file, skipping");
            continue;
        }
        let mut resource = by_id
            .remove(&id)
            .unwrap_or_else(|| Resource::new(&entry.name, &entry.url));
        resource.name = entry.name.clone();
        // Re-importing a previously removed URL puts it back under watch.
        if resource.status == CheckStatus::Removed {
            resource.status = CheckStatus::Pending;
        }
        resources.push(resource);
    }

    let imported = resources.len();
    let mut dropped = 0usize;
    for (id, mut leftover) in by_id {
        if let Err(error) = store.delete_snapshot(&id).await {
            tracing::warn!(%error, "Failed to delete cached snapshot");
        }
        leftover.status = CheckStatus::Removed;
        resources.push(leftover);
        dropped += 1;
    }

    store.save(&resources).await.context("Failed to save registry")?;

    println!("Imported {} entries ({} removed)", imported, dropped);
    Ok(())
}

pub async fn export(args: ExportArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let store = open_store(&config)?;

    let resources = store.load().await.context("Failed to load registry")?;
    let entries: Vec<PageEntry> = resources
        .iter()
        .filter(|r| r.status != CheckStatus::Removed)
        .map(|r| PageEntry {
            name: r.name.clone(),
            url: r.url.clone(),
        })
        .collect();

    let json = serde_json::to_string_pretty(&entries)?;
    std::fs::write(&args.path, json)
        .with_context(|| format!("Failed to write {}", args.path.display()))?;

    println!("Exported {} entries to {}", entries.len(), args.path.display());
    Ok(())
}

pub async fn list(args: ListArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let store = open_store(&config)?;

    let resources = store.load().await.context("Failed to load registry")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resources)?);
        return Ok(());
    }

    for resource in &resources {
        let updated = resource
            .updated_at
            .and_then(|t| t.format(&Rfc3339).ok())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<24} {:<48} {:<8} {}",
            resource.name, resource.url, resource.status, updated
        );
    }

    Ok(())
}

pub async fn print(args: PrintArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let store = open_store(&config)?;

    let resources = store.load().await.context("Failed to load registry")?;

    let selected: Vec<&Resource> = match &args.name {
        Some(name) => {
            let Some(resource) = resources.iter().find(|r| r.name == *name) else {
                bail!("No page named '{}'", name);
            };
            vec![resource]
        }
        None => resources
            .iter()
            .filter(|r| r.status != CheckStatus::Removed)
            .collect(),
    };

    for resource in selected {
        println!("## {}", resource.name);
        if resource.log.is_empty() {
            println!("(no changes recorded)");
        } else {
            println!("{}", resource.log);
        }
        println!();
    }

    Ok(())
}
