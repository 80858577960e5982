//! `syncmap`: generate mergeable mappings from a Java library's legacy
//! async clients to their synchronous replacements.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use syncmap_artifact::{ArtifactStore, MavenCoordinates, SourceSet};
use syncmap_engine::{build_mapping, merge_mappings};
use syncmap_java::{ClientRole, JavaScanner};
use syncmap_model::{load_mapping, mapping_file_name, save_mapping, ClientMethods};

mod config;

use config::LibraryConfig;

#[derive(Parser)]
#[command(
    name = "syncmap",
    version,
    about = "Map legacy async Java clients to their sync replacements"
)]
struct Cli {
    /// Library-pair configuration file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Directory where mapping documents are written
    #[arg(long, default_value = "mappings")]
    mappings: PathBuf,

    /// Local Maven repository (defaults to ~/.m2/repository)
    #[arg(long)]
    maven_repo: Option<PathBuf>,

    /// Download cache for fetched sources jars
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Remote Maven-layout repository to download from
    #[arg(long, default_value = syncmap_artifact::MAVEN_CENTRAL)]
    repository_url: String,

    /// Log filter (tracing EnvFilter directives)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    let configs = config::load_config(&cli.config)?;
    let store = ArtifactStore::new(cli.maven_repo.clone(), cli.cache_dir.clone())?
        .with_remote_base(cli.repository_url.clone());
    let mut scanner = JavaScanner::new()?;

    let mut missing_clients: Vec<String> = Vec::new();
    let mut failed_pairs = 0usize;

    for library in &configs {
        tracing::info!(library = %library.old_library, "processing library pair");
        if let Err(err) =
            process_library(library, &store, &mut scanner, &cli.mappings, &mut missing_clients)
        {
            // Errors are local to the pair: its mapping file is left as it
            // was, and the remaining pairs still run.
            failed_pairs += 1;
            let chain = format!("{err:#}");
            tracing::error!(
                library = %library.old_library,
                error = %chain,
                "library pair failed"
            );
        }
    }

    if !missing_clients.is_empty() {
        println!(
            "The following async clients were found, but a matching client in the new library was not found:"
        );
        for client in &missing_clients {
            println!("    {client}");
        }
    }

    Ok(if failed_pairs > 0 { 1 } else { 0 })
}

fn process_library(
    library: &LibraryConfig,
    store: &ArtifactStore,
    scanner: &mut JavaScanner,
    mappings_dir: &Path,
    missing_clients: &mut Vec<String>,
) -> Result<()> {
    let mapping_path = mappings_dir.join(mapping_file_name(&library.old_library));

    // Load existing state before touching the network so an acquisition
    // failure can never cost us the persisted file.
    let existing = load_mapping(&mapping_path)?;

    let old_clients = scan_library(store, scanner, &library.old_library, ClientRole::Async)?;

    let mut new_clients = ClientMethods::new();
    if let Some(new_library) = library.new_library.as_deref().filter(|s| !s.is_empty()) {
        new_clients = scan_library(store, scanner, new_library, ClientRole::Sync)?;
    }

    let outcome = build_mapping(
        &library.old_library,
        &old_clients,
        &new_clients,
        &library.client_mappings,
    );
    missing_clients.extend(outcome.missing_clients);

    let merged = match existing {
        Some(mut existing) => {
            merge_mappings(&mut existing, outcome.mapping);
            existing
        }
        None => outcome.mapping,
    };

    save_mapping(&mapping_path, &merged)
        .with_context(|| format!("failed to write {}", mapping_path.display()))?;
    Ok(())
}

fn scan_library(
    store: &ArtifactStore,
    scanner: &mut JavaScanner,
    coordinates: &str,
    role: ClientRole,
) -> Result<ClientMethods> {
    let coordinates: MavenCoordinates = coordinates.parse()?;
    let jar = store
        .locate(&coordinates)
        .with_context(|| format!("failed to acquire sources for {coordinates}"))?;
    let sources = SourceSet::open(jar)?;

    let mut clients = ClientMethods::new();
    for (name, text) in sources.java_sources()? {
        if let Err(err) = scanner.scan(&text, role, &mut clients) {
            // Best-effort scan: one broken file doesn't abort the library.
            tracing::warn!(file = %name, error = %err, "skipping unparseable source file");
        }
    }
    tracing::info!(%coordinates, clients = clients.len(), "scanned library");
    Ok(clients)
}
