//! CLI command for a full database analysis run

use std::path::PathBuf;

use crate::analyzer::{AnalysisConfig, AnalyzeError, SchemaAnalyzer};
use crate::cli::error::CliError;
use crate::cli::output::{format_analysis_summary, format_collection_detail};
use crate::enrich::{CollectionEnricher, FieldEnricher, OllamaClient, TextGenerator};
use crate::source::ExportDirSource;
use crate::store::{ArtifactStore, FileArtifactStore};

/// Arguments for the `analyze` command
pub struct AnalyzeArgs {
    /// Path to the export directory
    pub source: PathBuf,
    /// Optional TOML configuration file
    pub config: Option<PathBuf>,
    /// Directory to persist the analysis artifact into
    pub store: Option<PathBuf>,
    /// Disable enrichment regardless of configuration
    pub no_enrich: bool,
    /// Print the per-field detail for every collection
    pub detail: bool,
}

/// Handle the `analyze` command
pub async fn handle_analyze(args: &AnalyzeArgs) -> Result<(), CliError> {
    let mut config = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| CliError::FileReadError(path.clone(), e.to_string()))?;
            AnalysisConfig::from_toml_str(&content).map_err(CliError::ConfigError)?
        }
        None => AnalysisConfig::default(),
    };

    if args.no_enrich {
        config.enrichment.enabled = false;
    }

    let source = ExportDirSource::open(&args.source)
        .await
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;

    let enricher = if config.enrichment.enabled {
        let client = OllamaClient::from_config(&config.enrichment);
        if !client.is_ready().await {
            eprintln!(
                "Warning: text generation service at {} is not responding",
                client.base_url()
            );
        }
        Some(FieldEnricher::new(client, config.enrichment.clone()))
    } else {
        None
    };

    let store = args.store.as_ref().map(FileArtifactStore::new);

    let analyzer =
        SchemaAnalyzer::new(config).map_err(|e| CliError::ConfigError(e.to_string()))?;

    eprintln!("Analyzing database from {}...", args.source.display());

    let database = match analyzer
        .analyze_database(
            &source,
            enricher.as_ref().map(|e| e as &dyn CollectionEnricher),
            store.as_ref().map(|s| s as &dyn ArtifactStore),
        )
        .await
    {
        Ok(database) => database,
        Err(AnalyzeError::Enrichment { collection, source: cause }) => {
            eprintln!("{}", cause.user_message());
            return Err(CliError::AnalysisError(format!(
                "enrichment failed for collection '{}'",
                collection
            )));
        }
        Err(e) => return Err(CliError::AnalysisError(e.to_string())),
    };

    print!("{}", format_analysis_summary(&database));

    if args.detail {
        for collection in &database.collections {
            print!("{}", format_collection_detail(collection));
        }
    }

    if let Some(path) = &args.store {
        eprintln!();
        eprintln!("Artifact written to: {}", path.display());
    }

    Ok(())
}
