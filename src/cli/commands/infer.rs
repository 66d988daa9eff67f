//! CLI command for structural inference over one collection

use std::path::PathBuf;

use crate::analyzer::{AnalysisConfig, SchemaAnalyzer};
use crate::cli::error::CliError;
use crate::inference::InferenceConfig;
use crate::source::ExportDirSource;

/// Arguments for the `infer` command
pub struct InferArgs {
    /// Path to the export directory
    pub source: PathBuf,
    /// Collection to analyze
    pub collection: String,
    /// Sample size for inference
    pub sample_size: usize,
    /// Maximum depth for nested documents
    pub max_depth: usize,
    /// Output format (json, yaml)
    pub format: String,
    /// Output file path (stdout if not provided)
    pub output: Option<PathBuf>,
}

/// Handle the `infer` command
pub async fn handle_infer(args: &InferArgs) -> Result<(), CliError> {
    let source = ExportDirSource::open(&args.source)
        .await
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;

    let inference = InferenceConfig::builder()
        .sample_size(args.sample_size)
        .max_depth(args.max_depth)
        .build();

    let config = AnalysisConfig::new().with_inference(inference);
    let analyzer =
        SchemaAnalyzer::new(config).map_err(|e| CliError::ConfigError(e.to_string()))?;

    eprintln!("Inferring schema for collection '{}'...", args.collection);
    eprintln!("  Sample size: {}", args.sample_size);
    eprintln!("  Max depth: {}", args.max_depth);

    let schema = analyzer
        .analyze_collection(&source, &args.collection)
        .await
        .map_err(|e| CliError::AnalysisError(e.to_string()))?;

    eprintln!();
    eprintln!("Inference complete:");
    eprintln!("  Documents in collection: {}", schema.total_documents);
    eprintln!("  Fields discovered: {}", schema.field_count());

    let output_str = match args.format.as_str() {
        "yaml" => serde_yaml::to_string(&schema)
            .map_err(|e| CliError::AnalysisError(e.to_string()))?,
        _ => serde_json::to_string_pretty(&schema)
            .map_err(|e| CliError::AnalysisError(e.to_string()))?,
    };

    if let Some(output_path) = &args.output {
        std::fs::write(output_path, &output_str)
            .map_err(|e| CliError::FileWriteError(output_path.clone(), e.to_string()))?;
        eprintln!();
        eprintln!("Schema written to: {}", output_path.display());
    } else {
        println!("{}", output_str);
    }

    Ok(())
}
