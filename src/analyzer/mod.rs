//! Database analysis orchestration
//!
//! Ties the pieces together: for each collection of a database, take an
//! exact count, run the extraction strategy chain, optionally enrich the
//! result, and collect everything into one [`DatabaseSchema`] artifact.
//!
//! # Example
//!
//! ```ignore
//! use mongolens::analyzer::{AnalysisConfig, SchemaAnalyzer};
//!
//! let analyzer = SchemaAnalyzer::new(AnalysisConfig::default())?;
//! let database = analyzer.analyze_database(&source, None, None).await?;
//! println!("{} collections analyzed", database.collections.len());
//! ```

pub mod config;
pub mod error;
pub mod executor;

pub use config::AnalysisConfig;
pub use error::{AnalyzeError, AnalyzeResult};
pub use executor::SchemaAnalyzer;
