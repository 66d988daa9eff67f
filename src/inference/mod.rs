//! Schema inference over sampled documents
//!
//! This module turns raw sampled documents into a typed collection schema:
//! walking flattens each document into dotted-path observations, and
//! unification merges the observations into one field entry per path.
//!
//! ## Features
//!
//! - **Shape recognition** - Extended-JSON and buffer-shaped identifier, date,
//!   binary and numeric wrapper values stay atomic
//! - **Enum promotion** - Small repeating string sets become enums
//! - **Required tracking** - A field is required only when it resolves
//!   non-null in every sampled document
//! - **Bounded depth** - Nesting past the configured depth degrades to an
//!   unknown type instead of failing
//!
//! ## Example
//!
//! ```rust
//! use mongolens::inference::{FieldObservations, InferenceConfig, SchemaUnifier, walk_document};
//! use serde_json::json;
//!
//! let docs = vec![
//!     json!({"_id": {"$oid": "665f1f77bcf86cd799439011"}, "status": "active"}),
//!     json!({"_id": {"$oid": "665f1f77bcf86cd799439012"}, "status": "inactive"}),
//!     json!({"_id": {"$oid": "665f1f77bcf86cd799439013"}, "status": "active"}),
//! ];
//!
//! let config = InferenceConfig::default();
//! let mut observations = FieldObservations::new();
//! for doc in &docs {
//!     walk_document(doc.as_object().unwrap(), &mut observations, config.max_depth);
//! }
//!
//! let schema = SchemaUnifier::new(config).unify(&observations, &docs, "users", 3);
//! assert!(schema.fields["status"].required);
//! ```

mod config;
mod infer;
mod unify;
mod walker;

pub mod enums;
pub mod shapes;

pub use config::{DEFAULT_MAX_DEPTH, DEFAULT_SAMPLE_SIZE, InferenceConfig, InferenceConfigBuilder};
pub use infer::{infer_bounded, infer_type};
pub use unify::{SchemaUnifier, resolve_path};
pub use walker::{FieldObservations, PathObservations, walk_document};
