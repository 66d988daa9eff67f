//! Output formatting for CLI

use crate::models::{DatabaseSchema, EnrichedCollectionSchema, FieldType};

/// Render a field type for terminal display
pub fn display_type(field_type: &FieldType) -> String {
    match field_type {
        FieldType::Array { items } => format!("array<{}>", display_type(items)),
        FieldType::Enum { values } => format!("enum[{}]", values.join(", ")),
        other => other.type_name().to_string(),
    }
}

/// Format the per-collection summary of a finished analysis
pub fn format_analysis_summary(database: &DatabaseSchema) -> String {
    let mut output = String::new();

    output.push_str(&format!("\nDatabase: {}\n", database.database_name));
    output.push_str(&format!(
        "Analyzed: {}\n",
        database.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push_str(&format!("Collections: {}\n", database.collections.len()));

    for collection in &database.collections {
        output.push_str(&format!(
            "  - {}: {} documents, {} fields ({} enriched)\n",
            collection.collection_name,
            collection.total_documents,
            collection.fields.len(),
            collection.enriched_count(),
        ));
    }

    output
}

/// Format the field listing of one collection
pub fn format_collection_detail(collection: &EnrichedCollectionSchema) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "\n{} ({} documents):\n",
        collection.collection_name, collection.total_documents
    ));

    for field in &collection.fields {
        let required = if field.info.required { " (required)" } else { "" };
        output.push_str(&format!(
            "  {}: {}{}\n",
            field.field,
            display_type(&field.info.field_type),
            required
        ));

        if let Some(meta) = &field.enrichment {
            output.push_str(&format!(
                "      [{}/10] {}",
                meta.importance, meta.semantic_meaning
            ));
            if !meta.tags.is_empty() {
                output.push_str(&format!(" (tags: {})", meta.tags.join(", ")));
            }
            output.push('\n');
        }
    }

    output
}
