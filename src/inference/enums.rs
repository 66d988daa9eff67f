//! Bounded string-set detection
//!
//! A string field is promoted to an enum when its observed values form a
//! small, repeating set. The core rule works on cardinalities alone; the
//! unifier applies an additional threshold tied to the configured sample size
//! so a shallow sample cannot promote high-cardinality fields.

/// Most distinct values an enum may carry
pub const MAX_ENUM_VALUES: usize = 10;

/// Share of the configured sample size the distinct-value count must stay
/// under when classifying across documents
pub const ENUM_SAMPLE_RATIO: f64 = 0.5;

/// Core rule: between 1 and [`MAX_ENUM_VALUES`] distinct values, with at
/// least one repeat among the occurrences.
pub fn qualifies(distinct: usize, occurrences: usize) -> bool {
    (1..=MAX_ENUM_VALUES).contains(&distinct) && distinct < occurrences
}

/// Unifier rule: the core rule plus `distinct < ratio x sample_size`, where
/// `sample_size` is the configured sampling limit rather than the number of
/// documents actually drawn.
pub fn qualifies_within_sample(distinct: usize, occurrences: usize, sample_size: usize) -> bool {
    qualifies(distinct, occurrences) && (distinct as f64) < ENUM_SAMPLE_RATIO * sample_size as f64
}

/// Collect distinct values in first-observed order.
pub fn distinct_values<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut distinct: Vec<String> = Vec::new();
    for value in values {
        if !distinct.iter().any(|v| v == value) {
            distinct.push(value.to_string());
        }
    }
    distinct
}

/// Classify one value sequence under the core rule, returning the distinct
/// values in first-observed order when it qualifies.
pub fn classify<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<Vec<String>> {
    let values: Vec<&str> = values.into_iter().collect();
    let distinct = distinct_values(values.iter().copied());
    qualifies(distinct.len(), values.len()).then_some(distinct)
}
