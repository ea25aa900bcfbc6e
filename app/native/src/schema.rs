//! JSON Schema for the configuration file.

use crate::config::SinkConfig;

/// Generates a JSON Schema for the pasta sink configuration.
#[must_use]
pub fn generate_schema() -> schemars::Schema {
    let mut schema = schemars::schema_for!(SinkConfig);

    if let Some(obj) = schema.as_object_mut() {
        obj.insert(
            "$id".to_string(),
            serde_json::json!(
                "https://raw.githubusercontent.com/pasta-sink/pasta-sink/main/pasta-sink.schema.json"
            ),
        );
    }

    schema
}

/// Generates a pretty-printed JSON Schema string.
#[must_use]
pub fn generate_schema_json() -> String {
    serde_json::to_string_pretty(&generate_schema()).unwrap_or_default()
}
