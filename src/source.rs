use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use crate::entity::{Entity, validate};

/// Parses an entity list. Accepts either a bare array or an object carrying
/// an `entities` array.
pub fn parse_entities(raw: &str) -> Result<Vec<Entity>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid entity JSON")?;

    let list = match parsed {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("entities") {
            Some(Value::Array(items)) => items,
            Some(_) => return Err(anyhow!("`entities` must be an array")),
            None => return Err(anyhow!("entity JSON object has no `entities` array")),
        },
        _ => return Err(anyhow!("unexpected JSON type for entity list")),
    };

    let mut entities = Vec::with_capacity(list.len());
    for (index, value) in list.into_iter().enumerate() {
        let entity = serde_json::from_value::<Entity>(value)
            .with_context(|| format!("invalid entity at position {index}"))?;
        entities.push(entity);
    }

    validate(&entities).context("entity list failed validation")?;
    Ok(entities)
}

pub fn load_entities(path: &Path) -> Result<Vec<Entity>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read entity file {}", path.display()))?;
    let entities = parse_entities(&raw)
        .with_context(|| format!("failed to parse entity file {}", path.display()))?;
    tracing::info!(path = %path.display(), count = entities.len(), "loaded entities");
    Ok(entities)
}
