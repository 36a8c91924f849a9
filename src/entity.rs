//! Entities supplied by the data source, and the fixed category set.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum Category {
    Founder,
    Investor,
    Executive,
    Advisor,
    Banker,
    Organization,
    /// Bucket for categories outside the known set.
    Uncategorized,
}

impl Category {
    /// Every category in cluster order.
    pub const ALL: [Category; 7] = [
        Self::Founder,
        Self::Investor,
        Self::Executive,
        Self::Advisor,
        Self::Banker,
        Self::Organization,
        Self::Uncategorized,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Founder => "founder",
            Self::Investor => "investor",
            Self::Executive => "executive",
            Self::Advisor => "advisor",
            Self::Banker => "banker",
            Self::Organization => "organization",
            Self::Uncategorized => "uncategorized",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(raw))
    }
}

impl From<String> for Category {
    fn from(raw: String) -> Self {
        Self::parse(&raw).unwrap_or_else(|| {
            tracing::warn!(category = %raw, "unknown entity category, filing as uncategorized");
            Self::Uncategorized
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    pub category: Category,
    #[serde(default)]
    pub affinity_score: f32,
    #[serde(default)]
    pub employer_id: Option<String>,
    #[serde(default)]
    pub transaction_ids: Vec<String>,
}

impl Entity {
    pub fn display_name(&self) -> String {
        match (self.first_name.trim(), self.last_name.trim()) {
            (first, "") => first.to_owned(),
            ("", last) => last.to_owned(),
            (first, last) => format!("{first} {last}"),
        }
    }

    /// Up to two uppercase letters taken from the name parts.
    pub fn initials(&self) -> String {
        let mut initials = String::new();
        for part in [&self.first_name, &self.last_name] {
            if let Some(letter) = part.trim().chars().next() {
                initials.extend(letter.to_uppercase());
            }
        }
        if initials.is_empty() {
            initials.push('?');
        }
        initials
    }

    /// Employer id, ignoring blank values.
    pub fn employer(&self) -> Option<&str> {
        self.employer_id
            .as_deref()
            .map(str::trim)
            .filter(|employer| !employer.is_empty())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntityError {
    #[error("entity at position {0} has an empty id")]
    EmptyId(usize),
    #[error("duplicate entity id: {0}")]
    DuplicateId(String),
}

/// Checks the constraints the graph builder relies on.
pub fn validate(entities: &[Entity]) -> Result<(), EntityError> {
    let mut seen = HashSet::with_capacity(entities.len());
    for (index, entity) in entities.iter().enumerate() {
        if entity.id.trim().is_empty() {
            return Err(EntityError::EmptyId(index));
        }
        if !seen.insert(entity.id.as_str()) {
            return Err(EntityError::DuplicateId(entity.id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn test_entity(id: &str, category: Category, score: f32) -> Entity {
    Entity {
        id: id.to_owned(),
        first_name: id.to_owned(),
        last_name: String::new(),
        title: None,
        company: None,
        category,
        affinity_score: score,
        employer_id: None,
        transaction_ids: Vec::new(),
    }
}
