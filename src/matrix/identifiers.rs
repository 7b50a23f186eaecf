//! Identifier map validation
//!
//! The display-name -> slug map must be injective. Two names sharing one
//! slug would make their table rows overwrite each other during assembly,
//! so the check runs before any cell is looked at.

use crate::models::Slug;
use std::collections::{BTreeMap, BTreeSet};

/// One slug claimed by two or more display names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateIdentifierError {
    /// Format the map belongs to, when known
    pub format: Option<String>,
    pub identifier: Slug,
    /// Colliding display names, sorted
    pub display_names: Vec<String>,
}

impl std::fmt::Display for DuplicateIdentifierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self
            .display_names
            .iter()
            .map(|n| format!("{:?}", n))
            .collect::<Vec<_>>()
            .join(" and ");
        match &self.format {
            Some(format) => write!(
                f,
                "duplicate slug mapping in {}: {:?} mapped from {}",
                format, self.identifier, names
            ),
            None => write!(
                f,
                "duplicate slug mapping: {:?} mapped from {}",
                self.identifier, names
            ),
        }
    }
}

impl std::error::Error for DuplicateIdentifierError {}

/// A name -> slug map that has passed the injectivity check.
///
/// Read-only after construction; lookups go through [`IdentifierMap::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierMap {
    name_to_slug: BTreeMap<String, Slug>,
}

impl IdentifierMap {
    /// Validate `name_to_slug`, failing on the first slug (in slug order)
    /// claimed by more than one display name.
    pub fn validate(
        name_to_slug: BTreeMap<String, Slug>,
    ) -> Result<Self, DuplicateIdentifierError> {
        let mut claims: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (name, slug) in &name_to_slug {
            claims.entry(slug.as_str()).or_default().push(name.as_str());
        }

        if let Some((slug, names)) = claims.iter().find(|(_, names)| names.len() > 1) {
            return Err(DuplicateIdentifierError {
                format: None,
                identifier: slug.to_string(),
                display_names: names.iter().map(|n| n.to_string()).collect(),
            });
        }

        Ok(Self { name_to_slug })
    }

    /// Same as [`IdentifierMap::validate`], tagging any error with `format`.
    pub fn validate_for(
        format: &str,
        name_to_slug: BTreeMap<String, Slug>,
    ) -> Result<Self, DuplicateIdentifierError> {
        Self::validate(name_to_slug).map_err(|mut e| {
            e.format = Some(format.to_string());
            e
        })
    }

    pub fn resolve(&self, display_name: &str) -> Option<&str> {
        self.name_to_slug.get(display_name).map(String::as_str)
    }

    /// Every known slug, sorted and distinct.
    pub fn slugs(&self) -> Vec<Slug> {
        self.name_to_slug
            .values()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.name_to_slug.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name_to_slug.is_empty()
    }
}
