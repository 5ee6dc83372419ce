//! Field mappings between the local schema and upstream ERP fields
//!
//! A [`FieldMapping`] is built once per entity when the registry is constructed and
//! answers lookups in both directions. Construction enforces that a local field appears
//! only once and that an upstream field feeds at most one local field, so the reverse
//! lookup used by the transformer is a function.

use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldMappingError {
    #[error("local field '{0}' is mapped more than once")]
    DuplicateLocalField(String),

    #[error("upstream field '{0}' feeds more than one local field")]
    DuplicateUpstreamField(String),

    #[error("field names must not be empty")]
    EmptyFieldName,
}

/// Ordered `local field -> upstream field` mapping with a prebuilt reverse index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    /// (local, upstream) in declaration order
    pairs: Vec<(String, String)>,
    by_local: HashMap<String, usize>,
    by_upstream: HashMap<String, usize>,
}

impl FieldMapping {
    pub fn new<I, L, U>(pairs: I) -> Result<Self, FieldMappingError>
    where
        I: IntoIterator<Item = (L, U)>,
        L: Into<String>,
        U: Into<String>,
    {
        let mut mapping = Self {
            pairs: Vec::new(),
            by_local: HashMap::new(),
            by_upstream: HashMap::new(),
        };

        for (local, upstream) in pairs {
            let local = local.into();
            let upstream = upstream.into();

            if local.is_empty() || upstream.is_empty() {
                return Err(FieldMappingError::EmptyFieldName);
            }
            if mapping.by_local.contains_key(&local) {
                return Err(FieldMappingError::DuplicateLocalField(local));
            }
            if mapping.by_upstream.contains_key(&upstream) {
                return Err(FieldMappingError::DuplicateUpstreamField(upstream));
            }

            let index = mapping.pairs.len();
            mapping.by_local.insert(local.clone(), index);
            mapping.by_upstream.insert(upstream.clone(), index);
            mapping.pairs.push((local, upstream));
        }

        Ok(mapping)
    }

    /// Local field fed by `upstream`, if any
    pub fn local_for(&self, upstream: &str) -> Option<&str> {
        self.by_upstream
            .get(upstream)
            .map(|&i| self.pairs[i].0.as_str())
    }

    /// Upstream field feeding `local`, if any
    pub fn upstream_for(&self, local: &str) -> Option<&str> {
        self.by_local.get(local).map(|&i| self.pairs[i].1.as_str())
    }

    pub fn local_fields(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(local, _)| local.as_str())
    }

    /// (local, upstream) pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(local, upstream)| (local.as_str(), upstream.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Binding of one logical entity to its upstream resource and field set.
///
/// Immutable once built; owned by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMapping {
    logical_name: String,
    service_namespace: String,
    resource_collection: String,
    field_mapping: FieldMapping,
}

impl EntityMapping {
    pub fn new(
        logical_name: impl Into<String>,
        service_namespace: impl Into<String>,
        resource_collection: impl Into<String>,
        field_mapping: FieldMapping,
    ) -> Self {
        Self {
            logical_name: logical_name.into(),
            service_namespace: service_namespace.into(),
            resource_collection: resource_collection.into(),
            field_mapping,
        }
    }

    pub fn logical_name(&self) -> &str {
        &self.logical_name
    }

    pub fn service_namespace(&self) -> &str {
        &self.service_namespace
    }

    pub fn resource_collection(&self) -> &str {
        &self.resource_collection
    }

    pub fn field_mapping(&self) -> &FieldMapping {
        &self.field_mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_both_directions() {
        let mapping = FieldMapping::new([
            ("invoice_number", "InvoiceNumber"),
            ("gross_amount", "GrossAmount"),
        ])
        .unwrap();

        assert_eq!(mapping.local_for("GrossAmount"), Some("gross_amount"));
        assert_eq!(mapping.upstream_for("invoice_number"), Some("InvoiceNumber"));
        assert_eq!(mapping.local_for("Unmapped"), None);
        assert_eq!(mapping.len(), 2);
    }

    #[test]
    fn test_declaration_order_is_kept() {
        let mapping =
            FieldMapping::new([("zeta", "Z"), ("alpha", "A"), ("mid", "M")]).unwrap();
        let locals: Vec<&str> = mapping.local_fields().collect();
        assert_eq!(locals, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_duplicate_local_field_rejected() {
        let err = FieldMapping::new([("amount", "NetAmount"), ("amount", "GrossAmount")])
            .unwrap_err();
        assert_eq!(
            err,
            FieldMappingError::DuplicateLocalField("amount".to_string())
        );
    }

    #[test]
    fn test_duplicate_upstream_field_rejected() {
        let err =
            FieldMapping::new([("net", "Amount"), ("gross", "Amount")]).unwrap_err();
        assert_eq!(
            err,
            FieldMappingError::DuplicateUpstreamField("Amount".to_string())
        );
    }

    #[test]
    fn test_empty_field_name_rejected() {
        assert_eq!(
            FieldMapping::new([("", "Amount")]).unwrap_err(),
            FieldMappingError::EmptyFieldName
        );
    }
}
