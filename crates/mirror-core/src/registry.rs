//! Registry of syncable entities
//!
//! Built once at process start (from the compiled-in table or a YAML file) and shared
//! read-only by reference. Tests construct registries with a minimal entity set through
//! [`EntityMappingRegistry::new`].

use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::catalog::{self, EntityDefinition};
use crate::mapping::{EntityMapping, FieldMapping, FieldMappingError};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Entity '{0}' is registered more than once")]
    DuplicateEntity(String),

    #[error("Entity names must not be empty")]
    EmptyName,

    #[error("Invalid field mapping for entity '{entity}': {source}")]
    InvalidMapping {
        entity: String,
        #[source]
        source: FieldMappingError,
    },

    #[error("Invalid entity definition file: {0}")]
    Definition(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Lookup miss. Carries every valid name so the caller can render a helpful error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown entity '{name}'")]
pub struct UnknownEntity {
    pub name: String,
    pub available: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct EntityMappingRegistry {
    entries: Vec<EntityMapping>,
    index: HashMap<String, usize>,
}

impl EntityMappingRegistry {
    pub fn new(entries: impl IntoIterator<Item = EntityMapping>) -> Result<Self, RegistryError> {
        let mut registry = Self {
            entries: Vec::new(),
            index: HashMap::new(),
        };

        for entry in entries {
            let name = entry.logical_name().to_string();
            if name.is_empty() {
                return Err(RegistryError::EmptyName);
            }
            if registry.index.contains_key(&name) {
                return Err(RegistryError::DuplicateEntity(name));
            }
            registry.index.insert(name, registry.entries.len());
            registry.entries.push(entry);
        }

        Ok(registry)
    }

    pub fn from_definitions(
        definitions: impl IntoIterator<Item = EntityDefinition>,
    ) -> Result<Self, RegistryError> {
        let entries = definitions
            .into_iter()
            .map(|definition| {
                let field_mapping = FieldMapping::new(definition.fields).map_err(|source| {
                    RegistryError::InvalidMapping {
                        entity: definition.name.clone(),
                        source,
                    }
                })?;
                Ok(EntityMapping::new(
                    definition.name,
                    definition.service,
                    definition.collection,
                    field_mapping,
                ))
            })
            .collect::<Result<Vec<_>, RegistryError>>()?;

        Self::new(entries)
    }

    /// Registry over the compiled-in ERP entity table
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_definitions(catalog::builtin_definitions())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, RegistryError> {
        let definitions = catalog::parse_definitions(yaml).map_err(RegistryError::Definition)?;
        Self::from_definitions(definitions)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path)?;
        let registry = Self::from_yaml_str(&content)?;
        info!(
            "[EntityMappingRegistry] Loaded {} entities from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    pub fn resolve(&self, entity_name: &str) -> Result<&EntityMapping, UnknownEntity> {
        self.index
            .get(entity_name)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| UnknownEntity {
                name: entity_name.to_string(),
                available: self.list_names(),
            })
    }

    /// All registered logical names in registration order
    pub fn list_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.logical_name().to_string())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityMapping> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(name: &str) -> EntityMapping {
        EntityMapping::new(
            name,
            "TestService",
            "Things",
            FieldMapping::new([("id_local", "Id")]).unwrap(),
        )
    }

    #[test]
    fn test_builtin_registry() {
        let registry = EntityMappingRegistry::builtin().unwrap();
        assert_eq!(registry.len(), 10);
        assert_eq!(
            registry.list_names(),
            vec![
                "SalesOrder",
                "SalesInvoice",
                "PurchaseOrder",
                "VendorInvoice",
                "Inventory",
                "FinancialEntry",
                "ProductionOrder",
                "Shipment",
                "Supplier",
                "FreightOrder",
            ]
        );

        let invoice = registry.resolve("SalesInvoice").unwrap();
        assert_eq!(invoice.service_namespace(), "BillingService");
        assert_eq!(invoice.resource_collection(), "SalesInvoices");
        assert_eq!(
            invoice.field_mapping().local_for("GrossAmount"),
            Some("gross_amount")
        );
    }

    #[test]
    fn test_resolve_miss_lists_every_name() {
        let registry = EntityMappingRegistry::builtin().unwrap();
        let miss = registry.resolve("DoesNotExist").unwrap_err();
        assert_eq!(miss.name, "DoesNotExist");
        assert_eq!(miss.available, registry.list_names());
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let registry = EntityMappingRegistry::builtin().unwrap();
        assert!(registry.resolve("salesinvoice").is_err());
    }

    #[test]
    fn test_duplicate_entity_rejected() {
        let err = EntityMappingRegistry::new([entity("Widget"), entity("Widget")]).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateEntity(name) if name == "Widget"));
    }

    #[test]
    fn test_empty_entity_name_rejected() {
        let err = EntityMappingRegistry::new([entity("")]).unwrap_err();
        assert!(matches!(err, RegistryError::EmptyName));
    }

    #[test]
    fn test_invalid_mapping_names_entity() {
        let yaml = r#"
entities:
  - name: Supplier
    service: PartnerService
    collection: Suppliers
    fields:
      name: SupplierName
      display_name: SupplierName
"#;
        let err = EntityMappingRegistry::from_yaml_str(yaml).unwrap_err();
        match err {
            RegistryError::InvalidMapping { entity, source } => {
                assert_eq!(entity, "Supplier");
                assert_eq!(
                    source,
                    FieldMappingError::DuplicateUpstreamField("SupplierName".to_string())
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_minimal_test_registry() {
        let registry = EntityMappingRegistry::new([entity("Widget")]).unwrap();
        assert_eq!(registry.list_names(), vec!["Widget"]);
        assert!(registry.resolve("Widget").is_ok());
    }
}
