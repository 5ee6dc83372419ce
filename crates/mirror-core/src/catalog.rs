//! Entity definitions: the compiled-in ERP table and the YAML override format
//!
//! The compiled-in table is the single source of truth for which entities can be
//! synced and how their fields map. An operator may replace it with a YAML file of
//! the same shape:
//!
//! ```yaml
//! entities:
//!   - name: SalesInvoice
//!     service: BillingService
//!     collection: SalesInvoices
//!     fields:
//!       invoice_number: InvoiceNumber
//!       gross_amount: GrossAmount
//! ```

use serde::Deserialize;

/// Definition of one entity before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDefinition {
    pub name: String,
    pub service: String,
    pub collection: String,
    /// (local, upstream) pairs in declaration order
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Deserialize)]
struct DefinitionFile {
    entities: Vec<RawDefinition>,
}

#[derive(Debug, Deserialize)]
struct RawDefinition {
    name: String,
    service: String,
    collection: String,
    // serde_yaml::Mapping keeps document order
    fields: serde_yaml::Mapping,
}

/// Parse a YAML entity table. Field values must be strings.
pub fn parse_definitions(yaml: &str) -> Result<Vec<EntityDefinition>, String> {
    let file: DefinitionFile = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;

    file.entities
        .into_iter()
        .map(|raw| {
            let fields = raw
                .fields
                .into_iter()
                .map(|(local, upstream)| match (local, upstream) {
                    (serde_yaml::Value::String(l), serde_yaml::Value::String(u)) => Ok((l, u)),
                    (l, u) => Err(format!(
                        "entity '{}': field mapping entries must be strings, got {:?}: {:?}",
                        raw.name, l, u
                    )),
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok(EntityDefinition {
                name: raw.name,
                service: raw.service,
                collection: raw.collection,
                fields,
            })
        })
        .collect()
}

struct BuiltinEntity {
    name: &'static str,
    service: &'static str,
    collection: &'static str,
    fields: &'static [(&'static str, &'static str)],
}

const BUILTIN_ENTITIES: &[BuiltinEntity] = &[
    BuiltinEntity {
        name: "SalesOrder",
        service: "SalesOrderService",
        collection: "SalesOrders",
        fields: &[
            ("order_number", "OrderNumber"),
            ("customer_id", "CustomerID"),
            ("customer_name", "CustomerName"),
            ("order_date", "OrderDate"),
            ("requested_delivery_date", "RequestedDeliveryDate"),
            ("status", "OrderStatus"),
            ("net_amount", "NetAmount"),
            ("currency", "Currency"),
            ("sales_region", "SalesRegion"),
        ],
    },
    BuiltinEntity {
        name: "SalesInvoice",
        service: "BillingService",
        collection: "SalesInvoices",
        fields: &[
            ("invoice_number", "InvoiceNumber"),
            ("order_number", "SalesOrderNumber"),
            ("customer_id", "CustomerID"),
            ("invoice_date", "InvoiceDate"),
            ("due_date", "DueDate"),
            ("net_amount", "NetAmount"),
            ("tax_amount", "TaxAmount"),
            ("gross_amount", "GrossAmount"),
            ("currency", "Currency"),
            ("payment_status", "PaymentStatus"),
        ],
    },
    BuiltinEntity {
        name: "PurchaseOrder",
        service: "ProcurementService",
        collection: "PurchaseOrders",
        fields: &[
            ("po_number", "PurchaseOrderNumber"),
            ("supplier_id", "SupplierID"),
            ("order_date", "OrderDate"),
            ("expected_date", "ExpectedDeliveryDate"),
            ("status", "Status"),
            ("total_amount", "TotalAmount"),
            ("currency", "Currency"),
            ("buyer", "Buyer"),
        ],
    },
    BuiltinEntity {
        name: "VendorInvoice",
        service: "PayablesService",
        collection: "VendorInvoices",
        fields: &[
            ("invoice_number", "VendorInvoiceNumber"),
            ("supplier_id", "SupplierID"),
            ("po_number", "PurchaseOrderNumber"),
            ("invoice_date", "InvoiceDate"),
            ("due_date", "DueDate"),
            ("amount", "InvoiceAmount"),
            ("currency", "Currency"),
            ("status", "ApprovalStatus"),
        ],
    },
    BuiltinEntity {
        name: "Inventory",
        service: "InventoryService",
        collection: "StockLevels",
        fields: &[
            ("sku", "MaterialNumber"),
            ("description", "MaterialDescription"),
            ("warehouse", "Warehouse"),
            ("quantity_on_hand", "QuantityOnHand"),
            ("quantity_reserved", "QuantityReserved"),
            ("reorder_point", "ReorderPoint"),
            ("unit_of_measure", "UnitOfMeasure"),
            ("unit_cost", "UnitCost"),
        ],
    },
    BuiltinEntity {
        name: "FinancialEntry",
        service: "GeneralLedgerService",
        collection: "JournalEntries",
        fields: &[
            ("entry_number", "JournalEntryNumber"),
            ("posting_date", "PostingDate"),
            ("account", "GLAccount"),
            ("cost_center", "CostCenter"),
            ("debit", "DebitAmount"),
            ("credit", "CreditAmount"),
            ("currency", "Currency"),
            ("description", "Description"),
        ],
    },
    BuiltinEntity {
        name: "ProductionOrder",
        service: "ManufacturingService",
        collection: "ProductionOrders",
        fields: &[
            ("order_number", "ProductionOrderNumber"),
            ("material", "MaterialNumber"),
            ("planned_quantity", "PlannedQuantity"),
            ("completed_quantity", "ConfirmedQuantity"),
            ("start_date", "ScheduledStart"),
            ("end_date", "ScheduledFinish"),
            ("status", "OrderStatus"),
            ("work_center", "WorkCenter"),
        ],
    },
    BuiltinEntity {
        name: "Shipment",
        service: "LogisticsService",
        collection: "OutboundDeliveries",
        fields: &[
            ("shipment_number", "DeliveryNumber"),
            ("order_number", "SalesOrderNumber"),
            ("carrier", "Carrier"),
            ("ship_date", "ShipDate"),
            ("delivery_date", "ActualDeliveryDate"),
            ("status", "ShippingStatus"),
            ("tracking_number", "TrackingNumber"),
            ("destination", "ShipToCity"),
        ],
    },
    BuiltinEntity {
        name: "Supplier",
        service: "PartnerService",
        collection: "Suppliers",
        fields: &[
            ("supplier_id", "SupplierID"),
            ("name", "SupplierName"),
            ("country", "Country"),
            ("category", "SupplierCategory"),
            ("rating", "Rating"),
            ("payment_terms", "PaymentTerms"),
            ("lead_time_days", "AverageLeadTimeDays"),
            ("active", "IsActive"),
        ],
    },
    BuiltinEntity {
        name: "FreightOrder",
        service: "TransportationService",
        collection: "FreightOrders",
        fields: &[
            ("freight_order_number", "FreightOrderNumber"),
            ("carrier", "Carrier"),
            ("origin", "OriginLocation"),
            ("destination", "DestinationLocation"),
            ("departure_date", "PlannedDeparture"),
            ("arrival_date", "PlannedArrival"),
            ("freight_cost", "FreightCost"),
            ("currency", "Currency"),
            ("status", "ExecutionStatus"),
        ],
    },
];

/// The compiled-in ERP entity table, in registration order.
pub fn builtin_definitions() -> Vec<EntityDefinition> {
    BUILTIN_ENTITIES
        .iter()
        .map(|entity| EntityDefinition {
            name: entity.name.to_string(),
            service: entity.service.to_string(),
            collection: entity.collection.to_string(),
            fields: entity
                .fields
                .iter()
                .map(|(local, upstream)| (local.to_string(), upstream.to_string()))
                .collect(),
        })
        .collect()
}
