//! Upstream -> local record transformation
//!
//! Pure and deterministic. Each upstream key with a reverse-mapping hit is copied
//! verbatim under its local field name; every other key is dropped silently. Output
//! order matches input order.

use mirror_api::{LocalRecord, RawUpstreamRecord};

use crate::mapping::FieldMapping;

pub fn transform(raw_records: Vec<RawUpstreamRecord>, mapping: &FieldMapping) -> Vec<LocalRecord> {
    raw_records
        .into_iter()
        .map(|record| transform_record(record, mapping))
        .collect()
}

pub fn transform_record(record: RawUpstreamRecord, mapping: &FieldMapping) -> LocalRecord {
    record
        .into_iter()
        .filter_map(|(upstream_field, value)| {
            mapping
                .local_for(&upstream_field)
                .map(|local_field| (local_field.to_string(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::EntityMappingRegistry;
    use proptest::prelude::*;
    use serde_json::{json, Value};
    use std::collections::BTreeSet;

    fn record(value: Value) -> RawUpstreamRecord {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {}", other),
        }
    }

    fn invoice_mapping() -> FieldMapping {
        FieldMapping::new([
            ("invoice_number", "InvoiceNumber"),
            ("gross_amount", "GrossAmount"),
            ("currency", "Currency"),
        ])
        .unwrap()
    }

    #[test]
    fn test_maps_known_fields() {
        let out = transform(
            vec![record(json!({"InvoiceNumber": "INV1", "GrossAmount": 100}))],
            &invoice_mapping(),
        );
        assert_eq!(
            out,
            vec![record(json!({"invoice_number": "INV1", "gross_amount": 100}))]
        );
    }

    #[test]
    fn test_drops_unmapped_fields() {
        let out = transform(
            vec![record(json!({
                "InvoiceNumber": "INV2",
                "__metadata": {"uri": "https://erp/BillingService/SalesInvoices('INV2')"},
                "InternalNote": "drop me",
            }))],
            &invoice_mapping(),
        );
        assert_eq!(out, vec![record(json!({"invoice_number": "INV2"}))]);
    }

    #[test]
    fn test_values_copied_verbatim() {
        let out = transform(
            vec![record(json!({
                "InvoiceNumber": null,
                "GrossAmount": "100.50",
                "Currency": {"code": "EUR"},
            }))],
            &invoice_mapping(),
        );
        assert_eq!(
            out,
            vec![record(json!({
                "invoice_number": null,
                "gross_amount": "100.50",
                "currency": {"code": "EUR"},
            }))]
        );
    }

    #[test]
    fn test_order_preserved() {
        let input: Vec<RawUpstreamRecord> = (0..5)
            .map(|i| record(json!({"InvoiceNumber": format!("INV{}", i)})))
            .collect();
        let out = transform(input, &invoice_mapping());
        let numbers: Vec<Value> = out.iter().map(|r| r["invoice_number"].clone()).collect();
        assert_eq!(
            numbers,
            vec![json!("INV0"), json!("INV1"), json!("INV2"), json!("INV3"), json!("INV4")]
        );
    }

    #[test]
    fn test_record_without_mapped_fields_becomes_empty() {
        let out = transform(vec![record(json!({"Other": 1}))], &invoice_mapping());
        assert_eq!(out, vec![LocalRecord::new()]);
    }

    fn arb_upstream_keys() -> impl Strategy<Value = Vec<(String, i64)>> {
        prop::collection::vec(("[A-Za-z]{1,12}", any::<i64>()), 0..20)
    }

    proptest! {
        /// For every registered entity the output keys are exactly the declared local
        /// fields whose upstream source was present in the input.
        #[test]
        fn prop_key_set_is_mapped_subset(
            entity_index in 0usize..10,
            include in prop::collection::vec(any::<bool>(), 10),
            extras in arb_upstream_keys(),
        ) {
            let registry = EntityMappingRegistry::builtin().unwrap();
            let entity = registry.iter().nth(entity_index).unwrap();
            let mapping = entity.field_mapping();

            let mut raw = RawUpstreamRecord::new();
            for (key, value) in &extras {
                raw.insert(key.clone(), json!(value));
            }
            let mut expected = BTreeSet::new();
            for ((_, upstream), keep) in mapping.iter().zip(include.iter().cycle()) {
                if *keep {
                    raw.insert(upstream.to_string(), json!("sample"));
                }
            }
            for key in raw.keys() {
                if let Some(local) = mapping.local_for(key) {
                    expected.insert(local.to_string());
                }
            }

            let out = transform(vec![raw], mapping);
            let keys: BTreeSet<String> = out[0].keys().cloned().collect();
            prop_assert_eq!(&keys, &expected);

            let declared: BTreeSet<&str> = mapping.local_fields().collect();
            prop_assert!(keys.iter().all(|k| declared.contains(k.as_str())));
        }

        #[test]
        fn prop_length_and_order_preserved(count in 0usize..30) {
            let mapping = invoice_mapping();
            let input: Vec<RawUpstreamRecord> = (0..count)
                .map(|i| record(json!({"InvoiceNumber": i, "Noise": "x"})))
                .collect();
            let out = transform(input, &mapping);
            prop_assert_eq!(out.len(), count);
            for (i, rec) in out.iter().enumerate() {
                prop_assert_eq!(&rec["invoice_number"], &json!(i));
            }
        }
    }
}
