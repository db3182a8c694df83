use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use partuniverse_core::{DomainError, UserId};
use partuniverse_dashboard::{default_registry, ledger_from_json, DashboardError};
use partuniverse_inventory::{
    InMemoryStore, InventoryLedger, LedgerConfig, Part, StorageItem, StoragePlace, StorageType,
    Transaction, Unit,
};

fn snapshot_json() -> String {
    let ledger = InventoryLedger::new(InMemoryStore::new());
    let user = UserId::new();

    let st = StorageType::new("box");
    let place = StoragePlace::new("Box 1", st.id);
    let screws = Part::new("Screw M3", "M3-10", user)
        .with_unit(Unit::Piece)
        .with_min_stock(dec!(100));
    let wire = Part::new("Wire red", "W-RED", user)
        .with_unit(Unit::Meters)
        .with_min_stock(dec!(5));
    let screw_box = StorageItem::tracked(screws.id, place.id, dec!(120));
    let wire_box = StorageItem::tracked(wire.id, place.id, dec!(20));

    ledger.save_storage_type(st).unwrap();
    ledger.save_storage_place(place).unwrap();
    ledger.save_part(screws).unwrap();
    ledger.save_part(wire).unwrap();
    ledger.save_storage_item(screw_box.clone()).unwrap();
    ledger.save_storage_item(wire_box).unwrap();

    ledger
        .post_transaction(Transaction::new("assembly", screw_box.id, dec!(-40), user))
        .unwrap();

    serde_json::to_string(&ledger.store().snapshot().unwrap()).unwrap()
}

#[test]
fn dashboard_renders_from_snapshot() {
    let ledger = ledger_from_json(&snapshot_json(), LedgerConfig::default()).unwrap();
    let registry = default_registry(&ledger);
    assert_eq!(
        registry.ids(),
        vec!["most_recent_transactions", "parts_below_minimum"]
    );

    let rendered = registry.render_all().unwrap();

    let recent = rendered[0].content.as_array().unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0]["subject"], "assembly");
    assert_eq!(recent[0]["storage_item"], "Screw M3; Box 1");

    let shortages = rendered[1].content.as_array().unwrap();
    assert_eq!(shortages.len(), 1);
    assert_eq!(shortages[0]["sku"], "M3-10");
    let on_stock: Decimal = serde_json::from_value(shortages[0]["on_stock"].clone()).unwrap();
    assert_eq!(on_stock, dec!(80));
}

#[test]
fn malformed_snapshot_is_rejected() {
    let err = ledger_from_json("{not json", LedgerConfig::default()).err().unwrap();
    assert!(matches!(err, DashboardError::Json(_)));
}

#[test]
fn cyclic_snapshot_is_rejected() {
    let st = StorageType::new("box");
    let mut a = StoragePlace::new("a", st.id);
    let b = StoragePlace::new("b", st.id).with_parent(a.id);
    a.parent = Some(a.id);
    let raw = serde_json::json!({
        "storage_types": [st],
        "storage_places": [a, b],
    })
    .to_string();

    let err = ledger_from_json(&raw, LedgerConfig::default()).err().unwrap();
    assert!(matches!(
        err,
        DashboardError::Domain(DomainError::CircleDetected(_))
    ));
}
