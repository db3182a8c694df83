use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use partuniverse_core::UserId;
use partuniverse_inventory::{
    InMemoryStore, InventoryLedger, Part, StorageItem, StoragePlace, StorageType, Transaction,
    Unit,
};
use rust_decimal::Decimal;

fn setup(items: usize) -> (InventoryLedger<InMemoryStore>, Part, Vec<StorageItem>, UserId) {
    let ledger = InventoryLedger::new(InMemoryStore::new());
    let user = UserId::new();

    let st = StorageType::new("shelf");
    let part = Part::new("bench part", "BENCH-1", user).with_unit(Unit::Piece);
    ledger.save_storage_type(st.clone()).unwrap();
    ledger.save_part(part.clone()).unwrap();

    let mut storage_items = Vec::with_capacity(items);
    for i in 0..items {
        let place = StoragePlace::new(format!("slot {i}"), st.id);
        ledger.save_storage_place(place.clone()).unwrap();
        let item = StorageItem::tracked(part.id, place.id, Decimal::from(i as i64));
        ledger.save_storage_item(item.clone()).unwrap();
        storage_items.push(item);
    }

    (ledger, part, storage_items, user)
}

fn bench_post_transaction(c: &mut Criterion) {
    let (ledger, _part, items, user) = setup(1);
    let item_id = items[0].id;

    let mut group = c.benchmark_group("post_transaction");
    group.throughput(Throughput::Elements(1));

    // alternate signs so the balance stays inside the storable range
    let mut amount = Decimal::ONE;
    group.bench_function("new", |b| {
        b.iter(|| {
            amount = -amount;
            let tx = Transaction::new("bench", item_id, amount, user);
            black_box(ledger.post_transaction(tx).unwrap())
        })
    });

    let mut edited = Transaction::new("bench edit", item_id, Decimal::ONE, user);
    ledger.post_transaction(edited.clone()).unwrap();
    group.bench_function("edit", |b| {
        b.iter(|| {
            edited.amount = if edited.amount == Decimal::ONE {
                Decimal::TWO
            } else {
                Decimal::ONE
            };
            black_box(ledger.post_transaction(edited.clone()).unwrap())
        })
    });

    group.finish();
}

fn bench_total_on_stock(c: &mut Criterion) {
    let mut group = c.benchmark_group("total_on_stock");

    for items in [1usize, 10, 100] {
        let (ledger, part, _items, _user) = setup(items);
        group.throughput(Throughput::Elements(items as u64));
        group.bench_with_input(BenchmarkId::from_parameter(items), &part.id, |b, part_id| {
            b.iter(|| black_box(ledger.total_on_stock(part_id).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_post_transaction, bench_total_on_stock);
criterion_main!(benches);
