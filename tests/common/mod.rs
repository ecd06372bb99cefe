//! Shared fixtures: an in-memory ledger store seeded with payments and entries.
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use default_alive_ledger::db::memory_store::MemoryStore;
use default_alive_ledger::db::models::financial_entries::NewFinancialEntryModel;
use default_alive_ledger::db::models::payments::NewPaymentModel;
use default_alive_ledger::db::store::LedgerStore;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Saturday 2024-11-30, start of the reference week
pub fn reference_week() -> NaiveDate {
    date(2024, 11, 30)
}

pub async fn add_payment(store: &MemoryStore, day: NaiveDate, time: NaiveTime, amount: Decimal) {
    store
        .insert_payment(&NewPaymentModel {
            amount,
            payment_date: day.and_time(time).and_utc(),
            description: None,
        })
        .await;
}

pub async fn add_entry(
    store: &MemoryStore,
    week_start: NaiveDate,
    operating_expenses: Decimal,
    depreciation: Decimal,
    amortization: Decimal,
) {
    store
        .save_financial_entry(&NewFinancialEntryModel {
            week_start,
            operating_expenses,
            depreciation,
            amortization,
            notes: None,
        })
        .await
        .unwrap();
}

/// Reference week: 3 payments inside (including both boundary instants),
/// one just before and one just after, plus an expense entry.
pub async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    let hms = |h, m, s| NaiveTime::from_hms_opt(h, m, s).unwrap();

    add_payment(&store, date(2024, 11, 30), NaiveTime::MIN, Decimal::new(500000, 2)).await;
    add_payment(&store, date(2024, 12, 3), hms(14, 15, 0), Decimal::new(250050, 2)).await;
    add_payment(
        &store,
        date(2024, 12, 6),
        NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap(),
        Decimal::new(499950, 2),
    )
    .await;
    // Outside the week on either side
    add_payment(&store, date(2024, 11, 29), hms(23, 59, 59), Decimal::new(100000, 2)).await;
    add_payment(&store, date(2024, 12, 7), NaiveTime::MIN, Decimal::new(70000, 2)).await;

    add_entry(
        &store,
        reference_week(),
        Decimal::new(1500000, 2),
        Decimal::new(40000, 2),
        Decimal::new(10000, 2),
    )
    .await;

    store
}
