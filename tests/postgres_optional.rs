//! Upsert guarantees against a real Postgres. Runs only when TEST_DATABASE_URL is set.

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal::dec;

use default_alive_ledger::config::AliveThresholds;
use default_alive_ledger::db::connection;
use default_alive_ledger::db::db_manager::DbManager;
use default_alive_ledger::db::models::payments::NewPaymentModel;
use default_alive_ledger::db::store::{LedgerStore, TierStore};
use default_alive_ledger::ebitda::calculate_and_store_ebitda_snapshot;

async fn test_db() -> Option<DbManager> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = connection::connect(&url, 10).await.expect("connect to TEST_DATABASE_URL");
    Some(DbManager::from_pool(pool).await.expect("init schema"))
}

/// A far-future Saturday unlikely to collide with other runs
fn scratch_week(salt: i64) -> NaiveDate {
    let base = NaiveDate::from_ymd_opt(2200, 1, 4).unwrap();
    let nanos = Utc::now().timestamp_subsec_nanos() as i64;
    default_alive_ledger::week::week_start(base + Duration::weeks((nanos % 20_000) * 10 + salt))
}

async fn clear_week(db: &DbManager, week: NaiveDate) {
    sqlx::query("DELETE FROM ebitda_snapshots WHERE week_start = $1")
        .bind(week)
        .execute(&db.pool)
        .await
        .expect("clear snapshots");
    sqlx::query("DELETE FROM payments WHERE payment_date >= $1 AND payment_date < $2")
        .bind(week.and_time(NaiveTime::MIN).and_utc())
        .bind((week + Duration::weeks(1)).and_time(NaiveTime::MIN).and_utc())
        .execute(&db.pool)
        .await
        .expect("clear payments");
}

#[tokio::test]
async fn postgres_upsert_is_last_write_wins() {
    let Some(db) = test_db().await else {
        return;
    };
    let week = scratch_week(0);
    clear_week(&db, week).await;
    let thresholds = AliveThresholds::default();

    db.insert_payment(&NewPaymentModel {
        amount: dec!(1234.56),
        payment_date: (week + Duration::days(3)).and_time(NaiveTime::MIN).and_utc(),
        description: Some("integration".to_string()),
    })
    .await
    .unwrap();

    let first = calculate_and_store_ebitda_snapshot(&db, &thresholds, week, Some(dec!(10000))).await.unwrap();
    let second = calculate_and_store_ebitda_snapshot(&db, &thresholds, week + Duration::days(4), Some(dec!(15000)))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.revenue, dec!(1234.56));
    assert_eq!(second.current_funding, Some(dec!(15000)));
    assert!(second.updated_at > first.updated_at);
    assert_eq!(db.count_snapshots_for_week(week).await.unwrap(), 1);
}

#[tokio::test]
async fn postgres_concurrent_upserts_never_conflict() {
    let Some(db) = test_db().await else {
        return;
    };
    let week = scratch_week(1);
    clear_week(&db, week).await;
    let thresholds = AliveThresholds::default();

    let fundings: Vec<Decimal> = (1..=20).map(|n| Decimal::from(n * 500)).collect();
    let results = join_all(
        fundings
            .iter()
            .map(|funding| calculate_and_store_ebitda_snapshot(&db, &thresholds, week, Some(*funding))),
    )
    .await;

    let ids: Vec<i32> = results.into_iter().map(|r| r.expect("no unique violation").id).collect();
    assert!(ids.iter().all(|id| *id == ids[0]));
    assert_eq!(db.count_snapshots_for_week(week).await.unwrap(), 1);

    let stored = db.snapshot_for_week(week).await.unwrap().unwrap();
    assert!(fundings.contains(&stored.current_funding.unwrap()));
}

#[tokio::test]
async fn postgres_tier_replacement_keeps_one_current() {
    let Some(db) = test_db().await else {
        return;
    };
    use default_alive_ledger::db::models::pricing_tiers::NewPricingTierModel;

    let tiers: Vec<NewPricingTierModel> = (0..5)
        .map(|n| NewPricingTierModel {
            name: format!("integration-{n}"),
            weekly_price: Decimal::from(n * 10),
        })
        .collect();
    let results = join_all(tiers.iter().map(|t| db.replace_current_tier(t))).await;
    assert!(results.iter().all(|r| r.is_ok()));

    let current_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pricing_tiers WHERE is_current")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(current_count, 1);
    assert!(db.current_tier().await.unwrap().is_some());
}
