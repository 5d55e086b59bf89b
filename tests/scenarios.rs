//! End-to-end matching scenarios, replaying fixed order sequences against
//! a fresh cache and checking the resulting per-security matched volume.

use lotmatch_core::{CacheConfig, MatchCache, Order, OrderId, Side};

fn add(cache: &MatchCache, id: &str, sec: &str, side: Side, qty: u64, user: &str, company: &str) {
    cache
        .add_order(Order::new(id, sec, side, qty, user, company))
        .expect("add_order should not fail for a fresh id");
}

fn matching_size(cache: &MatchCache, sec: &str) -> u64 {
    cache
        .get_matching_size_for_security(&sec.into())
        .expect("lenient mode never errors on a query")
}

#[test]
fn scenario_a_readme_example_one() {
    let cache = MatchCache::new();
    add(&cache, "OrdId1", "SecId1", Side::Buy, 1000, "User1", "CompanyA");
    add(&cache, "OrdId2", "SecId2", Side::Sell, 3000, "User2", "CompanyB");
    add(&cache, "OrdId3", "SecId1", Side::Sell, 500, "User3", "CompanyA");
    add(&cache, "OrdId4", "SecId2", Side::Buy, 600, "User4", "CompanyC");
    add(&cache, "OrdId5", "SecId2", Side::Buy, 100, "User5", "CompanyB");
    add(&cache, "OrdId6", "SecId3", Side::Buy, 1000, "User6", "CompanyD");
    add(&cache, "OrdId7", "SecId2", Side::Buy, 2000, "User7", "CompanyE");
    add(&cache, "OrdId8", "SecId2", Side::Sell, 5000, "User8", "CompanyE");

    assert_eq!(matching_size(&cache, "SecId1"), 0);
    assert_eq!(matching_size(&cache, "SecId2"), 2700);
    assert_eq!(matching_size(&cache, "SecId3"), 0);
}

#[test]
fn scenario_b_readme_example_two() {
    let cache = MatchCache::new();
    add(&cache, "O1", "SecId1", Side::Buy, 100, "U1", "CompanyA");
    add(&cache, "O2", "SecId1", Side::Sell, 100, "U2", "CompanyB");
    add(&cache, "O3", "SecId1", Side::Buy, 200, "U3", "CompanyA");
    add(&cache, "O4", "SecId1", Side::Sell, 100, "U4", "CompanyB");
    add(&cache, "O5", "SecId1", Side::Sell, 100, "U5", "CompanyC");

    add(&cache, "O6", "SecId2", Side::Buy, 1000, "U6", "CompanyD");
    add(&cache, "O7", "SecId2", Side::Sell, 400, "U7", "CompanyE");
    add(&cache, "O8", "SecId2", Side::Sell, 600, "U8", "CompanyF");

    add(&cache, "O9", "SecId3", Side::Buy, 300, "U9", "CompanyG");
    add(&cache, "O10", "SecId3", Side::Buy, 300, "U10", "CompanyH");
    add(&cache, "O11", "SecId3", Side::Sell, 200, "U11", "CompanyI");
    add(&cache, "O12", "SecId3", Side::Sell, 200, "U12", "CompanyJ");
    add(&cache, "O13", "SecId3", Side::Sell, 200, "U13", "CompanyK");

    assert_eq!(matching_size(&cache, "SecId1"), 300);
    assert_eq!(matching_size(&cache, "SecId2"), 1000);
    assert_eq!(matching_size(&cache, "SecId3"), 600);
}

#[test]
fn scenario_c_readme_example_three() {
    let cache = MatchCache::new();
    add(&cache, "O1", "SecId1", Side::Buy, 500, "U1", "CompanyA");
    add(&cache, "O2", "SecId1", Side::Buy, 400, "U2", "CompanyB");
    add(&cache, "O3", "SecId1", Side::Sell, 900, "U3", "CompanyC");

    add(&cache, "O4", "SecId2", Side::Buy, 300, "U4", "CompanyD");
    add(&cache, "O5", "SecId2", Side::Buy, 300, "U5", "CompanyE");
    add(&cache, "O6", "SecId2", Side::Sell, 600, "U6", "CompanyF");

    add(&cache, "O7", "SecId3", Side::Buy, 500, "U7", "CompanyG");
    add(&cache, "O8", "SecId3", Side::Sell, 500, "U8", "CompanyG");

    add(&cache, "O9", "SecId1", Side::Buy, 50, "U9", "CompanyH");
    add(&cache, "O10", "SecId2", Side::Sell, 50, "U10", "CompanyI");
    add(&cache, "O11", "SecId3", Side::Buy, 10, "U11", "CompanyG");

    assert_eq!(matching_size(&cache, "SecId1"), 900);
    assert_eq!(matching_size(&cache, "SecId2"), 600);
    assert_eq!(matching_size(&cache, "SecId3"), 0);
}

#[test]
fn scenario_d_partial_fills_across_two_sell_orders() {
    let cache = MatchCache::new();
    add(&cache, "B1", "SecId1", Side::Buy, 5000, "U1", "CompanyA");
    add(&cache, "S1", "SecId1", Side::Sell, 2000, "U2", "CompanyB");
    add(&cache, "S2", "SecId1", Side::Sell, 1000, "U3", "CompanyC");

    assert_eq!(matching_size(&cache, "SecId1"), 3000);
}

#[test]
fn scenario_e_same_company_never_matches() {
    let cache = MatchCache::new();
    add(&cache, "B1", "SecId3", Side::Buy, 2000, "U1", "CompanyA");
    add(&cache, "S1", "SecId3", Side::Sell, 2000, "U2", "CompanyA");

    assert_eq!(matching_size(&cache, "SecId3"), 0);
}

#[test]
fn scenario_f_cancel_by_min_qty_compares_original_qty() {
    let cache = MatchCache::new();
    add(&cache, "1", "SecId1", Side::Buy, 200, "U1", "CompanyA");
    add(&cache, "2", "SecId1", Side::Buy, 500, "U2", "CompanyB");
    add(&cache, "3", "SecId1", Side::Buy, 300, "U3", "CompanyC");

    cache
        .cancel_orders_for_security_with_min_qty(&"SecId1".into(), 300)
        .expect("security is known");

    let remaining = cache.get_all_orders();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].order_id, OrderId::from("1"));
}

#[test]
fn eager_and_lazy_modes_agree_on_every_scenario() {
    let eager = MatchCache::new();
    let lazy = MatchCache::with_config(CacheConfig::new().with_eager_match(false));

    for cache in [&eager, &lazy] {
        add(cache, "OrdId1", "SecId1", Side::Buy, 1000, "User1", "CompanyA");
        add(cache, "OrdId2", "SecId2", Side::Sell, 3000, "User2", "CompanyB");
        add(cache, "OrdId3", "SecId1", Side::Sell, 500, "User3", "CompanyA");
        add(cache, "OrdId4", "SecId2", Side::Buy, 600, "User4", "CompanyC");
        add(cache, "OrdId5", "SecId2", Side::Buy, 100, "User5", "CompanyB");
        add(cache, "OrdId6", "SecId3", Side::Buy, 1000, "User6", "CompanyD");
        add(cache, "OrdId7", "SecId2", Side::Buy, 2000, "User7", "CompanyE");
        add(cache, "OrdId8", "SecId2", Side::Sell, 5000, "User8", "CompanyE");
    }

    for cache in [&eager, &lazy] {
        assert_eq!(matching_size(cache, "SecId1"), 0);
        assert_eq!(matching_size(cache, "SecId2"), 2700);
        assert_eq!(matching_size(cache, "SecId3"), 0);
    }
}

#[test]
fn single_order_security_yields_zero() {
    let cache = MatchCache::new();
    add(&cache, "B1", "SecId1", Side::Buy, 100, "U1", "CompanyA");
    assert_eq!(matching_size(&cache, "SecId1"), 0);
}

#[test]
fn match_log_per_security_query_returns_only_that_securitys_records() {
    let cache = MatchCache::with_config(CacheConfig::new().with_match_log(true));
    add(&cache, "B1", "SecId1", Side::Buy, 500, "U1", "CompanyA");
    add(&cache, "S1", "SecId1", Side::Sell, 500, "U2", "CompanyB");
    add(&cache, "B2", "SecId2", Side::Buy, 100, "U3", "CompanyC");
    add(&cache, "S2", "SecId2", Side::Sell, 100, "U4", "CompanyD");

    let sec1_records = cache
        .get_order_matches_by_security(&"SecId1".into())
        .unwrap();
    assert_eq!(sec1_records.len(), 1);
    assert_eq!(sec1_records[0].buy_id, OrderId::from("B1"));
    assert_eq!(sec1_records[0].sell_id, OrderId::from("S1"));
    assert_eq!(sec1_records[0].qty, 500);

    let sec2_records = cache
        .get_order_matches_by_security(&"SecId2".into())
        .unwrap();
    assert_eq!(sec2_records.len(), 1);
    assert_eq!(sec2_records[0].qty, 100);
}

#[test]
fn match_log_lazy_mode_mirrors_eager_mode() {
    let cache = MatchCache::with_config(
        CacheConfig::new().with_eager_match(false).with_match_log(true),
    );
    add(&cache, "B1", "SecId1", Side::Buy, 500, "U1", "CompanyA");
    add(&cache, "S1", "SecId1", Side::Sell, 500, "U2", "CompanyB");

    let records = cache
        .get_order_matches_by_security(&"SecId1".into())
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].qty, 500);
}

#[test]
fn cancel_orders_for_user_removes_only_that_users_orders() {
    let cache = MatchCache::new();
    add(&cache, "O1", "SecId1", Side::Buy, 100, "Alice", "CompanyA");
    add(&cache, "O2", "SecId1", Side::Sell, 100, "Bob", "CompanyB");
    add(&cache, "O3", "SecId2", Side::Buy, 50, "Alice", "CompanyA");

    cache
        .cancel_orders_for_user(&"Alice".into())
        .expect("user is known");

    let remaining = cache.get_all_orders();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].order_id, OrderId::from("O2"));
}

#[test]
fn lazy_mode_matches_correctly_past_the_parallel_cancel_chunk_threshold() {
    // 300 buy orders exceeds PARALLEL_CANCEL_CHUNK_THRESHOLD (256), which used
    // to gate a parallel lazy-matching branch. Lazy matching is sequential
    // regardless of list length, so this only exercises a long candidate
    // list, not concurrency — but it pins the expected total against eager
    // mode for a buy-side list well past that threshold.
    const BUY_ORDERS: u64 = 300;

    let eager = MatchCache::new();
    let lazy = MatchCache::with_config(CacheConfig::new().with_eager_match(false));

    for cache in [&eager, &lazy] {
        add(cache, "SELL", "SecId1", Side::Sell, 1_000_000, "SellUser", "SellCo");
        for i in 0..BUY_ORDERS {
            add(
                cache,
                &format!("BUY{i}"),
                "SecId1",
                Side::Buy,
                10,
                &format!("BuyUser{i}"),
                &format!("BuyCo{i}"),
            );
        }
    }

    let expected = BUY_ORDERS * 10;
    assert_eq!(matching_size(&eager, "SecId1"), expected);
    assert_eq!(matching_size(&lazy, "SecId1"), expected);
}

#[test]
fn strict_mode_surfaces_unknown_security_as_an_error() {
    let cache = MatchCache::with_config(CacheConfig::new().with_strict_validation(true));
    let err = cache.get_matching_size_for_security(&"GHOST".into());
    assert!(err.is_err());
}
