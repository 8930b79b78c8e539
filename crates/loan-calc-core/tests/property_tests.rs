// Property-based tests for the annuity math and the reconciliation engine.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use loan_calc_core::annuity;
use loan_calc_core::{CategoryTable, CollateralCategory, EngineConfig, LoanEngine};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Whole currency units up to 50M, kopecks included.
fn principal() -> impl Strategy<Value = Decimal> {
    (100u64..5_000_000_000u64).prop_map(|minor| Decimal::new(minor as i64, 2))
}

/// Terms from one month to 30 years, whole months.
fn term_years() -> impl Strategy<Value = Decimal> {
    (1u32..=360u32).prop_map(|months| Decimal::from(months) / dec!(12))
}

/// Annual rates from 0.01% to 60%.
fn annual_rate() -> impl Strategy<Value = Decimal> {
    (1u32..=6_000u32).prop_map(|bps| Decimal::new(bps as i64, 4))
}

fn category() -> impl Strategy<Value = CollateralCategory> {
    prop::sample::select(CollateralCategory::ALL.to_vec())
}

// ---------------------------------------------------------------------------
// Annuity math
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn forward_then_inverse_recovers_principal(
        p in principal(),
        t in term_years(),
        r in annual_rate(),
    ) {
        let installment = annuity::installment(p, r, t).unwrap();
        let back = annuity::principal(installment, r, t).unwrap();
        let relative = ((back - p) / p).abs();
        prop_assert!(relative < dec!(0.000001), "{p} -> {installment} -> {back}");
    }

    #[test]
    fn installment_increases_with_principal(
        p in principal(),
        bump in 1u64..1_000_000u64,
        t in term_years(),
        r in annual_rate(),
    ) {
        let larger = p + Decimal::from(bump);
        let low = annuity::installment(p, r, t).unwrap();
        let high = annuity::installment(larger, r, t).unwrap();
        prop_assert!(high > low);
    }

    #[test]
    fn installment_decreases_with_term(
        p in principal(),
        months in 1u32..=359u32,
        extra in 1u32..=60u32,
        r in annual_rate(),
    ) {
        let short = Decimal::from(months) / dec!(12);
        let long = Decimal::from(months + extra) / dec!(12);
        let short_installment = annuity::installment(p, r, short).unwrap();
        let long_installment = annuity::installment(p, r, long).unwrap();
        prop_assert!(long_installment < short_installment);
    }

    #[test]
    fn zero_rate_is_principal_over_periods(p in principal(), t in term_years()) {
        let installment = annuity::installment(p, Decimal::ZERO, t).unwrap();
        let periods = annuity::total_periods(t).unwrap();
        prop_assert_eq!(installment, p / periods);
    }
}

// ---------------------------------------------------------------------------
// Engine policy
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn commit_principal_is_idempotent(
        start in category(),
        p in principal(),
        t in term_years(),
    ) {
        let engine = LoanEngine::default();
        let state = engine.quote(start, p, t).unwrap();
        let once = engine.commit_principal(&state).unwrap();
        let twice = engine.commit_principal(&once).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn commit_term_is_idempotent(
        start in category(),
        p in principal(),
        t in term_years(),
    ) {
        let engine = LoanEngine::default();
        let state = engine.quote(start, p, t).unwrap();
        let once = engine.commit_term_years(&state).unwrap();
        let twice = engine.commit_term_years(&once).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn set_category_is_deterministic_and_idempotent(
        start in category(),
        target in category(),
        p in principal(),
        t in term_years(),
    ) {
        let engine = LoanEngine::default();
        let state = engine.quote(start, p, t).unwrap();

        let first = engine.set_category(&state, target).unwrap();
        let again = engine.set_category(&state, target).unwrap();
        prop_assert_eq!(first, again);

        let repeated = engine.set_category(&first, target).unwrap();
        prop_assert_eq!(first, repeated);
        prop_assert!(engine.is_settled(&first));
    }

    #[test]
    fn installment_edit_keeps_annuity_relation(
        start in category(),
        t in 12u32..=60u32,
        payment in 1_000u32..250_000u32,
    ) {
        let engine = LoanEngine::default();
        let term = Decimal::from(t) / dec!(12);
        let state = engine.quote(start, dec!(1_000_000), term).unwrap();
        let edited = engine.set_installment(&state, Decimal::from(payment)).unwrap();

        let rate = engine.table().rate(start);
        let forward = annuity::installment(edited.principal(), rate, term).unwrap();
        let relative = ((forward - edited.installment()) / edited.installment()).abs();
        prop_assert!(relative < dec!(0.000001));
    }

    #[test]
    fn zero_rate_engine_never_divides_by_zero(p in principal(), t in term_years()) {
        let mut table = CategoryTable::default();
        table.vehicle.annual_rate = Decimal::ZERO;
        let engine = LoanEngine::new(EngineConfig {
            categories: table,
            ..EngineConfig::default()
        })
        .unwrap();

        let state = engine.quote(CollateralCategory::Vehicle, p, t).unwrap();
        let periods = annuity::total_periods(t).unwrap();
        prop_assert_eq!(state.installment(), p / periods);
    }
}
