use common_test_utils::*;

use swing_pivot::model::PivotSource;
use swing_pivot::model::PivotType::{HH, HL, LH, LL};
use swing_pivot::pivot::manual::validate_batch;
use swing_pivot::pivot::{ManualPivotInput, parse_manual_args};
use swing_pivot::{PivotEngine, PivotError, ValidationError};

fn entry(kind: swing_pivot::model::PivotType, price: f64, hour: u32, minute: u32) -> ManualPivotInput {
    ManualPivotInput::new(kind, price, hm(hour, minute))
}

#[test]
fn test_parse_manual_args() {
    let entries = parse_manual_args(&["lh", "82000", "13:30", "hl", "81000", "14h00"]).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0], entry(LH, 82000.0, 13, 30));
    assert_eq!(entries[1], entry(HL, 81000.0, 14, 0));
}

#[test]
fn test_parse_manual_args_errors() {
    assert_eq!(parse_manual_args(&[]), Err(ValidationError::EmptyBatch));
    assert_eq!(
        parse_manual_args(&["hh", "82000"]),
        Err(ValidationError::MalformedArguments(2))
    );
    assert_eq!(
        parse_manual_args(&["xx", "82000", "13:30"]),
        Err(ValidationError::InvalidType("xx".to_string()))
    );
    assert_eq!(
        parse_manual_args(&["hh", "abc", "13:30"]),
        Err(ValidationError::InvalidPrice("abc".to_string()))
    );
    assert_eq!(
        parse_manual_args(&["hh", "82000", "1330"]),
        Err(ValidationError::InvalidTime("1330".to_string()))
    );
}

#[test]
fn test_times_rounded_down_to_bar() {
    let batch = validate_batch(
        &[entry(LL, 80000.0, 13, 47), entry(LH, 81000.0, 14, 5)],
        500_000.0,
        30,
    )
    .unwrap();

    assert_eq!(batch.entries[0].time, hm(13, 30));
    assert_eq!(batch.entries[1].time, hm(14, 0));
    assert_eq!(batch.adjustments.len(), 2);
    assert_eq!(batch.adjustments[0].original, hm(13, 47));
}

#[test]
fn test_price_range_enforced() {
    for price in [0.0, -1.0, 500_001.0] {
        let result = validate_batch(&[entry(HH, price, 13, 0)], 500_000.0, 30);
        assert!(matches!(
            result,
            Err(ValidationError::PriceOutOfRange { .. })
        ));
    }
    assert!(validate_batch(&[entry(HH, 500_000.0, 13, 0)], 500_000.0, 30).is_ok());
}

#[test]
fn test_times_must_not_decrease() {
    let result = validate_batch(
        &[entry(LL, 80000.0, 14, 0), entry(LH, 81000.0, 13, 30)],
        500_000.0,
        30,
    );
    assert_eq!(
        result,
        Err(ValidationError::TimeNotAscending {
            previous: hm(14, 0),
            current: hm(13, 30),
        })
    );

    // 같은 시각은 허용
    assert!(
        validate_batch(
            &[entry(LL, 80000.0, 14, 0), entry(LH, 81000.0, 14, 0)],
            500_000.0,
            30
        )
        .is_ok()
    );
}

#[test]
fn test_structure_violations_name_the_pair() {
    let cases = [
        (entry(LL, 80000.0, 13, 0), entry(LH, 79000.0, 13, 30)),
        (entry(HH, 83000.0, 13, 0), entry(LH, 84000.0, 13, 30)),
        (entry(LH, 82000.0, 13, 0), entry(HL, 82500.0, 13, 30)),
        (entry(LL, 80000.0, 13, 0), entry(HL, 79000.0, 13, 30)),
        (entry(HL, 81000.0, 13, 0), entry(HH, 80000.0, 13, 30)),
        (entry(LH, 81000.0, 13, 0), entry(LL, 82000.0, 13, 30)),
    ];

    for (prev, curr) in cases {
        match validate_batch(&[prev, curr], 500_000.0, 30) {
            Err(ValidationError::StructureViolation {
                previous, current, ..
            }) => {
                assert_eq!(previous, prev.kind);
                assert_eq!(current, curr.kind);
            }
            other => panic!("구조 오류가 발생해야 함: {:?} -> {:?}", other, curr),
        }
    }
}

#[test]
fn test_successful_batch_replaces_all_pivots() {
    let mut engine = PivotEngine::default();
    engine.ingest(sample_at(0, 101.0, 99.0, 100.0));
    assert!(!engine.pending().is_empty());

    let pivots = engine
        .apply_manual_batch(
            &[
                entry(LH, 82000.0, 13, 30),
                entry(HL, 81000.0, 14, 0),
                entry(HH, 83000.0, 14, 30),
            ],
            session_date(),
        )
        .unwrap();

    assert_eq!(pivots.len(), 3);
    assert!(engine.pending().is_empty());
    assert_eq!(engine.store().user_pivots().len(), 3);
    assert!(engine.store().system_pivots().is_empty());

    let all = engine.all_pivots();
    assert!(all.iter().all(|p| p.source == PivotSource::User));
    assert_eq!(all[0].time, session_date().and_time(hm(13, 30)).and_utc());
    assert_eq!(engine.store().types(), vec![LH, HL, HH]);
}

#[test]
fn test_rejected_batch_leaves_state_intact() {
    let mut engine = PivotEngine::default();
    engine
        .apply_manual_batch(&[entry(LL, 80000.0, 10, 0)], session_date())
        .unwrap();

    let result = engine.apply_manual_batch(
        &[entry(HH, 83000.0, 13, 0), entry(HH, 82000.0, 13, 30)],
        session_date(),
    );

    assert!(matches!(
        result,
        Err(PivotError::Validation(ValidationError::StructureViolation { .. }))
    ));
    let all = engine.all_pivots();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].price, 80000.0);
}
