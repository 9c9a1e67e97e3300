use common_test_utils::*;

use swing_pivot::model::PivotType::{self, HH, HL, LH, LL};
use swing_pivot::model::RawPivotKind::{High, Low};
use swing_pivot::pivot::PivotClassifier;

fn sideways_window() -> Vec<swing_pivot::model::ConfirmedPivot> {
    // 상승 2회, 하락 2회 -> 추세 부호 0
    pivots_from(&[(LL, 100.0), (HH, 105.0), (HL, 103.0), (HH, 108.0), (HL, 104.0)])
}

#[test]
fn test_first_pivot_defaults() {
    let classifier = PivotClassifier::default();
    assert_eq!(classifier.classify(100.0, High, &[]), Some(HH));
    assert_eq!(classifier.classify(100.0, Low, &[]), Some(LL));
}

#[test]
fn test_simple_rule_below_window() {
    let classifier = PivotClassifier::default();
    let pivots = pivots_from(&[(LL, 100.0), (HH, 105.0)]);

    assert_eq!(classifier.classify(106.0, High, &pivots), Some(HH));
    assert_eq!(classifier.classify(104.0, High, &pivots), Some(LH));
    assert_eq!(classifier.classify(99.0, Low, &pivots), Some(LL));
    assert_eq!(classifier.classify(101.0, Low, &pivots), Some(HL));
}

#[test]
fn test_new_high_above_window_is_higher_high() {
    let classifier = PivotClassifier::default();
    assert_eq!(classifier.classify(110.0, High, &sideways_window()), Some(HH));
}

#[test]
fn test_high_without_uptrend() {
    let classifier = PivotClassifier::default();
    let window = sideways_window();

    assert_eq!(classifier.classify(99.0, High, &window), Some(LH));
    assert_eq!(classifier.classify(106.0, High, &window), Some(LH));
    // 더 높은 가격이 없으면 검증 실패
    assert_eq!(classifier.classify(108.0, High, &window), None);
}

#[test]
fn test_low_without_downtrend() {
    let classifier = PivotClassifier::default();
    let window = sideways_window();

    assert_eq!(classifier.classify(109.0, Low, &window), Some(HL));
    assert_eq!(classifier.classify(101.0, Low, &window), Some(HL));
    assert_eq!(classifier.classify(100.0, Low, &window), None);
    assert_eq!(classifier.classify(95.0, Low, &window), Some(LL));
}

#[test]
fn test_uptrend_local_peak_rule() {
    let classifier = PivotClassifier::default();
    let window = pivots_from(&[(LL, 100.0), (HH, 102.0), (HH, 104.0), (HL, 103.0), (HH, 106.0)]);

    // 가운데 104가 국지 고점이고 그보다 높음
    assert_eq!(classifier.classify(105.0, High, &window), Some(HH));
    assert_eq!(classifier.classify(103.5, High, &window), Some(LH));
}

#[test]
fn test_downtrend_local_trough_rule() {
    let classifier = PivotClassifier::default();
    let window = pivots_from(&[(HH, 110.0), (LL, 108.0), (LL, 106.0), (LH, 107.0), (LL, 104.0)]);

    assert_eq!(classifier.classify(105.0, Low, &window), Some(LL));
    assert_eq!(classifier.classify(106.5, Low, &window), Some(HL));
}

#[test]
fn test_only_last_window_is_considered() {
    let classifier = PivotClassifier::default();
    let mut entries: Vec<(PivotType, f64)> = vec![(HH, 200.0), (LL, 50.0)];
    entries.extend([(LL, 100.0), (HH, 105.0), (HL, 103.0), (HH, 108.0), (HL, 104.0)]);
    let pivots = pivots_from(&entries);

    assert_eq!(classifier.classify(110.0, High, &pivots), Some(HH));
    assert_eq!(classifier.classify(95.0, Low, &pivots), Some(LL));
}
