use swing_pivot::model::PivotType::{HH, HL, LH, LL};
use swing_pivot::pivot::{PatternMatcher, PatternName};

#[test]
fn test_bullish_tail_detected() {
    let matcher = PatternMatcher::new();
    let types = vec![LL, LH, HH, HL, HH, HL, HH];

    let found = matcher.scan(&types).unwrap();
    assert_eq!(found.name, PatternName::BullishReversal);
    assert_eq!(found.signature, vec![HH, HL, HH, HL, HH]);
}

#[test]
fn test_bearish_triple_lower_low() {
    let matcher = PatternMatcher::new();
    let types = vec![HH, HL, LL, LL, LL];

    let found = matcher.scan(&types).unwrap();
    assert_eq!(found.name, PatternName::BearishReversal);
    assert_eq!(found.name.to_string(), "bearish_reversal");
}

#[test]
fn test_longer_signature_preferred() {
    let matcher = PatternMatcher::new();

    // [LL, LH, LL]도 일치하지만 4개짜리가 우선
    let found = matcher.scan(&[HH, LL, LL, LH, LL]).unwrap();
    assert_eq!(found.signature, vec![LL, LL, LH, LL]);

    let found = matcher.scan(&[HL, HH, HL, HH, HH]).unwrap();
    assert_eq!(found.signature, vec![HH, HL, HH, HH]);
}

#[test]
fn test_pattern_must_sit_at_tail() {
    let matcher = PatternMatcher::new();
    assert!(matcher.scan(&[LL, LL, LL, HH]).is_none());
    assert!(matcher.scan(&[HH, HH]).is_none());
}

