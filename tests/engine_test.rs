use common_test_utils::*;

use swing_pivot::alert::CollectingAlertSink;
use swing_pivot::config::EngineConfig;
use swing_pivot::model::PivotType::{LH, LL};
use swing_pivot::model::{PivotSource, PivotType};
use swing_pivot::pivot::{ManualPivotInput, PatternName};
use swing_pivot::report::Direction;
use swing_pivot::{PivotEngine, PivotError, SharedPivotEngine};

/// 10:00부터 1시간 간격의 하락 구조 (LL, LH, LL, LH)
fn seed_bearish_structure(engine: &mut PivotEngine) {
    let entries = [
        ManualPivotInput::new(LL, 100.0, hm(10, 0)),
        ManualPivotInput::new(LH, 104.0, hm(11, 0)),
        ManualPivotInput::new(LL, 98.0, hm(12, 0)),
        ManualPivotInput::new(LH, 102.0, hm(13, 0)),
    ];
    engine.apply_manual_batch(&entries, session_date()).unwrap();
}

#[test]
fn test_swing_high_confirmed_from_empty_engine() {
    let mut engine = PivotEngine::default();

    assert!(engine.ingest(sample_at(0, 101.0, 99.0, 100.0)).is_none());
    assert!(engine.ingest(sample_at(1, 99.0, 97.0, 98.0)).is_none());
    assert!(engine.all_pivots().is_empty());

    engine.ingest(sample_at(2, 97.0, 95.0, 96.0));
    let pivots = engine.all_pivots();
    assert_eq!(pivots.len(), 1);
    assert_eq!(pivots[0].kind, PivotType::HH);
    assert_eq!(pivots[0].price, 101.0);
    assert_eq!(pivots[0].time, bar_time(0));
    assert_eq!(pivots[0].source, PivotSource::System);
}

#[test]
fn test_lower_low_completes_bearish_pattern() {
    let mut engine = PivotEngine::default();
    seed_bearish_structure(&mut engine);

    // 14:00부터 고가는 계속 오르고 14:30 저가 96 이후 저가가 높아짐
    assert!(engine.ingest(sample_at(28, 100.5, 99.0, 99.5)).is_none());
    assert!(engine.ingest(sample_at(29, 100.6, 96.0, 97.0)).is_none());
    assert!(engine.ingest(sample_at(30, 100.7, 97.0, 98.0)).is_none());

    let alert = engine.ingest(sample_at(31, 100.9, 97.5, 98.5)).unwrap();
    assert_eq!(alert.pattern, PatternName::BearishReversal);
    assert_eq!(alert.signature, vec![LL, LH, LL, LH, LL]);
    assert_eq!(alert.current_price, 98.5);
    assert_eq!(alert.time, bar_time(31));
    // 이동평균을 계산할 이력이 없음
    assert_eq!(alert.market_trend, None);

    let prices: Vec<f64> = alert.recent_pivots.iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![96.0, 102.0, 98.0, 104.0, 100.0]);
    assert_eq!(alert.recent_pivots[0].time, bar_time(29));
    assert_eq!(alert.recent_pivots[0].source, PivotSource::System);

    let message = alert.message();
    assert!(message.starts_with("🔴"));
    assert!(message.contains("bearish_reversal"));
    assert!(message.contains("1. LL: $96.00 (14:30)"));
    assert!(message.contains("5. LL: $100.00 (10:00)"));
}

#[test]
fn test_alert_delivered_to_sink() {
    let mut engine = PivotEngine::default();
    seed_bearish_structure(&mut engine);

    let mut sink = CollectingAlertSink::default();
    for sample in [
        sample_at(28, 100.5, 99.0, 99.5),
        sample_at(29, 100.6, 96.0, 97.0),
        sample_at(30, 100.7, 97.0, 98.0),
        sample_at(31, 100.9, 97.5, 98.5),
    ] {
        engine.ingest_into(sample, &mut sink);
    }

    assert_eq!(sink.events.len(), 1);
    assert_eq!(sink.events[0].pattern, PatternName::BearishReversal);
}

#[test]
fn test_clear_all_keeps_history() {
    let mut engine = PivotEngine::default();
    seed_bearish_structure(&mut engine);
    engine.ingest(sample_at(28, 100.5, 99.0, 99.5));

    engine.clear_all();
    assert!(engine.all_pivots().is_empty());
    assert!(engine.pending().is_empty());
    assert_eq!(engine.history().len(), 1);
}

#[test]
fn test_snapshot_rows() {
    let mut engine = PivotEngine::default();
    seed_bearish_structure(&mut engine);

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.total, 4);
    assert_eq!(snapshot.user_count, 4);
    assert_eq!(snapshot.system_count, 0);
    assert_eq!(snapshot.rows[0].change_pct, None);
    assert!((snapshot.rows[1].change_pct.unwrap() - 4.0).abs() < 1e-9);
    assert_eq!(snapshot.rows[1].direction, Some(Direction::Up));
    assert_eq!(snapshot.rows[2].direction, Some(Direction::Down));

    let json = snapshot.to_json().unwrap();
    assert!(json.contains("\"user_count\": 4"));
    assert!(json.contains("\"direction\": \"down\""));
}

#[test]
fn test_market_bias_needs_history() {
    let mut engine = PivotEngine::default();
    for sample in flat_samples(25, 100.0) {
        engine.ingest(sample);
    }

    let bias = engine.last_bias().unwrap();
    assert!(bias.trend.is_none());
    assert_eq!(bias.levels.len(), 7);

    let config = EngineConfig {
        use_market_bias: false,
        ..Default::default()
    };
    let mut engine = PivotEngine::new(config).unwrap();
    engine.ingest(sample_at(0, 101.0, 99.0, 100.0));
    assert!(engine.last_bias().is_none());
}

/// 0.02 폭 안에서 종가가 봉마다 0.001씩 내려가는 캔들
fn narrow_falling_sample(index: usize) -> swing_pivot::model::Sample {
    let close = 99.52 - 0.001 * index as f64;
    sample_at(index, close + 0.01, close - 0.01, close)
}

/// 좁은 박스권 25봉 뒤 00:00 사용자 LL을 두고 15봉을 더 재생합니다.
///
/// 박스권이라 모든 레벨의 강도가 100이고, 고가는 R3 근처에 있습니다.
fn replay_range_after_manual_low(engine: &mut PivotEngine) -> Vec<usize> {
    for index in 0..25 {
        engine.ingest(narrow_falling_sample(index));
    }
    engine
        .apply_manual_batch(&[ManualPivotInput::new(LL, 99.0, hm(0, 0))], session_date())
        .unwrap();

    (25..40)
        .map(|index| {
            engine.ingest(narrow_falling_sample(index));
            engine.pending().len()
        })
        .collect()
}

#[test]
fn test_level_backed_high_admitted_against_trend() {
    let mut engine = PivotEngine::default();
    let pending_counts = replay_range_after_manual_low(&mut engine);
    assert_eq!(&pending_counts[..4], &[1, 2, 1, 0]);

    let pivots = engine.all_pivots();
    assert_eq!(pivots.len(), 2);
    assert_eq!(pivots[0].source, PivotSource::User);

    // 하락 추세 중 LL 위의 고점이지만 R3에 걸쳐 있어 채택됨
    let high = pivots[1];
    assert_eq!(high.kind, PivotType::HH);
    assert_eq!(high.source, PivotSource::System);
    assert_eq!(high.time, bar_time(25));
    assert!((high.price - 99.505).abs() < 1e-9);
}

#[test]
fn test_level_backed_candidate_flagged_on_open() {
    let mut engine = PivotEngine::default();
    for index in 0..25 {
        engine.ingest(narrow_falling_sample(index));
    }
    engine
        .apply_manual_batch(&[ManualPivotInput::new(LL, 99.0, hm(0, 0))], session_date())
        .unwrap();
    engine.ingest(narrow_falling_sample(25));

    let pending = engine.pending().pending();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].kind, swing_pivot::model::RawPivotKind::High);
    assert!(pending[0].level_backed);
}

#[test]
fn test_against_trend_high_rejected_without_market_bias() {
    let config = EngineConfig {
        use_market_bias: false,
        ..Default::default()
    };
    let mut engine = PivotEngine::new(config).unwrap();
    let pending_counts = replay_range_after_manual_low(&mut engine);

    assert!(pending_counts.iter().all(|count| *count == 0));
    let pivots = engine.all_pivots();
    assert_eq!(pivots.len(), 1);
    assert_eq!(pivots[0].kind, LL);
}

#[test]
fn test_invalid_config_rejected() {
    let config = EngineConfig {
        short_period: 30,
        ..Default::default()
    };
    assert!(matches!(PivotEngine::new(config), Err(PivotError::Config(_))));
}

#[test]
fn test_shared_engine_across_threads() {
    let shared = SharedPivotEngine::default();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let engine = shared.clone();
            std::thread::spawn(move || {
                for i in 0..5 {
                    let index = t * 5 + i;
                    engine
                        .ingest(sample_at(index, 101.0, 99.0, 100.0))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let len = shared.with_engine(|engine| engine.history().len()).unwrap();
    assert_eq!(len, 20);

    shared.clear_all().unwrap();
    assert!(shared.snapshot().unwrap().is_empty());
}

#[test]
fn test_poisoned_engine_is_unavailable() {
    let shared = SharedPivotEngine::default();

    let engine = shared.clone();
    let result = std::thread::spawn(move || {
        let _ = engine.with_engine(|e| {
            if e.history().is_empty() {
                panic!("작업 중 패닉");
            }
        });
    })
    .join();
    assert!(result.is_err());

    assert!(matches!(
        shared.snapshot(),
        Err(PivotError::EngineUnavailable)
    ));
    assert!(matches!(
        shared.ingest(sample_at(0, 101.0, 99.0, 100.0)),
        Err(PivotError::EngineUnavailable)
    ));
}
