use crate::alert::{ALERT_PIVOT_COUNT, AlertEvent, AlertSink};
use crate::analyzer::{SRLevel, SupportResistanceCalculator, Trend, TrendAnalyzer, TrendState};
use crate::config::EngineConfig;
use crate::config_loader::ConfigValidation;
use crate::error::{PivotError, PivotResult};
use crate::model::{ConfirmedPivot, RawPivotKind, Sample};
use crate::pivot::manual::validate_batch;
use crate::pivot::{
    Admission, ManualPivotInput, PendingPivotTracker, PivotClassifier, PivotStore, PatternMatcher,
    RejectReason,
};
use crate::price_history::PriceHistoryBuffer;
use crate::report::PivotSnapshot;
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex, MutexGuard};

/// 캔들마다 계산하는 시장 상황
#[derive(Debug, Clone, Default)]
pub struct MarketBias {
    /// 이동평균 추세 (이력이 부족하면 None)
    pub trend: Option<TrendState>,
    /// 지지/저항 레벨 (이력이 부족하면 비어 있음)
    pub levels: Vec<SRLevel>,
}

/// 스윙 피벗 엔진
///
/// 가격 이력, 대기 후보, 확정 피벗을 모두 소유하며 캔들 단위로 갱신됩니다.
/// 여러 호출자가 공유해야 하면 [`SharedPivotEngine`]을 사용합니다.
#[derive(Debug)]
pub struct PivotEngine {
    config: EngineConfig,
    history: PriceHistoryBuffer,
    pending: PendingPivotTracker,
    store: PivotStore,
    matcher: PatternMatcher,
    trend_analyzer: TrendAnalyzer,
    sr_calculator: SupportResistanceCalculator,
    last_bias: Option<MarketBias>,
}

impl Default for PivotEngine {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}

impl PivotEngine {
    /// 설정을 검증한 뒤 엔진 생성
    pub fn new(config: EngineConfig) -> PivotResult<PivotEngine> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> PivotEngine {
        let mut trend_analyzer =
            TrendAnalyzer::new(config.short_period, config.medium_period, config.long_period);
        trend_analyzer.rsi_period = config.rsi_period;
        trend_analyzer.volatility_window = config.volatility_window;

        let store = PivotStore::new(
            PivotClassifier::new(config.classification_window),
            config.max_pivots,
            config.min_pivot_distance,
            config.min_price_change,
            config.trend_window,
            config.bar_seconds(),
        );

        PivotEngine {
            history: PriceHistoryBuffer::new(config.history_capacity),
            pending: PendingPivotTracker::new(
                config.confirmation_candles,
                config.required_counter_moves,
            ),
            store,
            matcher: PatternMatcher::new(),
            trend_analyzer,
            sr_calculator: SupportResistanceCalculator::new(config.sr_lookback),
            last_bias: None,
            config,
        }
    }

    /// 마감된 캔들 하나를 처리합니다.
    ///
    /// 대기 후보를 모두 평가해 확정된 것을 채택하고, 새 피벗이 생겼으면 패턴을 한 번 검사합니다.
    /// 마지막으로 이 캔들의 고가/저가를 새 후보로 검토합니다.
    ///
    /// # Returns
    /// * `Some(AlertEvent)` - 반전 패턴이 감지됨
    /// * `None` - 알림 없음
    pub fn ingest(&mut self, sample: Sample) -> Option<AlertEvent> {
        debug!("캔들 수신: {}", sample);
        self.history.add(sample);

        let bias = self.config.use_market_bias.then(|| self.market_bias());

        let resolutions = self.pending.advance(sample.high, sample.low);
        let closes = self.history.closes();

        let mut admitted = 0;
        for candidate in PendingPivotTracker::confirmed(&resolutions) {
            let admission = if candidate.level_backed {
                self.store
                    .try_admit_level_backed(candidate.price, candidate.kind, candidate.time)
            } else {
                self.store
                    .try_admit(candidate.price, candidate.kind, candidate.time, &closes)
            };
            if let Admission::Admitted(pivot) = admission {
                debug!("후보 채택: {}", pivot);
                admitted += 1;
            }
        }

        let alert = if admitted > 0 {
            let market_trend = bias.as_ref().and_then(|b| b.trend.as_ref()).map(|t| t.trend);
            self.scan_for_alert(&sample, market_trend)
        } else {
            None
        };

        for kind in [RawPivotKind::High, RawPivotKind::Low] {
            self.discover(kind, &sample, bias.as_ref());
        }

        self.last_bias = bias;
        alert
    }

    /// 캔들을 처리하고 알림이 있으면 수신자에게 전달합니다.
    pub fn ingest_into(&mut self, sample: Sample, sink: &mut dyn AlertSink) -> Option<AlertEvent> {
        let alert = self.ingest(sample);
        if let Some(event) = &alert {
            sink.deliver(event);
        }
        alert
    }

    /// 캔들 극값을 새 후보로 등록할지 판단
    fn discover(&mut self, kind: RawPivotKind, sample: &Sample, bias: Option<&MarketBias>) {
        let price = kind.extreme_of(sample);

        if self.store.has_pivot_at(sample.time) || self.pending.contains(kind, sample.time) {
            debug!("{} 시점에 이미 피벗 또는 후보 존재", sample.time.format("%H:%M"));
            return;
        }

        let closes = self.history.closes();
        let level_backed = match self.store.check_gates(price, sample.time, &closes) {
            Ok(()) => false,
            Err(RejectReason::AgainstTrend) if self.sits_on_level(kind, price, bias) => {
                debug!("추세 역행이지만 지지/저항 레벨에 닿아 후보 유지: {} ${:.2}", kind, price);
                true
            }
            Err(reason) => {
                debug!("후보 제외: {} ${:.2} ({})", kind, price, reason);
                return;
            }
        };

        if self.store.classify(price, kind).is_none() {
            debug!("후보 제외: {} ${:.2} ({})", kind, price, RejectReason::Unclassified);
            return;
        }

        if level_backed {
            self.pending.open_level_backed(kind, price, sample.time);
        } else {
            self.pending.open(kind, price, sample.time);
        }
    }

    /// 가격이 같은 방향의 강한 레벨 위에 있는지 확인
    fn sits_on_level(&self, kind: RawPivotKind, price: f64, bias: Option<&MarketBias>) -> bool {
        bias.is_some_and(|bias| {
            SupportResistanceCalculator::confluence(
                &bias.levels,
                price,
                self.config.sr_tolerance,
                self.config.sr_min_strength,
            ) == Some(kind)
        })
    }

    /// 현재 이력으로 추세와 지지/저항 계산
    ///
    /// 이력이 부족한 항목은 비워 둡니다.
    pub fn market_bias(&self) -> MarketBias {
        let trend = match self.trend_analyzer.analyze(&self.history) {
            Ok(state) => {
                debug!("시장 추세: {} (강도 {:.2})", state.trend, state.strength);
                Some(state)
            }
            Err(e) => {
                debug!("추세 분석 생략: {}", e);
                None
            }
        };

        let levels = self.sr_calculator.levels(&self.history).unwrap_or_default();
        MarketBias { trend, levels }
    }

    fn scan_for_alert(&self, sample: &Sample, market_trend: Option<Trend>) -> Option<AlertEvent> {
        let found = self.matcher.scan(&self.store.types())?;

        let mut recent_pivots = self.store.recent(ALERT_PIVOT_COUNT);
        recent_pivots.reverse();

        let event = AlertEvent {
            pattern: found.name,
            signature: found.signature,
            current_price: sample.close,
            recent_pivots,
            market_trend,
            time: sample.time,
        };
        info!("반전 패턴 감지: {} @ ${:.2}", event.pattern, event.current_price);
        Some(event)
    }

    /// 수동 피벗 배치 적용
    ///
    /// 검증에 실패하면 기존 상태를 건드리지 않고 오류를 반환합니다.
    /// 성공하면 모든 피벗과 후보를 지운 뒤 입력을 사용자 피벗으로 저장합니다.
    ///
    /// # Arguments
    /// * `entries` - 입력 순서의 피벗
    /// * `session_date` - 입력 시각이 속한 날짜 (UTC)
    pub fn apply_manual_batch(
        &mut self,
        entries: &[ManualPivotInput],
        session_date: NaiveDate,
    ) -> PivotResult<Vec<ConfirmedPivot>> {
        let batch = validate_batch(
            entries,
            self.config.max_manual_price,
            self.config.bar_minutes,
        )
        .inspect_err(|e| warn!("수동 피벗 배치 거부: {}", e))?;

        for adjustment in &batch.adjustments {
            info!(
                "시각 조정: {} -> {}",
                adjustment.original.format("%H:%M"),
                adjustment.adjusted.format("%H:%M")
            );
        }

        self.clear_all();

        let pivots: Vec<ConfirmedPivot> = batch
            .entries
            .iter()
            .map(|entry| {
                let time: DateTime<Utc> = session_date.and_time(entry.time).and_utc();
                self.store.admit_manual(entry.kind, entry.price, time)
            })
            .collect();

        info!("수동 피벗 {}개 적용", pivots.len());
        Ok(pivots)
    }

    /// 확정 피벗과 대기 후보를 모두 제거
    ///
    /// 가격 이력은 유지합니다.
    pub fn clear_all(&mut self) {
        self.store.clear();
        self.pending.clear();
        debug!("피벗 및 대기 후보 초기화");
    }

    /// id로 피벗 하나 제거
    pub fn remove_pivot(&mut self, id: u64) -> Option<ConfirmedPivot> {
        self.store.remove(id)
    }

    /// 시간순 전체 피벗
    pub fn all_pivots(&self) -> Vec<ConfirmedPivot> {
        self.store.all_pivots()
    }

    pub fn snapshot(&self) -> PivotSnapshot {
        PivotSnapshot::from_pivots(&self.store.all_pivots())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn history(&self) -> &PriceHistoryBuffer {
        &self.history
    }

    pub fn pending(&self) -> &PendingPivotTracker {
        &self.pending
    }

    pub fn store(&self) -> &PivotStore {
        &self.store
    }

    /// 마지막 캔들에서 계산한 시장 상황
    pub fn last_bias(&self) -> Option<&MarketBias> {
        self.last_bias.as_ref()
    }
}

/// 여러 호출자가 공유하는 엔진
///
/// 각 작업은 잠금을 한 번 잡은 상태로 끝까지 수행됩니다.
#[derive(Debug, Clone, Default)]
pub struct SharedPivotEngine {
    inner: Arc<Mutex<PivotEngine>>,
}

impl SharedPivotEngine {
    pub fn new(engine: PivotEngine) -> SharedPivotEngine {
        SharedPivotEngine {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    fn lock(&self) -> PivotResult<MutexGuard<'_, PivotEngine>> {
        self.inner.lock().map_err(|_| PivotError::EngineUnavailable)
    }

    pub fn ingest(&self, sample: Sample) -> PivotResult<Option<AlertEvent>> {
        Ok(self.lock()?.ingest(sample))
    }

    pub fn apply_manual_batch(
        &self,
        entries: &[ManualPivotInput],
        session_date: NaiveDate,
    ) -> PivotResult<Vec<ConfirmedPivot>> {
        self.lock()?.apply_manual_batch(entries, session_date)
    }

    pub fn clear_all(&self) -> PivotResult<()> {
        self.lock()?.clear_all();
        Ok(())
    }

    pub fn snapshot(&self) -> PivotResult<PivotSnapshot> {
        Ok(self.lock()?.snapshot())
    }

    /// 잠금을 잡은 상태로 임의 작업 수행
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut PivotEngine) -> R) -> PivotResult<R> {
        let mut engine = self.lock()?;
        Ok(f(&mut engine))
    }
}
