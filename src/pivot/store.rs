use crate::indicator::trend_sign;
use crate::indicator::utils::relative_change;
use crate::model::{ConfirmedPivot, PivotSource, PivotType, RawPivotKind};
use crate::pivot::classifier::PivotClassifier;
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::fmt::Display;

/// 출처별 최대 보관 피벗 수
pub const MAX_PIVOTS: usize = 15;

/// 직전 피벗과의 최소 간격 (봉 단위)
pub const MIN_PIVOT_DISTANCE: f64 = 2.0;

/// 직전 피벗 대비 최소 가격 변화율
pub const MIN_PRICE_CHANGE: f64 = 0.004;

/// 추세 일관성 검사에 쓰는 최근 종가 개수
pub const TREND_WINDOW: usize = 5;

/// 봉 하나의 길이 (초)
pub const BAR_SECONDS: i64 = 30 * 60;

/// 채택 거부 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// 직전 피벗과 시간 간격이 너무 짧음
    TooClose,
    /// 직전 피벗 대비 가격 변화가 너무 작음
    AmplitudeTooSmall,
    /// 단기 추세와 반대 방향
    AgainstTrend,
    /// 분류기가 유형을 결정하지 못함
    Unclassified,
}

impl Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::TooClose => write!(f, "시간 간격 부족"),
            RejectReason::AmplitudeTooSmall => write!(f, "가격 변화 부족"),
            RejectReason::AgainstTrend => write!(f, "추세 역행"),
            RejectReason::Unclassified => write!(f, "유형 판정 실패"),
        }
    }
}

/// 채택 결과
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Admission {
    Admitted(ConfirmedPivot),
    Rejected(RejectReason),
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted(_))
    }
}

/// 확정 피벗 저장소
///
/// 사용자 피벗과 시스템 피벗을 따로 보관하고, 조회 시 시간순으로 합쳐서 보여줍니다.
/// 각 목록은 `max_pivots`를 넘으면 가장 오래된 항목부터 제거됩니다.
#[derive(Debug, Clone)]
pub struct PivotStore {
    user: Vec<ConfirmedPivot>,
    system: Vec<ConfirmedPivot>,
    next_id: u64,
    classifier: PivotClassifier,
    pub max_pivots: usize,
    pub min_pivot_distance: f64,
    pub min_price_change: f64,
    pub trend_window: usize,
    pub bar_seconds: i64,
}

impl Default for PivotStore {
    fn default() -> Self {
        PivotStore {
            user: Vec::new(),
            system: Vec::new(),
            next_id: 1,
            classifier: PivotClassifier::default(),
            max_pivots: MAX_PIVOTS,
            min_pivot_distance: MIN_PIVOT_DISTANCE,
            min_price_change: MIN_PRICE_CHANGE,
            trend_window: TREND_WINDOW,
            bar_seconds: BAR_SECONDS,
        }
    }
}

impl PivotStore {
    /// 설정값으로 저장소 생성
    pub fn new(
        classifier: PivotClassifier,
        max_pivots: usize,
        min_pivot_distance: f64,
        min_price_change: f64,
        trend_window: usize,
        bar_seconds: i64,
    ) -> PivotStore {
        PivotStore {
            classifier,
            max_pivots,
            min_pivot_distance,
            min_price_change,
            trend_window,
            bar_seconds,
            ..Default::default()
        }
    }

    /// 시스템 피벗 채택 시도
    ///
    /// 간격, 변화율, 추세 일관성 검사를 거친 뒤 분류에 성공하면 저장합니다.
    ///
    /// # Arguments
    /// * `price` - 확정된 극값 가격
    /// * `kind` - 원시 방향
    /// * `time` - 극값이 발생한 캔들 시간
    /// * `recent_closes` - 가격 이력의 종가 (오래된 것 → 최신)
    pub fn try_admit(
        &mut self,
        price: f64,
        kind: RawPivotKind,
        time: DateTime<Utc>,
        recent_closes: &[f64],
    ) -> Admission {
        let gates = self.check_gates(price, time, recent_closes);
        self.admit_system(price, kind, time, gates)
    }

    /// 지지/저항 레벨에 걸친 후보 채택 시도
    ///
    /// 추세 일관성 검사만 건너뛰고 간격, 변화율, 분류는 그대로 적용합니다.
    pub fn try_admit_level_backed(
        &mut self,
        price: f64,
        kind: RawPivotKind,
        time: DateTime<Utc>,
    ) -> Admission {
        let gates = self.check_spacing(price, time);
        self.admit_system(price, kind, time, gates)
    }

    fn admit_system(
        &mut self,
        price: f64,
        kind: RawPivotKind,
        time: DateTime<Utc>,
        gates: Result<(), RejectReason>,
    ) -> Admission {
        if let Err(reason) = gates {
            debug!("피벗 거부: {} ${:.2} ({})", kind, price, reason);
            return Admission::Rejected(reason);
        }

        let pivots = self.all_pivots();
        let Some(pivot_type) = self.classifier.classify(price, kind, &pivots) else {
            debug!("피벗 거부: {} ${:.2} ({})", kind, price, RejectReason::Unclassified);
            return Admission::Rejected(RejectReason::Unclassified);
        };

        let pivot = self.push(pivot_type, price, time, PivotSource::System);
        info!("시스템 피벗 추가: {}", pivot);
        Admission::Admitted(pivot)
    }

    /// 채택 전 검사 (분류 제외)
    ///
    /// 피벗이 하나도 없으면 항상 통과합니다.
    pub fn check_gates(
        &self,
        price: f64,
        time: DateTime<Utc>,
        recent_closes: &[f64],
    ) -> Result<(), RejectReason> {
        self.check_spacing(price, time)?;
        self.check_trend(price, recent_closes)
    }

    /// 직전 피벗과의 시간 간격과 가격 변화율 검사
    pub fn check_spacing(&self, price: f64, time: DateTime<Utc>) -> Result<(), RejectReason> {
        let Some(last) = self.last_pivot() else {
            return Ok(());
        };

        let bars = (time - last.time).num_seconds() as f64 / self.bar_seconds as f64;
        if bars < self.min_pivot_distance {
            return Err(RejectReason::TooClose);
        }

        if relative_change(price, last.price) < self.min_price_change {
            return Err(RejectReason::AmplitudeTooSmall);
        }

        Ok(())
    }

    /// 단기 추세와 반대 방향으로 되돌아가는 가격인지 검사
    ///
    /// 종가가 `trend_window`개보다 적으면 통과합니다.
    pub fn check_trend(&self, price: f64, recent_closes: &[f64]) -> Result<(), RejectReason> {
        let Some(last) = self.last_pivot() else {
            return Ok(());
        };
        if recent_closes.len() < self.trend_window || self.trend_window < 2 {
            return Ok(());
        }

        let window = &recent_closes[recent_closes.len() - self.trend_window..];
        let trend = trend_sign(window);
        if trend > 0 && price < last.price && last.kind.is_high() {
            return Err(RejectReason::AgainstTrend);
        }
        if trend < 0 && price > last.price && last.kind.is_low() {
            return Err(RejectReason::AgainstTrend);
        }

        Ok(())
    }

    /// 현재 피벗 구성 기준으로 유형만 미리 판정합니다.
    pub fn classify(&self, price: f64, kind: RawPivotKind) -> Option<PivotType> {
        self.classifier.classify(price, kind, &self.all_pivots())
    }

    /// 사용자 피벗 추가 (검사 없음)
    ///
    /// 구조 검증은 수동 배치 단계에서 끝난 것으로 간주합니다.
    pub fn admit_manual(
        &mut self,
        kind: PivotType,
        price: f64,
        time: DateTime<Utc>,
    ) -> ConfirmedPivot {
        let pivot = self.push(kind, price, time, PivotSource::User);
        info!("사용자 피벗 추가: {}", pivot);
        pivot
    }

    fn push(
        &mut self,
        kind: PivotType,
        price: f64,
        time: DateTime<Utc>,
        source: PivotSource,
    ) -> ConfirmedPivot {
        let pivot = ConfirmedPivot {
            id: self.next_id,
            kind,
            price,
            time,
            source,
        };
        self.next_id += 1;

        let max_pivots = self.max_pivots;
        let list = match source {
            PivotSource::User => &mut self.user,
            PivotSource::System => &mut self.system,
        };
        list.push(pivot);
        if list.len() > max_pivots {
            let excess = list.len() - max_pivots;
            list.drain(0..excess);
            debug!("{} 피벗 {}개 초과 제거", source, excess);
        }

        pivot
    }

    /// id로 피벗 제거 (없으면 None)
    pub fn remove(&mut self, id: u64) -> Option<ConfirmedPivot> {
        for list in [&mut self.user, &mut self.system] {
            if let Some(index) = list.iter().position(|p| p.id == id) {
                return Some(list.remove(index));
            }
        }
        None
    }

    /// 사용자/시스템 피벗을 시간순으로 합친 목록
    ///
    /// 같은 시간이면 먼저 추가된 피벗이 앞에 옵니다.
    pub fn all_pivots(&self) -> Vec<ConfirmedPivot> {
        let mut pivots: Vec<ConfirmedPivot> =
            self.user.iter().chain(self.system.iter()).cloned().collect();
        pivots.sort_by_key(|p| (p.time, p.id));
        pivots
    }

    /// 시간상 마지막 피벗
    pub fn last_pivot(&self) -> Option<ConfirmedPivot> {
        self.user
            .iter()
            .chain(self.system.iter())
            .max_by_key(|p| (p.time, p.id))
            .cloned()
    }

    /// 최근 n개 피벗 (오래된 것 → 최신)
    pub fn recent(&self, n: usize) -> Vec<ConfirmedPivot> {
        let pivots = self.all_pivots();
        let start = pivots.len().saturating_sub(n);
        pivots[start..].to_vec()
    }

    /// 시간순 피벗 유형 시퀀스
    pub fn types(&self) -> Vec<PivotType> {
        self.all_pivots().iter().map(|p| p.kind).collect()
    }

    /// 해당 시간에 이미 피벗이 있는지 확인
    pub fn has_pivot_at(&self, time: DateTime<Utc>) -> bool {
        self.user.iter().chain(self.system.iter()).any(|p| p.time == time)
    }

    pub fn user_pivots(&self) -> &[ConfirmedPivot] {
        &self.user
    }

    pub fn system_pivots(&self) -> &[ConfirmedPivot] {
        &self.system
    }

    pub fn len(&self) -> usize {
        self.user.len() + self.system.len()
    }

    pub fn is_empty(&self) -> bool {
        self.user.is_empty() && self.system.is_empty()
    }

    /// 모든 피벗 제거
    pub fn clear(&mut self) {
        self.user.clear();
        self.system.clear();
    }
}
