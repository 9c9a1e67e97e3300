use crate::model::RawPivotKind;
use chrono::{DateTime, Utc};
use log::debug;

/// 기본 확인 캔들 수
pub const CONFIRMATION_CANDLES: usize = 2;

/// 확정에 필요한 반대 방향 캔들 수
pub const REQUIRED_COUNTER_MOVES: usize = 2;

/// 확인 대기 중인 피벗 후보
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingPivot {
    pub kind: RawPivotKind,
    pub price: f64,
    pub time: DateTime<Utc>,
    /// 지금까지 거친 확인 캔들 수
    pub confirmation_count: usize,
    /// 후보보다 높았던 캔들 수
    pub higher_count: usize,
    /// 후보보다 낮았던 캔들 수
    pub lower_count: usize,
    /// 강한 지지/저항 레벨 덕분에 추세 역행 검사를 면제받은 후보
    pub level_backed: bool,
}

impl PendingPivot {
    fn new(kind: RawPivotKind, price: f64, time: DateTime<Utc>) -> Self {
        PendingPivot {
            kind,
            price,
            time,
            confirmation_count: 0,
            higher_count: 0,
            lower_count: 0,
            level_backed: false,
        }
    }

    /// 새 캔들 하나를 반영합니다.
    ///
    /// 고점 후보는 캔들 고가, 저점 후보는 캔들 저가와 비교합니다.
    fn observe(&mut self, current_high: f64, current_low: f64) {
        let reference = match self.kind {
            RawPivotKind::High => current_high,
            RawPivotKind::Low => current_low,
        };

        if reference > self.price {
            self.higher_count += 1;
        } else if reference < self.price {
            self.lower_count += 1;
        }

        self.confirmation_count += 1;
    }

    /// 후보를 반박한 캔들 수 (고점은 더 낮은 캔들, 저점은 더 높은 캔들)
    pub fn counter_moves(&self) -> usize {
        match self.kind {
            RawPivotKind::High => self.lower_count,
            RawPivotKind::Low => self.higher_count,
        }
    }
}

/// 후보 판정 결과
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// 확인 창을 통과함
    Confirmed(PendingPivot),
    /// 확인 창에서 반박되지 않아 폐기됨
    Discarded(PendingPivot),
}

/// 피벗 후보 추적기
///
/// 각 후보는 `Pending → {Confirmed, Discarded}` 한 번만 전이합니다.
#[derive(Debug, Clone)]
pub struct PendingPivotTracker {
    pending: Vec<PendingPivot>,
    pub confirmation_candles: usize,
    pub required_counter_moves: usize,
}

impl Default for PendingPivotTracker {
    fn default() -> Self {
        Self::new(CONFIRMATION_CANDLES, REQUIRED_COUNTER_MOVES)
    }
}

impl PendingPivotTracker {
    pub fn new(confirmation_candles: usize, required_counter_moves: usize) -> Self {
        PendingPivotTracker {
            pending: Vec::new(),
            confirmation_candles,
            required_counter_moves,
        }
    }

    /// 새 후보 등록
    ///
    /// 중복 여부는 호출자가 `contains`로 확인합니다.
    pub fn open(&mut self, kind: RawPivotKind, price: f64, time: DateTime<Utc>) {
        debug!("확인 대기 후보 추가: {} ${:.2} ({})", kind, price, time);
        self.pending.push(PendingPivot::new(kind, price, time));
    }

    /// 지지/저항 레벨에 걸친 후보 등록
    ///
    /// 채택 단계에서 추세 일관성 검사를 건너뜁니다.
    pub fn open_level_backed(&mut self, kind: RawPivotKind, price: f64, time: DateTime<Utc>) {
        debug!("레벨 기반 후보 추가: {} ${:.2} ({})", kind, price, time);
        self.pending.push(PendingPivot {
            level_backed: true,
            ..PendingPivot::new(kind, price, time)
        });
    }

    /// 모든 대기 후보에 새 캔들을 반영하고 판정이 끝난 후보를 반환합니다.
    ///
    /// 확인 캔들 수에 도달한 후보는 확정 또는 폐기되어 목록에서 빠지고,
    /// 나머지는 다음 캔들까지 대기합니다.
    pub fn advance(&mut self, current_high: f64, current_low: f64) -> Vec<Resolution> {
        let mut resolved = Vec::new();
        let mut remaining = Vec::with_capacity(self.pending.len());

        for mut pivot in self.pending.drain(..) {
            pivot.observe(current_high, current_low);

            debug!(
                "후보 평가: {} ${:.2} ({}/{} 캔들, 높음 {}, 낮음 {})",
                pivot.kind,
                pivot.price,
                pivot.confirmation_count,
                self.confirmation_candles,
                pivot.higher_count,
                pivot.lower_count
            );

            if pivot.confirmation_count < self.confirmation_candles {
                remaining.push(pivot);
                continue;
            }

            if pivot.counter_moves() >= self.required_counter_moves {
                debug!("후보 확정: {} ${:.2}", pivot.kind, pivot.price);
                resolved.push(Resolution::Confirmed(pivot));
            } else {
                debug!(
                    "후보 폐기: {} ${:.2} (반박 캔들 {}/{})",
                    pivot.kind,
                    pivot.price,
                    pivot.counter_moves(),
                    self.required_counter_moves
                );
                resolved.push(Resolution::Discarded(pivot));
            }
        }

        self.pending = remaining;
        resolved
    }

    /// 이번 sweep에서 확정된 후보만 추려냅니다.
    pub fn confirmed(resolutions: &[Resolution]) -> Vec<PendingPivot> {
        resolutions
            .iter()
            .filter_map(|r| match r {
                Resolution::Confirmed(p) => Some(*p),
                Resolution::Discarded(_) => None,
            })
            .collect()
    }

    /// 같은 방향, 같은 시간의 후보가 이미 있는지 확인
    pub fn contains(&self, kind: RawPivotKind, time: DateTime<Utc>) -> bool {
        self.pending.iter().any(|p| p.kind == kind && p.time == time)
    }

    pub fn pending(&self) -> &[PendingPivot] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
