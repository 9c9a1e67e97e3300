use crate::error::{PivotError, PivotResult};
use crate::model::RawPivotKind;
use crate::price_history::PriceHistoryBuffer;
use serde::Serialize;
use std::fmt::Display;

/// 기본 조회 구간
pub const DEFAULT_SR_LOOKBACK: usize = 20;

/// 레벨 터치로 인정하는 상대 거리 (0.1%)
pub const TOUCH_TOLERANCE: f64 = 0.001;

/// 피벗 포인트 레벨 이름
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LevelName {
    PP,
    R1,
    R2,
    R3,
    S1,
    S2,
    S3,
}

impl LevelName {
    /// 저항 레벨(R1-R3)인지 확인
    pub fn is_resistance(&self) -> bool {
        matches!(self, LevelName::R1 | LevelName::R2 | LevelName::R3)
    }

    /// 지지 레벨(S1-S3)인지 확인
    pub fn is_support(&self) -> bool {
        matches!(self, LevelName::S1 | LevelName::S2 | LevelName::S3)
    }
}

impl Display for LevelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// 지지/저항 레벨 데이터
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SRLevel {
    pub name: LevelName,
    /// 레벨 가격
    pub price: f64,
    /// 터치 비율 기반 강도 (0-100)
    pub strength: f64,
}

/// 피벗 포인트 방식의 지지/저항 계산기
#[derive(Debug, Clone)]
pub struct SupportResistanceCalculator {
    /// 레벨 계산 구간
    pub lookback: usize,
}

impl Default for SupportResistanceCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_SR_LOOKBACK)
    }
}

impl SupportResistanceCalculator {
    pub fn new(lookback: usize) -> SupportResistanceCalculator {
        SupportResistanceCalculator { lookback }
    }

    /// 최근 `lookback`개 샘플로 PP, R1-R3, S1-S3 계산
    ///
    /// 반환 순서: R3, R2, R1, PP, S1, S2, S3
    pub fn levels(&self, history: &PriceHistoryBuffer) -> PivotResult<Vec<SRLevel>> {
        if self.lookback == 0 {
            return Err(PivotError::InsufficientData {
                required: 1,
                available: history.len(),
            });
        }

        let recent = history.recent(self.lookback)?;

        let max_high = recent.iter().map(|s| s.high).fold(f64::MIN, f64::max);
        let min_low = recent.iter().map(|s| s.low).fold(f64::MAX, f64::min);
        let last_close = recent[recent.len() - 1].close;
        let closes: Vec<f64> = recent.iter().map(|s| s.close).collect();

        let range = max_high - min_low;
        let pp = (max_high + min_low + last_close) / 3.0;

        let raw = [
            (LevelName::R3, pp + range),
            (LevelName::R2, pp + range * 0.618),
            (LevelName::R1, 2.0 * pp - min_low),
            (LevelName::PP, pp),
            (LevelName::S1, 2.0 * pp - max_high),
            (LevelName::S2, pp - range * 0.618),
            (LevelName::S3, pp - range),
        ];

        let levels: Vec<SRLevel> = raw
            .iter()
            .map(|(name, price)| SRLevel {
                name: *name,
                price: *price,
                strength: self.calculate_strength(*price, &closes),
            })
            .collect();

        log::debug!(
            "지지/저항 계산 완료: PP={:.2}, R1={:.2}, S1={:.2}",
            pp,
            2.0 * pp - min_low,
            2.0 * pp - max_high
        );
        Ok(levels)
    }

    /// 레벨 근처(0.1% 이내)에서 마감한 종가 비율
    fn calculate_strength(&self, level: f64, closes: &[f64]) -> f64 {
        if level <= 0.0 || closes.is_empty() {
            return 0.0;
        }

        let touches = closes
            .iter()
            .filter(|close| ((*close - level).abs() / level) < TOUCH_TOLERANCE)
            .count();

        (touches as f64 / self.lookback as f64 * 100.0).min(100.0)
    }

    /// 가격이 강한 레벨에 닿아 있으면 그 방향의 피벗 후보를 제안합니다.
    ///
    /// 저항 레벨은 고점, 지지 레벨은 저점을 의미합니다. PP는 방향이 없습니다.
    pub fn confluence(
        levels: &[SRLevel],
        price: f64,
        tolerance: f64,
        min_strength: f64,
    ) -> Option<RawPivotKind> {
        levels
            .iter()
            .filter(|level| level.price > 0.0 && level.strength >= min_strength)
            .filter(|level| (price - level.price).abs() / level.price <= tolerance)
            .find_map(|level| {
                if level.name.is_resistance() {
                    Some(RawPivotKind::High)
                } else if level.name.is_support() {
                    Some(RawPivotKind::Low)
                } else {
                    None
                }
            })
    }
}
