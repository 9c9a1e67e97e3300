use crate::config_loader::{ConfigError, ConfigResult, ConfigValidation};
use serde::{Deserialize, Serialize};

/// 피벗 엔진 설정
///
/// 모든 필드는 생략 가능하며 생략 시 기본값을 사용합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 가격 이력 보관 개수
    pub history_capacity: usize,
    /// 출처별 최대 피벗 수
    pub max_pivots: usize,
    /// 직전 피벗과의 최소 간격 (봉)
    pub min_pivot_distance: f64,
    /// 직전 피벗 대비 최소 변화율
    pub min_price_change: f64,
    /// 추세 일관성 검사 종가 개수
    pub trend_window: usize,
    /// 후보 확인에 쓰는 캔들 수
    pub confirmation_candles: usize,
    /// 확정에 필요한 반대 방향 캔들 수
    pub required_counter_moves: usize,
    /// 분류 구간 피벗 수
    pub classification_window: usize,
    /// 봉 길이 (분)
    pub bar_minutes: u32,
    /// 지지/저항 계산 구간
    pub sr_lookback: usize,
    pub short_period: usize,
    pub medium_period: usize,
    pub long_period: usize,
    pub rsi_period: usize,
    pub volatility_window: usize,
    /// 지지/저항 레벨로 추세 역행 후보를 살릴지 여부
    pub use_market_bias: bool,
    /// 레벨로 인정할 최소 강도
    pub sr_min_strength: f64,
    /// 레벨 접촉 허용 오차 (비율)
    pub sr_tolerance: f64,
    /// 수동 입력 가격 상한
    pub max_manual_price: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            history_capacity: 100,
            max_pivots: 15,
            min_pivot_distance: 2.0,
            min_price_change: 0.004,
            trend_window: 5,
            confirmation_candles: 2,
            required_counter_moves: 2,
            classification_window: 5,
            bar_minutes: 30,
            sr_lookback: 20,
            short_period: 10,
            medium_period: 20,
            long_period: 50,
            rsi_period: 14,
            volatility_window: 20,
            use_market_bias: true,
            sr_min_strength: 70.0,
            sr_tolerance: 0.001,
            max_manual_price: 500_000.0,
        }
    }
}

impl EngineConfig {
    /// 봉 길이 (초)
    pub fn bar_seconds(&self) -> i64 {
        i64::from(self.bar_minutes) * 60
    }
}

impl ConfigValidation for EngineConfig {
    fn validate(&self) -> ConfigResult<()> {
        let invalid = |msg: &str| Err(ConfigError::ValidationError(msg.to_string()));

        if self.history_capacity == 0 {
            return invalid("history_capacity는 0보다 커야 합니다");
        }
        if self.max_pivots == 0 {
            return invalid("max_pivots는 0보다 커야 합니다");
        }
        if self.min_pivot_distance < 0.0 {
            return invalid("min_pivot_distance는 음수일 수 없습니다");
        }
        if !(0.0..1.0).contains(&self.min_price_change) {
            return invalid("min_price_change는 0 이상 1 미만이어야 합니다");
        }
        if self.confirmation_candles == 0 {
            return invalid("confirmation_candles는 0보다 커야 합니다");
        }
        if self.required_counter_moves > self.confirmation_candles {
            return invalid("required_counter_moves는 confirmation_candles 이하여야 합니다");
        }
        if self.classification_window < 3 {
            return invalid("classification_window는 3 이상이어야 합니다");
        }
        if self.bar_minutes == 0 || 60 % self.bar_minutes != 0 {
            return invalid("bar_minutes는 60의 약수여야 합니다");
        }
        if self.sr_lookback == 0 {
            return invalid("sr_lookback은 0보다 커야 합니다");
        }
        if !(self.short_period < self.medium_period && self.medium_period < self.long_period) {
            return invalid("이동평균 기간은 short < medium < long 이어야 합니다");
        }
        if self.long_period > self.history_capacity {
            return invalid("long_period는 history_capacity 이하여야 합니다");
        }
        if self.rsi_period == 0 || self.volatility_window == 0 {
            return invalid("rsi_period와 volatility_window는 0보다 커야 합니다");
        }
        if !(0.0..=100.0).contains(&self.sr_min_strength) {
            return invalid("sr_min_strength는 0에서 100 사이여야 합니다");
        }
        if self.sr_tolerance < 0.0 {
            return invalid("sr_tolerance는 음수일 수 없습니다");
        }
        if self.max_manual_price <= 0.0 {
            return invalid("max_manual_price는 0보다 커야 합니다");
        }

        Ok(())
    }
}
