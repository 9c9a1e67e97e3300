use crate::error::{PivotError, PivotResult};
use crate::indicator::rsi::DEFAULT_RSI_PERIOD;
use crate::indicator::volatility::DEFAULT_VOLATILITY_WINDOW;
use crate::indicator::{MA, RSI, SMA, Volatility};
use crate::price_history::PriceHistoryBuffer;
use serde::Serialize;
use std::fmt::Display;

/// 이동평균 배열로 판단한 추세
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    /// 단기 > 중기 > 장기
    Uptrend,
    /// 단기 < 중기 < 장기
    Downtrend,
    /// 배열이 정렬되지 않음
    Sideways,
    /// 판단 불가
    Unknown,
}

impl Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Uptrend => write!(f, "Uptrend"),
            Trend::Downtrend => write!(f, "Downtrend"),
            Trend::Sideways => write!(f, "Sideways"),
            Trend::Unknown => write!(f, "Unknown"),
        }
    }
}

/// 추세 분석 결과
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendState {
    pub trend: Trend,
    /// 추세 강도 (0-100)
    pub strength: f64,
    pub short_ma: f64,
    pub medium_ma: f64,
    pub long_ma: f64,
    /// RSI (종가가 부족하면 None)
    pub rsi: Option<f64>,
    /// 변동성 % (최근 20개 종가가 없으면 None)
    pub volatility: Option<f64>,
}

impl Display for TrendState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TrendState {{ trend: {}, strength: {:.2}, ma: {:.2}/{:.2}/{:.2}, rsi: {:?}, volatility: {:?} }}",
            self.trend,
            self.strength,
            self.short_ma,
            self.medium_ma,
            self.long_ma,
            self.rsi,
            self.volatility
        )
    }
}

/// 이동평균/RSI/변동성 기반 추세 분석기
///
/// 가격 이력에서 매번 다시 계산하며 상태를 보관하지 않습니다.
#[derive(Debug, Clone)]
pub struct TrendAnalyzer {
    pub short_period: usize,
    pub medium_period: usize,
    pub long_period: usize,
    pub rsi_period: usize,
    pub volatility_window: usize,
}

impl Default for TrendAnalyzer {
    fn default() -> Self {
        Self::new(10, 20, 50)
    }
}

impl TrendAnalyzer {
    /// 새 추세 분석기 생성
    ///
    /// # Arguments
    /// * `short_period` - 단기 이동평균 기간
    /// * `medium_period` - 중기 이동평균 기간
    /// * `long_period` - 장기 이동평균 기간
    pub fn new(short_period: usize, medium_period: usize, long_period: usize) -> TrendAnalyzer {
        TrendAnalyzer {
            short_period,
            medium_period,
            long_period,
            rsi_period: DEFAULT_RSI_PERIOD,
            volatility_window: DEFAULT_VOLATILITY_WINDOW,
        }
    }

    /// 가격 이력으로 추세 분석
    ///
    /// # Returns
    /// * `Err(PivotError::InsufficientData)` - 샘플이 장기 기간보다 적음
    pub fn analyze(&self, history: &PriceHistoryBuffer) -> PivotResult<TrendState> {
        let required = self
            .long_period
            .max(self.medium_period)
            .max(self.short_period);
        if history.len() < required {
            return Err(PivotError::InsufficientData {
                required,
                available: history.len(),
            });
        }

        let closes = history.closes();
        let insufficient = || PivotError::InsufficientData {
            required,
            available: closes.len(),
        };

        let short_ma = SMA::from_values(&closes, self.short_period).ok_or_else(insufficient)?;
        let medium_ma = SMA::from_values(&closes, self.medium_period).ok_or_else(insufficient)?;
        let long_ma = SMA::from_values(&closes, self.long_period).ok_or_else(insufficient)?;

        let (trend, strength) = Self::classify(short_ma.get(), medium_ma.get(), long_ma.get());
        let rsi = RSI::from_values(&closes, self.rsi_period).map(|r| r.value());
        let volatility = Volatility::from_values(&closes, self.volatility_window).map(|v| v.value);

        let state = TrendState {
            trend,
            strength,
            short_ma: short_ma.get(),
            medium_ma: medium_ma.get(),
            long_ma: long_ma.get(),
            rsi,
            volatility,
        };

        log::debug!("추세 분석 결과: {}", state);
        Ok(state)
    }

    /// 이동평균 배열로 추세와 강도 결정
    fn classify(short_ma: f64, medium_ma: f64, long_ma: f64) -> (Trend, f64) {
        if long_ma <= 0.0 || !(short_ma.is_finite() && medium_ma.is_finite()) {
            return (Trend::Unknown, 0.0);
        }

        if short_ma > medium_ma && medium_ma > long_ma {
            (Trend::Uptrend, ((short_ma / long_ma - 1.0) * 100.0).min(100.0))
        } else if short_ma < medium_ma && medium_ma < long_ma {
            (Trend::Downtrend, ((1.0 - short_ma / long_ma) * 100.0).min(100.0))
        } else {
            (Trend::Sideways, 0.0)
        }
    }
}
