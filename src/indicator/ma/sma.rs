use crate::indicator::ma::MA;
use std::fmt::Display;
use ta::Next;
use ta::indicators::SimpleMovingAverage;

/// 단순이동평균(SMA)
#[derive(Clone, Debug)]
pub struct SMA {
    period: usize,
    sma: f64,
}

impl Display for SMA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SMA({}: {:.4})", self.period, self.sma)
    }
}

impl MA for SMA {
    fn get(&self) -> f64 {
        self.sma
    }

    fn period(&self) -> usize {
        self.period
    }
}

impl SMA {
    /// 종가 시계열의 마지막 `period`개로 SMA를 계산합니다.
    ///
    /// # Arguments
    /// * `values` - 시간 순서의 종가
    /// * `period` - 계산 기간
    ///
    /// # Returns
    /// * `Option<SMA>` - 데이터가 부족하거나 기간이 0이면 None
    pub fn from_values(values: &[f64], period: usize) -> Option<SMA> {
        if period == 0 || values.len() < period {
            return None;
        }

        let mut indicator = SimpleMovingAverage::new(period).ok()?;
        let sma = values[values.len() - period..]
            .iter()
            .fold(0.0, |_, value| indicator.next(*value));

        Some(SMA { period, sma })
    }
}
