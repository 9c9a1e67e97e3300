use std::fmt::Display;

/// 기본 RSI 기간
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// RSI 계산 함수
///
/// 최근 `period`개의 종가 변화량에 대한 단순 평균 상승폭/하락폭으로 계산합니다.
/// 평균 하락폭이 정확히 0이면 100을 반환합니다.
fn calculate_rsi(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period + 1 {
        return None;
    }

    let window = &values[values.len() - (period + 1)..];
    let (gain_sum, loss_sum) = window.windows(2).fold((0.0, 0.0), |(gain, loss), w| {
        let change = w[1] - w[0];
        if change > 0.0 {
            (gain + change, loss)
        } else {
            (gain, loss - change)
        }
    });

    let avg_gain = gain_sum / period as f64;
    let avg_loss = loss_sum / period as f64;

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - (100.0 / (1.0 + rs)))
}

/// 상대강도지수(RSI) 기술적 지표
///
/// RSI는 가격 변동의 상대적 강도를 측정하여 과매수/과매도 상태를 판단
#[derive(Clone, Debug)]
pub struct RSI {
    /// RSI 계산 기간
    period: usize,
    /// RSI 값 (0-100)
    pub value: f64,
}

impl Display for RSI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RSI({}: {:.2})", self.period, self.value)
    }
}

impl RSI {
    /// 종가 시계열로 RSI 계산
    ///
    /// # Returns
    /// * `Option<RSI>` - 종가가 `period + 1`개 미만이면 None
    pub fn from_values(values: &[f64], period: usize) -> Option<RSI> {
        calculate_rsi(values, period).map(|value| RSI { period, value })
    }

    /// RSI 값 반환
    pub fn value(&self) -> f64 {
        self.value
    }
}
