use std::fmt::Display;

/// 기본 변동성 계산 구간
pub const DEFAULT_VOLATILITY_WINDOW: usize = 20;

/// 변동성 (평균 대비 평균 절대 상대편차, %)
#[derive(Clone, Debug)]
pub struct Volatility {
    window: usize,
    pub value: f64,
}

impl Display for Volatility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Volatility({}: {:.3}%)", self.window, self.value)
    }
}

impl Volatility {
    /// 마지막 `window`개 종가로 변동성 계산
    ///
    /// 평균이 0 이하이면 계산하지 않습니다.
    pub fn from_values(values: &[f64], window: usize) -> Option<Volatility> {
        if window == 0 || values.len() < window {
            return None;
        }

        let recent = &values[values.len() - window..];
        let avg = recent.iter().sum::<f64>() / window as f64;
        if avg <= 0.0 {
            return None;
        }

        let deviation = recent.iter().map(|p| (p - avg).abs() / avg).sum::<f64>() / window as f64;

        Some(Volatility {
            window,
            value: deviation * 100.0,
        })
    }
}
