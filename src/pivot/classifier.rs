use crate::indicator::trend_sign;
use crate::model::{ConfirmedPivot, PivotType, RawPivotKind};
use log::debug;

/// 구조 판정에 사용하는 최근 피벗 개수
pub const CLASSIFICATION_WINDOW: usize = 5;

/// 확정된 극값을 HH/HL/LH/LL로 분류하는 분류기
#[derive(Debug, Clone)]
pub struct PivotClassifier {
    pub window: usize,
}

impl Default for PivotClassifier {
    fn default() -> Self {
        Self::new(CLASSIFICATION_WINDOW)
    }
}

impl PivotClassifier {
    pub fn new(window: usize) -> PivotClassifier {
        PivotClassifier {
            window: window.max(3),
        }
    }

    /// 극값의 구조 유형 결정
    ///
    /// # Arguments
    /// * `price` - 확정된 극값 가격
    /// * `kind` - 원시 방향 (H/L)
    /// * `pivots` - 시간순으로 정렬된 기존 피벗
    ///
    /// # Returns
    /// * `Some(PivotType)` - 분류 결과
    /// * `None` - 검증 단계에서 거부됨 (후보는 버려야 함)
    pub fn classify(
        &self,
        price: f64,
        kind: RawPivotKind,
        pivots: &[ConfirmedPivot],
    ) -> Option<PivotType> {
        if pivots.len() < self.window {
            return Some(Self::classify_initial(price, kind, pivots.last()));
        }

        let window: Vec<f64> = pivots[pivots.len() - self.window..]
            .iter()
            .map(|p| p.price)
            .collect();

        let result = match kind {
            RawPivotKind::High => self.classify_high(price, &window),
            RawPivotKind::Low => self.classify_low(price, &window),
        };

        debug!(
            "피벗 분류: {} ${:.2} -> {:?} (최근 가격 {:?})",
            kind, price, result, window
        );
        result
    }

    /// 피벗이 부족할 때 직전 피벗 하나와만 비교
    fn classify_initial(
        price: f64,
        kind: RawPivotKind,
        last: Option<&ConfirmedPivot>,
    ) -> PivotType {
        match (kind, last) {
            (RawPivotKind::High, None) => PivotType::HH,
            (RawPivotKind::Low, None) => PivotType::LL,
            (RawPivotKind::High, Some(last)) if price > last.price => PivotType::HH,
            (RawPivotKind::High, Some(_)) => PivotType::LH,
            (RawPivotKind::Low, Some(last)) if price < last.price => PivotType::LL,
            (RawPivotKind::Low, Some(_)) => PivotType::HL,
        }
    }

    fn classify_high(&self, price: f64, window: &[f64]) -> Option<PivotType> {
        let max = window.iter().cloned().fold(f64::MIN, f64::max);
        let min = window.iter().cloned().fold(f64::MAX, f64::min);

        // 구간 최고가 돌파는 추세 부호와 무관하게 HH
        if price > max {
            return Some(PivotType::HH);
        }

        if trend_sign(window) > 0 {
            let (prev, middle, next) = self.middle_triplet(window);
            if middle > prev && middle > next && price > middle {
                return Some(PivotType::HH);
            }
            return Some(PivotType::LH);
        }

        if price < min {
            return Some(PivotType::LH);
        }

        Self::verify_lower_high(price, window)
    }

    fn classify_low(&self, price: f64, window: &[f64]) -> Option<PivotType> {
        let max = window.iter().cloned().fold(f64::MIN, f64::max);
        let min = window.iter().cloned().fold(f64::MAX, f64::min);

        // 구간 최저가 이탈은 추세 부호와 무관하게 LL
        if price < min {
            return Some(PivotType::LL);
        }

        if trend_sign(window) < 0 {
            let (prev, middle, next) = self.middle_triplet(window);
            if middle < prev && middle < next && price < middle {
                return Some(PivotType::LL);
            }
            return Some(PivotType::HL);
        }

        if price > max {
            return Some(PivotType::HL);
        }

        Self::verify_higher_low(price, window)
    }

    /// 구간 가운데 원소와 그 양옆
    fn middle_triplet(&self, window: &[f64]) -> (f64, f64, f64) {
        let mid = window.len() / 2;
        (window[mid - 1], window[mid], window[mid + 1])
    }

    /// 현재가보다 높은 가격들의 평균보다 낮을 때만 LH
    fn verify_lower_high(price: f64, window: &[f64]) -> Option<PivotType> {
        let higher: Vec<f64> = window.iter().cloned().filter(|p| *p > price).collect();
        if higher.is_empty() {
            return None;
        }

        let avg = higher.iter().sum::<f64>() / higher.len() as f64;
        if price < avg {
            Some(PivotType::LH)
        } else {
            debug!("LH 검증 실패: ${:.2} >= 평균 ${:.2}", price, avg);
            None
        }
    }

    /// 현재가보다 낮은 가격들의 평균보다 높을 때만 HL
    fn verify_higher_low(price: f64, window: &[f64]) -> Option<PivotType> {
        let lower: Vec<f64> = window.iter().cloned().filter(|p| *p < price).collect();
        if lower.is_empty() {
            return None;
        }

        let avg = lower.iter().sum::<f64>() / lower.len() as f64;
        if price > avg {
            Some(PivotType::HL)
        } else {
            debug!("HL 검증 실패: ${:.2} <= 평균 ${:.2}", price, avg);
            None
        }
    }
}
