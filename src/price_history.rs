use crate::error::{PivotError, PivotResult};
use crate::model::Sample;

/// 기본 보관 개수
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// 제한된 크기의 가격 이력 버퍼
///
/// 최대 크기를 유지하며 샘플을 시간 순서(오래된 것 → 최신)로 저장합니다.
/// 최대 크기를 초과하면 가장 오래된 샘플이 먼저 제거됩니다.
#[derive(Debug, Clone)]
pub struct PriceHistoryBuffer {
    items: Vec<Sample>,
    pub max_size: usize,
}

impl Default for PriceHistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl PriceHistoryBuffer {
    /// 새 버퍼 생성
    ///
    /// # Arguments
    /// * `max_size` - 보관할 최대 샘플 수
    pub fn new(max_size: usize) -> PriceHistoryBuffer {
        PriceHistoryBuffer {
            items: Vec::with_capacity(max_size + 1),
            max_size,
        }
    }

    /// 샘플을 추가합니다.
    ///
    /// 최대 크기를 넘으면 가장 오래된 샘플을 제거합니다.
    pub fn add(&mut self, sample: Sample) {
        self.items.push(sample);

        // 최근 max_size개만 유지
        if self.items.len() > self.max_size {
            let excess = self.items.len() - self.max_size;
            self.items.drain(0..excess);
            log::trace!("가격 이력 초과, 오래된 샘플 {}개 제거", excess);
        }
    }

    /// 최근 `n`개의 샘플을 시간 순서대로 반환합니다.
    ///
    /// # Returns
    /// * `Ok(&[Sample])` - 최근 n개 샘플
    /// * `Err(PivotError::InsufficientData)` - 보유 샘플이 n개 미만
    pub fn recent(&self, n: usize) -> PivotResult<&[Sample]> {
        if self.items.len() < n {
            return Err(PivotError::InsufficientData {
                required: n,
                available: self.items.len(),
            });
        }

        let start = self.items.len() - n;
        Ok(&self.items[start..])
    }

    /// 전체 종가 시계열
    pub fn closes(&self) -> Vec<f64> {
        self.items.iter().map(|s| s.close).collect()
    }

    /// 보관 중인 샘플 수
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 비어 있는지 확인
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
