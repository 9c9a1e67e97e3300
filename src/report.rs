use crate::model::{ConfirmedPivot, PivotSource, PivotType};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// 직전 피벗 대비 가격 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

/// 스냅샷의 피벗 한 줄
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotRow {
    pub time: DateTime<Utc>,
    pub kind: PivotType,
    pub price: f64,
    pub source: PivotSource,
    /// 직전 피벗 대비 변화율 (%), 첫 행은 None
    pub change_pct: Option<f64>,
    pub direction: Option<Direction>,
}

/// 외부 보고용 읽기 전용 피벗 스냅샷
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotSnapshot {
    pub rows: Vec<SnapshotRow>,
    pub total: usize,
    pub user_count: usize,
    pub system_count: usize,
}

impl PivotSnapshot {
    /// 시간순 피벗 목록으로 스냅샷 생성
    pub fn from_pivots(pivots: &[ConfirmedPivot]) -> PivotSnapshot {
        let mut rows = Vec::with_capacity(pivots.len());
        let mut prev_price: Option<f64> = None;

        for pivot in pivots {
            let change_pct = prev_price
                .filter(|prev| *prev != 0.0)
                .map(|prev| (pivot.price - prev) / prev * 100.0);
            let direction = change_pct.map(|change| {
                if change > 0.0 {
                    Direction::Up
                } else if change < 0.0 {
                    Direction::Down
                } else {
                    Direction::Flat
                }
            });

            rows.push(SnapshotRow {
                time: pivot.time,
                kind: pivot.kind,
                price: pivot.price,
                source: pivot.source,
                change_pct,
                direction,
            });
            prev_price = Some(pivot.price);
        }

        let user_count = pivots
            .iter()
            .filter(|p| p.source == PivotSource::User)
            .count();

        PivotSnapshot {
            total: rows.len(),
            user_count,
            system_count: rows.len() - user_count,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// JSON 문자열로 내보내기
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
