use crate::analyzer::Trend;
use crate::model::{ConfirmedPivot, PivotType};
use crate::pivot::PatternName;
use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;

/// 알림에 포함하는 최근 피벗 개수
pub const ALERT_PIVOT_COUNT: usize = 5;

/// 반전 패턴 감지 알림
///
/// 엔진은 구조화된 이벤트만 만들고, 전달 방식은 [`AlertSink`] 구현이 결정합니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertEvent {
    pub pattern: PatternName,
    /// 일치한 유형 시퀀스
    pub signature: Vec<PivotType>,
    /// 알림 시점의 종가
    pub current_price: f64,
    /// 최근 피벗 (최신 → 오래된 순, 최대 5개)
    pub recent_pivots: Vec<ConfirmedPivot>,
    /// 이동평균 추세 (시장 상황을 계산하지 않았거나 이력이 부족하면 None)
    pub market_trend: Option<Trend>,
    /// 알림을 발생시킨 캔들 시간
    pub time: DateTime<Utc>,
}

impl AlertEvent {
    /// 사람이 읽을 알림 문구
    pub fn message(&self) -> String {
        let (marker, direction) = if self.pattern.is_bullish() {
            ("🟢", "상승")
        } else {
            ("🔴", "하락")
        };

        let mut message = format!(
            "{} {} 반전 패턴 경고 - {}\n\n현재가: ${:.2}\n패턴: {}\n",
            marker,
            direction,
            self.time.format("%Y-%m-%d %H:%M"),
            self.current_price,
            self.pattern
        );
        if let Some(trend) = self.market_trend {
            message.push_str(&format!("시장 추세: {}\n", trend));
        }
        message.push_str(&format!("\n최근 피벗 {}개:\n", self.recent_pivots.len()));

        for (i, pivot) in self.recent_pivots.iter().enumerate() {
            message.push_str(&format!(
                "{}. {}: ${:.2} ({})\n",
                i + 1,
                pivot.kind,
                pivot.price,
                pivot.time.format("%H:%M")
            ));
        }

        message
    }
}

/// 알림 수신자
pub trait AlertSink {
    fn deliver(&mut self, event: &AlertEvent);
}

/// 로그로만 알림을 남기는 수신자
#[derive(Debug, Default)]
pub struct LogAlertSink {
    /// 지금까지 전달된 알림 수
    pub delivered: usize,
}

impl AlertSink for LogAlertSink {
    fn deliver(&mut self, event: &AlertEvent) {
        self.delivered += 1;
        info!("{}", event.message());
    }
}

/// 메모리에 알림을 모아두는 수신자
#[derive(Debug, Default)]
pub struct CollectingAlertSink {
    pub events: Vec<AlertEvent>,
}

impl AlertSink for CollectingAlertSink {
    fn deliver(&mut self, event: &AlertEvent) {
        self.events.push(event.clone());
    }
}
