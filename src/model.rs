use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// 30분봉 한 개의 분석용 데이터
///
/// 고가/저가/종가만 보관합니다. 시가와 거래량은 피벗 판정에 쓰이지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// 캔들 시간 (UTC)
    pub time: DateTime<Utc>,
    /// 고가
    pub high: f64,
    /// 저가
    pub low: f64,
    /// 종가
    pub close: f64,
}

impl Sample {
    /// 새 샘플 생성
    pub fn new(time: DateTime<Utc>, high: f64, low: f64, close: f64) -> Self {
        Sample {
            time,
            high,
            low,
            close,
        }
    }
}

impl Display for Sample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Sample(t={}, h={}, l={}, c={})",
            self.time.format("%Y-%m-%d %H:%M"),
            self.high,
            self.low,
            self.close
        )
    }
}

/// 확인 대기 중인 극값의 원시 방향 (H / L)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RawPivotKind {
    /// 고점 후보
    High,
    /// 저점 후보
    Low,
}

impl RawPivotKind {
    /// 샘플에서 해당 방향의 극값을 꺼냅니다.
    pub fn extreme_of(&self, sample: &Sample) -> f64 {
        match self {
            RawPivotKind::High => sample.high,
            RawPivotKind::Low => sample.low,
        }
    }
}

impl Display for RawPivotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawPivotKind::High => write!(f, "H"),
            RawPivotKind::Low => write!(f, "L"),
        }
    }
}

/// 확정된 피벗의 구조적 유형
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PivotType {
    /// Higher High
    HH,
    /// Higher Low
    HL,
    /// Lower High
    LH,
    /// Lower Low
    LL,
}

impl PivotType {
    /// 고점 계열(HH, LH)인지 확인
    pub fn is_high(&self) -> bool {
        matches!(self, PivotType::HH | PivotType::LH)
    }

    /// 저점 계열(HL, LL)인지 확인
    pub fn is_low(&self) -> bool {
        !self.is_high()
    }
}

impl Display for PivotType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PivotType::HH => "HH",
            PivotType::HL => "HL",
            PivotType::LH => "LH",
            PivotType::LL => "LL",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for PivotType {
    type Err = String;

    /// 대소문자 구분 없이 파싱합니다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HH" => Ok(PivotType::HH),
            "HL" => Ok(PivotType::HL),
            "LH" => Ok(PivotType::LH),
            "LL" => Ok(PivotType::LL),
            other => Err(format!("알 수 없는 피벗 유형: {}", other)),
        }
    }
}

/// 피벗 출처
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PivotSource {
    /// 운영자가 수동으로 입력한 피벗
    User,
    /// 시스템이 자동으로 감지한 피벗
    System,
}

impl Display for PivotSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PivotSource::User => write!(f, "user"),
            PivotSource::System => write!(f, "system"),
        }
    }
}

/// 확정된 피벗
///
/// `id`는 저장소가 부여하는 순번으로, 삭제 시 식별자와
/// 같은 시간대 피벗의 삽입 순서 정렬에 사용됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfirmedPivot {
    pub id: u64,
    pub kind: PivotType,
    pub price: f64,
    pub time: DateTime<Utc>,
    pub source: PivotSource,
}

impl Display for ConfirmedPivot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: ${:.2} ({}, {})",
            self.kind,
            self.price,
            self.time.format("%H:%M"),
            self.source
        )
    }
}
