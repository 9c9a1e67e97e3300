use crate::error::ValidationError;
use crate::model::PivotType;
use chrono::{NaiveTime, Timelike};
use log::debug;
use serde::{Deserialize, Serialize};

/// 수동 입력 가격 상한
pub const MAX_MANUAL_PRICE: f64 = 500_000.0;

/// 운영자가 입력한 피벗 한 건
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManualPivotInput {
    pub kind: PivotType,
    pub price: f64,
    /// 세션 기준 시각 (HH:MM)
    pub time: NaiveTime,
}

impl ManualPivotInput {
    pub fn new(kind: PivotType, price: f64, time: NaiveTime) -> Self {
        ManualPivotInput { kind, price, time }
    }
}

/// 봉 경계로 내림 처리된 시각
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeAdjustment {
    pub original: NaiveTime,
    pub adjusted: NaiveTime,
}

/// 검증을 통과한 배치
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBatch {
    /// 시각이 봉 경계로 조정된 입력
    pub entries: Vec<ManualPivotInput>,
    pub adjustments: Vec<TimeAdjustment>,
}

/// `유형 가격 시간` 토큰 묶음을 파싱합니다.
///
/// 시간은 `13:30` 또는 `13h30` 형식을 받습니다. 값의 범위와 구조 검사는
/// [`validate_batch`]에서 수행합니다.
pub fn parse_manual_args(tokens: &[&str]) -> Result<Vec<ManualPivotInput>, ValidationError> {
    if tokens.is_empty() {
        return Err(ValidationError::EmptyBatch);
    }
    if tokens.len() % 3 != 0 {
        return Err(ValidationError::MalformedArguments(tokens.len()));
    }

    tokens
        .chunks(3)
        .map(|chunk| {
            let kind = chunk[0]
                .parse::<PivotType>()
                .map_err(|_| ValidationError::InvalidType(chunk[0].to_string()))?;
            let price = chunk[1]
                .trim()
                .replace(',', "")
                .parse::<f64>()
                .map_err(|_| ValidationError::InvalidPrice(chunk[1].to_string()))?;
            let time = parse_time(chunk[2])?;
            Ok(ManualPivotInput::new(kind, price, time))
        })
        .collect()
}

/// `HH:MM` 또는 `HHhMM` 시각 파싱
pub fn parse_time(value: &str) -> Result<NaiveTime, ValidationError> {
    let normalized = value.trim().to_ascii_lowercase().replace('h', ":");
    NaiveTime::parse_from_str(&normalized, "%H:%M")
        .map_err(|_| ValidationError::InvalidTime(value.to_string()))
}

/// 봉 길이 단위로 시각을 내림합니다.
pub fn round_down_to_bar(time: NaiveTime, bar_minutes: u32) -> NaiveTime {
    if bar_minutes == 0 {
        return time;
    }
    let minute = time.minute() - time.minute() % bar_minutes;
    NaiveTime::from_hms_opt(time.hour(), minute, 0).unwrap_or(time)
}

/// 수동 배치 전체 검증
///
/// 하나라도 규칙을 어기면 배치 전체가 거부됩니다.
///
/// # Arguments
/// * `entries` - 입력 순서의 피벗
/// * `max_price` - 허용 가격 상한
/// * `bar_minutes` - 시각 내림 단위 (분)
pub fn validate_batch(
    entries: &[ManualPivotInput],
    max_price: f64,
    bar_minutes: u32,
) -> Result<ValidatedBatch, ValidationError> {
    if entries.is_empty() {
        return Err(ValidationError::EmptyBatch);
    }

    for entry in entries {
        if !(entry.price > 0.0 && entry.price <= max_price) {
            return Err(ValidationError::PriceOutOfRange {
                price: entry.price,
                max: max_price,
            });
        }
    }

    // 입력된 원래 시각 기준으로 순서 확인
    for pair in entries.windows(2) {
        if pair[1].time < pair[0].time {
            return Err(ValidationError::TimeNotAscending {
                previous: pair[0].time,
                current: pair[1].time,
            });
        }
    }

    let mut adjustments = Vec::new();
    let rounded: Vec<ManualPivotInput> = entries
        .iter()
        .map(|entry| {
            let adjusted = round_down_to_bar(entry.time, bar_minutes);
            if adjusted != entry.time {
                debug!(
                    "시각 조정: {} -> {}",
                    entry.time.format("%H:%M"),
                    adjusted.format("%H:%M")
                );
                adjustments.push(TimeAdjustment {
                    original: entry.time,
                    adjusted,
                });
            }
            ManualPivotInput::new(entry.kind, entry.price, adjusted)
        })
        .collect();

    for pair in rounded.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        if let Some(rule) = structure_violation(prev, curr) {
            return Err(ValidationError::StructureViolation {
                previous: prev.kind,
                previous_price: prev.price,
                current: curr.kind,
                current_price: curr.price,
                time: curr.time,
                rule,
            });
        }
    }

    Ok(ValidatedBatch {
        entries: rounded,
        adjustments,
    })
}

/// 연속된 두 피벗의 구조 규칙 검사
///
/// 위반 시 깨진 규칙 설명을 반환합니다.
fn structure_violation(prev: &ManualPivotInput, curr: &ManualPivotInput) -> Option<&'static str> {
    use PivotType::{HH, HL, LH, LL};

    match (curr.kind, prev.kind) {
        (LH, LL) if curr.price <= prev.price => Some("높아야 합니다"),
        (LH, HH) if curr.price >= prev.price => Some("낮아야 합니다"),
        (HL, LH | HH) if curr.price >= prev.price => Some("낮아야 합니다"),
        (HL, LL) if curr.price <= prev.price => Some("높아야 합니다"),
        (HH, _) if curr.price <= prev.price => Some("높아야 합니다"),
        (LL, _) if curr.price >= prev.price => Some("낮아야 합니다"),
        _ => None,
    }
}
