use crate::config_loader::ConfigError;
use crate::model::PivotType;
use chrono::NaiveTime;

/// 수동 피벗 배치 검증 오류
///
/// 배치 전체가 거부되며, 어떤 규칙이 어느 쌍에서 깨졌는지 운영자에게 전달됩니다.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// 빈 배치
    EmptyBatch,
    /// 토큰 개수가 (유형, 가격, 시간) 3개 단위가 아님
    MalformedArguments(usize),
    /// 알 수 없는 피벗 유형
    InvalidType(String),
    /// 숫자로 해석할 수 없는 가격
    InvalidPrice(String),
    /// 허용 범위(0 초과, 최대값 이하)를 벗어난 가격
    PriceOutOfRange { price: f64, max: f64 },
    /// HH:MM 형식이 아닌 시간
    InvalidTime(String),
    /// 시간 순서가 역행함
    TimeNotAscending { previous: NaiveTime, current: NaiveTime },
    /// 연속된 두 피벗의 구조 규칙 위반
    StructureViolation {
        previous: PivotType,
        previous_price: f64,
        current: PivotType,
        current_price: f64,
        time: NaiveTime,
        rule: &'static str,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyBatch => write!(f, "입력된 피벗이 없습니다"),
            ValidationError::MalformedArguments(count) => write!(
                f,
                "잘못된 형식입니다 (토큰 {}개): 유형 가격 시간 순서로 입력하세요",
                count
            ),
            ValidationError::InvalidType(value) => write!(
                f,
                "피벗 유형이 올바르지 않습니다: {} (HH, HL, LH, LL만 허용)",
                value
            ),
            ValidationError::InvalidPrice(value) => {
                write!(f, "가격이 올바르지 않습니다: {}", value)
            }
            ValidationError::PriceOutOfRange { price, max } => {
                write!(f, "가격이 허용 범위를 벗어났습니다: {} (0 < 가격 <= {})", price, max)
            }
            ValidationError::InvalidTime(value) => write!(
                f,
                "시간 형식이 올바르지 않습니다: {} (HH:MM 형식 사용)",
                value
            ),
            ValidationError::TimeNotAscending { previous, current } => write!(
                f,
                "시간은 오름차순이어야 합니다: {} 다음에 {}",
                previous.format("%H:%M"),
                current.format("%H:%M")
            ),
            ValidationError::StructureViolation {
                previous,
                previous_price,
                current,
                current_price,
                time,
                rule,
            } => write!(
                f,
                "구조 오류: {} 시점의 {}(${:.2})는 직전 {}(${:.2})보다 {}",
                time.format("%H:%M"),
                current,
                current_price,
                previous,
                previous_price,
                rule
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// 피벗 엔진 오류
#[derive(Debug)]
pub enum PivotError {
    /// 분석에 필요한 데이터가 부족함 (호출자는 "아직 없음"으로 취급)
    InsufficientData { required: usize, available: usize },
    /// 수동 피벗 배치 검증 실패
    Validation(ValidationError),
    /// 설정 오류
    Config(ConfigError),
    /// 엔진 잠금이 오염됨
    EngineUnavailable,
}

impl std::fmt::Display for PivotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PivotError::InsufficientData {
                required,
                available,
            } => write!(f, "데이터 부족: 필요 {}, 보유 {}", required, available),
            PivotError::Validation(err) => write!(f, "검증 실패: {}", err),
            PivotError::Config(err) => write!(f, "{}", err),
            PivotError::EngineUnavailable => write!(f, "엔진을 사용할 수 없습니다"),
        }
    }
}

impl std::error::Error for PivotError {}

impl From<ValidationError> for PivotError {
    fn from(err: ValidationError) -> Self {
        PivotError::Validation(err)
    }
}

impl From<ConfigError> for PivotError {
    fn from(err: ConfigError) -> Self {
        PivotError::Config(err)
    }
}

/// 피벗 엔진 결과
pub type PivotResult<T> = Result<T, PivotError>;
