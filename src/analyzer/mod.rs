// 추세 및 지지/저항 분석기 모듈
// 피벗 채택 판단의 보조 신호를 제공합니다.

pub mod support_resistance_analyzer;
pub mod trend_analyzer;

pub use support_resistance_analyzer::{LevelName, SRLevel, SupportResistanceCalculator};
pub use trend_analyzer::{Trend, TrendAnalyzer, TrendState};
