pub mod alert;
pub mod analyzer;
pub mod engine;
pub mod error;
pub mod indicator;
pub mod model;
pub mod pivot;
pub mod price_history;
pub mod report;

/// 엔진 설정
pub mod config;
/// 설정 로더
pub mod config_loader;

pub use engine::{PivotEngine, SharedPivotEngine};
pub use error::{PivotError, PivotResult, ValidationError};
