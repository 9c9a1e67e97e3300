// 스윙 피벗 감지 모듈
// 후보 확인, 구조 분류, 저장, 반전 패턴 탐지, 수동 입력 검증을 담당합니다.

pub mod classifier;
pub mod manual;
pub mod pattern;
pub mod pending;
pub mod store;

pub use classifier::PivotClassifier;
pub use manual::{ManualPivotInput, TimeAdjustment, ValidatedBatch, parse_manual_args};
pub use pattern::{PatternMatch, PatternMatcher, PatternName};
pub use pending::{PendingPivot, PendingPivotTracker, Resolution};
pub use store::{Admission, PivotStore, RejectReason};
