use crate::model::PivotType;
use crate::model::PivotType::{HH, HL, LH, LL};
use serde::Serialize;
use std::fmt::Display;

/// 반전 패턴 이름
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternName {
    BullishReversal,
    BearishReversal,
}

impl PatternName {
    pub fn is_bullish(&self) -> bool {
        matches!(self, PatternName::BullishReversal)
    }
}

impl Display for PatternName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternName::BullishReversal => write!(f, "bullish_reversal"),
            PatternName::BearishReversal => write!(f, "bearish_reversal"),
        }
    }
}

/// 패턴 카탈로그 (선언 순서가 동률 시 우선순위)
const CATALOGUE: &[(PatternName, &[PivotType])] = &[
    (PatternName::BullishReversal, &[HH, HL, HH, HL, HH]),
    (PatternName::BullishReversal, &[LH, HL, HH, HL, HH]),
    (PatternName::BullishReversal, &[HH, HH, HH]),
    (PatternName::BullishReversal, &[HH, HL, HH, HH]),
    (PatternName::BearishReversal, &[LL, LL, LH, LL]),
    (PatternName::BearishReversal, &[LL, LH, LL, LH, LL]),
    (PatternName::BearishReversal, &[LL, LL, LL]),
    (PatternName::BearishReversal, &[LL, LH, LL]),
];

/// 일치한 패턴
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternMatch {
    pub name: PatternName,
    /// 일치한 유형 시퀀스
    pub signature: Vec<PivotType>,
}

/// 피벗 유형 시퀀스의 꼬리에서 반전 패턴을 찾습니다.
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher;

impl PatternMatcher {
    pub fn new() -> PatternMatcher {
        PatternMatcher
    }

    /// 시퀀스 끝이 카탈로그의 시그니처와 일치하는지 검사
    ///
    /// 여러 시그니처가 일치하면 가장 긴 것이, 길이가 같으면 먼저 선언된 것이 선택됩니다.
    pub fn scan(&self, types: &[PivotType]) -> Option<PatternMatch> {
        let mut best: Option<(PatternName, &[PivotType])> = None;

        for (name, signature) in CATALOGUE {
            if !types.ends_with(signature) {
                continue;
            }
            match best {
                Some((_, current)) if current.len() >= signature.len() => {}
                _ => best = Some((*name, *signature)),
            }
        }

        best.map(|(name, signature)| {
            log::debug!("패턴 일치: {} {:?}", name, signature);
            PatternMatch {
                name,
                signature: signature.to_vec(),
            }
        })
    }
}
