//! 키워드 기반 휴리스틱 점수 분류기.
//!
//! 모델이 JSON 형식 지시를 무시한 경우에도 파이프라인이 응답성을
//! 유지하도록, 원문 텍스트의 키워드 존재 여부만으로 유사도 구간을
//! 결정한다. 순수 함수 — JSON 파싱 단계와 독립적으로 테스트된다.

/// 피사체 키워드 — 프레임에 사람이 보인다는 일반 신호
const SUBJECT_KEYWORD: &str = "person";

/// 동작 관련 키워드 — 자세/움직임을 실제로 언급했다는 신호
const MOTION_KEYWORDS: [&str; 3] = ["dance", "pose", "movement"];

/// 휴리스틱 분류 결과
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicScore {
    /// 유사도 구간 (0.5 / 0.6 / 0.7)
    pub similarity_score: f64,
    /// 긍정적 피드백 여부
    pub is_positive: bool,
}

/// 원문 텍스트를 세 구간 중 하나로 분류.
///
/// - 피사체 + 동작 키워드 → 0.7, 긍정
/// - 피사체만 → 0.6, 긍정
/// - 둘 다 없음 → 0.5, 부정
pub fn classify(text: &str) -> HeuristicScore {
    let lowered = text.to_lowercase();
    let has_subject = lowered.contains(SUBJECT_KEYWORD);
    let has_motion = MOTION_KEYWORDS.iter().any(|kw| lowered.contains(kw));

    if has_subject && has_motion {
        HeuristicScore {
            similarity_score: 0.7,
            is_positive: true,
        }
    } else if has_subject {
        HeuristicScore {
            similarity_score: 0.6,
            is_positive: true,
        }
    } else {
        HeuristicScore {
            similarity_score: 0.5,
            is_positive: false,
        }
    }
}
