//! 피드백 레코드 모델.
//!
//! Tier 1 (스냅샷당 자세 비교)과 Tier 2 (윈도우 트렌드 요약)의
//! 분석 결과 구조체. 생성 후 변경되지 않는다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 피드백 심각도
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// 가벼운 참고 사항
    Low,
    /// 일반적인 교정 필요
    #[default]
    Medium,
    /// 즉시 교정 필요
    High,
}

/// Tier 1 분석 결과 — 스냅샷당 자세 비교 피드백
///
/// 매 스냅샷 처리마다 생성되어 롤링 윈도우에 추가된다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tier1Record {
    /// 참조 영상 클록 기준 시각 (초)
    pub timestamp: f64,
    /// 코치 스타일 피드백 (최대 50단어)
    pub feedback_text: String,
    /// 심각도
    pub severity: Severity,
    /// 주의가 필요한 신체 부위 태그 (순서 유지)
    pub focus_areas: Vec<String>,
    /// 자세 유사도 (0.0 ~ 1.0)
    pub similarity_score: f64,
    /// 긍정적 피드백 여부
    pub is_positive: bool,
    /// 발견된 구체적 문제
    pub specific_issues: Vec<String>,
    /// 개선 제안
    pub recommendations: Vec<String>,
}

/// Tier 2 분석 결과 — 최근 윈도우에 대한 트렌드 요약 피드백
///
/// 게이트가 발화한 경우에만 생성되며 호출자 반환 외에 보존되지 않는다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tier2Record {
    /// 분석 생성 시각 (벽시계)
    pub timestamp: DateTime<Utc>,
    /// 종합 코치 피드백 (최대 30단어)
    pub overall_feedback: String,
    /// 윈도우 평균 기반 종합 유사도 (0.0 ~ 1.0)
    pub overall_similarity_score: f64,
    /// 트렌드 설명 (최대 20단어)
    pub trend_analysis: String,
    /// 핵심 개선 포인트
    pub key_improvements: Vec<String>,
    /// 격려 메시지 (최대 20단어)
    pub encouragement: String,
    /// 긍정적 피드백 여부
    pub is_positive: bool,
}
