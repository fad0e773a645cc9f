//! Tier 1 자세 비교 분석기.
//!
//! 웹캠 프레임과 참조 프레임을 정규화해 비전 모델에 보내고,
//! 응답을 [`Tier1Record`]로 파싱한다. 어떤 경로로도 에러를 반환하지
//! 않는다 — 형식 불량 응답은 휴리스틱 분류, API 실패는 고정 중립
//! 폴백으로 귀결된다.

use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use tracing::{debug, warn};

use movemirror_core::config::VisionConfig;
use movemirror_core::error::CoreError;
use movemirror_core::models::feedback::{Severity, Tier1Record};
use movemirror_core::ports::vision_model::{ModelImage, ModelRequest, VisionModel};
use movemirror_vision::normalize;

use crate::heuristic;
use crate::parse;

/// 피드백 최대 단어 수
const MAX_FEEDBACK_WORDS: usize = 50;
/// Tier 1 출력 길이 상한 (토큰)
const TIER1_MAX_TOKENS: u32 = 500;
/// 샘플링 온도 — 결정성 선호
const TIER1_TEMPERATURE: f32 = 0.3;

/// API 실패 폴백 피드백
const API_FALLBACK_FEEDBACK: &str = "Keep practicing! Focus on matching the reference pose.";

/// Tier 1 분석기
pub struct PoseAnalyzer {
    model: Arc<dyn VisionModel>,
    max_width: u32,
    max_height: u32,
}

/// 비전 모델 JSON 응답 스키마 — 필드별 명시적 기본값으로 1회 디코딩
///
/// 기본값 리터럴을 호출부에 흩뿌리는 대신 여기 한 곳에 모은다.
#[derive(Debug, Deserialize)]
struct Tier1Response {
    /// 없으면 원문 앞부분으로 대체 (호출 측 처리)
    feedback_text: Option<String>,
    #[serde(default = "default_similarity")]
    similarity_score: f64,
    #[serde(default, deserialize_with = "lenient_severity")]
    severity: Severity,
    #[serde(default = "default_focus_areas")]
    focus_areas: Vec<String>,
    #[serde(default)]
    specific_issues: Vec<String>,
    #[serde(default = "default_recommendations")]
    recommendations: Vec<String>,
    #[serde(default = "default_true")]
    is_positive: bool,
}

fn default_similarity() -> f64 {
    0.7
}

fn default_focus_areas() -> Vec<String> {
    vec!["general".to_string()]
}

fn default_recommendations() -> Vec<String> {
    vec!["Continue practicing".to_string()]
}

fn default_true() -> bool {
    true
}

/// 알 수 없는 severity 문자열은 기본값(medium)으로 — 응답 전체를
/// 휴리스틱으로 떨어뜨릴 사유가 아니다
fn lenient_severity<'de, D>(deserializer: D) -> Result<Severity, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

impl PoseAnalyzer {
    /// 새 분석기 생성
    pub fn new(model: Arc<dyn VisionModel>, vision: &VisionConfig) -> Self {
        Self {
            model,
            max_width: vision.max_width,
            max_height: vision.max_height,
        }
    }

    /// 웹캠/참조 프레임 비교 분석. 항상 유효한 레코드를 반환한다.
    pub async fn analyze(
        &self,
        webcam_image: &str,
        reference_image: &str,
        timestamp: f64,
    ) -> Tier1Record {
        debug!(timestamp, "Tier 1 자세 비교 분석 시작");

        let webcam = normalize::normalize_data_url(webcam_image, self.max_width, self.max_height);
        let reference =
            normalize::normalize_data_url(reference_image, self.max_width, self.max_height);

        let request = ModelRequest {
            prompt: comparison_prompt().to_string(),
            images: vec![ModelImage::low(webcam), ModelImage::low(reference)],
            max_tokens: TIER1_MAX_TOKENS,
            temperature: TIER1_TEMPERATURE,
        };

        match self.model.complete(&request).await {
            Ok(text) => parse_tier1_response(&text, timestamp),
            Err(CoreError::ContentPolicy(msg)) => {
                warn!(timestamp, "콘텐츠 정책 거부 — 중립 폴백 반환: {msg}");
                api_failure_fallback(timestamp)
            }
            Err(e) => {
                warn!(timestamp, "비전 모델 호출 실패 — 중립 폴백 반환: {e}");
                api_failure_fallback(timestamp)
            }
        }
    }
}

/// 비교 지시문 — 두 이미지와 함께 전송되는 단일 턴 프롬프트
fn comparison_prompt() -> &'static str {
    r#"Look at the two images. The first is a student trying to follow the dance
in the second image, which shows the professional reference. Give SHORT,
coach-like feedback (max 50 words) about the student's movement: name the body
parts that are off (arms not high enough, hands, legs, shoulders, hips), or if
the student's full body is not in the frame, tell them to move back. Be direct
and actionable. Respond ONLY with a JSON object in this exact format:
{"feedback_text": "short coach feedback here", "similarity_score": 0.8,
"severity": "medium", "focus_areas": ["area1", "area2"],
"specific_issues": ["issue1"], "recommendations": ["recommendation1"],
"positive_feedback": "positive note", "is_positive": true}"#
}

/// 응답 파싱 — 1단계 엄격 JSON 디코딩, 실패 시 2단계 휴리스틱 분류
fn parse_tier1_response(text: &str, timestamp: f64) -> Tier1Record {
    if let Some(json) = parse::extract_json_object(text) {
        match serde_json::from_str::<Tier1Response>(json) {
            Ok(response) => {
                let raw_feedback = response
                    .feedback_text
                    .unwrap_or_else(|| text.chars().take(200).collect());
                debug!(timestamp, "Tier 1 JSON 응답 파싱 성공");
                return Tier1Record {
                    timestamp,
                    feedback_text: parse::truncate_words(&raw_feedback, MAX_FEEDBACK_WORDS),
                    severity: response.severity,
                    focus_areas: response.focus_areas,
                    similarity_score: response.similarity_score,
                    is_positive: response.is_positive,
                    specific_issues: response.specific_issues,
                    recommendations: response.recommendations,
                };
            }
            Err(e) => {
                warn!(timestamp, "Tier 1 JSON 디코딩 실패 — 휴리스틱 분류: {e}");
            }
        }
    } else {
        warn!(timestamp, "응답에서 JSON 미발견 — 휴리스틱 분류");
    }

    heuristic_record(text, timestamp)
}

/// 휴리스틱 레코드 구성 — 원문 키워드 점수 + 원문 앞부분 피드백
fn heuristic_record(text: &str, timestamp: f64) -> Tier1Record {
    let score = heuristic::classify(text);
    let raw_feedback = if text.trim().is_empty() {
        API_FALLBACK_FEEDBACK.to_string()
    } else {
        text.chars().take(300).collect()
    };

    Tier1Record {
        timestamp,
        feedback_text: parse::truncate_words(&raw_feedback, MAX_FEEDBACK_WORDS),
        severity: Severity::Medium,
        focus_areas: vec!["general".to_string()],
        similarity_score: score.similarity_score,
        is_positive: score.is_positive,
        specific_issues: vec![],
        recommendations: vec![
            "Continue practicing".to_string(),
            "Watch the reference video".to_string(),
        ],
    }
}

/// API 실패 시 고정 중립 폴백 레코드
pub(crate) fn api_failure_fallback(timestamp: f64) -> Tier1Record {
    Tier1Record {
        timestamp,
        feedback_text: API_FALLBACK_FEEDBACK.to_string(),
        severity: Severity::Medium,
        focus_areas: vec!["general".to_string()],
        similarity_score: 0.5,
        is_positive: true,
        specific_issues: vec![],
        recommendations: vec!["Continue practicing and focus on the reference".to_string()],
    }
}

// ============================================================
// 테스트
// ============================================================
