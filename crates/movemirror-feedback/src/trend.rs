//! Tier 2 트렌드 분석기.
//!
//! 롤링 윈도우의 Tier 1 레코드를 압축 JSON으로 렌더링해 텍스트 전용
//! 요청으로 보내고, 짧고 강조된 코치 스타일 트렌드 피드백을 받는다.
//! Tier 1과 동일한 방어적 파싱 전략을 쓰되, 휴리스틱 대신 윈도우
//! 평균 유사도 기반 고정 중립 폴백으로 귀결된다. 절대 에러를
//! 반환하지 않는다.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use movemirror_core::models::feedback::{Tier1Record, Tier2Record};
use movemirror_core::ports::vision_model::{ModelRequest, VisionModel};

use crate::parse;

/// 종합 피드백 최대 단어 수
const MAX_OVERALL_WORDS: usize = 30;
/// 트렌드/격려 문구 최대 단어 수
const MAX_SHORT_WORDS: usize = 20;
/// Tier 2 출력 길이 상한 (토큰)
const TIER2_MAX_TOKENS: u32 = 200;
/// 샘플링 온도
const TIER2_TEMPERATURE: f32 = 0.3;

/// Tier 2 분석기
pub struct TrendAnalyzer {
    model: Arc<dyn VisionModel>,
}

/// 프롬프트에 삽입되는 윈도우 항목의 압축 렌더링
#[derive(Debug, Serialize)]
struct TrendEntry<'a> {
    timestamp: f64,
    feedback: &'a str,
    similarity: f64,
    focus_areas: &'a [String],
    issues: &'a [String],
}

/// Tier 2 JSON 응답 스키마 — 필드별 명시적 기본값
#[derive(Debug, Deserialize)]
struct Tier2Response {
    overall_feedback: Option<String>,
    overall_similarity_score: Option<f64>,
    trend_analysis: Option<String>,
    #[serde(default)]
    key_improvements: Vec<String>,
    encouragement: Option<String>,
    #[serde(default = "default_true")]
    is_positive: bool,
}

fn default_true() -> bool {
    true
}

impl TrendAnalyzer {
    /// 새 트렌드 분석기 생성
    pub fn new(model: Arc<dyn VisionModel>) -> Self {
        Self { model }
    }

    /// 윈도우 요약 분석. 항상 유효한 레코드를 반환한다.
    ///
    /// 빈 윈도우는 모델 호출 없이 중립 폴백으로 단락한다.
    pub async fn summarize(&self, records: &[Tier1Record]) -> Tier2Record {
        if records.is_empty() {
            debug!("빈 윈도우 — 모델 호출 없이 중립 폴백");
            return neutral_fallback(0.5, "No data available");
        }

        let avg_similarity =
            records.iter().map(|r| r.similarity_score).sum::<f64>() / records.len() as f64;

        let prompt = match build_trend_prompt(records, avg_similarity) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!("트렌드 프롬프트 구성 실패 — 중립 폴백: {e}");
                return neutral_fallback(avg_similarity, "Consistent performance");
            }
        };

        let request = ModelRequest {
            prompt,
            images: vec![],
            max_tokens: TIER2_MAX_TOKENS,
            temperature: TIER2_TEMPERATURE,
        };

        debug!(window_len = records.len(), avg_similarity, "Tier 2 트렌드 분석 호출");

        match self.model.complete(&request).await {
            Ok(text) => parse_tier2_response(&text, avg_similarity),
            Err(e) => {
                warn!("Tier 2 모델 호출 실패 — 중립 폴백: {e}");
                neutral_fallback(avg_similarity, "Consistent performance")
            }
        }
    }
}

/// 트렌드 지시문 구성 — 윈도우 항목의 압축 JSON 포함 텍스트 전용 프롬프트
fn build_trend_prompt(
    records: &[Tier1Record],
    avg_similarity: f64,
) -> Result<String, serde_json::Error> {
    let entries: Vec<TrendEntry<'_>> = records
        .iter()
        .map(|r| TrendEntry {
            timestamp: r.timestamp,
            feedback: &r.feedback_text,
            similarity: r.similarity_score,
            focus_areas: &r.focus_areas,
            issues: &r.specific_issues,
        })
        .collect();
    let rendered = serde_json::to_string_pretty(&entries)?;

    Ok(format!(
        r#"You are a dance coach reviewing the last few seconds of a student's practice.
Here are the recent per-snapshot analysis results, oldest first:
{rendered}

Analyze the trends and give short, emphatic coach feedback with strong words
such as "ARMS HIGHER", "GOOD JOB", "You are DOING awesome", "body move more" —
grounded in the student's actual movement above, not generic phrases.

Respond ONLY with a JSON object in this exact format:
{{
    "overall_feedback": "Brief coach feedback (max 30 words)",
    "overall_similarity_score": {avg_similarity:.2},
    "trend_analysis": "Brief trend description (max 20 words)",
    "key_improvements": ["improvement1", "improvement2"],
    "encouragement": "Motivational message (max 20 words)",
    "is_positive": true
}}"#
    ))
}

/// 응답 파싱 — 엄격 JSON 디코딩, 실패 시 평균 기반 중립 폴백
fn parse_tier2_response(text: &str, avg_similarity: f64) -> Tier2Record {
    if let Some(json) = parse::extract_json_object(text) {
        match serde_json::from_str::<Tier2Response>(json) {
            Ok(response) => {
                debug!("Tier 2 JSON 응답 파싱 성공");
                return Tier2Record {
                    timestamp: Utc::now(),
                    overall_feedback: parse::truncate_words(
                        &response
                            .overall_feedback
                            .unwrap_or_else(|| "Keep practicing!".to_string()),
                        MAX_OVERALL_WORDS,
                    ),
                    overall_similarity_score: response
                        .overall_similarity_score
                        .unwrap_or(avg_similarity),
                    trend_analysis: parse::truncate_words(
                        &response
                            .trend_analysis
                            .unwrap_or_else(|| "Consistent performance".to_string()),
                        MAX_SHORT_WORDS,
                    ),
                    key_improvements: response.key_improvements,
                    encouragement: parse::truncate_words(
                        &response
                            .encouragement
                            .unwrap_or_else(|| "Great job!".to_string()),
                        MAX_SHORT_WORDS,
                    ),
                    is_positive: response.is_positive,
                };
            }
            Err(e) => {
                warn!("Tier 2 JSON 디코딩 실패 — 중립 폴백: {e}");
            }
        }
    } else {
        warn!("Tier 2 응답에서 JSON 미발견 — 중립 폴백");
    }

    neutral_fallback(avg_similarity, "Consistent performance")
}

/// 고정 중립 폴백 레코드 — 점수는 윈도우 평균 유사도
fn neutral_fallback(avg_similarity: f64, trend_text: &str) -> Tier2Record {
    Tier2Record {
        timestamp: Utc::now(),
        overall_feedback: "Keep practicing!".to_string(),
        overall_similarity_score: avg_similarity,
        trend_analysis: trend_text.to_string(),
        key_improvements: vec![],
        encouragement: "You're doing great!".to_string(),
        is_positive: true,
    }
}

// ============================================================
// 테스트
// ============================================================
