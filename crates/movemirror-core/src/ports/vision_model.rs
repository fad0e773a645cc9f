//! 비전 모델 포트.
//!
//! 호스팅 멀티모달 모델(GPT-4o 계열 등)에 대한 단일 턴 호출 인터페이스.
//! 요청은 텍스트 지시문 하나 + 이미지 0~2장, 응답은 자유 텍스트 완성이다.
//! 응답에 JSON이 포함될 것으로 기대하지만 강제되지 않는다 — 파싱은
//! 호출 측(`movemirror-feedback`)이 방어적으로 수행한다.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 이미지 충실도 힌트 — 모델이 이미지를 처리할 해상도 수준
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageDetail {
    /// 저해상도 처리 (빠르고 저렴 — 실시간 피드백용)
    Low,
    /// 고해상도 처리
    High,
}

/// 요청에 첨부되는 이미지 (data URL + 충실도 힌트)
#[derive(Debug, Clone)]
pub struct ModelImage {
    /// `data:image/<fmt>;base64,...` 형식 인코딩 이미지
    pub data_url: String,
    /// 충실도 힌트
    pub detail: ImageDetail,
}

impl ModelImage {
    /// 저해상도 힌트로 이미지 첨부 생성
    pub fn low(data_url: impl Into<String>) -> Self {
        Self {
            data_url: data_url.into(),
            detail: ImageDetail::Low,
        }
    }
}

/// 단일 턴 모델 요청
#[derive(Debug, Clone)]
pub struct ModelRequest {
    /// 지시문 텍스트
    pub prompt: String,
    /// 첨부 이미지 (0~2장)
    pub images: Vec<ModelImage>,
    /// 출력 길이 상한 (토큰)
    pub max_tokens: u32,
    /// 샘플링 온도 (결정성 선호 — 낮게 유지)
    pub temperature: f32,
}

/// 비전 모델 제공자 — 이미지+프롬프트 → 텍스트 완성
///
/// 구현체: `OpenAiVisionClient` (movemirror-network), 테스트 스텁
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// 단일 턴 완성 요청. 성공 시 모델의 텍스트 응답을 반환한다.
    ///
    /// 로컬 타임아웃/재시도 없음 — 실패는 호출 측에서 폴백 처리한다.
    async fn complete(&self, request: &ModelRequest) -> Result<String, CoreError>;

    /// 모델 이름 (예: "gpt-4o-mini")
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_detail_serde_lowercase() {
        assert_eq!(serde_json::to_string(&ImageDetail::Low).unwrap(), "\"low\"");
        assert_eq!(
            serde_json::to_string(&ImageDetail::High).unwrap(),
            "\"high\""
        );
    }

    #[test]
    fn model_image_low_helper() {
        let img = ModelImage::low("data:image/jpeg;base64,AA==");
        assert_eq!(img.detail, ImageDetail::Low);
        assert!(img.data_url.starts_with("data:image/jpeg"));
    }
}
