//! 비전 모델 클라이언트.
//!
//! `VisionModel` 포트의 reqwest 구현. OpenAI 호환 `POST
//! /v1/chat/completions` 형식으로 단일 턴 멀티모달 요청을 보낸다.
//!
//! **보안**:
//! - API 키는 환경변수에서 로드되어 메모리에만 유지
//! - 빈 키는 생성 시점에 거부 (기동 단계 진단)
//!
//! 재시도/로컬 타임아웃 없음 — 전송 계층 타임아웃만 적용하며,
//! 모든 실패는 호출 측의 폴백 레코드로 흡수된다.

use async_trait::async_trait;
use tracing::{debug, warn};

use movemirror_core::config::ApiConfig;
use movemirror_core::error::CoreError;
use movemirror_core::ports::vision_model::{ImageDetail, ModelRequest, VisionModel};

/// 외부 비전 모델 클라이언트 — OpenAI chat completions 호환
#[derive(Debug)]
pub struct OpenAiVisionClient {
    /// HTTP 클라이언트
    http_client: reqwest::Client,
    /// API 엔드포인트 URL
    endpoint: String,
    /// API 키 (메모리에만 유지)
    api_key: String,
    /// 모델 이름
    model: String,
}

impl OpenAiVisionClient {
    /// 새 클라이언트 생성
    ///
    /// API 키가 비어 있으면 즉시 에러 — 서비스는 자격증명 없이
    /// 사용 가능해선 안 된다 (하류의 불명확한 401 대신).
    pub fn new(config: &ApiConfig) -> Result<Self, CoreError> {
        if config.api_key.trim().is_empty() {
            return Err(CoreError::Config(
                "비전 모델 API 키 미설정 — 환경변수를 확인하세요".into(),
            ));
        }

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 생성 실패: {e}")))?;

        debug!(
            endpoint = %config.endpoint,
            model = %config.model,
            timeout = config.timeout_secs,
            "OpenAiVisionClient 초기화"
        );

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    /// 요청 본문 구성 — content 배열: 텍스트 파트 1 + image_url 파트 0~2
    fn build_request_body(&self, request: &ModelRequest) -> serde_json::Value {
        let mut content = vec![serde_json::json!({
            "type": "text",
            "text": request.prompt,
        })];

        for image in &request.images {
            let detail = match image.detail {
                ImageDetail::Low => "low",
                ImageDetail::High => "high",
            };
            content.push(serde_json::json!({
                "type": "image_url",
                "image_url": { "url": image.data_url, "detail": detail },
            }));
        }

        serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": content }],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        })
    }

    /// 응답 본문에서 `choices[0].message.content` 텍스트 추출
    fn extract_completion_text(body: &str) -> Result<String, CoreError> {
        let response: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| CoreError::ModelResponse(format!("응답 JSON 파싱 실패: {e}")))?;

        response
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|arr| arr.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|msg| msg.get("content"))
            .and_then(|t| t.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                CoreError::ModelResponse("응답에서 완성 텍스트를 찾을 수 없음".to_string())
            })
    }

    /// 에러 본문이 콘텐츠 정책/안전성 거부를 나타내는지 판별
    fn is_content_policy_rejection(body: &str) -> bool {
        let lowered = body.to_ascii_lowercase();
        lowered.contains("content policy")
            || lowered.contains("content_policy")
            || lowered.contains("safety")
    }
}

#[async_trait]
impl VisionModel for OpenAiVisionClient {
    async fn complete(&self, request: &ModelRequest) -> Result<String, CoreError> {
        let body = self.build_request_body(request);

        debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            images = request.images.len(),
            max_tokens = request.max_tokens,
            "비전 모델 API 호출"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("비전 모델 API 호출 실패: {e}")))?;

        let status = response.status();
        let response_body = response
            .text()
            .await
            .map_err(|e| CoreError::Network(format!("비전 모델 응답 읽기 실패: {e}")))?;

        if !status.is_success() {
            let excerpt: String = response_body.chars().take(200).collect();
            if Self::is_content_policy_rejection(&response_body) {
                warn!(status = %status, "비전 모델 콘텐츠 정책 거부");
                return Err(CoreError::ContentPolicy(excerpt));
            }
            warn!(status = %status, "비전 모델 API 오류 응답");
            return Err(CoreError::Network(format!(
                "비전 모델 API 오류 ({status}): {excerpt}"
            )));
        }

        let text = Self::extract_completion_text(&response_body)?;
        debug!(length = text.len(), "비전 모델 응답 수신");
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

// ============================================================
// 테스트
// ============================================================
