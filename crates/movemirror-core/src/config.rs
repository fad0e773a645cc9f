//! 애플리케이션 설정 구조체.
//!
//! API 자격증명, 이미지 정규화 한도, 피드백 윈도우/게이트 파라미터를
//! 정의한다. API 키는 프로세스 환경변수에서 로드하며, 미설정 시
//! 기동 단계에서 명확한 진단과 함께 실패한다 (하류의 불명확한
//! 인증 실패 대신).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::CoreError;

/// API 키 환경변수 (우선)
pub const API_KEY_ENV: &str = "MOVEMIRROR_API_KEY";
/// API 키 환경변수 (호환 폴백)
pub const API_KEY_ENV_FALLBACK: &str = "OPENAI_API_KEY";

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 비전 모델 API 설정
    pub api: ApiConfig,
    /// 이미지 정규화 설정
    #[serde(default)]
    pub vision: VisionConfig,
    /// 피드백 파이프라인 설정
    #[serde(default)]
    pub feedback: FeedbackConfig,
}

/// 비전 모델 API 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// 엔드포인트 URL (OpenAI chat completions 호환)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// API 키 (메모리에만 유지 — 직렬화 제외)
    #[serde(skip)]
    pub api_key: String,
    /// 모델 이름
    #[serde(default = "default_model")]
    pub model: String,
    /// 요청 타임아웃 (초) — 전송 계층 기본값 역할
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// 이미지 정규화 설정 — 전송 전 최대 크기
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    /// 최대 너비 (픽셀)
    pub max_width: u32,
    /// 최대 높이 (픽셀)
    pub max_height: u32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            max_width: 640,
            max_height: 480,
        }
    }
}

/// 피드백 파이프라인 설정
///
/// 윈도우 용량은 별도 상수가 아니라 `tier2_interval_secs ÷
/// sampling_period_secs`에서 파생된다. 호출 주기가 바뀌어도
/// "interval 분량의 이력"이라는 불변식이 유지된다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackConfig {
    /// Tier 2 트렌드 분석 주기 (초, 참조 영상 클록 기준)
    pub tier2_interval_secs: f64,
    /// 스냅샷 호출 주기 기대값 (초)
    pub sampling_period_secs: f64,
    /// 참조 영상 상대 경로의 기준 디렉토리
    pub video_base_dir: PathBuf,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            tier2_interval_secs: 3.0,
            sampling_period_secs: 0.5,
            video_base_dir: PathBuf::from("."),
        }
    }
}

impl FeedbackConfig {
    /// 롤링 윈도우 용량 — interval 분량의 Tier 1 레코드 수
    ///
    /// 기본값(3.0s / 0.5s) 기준 6.
    pub fn window_capacity(&self) -> usize {
        if self.sampling_period_secs <= 0.0 {
            return 1;
        }
        let derived = (self.tier2_interval_secs / self.sampling_period_secs).ceil();
        (derived as usize).max(1)
    }
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl AppConfig {
    /// 기본 설정 (API 키 비어 있음 — 환경변수 주입 전 상태)
    pub fn default_config() -> Self {
        Self {
            api: ApiConfig {
                endpoint: default_endpoint(),
                api_key: String::new(),
                model: default_model(),
                timeout_secs: default_timeout_secs(),
            },
            vision: VisionConfig::default(),
            feedback: FeedbackConfig::default(),
        }
    }

    /// 환경변수에서 설정 로드.
    ///
    /// `MOVEMIRROR_API_KEY`(폴백 `OPENAI_API_KEY`)가 없거나 비어 있으면
    /// 즉시 실패한다 — 서비스는 자격증명 없이 기동되어선 안 된다.
    pub fn from_env() -> Result<Self, CoreError> {
        let api_key = std::env::var(API_KEY_ENV)
            .or_else(|_| std::env::var(API_KEY_ENV_FALLBACK))
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                CoreError::Config(format!(
                    "비전 모델 API 키 미설정 — 환경변수 {API_KEY_ENV} 또는 \
                     {API_KEY_ENV_FALLBACK}를 설정하세요"
                ))
            })?;

        let mut config = Self::default_config();
        config.api.api_key = api_key;

        if let Ok(endpoint) = std::env::var("MOVEMIRROR_API_ENDPOINT") {
            if !endpoint.trim().is_empty() {
                config.api.endpoint = endpoint;
            }
        }
        if let Ok(model) = std::env::var("MOVEMIRROR_MODEL") {
            if !model.trim().is_empty() {
                config.api.model = model;
            }
        }
        if let Ok(dir) = std::env::var("MOVEMIRROR_VIDEO_DIR") {
            if !dir.trim().is_empty() {
                config.feedback.video_base_dir = PathBuf::from(dir);
            }
        }

        Ok(config)
    }
}
