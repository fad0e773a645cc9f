//! MOVEMIRROR 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 자체 실패를 `CoreError`로 래핑한다.
//! 파이프라인 외부 경계(오케스트레이터)는 모든 에러를 대체 결과로 흡수하므로
//! 이 타입은 내부 전파 및 진단 로깅 용도로만 쓰인다.

use thiserror::Error;

/// 코어 레이어 에러.
/// 설정, 직렬화, 네트워크, 이미지 처리 등 파이프라인 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류 (API 키 미설정 등)
    #[error("설정 에러: {0}")]
    Config(String),

    /// 네트워크 에러 (연결 실패, 타임아웃, 비정상 응답)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 비전 모델이 콘텐츠 정책/안전성 사유로 요청을 거부함
    ///
    /// 반환값은 일반 API 에러와 동일하게 폴백 처리되며,
    /// 진단 로깅에서만 구분된다.
    #[error("콘텐츠 정책 거부: {0}")]
    ContentPolicy(String),

    /// 모델 응답에서 기대한 텍스트를 찾을 수 없음
    #[error("모델 응답 형식 오류: {0}")]
    ModelResponse(String),

    /// 이미지 디코딩/인코딩/리사이즈 실패
    #[error("이미지 처리 에러: {0}")]
    Image(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}
