//! 스냅샷 입력 모델.
//!
//! HTTP 레이어(범위 외)가 요청을 파싱해 전달하는 요청 단위 입력.
//! 생성 후 불변이며 처리 완료 시 폐기된다.

use serde::{Deserialize, Serialize};

/// 듀얼 스냅샷 분석 요청 입력
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotInput {
    /// 사용자 웹캠 스냅샷 (data URL, base64 인코딩 이미지)
    pub webcam_image: String,
    /// 참조 댄스 영상 경로 (상대 경로면 설정된 base dir 기준 해석)
    pub reference_video_path: String,
    /// 참조 영상 재생 시각 (초) — 벽시계가 아닌 영상 클록
    pub video_timestamp: f64,
    /// 세션 식별자 (불투명 상관관계 토큰)
    pub session_id: String,
}
