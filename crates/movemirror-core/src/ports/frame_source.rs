//! 참조 영상 프레임 추출 포트.
//!
//! 영상 디코딩 라이브러리는 블랙박스로 취급한다: 경로를 열면
//! 프레임 레이트와 인덱스 기반 프레임 읽기를 제공하는 핸들을 얻는다.
//! 핸들은 Drop 시 디코딩 자원을 해제해야 한다 (성공/실패 모든 경로).

use std::path::Path;

use crate::error::CoreError;
use crate::models::frame::PixelFrame;

/// 열린 영상 핸들 — 프레임 레이트 조회 + 인덱스 기반 읽기
///
/// 구현체는 Drop에서 하부 디코더 자원을 해제한다.
pub trait VideoClip: Send {
    /// 프레임 레이트 (fps). 판별 불가 시 None.
    fn frame_rate(&self) -> Option<f64>;

    /// 지정 인덱스의 프레임 읽기. 범위 밖이거나 읽기 실패 시 None.
    fn read_frame(&mut self, index: u64) -> Option<PixelFrame>;
}

/// 영상 디코더 — 경로를 열어 [`VideoClip`] 핸들 반환
pub trait VideoDecoder: Send + Sync {
    /// 영상 파일 열기. 열 수 없으면 에러.
    fn open(&self, path: &Path) -> Result<Box<dyn VideoClip>, CoreError>;
}

/// 고수준 프레임 추출 포트 — 파이프라인이 소비하는 인터페이스
///
/// 경로 + 타임스탬프 → 단일 픽셀 프레임 또는 확정적 부재(None).
/// 어떤 실패도 에러로 전파하지 않는다.
pub trait FrameExtractor: Send + Sync {
    /// 참조 영상의 `timestamp_secs` 시점 프레임을 추출한다.
    ///
    /// 열기 실패, fps 판별 불가, 타임스탬프가 영상 끝을 넘는 경우 등
    /// 모든 실패는 None으로 귀결된다.
    fn extract(&self, path: &Path, timestamp_secs: f64) -> Option<PixelFrame>;
}
