//! 참조 영상 프레임 추출 어댑터.
//!
//! `FrameExtractor` 포트 구현. 영상 디코딩 자체는 블랙박스
//! (`VideoDecoder` 포트)에 위임하고, 이 어댑터는 경로 해석,
//! 프레임 인덱스 계산, 실패의 부재(None) 변환만 담당한다.
//!
//! 디코더 핸들은 추출 호출 범위 안에서만 유지된다 — 성공/실패
//! 모든 경로에서 함수 종료 시 Drop으로 해제된다.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use movemirror_core::models::frame::PixelFrame;
use movemirror_core::ports::frame_source::{FrameExtractor, VideoDecoder};
use tracing::{debug, warn};

/// 영상 프레임 추출기 — `FrameExtractor` 포트 구현
pub struct VideoFrameExtractor {
    decoder: Arc<dyn VideoDecoder>,
    /// 상대 경로 해석 기준 디렉토리
    base_dir: PathBuf,
}

impl VideoFrameExtractor {
    /// 새 추출기 생성
    pub fn new(decoder: Arc<dyn VideoDecoder>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            decoder,
            base_dir: base_dir.into(),
        }
    }

    /// 상대 경로를 기준 디렉토리에 대해 해석
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl FrameExtractor for VideoFrameExtractor {
    fn extract(&self, path: &Path, timestamp_secs: f64) -> Option<PixelFrame> {
        let resolved = self.resolve(path);
        debug!(path = %resolved.display(), timestamp = timestamp_secs, "참조 영상 열기");

        let mut clip = match self.decoder.open(&resolved) {
            Ok(clip) => clip,
            Err(e) => {
                warn!(path = %resolved.display(), "영상 열기 실패: {e}");
                return None;
            }
        };

        let fps = match clip.frame_rate() {
            Some(fps) if fps > 0.0 => fps,
            _ => {
                warn!(path = %resolved.display(), "프레임 레이트 판별 불가");
                return None;
            }
        };

        if !timestamp_secs.is_finite() || timestamp_secs < 0.0 {
            warn!(timestamp = timestamp_secs, "유효하지 않은 타임스탬프");
            return None;
        }

        let frame_index = (timestamp_secs * fps).floor() as u64;
        match clip.read_frame(frame_index) {
            Some(frame) => {
                debug!(
                    "참조 프레임 추출: {timestamp_secs}s (프레임 {frame_index}, {}x{})",
                    frame.width, frame.height
                );
                Some(frame)
            }
            None => {
                warn!("프레임 읽기 실패: {timestamp_secs}s (프레임 {frame_index})");
                None
            }
        }
        // clip은 여기서 Drop — 디코더 자원 해제
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use movemirror_core::error::CoreError;
    use movemirror_core::ports::frame_source::VideoClip;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::Mutex;

    /// 고정 fps/프레임 수를 가진 스텁 클립
    struct StubClip {
        fps: Option<f64>,
        frame_count: u64,
        last_index: Arc<AtomicU64>,
        released: Arc<AtomicBool>,
    }

    impl VideoClip for StubClip {
        fn frame_rate(&self) -> Option<f64> {
            self.fps
        }

        fn read_frame(&mut self, index: u64) -> Option<PixelFrame> {
            self.last_index.store(index, Ordering::SeqCst);
            if index < self.frame_count {
                Some(PixelFrame::filled(16, 9, [1, 2, 3]))
            } else {
                None
            }
        }
    }

    impl Drop for StubClip {
        fn drop(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    struct StubDecoder {
        fps: Option<f64>,
        frame_count: u64,
        fail_open: bool,
        last_index: Arc<AtomicU64>,
        released: Arc<AtomicBool>,
        opened_path: Mutex<Option<PathBuf>>,
    }

    impl StubDecoder {
        fn new(fps: Option<f64>, frame_count: u64) -> Self {
            Self {
                fps,
                frame_count,
                fail_open: false,
                last_index: Arc::new(AtomicU64::new(u64::MAX)),
                released: Arc::new(AtomicBool::new(false)),
                opened_path: Mutex::new(None),
            }
        }
    }

    impl VideoDecoder for StubDecoder {
        fn open(&self, path: &Path) -> Result<Box<dyn VideoClip>, CoreError> {
            *self.opened_path.lock().unwrap() = Some(path.to_path_buf());
            if self.fail_open {
                return Err(CoreError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no such video",
                )));
            }
            Ok(Box::new(StubClip {
                fps: self.fps,
                frame_count: self.frame_count,
                last_index: self.last_index.clone(),
                released: self.released.clone(),
            }))
        }
    }

    #[test]
    fn extract_computes_floor_frame_index() {
        let decoder = Arc::new(StubDecoder::new(Some(29.97), 10_000));
        let last_index = decoder.last_index.clone();
        let extractor = VideoFrameExtractor::new(decoder, "/videos");

        let frame = extractor.extract(Path::new("ref.mp4"), 2.0);
        assert!(frame.is_some());
        // floor(2.0 * 29.97) = 59
        assert_eq!(last_index.load(Ordering::SeqCst), 59);
    }

    #[test]
    fn extract_resolves_relative_path() {
        let decoder = Arc::new(StubDecoder::new(Some(30.0), 100));
        let extractor = VideoFrameExtractor::new(decoder.clone(), "/data/videos");

        extractor.extract(Path::new("lesson/ref.mp4"), 0.0);
        let opened = decoder.opened_path.lock().unwrap().clone().unwrap();
        assert_eq!(opened, PathBuf::from("/data/videos/lesson/ref.mp4"));
    }

    #[test]
    fn extract_keeps_absolute_path() {
        let decoder = Arc::new(StubDecoder::new(Some(30.0), 100));
        let extractor = VideoFrameExtractor::new(decoder.clone(), "/data/videos");

        extractor.extract(Path::new("/abs/ref.mp4"), 0.0);
        let opened = decoder.opened_path.lock().unwrap().clone().unwrap();
        assert_eq!(opened, PathBuf::from("/abs/ref.mp4"));
    }

    #[test]
    fn extract_absent_when_open_fails() {
        let mut decoder = StubDecoder::new(Some(30.0), 100);
        decoder.fail_open = true;
        let extractor = VideoFrameExtractor::new(Arc::new(decoder), ".");

        assert!(extractor.extract(Path::new("missing.mp4"), 1.0).is_none());
    }

    #[test]
    fn extract_absent_when_fps_unavailable() {
        let decoder = Arc::new(StubDecoder::new(None, 100));
        let released = decoder.released.clone();
        let extractor = VideoFrameExtractor::new(decoder, ".");

        assert!(extractor.extract(Path::new("ref.mp4"), 1.0).is_none());
        assert!(released.load(Ordering::SeqCst), "실패 경로에서도 자원 해제");
    }

    #[test]
    fn extract_absent_when_fps_zero() {
        let decoder = Arc::new(StubDecoder::new(Some(0.0), 100));
        let extractor = VideoFrameExtractor::new(decoder, ".");
        assert!(extractor.extract(Path::new("ref.mp4"), 1.0).is_none());
    }

    #[test]
    fn extract_absent_past_video_end() {
        let decoder = Arc::new(StubDecoder::new(Some(30.0), 90)); // 3초 분량
        let released = decoder.released.clone();
        let extractor = VideoFrameExtractor::new(decoder, ".");

        assert!(extractor.extract(Path::new("ref.mp4"), 10.0).is_none());
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn extract_absent_for_negative_timestamp() {
        let decoder = Arc::new(StubDecoder::new(Some(30.0), 100));
        let extractor = VideoFrameExtractor::new(decoder, ".");
        assert!(extractor.extract(Path::new("ref.mp4"), -1.0).is_none());
    }

    #[test]
    fn extract_releases_clip_on_success() {
        let decoder = Arc::new(StubDecoder::new(Some(30.0), 100));
        let released = decoder.released.clone();
        let extractor = VideoFrameExtractor::new(decoder, ".");

        assert!(extractor.extract(Path::new("ref.mp4"), 1.0).is_some());
        assert!(released.load(Ordering::SeqCst), "성공 경로에서 자원 해제");
    }
}
