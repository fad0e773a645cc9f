//! # movemirror-vision
//!
//! 이미지 처리 어댑터 — 전송 전 정규화(다운스케일), data URL 코덱,
//! 포맷별 인코딩, 참조 영상 프레임 추출.
//!
//! ## 구조
//!
//! - [`data_url`] — `data:image/<fmt>;base64,...` 파싱/조립
//! - [`normalize`] — 종횡비 보존 다운스케일 (fast_image_resize)
//! - [`encoder`] — jpeg/png/webp 인코딩, 프레임 → data URL 변환
//! - [`extractor`] — `FrameExtractor` 포트 구현 (영상 디코더 위 어댑터)

pub mod data_url;
pub mod encoder;
pub mod extractor;
pub mod normalize;
