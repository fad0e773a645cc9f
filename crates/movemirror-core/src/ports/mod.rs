//! Hexagonal Architecture 포트 인터페이스.
//!
//! - [`vision_model`] — 호스팅 비전 모델 호출 (구현: `movemirror-network`)
//! - [`frame_source`] — 참조 영상 프레임 추출 (구현: `movemirror-vision`)

pub mod frame_source;
pub mod vision_model;
