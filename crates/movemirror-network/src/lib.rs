//! # movemirror-network
//!
//! 호스팅 비전 모델 HTTP 어댑터.
//! OpenAI chat completions 호환 엔드포인트에 멀티모달 요청(텍스트 지시문
//! + data URL 이미지)을 전송하고 텍스트 완성을 반환한다.

pub mod vision_client;
