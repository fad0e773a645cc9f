//! 도메인 데이터 모델.
//!
//! 스냅샷 입력, 피드백 레코드, 픽셀 프레임 등
//! 파이프라인 전 구간에서 공유하는 데이터 구조를 정의한다.

pub mod feedback;
pub mod frame;
pub mod snapshot;
