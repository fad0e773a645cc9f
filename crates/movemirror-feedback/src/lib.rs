//! # movemirror-feedback
//!
//! 2단계 댄스 피드백 파이프라인.
//!
//! - **Tier 1** — 스냅샷당 웹캠/참조 프레임 자세 비교 (비전 모델 호출)
//! - **Tier 2** — 참조 영상 시간으로 게이팅되는 윈도우 트렌드 요약
//!
//! 전 구간 fail-soft: 모든 실패 경로는 정의된 대체 레코드로 귀결되며
//! 공개 진입점([`pipeline::FeedbackPipeline::process_snapshot`])은
//! 절대 에러를 반환하지 않는다.
//!
//! ## 구조
//!
//! - [`parse`] — 반구조화 모델 응답의 방어적 JSON 추출
//! - [`heuristic`] — 파싱 실패 시 키워드 기반 점수 분류기
//! - [`analyzer`] — Tier 1 자세 비교 분석기
//! - [`window`] — 고정 용량 FIFO 롤링 윈도우
//! - [`gate`] — Tier 2 발화 조건 (시간 경과 + 데이터 축적 + 배타성)
//! - [`trend`] — Tier 2 트렌드 분석기
//! - [`session`] — 세션별 윈도우/게이트 상태 레지스트리
//! - [`pipeline`] — 공개 진입점 오케스트레이터

pub mod analyzer;
pub mod gate;
pub mod heuristic;
pub mod parse;
pub mod pipeline;
pub mod session;
pub mod trend;
pub mod window;

pub use analyzer::PoseAnalyzer;
pub use pipeline::FeedbackPipeline;
pub use session::SessionRegistry;
pub use trend::TrendAnalyzer;
pub use window::FeedbackWindow;
