//! 파이프라인 오케스트레이터.
//!
//! 스냅샷당 공개 진입점. 프레임 추출 → 인코딩 → Tier 1 분석 →
//! 윈도우 추가 → Tier 2 게이트 평가를 배선한다.
//!
//! 외부 계약: **절대 에러를 반환하지 않는다.** 내부 단계의 모든
//! `Result` 실패는 이 경계에서 고정 폴백 레코드로 변환된다 —
//! 하류 소비자는 에러 경로를 처리하지 않는다.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use movemirror_core::config::{AppConfig, VisionConfig};
use movemirror_core::error::CoreError;
use movemirror_core::models::feedback::{Severity, Tier1Record, Tier2Record};
use movemirror_core::models::snapshot::SnapshotInput;
use movemirror_core::ports::frame_source::FrameExtractor;
use movemirror_core::ports::vision_model::VisionModel;
use movemirror_vision::encoder;

use crate::analyzer::PoseAnalyzer;
use crate::session::SessionRegistry;
use crate::trend::TrendAnalyzer;

/// 2단계 피드백 파이프라인
pub struct FeedbackPipeline {
    analyzer: PoseAnalyzer,
    trend: TrendAnalyzer,
    extractor: Arc<dyn FrameExtractor>,
    registry: SessionRegistry,
    vision: VisionConfig,
    window_capacity: usize,
}

impl FeedbackPipeline {
    /// 새 파이프라인 생성.
    ///
    /// 윈도우 용량은 설정에서 파생된다 (interval ÷ 샘플링 주기).
    pub fn new(
        config: &AppConfig,
        model: Arc<dyn VisionModel>,
        extractor: Arc<dyn FrameExtractor>,
    ) -> Self {
        let window_capacity = config.feedback.window_capacity();
        info!(
            model = model.model_name(),
            window_capacity,
            interval = config.feedback.tier2_interval_secs,
            "피드백 파이프라인 초기화"
        );

        Self {
            analyzer: PoseAnalyzer::new(model.clone(), &config.vision),
            trend: TrendAnalyzer::new(model),
            extractor,
            registry: SessionRegistry::new(window_capacity, config.feedback.tier2_interval_secs),
            vision: config.vision.clone(),
            window_capacity,
        }
    }

    /// 세션 레지스트리 접근 (세션 종료 시 상태 해체용)
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// 스냅샷 처리 — 공개 진입점. 절대 에러를 반환하지 않는다.
    pub async fn process_snapshot(
        &self,
        input: SnapshotInput,
    ) -> (Tier1Record, Option<Tier2Record>) {
        let timestamp = input.video_timestamp;
        match self.run(input).await {
            Ok(result) => result,
            Err(e) => {
                error!(timestamp, "스냅샷 처리 중 내부 에러 — 폴백 반환: {e}");
                (processing_error_fallback(timestamp), None)
            }
        }
    }

    /// 내부 처리 — 실패는 `process_snapshot` 경계에서 흡수된다
    async fn run(
        &self,
        input: SnapshotInput,
    ) -> Result<(Tier1Record, Option<Tier2Record>), CoreError> {
        let timestamp = input.video_timestamp;
        let session = self.registry.obtain(&input.session_id);

        // 1. 참조 프레임 추출 — 블로킹 디코딩은 워커 스레드에서
        let extractor = self.extractor.clone();
        let video_path = PathBuf::from(&input.reference_video_path);
        let frame =
            tokio::task::spawn_blocking(move || extractor.extract(&video_path, timestamp))
                .await
                .map_err(|e| CoreError::Internal(format!("프레임 추출 태스크 실패: {e}")))?;

        let Some(frame) = frame else {
            warn!(
                timestamp,
                path = %input.reference_video_path,
                "참조 프레임 부재 — 모델 호출 생략"
            );
            return Ok((frame_unavailable_fallback(timestamp), None));
        };

        // 2. 추출 프레임을 전송용 data URL로 인코딩
        let reference_url =
            encoder::frame_to_data_url(&frame, self.vision.max_width, self.vision.max_height)?;

        // 3. Tier 1 분석 (infallible)
        let tier1 = self
            .analyzer
            .analyze(&input.webcam_image, &reference_url, timestamp)
            .await;

        // 4. 롤링 윈도우에 추가
        let window_len = {
            let mut window = session.window.lock();
            window.push(tier1.clone());
            window.len()
        };

        // 5. Tier 2 게이트 평가 — 발화 시 in-flight 선점은 게이트 락 아래 원자적
        let fired = session
            .gate
            .lock()
            .try_fire(timestamp, window_len, self.window_capacity);

        let tier2 = if fired {
            let records = session.window.lock().snapshot();
            debug!(
                timestamp,
                window_len = records.len(),
                "Tier 2 게이트 발화 — 트렌드 분석 실행"
            );
            let result = self.trend.summarize(&records).await;
            session.gate.lock().complete(timestamp);
            info!(timestamp, "Tier 2 트렌드 분석 완료");
            Some(result)
        } else {
            None
        };

        Ok((tier1, tier2))
    }
}

/// 참조 프레임 부재 시 고정 폴백 — 모델 호출 없음
fn frame_unavailable_fallback(timestamp: f64) -> Tier1Record {
    Tier1Record {
        timestamp,
        feedback_text: "Reference frame unavailable. Keep practicing!".to_string(),
        severity: Severity::Low,
        focus_areas: vec!["general".to_string()],
        similarity_score: 0.5,
        is_positive: true,
        specific_issues: vec![],
        recommendations: vec!["Continue practicing".to_string()],
    }
}

/// 내부 에러 경계 폴백
fn processing_error_fallback(timestamp: f64) -> Tier1Record {
    Tier1Record {
        timestamp,
        feedback_text: "Processing error occurred".to_string(),
        severity: Severity::Medium,
        focus_areas: vec!["general".to_string()],
        similarity_score: 0.5,
        is_positive: false,
        specific_issues: vec!["Processing error occurred".to_string()],
        recommendations: vec!["Continue practicing and focus on the reference".to_string()],
    }
}

// ============================================================
// 테스트
// ============================================================
