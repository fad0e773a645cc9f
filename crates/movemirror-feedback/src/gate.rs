//! Tier 2 발화 게이트.
//!
//! 벽시계가 아닌 **참조 영상 재생 시각**으로 경과를 판정한다 —
//! 처리가 지연되어도 게이팅이 영상 진행을 따라가도록.
//!
//! 발화 조건 (스냅샷 처리마다 한 번 평가):
//! - 경과 Δ = t − 마지막 발화 시각 ≥ interval
//! - 윈도우에 최소 레코드 수 축적
//! - 동일 세션에 진행 중인 Tier 2 분석 없음
//!
//! 타임스탬프 역행(되감기/재시작)은 리셋으로 취급 — 오래된 기준값
//! 때문에 무기한 잠기지 않고 즉시 재발화가 허용된다.

use tracing::debug;

/// 초기 센티널 — 첫 적격 호출에서 Δ가 항상 interval을 넘도록 큰 음수
const INITIAL_LAST_RUN: f64 = -999.0;

/// Tier 2 게이트 상태 (세션당 하나)
///
/// `try_fire`/`complete`는 호출자가 동일 락 아래에서 호출해야 한다 —
/// in-flight 선점(test-and-set)이 원자적이어야 동시 제출이 이중
/// 발화하지 않는다.
#[derive(Debug)]
pub struct GateState {
    /// 마지막 Tier 2 발화 시각 (참조 영상 클록)
    last_run_timestamp: f64,
    /// 발화 주기 (초)
    interval_secs: f64,
    /// Tier 2 분석 진행 중 플래그
    in_progress: bool,
}

impl GateState {
    /// 새 게이트 생성
    pub fn new(interval_secs: f64) -> Self {
        Self {
            last_run_timestamp: INITIAL_LAST_RUN,
            interval_secs,
            in_progress: false,
        }
    }

    /// 게이트 평가 + 발화 시 in-flight 선점.
    ///
    /// true 반환 시 호출자는 분석을 실행하고 완료 후 반드시
    /// [`complete`](Self::complete)를 호출해야 한다.
    pub fn try_fire(&mut self, video_timestamp: f64, window_len: usize, min_window: usize) -> bool {
        let mut delta = video_timestamp - self.last_run_timestamp;

        // 타임스탬프 역행 — 영상 되감기/재시작으로 간주하고 리셋
        if delta < 0.0 {
            debug!(
                timestamp = video_timestamp,
                last_run = self.last_run_timestamp,
                "영상 타임스탬프 역행 — 게이트 기준 리셋"
            );
            self.last_run_timestamp = video_timestamp - self.interval_secs;
            delta = self.interval_secs;
        }

        if delta >= self.interval_secs && window_len >= min_window && !self.in_progress {
            self.in_progress = true;
            return true;
        }

        if self.in_progress {
            debug!("Tier 2 분석 진행 중 — 발화 생략");
        }
        false
    }

    /// 분석 완료 — in-flight 해제, 기준 시각 갱신.
    ///
    /// Tier 2 분석은 항상 유효한 레코드로 귀결되므로(폴백 포함)
    /// 완료는 무조건 기준 시각을 전진시킨다 — 지속 실패 상황에서
    /// 매 스냅샷마다 모델을 재호출하지 않는다.
    pub fn complete(&mut self, video_timestamp: f64) {
        self.in_progress = false;
        self.last_run_timestamp = video_timestamp;
    }

    /// Tier 2 분석 진행 중 여부
    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    /// 마지막 발화 시각
    pub fn last_run_timestamp(&self) -> f64 {
        self.last_run_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: f64 = 3.0;
    const MIN_WINDOW: usize = 6;

    #[test]
    fn fires_immediately_on_first_eligible_call() {
        let mut gate = GateState::new(INTERVAL);
        // 센티널 초기값 덕에 첫 호출부터 Δ가 충분히 큼
        assert!(gate.try_fire(0.0, MIN_WINDOW, MIN_WINDOW));
    }

    #[test]
    fn does_not_fire_with_small_window() {
        let mut gate = GateState::new(INTERVAL);
        assert!(!gate.try_fire(10.0, MIN_WINDOW - 1, MIN_WINDOW));
    }

    #[test]
    fn fires_every_call_at_exact_interval_spacing() {
        let mut gate = GateState::new(INTERVAL);
        for step in 0..5 {
            let t = step as f64 * INTERVAL;
            assert!(gate.try_fire(t, MIN_WINDOW, MIN_WINDOW), "t={t}에서 발화해야 함");
            gate.complete(t);
        }
    }

    #[test]
    fn fires_every_other_call_at_half_interval_spacing() {
        let mut gate = GateState::new(INTERVAL);
        let mut fired = Vec::new();
        for step in 0..8 {
            let t = step as f64 * (INTERVAL / 2.0);
            let fire = gate.try_fire(t, MIN_WINDOW, MIN_WINDOW);
            if fire {
                gate.complete(t);
            }
            fired.push(fire);
        }
        // 첫 호출 발화 후 interval의 절반 간격이므로 한 번 걸러 발화
        assert_eq!(
            fired,
            vec![true, false, true, false, true, false, true, false]
        );
    }

    #[test]
    fn backward_seek_resets_and_allows_immediate_fire() {
        let mut gate = GateState::new(INTERVAL);
        assert!(gate.try_fire(30.0, MIN_WINDOW, MIN_WINDOW));
        gate.complete(30.0);

        // 영상 되감기: 30.0 → 2.0. 리셋되어 즉시 발화 허용
        assert!(gate.try_fire(2.0, MIN_WINDOW, MIN_WINDOW), "역행 후 잠기면 안 됨");
        gate.complete(2.0);
        assert!((gate.last_run_timestamp() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn backward_seek_with_small_window_still_resets_baseline() {
        let mut gate = GateState::new(INTERVAL);
        assert!(gate.try_fire(30.0, MIN_WINDOW, MIN_WINDOW));
        gate.complete(30.0);

        // 윈도우 부족으로 발화는 못 하지만 기준은 리셋됨
        assert!(!gate.try_fire(2.0, 1, MIN_WINDOW));
        // 이어지는 동일/이후 시각의 적격 호출은 즉시 발화
        assert!(gate.try_fire(2.0, MIN_WINDOW, MIN_WINDOW));
    }

    #[test]
    fn in_flight_flag_blocks_second_fire() {
        let mut gate = GateState::new(INTERVAL);
        assert!(gate.try_fire(10.0, MIN_WINDOW, MIN_WINDOW));
        // 완료 전 두 번째 평가 — 배타성으로 거부
        assert!(!gate.try_fire(10.0, MIN_WINDOW, MIN_WINDOW));
        assert!(gate.in_progress());

        gate.complete(10.0);
        assert!(!gate.in_progress());
    }

    #[test]
    fn completion_always_advances_baseline() {
        let mut gate = GateState::new(INTERVAL);
        assert!(gate.try_fire(10.0, MIN_WINDOW, MIN_WINDOW));
        gate.complete(10.0);

        // 완료는 무조건 기준 시각을 전진 — interval 경과 전 재발화 금지
        assert!((gate.last_run_timestamp() - 10.0).abs() < f64::EPSILON);
        assert!(!gate.try_fire(10.1, MIN_WINDOW, MIN_WINDOW));
        assert!(gate.try_fire(13.0, MIN_WINDOW, MIN_WINDOW));
    }

    #[test]
    fn does_not_fire_before_interval_elapses() {
        let mut gate = GateState::new(INTERVAL);
        assert!(gate.try_fire(0.0, MIN_WINDOW, MIN_WINDOW));
        gate.complete(0.0);

        assert!(!gate.try_fire(1.0, MIN_WINDOW, MIN_WINDOW));
        assert!(!gate.try_fire(2.9, MIN_WINDOW, MIN_WINDOW));
        assert!(gate.try_fire(3.0, MIN_WINDOW, MIN_WINDOW));
    }
}
