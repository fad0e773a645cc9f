//! 세션 상태 레지스트리.
//!
//! 롤링 윈도우와 게이트는 프로세스 전역이 아니라 **세션별** 상태다 —
//! 동시 세션 간 교차 오염을 막기 위해 session_id → 상태 매핑을
//! 명시적으로 관리한다. 첫 스냅샷에서 생성, 세션 종료 시 제거.
//!
//! 락은 parking_lot::Mutex — `.await`를 가로질러 잡지 않는다.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::gate::GateState;
use crate::window::FeedbackWindow;

/// 세션별 가변 상태 — 롤링 윈도우 + Tier 2 게이트
pub struct SessionState {
    /// 최근 Tier 1 레코드 윈도우
    pub(crate) window: Mutex<FeedbackWindow>,
    /// Tier 2 발화 게이트
    pub(crate) gate: Mutex<GateState>,
}

impl SessionState {
    /// 새 세션 상태 생성
    pub fn new(window_capacity: usize, tier2_interval_secs: f64) -> Self {
        Self {
            window: Mutex::new(FeedbackWindow::new(window_capacity)),
            gate: Mutex::new(GateState::new(tier2_interval_secs)),
        }
    }
}

/// 세션 레지스트리 — session_id → [`SessionState`]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Arc<SessionState>>>,
    window_capacity: usize,
    tier2_interval_secs: f64,
}

impl SessionRegistry {
    /// 새 레지스트리 생성
    pub fn new(window_capacity: usize, tier2_interval_secs: f64) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            window_capacity,
            tier2_interval_secs,
        }
    }

    /// 세션 상태 조회 — 없으면 생성 (첫 스냅샷)
    pub fn obtain(&self, session_id: &str) -> Arc<SessionState> {
        let mut sessions = self.sessions.lock();
        if let Some(state) = sessions.get(session_id) {
            return state.clone();
        }

        debug!(session_id, "새 세션 상태 생성");
        let state = Arc::new(SessionState::new(
            self.window_capacity,
            self.tier2_interval_secs,
        ));
        sessions.insert(session_id.to_string(), state.clone());
        state
    }

    /// 세션 종료 — 상태 제거. 존재했으면 true.
    pub fn end_session(&self, session_id: &str) -> bool {
        let removed = self.sessions.lock().remove(session_id).is_some();
        if removed {
            info!(session_id, "세션 상태 제거");
        }
        removed
    }

    /// 활성 세션 수
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    /// 활성 세션이 없는지
    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }
}
