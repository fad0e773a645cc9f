//! 롤링 결과 윈도우.
//!
//! 최근 Tier 1 레코드의 고정 용량 FIFO. Tier 2 분석의 입력 코퍼스.
//! 용량은 설정에서 파생되며(interval ÷ 샘플링 주기) 삽입 순서만 보장한다.

use movemirror_core::models::feedback::Tier1Record;
use std::collections::VecDeque;

/// Tier 1 레코드 롤링 윈도우 (FIFO, 고정 용량)
#[derive(Debug)]
pub struct FeedbackWindow {
    entries: VecDeque<Tier1Record>,
    capacity: usize,
}

impl FeedbackWindow {
    /// 새 윈도우 생성. 용량 0은 1로 보정.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// 레코드 추가 — 용량 초과 시 가장 오래된 항목부터 축출
    pub fn push(&mut self, record: Tier1Record) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(record);
    }

    /// 현재 내용 스냅샷 (오래된 것부터)
    pub fn snapshot(&self) -> Vec<Tier1Record> {
        self.entries.iter().cloned().collect()
    }

    /// 현재 레코드 수
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 비어있는지
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 최대 용량
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
