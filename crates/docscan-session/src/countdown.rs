//! 카운트다운 컨트롤러.
//!
//! 남은 초만 관리한다. 타이머 자체는 러너가 소유하며 단계마다 [`CountdownController::tick`]을 호출한다.

use docscan_core::models::detection::CountdownState;

/// 카운트다운 한 단계 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    /// 진행 중 (남은 초)
    Remaining(u32),
    /// 0 도달: 캡처 시점. 컨트롤러는 비활성으로 돌아간다.
    Elapsed,
    /// 비활성 상태에서의 틱 (무시)
    Inactive,
}

#[derive(Debug, Clone)]
pub struct CountdownController {
    start_seconds: u32,
    state: CountdownState,
}

impl CountdownController {
    pub fn new(start_seconds: u32) -> Self {
        Self {
            start_seconds: start_seconds.max(1),
            state: CountdownState::Inactive,
        }
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// 카운트다운 시작. 시작 값 반환.
    pub fn start(&mut self) -> u32 {
        self.state = CountdownState::Active {
            remaining_seconds: self.start_seconds,
        };
        self.start_seconds
    }

    /// 1단계 감소
    pub fn tick(&mut self) -> CountdownStep {
        match self.state {
            CountdownState::Inactive => CountdownStep::Inactive,
            CountdownState::Active { remaining_seconds } => {
                let next = remaining_seconds.saturating_sub(1);
                if next == 0 {
                    self.state = CountdownState::Inactive;
                    CountdownStep::Elapsed
                } else {
                    self.state = CountdownState::Active {
                        remaining_seconds: next,
                    };
                    CountdownStep::Remaining(next)
                }
            }
        }
    }

    /// 취소. 진행 중이었으면 true.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.is_active();
        self.state = CountdownState::Inactive;
        was_active
    }
}
