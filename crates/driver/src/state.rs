//! Driver state machine

use serde::Serialize;
use std::fmt;

/// Non-terminal position of a run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Resolving paths and building invocations
    Start,
    CheckStage1Exists,
    CheckStage2Exists,
    /// Clearing stale outputs, then running the builder
    RunStage1,
    CheckArtifact1,
    RunStage2,
    CheckArtifact2,
}

impl Phase {
    pub const ORDER: [Phase; 7] = [
        Phase::Start,
        Phase::CheckStage1Exists,
        Phase::CheckStage2Exists,
        Phase::RunStage1,
        Phase::CheckArtifact1,
        Phase::RunStage2,
        Phase::CheckArtifact2,
    ];

    /// Next phase, None after the last check
    pub fn successor(self) -> Option<Phase> {
        let idx = Self::ORDER.iter().position(|p| *p == self)?;
        Self::ORDER.get(idx + 1).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Start => "start",
            Phase::CheckStage1Exists => "check_stage1_exists",
            Phase::CheckStage2Exists => "check_stage2_exists",
            Phase::RunStage1 => "run_stage1",
            Phase::CheckArtifact1 => "check_artifact1",
            Phase::RunStage2 => "run_stage2",
            Phase::CheckArtifact2 => "check_artifact2",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Driver state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DriverState {
    /// `run` not called yet
    #[default]
    Idle,
    Running { phase: Phase },
    Success,
    /// Failed while in `at`
    Abort { at: Phase },
}

impl DriverState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DriverState::Success | DriverState::Abort { .. })
    }

    pub fn phase(&self) -> Option<Phase> {
        match self {
            DriverState::Running { phase } => Some(*phase),
            DriverState::Abort { at } => Some(*at),
            DriverState::Idle | DriverState::Success => None,
        }
    }

    /// Move into `next`
    ///
    /// Only the immediate successor of the current phase is reachable;
    /// `Start` is entered from any state (a fresh run).
    pub(crate) fn enter(&mut self, next: Phase) {
        debug_assert!(
            next == Phase::Start
                || matches!(self, DriverState::Running { phase } if phase.successor() == Some(next)),
            "illegal transition {self:?} -> {next:?}"
        );
        *self = DriverState::Running { phase: next };
    }

    /// Terminal transition after the run future resolved
    pub(crate) fn finish(&mut self, ok: bool) {
        let at = self.phase().unwrap_or(Phase::Start);
        *self = if ok {
            DriverState::Success
        } else {
            DriverState::Abort { at }
        };
    }
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverState::Idle => f.write_str("idle"),
            DriverState::Running { phase } => write!(f, "{phase}"),
            DriverState::Success => f.write_str("success"),
            DriverState::Abort { at } => write!(f, "abort at {at}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order_is_linear() {
        let mut phase = Phase::Start;
        let mut seen = vec![phase];
        while let Some(next) = phase.successor() {
            seen.push(next);
            phase = next;
        }
        assert_eq!(seen, Phase::ORDER.to_vec());
        assert_eq!(Phase::CheckArtifact2.successor(), None);
    }

    #[test]
    fn test_walk_to_success() {
        let mut state = DriverState::default();
        for phase in Phase::ORDER {
            state.enter(phase);
            assert!(!state.is_terminal());
        }
        state.finish(true);
        assert_eq!(state, DriverState::Success);
    }

    #[test]
    fn test_abort_remembers_phase() {
        let mut state = DriverState::default();
        state.enter(Phase::Start);
        state.enter(Phase::CheckStage1Exists);
        state.finish(false);
        assert_eq!(
            state,
            DriverState::Abort {
                at: Phase::CheckStage1Exists
            }
        );
        assert_eq!(state.to_string(), "abort at check_stage1_exists");
    }

    #[test]
    #[should_panic(expected = "illegal transition")]
    #[cfg(debug_assertions)]
    fn test_skipping_a_phase_panics_in_debug() {
        let mut state = DriverState::default();
        state.enter(Phase::Start);
        state.enter(Phase::RunStage1);
    }

    #[test]
    fn test_serialize_state() {
        let json = serde_json::to_string(&DriverState::Abort {
            at: Phase::RunStage2,
        })
        .unwrap();
        assert_eq!(json, r#"{"state":"abort","at":"run_stage2"}"#);
    }
}
