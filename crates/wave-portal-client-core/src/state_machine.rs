use crate::ports::PortError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Mining,
    Mined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionAction {
    Begin,
    Confirm,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    pub from: SubmissionState,
    pub to: SubmissionState,
    pub reason: &'static str,
}

/// The submission lifecycle is strictly Idle -> Mining -> Mined, with Mined
/// returning to Idle only when a fresh submission starts. Anything else is
/// rejected.
pub fn submission_transition(
    state: SubmissionState,
    action: SubmissionAction,
) -> Result<(SubmissionState, StateTransition), PortError> {
    let (to, reason) = match (state, action) {
        (SubmissionState::Idle, SubmissionAction::Begin) => {
            (SubmissionState::Mining, "submission dispatched")
        }
        (SubmissionState::Mining, SubmissionAction::Confirm) => {
            (SubmissionState::Mined, "in-flight state closed")
        }
        (SubmissionState::Mined, SubmissionAction::Reset) => {
            (SubmissionState::Idle, "fresh submission")
        }
        _ => {
            return Err(PortError::Validation(format!(
                "illegal submission transition: {state:?} on {action:?}"
            )))
        }
    };
    Ok((to, StateTransition {
        from: state,
        to,
        reason,
    }))
}
