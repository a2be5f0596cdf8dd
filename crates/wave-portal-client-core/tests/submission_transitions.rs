use wave_portal_client_core::{submission_transition, SubmissionAction, SubmissionState};

#[test]
fn submission_happy_path_transitions() {
    let (s1, t1) = submission_transition(SubmissionState::Idle, SubmissionAction::Begin)
        .expect("idle -> begin");
    assert_eq!(s1, SubmissionState::Mining);
    assert_eq!(t1.from, SubmissionState::Idle);

    let (s2, _) = submission_transition(s1, SubmissionAction::Confirm).expect("mining -> confirm");
    assert_eq!(s2, SubmissionState::Mined);

    let (s3, _) = submission_transition(s2, SubmissionAction::Reset).expect("mined -> reset");
    assert_eq!(s3, SubmissionState::Idle);
}

#[test]
fn confirm_before_begin_is_rejected() {
    let err = submission_transition(SubmissionState::Idle, SubmissionAction::Confirm)
        .expect_err("must fail");
    assert!(err.to_string().contains("illegal submission transition"));
}

#[test]
fn begin_while_mining_is_rejected() {
    let err = submission_transition(SubmissionState::Mining, SubmissionAction::Begin)
        .expect_err("must fail");
    assert!(err.to_string().contains("illegal submission transition"));
}

#[test]
fn begin_from_mined_requires_reset() {
    let err = submission_transition(SubmissionState::Mined, SubmissionAction::Begin)
        .expect_err("must fail");
    assert!(err.to_string().contains("illegal submission transition"));
}
