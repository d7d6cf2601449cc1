//! Tests for the proposal stage flow, driven through the session API.

use std::time::Duration;

use proposal_game::GameConfig;
use proposal_game::game::{
    CONFETTI_COUNT, CameraOutcome, GuessOutcome, HEART_COUNT, INITIAL_REVEALED, PositiveAnswer,
    ProposalAnswer, ProposalSession, RevealOutcome, ScheduledTransition, Stage, TimedAction,
    TransitionError, Trigger, letter_count,
};
use proposal_game::media::{ConstraintProfile, PhotoPayload};
use rand::SeedableRng;
use rand::rngs::StdRng;
use strum::IntoEnumIterator;

fn seeded_session() -> ProposalSession {
    ProposalSession::with_rng(&GameConfig::default(), StdRng::seed_from_u64(2024))
}

fn photo() -> PhotoPayload {
    PhotoPayload::from_data_url("data:image/png;base64,iVBORw0KGgo=")
}

/// Takes the single timer the session just requested.
fn only_timer(session: &mut ProposalSession) -> ScheduledTransition {
    let mut scheduled = session.take_scheduled();
    assert_eq!(scheduled.len(), 1, "Expected exactly one timer");
    scheduled.remove(0)
}

fn fire_all(session: &mut ProposalSession) {
    for scheduled in session.take_scheduled() {
        session.fire(scheduled).expect("Timer fires");
    }
}

/// Drives a session to `target` along the camera path.
fn walk_to(session: &mut ProposalSession, target: Stage) {
    while session.stage() != target {
        match session.stage() {
            Stage::Welcome => session.start().expect("Start"),
            Stage::Riddle => {
                session.submit_guess("seni seviyorum").expect("Guess");
                fire_all(session);
            }
            Stage::Compliment => {
                let ticket = session.begin_camera_request().expect("Camera request");
                session
                    .finish_camera_request(
                        ticket,
                        CameraOutcome::Ready(ConstraintProfile::FALLBACK_CHAIN[0]),
                    )
                    .expect("Camera ready");
            }
            Stage::Camera => session.photo_captured(photo()).expect("Capture"),
            Stage::PhotoOverlay => fire_all(session),
            Stage::Buildup => {
                session.continue_buildup().expect("Continue");
                fire_all(session);
            }
            Stage::Proposal => session
                .answer(ProposalAnswer::Yes(PositiveAnswer::EvetIsterim))
                .expect("Accept"),
            Stage::Celebration => session.restart().expect("Restart"),
        }
    }
}

fn all_triggers() -> Vec<Trigger> {
    let mut triggers = vec![
        Trigger::Start,
        Trigger::RiddleSolved,
        Trigger::CameraReady,
        Trigger::PhotoCaptured,
        Trigger::PhotoUploaded,
        Trigger::OverlayElapsed,
        Trigger::BuildupElapsed,
        Trigger::DeclineElapsed,
        Trigger::Restart,
    ];
    triggers.extend(PositiveAnswer::iter().map(Trigger::Accept));
    triggers
}

fn expected_next(stage: Stage, trigger: Trigger) -> Option<Stage> {
    match (stage, trigger) {
        (Stage::Welcome, Trigger::Start) => Some(Stage::Riddle),
        (Stage::Riddle, Trigger::RiddleSolved) => Some(Stage::Compliment),
        (Stage::Compliment, Trigger::CameraReady) => Some(Stage::Camera),
        (Stage::Compliment, Trigger::PhotoUploaded) => Some(Stage::PhotoOverlay),
        (Stage::Camera, Trigger::PhotoCaptured) => Some(Stage::PhotoOverlay),
        (Stage::Camera, Trigger::PhotoUploaded) => Some(Stage::PhotoOverlay),
        (Stage::PhotoOverlay, Trigger::OverlayElapsed) => Some(Stage::Buildup),
        (Stage::Buildup, Trigger::BuildupElapsed) => Some(Stage::Proposal),
        (Stage::Proposal, Trigger::Accept(_)) => Some(Stage::Celebration),
        (Stage::Proposal, Trigger::DeclineElapsed) => Some(Stage::Welcome),
        (Stage::Celebration, Trigger::Restart) => Some(Stage::Welcome),
        _ => None,
    }
}

#[test]
fn test_transition_table_is_exact() {
    for stage in Stage::iter() {
        for trigger in all_triggers() {
            let result = stage.transition(trigger);
            match expected_next(stage, trigger) {
                Some(next) => assert_eq!(result, Ok(next), "{stage} + {trigger:?}"),
                None => assert_eq!(
                    result,
                    Err(TransitionError::InvalidTrigger { stage, trigger }),
                    "{stage} + {trigger:?}"
                ),
            }
        }
    }
}

#[test]
fn test_invalid_action_leaves_state_untouched() {
    let mut session = seeded_session();
    let before = session.token();

    assert!(matches!(
        session.reveal_letter(),
        Err(TransitionError::WrongStage { .. })
    ));
    assert!(session.continue_buildup().is_err());
    assert!(session.restart().is_err());
    assert!(session.photo_captured(photo()).is_err());

    assert_eq!(session.token(), before);
    assert!(session.photo().is_none());
    assert!(session.drain_toasts().is_empty());
    assert!(session.take_scheduled().is_empty());
}

#[test]
fn test_revealing_every_letter_advances_to_compliment() {
    let mut session = seeded_session();
    session.start().expect("Start");

    let reveals_needed = letter_count() - INITIAL_REVEALED.len();
    let mut previous = session.reveal().len();
    for step in 0..reveals_needed {
        let outcome = session.reveal_letter().expect("Reveal");
        assert!(session.reveal().len() > previous, "step {step} must grow");
        previous = session.reveal().len();
        if step + 1 < reveals_needed {
            assert!(matches!(outcome, RevealOutcome::Revealed(_)));
            assert!(session.take_scheduled().is_empty());
        } else {
            assert!(matches!(outcome, RevealOutcome::Completed(_)));
        }
    }
    assert_eq!(session.reveal().len(), letter_count());
    assert!(!session.can_reveal());

    // Revealing again is a no-op and schedules nothing new.
    assert_eq!(session.reveal_letter(), Err(TransitionError::PuzzleComplete));

    let announce = only_timer(&mut session);
    assert_eq!(*announce.action(), TimedAction::AnnounceCompletion);
    assert_eq!(*announce.delay(), Duration::from_millis(500));
    session.fire(announce).expect("Announce");
    assert_eq!(session.drain_toasts().last().map(|t| t.title.as_str()), Some("Tamamlandı! 😍"));
    assert_eq!(session.stage(), Stage::Riddle);

    let advance = only_timer(&mut session);
    assert_eq!(*advance.action(), TimedAction::AdvanceToCompliment);
    assert_eq!(*advance.delay(), Duration::from_millis(1500));
    session.fire(advance).expect("Advance");
    assert_eq!(session.stage(), Stage::Compliment);
    assert!(session.check_invariants().is_ok());
}

#[test]
fn test_guess_matching_rules() {
    for (guess, expected) in [
        ("seni seviyorum", GuessOutcome::Matched),
        ("SeniSeviyorum", GuessOutcome::Matched),
        (" seni   seviyorum ", GuessOutcome::Matched),
        ("seviyorum seni", GuessOutcome::Mismatch),
    ] {
        let mut session = seeded_session();
        session.start().expect("Start");
        assert_eq!(session.submit_guess(guess), Ok(expected), "{guess:?}");

        let toasts = session.drain_toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].is_destructive(), expected == GuessOutcome::Mismatch);
    }
}

#[test]
fn test_blank_guess_is_rejected() {
    let mut session = seeded_session();
    session.start().expect("Start");
    session.set_guess_draft("   ");

    assert!(!session.can_guess());
    assert_eq!(session.submit_draft(), Err(TransitionError::EmptyGuess));
    assert!(session.drain_toasts().is_empty());
}

#[test]
fn test_second_correct_guess_does_not_double_schedule() {
    let mut session = seeded_session();
    session.start().expect("Start");

    session.submit_guess("seni seviyorum").expect("First guess");
    assert_eq!(
        session.submit_guess("seni seviyorum"),
        Err(TransitionError::TransitionPending)
    );
    assert_eq!(session.take_scheduled().len(), 1);
}

#[test]
fn test_each_yes_button_celebrates() {
    for positive in PositiveAnswer::iter() {
        let mut session = seeded_session();
        walk_to(&mut session, Stage::Proposal);

        session.answer(ProposalAnswer::Yes(positive)).expect("Accept");
        assert_eq!(session.stage(), Stage::Celebration);
        assert!(session.show_main_heart());

        let celebration = session.celebration();
        assert_eq!(celebration.hearts().len(), HEART_COUNT);
        assert_eq!(celebration.confetti().len(), CONFETTI_COUNT);
        assert!(celebration.hearts().iter().all(|h| (0.0..100.0).contains(&h.left)));
        assert!(celebration.confetti().iter().all(|c| (0.0..100.0).contains(&c.left)));

        let toast = session.drain_toasts().pop().expect("Accept toast");
        assert_eq!(toast.title, "🎉 Yaşasın!");
        assert!(toast.description.contains("Yağmur"));
    }
}

#[test]
fn test_no_resets_to_welcome_after_two_seconds() {
    let mut session = seeded_session();
    walk_to(&mut session, Stage::Proposal);
    let epoch = session.epoch();
    session.drain_toasts();

    session.answer(ProposalAnswer::No).expect("Decline");
    assert_eq!(session.stage(), Stage::Proposal);
    assert!(session.drain_toasts()[0].is_destructive());

    let reset = only_timer(&mut session);
    assert_eq!(*reset.action(), TimedAction::ResetAfterDecline);
    assert_eq!(*reset.delay(), Duration::from_secs(2));
    session.fire(reset).expect("Reset");

    assert_eq!(session.stage(), Stage::Welcome);
    assert_eq!(session.epoch(), epoch + 1);
    assert!(session.photo().is_none());
    assert_eq!(session.reveal().len(), INITIAL_REVEALED.len());
    assert!(session.celebration().is_empty());
    assert!(!session.show_buildup());
}

#[test]
fn test_restart_clears_everything() {
    let mut session = seeded_session();
    walk_to(&mut session, Stage::Celebration);
    assert!(session.photo().is_some());

    session.restart().expect("Restart");
    assert_eq!(session.stage(), Stage::Welcome);
    assert!(session.photo().is_none());
    assert!(session.celebration().is_empty());
    assert!(!session.show_main_heart());
    assert_eq!(session.reveal().len(), INITIAL_REVEALED.len());
    assert_eq!(session.guess_draft(), "");
    assert!(session.check_invariants().is_ok());
}

#[test]
fn test_accept_after_decline_makes_reset_stale() {
    let mut session = seeded_session();
    walk_to(&mut session, Stage::Proposal);

    session.answer(ProposalAnswer::No).expect("Decline");
    let reset = only_timer(&mut session);
    session
        .answer(ProposalAnswer::Yes(PositiveAnswer::TabiiKiEvet))
        .expect("Accept");

    assert!(matches!(
        session.fire(reset),
        Err(TransitionError::StaleToken { .. })
    ));
    assert_eq!(session.stage(), Stage::Celebration);
    assert!(session.photo().is_some());
}

#[test]
fn test_timer_from_before_restart_is_noop() {
    let mut session = seeded_session();
    walk_to(&mut session, Stage::Camera);
    session.photo_captured(photo()).expect("Capture");
    let overlay = only_timer(&mut session);

    // Keep a copy of the first run's overlay timer.
    session.fire(overlay).expect("Overlay");
    walk_to(&mut session, Stage::Celebration);
    session.restart().expect("Restart");
    walk_to(&mut session, Stage::Camera);
    session.photo_captured(photo()).expect("Capture again");
    let fresh = only_timer(&mut session);

    assert_eq!(fresh.token().epoch, 1);
    assert!(matches!(
        session.fire(overlay),
        Err(TransitionError::StaleToken { epoch: 0, .. })
    ));
    assert_eq!(session.stage(), Stage::PhotoOverlay);
    session.fire(fresh).expect("Fresh overlay");
    assert_eq!(session.stage(), Stage::Buildup);
}

#[test]
fn test_upload_from_compliment_skips_camera() {
    let mut session = seeded_session();
    walk_to(&mut session, Stage::Compliment);

    session.photo_uploaded(photo()).expect("Upload");
    assert_eq!(session.stage(), Stage::PhotoOverlay);
    assert_eq!(*only_timer(&mut session).delay(), Duration::from_secs(4));
}

#[test]
fn test_buildup_shows_line_before_proposal() {
    let mut session = seeded_session();
    walk_to(&mut session, Stage::Buildup);
    assert!(!session.show_buildup());

    session.continue_buildup().expect("Continue");
    assert!(session.show_buildup());
    assert_eq!(session.continue_buildup(), Err(TransitionError::TransitionPending));

    let proposal = only_timer(&mut session);
    assert_eq!(*proposal.delay(), Duration::from_secs(5));
    session.fire(proposal).expect("Proposal");
    assert_eq!(session.stage(), Stage::Proposal);
}

#[test]
fn test_second_camera_request_is_busy() {
    let mut session = seeded_session();
    walk_to(&mut session, Stage::Compliment);

    let ticket = session.begin_camera_request().expect("First request");
    assert_eq!(session.begin_camera_request(), Err(TransitionError::CameraBusy));
    assert_eq!(session.stage(), Stage::Compliment);
    assert!(session.is_camera_in_flight());
    assert!(session.drain_toasts().is_empty());
    assert!(session.take_scheduled().is_empty());

    session
        .finish_camera_request(
            ticket,
            CameraOutcome::Ready(ConstraintProfile::FALLBACK_CHAIN[0]),
        )
        .expect("First request completes");
    assert_eq!(session.stage(), Stage::Camera);
    assert!(!session.is_camera_in_flight());
}

#[test]
fn test_camera_result_after_upload_is_stale() {
    let mut session = seeded_session();
    walk_to(&mut session, Stage::Compliment);

    let ticket = session.begin_camera_request().expect("Camera request");
    session.photo_uploaded(photo()).expect("Upload");
    session.drain_toasts();

    let result = session.finish_camera_request(
        ticket,
        CameraOutcome::Ready(ConstraintProfile::FALLBACK_CHAIN[0]),
    );
    assert_eq!(
        result,
        Err(TransitionError::StaleToken {
            epoch: 0,
            stage: Stage::Compliment,
        })
    );
    assert_eq!(session.stage(), Stage::PhotoOverlay);
    assert!(!session.is_camera_in_flight());
    assert!(session.drain_toasts().is_empty());
}

#[test]
fn test_cancelled_camera_request_can_be_retried() {
    let mut session = seeded_session();
    walk_to(&mut session, Stage::Compliment);

    let ticket = session.begin_camera_request().expect("Camera request");
    session.cancel_camera_request(&ticket);
    assert!(!session.is_camera_in_flight());
    assert_eq!(session.stage(), Stage::Compliment);

    let retry = session.begin_camera_request().expect("Retry accepted");
    session.cancel_camera_request(&ticket);
    assert!(session.is_camera_in_flight(), "Old ticket leaves the retry alone");
    session
        .finish_camera_request(
            retry,
            CameraOutcome::Ready(ConstraintProfile::FALLBACK_CHAIN[1]),
        )
        .expect("Retry completes");
    assert_eq!(session.stage(), Stage::Camera);
}
