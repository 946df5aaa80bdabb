//! Tests for #[derive(Action)] macro

use casedesk_core::{DateTime, Utc};
use casedesk_macros::Action;

#[derive(Action, Clone, Debug, PartialEq)]
#[action(scope = "Notes")]
enum NoteAction {
    #[request]
    Load,

    #[request]
    Save { body: String },

    #[success]
    Saved {
        id: String,
        saved_at: DateTime<Utc>,
    },

    #[success]
    Loaded(Vec<String>),

    #[failure]
    SaveFailed { error: String },

    Select(String),

    ClearSelection,
}

/// No `action` attribute: the scope comes from the enum name
#[derive(Action, Clone, Debug)]
enum TimerAction {
    #[request]
    Start,
    Tick,
}

#[test]
fn test_request_variants() {
    assert!(NoteAction::Load.is_request());
    assert!(
        NoteAction::Save {
            body: "draft".to_string()
        }
        .is_request()
    );
    assert!(!NoteAction::Load.is_terminal());
}

#[test]
fn test_success_variants() {
    let saved = NoteAction::Saved {
        id: "note-1".to_string(),
        saved_at: Utc::now(),
    };
    assert!(saved.is_success());
    assert!(!saved.is_failure());
    assert!(saved.is_terminal());

    let loaded = NoteAction::Loaded(vec!["a".to_string()]);
    assert!(loaded.is_success());
}

#[test]
fn test_failure_variants() {
    let failed = NoteAction::SaveFailed {
        error: "network down".to_string(),
    };
    assert!(failed.is_failure());
    assert!(!failed.is_success());
    assert!(failed.is_terminal());
}

#[test]
fn test_untagged_variants_belong_to_no_group() {
    let untagged = vec![
        NoteAction::Select("note-1".to_string()),
        NoteAction::ClearSelection,
    ];

    for action in untagged {
        assert!(!action.is_request(), "Should not be request: {action:?}");
        assert!(!action.is_terminal(), "Should not be terminal: {action:?}");
    }
}

#[test]
fn test_action_type_labels() {
    let cases = vec![
        (NoteAction::Load, "[Notes] Load"),
        (
            NoteAction::SaveFailed {
                error: String::new(),
            },
            "[Notes] SaveFailed",
        ),
        (NoteAction::Select("x".to_string()), "[Notes] Select"),
        (NoteAction::ClearSelection, "[Notes] ClearSelection"),
    ];

    for (action, expected) in cases {
        assert_eq!(action.action_type(), expected);
    }
}

#[test]
fn test_default_scope_strips_action_suffix() {
    assert_eq!(TimerAction::Start.action_type(), "[Timer] Start");
    assert_eq!(TimerAction::Tick.action_type(), "[Timer] Tick");
    assert!(!TimerAction::Tick.is_success());
    assert!(!TimerAction::Start.is_failure());
}
