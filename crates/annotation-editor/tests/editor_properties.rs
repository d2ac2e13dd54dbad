use annotation_core::{Resource, SaveError, ValidationError};
use annotation_editor::{AnnotationEditor, EditorError, SubmitOutcome};
use annotation_test_utils::{RecordingHost, TestBed};
use proptest::prelude::*;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn open_blank(bed: &TestBed) -> AnnotationEditor {
    let resource = Resource::new("tbl_123", "orders", "table");
    AnnotationEditor::open(resource, bed.host.clone(), bed.environment())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_valid_text_saves_with_saving_cycle(text in "\\PC{0,500}") {
        let bed = TestBed::with_host(RecordingHost::gated());
        let editor = open_blank(&bed);
        editor.input(text.clone()).unwrap();
        prop_assert!(editor.validation_error().is_none());

        let before = editor.is_saving();
        let (outcome, during) = runtime().block_on(async {
            tokio::join!(editor.submit(), async {
                bed.host.wait_started().await;
                let during = editor.is_saving();
                bed.host.release();
                during
            })
        });

        prop_assert!(!before);
        prop_assert!(during);
        prop_assert!(!editor.is_saving());
        prop_assert_eq!(outcome, Ok(SubmitOutcome::Saved));
        prop_assert_eq!(bed.host.saved(), vec![text]);
    }

    #[test]
    fn prop_oversized_text_never_reaches_host(text in "[a-zé ]{501,800}") {
        let bed = TestBed::new();
        let editor = open_blank(&bed);
        editor.input(text.clone()).unwrap();

        let length = text.chars().count();
        prop_assert_eq!(
            editor.validation_error(),
            Some(ValidationError::TooLong { length, max: 500 })
        );

        let outcome = runtime().block_on(editor.submit());

        prop_assert!(matches!(outcome, Err(EditorError::Validation(_))));
        prop_assert_eq!(bed.host.save_calls(), 0);
        prop_assert!(!editor.is_saving());
    }

    #[test]
    fn prop_double_toggle_is_identity(
        description in proptest::option::of("\\PC{0,40}"),
        draft in "\\PC{0,80}",
    ) {
        let bed = TestBed::new();
        let mut resource = Resource::new("tbl_1", "users", "table");
        resource.description = description;
        let editor = AnnotationEditor::open(resource, bed.host.clone(), bed.environment());

        if !editor.is_locked() {
            editor.input(draft).unwrap();
        }
        let lock_before = editor.lock_state();
        let draft_before = editor.draft();

        editor.toggle_lock().unwrap();
        editor.toggle_lock().unwrap();

        prop_assert_eq!(editor.lock_state(), lock_before);
        prop_assert_eq!(editor.draft(), draft_before);
    }

    #[test]
    fn prop_failed_save_preserves_draft(text in "\\PC{0,500}") {
        let bed = TestBed::with_host(
            RecordingHost::new().fail_next(SaveError::Unavailable("offline".into())),
        );
        let editor = open_blank(&bed);
        editor.input(text.clone()).unwrap();
        let before = editor.draft();

        let outcome = runtime().block_on(editor.submit());

        prop_assert!(matches!(outcome, Err(EditorError::Save(_))));
        prop_assert_eq!(editor.draft(), before);
        prop_assert!(!editor.is_saving());
    }
}
