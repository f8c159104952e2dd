use std::cell::Cell;
use taska_core::{
    CoreConfig, FilterMode, KeyPress, MemorySlotStore, Priority, RenderFrame, RepoError,
    RepoResult, SlotStore, SlotTaskRepository, SqliteTaskApp, TaskApp, TaskId, TaskRepository,
    UiEvent,
};

/// Slot store whose writes start failing on demand.
#[derive(Default)]
struct FlakySlots {
    inner: MemorySlotStore,
    fail_writes: Cell<bool>,
}

impl SlotStore for FlakySlots {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>> {
        self.inner.read_slot(key)
    }

    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()> {
        if self.fail_writes.get() {
            return Err(RepoError::Unavailable("quota exceeded".to_string()));
        }
        self.inner.write_slot(key, value)
    }
}

type MemoryApp = TaskApp<SlotTaskRepository<MemorySlotStore>>;

fn app() -> MemoryApp {
    TaskApp::new(SlotTaskRepository::new(MemorySlotStore::new()))
}

fn submit(app: &mut MemoryApp, text: &str) -> TaskId {
    app.apply(UiEvent::SubmitNewTask {
        text: text.to_string(),
        priority: Priority::Medium,
    });
    app.store().tasks()[0].id.clone()
}

fn visible_texts(frame: &RenderFrame) -> Vec<&str> {
    frame.tasks().iter().map(|view| view.text.as_str()).collect()
}

#[test]
fn starts_with_all_filter_and_closed_modal() {
    let app = app();
    let frame = app.frame();

    assert_eq!(frame.filter(), FilterMode::All);
    assert!(frame.modal.is_none());
    assert!(frame.is_empty());
    assert_eq!((frame.done_count(), frame.left_count()), (0, 0));
}

#[test]
fn filter_changes_visible_rows_but_not_counters() {
    let mut app = app();
    let a = submit(&mut app, "a");
    submit(&mut app, "b");
    app.apply(UiEvent::Toggle(a));

    let mut frames: Vec<RenderFrame> = Vec::new();
    app.dispatch(UiEvent::ChangeFilter(FilterMode::Active), &mut frames);
    app.dispatch(UiEvent::ChangeFilter(FilterMode::Completed), &mut frames);

    assert_eq!(visible_texts(&frames[0]), vec!["b"]);
    assert_eq!(visible_texts(&frames[1]), vec!["a"]);
    for frame in &frames {
        assert_eq!(frame.done_count(), 1);
        assert_eq!(frame.left_count(), 1);
    }
}

#[test]
fn deferred_delete_flow() {
    let mut app = app();
    let id = submit(&mut app, "going away");
    submit(&mut app, "staying");
    app.apply(UiEvent::Toggle(id.clone()));

    app.apply(UiEvent::RequestDelete(id.clone()));
    let frame = app.frame();
    let row = frame.tasks().iter().find(|view| view.id == id).unwrap();
    assert!(row.removing);
    assert_eq!(frame.done_count(), 1);

    app.apply(UiEvent::DeleteConfirmed(id.clone()));
    for filter in [FilterMode::All, FilterMode::Active, FilterMode::Completed] {
        app.apply(UiEvent::ChangeFilter(filter));
        assert!(!app.frame().projection.contains(&id));
    }
    let frame = app.frame();
    assert_eq!((frame.done_count(), frame.left_count()), (0, 1));
}

#[test]
fn edit_modal_round_trip_through_events() {
    let mut app = app();
    let id = submit(&mut app, "typo");

    app.apply(UiEvent::RequestEdit(id.clone()));
    let modal = app.frame().modal.unwrap();
    assert_eq!(modal.target, id);
    assert_eq!(modal.draft, "typo");

    app.apply(UiEvent::EditDraftChanged("  ".to_string()));
    app.apply(UiEvent::EditCommitRequested);
    assert!(app.frame().modal.is_some());
    assert_eq!(app.store().get(&id).unwrap().text, "typo");

    app.apply(UiEvent::EditDraftChanged("fixed".to_string()));
    app.apply(UiEvent::EditCommitRequested);
    assert!(app.frame().modal.is_none());
    assert_eq!(visible_texts(&app.frame()), vec!["fixed"]);
}

#[test]
fn keyboard_shortcuts_drive_the_modal() {
    let mut app = app();
    let id = submit(&mut app, "draft");

    app.apply(UiEvent::RequestEdit(id.clone()));
    app.apply(UiEvent::EditDraftChanged("via keyboard".to_string()));
    app.apply(UiEvent::Key(KeyPress::CtrlEnter));
    assert!(app.frame().modal.is_none());
    assert_eq!(app.store().get(&id).unwrap().text, "via keyboard");

    app.apply(UiEvent::RequestEdit(id.clone()));
    app.apply(UiEvent::EditDraftChanged("abandoned".to_string()));
    app.apply(UiEvent::Key(KeyPress::Escape));
    assert!(app.frame().modal.is_none());
    assert_eq!(app.store().get(&id).unwrap().text, "via keyboard");

    app.apply(UiEvent::RequestEdit(id.clone()));
    app.apply(UiEvent::OverlayDismissed);
    assert!(app.edit_session().target().is_none());
}

#[test]
fn clear_completed_event_keeps_active_tasks() {
    let mut app = app();
    let done = submit(&mut app, "done");
    submit(&mut app, "open");
    app.apply(UiEvent::Toggle(done));

    let mut frames: Vec<RenderFrame> = Vec::new();
    app.dispatch(UiEvent::ClearCompletedRequested, &mut frames);

    assert_eq!(visible_texts(&frames[0]), vec!["open"]);
    assert_eq!(frames[0].done_count(), 0);
}

#[test]
fn rejected_events_still_render() {
    let mut app = app();
    let mut frames: Vec<RenderFrame> = Vec::new();

    app.dispatch(UiEvent::Toggle(TaskId::from("ghost")), &mut frames);
    app.dispatch(UiEvent::RequestDelete(TaskId::from("ghost")), &mut frames);
    app.dispatch(UiEvent::DeleteConfirmed(TaskId::from("ghost")), &mut frames);

    assert_eq!(frames.len(), 3);
    assert!(frames.iter().all(RenderFrame::is_empty));
}

#[test]
fn bootstrap_from_file_restores_tasks_but_not_filter() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig::in_dir(dir.path());

    {
        let mut app = SqliteTaskApp::bootstrap(&config).unwrap();
        app.apply(UiEvent::SubmitNewTask {
            text: "survives restart".to_string(),
            priority: Priority::High,
        });
        app.apply(UiEvent::ChangeFilter(FilterMode::Completed));
    }

    let app = SqliteTaskApp::bootstrap(&config).unwrap();
    let frame = app.frame();
    assert_eq!(frame.filter(), FilterMode::All);
    assert_eq!(visible_texts(&frame), vec!["survives restart"]);
    assert_eq!(frame.tasks()[0].priority_label(), "high");
}

#[test]
fn bootstrap_in_memory_uses_configured_key() {
    let config = CoreConfig::in_memory().with_storage_key("scratch");
    let app = SqliteTaskApp::bootstrap(&config).unwrap();
    assert_eq!(app.store().repository().key(), "scratch");
    assert!(app.frame().is_empty());
}

#[test]
fn failing_saves_still_render_the_in_memory_state() {
    let slots = FlakySlots::default();
    let mut app = TaskApp::new(SlotTaskRepository::new(&slots));
    app.apply(UiEvent::SubmitNewTask {
        text: "saved".to_string(),
        priority: Priority::Low,
    });
    let id = app.store().tasks()[0].id.clone();

    slots.fail_writes.set(true);
    let mut frames: Vec<RenderFrame> = Vec::new();
    app.dispatch(UiEvent::Toggle(id.clone()), &mut frames);
    app.dispatch(
        UiEvent::SubmitNewTask {
            text: "unsaved".to_string(),
            priority: Priority::High,
        },
        &mut frames,
    );

    assert_eq!(frames.len(), 2);
    assert!(frames[0].tasks()[0].completed);
    assert_eq!(frames[0].done_count(), 1);
    assert_eq!(visible_texts(&frames[1]), vec!["unsaved", "saved"]);
    let persisted = app.store().repository().load();
    assert_eq!(persisted.len(), 1);
    assert!(!persisted[0].completed);
}
