//! Integration tests for edit sessions
//!
//! This tests:
//! - The full control flow: begin → execute → end → sealed edit
//! - Event ordering across nested sessions
//! - Mixed structural and scalar changes in one session
//! - The editable gate on the corpus

use std::cell::RefCell;
use std::rc::Rc;

use stratum_editor::{Change, EditError, EditEvent, EditManager};
use stratum_model::{AnnotationKey, AnnotationValue, ContainerId, Corpus, ItemId, LayerId};

fn corpus_with_tokens(n: usize) -> (Corpus, LayerId, ContainerId, Vec<ItemId>) {
    let mut corpus = Corpus::new("sessions");
    let layer = corpus.add_layer("token");
    let container = corpus.add_container(&layer).unwrap();
    let mut ids = Vec::new();
    for i in 0..n {
        let item = corpus.new_item(&layer).unwrap();
        ids.push(item.id.clone());
        corpus
            .container_mut(&container)
            .unwrap()
            .add_item(i, item)
            .unwrap();
    }
    (corpus, layer, container, ids)
}

#[test]
fn test_mixed_session_seals_everything() -> anyhow::Result<()> {
    let (corpus, layer, container, ids) = corpus_with_tokens(3);
    let mut manager = EditManager::new(corpus);
    let s0 = manager.corpus().generation().stage();

    manager.begin_update_named("annotate and extend")?;

    let extra = manager.new_item(&layer)?;
    let extra_id = extra.id.clone();
    manager.execute(Change::add(container.clone(), 3, extra))?;
    manager.execute(Change::move_item(container.clone(), 0, 2))?;
    manager.execute(Change::set_value(
        ids[1].clone(),
        layer.clone(),
        "pos",
        Some(AnnotationValue::Str("DET".into())),
    ))?;

    // readers inside the session already observe all three changes
    {
        let c = manager.corpus().container(&container).unwrap();
        assert_eq!(c.item_count(), 4);
        assert_eq!(c.index_of(&ids[0]), Some(2));
        assert_eq!(c.index_of(&extra_id), Some(3));
    }

    let edit = manager.end_update()?.expect("outermost end seals");
    assert_eq!(edit.len(), 3);
    assert_eq!(edit.presentation_name(), Some("annotate and extend"));
    assert_eq!(edit.stage_before(), s0);
    assert_eq!(
        edit.stage_after(),
        Some(manager.corpus().generation().stage())
    );
    assert_ne!(edit.stage_after(), Some(s0));

    let key = AnnotationKey::new(ids[1].clone(), layer, "pos");
    assert_eq!(
        manager.corpus().annotation(&key),
        Some(&AnnotationValue::Str("DET".into()))
    );
    Ok(())
}

#[test]
fn test_nested_sessions_produce_one_edit() -> anyhow::Result<()> {
    let (corpus, layer, container, _) = corpus_with_tokens(0);
    let mut manager = EditManager::new(corpus);

    let sealed: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = sealed.clone();
    manager.subscribe_undo(move |edit| sink.borrow_mut().push(edit.len()));

    manager.begin_update_named("outer")?;
    let item = manager.new_item(&layer)?;
    manager.execute(Change::add(container.clone(), 0, item))?;

    manager.begin_update()?;
    let item = manager.new_item(&layer)?;
    manager.execute(Change::add(container.clone(), 1, item))?;
    assert!(manager.end_update()?.is_none());

    let edit = manager.end_update()?.expect("outermost end seals");
    assert_eq!(edit.len(), 2);

    // undo listeners saw exactly one sealed edit
    assert_eq!(sealed.borrow().as_slice(), &[2]);
    Ok(())
}

#[test]
fn test_event_stream_for_nested_session() -> anyhow::Result<()> {
    let (corpus, layer, container, _) = corpus_with_tokens(0);
    let mut manager = EditManager::new(corpus);

    let events: Rc<RefCell<Vec<(String, usize)>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    manager.subscribe(move |event| {
        let entry = match event {
            EditEvent::BeginUpdate { level, .. } => ("begin".to_string(), *level),
            EditEvent::Execute { level, .. } => ("execute".to_string(), *level),
            EditEvent::BeforeUndo { level, .. } => ("before-undo".to_string(), *level),
            EditEvent::EndUpdate { level, .. } => ("end".to_string(), *level),
        };
        sink.borrow_mut().push(entry);
    });

    manager.begin_update()?;
    manager.begin_update()?;
    let item = manager.new_item(&layer)?;
    manager.execute(Change::add(container.clone(), 0, item))?;
    manager.end_update()?;
    manager.end_update()?;

    assert_eq!(
        events.borrow().as_slice(),
        &[
            ("begin".to_string(), 1),
            ("execute".to_string(), 2),
            ("before-undo".to_string(), 0),
            ("end".to_string(), 0),
        ]
    );
    Ok(())
}

#[test]
fn test_non_editable_corpus_rejects_and_stays_intact() {
    let (mut corpus, layer, container, ids) = corpus_with_tokens(2);
    let extra = corpus.new_item(&layer).unwrap();
    corpus.set_editable(false);
    let mut manager = EditManager::new(corpus);

    let err = manager
        .execute(Change::add(container.clone(), 0, extra))
        .unwrap_err();
    assert!(matches!(err, EditError::NotEditable));

    let c = manager.corpus().container(&container).unwrap();
    assert_eq!(c.item_count(), 2);
    assert_eq!(c.index_of(&ids[0]), Some(0));
    assert_eq!(c.index_of(&ids[1]), Some(1));
}

#[test]
fn test_failed_change_leaves_session_usable() -> anyhow::Result<()> {
    let (corpus, layer, container, _) = corpus_with_tokens(1);
    let mut manager = EditManager::new(corpus);

    manager.begin_update_named("partly bad")?;

    let out_of_range = manager.new_item(&layer)?;
    let err = manager
        .execute(Change::add(container.clone(), 7, out_of_range))
        .unwrap_err();
    assert!(matches!(err, EditError::Change(_)));

    // the session survives and later changes still record
    let ok_item = manager.new_item(&layer)?;
    manager.execute(Change::add(container.clone(), 1, ok_item))?;
    let edit = manager.end_update()?.expect("sealed");

    assert_eq!(edit.len(), 1);
    assert_eq!(manager.corpus().container(&container).unwrap().item_count(), 2);
    Ok(())
}
