//! Integration tests for undo/redo over whole sessions
//!
//! This tests:
//! - The add → undo → redo round trip with exact index assertions
//! - Chains of sessions undone and redone in order
//! - Redo invalidation when history branches
//! - Structure edits (edges restored by undo)

use stratum_editor::{Change, EditManager, UndoManager};
use stratum_model::{
    AnnotationKey, AnnotationValue, ContainerId, Corpus, EdgeId, ItemId, LayerId,
};

fn corpus_with_tokens(n: usize) -> (Corpus, LayerId, ContainerId, Vec<ItemId>) {
    let mut corpus = Corpus::new("undo-redo");
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

fn ids_of(manager: &EditManager, container: &ContainerId) -> Vec<ItemId> {
    manager
        .corpus()
        .container(container)
        .unwrap()
        .items()
        .iter()
        .map(|i| i.id.clone())
        .collect()
}

#[test]
fn test_add_undo_redo_restores_identical_indices() -> anyhow::Result<()> {
    // container C starts with items [A, B]
    let (corpus, layer, container, ids) = corpus_with_tokens(2);
    let (a, b) = (ids[0].clone(), ids[1].clone());
    let mut undo = UndoManager::new(&corpus);
    let mut manager = EditManager::new(corpus);

    // one session adds X at index 2
    manager.begin_update_named("add X")?;
    let x = manager.new_item(&layer)?;
    let x_id = x.id.clone();
    manager.execute(Change::add(container.clone(), 2, x))?;
    let edit = manager.end_update()?.expect("sealed");
    assert!(edit.is_significant());
    undo.add_edit(edit);

    assert_eq!(ids_of(&manager, &container), vec![a.clone(), b.clone(), x_id.clone()]);

    undo.undo(&mut manager)?;
    {
        let c = manager.corpus().container(&container).unwrap();
        assert_eq!(c.item_count(), 2);
        assert_eq!(c.index_of(&a), Some(0));
        assert_eq!(c.index_of(&b), Some(1));
        assert_eq!(c.index_of(&x_id), None);
    }

    undo.redo(&mut manager)?;
    {
        let c = manager.corpus().container(&container).unwrap();
        assert_eq!(c.item_count(), 3);
        assert_eq!(c.index_of(&a), Some(0));
        assert_eq!(c.index_of(&b), Some(1));
        assert_eq!(c.index_of(&x_id), Some(2));
    }
    Ok(())
}

#[test]
fn test_session_chain_unwinds_in_order() -> anyhow::Result<()> {
    let (corpus, layer, container, ids) = corpus_with_tokens(2);
    let mut undo = UndoManager::new(&corpus);
    let mut manager = EditManager::new(corpus);
    let key = AnnotationKey::new(ids[0].clone(), layer.clone(), "pos");

    // session 1: move B before A
    manager.begin_update_named("swap")?;
    manager.execute(Change::move_item(container.clone(), 1, 0))?;
    undo.add_edit(manager.end_update()?.expect("sealed"));

    // session 2: tag A
    manager.begin_update_named("tag A")?;
    manager.execute(Change::set_value(
        ids[0].clone(),
        layer.clone(),
        "pos",
        Some(AnnotationValue::Str("NN".into())),
    ))?;
    undo.add_edit(manager.end_update()?.expect("sealed"));

    assert_eq!(undo.undo_presentation_name(), Some("tag A"));

    undo.undo(&mut manager)?;
    assert_eq!(manager.corpus().annotation(&key), None);
    assert_eq!(ids_of(&manager, &container), vec![ids[1].clone(), ids[0].clone()]);

    undo.undo(&mut manager)?;
    assert_eq!(ids_of(&manager, &container), ids);

    assert_eq!(undo.redo_presentation_name(), Some("swap"));
    undo.redo(&mut manager)?;
    undo.redo(&mut manager)?;
    assert_eq!(ids_of(&manager, &container), vec![ids[1].clone(), ids[0].clone()]);
    assert_eq!(
        manager.corpus().annotation(&key),
        Some(&AnnotationValue::Str("NN".into()))
    );
    Ok(())
}

#[test]
fn test_branching_discards_the_old_future() -> anyhow::Result<()> {
    let (corpus, layer, container, _) = corpus_with_tokens(0);
    let mut undo = UndoManager::new(&corpus);
    let mut manager = EditManager::new(corpus);

    manager.begin_update_named("first")?;
    let item = manager.new_item(&layer)?;
    manager.execute(Change::add(container.clone(), 0, item))?;
    undo.add_edit(manager.end_update()?.expect("sealed"));

    undo.undo(&mut manager)?;
    assert!(undo.can_redo(&manager));

    // a new significant edit branches history
    manager.begin_update_named("second")?;
    let item = manager.new_item(&layer)?;
    manager.execute(Change::add(container.clone(), 0, item))?;
    undo.add_edit(manager.end_update()?.expect("sealed"));

    assert!(!undo.can_redo(&manager));
    assert_eq!(undo.redo_depth(), 0);
    assert_eq!(undo.undo_presentation_name(), Some("second"));
    Ok(())
}

#[test]
fn test_undo_restores_structure_edges() -> anyhow::Result<()> {
    let mut corpus = Corpus::new("undo-redo");
    let layer = corpus.add_layer("syntax");
    let sid = corpus.add_structure(&layer).unwrap();

    let mut nodes = Vec::new();
    for i in 0..2 {
        let item = corpus.new_item(&layer).unwrap();
        nodes.push(item.id.clone());
        corpus.container_mut(&sid).unwrap().add_item(i, item).unwrap();
    }
    corpus
        .structure_mut(&sid)
        .unwrap()
        .add_edge(EdgeId::from("dom"), nodes[0].clone(), nodes[1].clone())
        .unwrap();

    let mut undo = UndoManager::new(&corpus);
    let mut manager = EditManager::new(corpus);

    manager.begin_update_named("drop node")?;
    manager.execute(Change::remove(sid.clone(), 1))?;
    undo.add_edit(manager.end_update()?.expect("sealed"));

    assert_eq!(manager.corpus().structure(&sid).unwrap().edge_count(), 0);

    undo.undo(&mut manager)?;
    let structure = manager.corpus().structure(&sid).unwrap();
    assert_eq!(structure.edge_count(), 1);
    assert_eq!(structure.container().index_of(&nodes[1]), Some(1));
    Ok(())
}

#[test]
fn test_stage_never_rewinds() -> anyhow::Result<()> {
    let (corpus, layer, container, _) = corpus_with_tokens(0);
    let mut undo = UndoManager::new(&corpus);
    let mut manager = EditManager::new(corpus);

    let s0 = manager.corpus().generation().stage();
    manager.begin_update_named("grow")?;
    let item = manager.new_item(&layer)?;
    manager.execute(Change::add(container.clone(), 0, item))?;
    undo.add_edit(manager.end_update()?.expect("sealed"));
    let s1 = manager.corpus().generation().stage();
    assert_ne!(s0, s1);

    undo.undo(&mut manager)?;
    let s2 = manager.corpus().generation().stage();

    // the corpus content matches s0 again, but the stage is brand new
    assert_ne!(s2, s0);
    assert_ne!(s2, s1);
    assert!(s2 > s1);
    Ok(())
}
