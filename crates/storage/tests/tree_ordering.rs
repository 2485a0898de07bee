#![forbid(unsafe_code)]

use arbor_core::ids::TreeId;
use arbor_core::model::{NodeKind, NodeStatus, TreeDomain, TreeNode};
use arbor_core::ordering::{MAX_ORDER_INDEX, OrderingError};
use arbor_storage::{
    CreateNodeRequest, DeleteNodeRequest, MoveNodeRequest, ReorderChildrenRequest, SqliteStore,
    StoreConfig, StoreError,
};
use rstest::rstest;
use std::collections::{HashMap, HashSet};
use tempfile::TempDir;

fn open_store() -> (TempDir, SqliteStore) {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = SqliteStore::open(dir.path()).expect("open store");
    (dir, store)
}

fn tree(id: &str) -> TreeId {
    TreeId::try_new(id).expect("tree id")
}

fn task(store: &mut SqliteStore, tree_id: &TreeId, title: &str, parent: Option<&str>) -> TreeNode {
    let mut request = CreateNodeRequest::new(TreeDomain::Task, tree_id.clone(), title);
    if let Some(parent) = parent {
        request = request.under(parent);
    }
    store.create_node(request).expect("create task node")
}

fn scene(store: &mut SqliteStore, tree_id: &TreeId, title: &str, parent: Option<&str>) -> TreeNode {
    let mut request =
        CreateNodeRequest::new(TreeDomain::Story, tree_id.clone(), title).kind(NodeKind::Scene);
    if let Some(parent) = parent {
        request = request.under(parent);
    }
    store.create_node(request).expect("create story node")
}

fn child_layout(store: &SqliteStore, domain: TreeDomain, tree_id: &TreeId, parent: Option<&str>) -> Vec<(String, i64)> {
    store
        .list_children(domain, tree_id, parent)
        .expect("list children")
        .into_iter()
        .map(|node| (node.title, node.order_index))
        .collect()
}

fn move_request(node: &TreeNode, parent: Option<&str>, index: i64) -> MoveNodeRequest {
    MoveNodeRequest {
        domain: node.domain,
        node_id: node.id.clone(),
        new_parent_id: parent.map(str::to_string),
        new_order_index: index,
    }
}

#[test]
fn first_task_node_becomes_root_and_later_ones_attach_under_it() {
    let (_dir, mut store) = open_store();
    let plan = tree("plan-1");

    let root = task(&mut store, &plan, "Plan", None);
    assert_eq!(root.kind, NodeKind::Root);
    assert_eq!(root.parent_id, None);
    assert_eq!(root.order_index, 0);
    assert_eq!(root.status, NodeStatus::Todo);

    let a = task(&mut store, &plan, "A", None);
    let b = task(&mut store, &plan, "B", Some(&root.id));
    assert_eq!(a.kind, NodeKind::Task);
    assert_eq!(a.parent_id.as_deref(), Some(root.id.as_str()));
    assert_eq!((a.order_index, b.order_index), (0, 1));
    assert_eq!(store.next_order_index(TreeDomain::Task, &plan, Some(&root.id)).expect("next"), 2);

    let err = store
        .create_node(CreateNodeRequest::new(TreeDomain::Task, plan.clone(), "Again").kind(NodeKind::Root))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput("tree already has a root")));
}

#[test]
fn create_rejects_invalid_input_before_touching_the_store() {
    let (_dir, mut store) = open_store();
    let plan = tree("plan-1");

    let err = store
        .create_node(CreateNodeRequest::new(TreeDomain::Task, plan.clone(), "   "))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));

    let long = "x".repeat(256);
    let err = store
        .create_node(CreateNodeRequest::new(TreeDomain::Task, plan.clone(), long))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));

    let err = store
        .create_node(CreateNodeRequest::new(TreeDomain::Story, plan.clone(), "No kind"))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput("kind is required")));

    let mut request = CreateNodeRequest::new(TreeDomain::Story, plan.clone(), "Meta").kind(NodeKind::Act);
    request.metadata = Some(serde_json::json!([1, 2]));
    assert!(matches!(store.create_node(request).unwrap_err(), StoreError::InvalidInput(_)));

    assert!(store.list_nodes(TreeDomain::Task, &plan).expect("list").is_empty());
    assert!(store.list_nodes(TreeDomain::Story, &plan).expect("list").is_empty());
}

#[test]
fn story_trees_allow_many_top_level_nodes() {
    let (_dir, mut store) = open_store();
    let book = tree("book-1");

    let first = scene(&mut store, &book, "Opening", None);
    let second = scene(&mut store, &book, "Chase", None);
    assert_eq!(first.parent_id, None);
    assert_eq!((first.order_index, second.order_index), (0, 1));
    assert_eq!(first.status, NodeStatus::Draft);

    let err = store
        .create_node(CreateNodeRequest::new(TreeDomain::Story, book.clone(), "Root").kind(NodeKind::Root))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));
}

#[test]
fn domains_do_not_see_each_other() {
    let (_dir, mut store) = open_store();
    let shared = tree("shared");
    let root = task(&mut store, &shared, "Plan", None);

    let err = store.get_node(TreeDomain::Story, &root.id).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { entity: "node", .. }));
    assert!(store.list_nodes(TreeDomain::Story, &shared).expect("list").is_empty());
}

#[test]
fn parent_from_another_tree_is_rejected() {
    let (_dir, mut store) = open_store();
    let one = tree("t1");
    let two = tree("t2");
    let root_one = task(&mut store, &one, "One", None);
    let root_two = task(&mut store, &two, "Two", None);
    let child_two = task(&mut store, &two, "Child", None);

    let err = store
        .create_node(CreateNodeRequest::new(TreeDomain::Task, two.clone(), "Stray").under(root_one.id.clone()))
        .unwrap_err();
    assert!(matches!(err, StoreError::CrossTreeReference { .. }));

    let err = store
        .move_node(move_request(&child_two, Some(&root_one.id), 0))
        .unwrap_err();
    match err {
        StoreError::CrossTreeReference {
            expected_tree,
            found_tree,
            ..
        } => {
            assert_eq!(expected_tree, "t2");
            assert_eq!(found_tree, "t1");
        }
        other => panic!("unexpected error: {other}"),
    }

    let unchanged = store.get_node(TreeDomain::Task, &child_two.id).expect("get");
    assert_eq!(unchanged.parent_id.as_deref(), Some(root_two.id.as_str()));
}

#[test]
fn move_within_parent_shifts_following_siblings() {
    let (_dir, mut store) = open_store();
    let plan = tree("plan-1");
    let root = task(&mut store, &plan, "Plan", None);
    task(&mut store, &plan, "A", None);
    task(&mut store, &plan, "B", None);
    let c = task(&mut store, &plan, "C", None);

    let moved = store.move_node(move_request(&c, None, 0)).expect("move");
    assert_eq!(moved.order_index, 0);
    assert_eq!(moved.parent_id.as_deref(), Some(root.id.as_str()));
    assert_eq!(
        child_layout(&store, TreeDomain::Task, &plan, Some(&root.id)),
        vec![("C".to_string(), 0), ("A".to_string(), 1), ("B".to_string(), 2)]
    );
}

#[test]
fn move_to_new_parent_makes_room_there() {
    let (_dir, mut store) = open_store();
    let plan = tree("plan-1");
    let root = task(&mut store, &plan, "Plan", None);
    let a = task(&mut store, &plan, "A", None);
    let b = task(&mut store, &plan, "B", None);
    task(&mut store, &plan, "B1", Some(&b.id));
    task(&mut store, &plan, "B2", Some(&b.id));

    store.move_node(move_request(&a, Some(&b.id), 1)).expect("move");

    assert_eq!(
        child_layout(&store, TreeDomain::Task, &plan, Some(&b.id)),
        vec![("B1".to_string(), 0), ("A".to_string(), 1), ("B2".to_string(), 2)]
    );
    assert_eq!(
        child_layout(&store, TreeDomain::Task, &plan, Some(&root.id)),
        vec![("B".to_string(), 1)]
    );
}

#[test]
fn move_into_own_subtree_is_rejected() {
    let (_dir, mut store) = open_store();
    let plan = tree("plan-1");
    task(&mut store, &plan, "Plan", None);
    let p = task(&mut store, &plan, "P", None);
    let q = task(&mut store, &plan, "Q", Some(&p.id));
    let r = task(&mut store, &plan, "R", Some(&q.id));
    let before = store.list_nodes(TreeDomain::Task, &plan).expect("list");

    for target in [&p, &q, &r] {
        let err = store.move_node(move_request(&p, Some(&target.id), 0)).unwrap_err();
        assert!(matches!(err, StoreError::CyclicMove { .. }), "target {}", target.title);
    }
    assert!(store.is_descendant(&p.id, &r.id).expect("walk"));
    assert!(!store.is_descendant(&r.id, &p.id).expect("walk"));

    assert_eq!(store.list_nodes(TreeDomain::Task, &plan).expect("list"), before);
}

#[test]
fn task_root_cannot_be_moved_or_deleted() {
    let (_dir, mut store) = open_store();
    let plan = tree("plan-1");
    let root = task(&mut store, &plan, "Plan", None);

    let err = store.move_node(move_request(&root, None, 3)).unwrap_err();
    assert!(matches!(err, StoreError::RootImmutable(_)));

    let err = store
        .delete_node(DeleteNodeRequest {
            domain: TreeDomain::Task,
            node_id: root.id.clone(),
        })
        .unwrap_err();
    assert!(matches!(err, StoreError::RootImmutable(_)));
}

#[test]
fn negative_index_is_rejected() {
    let (_dir, mut store) = open_store();
    let book = tree("book-1");
    let s = scene(&mut store, &book, "S", None);
    let err = store.move_node(move_request(&s, None, -1)).unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));
}

#[test]
fn huge_index_is_rejected_and_appends_stay_non_negative() {
    let (_dir, mut store) = open_store();
    let book = tree("book-1");
    let a = scene(&mut store, &book, "A", None);

    let err = store.move_node(move_request(&a, None, i64::MAX)).unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput("order index out of range")));

    let far = store
        .move_node(move_request(&a, None, MAX_ORDER_INDEX))
        .expect("move to the last allowed index");
    assert_eq!(far.order_index, MAX_ORDER_INDEX);

    let b = scene(&mut store, &book, "B", None);
    assert_eq!(b.order_index, MAX_ORDER_INDEX + 1);
    store.move_node(move_request(&b, None, 0)).expect("move to front");
    assert_eq!(
        child_layout(&store, TreeDomain::Story, &book, None),
        vec![("B".to_string(), 0), ("A".to_string(), MAX_ORDER_INDEX + 1)]
    );
}

#[test]
fn story_node_moves_under_top_level_sibling() {
    let (_dir, mut store) = open_store();
    let book = tree("book-1");
    let act = scene(&mut store, &book, "Act", None);
    let loose = scene(&mut store, &book, "Loose", None);

    store.move_node(move_request(&loose, Some(&act.id), 0)).expect("nest");
    assert_eq!(
        child_layout(&store, TreeDomain::Story, &book, None),
        vec![("Act".to_string(), 0)]
    );
    assert_eq!(
        child_layout(&store, TreeDomain::Story, &book, Some(&act.id)),
        vec![("Loose".to_string(), 0)]
    );
}

#[test]
fn reorder_renumbers_children_densely() {
    let (_dir, mut store) = open_store();
    let plan = tree("plan-1");
    let root = task(&mut store, &plan, "Plan", None);
    let a = task(&mut store, &plan, "A", None);
    let b = task(&mut store, &plan, "B", None);
    let c = task(&mut store, &plan, "C", None);

    // Leave a gap first so the renumbering is visible.
    store.move_node(move_request(&a, None, 5)).expect("move");

    let children = store
        .reorder_children(ReorderChildrenRequest {
            domain: TreeDomain::Task,
            tree_id: plan.clone(),
            parent_id: Some(root.id.clone()),
            ordered_ids: vec![c.id.clone(), a.id.clone(), b.id.clone()],
        })
        .expect("reorder");

    let layout: Vec<(String, i64)> = children
        .into_iter()
        .map(|node| (node.title, node.order_index))
        .collect();
    assert_eq!(
        layout,
        vec![("C".to_string(), 0), ("A".to_string(), 1), ("B".to_string(), 2)]
    );
}

#[test]
fn reorder_rejects_anything_but_a_permutation() {
    let (_dir, mut store) = open_store();
    let plan = tree("plan-1");
    let root = task(&mut store, &plan, "Plan", None);
    let a = task(&mut store, &plan, "A", None);
    let b = task(&mut store, &plan, "B", None);
    let stranger = task(&mut store, &plan, "Nested", Some(&a.id));

    let attempt = |ids: Vec<String>| ReorderChildrenRequest {
        domain: TreeDomain::Task,
        tree_id: plan.clone(),
        parent_id: Some(root.id.clone()),
        ordered_ids: ids,
    };

    let err = store
        .reorder_children(attempt(vec![a.id.clone(), a.id.clone(), b.id.clone()]))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidOrdering(OrderingError::DuplicateId(_))));

    let err = store.reorder_children(attempt(vec![b.id.clone()])).unwrap_err();
    assert!(matches!(err, StoreError::InvalidOrdering(OrderingError::MissingChild(_))));

    let err = store
        .reorder_children(attempt(vec![b.id.clone(), a.id.clone(), stranger.id.clone()]))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidOrdering(OrderingError::UnknownId(_))));

    assert_eq!(
        child_layout(&store, TreeDomain::Task, &plan, Some(&root.id)),
        vec![("A".to_string(), 0), ("B".to_string(), 1)]
    );
}

#[test]
fn delete_removes_the_whole_subtree() {
    let (_dir, mut store) = open_store();
    let plan = tree("plan-1");
    let root = task(&mut store, &plan, "Plan", None);
    task(&mut store, &plan, "Before", None);
    let p = task(&mut store, &plan, "P", None);
    let q = task(&mut store, &plan, "Q", Some(&p.id));
    task(&mut store, &plan, "R", Some(&q.id));
    task(&mut store, &plan, "Middle", None);
    task(&mut store, &plan, "After", None);

    let deleted = store
        .delete_node(DeleteNodeRequest {
            domain: TreeDomain::Task,
            node_id: p.id.clone(),
        })
        .expect("delete");
    assert_eq!(deleted.removed, 3);
    assert_eq!(deleted.tree_id, plan);

    assert!(matches!(
        store.get_node(TreeDomain::Task, &q.id).unwrap_err(),
        StoreError::NotFound { .. }
    ));
    assert_eq!(store.list_nodes(TreeDomain::Task, &plan).expect("list").len(), 4);
    assert_eq!(
        child_layout(&store, TreeDomain::Task, &plan, Some(&root.id)),
        vec![
            ("Before".to_string(), 0),
            ("Middle".to_string(), 2),
            ("After".to_string(), 3),
        ]
    );
}

#[test]
fn deleting_a_very_deep_chain_succeeds() {
    let (_dir, mut store) = open_store();
    let book = tree("book-1");
    let top = scene(&mut store, &book, "level-0", None);
    let mut parent = top.id.clone();
    for level in 1..1_101 {
        parent = scene(&mut store, &book, &format!("level-{level}"), Some(&parent)).id;
    }
    assert!(store.is_descendant(&top.id, &parent).expect("walk"));

    let deleted = store
        .delete_node(DeleteNodeRequest {
            domain: TreeDomain::Story,
            node_id: top.id.clone(),
        })
        .expect("delete deep chain");
    assert_eq!(deleted.removed, 1_101);
    assert!(store.list_nodes(TreeDomain::Story, &book).expect("list").is_empty());
}

#[test]
fn depth_limit_applies_to_create_and_move() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = StoreConfig {
        max_tree_depth: 3,
        ..StoreConfig::default()
    };
    let mut store = SqliteStore::open_with_config(dir.path(), config).expect("open store");
    let book = tree("book-1");

    let a = scene(&mut store, &book, "A", None);
    let b = scene(&mut store, &book, "B", Some(&a.id));
    let c = scene(&mut store, &book, "C", Some(&b.id));
    let err = store
        .create_node(
            CreateNodeRequest::new(TreeDomain::Story, book.clone(), "D")
                .kind(NodeKind::Scene)
                .under(c.id.clone()),
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::TreeDepthExceeded { max_depth: 3 }));

    let d = scene(&mut store, &book, "D", None);
    scene(&mut store, &book, "E", Some(&d.id));
    let err = store.move_node(move_request(&d, Some(&b.id), 0)).unwrap_err();
    assert!(matches!(err, StoreError::TreeDepthExceeded { .. }));
    assert_eq!(store.get_node(TreeDomain::Story, &d.id).expect("get").parent_id, None);

    let moved = store.move_node(move_request(&d, Some(&a.id), 0)).expect("fits");
    assert_eq!(moved.parent_id.as_deref(), Some(a.id.as_str()));
    assert!(!store.is_descendant(&d.id, &c.id).expect("walk"));
}

#[test]
fn forest_nests_children_in_sibling_order() {
    let (_dir, mut store) = open_store();
    let plan = tree("plan-1");
    let root = task(&mut store, &plan, "Plan", None);
    let a = task(&mut store, &plan, "A", None);
    let b = task(&mut store, &plan, "B", None);
    task(&mut store, &plan, "A1", Some(&a.id));
    store.move_node(move_request(&b, None, 0)).expect("move");

    let forest = store.tree_forest(TreeDomain::Task, &plan).expect("forest");
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].node.id, root.id);
    assert_eq!(forest[0].node_count(), 4);
    let titles: Vec<&str> = forest[0]
        .children
        .iter()
        .map(|branch| branch.node.title.as_str())
        .collect();
    assert_eq!(titles, vec!["B", "A"]);
    assert_eq!(forest[0].find(&a.id).expect("a").children.len(), 1);
}

#[test]
fn progress_counts_terminal_status_per_domain() {
    let (_dir, mut store) = open_store();
    let plan = tree("plan-1");
    task(&mut store, &plan, "Plan", None);
    for (title, status, kind) in [
        ("done", NodeStatus::Done, NodeKind::Task),
        ("doing", NodeStatus::InProgress, NodeKind::Task),
        ("gate", NodeStatus::Done, NodeKind::Milestone),
    ] {
        let mut request = CreateNodeRequest::new(TreeDomain::Task, plan.clone(), title).kind(kind);
        request.status = Some(status);
        store.create_node(request).expect("create");
    }

    let progress = store.tree_progress(TreeDomain::Task, &plan).expect("progress");
    assert_eq!(progress.total, 4);
    assert_eq!(progress.completed, 2);
    assert_eq!(progress.completion_percent, 50);
    assert_eq!(progress.by_kind.get("ROOT"), Some(&1));
    assert_eq!(progress.by_status.get("TODO"), Some(&1));
    assert_eq!(progress.completed_by_kind.get("MILESTONE"), Some(&1));
    assert_eq!(progress.completed_by_kind.get("TASK"), Some(&1));

    let empty = store.tree_progress(TreeDomain::Story, &plan).expect("progress");
    assert_eq!(empty.total, 0);
    assert_eq!(empty.completion_percent, 0);
}

#[derive(Clone, Copy, Debug)]
enum Step {
    Create(&'static str, Option<&'static str>),
    Move(&'static str, Option<&'static str>, i64),
    Reorder(Option<&'static str>, &'static [&'static str]),
    Delete(&'static str),
}

fn id_of(ids: &HashMap<&'static str, String>, title: &str) -> String {
    ids.get(title)
        .cloned()
        .unwrap_or_else(|| panic!("unknown title {title}"))
}

fn run_steps(store: &mut SqliteStore, book: &TreeId, steps: &[Step]) {
    let mut ids: HashMap<&'static str, String> = HashMap::new();

    for step in steps {
        match *step {
            Step::Create(title, parent) => {
                let parent = parent.map(|title| id_of(&ids, title));
                let node = scene(store, book, title, parent.as_deref());
                ids.insert(title, node.id);
            }
            Step::Move(title, parent, index) => {
                store
                    .move_node(MoveNodeRequest {
                        domain: TreeDomain::Story,
                        node_id: id_of(&ids, title),
                        new_parent_id: parent.map(|title| id_of(&ids, title)),
                        new_order_index: index,
                    })
                    .unwrap_or_else(|err| panic!("{step:?}: {err}"));
            }
            Step::Reorder(parent, order) => {
                store
                    .reorder_children(ReorderChildrenRequest {
                        domain: TreeDomain::Story,
                        tree_id: book.clone(),
                        parent_id: parent.map(|title| id_of(&ids, title)),
                        ordered_ids: order.iter().map(|title| id_of(&ids, title)).collect(),
                    })
                    .unwrap_or_else(|err| panic!("{step:?}: {err}"));
            }
            Step::Delete(title) => {
                store
                    .delete_node(DeleteNodeRequest {
                        domain: TreeDomain::Story,
                        node_id: id_of(&ids, title),
                    })
                    .unwrap_or_else(|err| panic!("{step:?}: {err}"));
            }
        }
    }
}

#[rstest]
#[case::move_to_front_then_append(vec![
    Step::Create("a", None),
    Step::Create("b", None),
    Step::Create("c", None),
    Step::Move("c", None, 0),
    Step::Create("d", None),
])]
#[case::nest_reorder_delete(vec![
    Step::Create("a", None),
    Step::Create("a1", Some("a")),
    Step::Create("a2", Some("a")),
    Step::Create("a3", Some("a")),
    Step::Move("a3", Some("a"), 0),
    Step::Reorder(Some("a"), &["a2", "a3", "a1"]),
    Step::Delete("a3"),
    Step::Create("a4", Some("a")),
])]
#[case::shuffle_across_parents(vec![
    Step::Create("a", None),
    Step::Create("b", None),
    Step::Create("a1", Some("a")),
    Step::Create("a2", Some("a")),
    Step::Create("b1", Some("b")),
    Step::Move("a1", Some("b"), 0),
    Step::Move("a2", Some("b"), 1),
    Step::Move("b1", Some("a"), 5),
    Step::Reorder(None, &["b", "a"]),
    Step::Delete("b"),
    Step::Create("c", None),
    Step::Move("c", Some("a"), 0),
])]
fn sibling_indexes_stay_unique_across_mixed_operations(#[case] steps: Vec<Step>) {
    let (_dir, mut store) = open_store();
    let book = tree("book-1");
    run_steps(&mut store, &book, &steps);

    let nodes = store.list_nodes(TreeDomain::Story, &book).expect("list");
    assert!(!nodes.is_empty());
    let mut seen: HashMap<Option<String>, HashSet<i64>> = HashMap::new();
    for node in &nodes {
        assert!(node.order_index >= 0, "{} has index {}", node.title, node.order_index);
        let fresh = seen
            .entry(node.parent_id.clone())
            .or_default()
            .insert(node.order_index);
        assert!(fresh, "{} shares index {} with a sibling", node.title, node.order_index);
    }
}
