//! The mirror stays equivalent to the source list under arbitrary edits.

mod common;

use std::collections::{HashMap, HashSet};

use horizon_select::mirror::{MirrorEffect, MirrorId, MirrorNode};
use horizon_select::prelude::*;
use horizon_select::source::{NodeSpec, SnapshotKind, SnapshotNode, flatten_options};

use proptest::prelude::*;
use proptest::sample::Index;

use common::{CHROME_WINDOWS, Harness, env};

/// One edit of the source list. Node positions are resolved against the
/// list as it is when the edit is applied.
#[derive(Debug, Clone)]
enum Edit {
    AppendTop,
    AppendGroup { children: usize },
    AppendIntoGroup(Index),
    InsertBefore(Index),
    Remove(Index),
    MoveBefore { option: Index, reference: Option<Index> },
    SetText(Index),
    SetDisabled(Index, bool),
    Select(Index),
}

fn arb_edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        Just(Edit::AppendTop),
        (0usize..3).prop_map(|children| Edit::AppendGroup { children }),
        any::<Index>().prop_map(Edit::AppendIntoGroup),
        any::<Index>().prop_map(Edit::InsertBefore),
        any::<Index>().prop_map(Edit::Remove),
        (any::<Index>(), proptest::option::of(any::<Index>()))
            .prop_map(|(option, reference)| Edit::MoveBefore { option, reference }),
        any::<Index>().prop_map(Edit::SetText),
        (any::<Index>(), any::<bool>()).prop_map(|(node, disabled)| Edit::SetDisabled(node, disabled)),
        any::<Index>().prop_map(Edit::Select),
    ]
}

fn pick<T: Copy>(items: &[T], index: &Index) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        Some(*index.get(items))
    }
}

fn all_keys(snapshot: &[SnapshotNode]) -> Vec<NodeKey> {
    snapshot
        .iter()
        .flat_map(|node| std::iter::once(node.key).chain(node.children().iter().map(|c| c.key)))
        .collect()
}

fn groups(snapshot: &[SnapshotNode]) -> Vec<NodeKey> {
    snapshot.iter().filter(|n| n.is_group()).map(|n| n.key).collect()
}

fn ids_by_key(nodes: &[MirrorNode]) -> HashMap<NodeKey, MirrorId> {
    nodes
        .iter()
        .flat_map(|node| std::iter::once(node).chain(node.children.iter()))
        .map(|node| (node.key, node.id))
        .collect()
}

/// Apply `edit`; returns whether it reordered existing nodes.
fn apply(edit: &Edit, list: &SourceList, step: usize) -> bool {
    let snapshot = list.snapshot();
    let keys = all_keys(&snapshot);
    let options = list.options();

    match edit {
        Edit::AppendTop => {
            list.append(None, OptionSpec::new(format!("top {step}"))).unwrap();
        }
        Edit::AppendGroup { children } => {
            let mut group = GroupSpec::new(format!("group {step}"));
            for i in 0..*children {
                group = group.option(OptionSpec::new(format!("child {step}.{i}")));
            }
            list.append(None, group).unwrap();
        }
        Edit::AppendIntoGroup(index) => {
            if let Some(group) = pick(&groups(&snapshot), index) {
                list.append(Some(group), OptionSpec::new(format!("grouped {step}")))
                    .unwrap();
            }
        }
        Edit::InsertBefore(index) => {
            if let Some(reference) = pick(&keys, index) {
                list.insert_before(reference, OptionSpec::new(format!("inserted {step}")))
                    .unwrap();
            }
        }
        Edit::Remove(index) => {
            if let Some(key) = pick(&keys, index) {
                list.remove(key).unwrap();
            }
        }
        Edit::MoveBefore { option, reference } => {
            if let Some(key) = pick(&options, option) {
                let reference = reference.as_ref().and_then(|index| pick(&keys, index));
                list.move_before(key, reference).unwrap();
                return true;
            }
        }
        Edit::SetText(index) => {
            if let Some(key) = pick(&options, index) {
                list.set_text(key, format!("renamed {step}")).unwrap();
            }
        }
        Edit::SetDisabled(index, disabled) => {
            if let Some(key) = pick(&keys, index) {
                list.set_disabled(key, *disabled).unwrap();
            }
        }
        Edit::Select(index) => {
            if let Some(key) = pick(&options, index) {
                list.set_selected(key, true).unwrap();
            }
        }
    }
    false
}

fn assert_attributes_match(h: &Harness) {
    let flat = flatten_options(&h.list.snapshot());
    let mirror = h.select.options_view().mirror();
    assert_eq!(mirror.options().count(), flat.len());
    for (node, item) in mirror.options().zip(&flat) {
        let SnapshotKind::Option {
            text,
            disabled,
            selected,
            ..
        } = &item.kind
        else {
            panic!("flattened snapshot holds only options");
        };
        assert_eq!(node.key, item.key);
        assert_eq!(&node.attributes.text, text);
        assert_eq!(node.attributes.disabled, *disabled);
        assert_eq!(node.attributes.selected, *selected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn mirror_tracks_any_edit_sequence(edits in proptest::collection::vec(arb_edit(), 1..120)) {
        let list = SourceList::from_nodes([
            NodeSpec::from("alpha"),
            GroupSpec::new("fruit")
                .option(OptionSpec::new("apple"))
                .option(OptionSpec::new("pear"))
                .into(),
            NodeSpec::from("omega"),
        ]);
        let mut h = Harness::new(list.clone(), env(CHROME_WINDOWS));

        for (step, edit) in edits.iter().enumerate() {
            let before = ids_by_key(h.select.options_view().mirror().nodes());
            let reordered = apply(edit, &list, step);
            h.select.flush(h.at(step as u64)).unwrap();

            let mirror = h.select.options_view().mirror();
            let snapshot = list.snapshot();
            prop_assert!(mirror.is_equivalent(&snapshot), "step {}: {:?}", step, edit);

            let after = ids_by_key(mirror.nodes());
            let unique: HashSet<MirrorId> = after.values().copied().collect();
            prop_assert_eq!(unique.len(), after.len(), "step {}", step);

            if !reordered {
                for (key, id) in &before {
                    if let Some(now) = after.get(key) {
                        prop_assert_eq!(now, id, "step {}: identity changed", step);
                    }
                }
            }

            // A second pass over an unchanged list is a no-op.
            let mut copy = mirror.clone();
            prop_assert!(copy.sync(&snapshot).is_empty(), "step {}", step);

            assert_attributes_match(&h);
            h.select.take_mirror_effects();
        }
    }
}

#[test]
fn test_unrelated_attributes_produce_no_effects() {
    let list = SourceList::with_options(["a", "b"]);
    let mut h = Harness::new(list.clone(), env(CHROME_WINDOWS));
    assert_eq!(h.select.take_mirror_effects().len(), 2);
    let before = ids_by_key(h.select.options_view().mirror().nodes());

    list.set_attribute("data-test", Some("1".into()));
    list.set_aria_label(Some("Fruit".into()));
    h.select.flush(h.at(1)).unwrap();

    assert!(h.select.take_mirror_effects().is_empty());
    assert_eq!(ids_by_key(h.select.options_view().mirror().nodes()), before);
}

#[test]
fn test_group_edits_report_parent() {
    let list = SourceList::from_nodes([GroupSpec::new("g").option(OptionSpec::new("a")).into()]);
    let mut h = Harness::new(list.clone(), env(CHROME_WINDOWS));
    h.select.take_mirror_effects();
    let group = list.snapshot()[0].key;
    let group_id = h.select.options_view().mirror().nodes()[0].id;

    let b = list.append(Some(group), "b").unwrap();
    h.select.flush(h.at(1)).unwrap();
    let effects = h.select.take_mirror_effects();
    assert!(matches!(
        effects.as_slice(),
        [MirrorEffect::Inserted { key, parent: Some(parent), before: None, .. }]
            if *key == b && *parent == group_id
    ));

    // Disabling the group refreshes it and its options.
    list.set_disabled(group, true).unwrap();
    h.select.flush(h.at(2)).unwrap();
    let effects = h.select.take_mirror_effects();
    assert_eq!(effects.len(), 3);
    assert!(effects.iter().all(|effect| !effect.is_structural()));
    assert!(h.select.options_view().mirror().options().all(|node| node.attributes.disabled));

    // Removing the group drops it with its options.
    list.remove(group).unwrap();
    h.select.flush(h.at(3)).unwrap();
    let effects = h.select.take_mirror_effects();
    assert_eq!(effects.len(), 1);
    assert!(h.select.options_view().mirror().is_empty());
}

#[test]
fn test_reorder_is_remove_plus_insert() {
    let list = SourceList::with_options(["a", "b", "c"]);
    let mut h = Harness::new(list.clone(), env(CHROME_WINDOWS));
    h.select.take_mirror_effects();
    let before = ids_by_key(h.select.options_view().mirror().nodes());
    let options = list.options();

    list.move_before(options[2], Some(options[0])).unwrap();
    h.select.flush(h.at(1)).unwrap();

    let effects = h.select.take_mirror_effects();
    let after = ids_by_key(h.select.options_view().mirror().nodes());
    assert!(effects.iter().any(|e| matches!(e, MirrorEffect::Removed { key, .. } if *key == options[2])));
    assert!(effects.iter().any(|e| matches!(e, MirrorEffect::Inserted { key, .. } if *key == options[2])));
    assert_ne!(after[&options[2]], before[&options[2]]);
    assert_eq!(after[&options[0]], before[&options[0]]);
    assert_eq!(after[&options[1]], before[&options[1]]);
}

#[test]
fn test_effects_accumulate_until_drained() {
    let list = SourceList::with_options(["a"]);
    let mut h = Harness::new(list.clone(), env(CHROME_WINDOWS));

    let b = list.append(None, "b").unwrap();
    h.select.flush(h.at(1)).unwrap();
    let c = list.append(None, "c").unwrap();
    h.select.flush(h.at(2)).unwrap();

    let effects = h.select.take_mirror_effects();
    let inserted: Vec<NodeKey> = effects
        .iter()
        .filter_map(|effect| match effect {
            MirrorEffect::Inserted { key, .. } => Some(*key),
            _ => None,
        })
        .collect();
    assert_eq!(inserted, vec![list.options()[0], b, c]);
    assert!(h.select.take_mirror_effects().is_empty());
}
