//! Pointer interaction: drag selection, highlighting and the blur debounce.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use horizon_select::prelude::*;

use common::{CHROME_WINDOWS, Harness, env};

fn multi(texts: &[&str]) -> SourceList {
    let list = SourceList::with_options(texts.iter().copied());
    list.set_multiple(true);
    list.set_selected_index(None);
    list
}

fn count_changes(list: &SourceList) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();
    list.changed().connect(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    count
}

#[test]
fn test_drag_selects_range_with_one_change_per_step() {
    let mut h = Harness::new(multi(&["A", "B", "C", "D", "E"]), env(CHROME_WINDOWS));
    assert_eq!(h.select.active_kind(), Some(StrategyKind::Multi));
    let changes = count_changes(&h.list);

    let (b, c, d) = (h.item(1), h.item(2), h.item(3));
    assert!(h.select.on_pointer_down(b, KeyboardModifiers::NONE, h.at(0)));
    assert_eq!(h.list.selected_indices(), vec![1]);
    assert!(h.select.on_pointer_over(c, h.at(10)));
    assert!(h.select.on_pointer_over(d, h.at(20)));
    assert_eq!(h.list.selected_indices(), vec![1, 2, 3]);
    assert_eq!(changes.load(Ordering::SeqCst), 3);

    // Hovering the same option again is not a step.
    assert!(!h.select.on_pointer_over(d, h.at(30)));
    assert_eq!(changes.load(Ordering::SeqCst), 3);

    assert!(!h.select.on_pointer_up(d, h.at(40)));
    assert!(!h.select.options_view().drag().is_active());
    assert!(!h.select.on_pointer_over(c, h.at(50)));
    assert_eq!(h.list.selected_indices(), vec![1, 2, 3]);
}

#[test]
fn test_ctrl_drag_from_selected_option_deselects_range() {
    let list = multi(&["A", "B", "C", "D", "E"]);
    let options = list.options();
    list.apply_selection(&[(options[0], true), (options[1], true), (options[4], true)])
        .unwrap();
    let mut h = Harness::new(list, env(CHROME_WINDOWS));

    let (b, d) = (h.item(1), h.item(3));
    h.select.on_pointer_down(b, KeyboardModifiers::CTRL, h.at(0));
    assert!(h.select.options_view().drag().is_inverted());
    assert_eq!(h.list.selected_indices(), vec![0, 4]);

    h.select.on_pointer_over(d, h.at(10));
    assert_eq!(h.list.selected_indices(), vec![0, 4]);
}

#[test]
fn test_ctrl_drag_from_unselected_option_adds_range() {
    let list = multi(&["A", "B", "C", "D", "E"]);
    list.set_selected(list.options()[0], true).unwrap();
    let mut h = Harness::new(list, env(CHROME_WINDOWS));

    let (c, d) = (h.item(2), h.item(3));
    h.select.on_pointer_down(c, KeyboardModifiers::CTRL, h.at(0));
    h.select.on_pointer_over(d, h.at(10));
    assert_eq!(h.list.selected_indices(), vec![0, 2, 3]);
}

#[test]
fn test_drag_past_either_end_clamps() {
    let mut h = Harness::new(multi(&["A", "B", "C", "D", "E"]), env(CHROME_WINDOWS));

    let b = h.item(1);
    h.select.on_pointer_down(b, KeyboardModifiers::NONE, h.at(0));
    h.select.on_pointer_over(PointerTarget::BelowItems, h.at(10));
    assert_eq!(h.list.selected_indices(), vec![1, 2, 3, 4]);

    h.select.on_pointer_over(PointerTarget::AboveItems, h.at(20));
    assert_eq!(h.list.selected_indices(), vec![0, 1]);

    // Leaving the view is not a step.
    assert!(!h.select.on_pointer_over(PointerTarget::Outside, h.at(30)));
}

#[test]
fn test_document_mouse_up_ends_drag() {
    let mut h = Harness::new(multi(&["A", "B", "C"]), env(CHROME_WINDOWS));

    let (a, c) = (h.item(0), h.item(2));
    h.select.on_pointer_down(a, KeyboardModifiers::NONE, h.at(0));
    let event = DocumentEvent::new(DocumentEventKind::MouseUp, EventTarget::Outside);
    h.select.on_document_event(&event, h.at(10));

    assert!(!h.select.on_pointer_over(c, h.at(20)));
    assert_eq!(h.list.selected_indices(), vec![0]);
}

#[test]
fn test_disabled_options_do_not_start_drags() {
    let list = SourceList::from_nodes([
        OptionSpec::new("A").into(),
        OptionSpec::new("B").disabled().into(),
    ]);
    list.set_multiple(true);
    list.set_selected_index(None);
    let mut h = Harness::new(list, env(CHROME_WINDOWS));

    let b = h.item(1);
    assert!(!h.select.on_pointer_down(b, KeyboardModifiers::NONE, h.at(0)));
    assert!(h.list.selected_indices().is_empty());
}

#[test]
fn test_single_select_highlights_then_selects_on_release() {
    let mut h = Harness::new(
        SourceList::with_options(["Apple", "Pear", "Plum"]),
        env(CHROME_WINDOWS),
    );
    let labels = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = labels.clone();
    h.select
        .button()
        .label_changed
        .connect(move |label: &String| sink.lock().push(label.clone()));
    let changes = count_changes(&h.list);

    h.select.set_open(true, h.at(0));
    let plum = h.item(2);
    assert!(!h.select.on_pointer_down(plum, KeyboardModifiers::NONE, h.at(10)));
    assert!(!h.select.on_pointer_over(plum, h.at(20)));
    assert!(h.select.options_view().is_highlighting());
    assert_eq!(h.selected_text().as_deref(), Some("Apple"));

    assert!(h.select.on_pointer_up(plum, h.at(30)));
    assert_eq!(h.selected_text().as_deref(), Some("Plum"));
    assert!(!h.select.options_view().is_highlighting());
    assert_eq!(h.select.button().label(), "Plum");
    assert_eq!(*labels.lock(), vec!["Plum".to_string()]);
    assert_eq!(changes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_blur_followed_by_focus_is_cancelled() {
    let mut h = Harness::new(SourceList::with_options(["a", "b"]), env(CHROME_WINDOWS));
    h.select.on_focus(h.at(0));
    h.select.set_open(true, h.at(0));

    h.select.on_blur(h.at(10));
    h.select.on_focus(h.at(30));
    h.advance(100);
    assert!(h.select.is_focused());
    assert!(h.select.is_open());
    assert_eq!(h.host.log().focus_indication, vec![true, true]);
}

#[test]
fn test_blur_takes_effect_after_debounce() {
    let mut h = Harness::new(SourceList::with_options(["a", "b"]), env(CHROME_WINDOWS));
    h.select.on_focus(h.at(0));
    h.select.set_open(true, h.at(0));

    h.select.on_blur(h.at(200));
    let due = h.select.next_deadline(h.at(200)).unwrap();
    assert!(due.as_millis() >= 33 && due.as_millis() <= 34);

    h.advance(220);
    assert!(h.select.is_focused());
    assert!(h.select.is_open());

    h.advance(240);
    assert!(!h.select.is_focused());
    assert!(!h.select.is_open());
    assert_eq!(h.host.log().focus_indication.last(), Some(&false));
    assert_eq!(h.host.log().anchor_clears, 1);
}

#[test]
fn test_press_focus_intent_cancels_blur() {
    let mut h = Harness::new(SourceList::with_options(["a", "b"]), env(CHROME_WINDOWS));
    h.select.on_focus(h.at(0));

    let press = UiEvent::new(UiEventKind::MouseDown, EventTarget::Ui);
    h.select.on_ui_event(&press, h.at(10));
    assert!(h.select.is_open());
    assert_eq!(h.select.next_deadline(h.at(10)), Some(std::time::Duration::ZERO));

    // The platform reports the blur caused by the press afterwards.
    h.select.on_blur(h.at(12));
    h.advance(13);
    h.advance(100);
    assert!(h.select.is_focused());
    assert!(h.select.is_open());
    assert_eq!(h.host.log().focused, Some(FocusTarget::NativeSelect));
}

#[test]
fn test_unmount_disarms_pending_timers() {
    let mut h = Harness::new(SourceList::with_options(["a", "b"]), env(CHROME_WINDOWS));
    h.select.on_focus(h.at(0));
    h.select.on_blur(h.at(5));
    h.select.unmount(h.at(6));
    let indications = h.host.log().focus_indication.len();

    h.advance(500);
    assert_eq!(h.host.log().focus_indication.len(), indications);
    assert_eq!(h.select.next_deadline(h.at(500)), None);
    assert!(!h.select.is_mounted());
}

#[test]
fn test_unmount_closes_open_dropdown() {
    let mut h = Harness::new(SourceList::with_options(["a", "b"]), env(CHROME_WINDOWS));
    h.select.set_open(true, h.at(0));
    assert!(h.select.is_open());

    h.select.unmount(h.at(10));
    assert!(!h.select.is_open());
    assert!(!h.select.button().is_open());
    assert_eq!(h.host.log().open.last(), Some(&false));
    assert_eq!(h.host.log().anchor_clears, 1);
}
