//! Memory safety checks for the mapping layer and the node transitions built on it.
//!
//! The sorted and indexed mappings hold children in `MaybeUninit` slots, so every shift and
//! every migration between representations is a chance to read an uninitialized slot or drop a
//! child twice. Owned values (`Box`, `String`, `Rc`) make either mistake visible under Miri.
//!
//! Only compiled without `simd_keys`, as Miri cannot run the SIMD intrinsics.
//! Run with: cargo +nightly miri test -p artnode --test miri_mapping_tests --no-default-features

#![cfg(not(feature = "simd_keys"))]

use std::rc::Rc;

use artnode::mapping::{
    NodeMapping, direct_mapping::DirectMapping, indexed_mapping::IndexedMapping,
    sorted_keyed_mapping::SortedKeyedMapping,
};
use artnode::partials::array_partial::ArrPartial;
use artnode::utils::bitset::Bitset64;
use artnode::{Node, NodeKind};

#[test]
fn miri_direct_mapping_basic_ops() {
    let mut dm = DirectMapping::<i32>::new();

    // Fill the whole key range to exercise the occupancy bitset bounds.
    for i in 0..=255u8 {
        dm.add_child(i, i as i32);
        assert_eq!(*dm.seek_child(i).unwrap(), i as i32);
    }

    for i in 0..=255u8 {
        *dm.seek_child_mut(i).unwrap() = (i as i32) * 2;
    }

    for i in 0..=255u8 {
        assert_eq!(dm.delete_child(i), Some((i as i32) * 2));
        assert_eq!(dm.seek_child(i), None);
    }
    assert_eq!(dm.num_children(), 0);
}

#[test]
fn miri_sorted_keyed_mapping_shifts() {
    let mut skm = SortedKeyedMapping::<String, 16>::new();

    // Descending inserts shift every live slot right each time.
    for i in (0..16u8).rev() {
        skm.add_child(i, format!("value_{i}"));
    }
    assert_eq!(skm.keys(), (0..16).collect::<Vec<u8>>().as_slice());

    // Deleting from the front shifts everything left.
    for i in (0..16u8).step_by(2) {
        assert_eq!(skm.delete_child(i), Some(format!("value_{i}")));
        assert_eq!(skm.seek_child(i), None);
    }
    assert_eq!(skm.num_children(), 8);

    // Vacated trailing slots are zeroed.
    assert!(skm.raw_keys()[8..].iter().all(|k| *k == 0));

    for i in (0..16u8).step_by(2) {
        skm.add_child(i, format!("again_{i}"));
    }
    for i in 0..16u8 {
        assert!(skm.seek_child(i).is_some());
    }
}

#[test]
fn miri_indexed_mapping_slot_reuse() {
    let mut im = IndexedMapping::<Box<i32>, 48, Bitset64<1>>::new();

    for i in 0..48u8 {
        im.add_child(i * 5, Box::new(i as i32));
    }
    for i in 0..24u8 {
        assert_eq!(im.delete_child(i * 5).map(|b| *b), Some(i as i32));
    }
    // Freed slots get handed out again.
    for i in 0..24u8 {
        im.add_child(i * 5 + 1, Box::new(-(i as i32)));
    }
    assert!(im.is_full());
    for i in 0..24u8 {
        assert_eq!(**im.seek_child(i * 5 + 1).unwrap(), -(i as i32));
        assert_eq!(im.seek_child(i * 5), None);
    }
}

#[test]
fn miri_mapping_conversions() {
    let mut skm4 = SortedKeyedMapping::<Box<i64>, 4>::new();
    for i in [3u8, 1, 2, 0] {
        skm4.add_child(i, Box::new(i as i64));
    }

    let mut skm16 = SortedKeyedMapping::<Box<i64>, 16>::from_resized(&mut skm4);
    assert_eq!(skm4.num_children(), 0);
    for i in 4..16u8 {
        skm16.add_child(i, Box::new(i as i64));
    }

    let mut im = IndexedMapping::<Box<i64>, 48, Bitset64<1>>::from_sorted_keyed(&mut skm16);
    assert_eq!(skm16.num_children(), 0);
    for i in 16..48u8 {
        im.add_child(i, Box::new(i as i64));
    }

    let dm = DirectMapping::from_indexed(&mut im);
    assert_eq!(im.num_children(), 0);
    for i in 0..48u8 {
        assert_eq!(**dm.seek_child(i).unwrap(), i as i64);
    }
    assert_eq!(dm.num_children(), 48);
}

#[test]
fn miri_node_transitions_drop_each_child_once() {
    let token = Rc::new(());
    let mut node: Node<ArrPartial<8>, Rc<()>> = Node::new_4(ArrPartial::key(b"p"));

    for k in 0..=255u8 {
        if node.is_full() {
            node = node.grow();
        }
        node.set_child(k, Node::new_leaf(ArrPartial::default(), token.clone()));
    }
    assert_eq!(node.kind(), NodeKind::Node256);
    assert_eq!(Rc::strong_count(&token), 257);

    for k in (0..=255u8).rev() {
        drop(node.del_child(k));
        if node.is_underfull() {
            node = node.shrink();
        }
    }
    assert_eq!(node.kind(), NodeKind::Node4);
    assert_eq!(Rc::strong_count(&token), 1);
}

#[test]
fn miri_create_destroy_untouched() {
    {
        let dm = DirectMapping::<Vec<u8>>::new();
        assert_eq!(dm.seek_child(255), None);
    }
    {
        let im = IndexedMapping::<Box<String>, 48, Bitset64<1>>::new();
        assert_eq!(im.seek_child(47), None);
    }
    {
        let skm = SortedKeyedMapping::<Vec<i32>, 16>::new();
        assert_eq!(skm.seek_child(0), None);
    }
    {
        let node: Node<ArrPartial<8>, String> = Node::new_48(ArrPartial::default());
        assert!(node.is_leaf());
    }
}

#[test]
fn miri_populated_mappings_drop_cleanly() {
    let token = Rc::new(());
    {
        let mut skm = SortedKeyedMapping::<Rc<()>, 16>::new();
        let mut im = IndexedMapping::<Rc<()>, 48, Bitset64<1>>::new();
        let mut dm = DirectMapping::<Rc<()>>::new();
        for i in (0..10u8).map(|i| i * 7) {
            skm.add_child(i, token.clone());
            im.add_child(i, token.clone());
            dm.add_child(i, token.clone());
        }
        assert_eq!(Rc::strong_count(&token), 31);
    }
    assert_eq!(Rc::strong_count(&token), 1);
}
