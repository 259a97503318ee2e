#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use artnode::partials::Partial;
use artnode::partials::array_partial::ArrPartial;
use artnode::{Node, NodeKind};

type FuzzNode = Node<ArrPartial<8>, u16>;

#[derive(Arbitrary, Debug)]
enum NodeMethod {
    Find { key: u8 },
    Insert { key: u8, val: u16 },
    Update { key: u8, val: u16 },
    Delete { key: u8 },
    Next { key: u8 },
    Prev { key: u8 },
    Collapse,
}

fn leaf(val: u16) -> FuzzNode {
    Node::new_leaf(ArrPartial::default(), val)
}

fuzz_target!(|methods: Vec<NodeMethod>| {
    let mut node: FuzzNode = Node::new_inner(ArrPartial::key(b"fz"));
    let mut bt_map = BTreeMap::<u8, u16>::new();

    for m in methods {
        match m {
            NodeMethod::Find { key } => {
                let node_v = node.find_child(key).and_then(|c| c.value().copied());
                assert_eq!(node_v, bt_map.get(&key).copied());
            }
            NodeMethod::Insert { key, val } => {
                if bt_map.contains_key(&key) {
                    continue;
                }
                if node.is_full() {
                    node = node.grow();
                }
                node.set_child(key, leaf(val));
                bt_map.insert(key, val);
            }
            NodeMethod::Update { key, val } => {
                let old_node = node.find_child_mut(key).and_then(|c| c.set_value(val));
                let old_bt = bt_map.get_mut(&key).map(|v| std::mem::replace(v, val));
                assert_eq!(old_node, old_bt);
            }
            NodeMethod::Delete { key } => {
                let removed = node.del_child(key).and_then(|mut c| c.take_value());
                assert_eq!(removed, bt_map.remove(&key));
                if node.is_underfull() {
                    node = node.shrink();
                }
            }
            NodeMethod::Next { key } => {
                let expected = bt_map.range(key..).next().map(|(k, _)| *k);
                assert_eq!(node.next_partial_key(key).ok(), expected);
            }
            NodeMethod::Prev { key } => {
                let expected = bt_map.range(..=key).next_back().map(|(k, _)| *k);
                assert_eq!(node.prev_partial_key(key).ok(), expected);
            }
            NodeMethod::Collapse => {
                // Collapsing is only observable on a single child; put the node back otherwise.
                let prefix_len = node.prefix_len();
                match node.into_sole_child() {
                    Ok(child) => {
                        let (key, _) = bt_map.pop_first().unwrap();
                        assert_eq!(child.prefix_len(), prefix_len + 1);
                        assert_eq!(child.prefix().at(prefix_len), key);
                        bt_map.clear();
                        node = Node::new_inner(ArrPartial::key(b"fz"));
                    }
                    Err(same) => node = same,
                }
            }
        }

        assert_eq!(node.n_children(), bt_map.len());
        assert!(node.n_children() <= node.capacity());
        if node.kind() != NodeKind::Node4 {
            assert!(!node.is_underfull());
        }
    }

    let keys: Vec<u8> = bt_map.keys().copied().collect();
    assert_eq!(node.partial_keys(), keys);
});
