//! Property tests for the recursive override merge.

use myd_config::deep_merge;
use myd_model::{ConfigMap, ConfigNode};
use proptest::prelude::*;

fn arb_leaf() -> impl Strategy<Value = ConfigNode> {
    prop_oneof![
        Just(ConfigNode::Null),
        any::<bool>().prop_map(ConfigNode::Bool),
        any::<i64>().prop_map(ConfigNode::Int),
        "[a-z]{0,6}".prop_map(ConfigNode::Str),
        prop::collection::vec("[a-z]{1,3}".prop_map(ConfigNode::Str), 0..3).prop_map(ConfigNode::List),
    ]
}

fn arb_node() -> impl Strategy<Value = ConfigNode> {
    arb_leaf().prop_recursive(3, 24, 4, |inner| {
        prop::collection::vec(("[a-d]", inner), 0..4).prop_map(|entries| {
            let mut map = ConfigMap::new();
            for (key, value) in entries {
                map.insert(key, value);
            }
            ConfigNode::Map(map)
        })
    })
}

proptest! {
    #[test]
    fn non_map_overlay_replaces(base in arb_node(), overlay in arb_leaf()) {
        prop_assert_eq!(deep_merge(base, overlay.clone()), overlay);
    }

    #[test]
    fn merging_with_empty_map_is_identity(base in arb_node()) {
        let merged = deep_merge(base.clone(), ConfigNode::empty_map());
        match &base {
            ConfigNode::Map(_) => prop_assert_eq!(merged, base),
            _ => prop_assert_eq!(merged, ConfigNode::empty_map()),
        }
    }

    #[test]
    fn overlay_leaves_win_and_base_keys_survive(base in arb_node(), overlay in arb_node()) {
        let merged = deep_merge(base.clone(), overlay.clone());
        if let (Some(base_map), Some(overlay_map)) = (base.as_map(), overlay.as_map()) {
            let merged_map = merged.as_map().expect("map merged with map stays a map");
            for key in base_map.keys() {
                prop_assert!(merged_map.contains_key(key));
            }
            for (key, value) in overlay_map {
                if value.as_map().is_none() {
                    prop_assert_eq!(&merged_map[key], value);
                }
            }
            let base_keys: Vec<&String> = base_map.keys().collect();
            let leading: Vec<&String> = merged_map.keys().take(base_keys.len()).collect();
            prop_assert_eq!(leading, base_keys);
        }
    }
}
