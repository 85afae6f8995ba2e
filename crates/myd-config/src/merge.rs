//! Recursive override merge of configuration trees.

use myd_model::ConfigNode;

/// Merges `overlay` onto `base`.
///
/// When both sides are maps the merge recurses key-wise: existing keys keep
/// their position and new keys are appended. In every other case the overlay
/// replaces the base, so lists and scalars are never concatenated.
pub fn deep_merge(base: ConfigNode, overlay: ConfigNode) -> ConfigNode {
    match (base, overlay) {
        (ConfigNode::Map(mut base_map), ConfigNode::Map(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => {
                        let current = std::mem::take(existing);
                        *existing = deep_merge(current, value);
                    }
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
            ConfigNode::Map(base_map)
        }
        (_, overlay) => overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use myd_model::ConfigMap;

    fn map(entries: Vec<(&str, ConfigNode)>) -> ConfigNode {
        let mut out = ConfigMap::new();
        for (key, value) in entries {
            out.insert(key.to_string(), value);
        }
        ConfigNode::Map(out)
    }

    #[test]
    fn nested_maps_merge_per_leaf() {
        let base = map(vec![
            ("dirs", map(vec![("raw", "a".into()), ("out", "b".into())])),
            ("keys", ConfigNode::List(vec!["X".into(), "Y".into()])),
        ]);
        let overlay = map(vec![
            ("dirs", map(vec![("out", "c".into()), ("rejects", "d".into())])),
            ("keys", ConfigNode::List(vec!["Z".into()])),
        ]);
        let merged = deep_merge(base, overlay);
        let dirs = merged.get("dirs").and_then(ConfigNode::as_map).unwrap();
        let keys: Vec<&String> = dirs.keys().collect();
        assert_eq!(keys, vec!["raw", "out", "rejects"]);
        assert_eq!(dirs["out"], ConfigNode::from("c"));
        assert_eq!(
            merged.get("keys"),
            Some(&ConfigNode::List(vec!["Z".into()]))
        );
    }

    #[test]
    fn existing_keys_keep_position() {
        let base = map(vec![("A", "1".into()), ("B", "2".into()), ("C", "3".into())]);
        let overlay = map(vec![("A", "9".into()), ("D", "4".into())]);
        let merged = deep_merge(base, overlay);
        let keys: Vec<&String> = merged.as_map().unwrap().keys().collect();
        assert_eq!(keys, vec!["A", "B", "C", "D"]);
        assert_eq!(merged.get("A"), Some(&ConfigNode::from("9")));
    }

    #[test]
    fn scalar_replaces_map() {
        let base = map(vec![("text", map(vec![("normalize", "NFC".into())]))]);
        let overlay = map(vec![("text", ConfigNode::Null)]);
        let merged = deep_merge(base, overlay);
        assert_eq!(merged.get("text"), Some(&ConfigNode::Null));
    }
}
