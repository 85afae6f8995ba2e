//! Layer discovery and layered fragment merging.

use std::fmt;
use std::path::{Path, PathBuf};

use myd_model::ConfigNode;
use tracing::debug;

use crate::error::Result;
use crate::load::{FragmentKind, load_fragment};
use crate::merge::deep_merge;
use crate::target::ObjectVariant;

/// Shared-defaults directory name at the root and inside each object.
pub const SHARED_DIR: &str = "_shared";

/// Existing layer directories, least specific first.
///
/// `<root>/_shared`, then `<root>/<object>/_shared`, then
/// `<root>/<object>/<variant>` (or `<root>/<object>` without a variant).
pub fn assemble_layers(root: &Path, target: &ObjectVariant) -> Vec<PathBuf> {
    let mut layers = vec![root.join(SHARED_DIR)];
    if let Some(object) = &target.object {
        let object_dir = root.join(object);
        layers.push(object_dir.join(SHARED_DIR));
        match &target.variant {
            Some(variant) => layers.push(object_dir.join(variant)),
            None => layers.push(object_dir),
        }
    }
    layers.into_iter().filter(|path| path.is_dir()).collect()
}

/// Merged but uninterpreted fragments of every layer.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub root: PathBuf,
    pub target: ObjectVariant,
    pub layers: Vec<PathBuf>,
    /// Every fragment file that contributed, in merge order.
    pub files: Vec<(FragmentKind, PathBuf)>,
    pub column_map: ConfigNode,
    pub value_map: ConfigNode,
    pub value_rules: ConfigNode,
    pub meta: ConfigNode,
}

impl LayeredConfig {
    pub fn fragment(&self, kind: FragmentKind) -> &ConfigNode {
        match kind {
            FragmentKind::ColumnMap => &self.column_map,
            FragmentKind::ValueMap => &self.value_map,
            FragmentKind::ValueRules => &self.value_rules,
            FragmentKind::Meta => &self.meta,
        }
    }

    fn fragment_mut(&mut self, kind: FragmentKind) -> &mut ConfigNode {
        match kind {
            FragmentKind::ColumnMap => &mut self.column_map,
            FragmentKind::ValueMap => &mut self.value_map,
            FragmentKind::ValueRules => &mut self.value_rules,
            FragmentKind::Meta => &mut self.meta,
        }
    }

    /// Human-readable account of the layers and files consulted.
    pub fn trace(&self) -> LayerTrace<'_> {
        LayerTrace { config: self }
    }
}

/// Loads and deep-merges all fragments for `target` under `root`.
pub fn load_layered(root: &Path, target: &ObjectVariant) -> Result<LayeredConfig> {
    let layers = assemble_layers(root, target);
    let mut config = LayeredConfig {
        root: root.to_path_buf(),
        target: target.clone(),
        layers: layers.clone(),
        files: Vec::new(),
        column_map: ConfigNode::empty_map(),
        value_map: ConfigNode::empty_map(),
        value_rules: ConfigNode::empty_map(),
        meta: ConfigNode::empty_map(),
    };
    for layer in &layers {
        for kind in FragmentKind::ALL {
            let Some((path, node)) = load_fragment(layer, kind)? else {
                continue;
            };
            debug!(layer = %layer.display(), file = %path.display(), "merging fragment");
            let slot = config.fragment_mut(kind);
            let current = std::mem::take(slot);
            *slot = deep_merge(current, node);
            config.files.push((kind, path));
        }
    }
    Ok(config)
}

/// Display adapter listing layers and the files found per fragment kind.
pub struct LayerTrace<'a> {
    config: &'a LayeredConfig,
}

impl fmt::Display for LayerTrace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Config layers (least to most specific):")?;
        if self.config.layers.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for layer in &self.config.layers {
            writeln!(f, "  - {}", layer.display())?;
        }
        for kind in FragmentKind::ALL {
            writeln!(f, "Files for {}:", kind.stem())?;
            let mut seen = false;
            for (file_kind, path) in &self.config.files {
                if *file_kind == kind {
                    writeln!(f, "  + {}", path.display())?;
                    seen = true;
                }
            }
            if !seen {
                writeln!(f, "  (none)")?;
            }
        }
        Ok(())
    }
}
