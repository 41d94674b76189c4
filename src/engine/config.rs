//! Config - Tunables shared by every node of a tree.
//!
//! A `Config` is held behind an `Arc` and shared read-only by the nodes that
//! use it. Changing a tunable means building a new config and attaching it;
//! a config must not be swapped while a layout is running on its tree.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use super::NodeId;

bitflags! {
    /// Opt-in behaviour that deviates from the stable algorithm.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ExperimentalFeatures: u8 {
        /// Recompute flex bases on every layout pass instead of caching
        /// them until the child is dirtied.
        const WEB_FLEX_BASIS = 1 << 0;
    }
}

/// Called after copy-on-write cloned `old` into `new` as child `index` of `parent`.
pub type NodeClonedFunc = Arc<dyn Fn(NodeId, NodeId, NodeId, usize) + Send + Sync>;

/// Process- or tree-wide layout tunables.
#[derive(Clone)]
pub struct Config {
    /// Device pixels per point. Output is snapped to `1 / point_scale_factor`;
    /// `0.0` disables rounding.
    pub point_scale_factor: f32,

    /// Use CSS defaults: row direction, stretched content, shrink factor 1.
    pub use_web_defaults: bool,

    /// Keep the historical behaviour where an AtMost container with
    /// non-growing children still stretches to its available size.
    pub use_legacy_stretch_behaviour: bool,

    /// Enabled experiments.
    pub experimental_features: ExperimentalFeatures,

    /// Notified for each child cloned by copy-on-write.
    pub on_node_cloned: Option<NodeClonedFunc>,
}

impl Config {
    /// Create a config with the default tunables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config using CSS defaults.
    pub fn web() -> Self {
        Self {
            use_web_defaults: true,
            ..Self::default()
        }
    }

    /// Builder-style point scale factor.
    pub fn with_point_scale_factor(mut self, factor: f32) -> Self {
        self.point_scale_factor = if factor.is_finite() && factor > 0.0 { factor } else { 0.0 };
        self
    }

    /// Builder-style experiment toggle.
    pub fn with_experimental_feature(mut self, feature: ExperimentalFeatures, enabled: bool) -> Self {
        self.experimental_features.set(feature, enabled);
        self
    }

    /// Builder-style clone hook.
    pub fn with_node_cloned_func(mut self, func: NodeClonedFunc) -> Self {
        self.on_node_cloned = Some(func);
        self
    }

    #[inline]
    pub fn is_experimental_feature_enabled(&self, feature: ExperimentalFeatures) -> bool {
        self.experimental_features.contains(feature)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            point_scale_factor: 1.0,
            use_web_defaults: false,
            use_legacy_stretch_behaviour: false,
            experimental_features: ExperimentalFeatures::empty(),
            on_node_cloned: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("point_scale_factor", &self.point_scale_factor)
            .field("use_web_defaults", &self.use_web_defaults)
            .field("use_legacy_stretch_behaviour", &self.use_legacy_stretch_behaviour)
            .field("experimental_features", &self.experimental_features)
            .field("on_node_cloned", &self.on_node_cloned.is_some())
            .finish()
    }
}
