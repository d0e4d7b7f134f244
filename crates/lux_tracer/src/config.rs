//! Trace configuration.

use serde::{Deserialize, Serialize};

/// How the integrator splits light into channels when it refracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "samples", rename_all = "snake_case")]
pub enum ChannelMode {
    /// One refraction index per color component.
    Rgb,
    /// `n` wavelengths, each tinted by its rainbow color.
    Spectral(usize),
}

impl ChannelMode {
    /// Number of refraction indices every transmissive material must carry.
    pub fn count(&self) -> usize {
        match self {
            ChannelMode::Rgb => 3,
            ChannelMode::Spectral(n) => *n,
        }
    }
}

/// The channel a traced ray carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Every channel at once; refraction forks per channel.
    All,
    /// A single channel, already split off.
    Single(usize),
}

/// Settings for the integrator and sampler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Deepest bounce that still contributes light
    pub max_depth: u32,
    /// Rays cast per sampled point
    pub samples: u32,
    /// Offset applied to bounced ray origins to escape their own surface
    pub bias: f32,
    /// Quadtree cells narrower than this are not split
    pub min_node_size: f32,
    pub channels: ChannelMode,
    /// Index entities with a quadtree instead of testing every one
    pub use_quadtree: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            samples: 64,
            bias: 1e-4,
            min_node_size: crate::quadtree::MIN_NODE_SIZE,
            channels: ChannelMode::Rgb,
            use_quadtree: true,
        }
    }
}

impl TraceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples: u32, max_depth: u32) -> Self {
        self.samples = samples;
        self.max_depth = max_depth;
        self
    }

    pub fn with_bias(mut self, bias: f32) -> Self {
        self.bias = bias;
        self
    }

    pub fn with_channels(mut self, channels: ChannelMode) -> Self {
        self.channels = channels;
        self
    }

    /// Choose between the quadtree and brute force, and the quadtree's finest cell size.
    pub fn with_index(mut self, use_quadtree: bool, min_node_size: f32) -> Self {
        self.use_quadtree = use_quadtree;
        self.min_node_size = min_node_size;
        self
    }
}
