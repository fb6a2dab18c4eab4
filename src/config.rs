use std::time::Duration;

use crate::pipeline::RenderMode;

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Frame cadence. A tick commits queued work and exchanges one frame.
    pub tick_interval: Duration,
    pub render_mode: RenderMode,
    /// Frame size announced when a session mounts without host geometry.
    pub default_frame_width: u32,
    pub default_frame_height: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(16), // ~60fps
            render_mode: RenderMode::Remote,
            default_frame_width: 800,
            default_frame_height: 600,
        }
    }
}
