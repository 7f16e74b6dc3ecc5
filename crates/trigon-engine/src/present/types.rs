/// Number of frames the CPU may record ahead of the GPU.
///
/// One recording slot and one fence exist per frame in flight.
pub const MAX_FRAMES_IN_FLIGHT: usize = 2;

/// Index into the presentation chain's image set.
pub type ImageIndex = u32;

/// Surface size in physical pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A zero-area extent (e.g. a minimized window) cannot back a chain.
    #[inline]
    pub fn is_degenerate(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for Extent {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

/// Result vocabulary shared by acquisition and presentation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ChainStatus {
    /// Image usable, chain matches the surface.
    Ok,
    /// Image usable now, but the chain should be rebuilt soon.
    Suboptimal,
    /// Chain no longer matches the surface; rebuild before use.
    OutOfDate,
    /// Unrecoverable device or surface failure.
    Fatal,
}

impl ChainStatus {
    /// `true` when an acquired image may be rendered to.
    #[inline]
    pub fn is_usable(self) -> bool {
        matches!(self, ChainStatus::Ok | ChainStatus::Suboptimal)
    }

    /// `true` when the status asks for a chain rebuild.
    #[inline]
    pub fn is_stale(self) -> bool {
        matches!(self, ChainStatus::Suboptimal | ChainStatus::OutOfDate)
    }
}

/// Pixel formats a chain instance is bound to.
///
/// Fixed for the lifetime of one chain; must not drift across rebuilds.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ChainFormat {
    pub color: wgpu::TextureFormat,
    pub depth: Option<wgpu::TextureFormat>,
}

/// Render-pass definition owned by a chain.
///
/// Pipelines are created against this layout, so it only carries what must stay
/// stable across rebuilds plus the per-pass clear values.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderPassLayout {
    pub format: ChainFormat,
    pub clear_color: wgpu::Color,
    pub clear_depth: f32,
}

/// Viewport state as recorded into a render pass.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportState {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl ViewportState {
    /// Full-surface viewport with the standard `[0, 1]` depth range.
    pub fn covering(extent: Extent) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: extent.width as f32,
            height: extent.height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

/// Scissor rectangle in physical pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ScissorRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ScissorRect {
    pub fn covering(extent: Extent) -> Self {
        Self {
            x: 0,
            y: 0,
            width: extent.width,
            height: extent.height,
        }
    }
}
