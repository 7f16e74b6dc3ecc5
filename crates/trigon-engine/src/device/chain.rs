use std::sync::Arc;

use anyhow::{Context, Result};

use crate::present::{
    ChainFormat, ChainStatus, Extent, ImageIndex, PresentationChain, RenderPassLayout,
};

use super::gpu::GpuShared;
use super::init::GpuInit;
use super::recording::FrameRecording;
use super::surface;

/// Attachments for one presentable image.
///
/// The color view only exists while the image is acquired; the depth view is
/// created with the chain and lives as long as it does.
pub struct ChainFrameBuffer {
    color: Option<wgpu::TextureView>,
    depth: Option<wgpu::TextureView>,
}

impl ChainFrameBuffer {
    pub fn color(&self) -> Option<&wgpu::TextureView> {
        self.color.as_ref()
    }

    pub fn depth(&self) -> Option<&wgpu::TextureView> {
        self.depth.as_ref()
    }
}

struct AcquiredImage {
    image: ImageIndex,
    texture: wgpu::SurfaceTexture,
    suboptimal: bool,
}

/// A configured window surface plus the per-image depth attachments.
///
/// wgpu hands out surface textures one at a time, so image indices are assigned
/// round-robin over `image_count` slots as textures are acquired.
pub struct SurfaceChain {
    shared: Arc<GpuShared>,
    config: wgpu::SurfaceConfiguration,
    layout: RenderPassLayout,
    frame_buffers: Vec<ChainFrameBuffer>,
    // Kept alive for the depth views.
    _depth_textures: Vec<wgpu::Texture>,
    next_image: ImageIndex,
    acquired: Option<AcquiredImage>,
}

impl SurfaceChain {
    pub(crate) fn new(
        shared: Arc<GpuShared>,
        adapter: &wgpu::Adapter,
        init: &GpuInit,
        extent: Extent,
        previous: Option<&SurfaceChain>,
    ) -> Result<Self> {
        anyhow::ensure!(
            !extent.is_degenerate(),
            "cannot build a presentation chain for a {}x{} surface",
            extent.width,
            extent.height
        );

        let caps = shared.surface.get_capabilities(adapter);
        let color = surface::choose_surface_format(
            &caps,
            init.prefer_srgb,
            previous.map(|p| p.layout.format.color),
        )
        .context("no supported surface formats")?;
        let depth = match previous {
            Some(p) => p.layout.format.depth,
            None => init.depth_format,
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: color,
            width: extent.width,
            height: extent.height,
            present_mode: surface::choose_present_mode(&caps, init.present_mode),
            alpha_mode: surface::choose_alpha_mode(&caps, init.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };
        shared.surface.configure(&shared.device, &config);

        let image_count = surface::image_count(init.desired_maximum_frame_latency);
        let depth_textures: Vec<wgpu::Texture> = match depth {
            Some(format) => (0..image_count)
                .map(|i| create_depth_texture(&shared.device, format, extent, i))
                .collect(),
            None => Vec::new(),
        };
        let frame_buffers = (0..image_count)
            .map(|i| ChainFrameBuffer {
                color: None,
                depth: depth_textures
                    .get(i)
                    .map(|t| t.create_view(&wgpu::TextureViewDescriptor::default())),
            })
            .collect();

        Ok(Self {
            shared,
            config,
            layout: RenderPassLayout {
                format: ChainFormat { color, depth },
                clear_color: init.clear_color,
                clear_depth: 1.0,
            },
            frame_buffers,
            _depth_textures: depth_textures,
            next_image: 0,
            acquired: None,
        })
    }

    fn release_acquired(&mut self) {
        if let Some(acquired) = self.acquired.take() {
            if let Some(fb) = self.frame_buffers.get_mut(acquired.image as usize) {
                fb.color = None;
            }
        }
    }
}

impl PresentationChain for SurfaceChain {
    type FrameBuffer = ChainFrameBuffer;
    type Recording = FrameRecording;

    fn image_count(&self) -> usize {
        self.frame_buffers.len()
    }

    fn format(&self) -> ChainFormat {
        self.layout.format
    }

    fn extent(&self) -> Extent {
        Extent::new(self.config.width, self.config.height)
    }

    fn render_pass(&self) -> &RenderPassLayout {
        &self.layout
    }

    fn frame_buffer(&self, image: ImageIndex) -> Option<&ChainFrameBuffer> {
        self.frame_buffers
            .get(image as usize)
            .filter(|fb| fb.color.is_some())
    }

    fn acquire_next_image(&mut self) -> (ImageIndex, ChainStatus) {
        // A texture left over from an abandoned frame is dropped unpresented.
        self.release_acquired();

        let image = self.next_image;
        let texture = match self.shared.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(err) => return (image, surface::classify_surface_error(err)),
        };

        let suboptimal = texture.suboptimal;
        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.frame_buffers[image as usize].color = Some(view);
        self.acquired = Some(AcquiredImage {
            image,
            texture,
            suboptimal,
        });
        self.next_image = (image + 1) % self.frame_buffers.len() as ImageIndex;

        let status = if suboptimal {
            ChainStatus::Suboptimal
        } else {
            ChainStatus::Ok
        };
        (image, status)
    }

    fn submit_and_present(
        &mut self,
        recording: &mut FrameRecording,
        image: ImageIndex,
    ) -> ChainStatus {
        let Some(acquired) = self.acquired.take() else {
            log::error!("present of image {image} without an acquired surface texture");
            return ChainStatus::Fatal;
        };
        if let Some(fb) = self.frame_buffers.get_mut(acquired.image as usize) {
            fb.color = None;
        }
        if acquired.image != image {
            log::error!(
                "present of image {image} but image {} is acquired",
                acquired.image
            );
            return ChainStatus::Fatal;
        }
        let Some(commands) = recording.take_finished() else {
            log::error!("frame slot {} has no finished recording", recording.slot());
            return ChainStatus::Fatal;
        };

        let index = self.shared.queue.submit(std::iter::once(commands));
        recording.mark_submitted(index);

        self.shared.window.pre_present_notify();
        acquired.texture.present();

        if acquired.suboptimal {
            ChainStatus::Suboptimal
        } else {
            ChainStatus::Ok
        }
    }
}

fn create_depth_texture(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    extent: Extent,
    image: usize,
) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(&format!("trigon depth {image}")),
        size: wgpu::Extent3d {
            width: extent.width,
            height: extent.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    })
}
