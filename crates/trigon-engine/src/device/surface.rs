//! Surface negotiation helpers shared by chain construction.

use crate::present::ChainStatus;

/// Picks the color format for a new chain.
///
/// A chain replacing an older one asks for the old format first so that the
/// rebuild stays format-compatible; only if the surface no longer offers it does
/// negotiation fall through to the regular preference order.
pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
    previous: Option<wgpu::TextureFormat>,
) -> Option<wgpu::TextureFormat> {
    if caps.formats.is_empty() {
        return None;
    }

    if let Some(f) = previous.filter(|f| caps.formats.contains(f)) {
        return Some(f);
    }

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        for f in preferred {
            if caps.formats.contains(&f) {
                return Some(f);
            }
        }
    }

    Some(caps.formats[0])
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

pub(crate) fn choose_present_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: wgpu::PresentMode,
) -> wgpu::PresentMode {
    if caps.present_modes.contains(&requested) {
        requested
    } else {
        // FIFO is the only mode every surface must support.
        wgpu::PresentMode::Fifo
    }
}

/// Number of presentable images for a given frame latency: double or triple
/// buffering.
pub(crate) fn image_count(desired_maximum_frame_latency: u32) -> usize {
    (desired_maximum_frame_latency as usize + 1).clamp(2, 3)
}

/// Maps a wgpu acquisition error onto the chain status vocabulary.
pub(crate) fn classify_surface_error(err: wgpu::SurfaceError) -> ChainStatus {
    match err {
        wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost => {
            log::debug!("surface stale on acquire: {err}");
            ChainStatus::OutOfDate
        }
        // Timeouts show up transiently around resizes on some platforms;
        // reconfiguring is the cheapest way out.
        wgpu::SurfaceError::Timeout => {
            log::debug!("surface acquire timed out");
            ChainStatus::OutOfDate
        }
        wgpu::SurfaceError::OutOfMemory | wgpu::SurfaceError::Other => {
            log::error!("surface acquire failed: {err}");
            ChainStatus::Fatal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(formats: &[wgpu::TextureFormat]) -> wgpu::SurfaceCapabilities {
        let mut caps = wgpu::SurfaceCapabilities::default();
        caps.formats = formats.to_vec();
        caps.present_modes = vec![wgpu::PresentMode::Fifo, wgpu::PresentMode::Mailbox];
        caps.alpha_modes = vec![wgpu::CompositeAlphaMode::Opaque];
        caps
    }

    // ── format ────────────────────────────────────────────────────────────

    #[test]
    fn no_formats_is_none() {
        assert_eq!(choose_surface_format(&caps(&[]), true, None), None);
    }

    #[test]
    fn prefers_srgb() {
        let c = caps(&[
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
        ]);
        assert_eq!(
            choose_surface_format(&c, true, None),
            Some(wgpu::TextureFormat::Bgra8UnormSrgb)
        );
        assert_eq!(
            choose_surface_format(&c, false, None),
            Some(wgpu::TextureFormat::Bgra8Unorm)
        );
    }

    #[test]
    fn previous_format_wins_when_still_supported() {
        let c = caps(&[
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
        ]);
        assert_eq!(
            choose_surface_format(&c, true, Some(wgpu::TextureFormat::Bgra8Unorm)),
            Some(wgpu::TextureFormat::Bgra8Unorm)
        );
    }

    #[test]
    fn unsupported_previous_format_falls_through() {
        let c = caps(&[wgpu::TextureFormat::Rgba8UnormSrgb]);
        assert_eq!(
            choose_surface_format(&c, true, Some(wgpu::TextureFormat::Bgra8UnormSrgb)),
            Some(wgpu::TextureFormat::Rgba8UnormSrgb)
        );
    }

    // ── modes ─────────────────────────────────────────────────────────────

    #[test]
    fn alpha_mode_falls_back_to_first_supported() {
        let c = caps(&[wgpu::TextureFormat::Bgra8Unorm]);
        assert_eq!(
            choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PreMultiplied)),
            wgpu::CompositeAlphaMode::Opaque
        );
    }

    #[test]
    fn unsupported_present_mode_falls_back_to_fifo() {
        let c = caps(&[wgpu::TextureFormat::Bgra8Unorm]);
        assert_eq!(
            choose_present_mode(&c, wgpu::PresentMode::Immediate),
            wgpu::PresentMode::Fifo
        );
        assert_eq!(
            choose_present_mode(&c, wgpu::PresentMode::Mailbox),
            wgpu::PresentMode::Mailbox
        );
    }

    #[test]
    fn image_count_is_double_or_triple() {
        assert_eq!(image_count(0), 2);
        assert_eq!(image_count(1), 2);
        assert_eq!(image_count(2), 3);
        assert_eq!(image_count(8), 3);
    }

    // ── errors ────────────────────────────────────────────────────────────

    #[test]
    fn stale_errors_map_to_out_of_date() {
        assert_eq!(
            classify_surface_error(wgpu::SurfaceError::Outdated),
            ChainStatus::OutOfDate
        );
        assert_eq!(
            classify_surface_error(wgpu::SurfaceError::Lost),
            ChainStatus::OutOfDate
        );
        assert_eq!(
            classify_surface_error(wgpu::SurfaceError::Timeout),
            ChainStatus::OutOfDate
        );
    }

    #[test]
    fn other_errors_are_fatal() {
        assert_eq!(
            classify_surface_error(wgpu::SurfaceError::OutOfMemory),
            ChainStatus::Fatal
        );
        assert_eq!(
            classify_surface_error(wgpu::SurfaceError::Other),
            ChainStatus::Fatal
        );
    }
}
