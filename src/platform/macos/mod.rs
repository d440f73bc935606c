//! macOS backends: CGEventTap for capture, CGEvent posting for injection.

pub(crate) mod keycodes;
mod listen;
mod simulate;

use crate::capture::CaptureBackend;
use objc2_core_graphics::{CGDisplayBounds, CGError, CGGetActiveDisplayList};

#[cfg(test)]
pub(crate) use keycodes::COLLAPSED_ALIASES;
pub(crate) use keycodes::NATIVE_PAIRS;
pub(crate) use simulate::inject;

pub(crate) fn capture_backend() -> Box<dyn CaptureBackend> {
    Box::new(listen::EventTapBackend::new())
}

/// Bounding box of all active displays, in global display points.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DesktopBounds {
    pub(crate) left: f64,
    pub(crate) top: f64,
    pub(crate) width: f64,
    pub(crate) height: f64,
}

impl DesktopBounds {
    /// Map a point in global display coordinates to the `[0, 65535]` box.
    pub(crate) fn normalize(&self, x: f64, y: f64) -> (u16, u16) {
        let span_x = (self.width - 1.0).max(1.0);
        let span_y = (self.height - 1.0).max(1.0);
        let nx = ((x - self.left) / span_x * 65535.0).round().clamp(0.0, 65535.0);
        let ny = ((y - self.top) / span_y * 65535.0).round().clamp(0.0, 65535.0);
        (nx as u16, ny as u16)
    }

    /// Map normalized `[0, 65535]` coordinates back to display points.
    pub(crate) fn denormalize(&self, x: u16, y: u16) -> (f64, f64) {
        let px = self.left + x as f64 / 65535.0 * (self.width - 1.0).max(0.0);
        let py = self.top + y as f64 / 65535.0 * (self.height - 1.0).max(0.0);
        (px, py)
    }
}

/// Query the union of all active display bounds.
pub(crate) fn virtual_desktop_bounds() -> std::result::Result<DesktopBounds, String> {
    let mut max_displays = 8usize;
    loop {
        let mut displays = vec![0; max_displays];
        let mut count: u32 = 0;
        let status = unsafe {
            CGGetActiveDisplayList(max_displays as u32, displays.as_mut_ptr(), &mut count)
        };
        if status != CGError::Success {
            return Err(format!("CGGetActiveDisplayList failed: {status:?}"));
        }
        if (count as usize) <= max_displays {
            displays.truncate(count as usize);
            if displays.is_empty() {
                return Err("no active displays".into());
            }
            let mut left = f64::INFINITY;
            let mut top = f64::INFINITY;
            let mut right = f64::NEG_INFINITY;
            let mut bottom = f64::NEG_INFINITY;
            for display_id in displays {
                let bounds = CGDisplayBounds(display_id);
                left = left.min(bounds.origin.x);
                top = top.min(bounds.origin.y);
                right = right.max(bounds.origin.x + bounds.size.width);
                bottom = bottom.max(bounds.origin.y + bounds.size.height);
            }
            return Ok(DesktopBounds {
                left,
                top,
                width: right - left,
                height: bottom - top,
            });
        }
        max_displays = count as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: DesktopBounds = DesktopBounds {
        left: -1920.0,
        top: 0.0,
        width: 3360.0, // a 1920pt display left of a 1440pt one
        height: 900.0,
    };

    #[test]
    fn test_normalize_maps_desktop_corners_to_range_ends() {
        assert_eq!(BOUNDS.normalize(-1920.0, 0.0), (0, 0));
        assert_eq!(
            BOUNDS.normalize(-1920.0 + 3359.0, 899.0),
            (65535, 65535)
        );
    }

    #[test]
    fn test_denormalize_maps_range_ends_to_desktop_corners() {
        let (x, y) = BOUNDS.denormalize(0, 0);
        assert_eq!((x, y), (-1920.0, 0.0));
        let (x, y) = BOUNDS.denormalize(65535, 65535);
        assert!((x - (-1920.0 + 3359.0)).abs() < 1e-6);
        assert!((y - 899.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_clamps_points_outside_the_desktop() {
        assert_eq!(BOUNDS.normalize(-5000.0, -50.0), (0, 0));
        assert_eq!(BOUNDS.normalize(9000.0, 9000.0), (65535, 65535));
    }
}
