//! Page geometry in millimetres, origin at the top-left corner.

use crate::{Error, Result};

pub const MM_TO_PT: f32 = 72.0 / 25.4;

pub fn mm_to_pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Shrink by `margin` on every side.
    pub fn inset(self, margin: f32) -> Rect {
        Rect::new(
            self.x + margin,
            self.y + margin,
            (self.width - 2.0 * margin).max(0.0),
            (self.height - 2.0 * margin).max(0.0),
        )
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Place a [`Placement`] computed for this rect's size.
    pub fn place(&self, placement: Placement) -> Rect {
        Rect::new(
            self.x + placement.offset_x,
            self.y + placement.offset_y,
            placement.width,
            placement.height,
        )
    }
}

/// Drawn size of an image plus its offset from the frame's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub width: f32,
    pub height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

fn check_dimension(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidGeometry(format!(
            "{} must be a positive finite number, got {}",
            name, value
        )))
    }
}

fn scaled(image_w: f32, image_h: f32, frame_w: f32, frame_h: f32, scale: f32) -> Placement {
    let width = image_w * scale;
    let height = image_h * scale;
    Placement {
        width,
        height,
        offset_x: (frame_w - width) / 2.0,
        offset_y: (frame_h - height) / 2.0,
    }
}

fn check_placement(placement: Placement) -> Result<Placement> {
    let fields = [
        placement.width,
        placement.height,
        placement.offset_x,
        placement.offset_y,
    ];
    if fields.iter().all(|v| v.is_finite()) {
        Ok(placement)
    } else {
        Err(Error::InvalidGeometry(format!(
            "placement is out of range: {:?}",
            placement
        )))
    }
}

fn aspect(name: &str, width: f32, height: f32) -> Result<f32> {
    let ratio = width / height;
    if ratio.is_finite() && ratio > 0.0 {
        Ok(ratio)
    } else {
        Err(Error::InvalidGeometry(format!(
            "{} aspect ratio {}x{} is out of range",
            name, width, height
        )))
    }
}

/// Largest centered rectangle with the image's aspect ratio that fits inside
/// the frame. The image is letterboxed, never cropped.
pub fn fit_rect(image_w: f32, image_h: f32, frame_w: f32, frame_h: f32) -> Result<Placement> {
    check_dimension("image width", image_w)?;
    check_dimension("image height", image_h)?;
    check_dimension("frame width", frame_w)?;
    check_dimension("frame height", frame_h)?;

    let image_aspect = aspect("image", image_w, image_h)?;
    let frame_aspect = aspect("frame", frame_w, frame_h)?;

    // The touching edge is set to the frame exactly; the other side derives
    // from the aspect ratio so no intermediate scale can overflow.
    let placement = if image_aspect >= frame_aspect {
        let height = (frame_w / image_aspect).min(frame_h);
        Placement {
            width: frame_w,
            height,
            offset_x: 0.0,
            offset_y: (frame_h - height) / 2.0,
        }
    } else {
        let width = (frame_h * image_aspect).min(frame_w);
        Placement {
            width,
            height: frame_h,
            offset_x: (frame_w - width) / 2.0,
            offset_y: 0.0,
        }
    };
    check_placement(placement)
}

/// Smallest centered rectangle with the image's aspect ratio that covers the
/// whole frame. Parts outside the frame are meant to be clipped.
pub fn cover_rect(image_w: f32, image_h: f32, frame_w: f32, frame_h: f32) -> Result<Placement> {
    check_dimension("image width", image_w)?;
    check_dimension("image height", image_h)?;
    check_dimension("frame width", frame_w)?;
    check_dimension("frame height", frame_h)?;

    let scale = (frame_w / image_w).max(frame_h / image_h);
    check_placement(scaled(image_w, image_h, frame_w, frame_h, scale))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn assert_contained_and_touching(p: Placement, frame_w: f32, frame_h: f32) {
        assert!(p.offset_x >= -EPS && p.offset_y >= -EPS, "{:?}", p);
        assert!(p.offset_x + p.width <= frame_w + EPS, "{:?}", p);
        assert!(p.offset_y + p.height <= frame_h + EPS, "{:?}", p);
        let touches_w = (p.width - frame_w).abs() < EPS;
        let touches_h = (p.height - frame_h).abs() < EPS;
        assert!(touches_w || touches_h, "{:?}", p);
    }

    #[test]
    fn test_fit_wide_image_into_tall_frame() {
        let p = fit_rect(200.0, 100.0, 100.0, 100.0).unwrap();
        assert_eq!(p.width, 100.0);
        assert!((p.height - 50.0).abs() < EPS);
        assert_eq!(p.offset_x, 0.0);
        assert!((p.offset_y - 25.0).abs() < EPS);
    }

    #[test]
    fn test_fit_square_image_into_story_frame() {
        let p = fit_rect(1024.0, 1024.0, 182.0, 132.0).unwrap();
        assert_eq!(p.height, 132.0);
        assert!((p.width - 132.0).abs() < EPS);
        assert!((p.offset_x - 25.0).abs() < EPS);
        assert_eq!(p.offset_y, 0.0);
    }

    #[test]
    fn test_fit_preserves_aspect_ratio_and_containment() {
        let sizes = [1.0, 3.0, 17.5, 100.0, 640.0, 1024.0, 4000.0];
        let frames = [(190.0, 140.0), (140.0, 190.0), (50.0, 50.0), (1.0, 300.0)];
        for &w in &sizes {
            for &h in &sizes {
                for &(fw, fh) in &frames {
                    let p = fit_rect(w, h, fw, fh).unwrap();
                    assert_contained_and_touching(p, fw, fh);
                    let ratio_in = w / h;
                    let ratio_out = p.width / p.height;
                    assert!(
                        (ratio_in - ratio_out).abs() / ratio_in < 1e-4,
                        "{}x{} in {}x{} -> {:?}",
                        w,
                        h,
                        fw,
                        fh,
                        p
                    );
                }
            }
        }
    }

    #[test]
    fn test_fit_rejects_degenerate_dimensions() {
        let bad = [0.0, -1.0, f32::NAN, f32::INFINITY];
        for &v in &bad {
            assert!(matches!(
                fit_rect(v, 10.0, 10.0, 10.0),
                Err(Error::InvalidGeometry(_))
            ));
            assert!(matches!(
                fit_rect(10.0, v, 10.0, 10.0),
                Err(Error::InvalidGeometry(_))
            ));
            assert!(matches!(
                fit_rect(10.0, 10.0, v, 10.0),
                Err(Error::InvalidGeometry(_))
            ));
            assert!(matches!(
                fit_rect(10.0, 10.0, 10.0, v),
                Err(Error::InvalidGeometry(_))
            ));
        }
    }

    #[test]
    fn test_fit_extreme_dimensions_stay_finite() {
        let p = fit_rect(f32::MIN_POSITIVE, f32::MIN_POSITIVE, 1e30, 1e30).unwrap();
        assert_eq!(p, Placement { width: 1e30, height: 1e30, offset_x: 0.0, offset_y: 0.0 });

        let cases = [
            (f32::MIN_POSITIVE, 1.0, 1e30, 1e30),
            (1.0, f32::MIN_POSITIVE, 1e30, 1e30),
            (1e30, f32::MIN_POSITIVE, 10.0, 10.0),
            (3.0, 2.0, 1e30, f32::MIN_POSITIVE),
            (f32::MAX, f32::MAX, f32::MAX, f32::MIN_POSITIVE),
        ];
        for (iw, ih, fw, fh) in cases {
            match fit_rect(iw, ih, fw, fh) {
                Ok(p) => {
                    assert!(p.width.is_finite() && p.height.is_finite(), "{:?}", p);
                    assert!(p.offset_x.is_finite() && p.offset_y.is_finite(), "{:?}", p);
                    assert!(p.offset_x >= 0.0 && p.offset_y >= 0.0, "{:?}", p);
                    assert!(p.width <= fw && p.height <= fh, "{:?}", p);
                }
                Err(e) => assert!(matches!(e, Error::InvalidGeometry(_))),
            }
        }
    }

    #[test]
    fn test_cover_rect_rejects_overflowing_scale() {
        assert!(matches!(
            cover_rect(f32::MIN_POSITIVE, 1.0, 1e30, 1.0),
            Err(Error::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_cover_rect_fills_frame() {
        let p = cover_rect(200.0, 100.0, 210.0, 210.0).unwrap();
        assert!((p.height - 210.0).abs() < EPS);
        assert!((p.width - 420.0).abs() < EPS);
        assert!((p.offset_x + 105.0).abs() < EPS);
        assert!(p.offset_y.abs() < EPS);
        assert!(matches!(
            cover_rect(0.0, 1.0, 1.0, 1.0),
            Err(Error::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_rect_helpers() {
        let r = Rect::new(10.0, 10.0, 190.0, 140.0);
        assert_eq!(r.inset(4.0), Rect::new(14.0, 14.0, 182.0, 132.0));
        assert_eq!(r.right(), 200.0);
        assert_eq!(r.bottom(), 150.0);
        assert!((mm_to_pt(25.4) - 72.0).abs() < EPS);
    }
}
