use foundation::Viewport;

/// Latitude limit of the Web Mercator map.
pub const MAX_LATITUDE: f64 = 85.051_129;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ViewportEventKind {
    Pan,
    Zoom,
    Pinch,
}

/// Viewport-change notification carrying the requested view.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportEvent {
    pub kind: ViewportEventKind,
    pub viewport: Viewport,
}

impl ViewportEvent {
    pub fn pan(viewport: Viewport) -> Self {
        Self {
            kind: ViewportEventKind::Pan,
            viewport,
        }
    }

    pub fn zoom(viewport: Viewport) -> Self {
        Self {
            kind: ViewportEventKind::Zoom,
            viewport,
        }
    }

    pub fn pinch(viewport: Viewport) -> Self {
        Self {
            kind: ViewportEventKind::Pinch,
            viewport,
        }
    }
}

/// Map camera with the default event handling: zoom clamped to its range,
/// latitude clamped to the map, longitude wrapped.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    viewport: Viewport,
    min_zoom: f64,
    max_zoom: f64,
}

impl Camera {
    pub fn new(initial: Viewport, min_zoom: f64, max_zoom: f64) -> Self {
        let (min_zoom, max_zoom) = if min_zoom <= max_zoom {
            (min_zoom, max_zoom)
        } else {
            (max_zoom, min_zoom)
        };
        let mut camera = Self {
            viewport: initial,
            min_zoom,
            max_zoom,
        };
        camera.viewport = camera.constrain(initial);
        camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn zoom_range(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    pub fn handle(&mut self, event: &ViewportEvent) -> Viewport {
        self.viewport = self.constrain(event.viewport);
        self.viewport
    }

    fn constrain(&self, v: Viewport) -> Viewport {
        if !v.is_finite() {
            return self.viewport;
        }
        Viewport::new(
            v.latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE),
            wrap_longitude(v.longitude),
            v.zoom.clamp(self.min_zoom, self.max_zoom),
        )
    }
}

/// In-range longitudes pass through untouched.
fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Viewport::default(), 7.0, 15.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{Camera, MAX_LATITUDE, ViewportEvent};
    use foundation::Viewport;

    #[test]
    fn zoom_is_clamped_to_range() {
        let mut cam = Camera::default();
        let v = cam.handle(&ViewportEvent::zoom(Viewport::new(55.6, 12.6, 22.0)));
        assert_eq!(v.zoom, 15.0);
        let v = cam.handle(&ViewportEvent::pinch(Viewport::new(55.6, 12.6, 1.0)));
        assert_eq!(v.zoom, 7.0);
    }

    #[test]
    fn pan_wraps_longitude_and_clamps_latitude() {
        let mut cam = Camera::default();
        let v = cam.handle(&ViewportEvent::pan(Viewport::new(89.0, 190.0, 10.0)));
        assert_eq!(v.latitude, MAX_LATITUDE);
        assert!((v.longitude - (-170.0)).abs() < 1e-9);
    }

    #[test]
    fn in_range_position_is_kept_exactly() {
        let mut cam = Camera::default();
        assert_eq!(cam.viewport(), Viewport::new(55.6, 12.6, 10.0));

        let v = cam.handle(&ViewportEvent::pan(Viewport::new(-33.87, -151.21, 9.0)));
        assert_eq!(v.longitude.to_bits(), (-151.21f64).to_bits());
        assert_eq!(v.latitude.to_bits(), (-33.87f64).to_bits());

        let v = cam.handle(&ViewportEvent::pan(Viewport::new(0.0, 180.0, 9.0)));
        assert_eq!(v.longitude, 180.0);
    }

    #[test]
    fn non_finite_events_keep_previous_view() {
        let mut cam = Camera::default();
        let before = cam.viewport();
        let v = cam.handle(&ViewportEvent::pan(Viewport::new(f64::NAN, 0.0, 10.0)));
        assert_eq!(v, before);
    }

    #[test]
    fn swapped_zoom_bounds_are_normalized() {
        let cam = Camera::new(Viewport::new(0.0, 0.0, 3.0), 15.0, 7.0);
        assert_eq!(cam.zoom_range(), (7.0, 15.0));
        assert_eq!(cam.viewport().zoom, 7.0);
    }
}
