/// Camera view as reported by the map collaborator.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
}

impl Viewport {
    pub const fn new(latitude: f64, longitude: f64, zoom: f64) -> Self {
        Self {
            latitude,
            longitude,
            zoom,
        }
    }

    /// Integer zoom level; negative and non-finite zoom collapse to 0.
    pub fn zoom_level(&self) -> u32 {
        if self.zoom.is_finite() && self.zoom > 0.0 {
            self.zoom.floor() as u32
        } else {
            0
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite() && self.zoom.is_finite()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(55.6, 12.6, 10.0)
    }
}
