/// Geographic bounding box in WGS84 degrees.
///
/// The persisted form is the `;`-separated `min_lat;min_lon;max_lat;max_lon`
/// string used by the saved download-area preference.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    min_lat: f64,
    min_lon: f64,
    max_lat: f64,
    max_lon: f64,
}

impl Bounds {
    /// Returns `None` when the corners are out of world range, inverted, or
    /// not finite.
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Option<Self> {
        let finite = [min_lat, min_lon, max_lat, max_lon]
            .iter()
            .all(|v| v.is_finite());
        let in_range = (-90.0..=90.0).contains(&min_lat)
            && (-90.0..=90.0).contains(&max_lat)
            && (-180.0..=180.0).contains(&min_lon)
            && (-180.0..=180.0).contains(&max_lon);
        if !finite || !in_range || min_lat > max_lat || min_lon > max_lon {
            return None;
        }
        Some(Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        })
    }

    /// Zero-area bounds at the origin, used when an Overpass query does not
    /// reference the selected area.
    pub fn collapsed() -> Self {
        Self {
            min_lat: 0.0,
            min_lon: 0.0,
            max_lat: 0.0,
            max_lon: 0.0,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.min_lat == self.max_lat && self.min_lon == self.max_lon
    }

    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }

    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }

    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }

    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }

    /// Grows these bounds to also cover `other`. Commutative, so the union of
    /// several download results does not depend on completion order.
    pub fn extend(&mut self, other: &Bounds) {
        self.min_lat = self.min_lat.min(other.min_lat);
        self.min_lon = self.min_lon.min(other.min_lon);
        self.max_lat = self.max_lat.max(other.max_lat);
        self.max_lon = self.max_lon.max(other.max_lon);
    }

    pub fn encode(&self) -> String {
        format!(
            "{};{};{};{}",
            self.min_lat, self.min_lon, self.max_lat, self.max_lon
        )
    }

    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.split(';');
        let min_lat = parts.next()?.trim().parse::<f64>().ok()?;
        let min_lon = parts.next()?.trim().parse::<f64>().ok()?;
        let max_lat = parts.next()?.trim().parse::<f64>().ok()?;
        let max_lon = parts.next()?.trim().parse::<f64>().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Self::new(min_lat, min_lon, max_lat, max_lon)
    }
}
