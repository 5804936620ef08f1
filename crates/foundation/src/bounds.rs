/// Geographic extent in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl GeoBounds {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        GeoBounds {
            west,
            south,
            east,
            north,
        }
    }

    /// Smallest extent covering every finite `[lon, lat]` in `points`.
    ///
    /// Points with a NaN or infinite coordinate are skipped. Returns `None`
    /// when no finite point remains.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = [f64; 2]>,
    {
        let mut out: Option<GeoBounds> = None;
        for [lon, lat] in points {
            if !lon.is_finite() || !lat.is_finite() {
                continue;
            }
            out = Some(match out {
                None => GeoBounds::new(lon, lat, lon, lat),
                Some(b) => GeoBounds::new(
                    b.west.min(lon),
                    b.south.min(lat),
                    b.east.max(lon),
                    b.north.max(lat),
                ),
            });
        }
        out
    }

    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Grows each side by `pad` times the extent along that axis.
    pub fn padded(&self, pad: f64) -> Self {
        let dx = self.width() * pad;
        let dy = self.height() * pad;
        GeoBounds::new(
            self.west - dx,
            self.south - dy,
            self.east + dx,
            self.north + dy,
        )
    }
}
