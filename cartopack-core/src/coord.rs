//! Fixed-precision geographic coordinates.
//!
//! Coordinates are stored as unsigned offsets from the south-west corner of
//! the globe in units of 10⁻⁷ degrees, which keeps encode and decode exact.

use geo::Coord;
use thiserror::Error;

const SCALE: f64 = 10_000_000.0;

/// Errors returned by [`GeoCoord::from_degrees`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordError {
    /// Latitude was not finite or fell outside `[-90, 90]`.
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    /// Longitude was not finite or fell outside `[-180, 180]`.
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A latitude/longitude pair in raw fixed-precision form.
///
/// # Examples
///
/// ```
/// use cartopack_core::GeoCoord;
///
/// # fn main() -> Result<(), cartopack_core::CoordError> {
/// let coord = GeoCoord::from_degrees(51.5, -0.1)?;
/// assert_eq!(coord.raw_lat(), 1_415_000_000);
/// assert_eq!(coord, GeoCoord::from_raw(coord.raw_lat(), coord.raw_lon()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoCoord {
    raw_lat: u32,
    raw_lon: u32,
}

impl GeoCoord {
    /// Build a coordinate from raw fixed-precision values.
    #[must_use]
    pub const fn from_raw(raw_lat: u32, raw_lon: u32) -> Self {
        Self { raw_lat, raw_lon }
    }

    /// Validate degrees and round them to the raw representation.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError`] when either value is non-finite or out of range.
    #[expect(clippy::float_arithmetic, reason = "shift degrees to unsigned offsets")]
    pub fn from_degrees(lat: f64, lon: f64) -> Result<Self, CoordError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CoordError::LatitudeOutOfRange(lat));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(CoordError::LongitudeOutOfRange(lon));
        }
        Ok(Self {
            raw_lat: to_raw(lat + 90.0),
            raw_lon: to_raw(lon + 180.0),
        })
    }

    /// Raw latitude offset.
    #[must_use]
    pub const fn raw_lat(self) -> u32 {
        self.raw_lat
    }

    /// Raw longitude offset.
    #[must_use]
    pub const fn raw_lon(self) -> u32 {
        self.raw_lon
    }

    /// Latitude in degrees.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "fixed-point to degrees conversion")]
    pub fn lat(self) -> f64 {
        f64::from(self.raw_lat) / SCALE - 90.0
    }

    /// Longitude in degrees.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "fixed-point to degrees conversion")]
    pub fn lon(self) -> f64 {
        f64::from(self.raw_lon) / SCALE - 180.0
    }
}

#[expect(clippy::float_arithmetic, reason = "degrees to fixed-point conversion")]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "validated offsets are at most 360 * 10^7, below u32::MAX"
)]
fn to_raw(offset: f64) -> u32 {
    (offset * SCALE).round() as u32
}

impl From<GeoCoord> for Coord<f64> {
    fn from(value: GeoCoord) -> Self {
        Self {
            x: value.lon(),
            y: value.lat(),
        }
    }
}
