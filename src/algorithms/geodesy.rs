//! Geodetic helpers for annotation placement
//!
//! Distances between device and anchor use a spherical great-circle model for
//! the horizontal component combined with the altitude difference. Local
//! translations use WGS84 radii of curvature at the origin latitude, which is
//! accurate to a few centimeters over the few kilometers an AR view spans.

use crate::core::{
    GeoCoordinate, LocationTranslation, EARTH_MEAN_RADIUS_M, EARTH_RADIUS_WGS84,
    ECCENTRICITY_SQUARED_WGS84,
};
use crate::validation::AnnotationError;

impl GeoCoordinate {
    /// Great-circle distance along the surface in meters, ignoring altitude
    pub fn surface_distance_to(&self, other: &GeoCoordinate) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = lat2 - lat1;
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        // Rounding can push `a` just past 1 near antipodal points
        let a = a.min(1.0);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_MEAN_RADIUS_M * c
    }

    /// 3D distance in meters: surface distance combined with the altitude difference
    pub fn distance_to(&self, other: &GeoCoordinate) -> f64 {
        let surface = self.surface_distance_to(other);
        let vertical = other.altitude - self.altitude;
        (surface * surface + vertical * vertical).sqrt()
    }

    /// East/North/Up offset from `self` to `other` in meters
    pub fn translation_to(&self, other: &GeoCoordinate) -> LocationTranslation {
        let (meridional, normal) = radii_of_curvature(self.latitude);
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = wrap_longitude(other.longitude - self.longitude).to_radians();

        LocationTranslation {
            east: normal * self.latitude.to_radians().cos() * d_lon,
            north: meridional * d_lat,
            up: other.altitude - self.altitude,
        }
    }

    /// Coordinate reached by moving `translation` meters from `self`
    pub fn translated(&self, translation: &LocationTranslation) -> GeoCoordinate {
        let (meridional, normal) = radii_of_curvature(self.latitude);
        let lat_diff = translation.north / meridional;
        let lon_diff = translation.east / (normal * self.latitude.to_radians().cos());

        GeoCoordinate {
            latitude: self.latitude + lat_diff.to_degrees(),
            longitude: wrap_longitude(self.longitude + lon_diff.to_degrees()),
            altitude: self.altitude + translation.up,
        }
    }
}

/// Meridional (M) and prime-vertical (N) radii of curvature at `latitude` degrees
fn radii_of_curvature(latitude: f64) -> (f64, f64) {
    let sin_lat = latitude.to_radians().sin();
    let denom = 1.0 - ECCENTRICITY_SQUARED_WGS84 * sin_lat * sin_lat;

    let normal = EARTH_RADIUS_WGS84 / denom.sqrt();
    let meridional = EARTH_RADIUS_WGS84 * (1.0 - ECCENTRICITY_SQUARED_WGS84) / denom.powf(1.5);

    (meridional, normal)
}

fn wrap_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid maps +180 to -180; keep the input sign at the antimeridian
    if wrapped == -180.0 && lon > 0.0 {
        180.0
    } else {
        wrapped
    }
}

/// Coordinate validation utilities
pub struct CoordinateValidator;

impl CoordinateValidator {
    /// Validate WGS84 geodetic coordinates
    pub fn validate(coordinate: &GeoCoordinate) -> Result<(), AnnotationError> {
        let reason = if !coordinate.latitude.is_finite() || coordinate.latitude.abs() > 90.0 {
            Some("latitude must be between -90 and 90 degrees")
        } else if !coordinate.longitude.is_finite() || coordinate.longitude.abs() > 180.0 {
            Some("longitude must be between -180 and 180 degrees")
        } else if !coordinate.altitude.is_finite() {
            Some("altitude must be finite")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(AnnotationError::InvalidCoordinate {
                latitude: coordinate.latitude,
                longitude: coordinate.longitude,
                altitude: coordinate.altitude,
                reason,
            }),
            None => Ok(()),
        }
    }

    /// Validate a GPS accuracy estimate
    pub fn validate_accuracy(value: f64) -> Result<(), AnnotationError> {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(AnnotationError::InvalidAccuracy { value })
        }
    }
}
