//! Geocoding and great-circle distance.
//!
//! [`GeoResolver`] turns free-text locations into [`GeoPoint`](crate::types::GeoPoint)s
//! on a best-effort basis; [`distance_km`] scores how far a resolved point is
//! from a caller's reference location.

pub mod distance;
pub mod resolver;

pub use distance::{distance_km, EARTH_RADIUS_KM};
pub use resolver::{DisabledResolver, GeoResolver, NominatimResolver};
