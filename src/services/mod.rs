// Service exports
pub mod directory;
pub mod geocoder;

pub use directory::{ChefDirectoryClient, DirectoryError};
pub use geocoder::{
    Clock, GeocodeCandidate, GeocodeError, GeocodeTransport, Geocoder, HttpGeocodeTransport,
    RetryPolicy, TokioClock,
};
