// Destination registry and combined index resolution

pub mod manager;

pub use manager::{AddressedDestination, DestinationOrigin, DestinationRegistry, DESTINATIONS_NAMESPACE};
