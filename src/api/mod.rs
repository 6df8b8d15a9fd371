//! This mod holds the code for creating and configuring a fleet node.
mod options;
mod wiring;

pub use options::FleetOptions;
pub use wiring::try_create_fleet_node;
pub use wiring::FleetNode;
pub use wiring::FleetNodeConfig;
pub use wiring::FleetNodeCreationError;
pub use wiring::FleetPipeline;
