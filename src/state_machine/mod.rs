//! The fleet's replicated state machine: the store, the rules guarding it, and the apply engine
//! that is the only writer of the store.
mod apply;
mod error;
mod reader;
mod store;
mod validate;

pub use apply::Applied;
pub use apply::ApplyOutput;
pub use apply::FleetStateMachine;
pub use error::ValidationError;
pub use reader::FleetReader;
pub use store::FleetStore;
pub use store::InvariantViolation;
