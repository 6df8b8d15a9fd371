//! Every mutation of fleet state is one of these commands. They are what goes on the replicated
//! log, so the encoding is part of the persisted format.
mod codec;
mod command;

pub use codec::CommandDecodeError;
pub use codec::COMMAND_FORMAT_VERSION;
pub use command::FleetCommand;
