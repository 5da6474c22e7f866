mod events;
mod inventory;
mod loadout;
mod persist;
mod registry;
mod roster;
mod sync;
mod system;

pub use events::*;
pub use inventory::*;
pub use loadout::*;
pub use persist::*;
pub use registry::*;
pub use roster::*;
pub use sync::*;
pub use system::*;
