pub mod gateway;
pub mod memory;

pub use gateway::*;
pub use memory::*;
