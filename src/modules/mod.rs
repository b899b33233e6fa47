pub mod analysis;
pub mod memory;
pub mod mood;
pub mod orchestrator;
pub mod persona;
pub mod relationship;
