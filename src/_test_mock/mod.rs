pub mod entries;
pub mod generators;
