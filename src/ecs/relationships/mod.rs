pub mod diplomacy;

pub use diplomacy::{Diplomacy, Stance};
