pub mod action;
pub mod engine;
pub mod error;
pub mod plant;
pub mod player;
pub mod snapshot;
pub mod statistics;

pub use action::{Action, ActionOutcome};
pub use engine::FarmEngine;
pub use error::FarmError;
pub use plant::{CropYield, Plant, Species};
