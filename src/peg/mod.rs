//! Level-targeting peg controller
//!
//! Pure core: every operation takes the current time and its collaborators
//! explicitly. Instruction handlers adapt on-chain accounts to the
//! collaborator traits in [`collaborators`].

pub mod collaborators;
pub mod controller;
pub mod rate_limiter;
pub mod reports;
pub mod settings;
pub mod sizer;
pub mod target;

#[cfg(test)]
pub(crate) mod mock;

pub use collaborators::*;
pub use controller::*;
pub use rate_limiter::*;
pub use reports::*;
pub use settings::*;
pub use sizer::*;
pub use target::*;
