pub mod initialize_peg_engine;
pub mod maintain_peg;
pub mod manual_intervention;
pub mod peg_adapters;
pub mod peg_engine_admin_operations;
pub mod role_operations;
pub mod views;

pub use initialize_peg_engine::*;
pub use maintain_peg::*;
pub use manual_intervention::*;
pub use peg_adapters::*;
pub use peg_engine_admin_operations::*;
pub use role_operations::*;
pub use views::*;
