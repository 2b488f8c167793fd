pub mod operation_record;
pub mod peg_engine_state;
pub mod price_path;
pub mod roles;
pub mod targeting_config;

pub use operation_record::*;
pub use peg_engine_state::*;
pub use price_path::*;
pub use roles::*;
pub use targeting_config::*;
