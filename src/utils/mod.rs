pub mod decimals;
pub mod mul_div;

pub use decimals::*;
pub use mul_div::*;
