pub mod generate;
pub mod info;
pub mod solve;

pub use generate::*;
pub use info::*;
pub use solve::*;
