pub mod number;
pub mod risk;
pub mod tree;
pub mod weather;

pub use risk::*;
pub use tree::*;
pub use weather::*;
