pub mod definition;
pub mod normalize;
pub mod raw;

pub use definition::*;
pub use normalize::*;
pub use raw::RawGraph;
