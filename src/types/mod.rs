pub mod candidate;
pub mod screening;
pub mod sector;
pub mod series;

pub use candidate::*;
pub use screening::*;
pub use sector::*;
pub use series::*;
