pub mod manifest;
pub mod maps;
pub mod nation;

pub use manifest::*;
pub use maps::*;
pub use nation::*;
