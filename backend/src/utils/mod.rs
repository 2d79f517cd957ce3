pub mod time;
pub mod token;
pub mod uuid;

pub use time::*;
pub use token::*;
