pub mod id;
pub mod profile_id;

pub use id::*;
pub use profile_id::ProfileId;
