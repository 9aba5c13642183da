pub mod affiliate;
pub mod auth;
pub mod catalog;
pub mod order;
pub mod status;

pub use affiliate::*;
pub use auth::*;
pub use catalog::*;
pub use order::*;
pub use status::*;
