pub mod error;
pub mod router;
pub mod routes;
pub mod server;
pub mod types;

pub use error::*;
pub use router::*;
pub use server::*;
pub use types::*;
