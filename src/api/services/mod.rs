pub mod create;

pub use create::{CreateService, create_routes};
