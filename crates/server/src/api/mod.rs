pub mod error;
pub mod handlers;
pub mod middleware;
pub mod pages;
pub mod routes;

pub use routes::create_router;
