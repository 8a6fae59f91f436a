pub mod application;
pub mod middleware;
