// Application layer: HTTP handlers, wire types and error mapping

pub mod dto;
pub mod error;
pub mod http_service;
pub mod mappers;

pub use error::{ApiError, ProblemDetails};
pub use http_service::{routes, AppState};
