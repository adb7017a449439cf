// Domain module: Business logic and models

pub mod chat_service;
pub mod models;
pub mod preview_service;
pub mod solver_service;
pub mod value_objects;

pub use chat_service::{ChatError, ChatProvider};
pub use models::*;
pub use preview_service::{TabularParser, UploadError, DEFAULT_PREVIEW_ROWS};
pub use solver_service::{EquationSide, EquationSolver, SolveError, SOLVE_VARIABLE};
pub use value_objects::*;
