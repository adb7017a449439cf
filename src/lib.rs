// Symbolic engine: parsing and exact root finding over the rationals
pub mod symbolic;

// Domain layer: Business logic and rules
pub mod domain;

// Solver adapters: Concrete implementations of EquationSolver
pub mod solver;

// Application layer: HTTP handlers and DTO mapping
#[cfg(feature = "server")]
pub mod application;

// Infrastructure layer: External concerns (config, HTTP server, adapters)
#[cfg(feature = "server")]
pub mod infrastructure;

// Re-export commonly used types
pub use domain::{
    ChatError, ChatMessage, ChatProvider, ChatRole, Conversation, EquationSolver, SolutionSet,
    SolveError, TabularFormat, TabularParser, TabularPreview, UploadError,
};

pub use solver::SymbolicSolver;

#[cfg(feature = "server")]
pub use application::AppState;

#[cfg(feature = "server")]
pub use infrastructure::{build_router, start_server, AppConfig, OpenAiChatProvider, ServerConfig};
