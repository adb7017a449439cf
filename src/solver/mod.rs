// Solver adapters: Concrete implementations of EquationSolver

pub mod symbolic_solver;

pub use symbolic_solver::SymbolicSolver;
