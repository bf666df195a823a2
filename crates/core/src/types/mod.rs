pub mod invocation;
pub mod project_root;

// Re-export commonly used types
pub use invocation::Invocation;
pub use project_root::{FALLBACK_ROOT, ProjectRoot, RootSource};
