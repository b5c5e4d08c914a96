//! # ghrest-git
//!
//! Git operations used by GitHub Actions workflows: identity setup,
//! branch juggling between code branches and `gh-pages`, committing
//! generated reports and pushing them with a fallback branch.

mod branch;
mod error;
mod identity;
mod repository;

pub use branch::{DEFAULT_TEMP_BRANCH_PREFIX, default_temp_branch_name, temp_branch_name};
pub use error::{Error, Result};
pub use identity::configure_identity;
pub use repository::Repository;

// Re-export git2 types that callers need
pub use git2::Oid;
