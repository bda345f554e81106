//! Port traits for infrastructure boundaries.
//!
//! Ports exist for:
//! - Character persistence (in-memory today, a database later)
//! - The advancement workflow that confirms class-level changes
//! - Confirmation prompts before destructive conversions

mod error;
mod external;
mod repos;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::*;

// =============================================================================
// External Workflow Ports
// =============================================================================
pub use external::{AdvancementWorkflow, ConfirmationPort, WorkflowOutcome};

#[cfg(test)]
pub use external::{MockAdvancementWorkflow, MockConfirmationPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::{RepoError, WorkflowError};
