//! SheetBldr Engine library.
//!
//! Orchestrates the domain's sheet pipeline over persistence and workflow ports.
//!
//! ## Structure
//!
//! - `use_cases/` - Import, sheet preparation, resources, advancement, currency
//! - `infrastructure/` - Ports plus the in-memory, file, and headless adapters
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
