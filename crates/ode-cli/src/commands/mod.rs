//! CLI command implementations

pub mod run;
pub mod deploy;
pub mod delete;
pub mod list;

// Export command functions with clear names
pub use run::execute as execute_run;
pub use deploy::execute as execute_deploy;
pub use delete::execute as execute_delete;
pub use list::execute as execute_list;
