//! Form Mode Handler (C9): field validation and form submission, both of
//! which bypass the LLM entirely.

pub mod handler;
pub mod priority;
pub mod store;
pub mod validation;

pub use handler::{handle_submit_form, handle_validate_field, SubmitFormResult, ValidateFieldResult};
pub use priority::determine_priority;
pub use store::{init_submissions_db, save_best_effort, SqliteSubmissionStore, SubmissionStore};
pub use validation::{validate_field, ValidationError};
