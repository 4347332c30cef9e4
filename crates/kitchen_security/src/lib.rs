//! Input sanitization and validation.
//!
//! Every client-supplied string passes through here before it is woven into a
//! prompt or forwarded upstream. Lists and titles that exceed their ceilings
//! are rejected; free-text prompts, diets and individual ingredients are
//! truncated instead.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod limits;
mod sanitize;
mod validator;

pub use limits::{ALLOWED_IMAGE_MIME_TYPES, InputLimits};
pub use sanitize::{sanitize_text, truncate_chars};
pub use validator::{ImageSubject, ImageUpload, InputValidator};
