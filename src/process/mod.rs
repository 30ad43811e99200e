// src/process/mod.rs
//! Field-level parsing and normalisation shared by the pipeline stages.
//!
//! Every helper here is total: malformed input degrades to `None` or an empty
//! string rather than an error.

pub mod currency;
pub mod date_parser;
pub mod email;
pub mod salutation;
pub mod utils;

pub use currency::{format_cents, parse_amount_cents};
pub use date_parser::{normalize_date, parse_date, parse_datetime};
pub use email::{is_valid_email, standardize_email};
pub use salutation::normalize_salutation;
pub use utils::clean_str;
