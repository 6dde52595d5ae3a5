//! Shared string and formatting helpers.

pub mod string_utils;

pub use string_utils::{
    brief_summary, interpolate_only, sanitize_destination, strip_code_fences, InterpolationError,
};
