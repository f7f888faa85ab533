//! Variables module
//!
//! Placeholder interpolation against JSON data contexts, the escape functions
//! it can apply, and the formatter that turns raw user input into a typed value.

pub mod escape;
pub mod input;
pub mod interpolate;
pub mod path;

pub use escape::EscapeFn;
pub use input::{format_input, InputKind};
pub use interpolate::{interpolate, Interpolator, MissingPolicy};
pub use path::{resolve_path, PathSegment};
