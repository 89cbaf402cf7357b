//! Dependency injection infrastructure.
//!
//! Services declare the dependencies they need as plain fields and resolve
//! them from the root [`Context`](crate::context::Context) through
//! [`FromRef`], with the derives from `di-macros`:
//!
//! - `#[derive(Context)]`: makes each field of the context extractable
//! - `#[derive(FromContext)]`: builds a service by resolving each of its fields
//!
//! # Example
//!
//! ```ignore
//! #[derive(FromContext, Clone)]
//! pub struct TrainingService {
//!     db: Database,
//!     model: ModelHandle,
//! }
//!
//! let service = TrainingService::from_ref(&ctx);
//! ```

/// Trait for extracting a value from a reference to another type.
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

/// Blanket implementation: any Clone type can be extracted from itself.
impl<T: Clone> FromRef<T> for T {
    fn from_ref(input: &T) -> Self {
        input.clone()
    }
}

pub use di_macros::{Context, FromContext};
