//! Server-state caching and write coordination.
//!
//! The [`QueryClient`] owns one cache entry per [`QueryKey`]; pages
//! observe entries through [`QueryObserver`] handles and writes go
//! through [`Mutation`], which invalidates the keys it declares.

mod cache;
mod key;
mod mutation;

pub use cache::{QueryClient, QueryObserver, QueryOptions, QuerySnapshot, QueryStatus};
pub use key::{KeyFilter, KeyPart, QueryKey};
pub use mutation::{Mutation, MutationBuilder, MutationError, MutationState, MutationStatus};
