//! Content models and loading

pub mod markdown;
pub mod portfolio;
pub mod post;
pub mod store;

pub use markdown::{Heading, MarkdownRenderer, RenderedBody};
pub use portfolio::Portfolio;
pub use post::{BlogIndex, Post};
pub use store::{ContentStore, StoreError};
