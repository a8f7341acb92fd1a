//! Domain stores over the CMS gateway
//!
//! Each store owns one CMS endpoint and exposes the read operations the page
//! layer needs. Stores hold only a clone of the stateless gateway; there is
//! no shared mutable state across requests.

mod blog;
mod tech_stack;
mod works;

pub use blog::{BlogStore, CategoryCount};
pub use tech_stack::TechStackStore;
pub use works::WorkStore;
