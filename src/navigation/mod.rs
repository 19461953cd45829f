//! Navigation module
//!
//! Derives which navigation sections and links a user may see from their role,
//! the workspace they have open, and their subscription state.

pub mod items;
pub mod resolver;
pub mod table;

pub use items::{Icon, NavItem, Section, WORKSPACE_PLACEHOLDER};
pub use resolver::{NavigationBundle, NavigationContext, NavigationResolver};
pub use table::NavigationTable;
