//! Auth-domain identifiers, scope sets, roles, and token models.

pub mod id;
pub mod role;
pub mod scope;
pub mod token;

pub use id::*;
pub use role::*;
pub use scope::*;
pub use token::{record::*, secret::*};
