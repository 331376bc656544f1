//! Core types: the install environment, the product, and layout
//! classification. Nothing here mutates the filesystem.

pub mod env;
pub mod layout;
pub mod product;

pub use env::{EnvError, InstallEnv};
pub use layout::{classify, headers_destination, LayoutProbe, Strategy};
pub use product::{HostPlatform, Product};
