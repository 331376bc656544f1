//! High-level operations on a staged tree.

pub mod fixup;
pub mod reorganize;

pub use fixup::{default_rewriter, InstallNameTool, LoadPathRewriter, NoopRewriter};
pub use reorganize::{Plan, Reorganizer, ReorganizeReport};
