pub mod actions;
pub mod captures;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod mail;
pub mod matcher;
pub mod paths;
pub mod registry;
pub mod revision;
pub mod rule;
pub mod svn;
pub mod template;

pub use error::{Result, SvnTriggerError};
