//! API Routes
//!
//! Route handlers organized by functionality.

pub mod document;
pub mod health;
pub mod oracle;
