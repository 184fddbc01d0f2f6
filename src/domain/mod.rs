//! Domain types for Yann's Note.
//!
//! This module contains the core data structures:
//! - Content: Catalog items published by the admin
//! - Activity: Admin activity log entries
//! - User: Client-side session and roles
//! - Chat: Digital Brain conversation turns
//! - Pricing: Offers and contact constants

pub mod activity;
pub mod chat;
pub mod content;
pub mod pricing;
pub mod user;

// Re-export commonly used types
pub use activity::{actions, ActivityLog};
pub use chat::{ChatMessage, ChatRole};
pub use content::{seed_content, ContentCategory, ContentItem};
pub use pricing::{Offer, PricingPlan, PRICING};
pub use user::{User, UserRole};
