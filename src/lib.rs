//! yannsnote - Yann's Note content hub
//!
//! Content catalog, admin activity log, client-side session and
//! generative-AI study tools for students and entrepreneurs.
//!
//! # Architecture
//!
//! Persistence is simulated:
//! - The content catalog is an in-memory list with artificial latency
//! - The activity log is a capped JSON array in local storage
//! - The session is a JSON user record in local storage
//!
//! AI calls go to a remote generative model and degrade to French
//! fallback messages instead of failing.
//!
//! # Modules
//!
//! - `storage`: Key/value local storage (file-backed or in memory)
//! - `db`: Database facade (`sql` content store, `nosql` activity log)
//! - `auth`: Session context, role-based page access, admin credentials
//! - `ai`: Generative model trait, Gemini client, AI service
//! - `admin`: Admin dashboard operations
//! - `domain`: Data structures (ContentItem, ActivityLog, User, ChatMessage)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! yannsnote content list --category audio
//!
//! # Log in as admin and open the dashboard
//! yannsnote admin-login admin admin
//! yannsnote admin
//!
//! # Ask the Digital Brain
//! yannsnote chat "Qu'est-ce que l'OHADA ?"
//! ```

pub mod admin;
pub mod ai;
pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod storage;

// Re-export main types at crate root for convenience
pub use admin::{AdminDashboard, AdminError, PublishRequest};
pub use ai::{AiError, AiService, GeminiClient, GenerativeModel};
pub use auth::{Access, AccessGuard, AuthContext, AuthError, Page};
pub use db::{ActivityLogStore, ContentStore, Database, DatabaseOptions};
pub use domain::{ActivityLog, ContentCategory, ContentItem, User, UserRole};
pub use storage::{FileStorage, LocalStorage, MemoryStorage, StorageError};
