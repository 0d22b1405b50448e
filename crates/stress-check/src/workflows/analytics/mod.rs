//! Admin-only analytics over persisted responses.

pub mod auth;
pub mod router;
pub mod summary;

pub use auth::{hash_password, AdminGate, AdminToken, AuthError};
pub use router::{admin_router, LoginRequest, EXPORT_FILENAME};
pub use summary::{AnalyticsSummary, LevelCount, ScoreBucket, EMPTY_MESSAGE};
