//! Classification-and-notification pipeline.
//!
//! Accepts text or image submissions, classifies them via the configured
//! LLM provider (with a deterministic heuristic fallback), persists the
//! result and dispatches best-effort alerts for unsafe content.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/moderate/text` | Classify a text submission |
//! | POST | `/moderate/image` | Classify an image submission |

pub mod clients;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{ClassificationService, ModerationService, NotificationService};
