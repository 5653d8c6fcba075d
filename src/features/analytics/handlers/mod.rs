pub mod analytics_handler;

pub use analytics_handler::analytics_summary;
