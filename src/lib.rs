pub mod aggregators;
pub mod campaigns;
pub mod config;
pub mod date_range;
pub mod error;
pub mod export;
pub mod handlers;
pub mod mock_data;
pub mod models;
pub mod orchestrator;
pub mod source;

pub use handlers::AppState;
