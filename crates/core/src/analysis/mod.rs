pub mod requests;
pub mod service;

pub use requests::AnalysisRequest;
pub use service::{AnalysisService, AnalysisSource};
