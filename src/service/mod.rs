pub mod bid_service;
pub mod dispute_service;
pub mod error;
pub mod event_service;
pub mod job_service;
pub mod media_service;
pub mod review_service;
