pub mod auth;
pub mod bids;
pub mod disputes;
pub mod jobs;
pub mod reviews;
pub mod users;
