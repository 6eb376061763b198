pub mod biddb;
pub mod db;
pub mod disputedb;
pub mod jobdb;
pub mod reviewdb;
pub mod userdb;
