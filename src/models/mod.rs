pub mod bidmodel;
pub mod disputemodel;
pub mod jobmodel;
pub mod reviewmodel;
pub mod usermodel;
