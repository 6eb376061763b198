pub mod biddtos;
pub mod disputedtos;
pub mod jobdtos;
pub mod reviewdtos;
pub mod userdtos;
