pub mod job_detail;
pub mod results;
pub mod search;
pub mod tutorial;
