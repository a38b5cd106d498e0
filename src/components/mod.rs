pub mod panels;
pub mod topology;
