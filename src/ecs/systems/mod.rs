pub mod capture;
pub mod domination;
