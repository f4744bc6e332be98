pub mod availability;
pub mod date_mapper;
pub mod init;
pub mod overflow;
pub mod palette;
pub mod projector;
pub mod scheduler_api;
pub mod session;
pub mod state;
pub mod submission;
