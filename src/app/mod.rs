pub mod service;

pub use service::{ProjectDetails, ProjectService, Submission};
