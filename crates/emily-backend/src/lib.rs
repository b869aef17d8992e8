//! HTTP implementation of the admissions backend contract.

pub mod http;

pub use http::HttpAdmissionsBackend;
