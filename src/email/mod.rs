pub mod client;
pub mod template;

pub use client::EmailClient;
pub use template::{build_result_email, vsl_url, ResultEmail, ResultEmailData};
