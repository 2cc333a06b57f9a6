//! HTTP protocol layer module
//!
//! Request reading and protocol-level responses, decoupled from the
//! endpoint logic.

pub mod mime;
pub mod request;
pub mod response;

pub use request::{is_form_body, query_value, read_body, BodyError, FormData};
pub use response::{build_404_response, build_file_response, build_redirect_response};
