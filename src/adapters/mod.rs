//! Infrastructure implementations of the `ApiClient` port.

pub mod http;
pub mod memory;
