//! Infrastructure - adapters for the outbound ports.

pub mod clock;
pub mod http_client;
pub mod local_content;
pub mod storage;
