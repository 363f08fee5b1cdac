pub mod response_builder;
pub mod server;

pub use response_builder::ResponseBuilder;
pub use server::{DnsServerHandler, Transport};
