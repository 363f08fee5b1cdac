//! Builds wire responses for the authoritative server.

use flatboat_domain::{DomainError, Resolution};
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};

/// Largest UDP response sent without EDNS negotiation.
pub const MAX_UDP_PAYLOAD: usize = 512;

pub struct ResponseBuilder;

impl ResponseBuilder {
    /// Authoritative answer carrying `resolution`, echoing the request's
    /// question section.
    pub fn answer(request: &Message, resolution: &Resolution) -> Message {
        let mut response = Self::header_only(request, resolution.status.into());
        response.add_answers(resolution.answers.iter().cloned());
        response.add_authorities(resolution.authority.iter().cloned());
        response
    }

    /// Header and question only, with `code` set.
    pub fn error(request: &Message, code: ResponseCode) -> Message {
        Self::header_only(request, code)
    }

    /// Empty reply with TC set, telling the client to retry over TCP.
    pub fn truncated(request: &Message, resolution: &Resolution) -> Message {
        let mut response = Self::header_only(request, resolution.status.into());
        response.metadata.truncation = true;
        response
    }

    fn header_only(request: &Message, code: ResponseCode) -> Message {
        let mut response = Message::new(request.id, MessageType::Response, request.op_code);
        response.metadata.authoritative = true;
        response.metadata.recursion_desired = request.recursion_desired;
        response.metadata.recursion_available = false;
        response.metadata.response_code = code;
        response.add_queries(request.queries.iter().cloned());
        response
    }

    pub fn serialize(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(MAX_UDP_PAYLOAD);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::IoError(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}
