use flatboat_application::ports::AuditSink;
use flatboat_application::use_cases::ResolveQueryUseCase;
use flatboat_domain::{AuditEntry, DnsQuery, Resolution, Zone};
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::response_builder::{ResponseBuilder, MAX_UDP_PAYLOAD};

/// Transport a query arrived on. UDP answers are capped in size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Udp,
    Tcp,
}

/// Turns raw DNS packets into raw DNS responses.
///
/// Every answered query that names a subdomain is queued on the audit sink;
/// logging failures never affect the reply.
#[derive(Clone)]
pub struct DnsServerHandler {
    resolve: Arc<ResolveQueryUseCase>,
    zone: Arc<Zone>,
    audit: Option<Arc<dyn AuditSink>>,
    host: Arc<str>,
}

impl DnsServerHandler {
    pub fn new(resolve: Arc<ResolveQueryUseCase>, zone: Arc<Zone>) -> Self {
        Self {
            resolve,
            zone,
            audit: None,
            host: Arc::from(""),
        }
    }

    /// Enables request logging; `host` identifies this node in the log.
    pub fn with_audit(mut self, sink: Arc<dyn AuditSink>, host: impl Into<Arc<str>>) -> Self {
        self.audit = Some(sink);
        self.host = host.into();
        self
    }

    /// Handles one packet. Returns `None` when nothing should be sent back,
    /// e.g. for unparsable packets or stray responses.
    pub async fn handle_raw(
        &self,
        packet: &[u8],
        src: SocketAddr,
        transport: Transport,
    ) -> Option<Vec<u8>> {
        let request = match Message::from_vec(packet) {
            Ok(message) => message,
            Err(e) => {
                debug!(client = %src.ip(), error = %e, "Dropping unparsable packet");
                return None;
            }
        };

        if request.message_type != MessageType::Query {
            return None;
        }

        if request.op_code != OpCode::Query {
            debug!(client = %src.ip(), op_code = ?request.op_code, "Unsupported opcode");
            return Self::encode(&ResponseBuilder::error(&request, ResponseCode::NotImp));
        }

        let Some(question) = request.queries.first() else {
            warn!(client = %src.ip(), "Query without a question");
            return Self::encode(&ResponseBuilder::error(&request, ResponseCode::FormErr));
        };

        let query = DnsQuery::new(&question.name.to_ascii(), question.query_type);
        let resolution = self.resolve.execute(&query).await;

        info!(
            domain = %query.domain,
            record_type = %query.record_type,
            client = %src.ip(),
            status = ?resolution.status,
            answers = resolution.answers.len(),
            "DNS query answered"
        );

        let bytes = self.respond(&request, &resolution, transport)?;
        self.audit(&query, packet, &bytes, src);
        Some(bytes)
    }

    fn respond(
        &self,
        request: &Message,
        resolution: &Resolution,
        transport: Transport,
    ) -> Option<Vec<u8>> {
        let bytes = match ResponseBuilder::serialize(&ResponseBuilder::answer(request, resolution)) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, "Failed to encode response");
                return Self::encode(&ResponseBuilder::error(request, ResponseCode::ServFail));
            }
        };

        if transport == Transport::Udp && bytes.len() > MAX_UDP_PAYLOAD {
            debug!(size = bytes.len(), "Response truncated for UDP");
            return Self::encode(&ResponseBuilder::truncated(request, resolution));
        }

        Some(bytes)
    }

    fn encode(message: &Message) -> Option<Vec<u8>> {
        match ResponseBuilder::serialize(message) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                error!(error = %e, "Failed to encode response");
                None
            }
        }
    }

    fn audit(&self, query: &DnsQuery, request: &[u8], response: &[u8], src: SocketAddr) {
        let Some(sink) = &self.audit else {
            return;
        };
        let Some(subdomain) = self.zone.subdomain_of(&query.domain) else {
            return;
        };

        let entry = AuditEntry {
            name: query.domain.to_string(),
            subdomain,
            request: request.to_vec(),
            response: response.to_vec(),
            src_ip: src.ip(),
            src_host: self.host.to_string(),
        };

        if let Err(e) = sink.record(entry) {
            warn!(domain = %query.domain, error = %e, "Failed to record request");
        }
    }
}
