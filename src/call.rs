//! Call identity: call type plus service/method names.

use std::fmt;

use tracing::trace;

/// Fallback service/method name used when a method path is malformed.
pub const UNKNOWN: &str = "unknown";

/// Shape of an RPC, as seen by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallType {
    Unary,
    ClientStream,
    ServerStream,
    BidiStream,
}

impl CallType {
    /// All call types, in label order.
    pub const ALL: [CallType; 4] = [
        CallType::Unary,
        CallType::ClientStream,
        CallType::ServerStream,
        CallType::BidiStream,
    ];

    /// Derive the call type from the method's streaming flags.
    pub fn from_streaming(client_streaming: bool, server_streaming: bool) -> Self {
        match (client_streaming, server_streaming) {
            (false, false) => CallType::Unary,
            (true, false) => CallType::ClientStream,
            (false, true) => CallType::ServerStream,
            (true, true) => CallType::BidiStream,
        }
    }

    /// Stable label value for the `grpc_type` label.
    pub fn as_str(&self) -> &'static str {
        match self {
            CallType::Unary => "unary",
            CallType::ClientStream => "client_stream",
            CallType::ServerStream => "server_stream",
            CallType::BidiStream => "bidi_stream",
        }
    }
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service and method extracted from a `/<service>/<method>` path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodName {
    pub service: String,
    pub method: String,
}

impl MethodName {
    /// Split a fully-qualified method path.
    ///
    /// The leading `/` is optional. Anything that does not split into
    /// exactly two non-empty components yields [`UNKNOWN`] for both parts.
    pub fn parse(full_method: &str) -> Self {
        let trimmed = full_method.strip_prefix('/').unwrap_or(full_method);
        match trimmed.split_once('/') {
            Some((service, method))
                if !service.is_empty() && !method.is_empty() && !method.contains('/') =>
            {
                Self {
                    service: service.to_owned(),
                    method: method.to_owned(),
                }
            }
            _ => {
                trace!(path = full_method, "malformed method path, using fallback identity");
                Self::unknown()
            }
        }
    }

    /// The fallback identity for malformed paths.
    pub fn unknown() -> Self {
        Self {
            service: UNKNOWN.to_owned(),
            method: UNKNOWN.to_owned(),
        }
    }
}

impl fmt::Display for MethodName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.service, self.method)
    }
}

/// The `(call type, service, method)` triple a call's series are keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallIdentity {
    pub call_type: CallType,
    pub name: MethodName,
}

impl CallIdentity {
    pub fn new(call_type: CallType, full_method: &str) -> Self {
        Self {
            call_type,
            name: MethodName::parse(full_method),
        }
    }
}
