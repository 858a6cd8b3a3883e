//! Error taxonomy of the gateway client.
//!
//! Validation failures are the only kind raised before a request is built;
//! everything else describes the fate of a dispatched call. None of these
//! are retried or suppressed; they all surface to the caller.

/// Result type carrying an [`error_stack::Report`] context.
pub type CustomResult<T, E> = error_stack::Result<T, E>;

/// Failures raised while assembling order data, before any network traffic.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid currency provided.")]
    InvalidCurrency,
}

/// Failure contract of the transport collaborator.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TransportError {
    /// The endpoint could not be reached or did not produce a usable reply.
    #[error("failed to reach the gateway endpoint")]
    ConnectionFailed,
    /// The reply was not a well-formed SOAP envelope.
    #[error("the gateway reply is not a usable SOAP envelope")]
    MalformedEnvelope,
    /// The envelope lacked the namespaced return element for this call.
    #[error("no {0} element found in the SOAP envelope")]
    MissingReturnElement(&'static str),
}

/// Everything a gateway operation can surface to the caller.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OperationError {
    /// Payment data failed validation; no request was sent.
    #[error("payment data failed validation")]
    Validation,
    /// The composed fragment could not be normalized for signing.
    #[error("failed to encode the request fragment")]
    RequestEncoding,
    /// The gateway answered with a non-zero result code.
    #[error("GlobalPagamentos returned the error {code}.")]
    Gateway { code: String },
    /// The response document is not well-formed XML.
    #[error("the gateway response is not well-formed XML")]
    MalformedResponse,
    /// A mandatory node is absent from the response document.
    #[error("no {node} node found in the gateway response")]
    MissingNode { node: &'static str },
    /// The consultation reply carried a message node without content.
    #[error("no response message found in the consultation reply")]
    EmptyConsultMessage,
    /// The transport collaborator failed; details are attached to the report.
    #[error("transport failure while calling the gateway")]
    Transport,
}
