#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
/// Errors generated specifically from this library, and not its interactions
/// with user code.
pub enum TurnstileError {
    #[error("could not parse the given string ({:?}) as an address", .0)]
    /// Generated when attempting to parse an address (during
    /// [`crate::Router::listen`]), but the address was invalid.
    InvalidAddress(String),
    #[error("could not bind to {}", .0)]
    /// Generated when the listener could not bind the requested socket,
    /// e.g. because it is already in use.
    Bind(std::net::SocketAddr, #[source] hyper::Error),
    #[error("could not serve server")]
    /// Generated when hyper fails while serving connections.
    HyperServer(#[source] hyper::Error),
    /// Generated when attempting to read the body of a request, or response,
    /// and failing.
    #[error("could not read the body of a request or response")]
    ReadBody(#[source] hyper::Error),
    /// Generated when the body of a request exceeds the limit given to the
    /// reading function.
    #[error("the body was longer than the limit of {} bytes", .0)]
    PayloadTooLarge(u64),
    /// Generated when attempting to deserialize the body of a request or
    /// response from JSON.
    #[error("could not deserialize the body of a request or response from JSON")]
    JsonDeserialization(#[source] serde_json::Error),
    /// Generated when attempting to deserialize the body of a request or
    /// response from text.
    #[error("could not deserialize the body of a request or response from utf-8")]
    TextDeserialization(#[source] std::string::FromUtf8Error),
    /// Generated when the server configuration could not be loaded from the
    /// environment.
    #[error("could not load the server configuration")]
    Config(#[source] envy::Error),
}
