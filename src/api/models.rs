/// Comprehensive error type for upstream exchange calls
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// 400 Bad Request
    BadRequest(String),
    /// 404 Not Found (usually a delisted market)
    NotFound(String),
    /// 429 Too Many Requests, with the Retry-After seconds when sent
    RateLimited { retry_after: Option<u64> },
    /// 5xx Server Error
    ServerError(u16, String),
    /// Other HTTP errors
    HttpError(u16, String),
    /// Network/request error, including timeouts
    RequestError(String),
    /// Body did not match the expected shape
    DeserializationError(String),
    /// Body parsed but carried an unusable value
    InvalidData(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::RateLimited { retry_after } => match retry_after {
                Some(secs) => write!(f, "Rate Limited. Retry after {} s", secs),
                None => write!(f, "Rate Limited"),
            },
            ApiError::ServerError(code, msg) => write!(f, "Server Error ({}): {}", code, msg),
            ApiError::HttpError(code, msg) => write!(f, "HTTP Error ({}): {}", code, msg),
            ApiError::RequestError(msg) => write!(f, "Request Error: {}", msg),
            ApiError::DeserializationError(msg) => write!(f, "Deserialization Error: {}", msg),
            ApiError::InvalidData(msg) => write!(f, "Invalid Data: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}
