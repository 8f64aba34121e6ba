use err_derive::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(display = "Invalid detection: {}", _0)]
    InvalidDetection(String),

    #[error(display = "Invalid parameter `{}`: {}", _0, _1)]
    InvalidParameter(&'static str, f64),
}
