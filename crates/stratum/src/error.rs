use super::*;

pub type Result<T = (), E = InternalError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum InternalError {
    #[snafu(display("{message}"))]
    Parse { message: String },

    #[snafu(display("invalid hex string '{input}': {source}"))]
    Hex {
        input: String,
        source: hex::FromHexError,
    },

    #[snafu(display("expected {expected} bytes, got {actual}"))]
    Length { expected: usize, actual: usize },
}
