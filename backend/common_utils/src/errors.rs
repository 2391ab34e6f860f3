//! Errors and error specific types for universal use

/// A custom datatype that wraps the error variant `E` into a report,
/// allowing `error_stack::Report<E>` specific extendability.
///
/// Effectively, equivalent to `Result<T, error_stack::Report<E>>`.
pub type CustomResult<T, E> = error_stack::Result<T, E>;

/// Parsing/conversion errors for amounts and wire payloads.
#[derive(Debug, thiserror::Error)]
pub enum ParsingError {
    #[error("Failed to parse {0}")]
    StructParseFailure(&'static str),
    #[error("Failed to convert i64 amount to decimal")]
    I64ToDecimalConversionFailure,
    #[error("Failed to convert decimal amount to i64")]
    DecimalToI64ConversionFailure,
    #[error("Failed to convert string amount to decimal: {error}")]
    StringToDecimalConversionFailure { error: String },
    #[error("Failed to convert decimal amount to f64")]
    FloatToDecimalConversionFailure,
}

/// Validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {field_name}")]
    MissingRequiredField { field_name: String },
    #[error("Incorrect value provided for field: {field_name}")]
    IncorrectValueProvided { field_name: &'static str },
    #[error("{message}")]
    InvalidValue { message: String },
}

/// Cryptographic algorithm errors.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Failed to encode given message")]
    EncodingFailed,
    #[error("Failed to sign message")]
    MessageSigningFailed,
    #[error("Failed to verify signature")]
    SignatureVerificationFailed,
}
