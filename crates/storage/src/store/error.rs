#![forbid(unsafe_code)]

use fd_core::code::TicketCodeError;

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Sql(rusqlite::Error),
    InvalidInput(&'static str),
    UnknownTicket,
    CodeAlreadyExists(String),
    CorruptRow { column: &'static str, value: String },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Sql(err) => write!(f, "sqlite: {err}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::UnknownTicket => write!(f, "unknown ticket id"),
            Self::CodeAlreadyExists(code) => write!(f, "ticket code already exists: {code}"),
            Self::CorruptRow { column, value } => {
                write!(f, "corrupt row (column={column}, value={value})")
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sql(value)
    }
}

impl From<TicketCodeError> for StoreError {
    fn from(_: TicketCodeError) -> Self {
        Self::InvalidInput("malformed ticket code")
    }
}
