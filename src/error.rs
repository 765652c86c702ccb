use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("No usable credentials: set HORUS_EMAIL/HORUS_PASSWORD or provide Datos_utenticacion.txt")]
    CredentialsUnavailable,

    #[error("Could not obtain an authentication token (login rejected or unreachable)")]
    TokenUnavailable,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),
}
