use std::time::Duration;

pub const BASE_URL: &str = "https://backend.horus-health.com/api/afiliados/consultar-afiliado";
pub const AUTH_URL: &str = "https://backend.horus-health.com/api/auth/validar-usuario";

/// Front-end origin the backend expects on login requests (CORS check).
pub const FRONTEND_ORIGIN: &str = "https://horus2.horus-health.com";

/// Code sent when the document-type definitions file is absent.
pub const DEFAULT_DOC_TYPE: &str = "1";

pub const AUTH_FILE: &str = "Datos_utenticacion.txt";
pub const DOC_TYPE_FILE: &str = "identificacion_codigos.txt";
pub const UNIFIED_CSV: &str = "unificado.csv";
pub const UNIFIED_XLSX: &str = "unificado.xlsx";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Pause between lookups. The server advertises X-RateLimit-Limit: 60 but
/// tolerates ~5/s in practice; 200 ms keeps us under that.
pub const REQUEST_DELAY_MS: u64 = 200;

/// Column order for the unified table; columns not listed here are appended
/// in first-seen order.
pub const PREFERRED_COLUMNS: &[&str] = &[
    "identifier",
    "document_type_code",
    "document_type_name",
    "status",
    "affiliate_state_name",
    "provider_name",
    "message",
    "http_status",
];

pub struct Category {
    pub id: &'static str,
    pub input_file: &'static str,
    pub doc_type_name: &'static str,
    pub output_file: &'static str,
}

pub const CATEGORIES: &[Category] = &[
    Category {
        id: "cedulas",
        input_file: "cedulas.txt",
        doc_type_name: "cedula",
        output_file: "cedulas.csv",
    },
    Category {
        id: "registrocivil",
        input_file: "registrocivil.txt",
        doc_type_name: "registro civil",
        output_file: "registrocivil.csv",
    },
    Category {
        id: "tarjetasid",
        input_file: "tarjetasid.txt",
        doc_type_name: "tarjeta identidad",
        output_file: "tarjetasid.csv",
    },
];
