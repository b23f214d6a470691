use fractic_server_error::{define_client_error, define_internal_error};

// Configuration-related.
define_client_error!(
    InvalidConfiguration,
    "Invalid configuration value for '{key}': '{value}'.",
    { key: &str, value: &str }
);
define_client_error!(
    MissingConfiguration,
    "Missing required configuration value '{key}'.",
    { key: &str }
);
define_client_error!(
    UnreplacedPlaceholdersRemain,
    "Message template contains unknown placeholders: {keys}.",
    { keys: &str }
);

// Ledger-related.
define_internal_error!(
    LedgerTransportError,
    "Could not reach the ledger endpoint '{endpoint}'.",
    { endpoint: &str }
);
define_client_error!(
    LedgerUpstreamFailure,
    "Ledger endpoint '{endpoint}' reported a failure: {message}.",
    { endpoint: &str, message: &str }
);
define_internal_error!(
    LedgerInvalidResponse,
    "Ledger endpoint '{endpoint}' returned a response that could not be decoded.",
    { endpoint: &str }
);

// Dispatch-related.
define_client_error!(
    NoUsablePhone,
    "Customer '{name}' (id: {id}) has no usable phone number.",
    { name: &str, id: i64 }
);
define_internal_error!(
    InvalidDeepLink,
    "Could not build a deep link from base '{base}'.",
    { base: &str }
);
define_internal_error!(
    NotificationChannelError,
    "Notification channel failed to open link for {phone}.",
    { phone: &str }
);
