use std::borrow::Cow;

/// A specialized [`StorageError`] enum of this crate.
#[envstore_derive::envstore_error]
pub enum StorageError {
    #[error("Invalid key{}: {message}", format_context(.context))]
    InvalidKey { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid storage configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Backend transport failure{}: {source}", format_context(.context))]
    Http { source: reqwest::Error, context: Option<Cow<'static, str>> },

    #[error("Backend rejected request{} with status {status}: {message}", format_context(.context))]
    Backend { status: u16, message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal storage fault{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
