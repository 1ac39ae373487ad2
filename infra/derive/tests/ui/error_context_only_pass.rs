use envstore_derive::envstore_error;
use std::borrow::Cow;

#[envstore_error]
#[derive(Debug)]
pub enum LookupError {
    #[error("Key not found{}: {key}", format_context(.context))]
    NotFound { key: String, context: Option<Cow<'static, str>> },

    #[error("Rejected: {reason}")]
    Rejected { reason: &'static str },
}

fn main() {
    let res: Result<(), LookupError> =
        Err(LookupError::NotFound { key: "env".to_owned(), context: None });
    let err = res.context("startup").unwrap_err();
    assert_eq!(err.to_string(), "Key not found (startup): env");

    let res: Result<(), LookupError> = Err(LookupError::Rejected { reason: "nope" });
    assert_eq!(res.context("ignored").unwrap_err().to_string(), "Rejected: nope");
}
