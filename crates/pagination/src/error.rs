use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    /// No live session for the message: it expired or never existed. The
    /// caller must strip the message's interactive controls either way.
    #[error("this pagination has expired")]
    Expired,

    /// Someone other than the command author pressed a button. No state
    /// change; the caller shows a short-lived notice to that user only.
    #[error("only the command author can use these controls")]
    NotOwner,
}
