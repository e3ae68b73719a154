use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("window backend error: {0}")]
    Backend(String),

    #[error("no image selected")]
    NoSelection,

    #[error("failed to open any of the requested images")]
    NothingOpened,

    #[error("could not register the menu event identifier: {0}")]
    EventRegistration(String),
}
