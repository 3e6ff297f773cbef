//! Main Crate Error

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /* Channel Errors */
    #[error("Access token missing. Log in first or use --token cli argument")]
    MissingCredential,

    #[error(transparent)]
    Connection(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Malformed frame: {0}")]
    Decode(#[from] serde_json::Error),

    /* Config Errors */
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    ConfigDeserialization(#[from] toml::de::Error),

    #[error(transparent)]
    ConfigSerialization(#[from] toml::ser::Error),

    /* Api Errors */
    #[error(transparent)]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("Invalid access token - {0}")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),
}
