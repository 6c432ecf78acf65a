use std::path::PathBuf;

use thiserror::Error;


pub type Result<T> = std::result::Result<T, ErrorKind>;

#[derive(Error, Debug)]
pub enum ErrorKind {
    #[error("io error: {}", .0)]
    Io(#[from]std::io::Error),

    #[error("failed to parse {}: {source}", .path.display())]
    Parse { path: PathBuf, source: serde_json::Error },

    #[error("serializing failed: {}", .0)]
    Serialize(#[from]serde_json::Error),

    #[error("expected \"{key}\" to be a json object")]
    NotAnObject { key: String },
}
