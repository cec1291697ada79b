use thiserror::Error;

use crate::model::{FieldKind, FieldName};

#[derive(Debug, Error)]
pub enum Error {
    /// A field accessor was asked for the wrong kind of field. This is a
    /// contract violation by the caller, not a data condition.
    #[error("'{field}' is not a {expected} field")]
    InvalidFieldKind { field: FieldName, expected: FieldKind },

    /// An edit was staged against a field that is readable but not part of
    /// the mutable set.
    #[error("field '{0}' is not editable")]
    FieldNotEditable(FieldName),

    #[error("backend call failed: {0}")]
    BackendCallFailed(#[from] anyhow::Error),

    #[error("push channel closed")]
    ChannelClosed,
}

pub type Result<T> = std::result::Result<T, Error>;
