//! The project error type. Should be returned during configuration of the project.

use crate::error::PayloadError;
use crate::lazy_evaluation;
use crate::lazy_evaluation::ProviderError;
use crate::plugins::extensions::ExtensionError;
use std::fmt::Display;
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error(transparent)]
    IoError(#[from] io::Error),
    #[error(transparent)]
    PropertyError(#[from] lazy_evaluation::Error),
    #[error(transparent)]
    ProviderError(#[from] ProviderError),
    #[error(transparent)]
    ExtensionError(#[from] ExtensionError),
    #[error("Extension of type {0} is not registered")]
    MissingExtension(String),
    #[error("{0}")]
    CustomError(String),
}

impl ProjectError {
    pub fn custom<E: Display + Send + Sync + 'static>(error: E) -> Self {
        Self::CustomError(error.to_string())
    }

    pub fn missing_extension<E>() -> Self {
        Self::MissingExtension(std::any::type_name::<E>().to_string())
    }
}

#[macro_export]
macro_rules! payload_from {
    ($from:ty, $ty:ty) => {
        impl From<$from> for $crate::error::PayloadError<$ty>
        where
            $from: Into<$ty>,
        {
            fn from(e: $from) -> Self {
                let err: $ty = e.into();
                $crate::error::PayloadError::new(err)
            }
        }
    };
}

payload_from!(ProjectError, ProjectError);
payload_from!(io::Error, ProjectError);
payload_from!(lazy_evaluation::Error, ProjectError);
payload_from!(ProviderError, ProjectError);
payload_from!(ExtensionError, ProjectError);

pub type Result<T> = std::result::Result<T, PayloadError<ProjectError>>;
pub type ProjectResult<T = ()> = Result<T>;
