//! Resolver error kinds and their GraphQL extension codes.

use async_graphql::ErrorExtensions;

use crate::services::hello::HelloError;

/// Machine-readable error code set on the `code` extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Unauthenticated,
    BadUserInput,
    InternalServerError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Unauthenticated => "UNAUTHENTICATED",
            ErrorCode::BadUserInput => "BAD_USER_INPUT",
            ErrorCode::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Authentication(String),

    #[error("{message}")]
    UserInput {
        message: String,
        invalid_args: Vec<String>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Hello(#[from] HelloError),
}

impl AppError {
    pub fn authentication(message: impl Into<String>) -> Self {
        AppError::Authentication(message.into())
    }

    pub fn user_input(message: impl Into<String>, invalid_args: Vec<String>) -> Self {
        AppError::UserInput {
            message: message.into(),
            invalid_args,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Authentication(_) => ErrorCode::Unauthenticated,
            AppError::UserInput { .. } => ErrorCode::BadUserInput,
            AppError::Io(_) | AppError::Hello(_) => ErrorCode::InternalServerError,
        }
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", self.code().as_str());
            if let AppError::UserInput { invalid_args, .. } = self {
                e.set("invalidArgs", invalid_args.clone());
            }
        })
    }
}
