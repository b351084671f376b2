// Copyright 2022 Nathan (Blaise) Bruer.  All rights reserved.

/// Broad classification of everything that can go wrong in this crate.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum ErrorKind {
    /// Pools, generator settings or runner settings were invalid at initialization.
    Configuration,
    Io,
    Serialization,
    Other,
}

#[macro_export]
macro_rules! make_err {
    ($kind:expr, $($arg:tt)+) => {{
        $crate::Error::new(
            $kind,
            format!("{}", format_args!($($arg)+)),
        )
    }};
}

#[macro_export]
macro_rules! make_config_err {
    ($($arg:tt)+) => {{
        $crate::make_err!($crate::ErrorKind::Configuration, $($arg)+)
    }};
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Error {
    pub kind: ErrorKind,
    pub messages: Vec<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, msg: impl ToString) -> Self {
        let mut msgs = Vec::new();
        let msg_string = msg.to_string();
        if !msg_string.is_empty() {
            msgs.push(msg_string);
        }
        Error {
            kind,
            messages: msgs,
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.kind == ErrorKind::Configuration
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // A manual impl to reduce the noise of frequently empty fields.
        let mut builder = f.debug_struct("Error");

        builder.field("kind", &self.kind);

        if !self.messages.is_empty() {
            builder.field("messages", &self.messages);
        }

        builder.finish()
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::new(ErrorKind::Io, err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorKind::Serialization, err.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::new(ErrorKind::Other, err.to_string())
    }
}
