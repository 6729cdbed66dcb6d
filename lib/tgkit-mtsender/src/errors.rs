// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::time::Duration;
use std::{error, fmt, io};

use tgkit_tl_types as tl;

/// Names of the errors Telegram answers with when an account must slow down.
const WAIT_ERRORS: [&str; 3] = ["FLOOD_WAIT", "FLOOD_PREMIUM_WAIT", "SLOWMODE_WAIT"];

/// An error Telegram answered a request with, as in `420 FLOOD_WAIT_31`.
///
/// Built from [`tl::types::RpcError`], with the number in the message moved to
/// [`RpcError::value`]:
///
/// ```
/// use tgkit_mtsender::RpcError;
///
/// let rpc_error = RpcError::from(tgkit_tl_types::types::RpcError {
///     error_code: 420,
///     error_message: "FLOOD_WAIT_31".into(),
/// });
/// assert_eq!(rpc_error.name, "FLOOD_WAIT");
/// assert_eq!(rpc_error.value, Some(31));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RpcError {
    /// Similar to an HTTP status: 400 for bad input, 403 for missing rights, 420 for floods.
    pub code: i32,

    /// The error name in screaming snake case, without its number.
    pub name: String,

    /// The number that was part of the message, such as the seconds to wait.
    pub value: Option<u32>,

    /// The constructor identifier of the request that failed. `None` for errors raised locally.
    pub caused_by: Option<u32>,
}

/// Split the first word made only of digits out of an underscore-separated message.
fn split_value(message: &str) -> (String, Option<u32>) {
    let mut value = None;
    let mut words = Vec::new();
    for word in message.split('_') {
        match word.parse::<u32>() {
            Ok(number) if value.is_none() => value = Some(number),
            _ => words.push(word),
        }
    }
    match value {
        Some(_) => (words.join("_"), value),
        None => (message.to_string(), None),
    }
}

impl From<tl::types::RpcError> for RpcError {
    fn from(error: tl::types::RpcError) -> Self {
        let (name, value) = split_value(&error.error_message);
        Self {
            code: error.error_code,
            name,
            value,
            caused_by: None,
        }
    }
}

impl RpcError {
    /// An error with no value that no request caused, for failures detected before sending.
    pub fn new(code: i32, name: &str) -> Self {
        Self {
            code,
            name: name.to_string(),
            value: None,
            caused_by: None,
        }
    }

    /// Whether the error has the given name.
    ///
    /// A `'*'` at the end of `pattern` matches any name starting with the rest, and one at the
    /// start matches any name ending with it, which reads well in `match` guards:
    ///
    /// ```
    /// # let request_result = Result::<(), _>::Err(tgkit_mtsender::RpcError::new(400, "USER_NOT_PARTICIPANT"));
    /// match request_result {
    ///     Err(rpc_err) if rpc_err.is("CHAT_ADMIN_REQUIRED") => panic!(),
    ///     Err(rpc_err) if rpc_err.is("USER_*") => {},
    ///     _ => panic!()
    /// }
    /// ```
    pub fn is(&self, pattern: &str) -> bool {
        match (pattern.strip_prefix('*'), pattern.strip_suffix('*')) {
            (_, Some(prefix)) => self.name.starts_with(prefix),
            (Some(suffix), None) => self.name.ends_with(suffix),
            (None, None) => self.name == pattern,
        }
    }

    /// How long Telegram asked to wait before trying again, if this is a flood or slow mode error.
    pub fn flood_wait(&self) -> Option<Duration> {
        if self.code != 420 || !WAIT_ERRORS.contains(&self.name.as_str()) {
            return None;
        }
        self.value.map(|seconds| Duration::from_secs(seconds.into()))
    }

    /// Remember which request failed, so that it shows up when displayed.
    pub fn with_caused_by(self, constructor_id: u32) -> Self {
        Self {
            caused_by: Some(constructor_id),
            ..self
        }
    }
}

impl error::Error for RpcError {}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rpc error {}: {}", self.code, self.name)?;
        if let Some(value) = self.value {
            write!(f, " (value: {value})")?;
        }
        match self.caused_by {
            Some(id) => write!(f, " caused by {}", tl::name_for_id(id)),
            None => Ok(()),
        }
    }
}

/// Why a request did not produce a result.
#[derive(Debug)]
pub enum InvocationError {
    /// Telegram answered with an error. Floods may be retried once the wait is over.
    Rpc(RpcError),

    /// The [`crate::Connection`] failed. Retrying right away is generally fine.
    Io(io::Error),

    /// The response did not decode as the type the request returns.
    Deserialize(tl::deserialize::Error),

    /// The request was dropped before its result arrived, as when the
    /// [`crate::SenderPoolRunner`] stopped.
    Dropped,

    /// The [`crate::Connector`] has no address for the requested datacenter.
    InvalidDc,
}

impl InvocationError {
    /// The error Telegram answered with, if that is what went wrong.
    pub fn rpc(&self) -> Option<&RpcError> {
        match self {
            Self::Rpc(error) => Some(error),
            _ => None,
        }
    }

    /// Like [`RpcError::is`], and `false` for every error that did not come from Telegram.
    #[inline]
    pub fn is(&self, pattern: &str) -> bool {
        self.rpc().is_some_and(|error| error.is(pattern))
    }
}

impl error::Error for InvocationError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Rpc(error) => Some(error),
            Self::Io(error) => Some(error),
            Self::Deserialize(error) => Some(error),
            Self::Dropped | Self::InvalidDc => None,
        }
    }
}

impl fmt::Display for InvocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("request failed: ")?;
        match self {
            Self::Rpc(error) => fmt::Display::fmt(error, f),
            Self::Io(error) => write!(f, "connection error: {error}"),
            Self::Deserialize(error) => write!(f, "bad response: {error}"),
            Self::Dropped => f.write_str("dropped before completion"),
            Self::InvalidDc => f.write_str("unknown datacenter"),
        }
    }
}

impl From<RpcError> for InvocationError {
    fn from(error: RpcError) -> Self {
        Self::Rpc(error)
    }
}

impl From<io::Error> for InvocationError {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<tl::deserialize::Error> for InvocationError {
    fn from(error: tl::deserialize::Error) -> Self {
        Self::Deserialize(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn parse(code: i32, message: &str) -> RpcError {
        RpcError::from(tl::types::RpcError {
            error_code: code,
            error_message: message.into(),
        })
    }

    #[test]
    fn plain_names_have_no_value() {
        assert_eq!(parse(400, "CHAT_INVALID"), RpcError::new(400, "CHAT_INVALID"));
    }

    #[test]
    fn values_are_extracted() {
        let err = parse(420, "FLOOD_WAIT_31");
        assert_eq!((err.name.as_str(), err.value), ("FLOOD_WAIT", Some(31)));

        let err = parse(500, "INTERDC_2_CALL_ERROR");
        assert_eq!((err.name.as_str(), err.value), ("INTERDC_CALL_ERROR", Some(2)));

        let err = parse(400, "2FA_CONFIRM_WAIT_0");
        assert_eq!((err.name.as_str(), err.value), ("2FA_CONFIRM_WAIT", Some(0)));
    }

    #[test]
    fn only_wait_errors_have_a_flood_wait() {
        assert_eq!(
            parse(420, "FLOOD_WAIT_31").flood_wait(),
            Some(Duration::from_secs(31))
        );
        assert_eq!(
            parse(420, "SLOWMODE_WAIT_5").flood_wait(),
            Some(Duration::from_secs(5))
        );
        assert_eq!(parse(303, "USER_MIGRATE_4").flood_wait(), None);
        assert_eq!(parse(420, "FLOOD_WAIT").flood_wait(), None);
    }

    #[test]
    fn wildcard_matching() {
        let err = InvocationError::Rpc(parse(400, "USER_NOT_PARTICIPANT"));
        assert!(err.is("USER_NOT_PARTICIPANT"));
        assert!(err.is("USER_*"));
        assert!(err.is("*_PARTICIPANT"));
        assert!(!err.is("CHAT_*"));
        assert!(!InvocationError::Dropped.is("USER_*"));
    }

    #[test]
    fn display_names_the_request() {
        let err = parse(400, "CHANNEL_INVALID").with_caused_by(0xa0ab6cc6);
        assert_eq!(
            err.to_string(),
            "rpc error 400: CHANNEL_INVALID caused by channels.getParticipant"
        );
        assert_eq!(
            InvocationError::from(err).to_string(),
            "request failed: rpc error 400: CHANNEL_INVALID caused by channels.getParticipant"
        );
    }

    #[test]
    fn sources_are_exposed() {
        let err = InvocationError::from(io::Error::from(io::ErrorKind::ConnectionReset));
        assert!(err.source().is_some());
        assert!(err.rpc().is_none());
        assert!(InvocationError::Dropped.source().is_none());
    }
}
