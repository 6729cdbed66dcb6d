// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors that can occur when converting between the generated types.
use std::fmt;

/// The error returned by `TryFrom<Enum>` when the enum holds a different constructor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrongVariant;

impl fmt::Display for WrongVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "enum holds a different variant than the one requested")
    }
}

impl std::error::Error for WrongVariant {}
