// Copyright (c) 2026 The TCPCC Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error type for tcpcc operations.
//!
//! The congestion control core itself has no recoverable error paths: bad
//! inputs are range-checked inline and degrade to safe no-ops or a plain-Reno
//! fallback. Errors only arise on the configuration surface.

use std::fmt;

/// Congestion control configuration error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The provided configuration is invalid, e.g. an unknown congestion
    /// control algorithm name.
    InvalidConfig(String),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
