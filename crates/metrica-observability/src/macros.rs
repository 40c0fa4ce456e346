// Metrica - metric identity and wire schema
// Copyright (C) 2025 Metrica Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.


//! Structured logging macros.
//!
//! Thin wrappers over the `tracing` event macros with a `key => value` field
//! list, so call sites outside this workspace need no `tracing` import.

/// Log an info message with structured fields
///
/// ```ignore
/// log_info!("config loaded" => {
///     path = "/etc/metrica.toml",
///     partitions = 8,
/// });
/// ```
#[macro_export]
macro_rules! log_info {
    ($msg:expr) => {
        $crate::tracing::info!($msg)
    };
    ($msg:expr => { $($key:ident = $value:expr),* $(,)? }) => {
        $crate::tracing::info!($($key = $value,)* $msg)
    };
}

/// Log a debug message with structured fields
#[macro_export]
macro_rules! log_debug {
    ($msg:expr) => {
        $crate::tracing::debug!($msg)
    };
    ($msg:expr => { $($key:ident = $value:expr),* $(,)? }) => {
        $crate::tracing::debug!($($key = $value,)* $msg)
    };
}

/// Log a warning with structured fields
#[macro_export]
macro_rules! log_warn {
    ($msg:expr) => {
        $crate::tracing::warn!($msg)
    };
    ($msg:expr => { $($key:ident = $value:expr),* $(,)? }) => {
        $crate::tracing::warn!($($key = $value,)* $msg)
    };
}

/// Log an error with structured fields
#[macro_export]
macro_rules! log_error {
    ($msg:expr) => {
        $crate::tracing::error!($msg)
    };
    ($msg:expr => { $($key:ident = $value:expr),* $(,)? }) => {
        $crate::tracing::error!($($key = $value,)* $msg)
    };
}

/// Debug-level span around a unit of work
///
/// ```ignore
/// let span = trace_span!("load_config", path = %path.display());
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! trace_span {
    ($name:expr) => {
        $crate::tracing::span!($crate::tracing::Level::DEBUG, $name)
    };
    ($name:expr, $($field:tt)*) => {
        $crate::tracing::span!($crate::tracing::Level::DEBUG, $name, $($field)*)
    };
}
