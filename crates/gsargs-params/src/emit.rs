// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Default-diff emission: a token is appended only when its value differs from
// the field default. All token formatting lives here.

use std::fmt::Display;

/// Tokens ending with this marker take their value inline (`-dName=value`).
pub const ASSIGN: char = '=';

/// Append a boolean token if `value != default`.
///
/// `-dName=` tokens receive `true`/`false`; anything else is a bare flag.
pub fn emit_bool(out: &mut Vec<String>, value: bool, default: bool, token: &str) {
    if value != default {
        push_bool(out, value, token);
    }
}

/// Append `token + value` verbatim if `value != default`.
pub fn emit_str(out: &mut Vec<String>, value: &str, default: &str, token: &str) {
    if value != default {
        out.push(format!("{token}{value}"));
    }
}

/// Append `token + decimal(value)` if `value != default`.
pub fn emit_int<T>(out: &mut Vec<String>, value: T, default: T, token: &str)
where
    T: PartialEq + Display,
{
    if value != default {
        push_int(out, value, token);
    }
}

/// Append a boolean token unconditionally.
pub fn push_bool(out: &mut Vec<String>, value: bool, token: &str) {
    if token.ends_with(ASSIGN) {
        out.push(format!("{token}{value}"));
    } else {
        out.push(token.to_string());
    }
}

/// Append an integer token unconditionally.
pub fn push_int<T: Display>(out: &mut Vec<String>, value: T, token: &str) {
    out.push(format!("{token}{value}"));
}
