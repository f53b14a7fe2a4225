// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Free-text extra arguments typed by the user, split into engine tokens.

/// Split `text` on whitespace, keeping double-quoted runs together.
///
/// Quotes are removed and may appear mid-token (`-sTitle="A B"` yields
/// `-sTitle=A B`). Backslashes are literal so Windows paths survive. An
/// unterminated quote extends to the end of the text.
pub fn split_user_args(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for c in text.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}
