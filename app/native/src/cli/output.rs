//! CLI output formatting.
//!
//! JSON printed by `config show` is syntax highlighted. Colors are dropped
//! automatically when stdout is not a terminal.

use std::fmt::Write as _;

use colored::Colorize;

/// Prints `value` as pretty JSON with syntax highlighting.
pub fn print_highlighted_json(value: &serde_json::Value) {
    println!("{}", highlight_json(value));
}

/// Renders `value` as pretty JSON with keys in cyan, strings in green,
/// numbers in yellow and booleans or null in magenta.
#[must_use]
pub fn highlight_json(value: &serde_json::Value) -> String {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    let mut out = String::with_capacity(json.len());
    let mut token = String::new();
    let mut in_string = false;
    let mut escaped = false;
    let mut is_key = false;
    let mut after_colon = false;

    for ch in json.chars() {
        if in_string {
            token.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                let colored = if is_key { token.cyan() } else { token.green() };
                let _ = write!(out, "{colored}");
                token.clear();
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => {
                push_scalar(&mut out, &mut token);
                token.push(ch);
                in_string = true;
                is_key = !after_colon;
                after_colon = false;
            }
            ':' => {
                push_scalar(&mut out, &mut token);
                out.push(':');
                after_colon = true;
            }
            ',' => {
                push_scalar(&mut out, &mut token);
                out.push(',');
                after_colon = false;
            }
            '{' | '}' | '[' | ']' => {
                push_scalar(&mut out, &mut token);
                let _ = write!(out, "{}", ch.to_string().bold());
                after_colon = false;
            }
            _ => token.push(ch),
        }
    }

    push_scalar(&mut out, &mut token);
    out
}

/// Appends a pending unquoted token, coloring numbers and literals.
fn push_scalar(out: &mut String, token: &mut String) {
    let start = token.find(|c: char| !c.is_whitespace()).unwrap_or(token.len());
    let end = token.rfind(|c: char| !c.is_whitespace()).map_or(start, |i| i + 1);
    let (prefix, value, suffix) = (&token[..start], &token[start..end], &token[end..]);

    let _ = match value {
        "" => write!(out, "{token}"),
        "true" | "false" | "null" => write!(out, "{prefix}{}{suffix}", value.magenta()),
        _ if value.parse::<f64>().is_ok() => write!(out, "{prefix}{}{suffix}", value.yellow()),
        _ => write!(out, "{token}"),
    };

    token.clear();
}
