//! Argument expansion
//!
//! `${NAME}` references are substituted in every argument. Unquoted arguments
//! are then split on `;` with empty elements dropped; quoted arguments always
//! stay a single token.

use super::types::{Argument, Delimiter};

/// Expand a list of arguments using `lookup` for variable references
pub fn expand_arguments<F>(args: &[Argument], lookup: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = Vec::with_capacity(args.len());
    for arg in args {
        let value = expand_references(&arg.value, &lookup);
        match arg.delim {
            Delimiter::Quoted => out.push(value),
            Delimiter::Unquoted => out.extend(
                value
                    .split(';')
                    .filter(|item| !item.is_empty())
                    .map(str::to_string),
            ),
        }
    }
    out
}

/// Substitute `${NAME}` references. Unset variables expand to nothing; an
/// unterminated reference is kept verbatim.
pub fn expand_references<F>(text: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                if let Some(value) = lookup(&after[..end]) {
                    out.push_str(&value);
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
