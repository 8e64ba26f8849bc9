//! The compact grammar of JVM type descriptors: single letters for
//! primitives, `L<name>;` for object types, `[` prefixes for arrays,
//! `(...)` for method parameter lists, and `T<name>;` for the type
//! variables that show up inside Signature attributes.

use std::error::Error;

use crate::errors::{UnpackCause, UnpackError};

fn unimplemented(what: String) -> Box<dyn Error> {
    Box::new(UnpackError::new(
        UnpackCause::Unimplemented(what),
        "bad type descriptor",
    ))
}

/// Splits the leading type token off `sig`, returning the token and the
/// remainder. An array token carries its `[` prefixes; object,
/// type-variable, and parameter-list tokens include their closing `;`
/// or `)`.
pub fn next_argsig(sig: &str) -> Result<(&str, &str), Box<dyn Error>> {
    match sig.as_bytes().first() {
        None => Err(unimplemented("empty type descriptor".into())),
        Some(b'V' | b'Z' | b'B' | b'C' | b'S' | b'I' | b'J' | b'D' | b'F') => Ok(sig.split_at(1)),
        Some(b'[') => {
            let (inner, _) = next_argsig(&sig[1..])?;
            Ok(sig.split_at(1 + inner.len()))
        }
        Some(b'L' | b'T') => match sig.find(';') {
            Some(i) => Ok(sig.split_at(i + 1)),
            None => Err(unimplemented(format!("unterminated object type {sig}"))),
        },
        Some(b'(') => match sig.find(')') {
            Some(i) => Ok(sig.split_at(i + 1)),
            None => Err(unimplemented(format!("unterminated parameter list {sig}"))),
        },
        Some(&c) => Err(unimplemented(format!(
            "type descriptor character {:?} in {sig}",
            c as char
        ))),
    }
}

/// Tokenizes a whole field or method descriptor. Concatenating the
/// returned tokens reproduces the input exactly.
pub fn typeseq(sig: &str) -> Result<Vec<&str>, Box<dyn Error>> {
    let mut tokens = Vec::new();
    let mut rest = sig;
    while !rest.is_empty() {
        let (token, tail) = next_argsig(rest)?;
        tokens.push(token);
        rest = tail;
    }
    Ok(tokens)
}

pub fn pretty_typeseq(sig: &str) -> Result<Vec<String>, Box<dyn Error>> {
    typeseq(sig)?.into_iter().map(pretty_type).collect()
}

/// Maps one descriptor token to its Java source spelling: primitive
/// names, dotted object types, `[]` suffixes per array level, and
/// comma-joined parenthesized parameter lists.
pub fn pretty_type(token: &str) -> Result<String, Box<dyn Error>> {
    match token.as_bytes().first() {
        None => Err(unimplemented("empty type descriptor".into())),
        Some(b'(') => Ok(format!(
            "({})",
            pretty_typeseq(&token[1..token.len() - 1])?.join(",")
        )),
        Some(b'V') => Ok("void".into()),
        Some(b'Z') => Ok("boolean".into()),
        Some(b'C') => Ok("char".into()),
        Some(b'B') => Ok("byte".into()),
        Some(b'S') => Ok("short".into()),
        Some(b'I') => Ok("int".into()),
        Some(b'J') => Ok("long".into()),
        Some(b'D') => Ok("double".into()),
        Some(b'F') => Ok("float".into()),
        Some(b'T') => Ok(format!("generic {}", token[1..].trim_end_matches(';'))),
        Some(b'L') => Ok(pretty_class(&token[1..token.len() - 1])),
        Some(b'[') => Ok(format!("{}[]", pretty_type(&token[1..])?)),
        Some(&c) => Err(unimplemented(format!(
            "type descriptor character {:?}",
            c as char
        ))),
    }
}

/// Internal `/`-separated class names in source form.
pub fn pretty_class(name: &str) -> String {
    name.replace('/', ".")
}
