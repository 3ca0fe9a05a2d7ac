// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
#![allow(dead_code)]
use ciborium::value::Value;

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

fn encode(values: &[Value]) -> Vec<u8> {
    let mut out = Vec::new();
    for value in values {
        ciborium::ser::into_writer(value, &mut out).unwrap();
    }
    out
}

pub fn header(op: i64, t: Option<&str>) -> Value {
    let mut entries = vec![(text("op"), Value::Integer(op.into()))];
    if let Some(t) = t {
        entries.push((text("t"), text(t)));
    }
    Value::Map(entries)
}

/// A `#commit` frame shaped like the relay's, including fields the decoder
/// ignores.
pub fn commit_frame(repo: &str, seq: i64, ops: &[(&str, &str)]) -> Vec<u8> {
    let ops = ops
        .iter()
        .map(|(action, path)| {
            Value::Map(vec![
                (text("action"), text(action)),
                (text("path"), text(path)),
                (text("cid"), Value::Null),
            ])
        })
        .collect();
    let body = Value::Map(vec![
        (text("seq"), Value::Integer(seq.into())),
        (text("repo"), text(repo)),
        (text("rebase"), Value::Bool(false)),
        (text("tooBig"), Value::Bool(false)),
        (text("time"), text("2024-11-20T12:00:00.000Z")),
        (text("blocks"), Value::Bytes(vec![0x3a, 0xa2, 0x65])),
        (text("ops"), Value::Array(ops)),
    ]);
    encode(&[header(1, Some("#commit")), body])
}

pub fn other_frame(kind: &str) -> Vec<u8> {
    let body = Value::Map(vec![
        (text("seq"), Value::Integer(1.into())),
        (text("did"), text("did:plc:someone")),
    ]);
    encode(&[header(1, Some(kind)), body])
}

pub fn error_frame(error: &str, message: Option<&str>) -> Vec<u8> {
    let mut entries = vec![(text("error"), text(error))];
    if let Some(message) = message {
        entries.push((text("message"), text(message)));
    }
    encode(&[header(-1, None), Value::Map(entries)])
}

pub fn raw_frame(header: Value, body: Value) -> Vec<u8> {
    encode(&[header, body])
}
