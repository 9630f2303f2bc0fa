// src/core/net.rs

// HTTP/1.0 over TCP. One best-effort request, no retries; the caller decides
// what a failure means for its room.

use std::{error::Error, io::{Read, Write}, net::TcpStream, time::Duration};

use url::form_urlencoded;

use crate::config::consts::{HOST, IO_TIMEOUT_SECS, USER_AGENT};
use super::sanitize::decode_body;

pub fn http_get(path: &str) -> Result<String, Box<dyn Error>> {
    let req = format!(
        "GET {} HTTP/1.0\r\nHost: {}\r\nUser-Agent: {}\r\nConnection: close\r\n\r\n",
        path, HOST, USER_AGENT
    );
    roundtrip(path, &req)
}

/// POST `fields` as `application/x-www-form-urlencoded`.
pub fn http_post_form(path: &str, fields: &[(&str, String)]) -> Result<String, Box<dyn Error>> {
    let body = encode_form(fields);
    let req = format!(
        "POST {} HTTP/1.0\r\nHost: {}\r\nUser-Agent: {}\r\n\
         Content-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\n\
         Connection: close\r\n\r\n{}",
        path, HOST, USER_AGENT, body.len(), body
    );
    roundtrip(path, &req)
}

pub fn encode_form(fields: &[(&str, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields.iter().map(|(k, v)| (*k, v.as_str())))
        .finish()
}

fn roundtrip(path: &str, req: &str) -> Result<String, Box<dyn Error>> {
    let mut s = TcpStream::connect((HOST, 80))?;
    s.set_read_timeout(Some(Duration::from_secs(IO_TIMEOUT_SECS)))?;
    s.set_write_timeout(Some(Duration::from_secs(IO_TIMEOUT_SECS)))?;

    s.write_all(req.as_bytes())?;
    s.flush()?;

    let mut buf = Vec::new();
    s.read_to_end(&mut buf)?;
    log::debug!("{} {}: {} bytes", HOST, path, buf.len());

    split_response(&buf).map_err(|e| format!("{e}: {}{}", HOST, path).into())
}

/// Status check + body extraction on a raw HTTP/1.0 response.
fn split_response(raw: &[u8]) -> Result<String, String> {
    let head_end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .ok_or_else(|| s!("Malformed HTTP response"))?;
    let head = String::from_utf8_lossy(&raw[..head_end]);
    let status = head.split("\r\n").next().unwrap_or("");
    if status.split_whitespace().nth(1) != Some("200") {
        return Err(format!("HTTP error: {status}"));
    }
    Ok(decode_body(&raw[head_end + 4..]))
}
