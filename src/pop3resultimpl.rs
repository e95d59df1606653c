use regex::Regex;

use crate::errors::*;
use crate::pop3result::{EmailMetadata, EmailUid, POP3Stat};

lazy_static! {
    static ref FIELDS_REGEX: Regex = Regex::new(r"^\s*(?P<first>\S+)\s+(?P<second>\S+)").unwrap();
}

fn split_fields(line: &str) -> Result<(&str, &str)> {
    let cap = FIELDS_REGEX
        .captures(line)
        .ok_or_else(|| ErrorKind::InvalidFields("expected two fields".to_string(), line.to_string()))?;
    match (cap.name("first"), cap.name("second")) {
        (Some(first), Some(second)) => Ok((first.as_str(), second.as_str())),
        _ => Err(ErrorKind::InvalidFields("expected two fields".to_string(), line.to_string()).into()),
    }
}

fn parse_number_and_size(line: &str) -> Result<(u32, u64)> {
    let (first, second) = split_fields(line)?;
    let number = first
        .parse::<u32>()
        .map_err(|_| ErrorKind::InvalidFields("first field is not a number".to_string(), line.to_string()))?;
    let size = second
        .parse::<u64>()
        .map_err(|_| ErrorKind::InvalidFields("size is not a number".to_string(), line.to_string()))?;
    Ok((number, size))
}

/// Wraps a payload parse failure so the message names the command that
/// produced the payload.
pub fn invalid_response(verb: &str, err: Error) -> Error {
    let detail = err.to_string();
    Error::with_chain(err, ErrorKind::InvalidResponse(verb.to_string(), detail))
}

impl POP3Stat {
    pub fn parse(stat_line: &str) -> Result<POP3Stat> {
        let (num_mails, mbox_size) = parse_number_and_size(stat_line)?;
        Ok(POP3Stat { num_mails, mbox_size })
    }
}

impl EmailMetadata {
    pub fn parse(line: &str) -> Result<EmailMetadata> {
        let (msg_num, msg_size) = parse_number_and_size(line)?;
        Ok(EmailMetadata { msg_num, msg_size })
    }
}

impl EmailUid {
    pub fn parse(line: &str) -> Result<EmailUid> {
        let (first, second) = split_fields(line)?;
        let msg_num = first
            .parse::<u32>()
            .map_err(|_| ErrorKind::InvalidFields("first field is not a number".to_string(), line.to_string()))?;
        Ok(EmailUid { msg_num, uid: second.to_string() })
    }
}

/// Parses every line of a listing block, keeping server order. The first bad
/// line fails the whole listing.
pub fn parse_listing<T, F>(verb: &str, lines: &[String], parse: F) -> Result<Vec<T>>
where
    F: Fn(&str) -> Result<T>,
{
    lines
        .iter()
        .map(|line| parse(line).map_err(|e| invalid_response(verb, e)))
        .collect()
}
