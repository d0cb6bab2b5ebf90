//! Saleae Logic async-serial CSV exports.
//!
//! Expected columns: `name,type,start_time,duration,data[,error]`, one
//! analyzer result per row. Only `data` rows carry bytes.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use nom::branch::alt;
use nom::bytes::complete::{is_not, tag, take_till};
use nom::character::complete::char;
use nom::combinator::{all_consuming, map, value};
use nom::multi::{fold_many0, separated_list1};
use nom::sequence::delimited;
use nom::IResult;
use thiserror::Error;

use super::event::{ByteEvent, Direction};
use super::reassembler::{reassemble, Frame};
use super::CaptureConfig;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to open capture file {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("failed to read capture: {0}")]
    Read(#[from] io::Error),
    #[error("line {line}: invalid {field} {token:?}")]
    Malformed { line: usize, field: &'static str, token: String },
}

fn quoted_field(input: &str) -> IResult<&str, String> {
    delimited(
        char('"'),
        fold_many0(
            alt((is_not("\""), value("\"", tag("\"\"")))),
            String::new,
            |mut acc: String, part: &str| {
                acc.push_str(part);
                acc
            },
        ),
        char('"'),
    )(input)
}

fn bare_field(input: &str) -> IResult<&str, String> {
    map(take_till(|c: char| c == ','), String::from)(input)
}

fn row(input: &str) -> IResult<&str, Vec<String>> {
    all_consuming(separated_list1(char(','), alt((quoted_field, bare_field))))(input)
}

fn split_row(line: &str) -> Option<Vec<String>> {
    row(line).ok().map(|(_, fields)| fields)
}

/// `0x`-prefixed hex or plain decimal.
fn parse_byte(token: &str) -> Option<u8> {
    let token = token.trim();
    match token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => token.parse().ok(),
    }
}

fn reject(strict: bool, line: usize, field: &'static str, token: &str) -> Result<(), CaptureError> {
    if strict {
        return Err(CaptureError::Malformed { line, field, token: token.to_string() });
    }
    warn!("line {}: skipping row with invalid {} {:?}", line, field, token);
    Ok(())
}

/// Reads byte events in file order. The header row is skipped, as are rows
/// that are not `data` results or have fewer than five columns.
pub fn read_events<R: BufRead>(reader: R, strict: bool) -> Result<Vec<ByteEvent>, CaptureError> {
    let mut lines = reader.lines();
    match lines.next() {
        Some(header) => {
            header?;
        }
        None => return Ok(Vec::new()),
    }

    let mut events = Vec::new();
    let mut skipped = 0;

    for (idx, line) in lines.enumerate() {
        let line_no = idx + 2;
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }

        let fields = match split_row(line) {
            Some(fields) => fields,
            None => {
                reject(strict, line_no, "row", line)?;
                skipped += 1;
                continue;
            }
        };
        if fields.len() < 5 || fields[1] != "data" {
            continue;
        }

        let direction = if fields[0] == "RX" { Direction::Rx } else { Direction::Tx };

        let time = match fields[2].trim().parse::<f64>() {
            Ok(time) => time,
            Err(_) => {
                reject(strict, line_no, "start_time", &fields[2])?;
                skipped += 1;
                continue;
            }
        };

        let value = match parse_byte(&fields[4]) {
            Some(value) => value,
            None => {
                reject(strict, line_no, "data", &fields[4])?;
                skipped += 1;
                continue;
            }
        };

        let has_error = fields.get(5).map_or(false, |e| !e.is_empty());
        events.push(ByteEvent { direction, time, value, has_error });
    }

    if skipped > 0 {
        warn!("skipped {} malformed rows", skipped);
    }
    debug!("read {} byte events", events.len());
    Ok(events)
}

/// Reads a capture file and reassembles it into time-ordered frames.
pub fn load_capture<P: AsRef<Path>>(path: P, config: &CaptureConfig) -> Result<Vec<Frame>, CaptureError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| CaptureError::Open { path: path.to_path_buf(), source })?;
    let events = read_events(BufReader::new(file), config.strict)?;
    Ok(reassemble(events, config))
}
