//! Prints every frame of one or more capture exports, decoding packets
//! where possible.

use std::path::PathBuf;
use std::process;

use airstage::capture::{load_capture, CaptureConfig, Frame, FrameKind, DEFAULT_GAP_THRESHOLD};
use airstage::protocol::{command_name, Message, Packet, RegisterValue};
use airstage::registers;
use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Decode air conditioner serial bus captures")]
struct Args {
    /// Logic analyzer CSV exports
    #[arg(required = true)]
    captures: Vec<PathBuf>,

    /// Inter-byte gap (seconds) after which pending bytes are flushed
    #[arg(long, default_value_t = DEFAULT_GAP_THRESHOLD)]
    gap: f64,

    /// Fail on malformed rows instead of skipping them
    #[arg(long)]
    strict: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn format_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("0x{:02X}", b)).collect::<Vec<_>>().join(" ")
}

fn format_register(address: u16) -> String {
    match registers::lookup(address) {
        Some(info) => format!("0x{:04X}({})", address, info.name),
        None => format!("0x{:04X}", address),
    }
}

fn format_value(v: &RegisterValue) -> String {
    format!("{}=0x{:04X}({})", format_register(v.address), v.value, v.value)
}

fn join<T>(items: &[T], f: impl Fn(&T) -> String) -> String {
    items.iter().map(f).collect::<Vec<_>>().join(", ")
}

fn describe_packet(packet: &Packet) -> String {
    let detail = match Message::decode(packet) {
        Message::ReadRequest(r) => {
            format!(" ReadRequest addresses=[{}]", join(&r.addresses, |a| format_register(*a)))
        }
        Message::ReadResponse(r) => {
            format!(" ReadResponse status=0x{:02X} values=[{}]", r.status, join(&r.values, format_value))
        }
        Message::WriteRequest(w) => format!(" WriteRequest values=[{}]", join(&w.values, format_value)),
        Message::WriteResponse(w) => format!(" WriteResponse status=0x{:02X}", w.status),
        Message::Unknown if packet.payload.is_empty() => format!(" command={}", command_name(packet.command_id)),
        Message::Unknown => format!(
            " command={} payload=[{}]",
            command_name(packet.command_id),
            format_bytes(&packet.payload)
        ),
    };
    format!("PACKET id=0x{:08X} len={}{}", packet.command_id, packet.payload_length(), detail)
}

fn describe_frame(frame: &Frame) -> String {
    let body = match frame.kind {
        FrameKind::Break => "BREAK".to_string(),
        FrameKind::Raw => format!("RAW {}", format_bytes(&frame.bytes)),
        FrameKind::Packet => match Packet::parse(&frame.bytes) {
            Ok(packet) => describe_packet(&packet),
            Err(e) => format!("PACKET(parse error: {}) raw={}", e, format_bytes(&frame.bytes)),
        },
    };
    format!("[{:>10.6}] {} {}", frame.start_time, frame.direction, body)
}

fn run(args: &Args) -> Result<()> {
    let config = CaptureConfig { gap_threshold: args.gap, strict: args.strict };

    for (idx, path) in args.captures.iter().enumerate() {
        let frames = load_capture(path, &config)
            .with_context(|| format!("Error processing {}", path.display()))?;

        println!("== {} ==", path.display());
        for frame in &frames {
            println!("{}", describe_frame(frame));
        }
        if idx + 1 < args.captures.len() {
            println!();
        }
    }

    Ok(())
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env().filter_level(level).init();

    if let Err(e) = run(&args) {
        eprintln!("{:#}", e);
        process::exit(2);
    }
}
