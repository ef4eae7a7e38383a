//! Decode an ECT blob on the host and print one of its dump nodes.
//!
//! ```text
//! ect-dump <blob> [node] [--soc-id <hex>] [--rev <n>] [--phys-base <hex>] [-v|-vv]
//! ```
//!
//! `node` defaults to `all_dump`. `--soc-id` and `--rev` identify the
//! platform for the revision-dependent DVFS/ASV domain names.

mod logger;

use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;
use std::{env, fs};

use kernel_ect::dump::{NODES, Node};
use kernel_ect::{Ect, EctError, Platform};
use log::LevelFilter;

use crate::logger::StderrLogger;

const USAGE: &str =
    "usage: ect-dump <blob> [node] [--soc-id <hex>] [--rev <n>] [--phys-base <hex>] [-v|-vv]";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{}", USAGE)]
    Usage,

    #[error("invalid value {value:?} for {flag}")]
    InvalidValue { flag: &'static str, value: String },

    #[error("unknown dump node {node:?}, expected one of: {known}")]
    UnknownNode { node: String, known: String },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode ECT blob: {0}")]
    Decode(#[from] EctError),

    #[error("failed to render dump")]
    Format(#[from] std::fmt::Error),

    #[error("failed to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    blob: PathBuf,
    node: Node,
    platform: Platform,
    phys_base: Option<u64>,
    verbosity: LevelFilter,
}

fn parse_hex<T>(
    flag: &'static str,
    value: Option<String>,
    from_radix: fn(&str, u32) -> Result<T, std::num::ParseIntError>,
) -> Result<T, CliError> {
    let value = value.ok_or(CliError::Usage)?;
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(&value);
    from_radix(digits, 16).map_err(|_| CliError::InvalidValue { flag, value: value.clone() })
}

fn parse_node(name: &str) -> Result<Node, CliError> {
    Node::from_name(name).ok_or_else(|| CliError::UnknownNode {
        node: name.to_owned(),
        known: NODES.map(|(n, _)| n).join(", "),
    })
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, CliError> {
    let mut blob = None;
    let mut node = None;
    let mut platform = Platform::default();
    let mut phys_base = None;
    let mut verbosity = LevelFilter::Warn;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--soc-id" => {
                platform.soc_id = parse_hex("--soc-id", args.next(), u32::from_str_radix)?;
            }
            "--rev" => {
                let value = args.next().ok_or(CliError::Usage)?;
                platform.main_rev = value
                    .parse()
                    .map_err(|_| CliError::InvalidValue { flag: "--rev", value })?;
            }
            "--phys-base" => {
                phys_base = Some(parse_hex("--phys-base", args.next(), u64::from_str_radix)?);
            }
            "-v" => verbosity = LevelFilter::Info,
            "-vv" => verbosity = LevelFilter::Debug,
            flag if flag.starts_with('-') => return Err(CliError::Usage),
            _ if blob.is_none() => blob = Some(PathBuf::from(arg)),
            _ if node.is_none() => node = Some(parse_node(&arg)?),
            _ => return Err(CliError::Usage),
        }
    }

    Ok(Args {
        blob: blob.ok_or(CliError::Usage)?,
        node: node.unwrap_or(Node::All),
        platform,
        phys_base,
        verbosity,
    })
}

fn run() -> Result<(), CliError> {
    let args = parse_args(env::args().skip(1))?;
    StderrLogger::new(args.verbosity).init()?;

    let blob = fs::read(&args.blob).map_err(|source| CliError::Read {
        path: args.blob.clone(),
        source,
    })?;
    log::info!("read {} bytes from {}", blob.len(), args.blob.display());

    let ect = match args.phys_base {
        Some(base) => Ect::parse_at(&blob, base, args.platform)?,
        None => Ect::parse(&blob, args.platform)?,
    };

    let mut out = String::new();
    ect.dump(args.node, &mut out)?;
    if !out.ends_with('\n') {
        out.write_char('\n')?;
    }
    print!("{out}");
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ect-dump: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel_ect::BlockKind;
    use kernel_ect::platform::EXYNOS_AUTO_V920_SOC_ID;

    fn args(list: &[&str]) -> Result<Args, CliError> {
        parse_args(list.iter().map(|s| (*s).to_owned()))
    }

    #[test]
    fn defaults_to_all_nodes() {
        let a = args(&["ect.bin"]).unwrap();
        assert_eq!(a.blob, PathBuf::from("ect.bin"));
        assert_eq!(a.node, Node::All);
        assert_eq!(a.platform, Platform::default());
        assert_eq!(a.phys_base, None);
        assert_eq!(a.verbosity, LevelFilter::Warn);
    }

    #[test]
    fn reads_node_and_platform() {
        let a = args(&[
            "ect.bin",
            "dvfs_dump",
            "--soc-id",
            "0x0A920000",
            "--rev",
            "0",
            "--phys-base",
            "90000000",
            "-vv",
        ])
        .unwrap();
        assert_eq!(a.node, Node::Block(BlockKind::Dvfs));
        assert_eq!(a.platform, Platform::new(EXYNOS_AUTO_V920_SOC_ID, 0));
        assert_eq!(a.phys_base, Some(0x9000_0000));
        assert_eq!(a.verbosity, LevelFilter::Debug);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(args(&[]), Err(CliError::Usage)));
        assert!(matches!(args(&["a", "b", "c"]), Err(CliError::UnknownNode { .. })));
        assert!(matches!(
            args(&["a", "--soc-id", "xyz"]),
            Err(CliError::InvalidValue { flag: "--soc-id", .. })
        ));
        assert!(matches!(args(&["a", "--rev"]), Err(CliError::Usage)));
        assert!(matches!(args(&["a", "--bogus"]), Err(CliError::Usage)));
    }
}
