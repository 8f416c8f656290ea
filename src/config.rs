use std::path::PathBuf;

use clap::Parser;

use crate::reader::DEFAULT_CHUNK_SIZE;
use crate::scroll::DEFAULT_TRIGGER_FRACTION;

#[derive(Debug, Parser)]
#[command(
    name = "csv-viewer",
    version,
    about = "Browse a CSV file, loading rows in chunks as you scroll"
)]
pub struct Args {
    /// CSV file to open on startup
    pub path: Option<PathBuf>,

    /// Rows read per chunk
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, value_parser = parse_chunk_size)]
    pub chunk_size: usize,

    /// Fraction of the scrollbar range that triggers the next chunk
    #[arg(long, default_value_t = DEFAULT_TRIGGER_FRACTION, value_parser = parse_fraction)]
    pub trigger: f64,

    /// Field delimiter
    #[arg(long, default_value_t = ',', value_parser = parse_delimiter)]
    pub delimiter: char,

    /// Starting directory for the file dialog
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub chunk_size: usize,
    pub trigger_fraction: f64,
    pub delimiter: u8,
    pub default_dir: Option<PathBuf>,
}

impl ViewerConfig {
    pub fn from_args(args: &Args) -> Self {
        ViewerConfig {
            chunk_size: args.chunk_size,
            trigger_fraction: args.trigger,
            // parse_delimiter only lets ASCII through
            delimiter: args.delimiter as u8,
            default_dir: args.dir.clone().or_else(default_download_dir),
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            chunk_size: DEFAULT_CHUNK_SIZE,
            trigger_fraction: DEFAULT_TRIGGER_FRACTION,
            delimiter: b',',
            default_dir: default_download_dir(),
        }
    }
}

/// The user's downloads folder, or `~/Downloads` where the platform has no
/// registered one.
pub fn default_download_dir() -> Option<PathBuf> {
    dirs::download_dir().or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
}

pub fn parse_chunk_size(s: &str) -> Result<usize, String> {
    let n: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid chunk size: {}", s))?;
    if n == 0 {
        return Err("chunk size must be at least 1".to_string());
    }
    Ok(n)
}

pub fn parse_fraction(s: &str) -> Result<f64, String> {
    let f: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid fraction: {}", s))?;
    if !(f > 0.0 && f <= 1.0) {
        return Err(format!("trigger fraction must be in (0, 1], got {}", f));
    }
    Ok(f)
}

pub fn parse_delimiter(s: &str) -> Result<char, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c),
        (Some('\\'), Some('t')) if s.len() == 2 => Ok('\t'),
        _ => Err(format!("delimiter must be a single ASCII character, got {:?}", s)),
    }
}
