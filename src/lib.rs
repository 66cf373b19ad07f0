use std::io::{BufReader, Read};

use anyhow::Result;
use clap::Parser;

pub mod binary;

#[derive(Debug, Parser)]
#[command(version, about)]
pub struct CmdConfig {
    #[arg(value_name="FILE", help="wasm or wat-format file path", default_value="-")]
    pub file: String,
    #[arg(long)]
    pub disable_ansi_color: bool,
}

pub fn get_args() -> Result<CmdConfig> {
    Ok(CmdConfig::parse())
}

/// Reads module bytes from a file path, or from stdin when `file` is "-".
/// Accepts binary wasm as well as wat text; text is assembled to binary.
pub fn load_wasm(file: &str) -> Result<Vec<u8>> {
    let wasm = match file {
        "-" => {
            let mut reader = BufReader::new(std::io::stdin());

            let mut buf = vec![];
            reader.read_to_end(&mut buf)?;
            wat::parse_bytes(&buf)?.to_vec()
        }
        _ => {
            wat::parse_file(file)?
        }
    };

    Ok(wasm)
}
