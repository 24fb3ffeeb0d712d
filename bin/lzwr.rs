#![forbid(unsafe_code)]
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::Instant;
use std::{env, ffi, fs, process};

use log::info;
use lzwr::Codec;

fn main() -> CodingResult {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    CodingResult::catch_panic(|| {
        let flags = Flags::from_args(env::args_os()).unwrap_or_else(|ParamError| explain());
        run_coding(flags)
    })
}

fn run_coding(flags: Flags) -> Result<(), io::Error> {
    let operation = flags.operation.unwrap_or_else(explain);
    let data = match flags.input {
        Input::File(file) => fs::read(file)?,
        Input::Stdin => {
            let mut data = vec![];
            io::stdin().lock().read_to_end(&mut data)?;
            data
        }
    };

    let start = Instant::now();
    let mut output = vec![];
    for _ in 0..flags.repeat {
        output = match operation {
            Operation::Encode => flags.codec.encode_to_vec(&data),
            Operation::Decode => flags
                .codec
                .decode_to_vec(&data)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?,
        };
    }
    info!(
        "in: {} * {} bytes, out: {} * {} bytes, {:?}",
        data.len(),
        flags.repeat,
        output.len(),
        flags.repeat,
        start.elapsed(),
    );

    let out = io::stdout();
    let mut out = out.lock();
    out.write_all(&output)?;
    out.flush()
}

struct Flags {
    input: Input,
    operation: Option<Operation>,
    codec: Codec,
    repeat: u32,
}

struct ParamError;

#[derive(Debug)]
enum Input {
    File(PathBuf),
    Stdin,
}

#[derive(Debug)]
enum Operation {
    Encode,
    Decode,
}

fn explain<T>() -> T {
    println!(
        "Usage: lzwr [-e|-d] [-f lzw|b64|hex|HEX] [-n <repeat>] <file>\n\
        Arguments:\n\
        -e\t operation encode\n\
        -d\t operation decode\n\
        -f\t format, lzw (default), b64, hex or HEX\n\
        -n\t repeat the operation, for timing\n\
        <file>\tfilepath or '-' for stdin"
    );
    process::exit(1);
}

impl Default for Flags {
    fn default() -> Flags {
        Flags {
            input: Input::Stdin,
            operation: None,
            codec: Codec::Lzw,
            repeat: 1,
        }
    }
}

fn command() -> clap::Command {
    clap::Command::new("lzwr")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compress with LZW and run records, or convert to and from Base64 and hex")
        .arg(
            clap::Arg::new("decode")
                .short('d')
                .long("decode")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("encode")
                .short('e')
                .long("encode")
                .action(clap::ArgAction::SetTrue),
        )
        .group(
            clap::ArgGroup::new("operation")
                .args(["decode", "encode"])
                .multiple(false)
                .required(true),
        )
        .arg(
            clap::Arg::new("format")
                .short('f')
                .long("format")
                .default_value("lzw")
                .value_parser(["lzw", "b64", "hex", "HEX"]),
        )
        .arg(
            clap::Arg::new("repeat")
                .short('n')
                .long("repeat")
                .default_value("1")
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
        .arg(
            clap::Arg::new("file")
                .default_value("-")
                .value_parser(clap::builder::ValueParser::path_buf()),
        )
}

impl Flags {
    fn from_args(args: impl Iterator<Item = ffi::OsString>) -> Result<Self, ParamError> {
        let mut flags = Flags::default();
        let matches = command().get_matches_from(args);

        if matches.get_flag("decode") {
            flags.operation = Some(Operation::Decode);
        } else if matches.get_flag("encode") {
            flags.operation = Some(Operation::Encode);
        }

        match matches.get_one::<String>("format").map(String::as_str) {
            Some("lzw") => flags.codec = Codec::Lzw,
            Some("b64") => flags.codec = Codec::Base64,
            Some("hex") => flags.codec = Codec::Hex,
            Some("HEX") => flags.codec = Codec::HexUpper,
            Some(_) => return Err(ParamError),
            None => {}
        }

        if let Some(&repeat) = matches.get_one::<u32>("repeat") {
            flags.repeat = repeat;
        }

        match matches.get_one::<PathBuf>("file") {
            None => flags.input = Input::Stdin,
            Some(p) if *p == PathBuf::from("-") => flags.input = Input::Stdin,
            Some(p) => flags.input = Input::File(p.clone()),
        }

        Ok(flags)
    }
}

enum CodingResult {
    Ok,
    Err(io::Error),
    Panic,
}

impl CodingResult {
    fn catch_panic(op: fn() -> Result<(), io::Error>) -> Self {
        std::panic::catch_unwind(|| match op() {
            Ok(()) => CodingResult::Ok,
            Err(err) => CodingResult::Err(err),
        })
        .unwrap_or(CodingResult::Panic)
    }
}

impl std::process::Termination for CodingResult {
    fn report(self) -> std::process::ExitCode {
        match self {
            CodingResult::Ok => std::process::ExitCode::SUCCESS,
            CodingResult::Err(err) => {
                eprintln!("{}", err);
                std::process::ExitCode::FAILURE
            }
            CodingResult::Panic => {
                eprintln!(
                    "The process failed irrecoverably! This should never happen and is a bug."
                );
                std::process::ExitCode::from(128)
            }
        }
    }
}
