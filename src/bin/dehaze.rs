use std::env;
use std::process;
use std::str::FromStr;

use haze_removal::{run, DehazeParams};
use log::error;

fn usage(program: &str) -> String {
    format!(
        "Usage: {program} file [-r radius] [-b beta] [-e epsilon] [--no-intermediates]\n\
         Defaults: radius 9, beta 1.0, epsilon 1e-5"
    )
}

fn parse_value<T: FromStr>(flag: &str, value: Option<&String>) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("missing value for {flag}"))?;
    value
        .parse()
        .map_err(|_| format!("invalid value for {flag}: '{value}'"))
}

fn parse_args(args: &[String]) -> Result<(String, DehazeParams), String> {
    let mut input = None;
    let mut params = DehazeParams::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-r" | "--radius" => params.radius = parse_value(arg, iter.next())?,
            "-b" | "--beta" => params.beta = parse_value(arg, iter.next())?,
            "-e" | "--epsilon" => params.epsilon = parse_value(arg, iter.next())?,
            "--no-intermediates" => params.save_intermediates = false,
            flag if flag.starts_with('-') => return Err(format!("unknown option {flag}")),
            file if input.is_none() => input = Some(file.to_string()),
            extra => return Err(format!("unexpected argument '{extra}'")),
        }
    }

    let input = input.ok_or_else(|| "no input file given".to_string())?;
    params.validate().map_err(|e| e.to_string())?;
    Ok((input, params))
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("dehaze", String::as_str);

    if args.len() < 2 {
        eprintln!("{}", usage(program));
        process::exit(1);
    }

    let (input, params) = match parse_args(&args[1..]) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("Error: {message}");
            eprintln!("{}", usage(program));
            process::exit(1);
        }
    };

    match run(&input, &params) {
        Ok(paths) => println!("Output saved to: {}", paths.dehazed.display()),
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
