//! Entry point for the `rideshare` binary.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = rideshare_cli::run() {
        eprintln!("rideshare: {err}");
        std::process::exit(1);
    }
}
