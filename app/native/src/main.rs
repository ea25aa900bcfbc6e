//! Pasta Sink - plan trays and cook timers for an eight-cell pasta sink.
//!
//! All functionality lives in the library; this binary only reports errors.

fn main() {
    if let Err(err) = pasta_sink::cli::run() {
        eprintln!("pasta-sink: {err}");
        std::process::exit(1);
    }
}
