//! User-facing terminal output.
//! Colored, prefixed status lines on stdout/stderr. Colors apply only when the
//! stream is a TTY so scripted invocations get plain text.

use owo_colors::OwoColorize;

enum Sink {
    Stdout,
    Stderr,
}

fn emit(sink: Sink, plain_prefix: &str, colored_prefix: String, msg: &str) {
    match sink {
        Sink::Stdout => {
            if atty::is(atty::Stream::Stdout) {
                println!("{colored_prefix} {msg}");
            } else {
                println!("{plain_prefix} {msg}");
            }
        }
        Sink::Stderr => {
            if atty::is(atty::Stream::Stderr) {
                eprintln!("{colored_prefix} {msg}");
            } else {
                eprintln!("{plain_prefix} {msg}");
            }
        }
    }
}

pub fn print_info(msg: &str) {
    emit(Sink::Stdout, "info:", "info:".cyan().bold().to_string(), msg);
}

pub fn print_warn(msg: &str) {
    emit(Sink::Stderr, "warn:", "warn:".yellow().bold().to_string(), msg);
}

pub fn print_error(msg: &str) {
    emit(Sink::Stderr, "error:", "error:".red().bold().to_string(), msg);
}

pub fn print_success(msg: &str) {
    emit(Sink::Stdout, "ok:", "ok:".green().bold().to_string(), msg);
}

/// Plain line with no prefix, for primary outputs (resolved paths, file
/// contents) that users may script against.
pub fn print_user(msg: &str) {
    println!("{msg}");
}
