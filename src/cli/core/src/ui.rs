/* src/cli/core/src/ui.rs */

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn ok(msg: &str) {
  eprintln!("  {GREEN}\u{2713}{RESET} {msg}");
}

pub fn fail(msg: &str) {
  eprintln!("  {RED}\u{2717}{RESET} {msg}");
}

pub fn warn(msg: &str) {
  eprintln!("  {YELLOW}!{RESET} {msg}");
}

pub fn arrow(msg: &str) {
  eprintln!("  {GREEN}\u{2192}{RESET} {msg}");
}

pub fn detail(msg: &str) {
  eprintln!("        {msg}");
}

pub fn banner(cmd: &str, project: &str) {
  eprintln!();
  eprintln!("  {BOLD}react-render{RESET} {cmd} {DIM}v{VERSION}{RESET}  {CYAN}{project}{RESET}");
  eprintln!();
}

/// Command output proper (markup, paths), kept on stdout so it can be piped.
pub fn emit(text: &str) {
  println!("{text}");
}
