//! Coloured terminal output helpers

use colored::Colorize;

pub fn print_header() {
    println!("{}", "=== volley ===".bright_blue().bold());
    println!("{}", "Interactive request testing made simple.\n".cyan());
}

pub fn info(msg: &str) {
    println!("{}", format!("[i] {msg}").cyan());
}

pub fn success(msg: &str) {
    println!("{}", format!("✔ {msg}").green());
}

pub fn error(msg: &str) {
    println!("{}", format!("✘ {msg}").red());
}

pub fn action(msg: &str) {
    println!("{}", format!("... {msg}").yellow());
}

pub fn menu_title(msg: &str) {
    println!("\n{}", msg.bright_blue().bold());
}

pub fn menu_option(key: &str, desc: &str) {
    println!("{} {desc}", format!("{key})").cyan());
}
