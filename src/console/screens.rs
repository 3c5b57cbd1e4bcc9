use std::io::{self, Write};

use crate::models::UserRecord;

const RULE: &str = "=======================================";

pub fn header<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out, "\n{}", RULE)?;
    writeln!(out, "| {:^35} |", title)?;
    writeln!(out, "{}", RULE)
}

fn menu<W: Write>(out: &mut W, options: &[&str]) -> io::Result<()> {
    writeln!(out, "|{:37}|", "")?;
    for (idx, option) in options.iter().enumerate() {
        writeln!(out, "|  {}. {:<32}|", idx + 1, option)?;
    }
    writeln!(out, "|{:37}|", "")?;
    writeln!(out, "{}", RULE)
}

pub fn initial_menu<W: Write>(out: &mut W) -> io::Result<()> {
    header(out, "User Login System")?;
    menu(out, &["Login", "Register", "Exit"])
}

pub fn session_menu<W: Write>(out: &mut W, username: &str) -> io::Result<()> {
    header(out, "User Login System")?;
    writeln!(out, "|  Welcome, {}", username)?;
    menu(
        out,
        &[
            "Display Your Information",
            "Edit Your Data",
            "Change Password",
            "Delete Your Account",
            "Logout",
        ],
    )
}

pub fn edit_menu<W: Write>(out: &mut W) -> io::Result<()> {
    header(out, "EDIT DATA")?;
    menu(out, &["Email", "Username", "Cancel"])
}

pub fn profile<W: Write>(out: &mut W, user: &UserRecord) -> io::Result<()> {
    header(out, "YOUR INFORMATION")?;
    writeln!(out, "\n{}", user)?;
    writeln!(out, "\n{}", RULE)
}

pub fn success<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "\n[SUCCESS] {}", message)
}

pub fn error<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "\n[ERROR] {}", message)
}

pub fn info<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "\n{}", message)
}
