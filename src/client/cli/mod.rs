mod client;
mod command;
mod io;

pub use client::CliClient;
pub use command::{Command, CommandError, parse_command};
pub use io::{Console, Terminal};
