use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use super::AppEvent;

pub const HELP: &str = "Commands: start | stop | status | quit";

/// The on-screen controls of the harvester, typed on stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Start,
    Stop,
    Status,
    Quit,
}

pub fn parse_command(line: &str) -> Option<ConsoleCommand> {
    match line.trim().to_ascii_lowercase().as_str() {
        "start" | "export" => Some(ConsoleCommand::Start),
        "stop" => Some(ConsoleCommand::Stop),
        "status" => Some(ConsoleCommand::Status),
        "quit" | "exit" | "q" => Some(ConsoleCommand::Quit),
        _ => None,
    }
}

/// Forwards commands from stdin until it closes, then reports the closure.
pub fn spawn_console(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line) {
                Some(command) => {
                    if tx.send(AppEvent::Command(command)).is_err() {
                        return;
                    }
                }
                None => eprintln!("Unknown command {:?}. {}", line.trim(), HELP),
            }
        }
        let _ = tx.send(AppEvent::ConsoleClosed);
    });
}
