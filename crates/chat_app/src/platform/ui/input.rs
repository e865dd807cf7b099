use std::path::PathBuf;

use chat_core::Msg;

pub const HELP: &str = "\
Type a question and press Enter to send it.
  (empty line)     send the dictated draft
  /stop            stop the pending answer
  /voice           start or stop dictation
  /attach <path>   attach a local file
  /copy <n>        copy message number n
  /help            show this help
  /quit            leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    Dispatch(Vec<Msg>),
    Attach(PathBuf),
    Help,
    Quit,
    Invalid(String),
}

/// Turns one line typed at the prompt into a command.
pub fn parse_line(line: &str) -> InputCommand {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.trim_start().strip_prefix('/') else {
        if line.trim().is_empty() {
            return InputCommand::Dispatch(vec![Msg::SendClicked]);
        }
        return InputCommand::Dispatch(vec![
            Msg::InputChanged(line.to_string()),
            Msg::SendClicked,
        ]);
    };

    let (name, argument) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command.trim(), ""),
    };
    match name {
        "stop" => InputCommand::Dispatch(vec![Msg::StopClicked]),
        "voice" | "mic" => InputCommand::Dispatch(vec![Msg::VoiceToggled]),
        "attach" if !argument.is_empty() => InputCommand::Attach(PathBuf::from(argument)),
        "attach" => InputCommand::Invalid("usage: /attach <path>".to_string()),
        "copy" => match argument.parse::<usize>() {
            Ok(number) if number >= 1 => {
                InputCommand::Dispatch(vec![Msg::CopyRequested { index: number - 1 }])
            }
            _ => InputCommand::Invalid("usage: /copy <message number>".to_string()),
        },
        "help" => InputCommand::Help,
        "quit" | "exit" => InputCommand::Quit,
        other => InputCommand::Invalid(format!("unknown command /{other}; try /help")),
    }
}
