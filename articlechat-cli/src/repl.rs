use articlechat_core::params::ParamField;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Plain text: becomes the question and is submitted.
    Ask(String),
    Set(ParamField, String),
    /// Submit whatever question is currently pending.
    Send,
    Show,
    History,
    Health,
    NewSession,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub const HELP: &str = "\
Type a question and press Enter to ask it.

Commands:
  :set <field> <value>   set email, session, article or question (empty value clears)
  :send                  submit the pending question (e.g. after a failed turn)
  :new-session           use a freshly generated session id
  :show                  show the pending parameters
  :history               print the transcript
  :health                check the chat service
  :help                  this text
  :quit                  leave";

pub fn parse_line(line: &str) -> ReplCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReplCommand::Empty;
    }

    let Some(rest) = trimmed.strip_prefix(':') else {
        return ReplCommand::Ask(trimmed.to_string());
    };

    let (cmd, args) = match rest.split_once(char::is_whitespace) {
        Some((c, a)) => (c, a.trim()),
        None => (rest, ""),
    };

    match cmd.to_ascii_lowercase().as_str() {
        "set" => parse_set(args),
        "send" | "retry" => ReplCommand::Send,
        "show" | "params" => ReplCommand::Show,
        "history" | "h" => ReplCommand::History,
        "health" => ReplCommand::Health,
        "new-session" => ReplCommand::NewSession,
        "help" | "?" => ReplCommand::Help,
        "quit" | "q" | "exit" => ReplCommand::Quit,
        other => ReplCommand::Invalid(format!("unknown command :{other} (try :help)")),
    }
}

fn parse_set(args: &str) -> ReplCommand {
    let (field, value) = match args.split_once(char::is_whitespace) {
        Some((f, v)) => (f, v.trim()),
        None => (args, ""),
    };

    if field.is_empty() {
        return ReplCommand::Invalid("usage: :set <field> <value>".into());
    }

    match field.parse::<ParamField>() {
        Ok(f) => ReplCommand::Set(f, value.to_string()),
        Err(e) => ReplCommand::Invalid(e.to_string()),
    }
}
