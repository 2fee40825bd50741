#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Download, // /download | /save
    Preview,  // /preview
    Open,     // /open
    Clear,    // /clear
    Help,     // /help
    Quit,     // /quit | /exit
    Unknown(String),
}

pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return Command::Unknown(trimmed.to_string());
    }
    let verb = trimmed
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    match verb.as_str() {
        "/download" | "/save" => Command::Download,
        "/preview" => Command::Preview,
        "/open" => Command::Open,
        "/clear" => Command::Clear,
        "/help" | "/?" => Command::Help,
        "/quit" | "/exit" => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

pub const HELP_LINES: &[(&str, &str)] = &[
    ("Enter", "clone the URL in the input box"),
    ("Esc", "clear the input / close this help"),
    ("Tab, Shift+Tab, F1-F5", "switch panel"),
    ("PgUp, PgDn, Up, Down", "scroll the panel"),
    ("Ctrl+D, /download", "save the HTML to the download directory"),
    ("Ctrl+R, /preview", "refresh the text preview"),
    ("Ctrl+O, /open", "write the page to a temp file for a browser"),
    ("/clear", "drop the current result"),
    ("Ctrl+C, Ctrl+Q, /quit", "exit"),
];
