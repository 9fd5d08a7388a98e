//! Parsing for the interactive driver commands.

use std::path::PathBuf;
use std::time::Duration;

/// One line of driver input.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    /// Set the conversation scroll offset in document pixels.
    Scroll(f32),
    /// Click the numbered panel row.
    Click(usize),
    /// Toggle the panel collapsed state.
    Toggle,
    /// Append an HTML fragment to the page, like new messages arriving.
    Append(PathBuf),
    /// In-app navigation; optionally swaps the whole page too.
    Goto { url: String, page: Option<PathBuf> },
    /// Print the panel regardless of dirtiness.
    Panel,
    /// Print the view model as JSON.
    Dump,
    /// Scripted pause; consumed by the input thread, never dispatched.
    Wait(Duration),
    Help,
    Quit,
}

pub(crate) fn parse(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match verb {
        "scroll" => Command::Scroll(parse_number(&rest, "scroll <pixels>")?),
        "click" => Command::Click(parse_number(&rest, "click <row>")?),
        "toggle" => Command::Toggle,
        "append" => match rest.as_slice() {
            [file] => Command::Append(PathBuf::from(file)),
            _ => return Err("usage: append <fragment.html>".into()),
        },
        "goto" => match rest.as_slice() {
            [url] => Command::Goto {
                url: (*url).to_string(),
                page: None,
            },
            [url, file] => Command::Goto {
                url: (*url).to_string(),
                page: Some(PathBuf::from(file)),
            },
            _ => return Err("usage: goto <url> [page.html]".into()),
        },
        "panel" => Command::Panel,
        "dump" => Command::Dump,
        "wait" => Command::Wait(Duration::from_millis(parse_number(
            &rest,
            "wait <millis>",
        )?)),
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {other} (try help)")),
    };
    Ok(Some(command))
}

fn parse_number<T: std::str::FromStr>(args: &[&str], usage: &str) -> Result<T, String> {
    match args {
        [value] => value
            .parse()
            .map_err(|_| format!("bad argument {value:?}; usage: {usage}")),
        _ => Err(format!("usage: {usage}")),
    }
}

pub(crate) const HELP: &str = "\
commands:
  scroll <pixels>         set the conversation scroll offset
  click <row>             jump to the numbered message
  toggle                  collapse or expand the panel
  append <fragment.html>  append page content (fires a mutation sweep)
  goto <url> [page.html]  navigate; the URL poller picks it up
  panel                   print the panel now
  dump                    print the view model as JSON
  wait <millis>           pause before the next scripted command
  help                    this text
  quit                    exit";
