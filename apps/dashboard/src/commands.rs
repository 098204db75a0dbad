use anyhow::{bail, Context};
use client_core::DashboardCommand;
use shared::domain::UserId;

pub const HELP: &str = "\
Commands:
  list              show the current page again
  next | prev       move one page forward or back
  page <n>          jump to page n
  refresh           clear the cache and reload page 1
  search [term]     filter the loaded page; no term clears the filter
  add               create a user
  edit <id>         edit a user on the loaded page
  delete <id>       delete a user on the loaded page
  debug             show the last API call
  dismiss           hide the current notification
  help              show this help
  quit              leave the dashboard";

/// One line typed at the dashboard prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Dispatch(DashboardCommand),
    /// Open the create form and prompt for its fields.
    Add,
    Edit(UserId),
    List,
    Debug,
    Help,
    Quit,
    Empty,
}

pub fn parse_line(line: &str) -> anyhow::Result<Input> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let input = match word.to_ascii_lowercase().as_str() {
        "" => Input::Empty,
        "list" | "ls" => Input::List,
        "next" | "n" => Input::Dispatch(DashboardCommand::NextPage),
        "prev" | "p" => Input::Dispatch(DashboardCommand::PrevPage),
        "page" => {
            let page = rest
                .parse::<u32>()
                .with_context(|| format!("expected a page number, got '{rest}'"))?;
            Input::Dispatch(DashboardCommand::JumpToPage(page))
        }
        "refresh" | "r" => Input::Dispatch(DashboardCommand::Refresh),
        "search" | "/" => Input::Dispatch(DashboardCommand::Search(rest.to_string())),
        "add" | "new" => Input::Add,
        "edit" => Input::Edit(parse_user_id(rest)?),
        "delete" | "rm" => Input::Dispatch(DashboardCommand::Delete(parse_user_id(rest)?)),
        "debug" => Input::Debug,
        "dismiss" => Input::Dispatch(DashboardCommand::DismissNotification),
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        other => bail!("unknown command '{other}', type 'help' for a list"),
    };
    Ok(input)
}

fn parse_user_id(raw: &str) -> anyhow::Result<UserId> {
    if raw.is_empty() {
        bail!("expected a user id");
    }
    let id = raw
        .parse::<i64>()
        .with_context(|| format!("expected a numeric user id, got '{raw}'"))?;
    Ok(UserId(id))
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
