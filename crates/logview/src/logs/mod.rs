//! The interactive logs screen.
//!
//! Shows the aggregated log table for a project and runs a prompt loop
//! for narrowing the search and drilling down into individual events.
//! All rendering state lives in [`state::ScreenState`]; this module only
//! performs I/O and dispatches [`state::Action`]s.

pub mod state;

use std::io::Write as _;

use logview_client::{ApiClient, LogQuery};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;

use crate::cli::LogsCommand;
use crate::error::{Error, Result};
use crate::render;

use state::{update, Action, ScreenState, ViewerState};

/// Run the logs screen for one project.
///
/// With `--json` the aggregated list is printed once and the function
/// returns; otherwise an interactive prompt loop runs until `quit` or
/// end of input.
///
/// # Errors
///
/// Returns an error if the project cannot be resolved or, in JSON mode,
/// if the initial fetch fails. Fetch failures inside the interactive
/// loop are reported inline and leave the screen unchanged.
pub async fn run(client: &ApiClient, command: &LogsCommand) -> Result<()> {
    let project_id = command.project_id.as_str();
    let project_name = resolve_project_name(client, command).await?;

    let mut state = ScreenState::new(command.filter());

    if command.json {
        let entries = client.aggregated_logs(project_id, &state.filter).await?;
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    state = fetch_aggregated(client, project_id, state).await;
    print_screen(&project_name, project_id, &state);

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let Some(line) = read_line(&mut input, "logs> ").await? else {
            break;
        };
        match parse_prompt(&line) {
            PromptCommand::Empty => {}
            PromptCommand::Quit => break,
            PromptCommand::Help => print_help(),
            PromptCommand::List => print_screen(&project_name, project_id, &state),
            PromptCommand::Search(pairs) => {
                match apply_search(&state.filter, &pairs) {
                    Ok(filter) => {
                        state = update(state, Action::SearchStarted { filter });
                        state = fetch_aggregated(client, project_id, state).await;
                        print_screen(&project_name, project_id, &state);
                    }
                    Err(field) => {
                        println!(
                            "Unknown filter field '{field}' (expected event_name, \
                             start_time, end_time or search_keys)"
                        );
                    }
                }
            }
            PromptCommand::View(event_name) => {
                state = open_drilldown(client, project_id, state, &event_name).await;
                state = view_loop(&mut input, state).await?;
            }
            PromptCommand::Unknown(word) => {
                println!("Unknown command: {word} (try `help`)");
            }
        }
    }

    Ok(())
}

/// Resolve the project name for the screen header.
///
/// Uses `--project-name` when given, otherwise looks the id up in the
/// project list.
async fn resolve_project_name(client: &ApiClient, command: &LogsCommand) -> Result<String> {
    if let Some(name) = &command.project_name {
        return Ok(name.clone());
    }
    let projects = client.projects().await?;
    projects
        .iter()
        .find(|project| project.id == command.project_id)
        .map(|project| project.name.clone())
        .ok_or_else(|| Error::UnknownProject(command.project_id.clone()))
}

/// Fetch the aggregated list for the state's filter.
///
/// On failure the error is reported inline and the previous results are
/// kept.
async fn fetch_aggregated(client: &ApiClient, project_id: &str, state: ScreenState) -> ScreenState {
    let generation = state.generation;
    match client.aggregated_logs(project_id, &state.filter).await {
        Ok(entries) => update(
            state,
            Action::SearchLoaded {
                generation,
                entries,
            },
        ),
        Err(err) => {
            println!("Failed to load logs: {err}");
            state
        }
    }
}

/// Fetch the individual logs for one event and open the viewer.
async fn open_drilldown(
    client: &ApiClient,
    project_id: &str,
    state: ScreenState,
    event_name: &str,
) -> ScreenState {
    let generation = state.generation;
    match client.logs(project_id, &state.filter.for_event(event_name)).await {
        Ok(logs) if logs.is_empty() => {
            println!("No individual logs found for event: {event_name}");
            state
        }
        Ok(logs) => update(state, Action::DrilldownLoaded { generation, logs }),
        Err(err) => {
            println!("Failed to load logs: {err}");
            state
        }
    }
}

/// Step through the open viewer until it is closed.
async fn view_loop(
    input: &mut Lines<BufReader<Stdin>>,
    mut state: ScreenState,
) -> Result<ScreenState> {
    while state.viewer.is_open() {
        if let Some((log, _, _)) = state.viewer.current() {
            print!("{}", render::log_detail(log));
            println!("{}", nav_footer(&state.viewer));
        }
        let Some(line) = read_line(input, "view> ").await? else {
            return Ok(update(state, Action::CloseViewer));
        };
        let action = match line.trim() {
            "n" | "next" => Action::NextLog,
            "p" | "prev" => Action::PrevLog,
            "q" | "quit" | "back" => Action::CloseViewer,
            "" => continue,
            other => {
                println!("Unknown command: {other} (n/next, p/prev, q/back)");
                continue;
            }
        };
        state = update(state, action);
    }
    Ok(state)
}

/// Apply `field=value` pairs from the prompt to the current filter.
///
/// With no pairs the filter is cleared. Returns the offending field name
/// when one is not a known filter field.
fn apply_search(
    current: &LogQuery,
    pairs: &[(String, String)],
) -> std::result::Result<LogQuery, String> {
    if pairs.is_empty() {
        return Ok(LogQuery::new());
    }
    let mut filter = current.clone();
    for (name, value) in pairs {
        if !filter.set_field(name, value) {
            return Err(name.clone());
        }
    }
    Ok(filter)
}

fn print_screen(project_name: &str, project_id: &str, state: &ScreenState) {
    println!();
    println!("Logs for {project_name} ({project_id})");
    let pairs = state.filter.to_query_pairs();
    if !pairs.is_empty() {
        let summary: Vec<String> = pairs
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        println!("Filter: {}", summary.join("  "));
    }
    println!();
    if state.aggregated.is_empty() {
        println!("No logs found.");
    } else {
        print!("{}", render::aggregated_table(&state.aggregated));
    }
    println!();
}

fn print_help() {
    println!("Commands:");
    println!("  search [field=value ...]  narrow the aggregated list; no args clears");
    println!("                            the filter (fields: event_name, start_time,");
    println!("                            end_time, search_keys)");
    println!("  view <event>              browse the individual logs for an event");
    println!("  list                      reprint the aggregated list");
    println!("  quit                      leave the logs screen");
}

/// The navigation line under the detail view, e.g. `log 2 of 5`.
///
/// Steps that would leave the list are not offered.
fn nav_footer(viewer: &ViewerState) -> String {
    let Some((_, index, total)) = viewer.current() else {
        return String::new();
    };
    let mut footer = format!("log {} of {total}", index + 1);
    if !viewer.at_first() {
        footer.push_str("  [p]rev");
    }
    if !viewer.at_last() {
        footer.push_str("  [n]ext");
    }
    footer.push_str("  [q] back");
    footer
}

/// A parsed prompt line.
#[derive(Debug, PartialEq, Eq)]
enum PromptCommand {
    /// `search field=value ...`
    Search(Vec<(String, String)>),
    /// `view <event name>`
    View(String),
    List,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

fn parse_prompt(line: &str) -> PromptCommand {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    match word {
        "" => PromptCommand::Empty,
        "q" | "quit" | "exit" => PromptCommand::Quit,
        "h" | "help" | "?" => PromptCommand::Help,
        "l" | "list" => PromptCommand::List,
        "s" | "search" => {
            let mut pairs = Vec::new();
            for token in rest.split_whitespace() {
                match token.split_once('=') {
                    Some((name, value)) => {
                        pairs.push((name.to_string(), value.to_string()));
                    }
                    None => return PromptCommand::Unknown(token.to_string()),
                }
            }
            PromptCommand::Search(pairs)
        }
        "v" | "view" if !rest.is_empty() => PromptCommand::View(rest.to_string()),
        other => PromptCommand::Unknown(other.to_string()),
    }
}

/// Print a prompt and read one line; `None` at end of input.
async fn read_line(
    input: &mut Lines<BufReader<Stdin>>,
    prompt: &str,
) -> Result<Option<String>> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let line = input.next_line().await?;
    if line.is_none() {
        debug!("end of input");
    }
    Ok(line)
}
