//! Interactive lookup session
//!
//! Reads one command per line. A city name searches, `:units` toggles the
//! unit system, `:quit` ends the session.

use std::{future::Future, io::Write};

use application::{
    ApplicationError, FetchState, LOADING_LINE, WeatherLookupService, format_fetch_state,
};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::watch,
};
use tracing::debug;

const PROMPT: &str = "City (:units to toggle, :quit to exit)> ";

/// One parsed input line
#[derive(Debug, PartialEq, Eq)]
enum SessionInput<'a> {
    Quit,
    ToggleUnits,
    Unknown(&'a str),
    Search(&'a str),
}

fn parse_input(line: &str) -> SessionInput<'_> {
    let trimmed = line.trim();
    match trimmed {
        ":quit" | ":q" | ":exit" => SessionInput::Quit,
        ":units" | ":u" => SessionInput::ToggleUnits,
        cmd if cmd.starts_with(':') => SessionInput::Unknown(cmd),
        _ => SessionInput::Search(line),
    }
}

/// Drive `fetch` to completion, printing the loading line when it starts
async fn with_progress<T, W: Write>(
    rx: &mut watch::Receiver<FetchState>,
    out: &mut W,
    fetch: impl Future<Output = T>,
) -> std::io::Result<T> {
    tokio::pin!(fetch);
    loop {
        tokio::select! {
            result = &mut fetch => return Ok(result),
            changed = rx.changed() => {
                if changed.is_err() {
                    return Ok(fetch.await);
                }
                if rx.borrow_and_update().loading {
                    writeln!(out, "{LOADING_LINE}")?;
                    out.flush()?;
                }
            }
        }
    }
}

fn render<W: Write>(service: &WeatherLookupService, out: &mut W) -> std::io::Result<()> {
    let view = format_fetch_state(&service.snapshot());
    if !view.is_empty() {
        writeln!(out, "{view}")?;
    }
    writeln!(out)?;
    Ok(())
}

/// Run a session until `:quit` or end of input
pub async fn run<R, W>(service: &WeatherLookupService, input: R, out: &mut W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut rx = service.subscribe();

    with_progress(&mut rx, out, service.initial_load()).await?;
    render(service, out)?;

    let mut lines = input.lines();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            debug!("End of input");
            break;
        };

        match parse_input(&line) {
            SessionInput::Quit => break,
            SessionInput::ToggleUnits => {
                with_progress(&mut rx, out, service.toggle_unit()).await?;
                render(service, out)?;
            },
            SessionInput::Unknown(cmd) => {
                writeln!(out, "Unknown command: {cmd}")?;
            },
            SessionInput::Search(city) => {
                match with_progress(&mut rx, out, service.search(city)).await? {
                    Ok(_) => render(service, out)?,
                    Err(ApplicationError::Domain(e)) => writeln!(out, "{e}")?,
                    Err(e) => return Err(e.into()),
                }
            },
        }
    }

    Ok(())
}
