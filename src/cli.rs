//! Interactive text menu.
//!
//! Reads lines from any [`BufRead`] and writes prompts to any [`Write`], so the
//! same loop drives the terminal in `main` and scripted input in tests. Bad
//! input is reported and re-prompted; end of input ends the session normally.

use std::io::{BufRead, Write};

use crate::error::Error;
use crate::service::BoxOffice;

/// Menu entries, numbered as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// `1` -- list the catalog.
    ListEvents,
    /// `2` -- buy a ticket by catalog position.
    BuyTicket,
    /// `3` -- list the user's tickets.
    ListMyTickets,
    /// `4` -- leave the program.
    Exit,
}

impl MenuChoice {
    /// Map one line of input to a menu entry. Returns `None` for anything else.
    pub fn parse(input: &str) -> Option<MenuChoice> {
        match input.trim().parse::<u32>().ok()? {
            1 => Some(MenuChoice::ListEvents),
            2 => Some(MenuChoice::BuyTicket),
            3 => Some(MenuChoice::ListMyTickets),
            4 => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

const MENU: &str = "1. Show events\n2. Buy ticket\n3. Show my tickets\n4. Exit\n\nChoose an option: ";

/// Read one line, without its line terminator. `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>, Error> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Write `prompt` without a newline and flush so it shows before input.
fn prompt<W: Write>(output: &mut W, prompt: &str) -> Result<(), Error> {
    output.write_all(prompt.as_bytes())?;
    output.flush()?;
    Ok(())
}

/// Run one interactive session to completion.
///
/// Asks for an email until a non-empty one is given, signs the user in, then
/// serves the menu until `4` or end of input.
///
/// # Errors
///
/// Returns [`Error::Io`] if reading input or writing output fails.
/// Returns [`Error::Persistence`] if a new account cannot be saved at sign-in.
/// Failures inside menu actions are printed and the loop continues.
pub fn run<R: BufRead, W: Write>(
    office: &mut BoxOffice,
    input: &mut R,
    output: &mut W,
) -> Result<(), Error> {
    let email = loop {
        prompt(output, "Enter your email address: ")?;
        match read_line(input)? {
            None => return Ok(()),
            Some(line) if line.trim().is_empty() => continue,
            Some(line) => break line.trim().to_string(),
        }
    };

    let (mut session, status) = office.sign_in(&email)?;
    writeln!(output, "{}", status.message())?;

    loop {
        prompt(output, MENU)?;
        let Some(line) = read_line(input)? else {
            break;
        };

        match MenuChoice::parse(&line) {
            Some(MenuChoice::ListEvents) => {
                if office.catalog().is_empty() {
                    writeln!(output, "No events available.")?;
                }
                for entry in office.catalog().render() {
                    writeln!(output, "{entry}")?;
                }
            }
            Some(MenuChoice::BuyTicket) => {
                prompt(output, "Enter the number of the event to buy a ticket for: ")?;
                let Some(line) = read_line(input)? else {
                    break;
                };
                let Ok(position) = line.trim().parse::<i64>() else {
                    writeln!(output, "Invalid index! Please try again.")?;
                    continue;
                };
                match office.purchase(&mut session, position) {
                    Ok(event) => writeln!(
                        output,
                        "Ticket purchased successfully for event: {}",
                        event.name()
                    )?,
                    Err(Error::IndexOutOfRange { .. }) => {
                        writeln!(output, "Invalid index! Please try again.")?
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "purchase failed");
                        writeln!(output, "Error: {e}")?;
                    }
                }
            }
            Some(MenuChoice::ListMyTickets) => {
                let tickets = office.my_tickets(session.email());
                if tickets.is_empty() {
                    writeln!(output, "You have no tickets.")?;
                    continue;
                }
                writeln!(output, "Your tickets:")?;
                for ticket in tickets {
                    match ticket {
                        Ok(event) => writeln!(output, "- {}", event.name())?,
                        Err(e) => writeln!(output, "Error: {e}")?,
                    }
                }
            }
            Some(MenuChoice::Exit) => {
                writeln!(output, "Exiting the program.")?;
                break;
            }
            None => writeln!(output, "Invalid option. Please try again.")?,
        }
    }

    Ok(())
}
