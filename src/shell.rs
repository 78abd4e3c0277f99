// src/shell.rs

use crate::error::InvoiceError;
use crate::invoice::{DraftField, HeaderField};
use crate::labels::Language;
use crate::session::{FormSession, SubmissionReport};
use std::io::{self, Write};
use std::str::FromStr;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

const HELP: &str = "\
commands:
  lang en|he                 switch language (and text direction)
  set <field> <value>        e.g. set businessName Acme Ltd (empty value clears optional fields)
  item name|qty|price <v>    edit the draft line
  add                        add the draft line to the invoice
  total <amount>             set the total by hand (only while there are no items)
  show                       print the form
  submit                     render the PDF
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Lang(Language),
    Set(HeaderField, String),
    Item(DraftField, String),
    Add,
    Total(String),
    Show,
    Submit,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("{0}")]
    Language(String),

    #[error(transparent)]
    Invoice(#[from] InvoiceError),
}

/// Split off the first word; the rest keeps its inner spacing.
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (verb, rest) = split_word(line);
        let command = match verb {
            "lang" => Command::Lang(rest.parse().map_err(CommandError::Language)?),
            "set" => {
                let (field, value) = split_word(rest);
                if field.is_empty() {
                    return Err(CommandError::MissingArgument("set"));
                }
                Command::Set(field.parse()?, value.to_string())
            }
            "item" => {
                let (field, value) = split_word(rest);
                if field.is_empty() {
                    return Err(CommandError::MissingArgument("item"));
                }
                Command::Item(field.parse()?, value.to_string())
            }
            "add" => Command::Add,
            "total" => Command::Total(rest.to_string()),
            "show" => Command::Show,
            "submit" => Command::Submit,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

/// Apply one command. Returns the text to print, or `None` to stop.
pub async fn execute(session: &mut FormSession, command: Command) -> Option<String> {
    let reply = match command {
        Command::Lang(language) => {
            session.set_language(language);
            session.render()
        }
        Command::Set(field, value) => {
            session.update_field(field, &value);
            format!("{} {}", session.language().labels().field(field), value)
        }
        Command::Item(field, raw) => match session.update_draft_item(field, &raw) {
            Ok(()) => "ok".to_string(),
            Err(e) => format!("rejected: {e}"),
        },
        Command::Add => match session.commit_draft_item() {
            Ok(item) => {
                let labels = session.language().labels();
                format!(
                    "{}: {} - {} x ₪{:.2}\n{} ₪{:.2}",
                    labels.add_item,
                    item.name,
                    item.quantity,
                    item.unit_price,
                    labels.total_amount,
                    session.model().invoice().total_amount()
                )
            }
            Err(e) => format!("error: {e}"),
        },
        Command::Total(raw) => match session.override_total(&raw) {
            Ok(()) => format!(
                "{} ₪{:.2}",
                session.language().labels().total_amount,
                session.model().invoice().total_amount()
            ),
            Err(e) => format!("error: {e}"),
        },
        Command::Show => session.render(),
        Command::Submit => match session.submit().await {
            SubmissionReport::Saved(submission) => format!(
                "{}: saved {} ({} bytes)",
                session.language().labels().generate_pdf,
                submission.path.display(),
                submission.bytes
            ),
            SubmissionReport::Failed(banner) => banner,
        },
        Command::Help => HELP.to_string(),
        Command::Quit => return None,
    };
    Some(reply)
}

/// Read commands line by line until EOF or `quit`.
pub async fn run<R, W>(session: &mut FormSession, input: R, out: &mut W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    writeln!(out, "{}", session.render())?;

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        debug!(line, "Command");

        match line.parse::<Command>() {
            Ok(command) => match execute(session, command).await {
                Some(reply) => writeln!(out, "{reply}")?,
                None => break,
            },
            Err(e) => writeln!(out, "{e}")?,
        }
    }

    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_parse_commands() {
        assert_eq!("lang he".parse::<Command>(), Ok(Command::Lang(Language::He)));
        assert_eq!(
            "set businessName  Acme  Ltd ".parse::<Command>(),
            Ok(Command::Set(HeaderField::BusinessName, "Acme  Ltd".to_string()))
        );
        assert_eq!(
            "set deliveryNoteNumber".parse::<Command>(),
            Ok(Command::Set(HeaderField::DeliveryNoteNumber, String::new()))
        );
        assert_eq!(
            "item price 12.50".parse::<Command>(),
            Ok(Command::Item(DraftField::UnitPrice, "12.50".to_string()))
        );
        assert_eq!("add".parse::<Command>(), Ok(Command::Add));
        assert_eq!("quit".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "launch".parse::<Command>(),
            Err(CommandError::Unknown("launch".to_string()))
        );
        assert_eq!("set".parse::<Command>(), Err(CommandError::MissingArgument("set")));
        assert!(matches!(
            "set vat 17".parse::<Command>(),
            Err(CommandError::Invoice(InvoiceError::UnknownField(_)))
        ));
        assert!(matches!("lang fr".parse::<Command>(), Err(CommandError::Language(_))));
    }

    #[tokio::test]
    async fn test_scripted_session() {
        let script = "\
set businessName Acme
item name Widget
item qty 3
item price 10.00
add
item name Gadget
item qty 2
item price 12.999
item price 5.50
add
total 1.00
show
quit
set businessName Ignored
";
        let mut session = FormSession::new(&Config::default());
        let mut out = Vec::new();

        run(&mut session, script.as_bytes(), &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("rejected: unit price"));
        assert!(text.contains("error: total is computed from 2 item(s)"));
        assert!(text.contains("Total Amount: ₪41.00"));
        assert!(text.contains("Business Name: Acme\n"));
        assert_eq!(session.model().invoice().items().len(), 2);
        assert_eq!(
            session.model().invoice().field(HeaderField::BusinessName),
            Some("Acme")
        );
    }
}
