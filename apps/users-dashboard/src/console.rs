//! Line-oriented front end: command parsing, screen rendering and toasts.

use std::fmt::Write as _;

use anyhow::{anyhow, bail, Result};

use users_dashboard::domain::form::{FieldError, FormField, FormInput};
use users_dashboard::domain::ports::Notifier;
use users_dashboard::domain::view::{DashboardScreen, FormState, ScreenBody};
use users_dashboard::infra::TracingNotifier;

pub const HELP: &str = "\
Commands:
  list                                   redraw the current page
  next | prev                            change page
  add                                    open the form for a new user
  edit <id>                              open the form on an existing user
  save <name> | <email> | <department>   submit the open form
  cancel                                 close the form
  delete <id>                            delete a user
  reload                                 fetch the list again
  help                                   show this text
  quit                                   leave";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Next,
    Prev,
    Add,
    Edit(u64),
    Save(FormInput),
    Cancel,
    Delete(u64),
    Reload,
    Help,
    Quit,
}

/// Parse one line. Blank lines redraw the table.
pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "" | "list" | "ls" => Command::List,
        "next" | "n" => Command::Next,
        "prev" | "p" => Command::Prev,
        "add" => Command::Add,
        "edit" => Command::Edit(parse_id(rest)?),
        "delete" | "del" => Command::Delete(parse_id(rest)?),
        "save" => Command::Save(parse_form(rest)?),
        "cancel" => Command::Cancel,
        "reload" => Command::Reload,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("Unknown command '{other}', type 'help'"),
    };
    Ok(command)
}

fn parse_id(raw: &str) -> Result<u64> {
    if raw.is_empty() {
        bail!("Missing user id");
    }
    raw.parse()
        .map_err(|_| anyhow!("Invalid user id '{raw}'"))
}

fn parse_form(raw: &str) -> Result<FormInput> {
    let mut fields = raw.split('|').map(str::trim);
    let name = fields.next().unwrap_or_default();
    let email = fields
        .next()
        .ok_or_else(|| anyhow!("Expected: save <name> | <email> | <department>"))?;
    let department = fields.next().unwrap_or_default();
    if fields.next().is_some() {
        bail!("Too many fields, expected: save <name> | <email> | <department>");
    }
    Ok(FormInput::new(name, email, department))
}

fn field_label(field: FormField) -> &'static str {
    match field {
        FormField::Name => "name",
        FormField::Email => "email",
        FormField::Department => "department",
    }
}

pub fn render_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("  {}: {}", field_label(e.field), e.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Draw the screen as plain text.
pub fn render_screen(screen: &DashboardScreen) -> String {
    let mut out = String::new();

    match &screen.body {
        ScreenBody::Loading => out.push_str("Loading...\n"),
        ScreenBody::Table(page) => {
            let _ = writeln!(
                out,
                "{:>14}  {:<12} {:<14} {:<28} {}",
                "ID", "First name", "Last name", "Email", "Department"
            );
            if page.items.is_empty() {
                out.push_str("  (no users)\n");
            }
            for row in &page.items {
                let _ = writeln!(
                    out,
                    "{:>14}  {:<12} {:<14} {:<28} {}",
                    row.id,
                    row.first_name,
                    row.last_name.as_deref().unwrap_or(""),
                    row.email,
                    row.department
                );
            }
        }
    }

    let _ = write!(out, "Page {}", screen.page);
    if screen.has_prev {
        out.push_str("  [prev]");
    }
    if screen.has_next {
        out.push_str("  [next]");
    }
    out.push('\n');

    match &screen.form {
        FormState::Closed => {}
        FormState::Creating => out.push_str("Form open: new user (save <name> | <email> | <department>)\n"),
        FormState::Editing(user) => {
            let _ = writeln!(
                out,
                "Form open: editing {} ({} | {} | {})",
                user.id,
                user.name,
                user.email,
                user.department.as_deref().unwrap_or("")
            );
        }
    }

    out
}

/// Prints toasts to stdout and forwards them to the log
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    log: TracingNotifier,
}

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        println!("[ok] {message}");
        self.log.success(message);
    }

    fn error(&self, message: &str) {
        println!("[error] {message}");
        self.log.error(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use users_dashboard::contract::model::UserRecord;
    use users_dashboard::domain::view::{paginate, UserRow};

    #[test]
    fn parses_simple_commands() {
        assert_eq!(parse_command("list").unwrap(), Command::List);
        assert_eq!(parse_command("").unwrap(), Command::List);
        assert_eq!(parse_command("  NEXT ").unwrap(), Command::Next);
        assert_eq!(parse_command("prev").unwrap(), Command::Prev);
        assert_eq!(parse_command("add").unwrap(), Command::Add);
        assert_eq!(parse_command("cancel").unwrap(), Command::Cancel);
        assert_eq!(parse_command("reload").unwrap(), Command::Reload);
        assert_eq!(parse_command("quit").unwrap(), Command::Quit);
    }

    #[test]
    fn parses_ids() {
        assert_eq!(parse_command("edit 3").unwrap(), Command::Edit(3));
        assert_eq!(
            parse_command("delete 1700000000000").unwrap(),
            Command::Delete(1_700_000_000_000)
        );
        assert!(parse_command("edit").is_err());
        assert!(parse_command("delete abc").is_err());
    }

    #[test]
    fn parses_save_fields() {
        assert_eq!(
            parse_command("save Ada Lovelace | ada@x.com | Eng").unwrap(),
            Command::Save(FormInput::new("Ada Lovelace", "ada@x.com", "Eng"))
        );
        // department left for the form rules to reject
        assert_eq!(
            parse_command("save Ada | ada@x.com").unwrap(),
            Command::Save(FormInput::new("Ada", "ada@x.com", ""))
        );
        assert!(parse_command("save Ada").is_err());
        assert!(parse_command("save a | b | c | d").is_err());
    }

    #[test]
    fn unknown_command_is_error() {
        let err = parse_command("frobnicate").unwrap_err();
        assert!(err.to_string().contains("frobnicate"));
    }

    #[test]
    fn renders_table_and_navigation() {
        let users = vec![
            UserRecord::new(1, "Ada Lovelace", "ada@x.com").with_department("Eng"),
            UserRecord::new(2, "Plato", "plato@x.com"),
        ];
        let page = paginate(&users, 1, 1).map_items(|u| UserRow::from(&u));
        let screen = DashboardScreen {
            body: ScreenBody::Table(page),
            page: 1,
            has_prev: false,
            has_next: true,
            form: FormState::Creating,
        };

        let text = render_screen(&screen);

        assert!(text.contains("Ada"));
        assert!(text.contains("Lovelace"));
        assert!(!text.contains("Plato"));
        assert!(text.contains("Page 1  [next]"));
        assert!(!text.contains("[prev]"));
        assert!(text.contains("Form open: new user"));
    }

    #[test]
    fn renders_loading_instead_of_table() {
        let screen = DashboardScreen {
            body: ScreenBody::Loading,
            page: 1,
            has_prev: false,
            has_next: false,
            form: FormState::Closed,
        };

        let text = render_screen(&screen);

        assert!(text.starts_with("Loading..."));
        assert!(!text.contains("Email"));
    }

    #[test]
    fn field_errors_are_labelled() {
        let errors = vec![FieldError {
            field: FormField::Email,
            message: "Invalid email address",
        }];
        assert_eq!(render_field_errors(&errors), "  email: Invalid email address");
    }
}
