//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `phonebook_core` linkage and the configured local storage.
//! - Drive the phonebook UI events from the command line.
//! - Keep output deterministic `key=value` lines for quick sanity checks.
//!
//! # Usage
//! - `phonebook_cli` or `phonebook_cli list [filter]`
//! - `phonebook_cli add <name> <number>`
//! - `phonebook_cli delete <id>`

use phonebook_core::db::open_db;
use phonebook_core::{
    init_logging, EventOutcome, FormClearPolicy, FormField, LogNotifier, PhonebookApp,
    PhonebookConfig, PhonebookEvent, RepoError, SqliteContactRepository, SqliteLocalStorage,
    SubmitRejection,
};
use rusqlite::Connection;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = PhonebookConfig::from_env();
    let log_dir = config.log_dir.to_string_lossy();
    if let Err(err) = init_logging(&config.log_level, &log_dir) {
        eprintln!("logging disabled: {err}");
    }

    println!("phonebook_core ping={}", phonebook_core::ping());
    println!("phonebook_core version={}", phonebook_core::core_version());
    println!("db_path={}", config.db_path.display());
    println!("log_dir={}", config.log_dir.display());
    println!("form_clear={}", config.form_clear_policy.as_str());

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("storage open failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut stdout = std::io::stdout().lock();
    match run(&conn, config.form_clear_policy, &args, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug)]
enum CliError {
    Usage(String),
    Repo(RepoError),
    Io(std::io::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usage(message) => write!(f, "usage: {message}"),
            Self::Repo(err) => write!(f, "storage failed: {err}"),
            Self::Io(err) => write!(f, "output failed: {err}"),
        }
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Runs one command against an open storage connection.
fn run(
    conn: &Connection,
    clear_policy: FormClearPolicy,
    args: &[String],
    out: &mut impl Write,
) -> Result<(), CliError> {
    let repo = SqliteContactRepository::new(SqliteLocalStorage::new(conn));
    let mut app = PhonebookApp::new(repo, LogNotifier, clear_policy);
    writeln!(out, "contacts={}", app.store().len())?;

    match args {
        [] => Ok(()),
        [cmd, rest @ ..] if cmd == "list" => {
            let filter = match rest {
                [] => String::new(),
                [filter] => filter.clone(),
                _ => return Err(CliError::Usage("list [filter]".to_string())),
            };
            app.dispatch(PhonebookEvent::ChangeFilter(filter))?;
            let view = app.view();
            if let Some(message) = view.empty_message() {
                writeln!(out, "empty={message}")?;
            }
            for contact in &view.items {
                writeln!(
                    out,
                    "contact id={} name={} number={}",
                    contact.id, contact.name, contact.number
                )?;
            }
            Ok(())
        }
        [cmd, name, number] if cmd == "add" => {
            app.dispatch(PhonebookEvent::ChangeField(FormField::Name, name.clone()))?;
            app.dispatch(PhonebookEvent::ChangeField(FormField::Number, number.clone()))?;
            match app.dispatch(PhonebookEvent::SubmitContact)? {
                EventOutcome::ContactAdded(contact) => {
                    writeln!(out, "added id={} number={}", contact.id, contact.number)?;
                }
                EventOutcome::SubmitRejected(SubmitRejection::DuplicateName(_)) => {
                    writeln!(out, "rejected reason=duplicate_name")?;
                }
                EventOutcome::SubmitRejected(SubmitRejection::Validation(err)) => {
                    writeln!(out, "rejected reason=validation error={err}")?;
                }
                other => writeln!(out, "unexpected outcome={other:?}")?,
            }
            writeln!(
                out,
                "draft_name={} draft_number={}",
                app.form().name(),
                app.form().number()
            )?;
            Ok(())
        }
        [cmd, id] if cmd == "delete" => {
            match app.dispatch(PhonebookEvent::DeleteContact(id.clone()))? {
                EventOutcome::ContactDeleted(id) => writeln!(out, "deleted id={id}")?,
                _ => writeln!(out, "not_found id={id}")?,
            }
            Ok(())
        }
        _ => Err(CliError::Usage(
            "list [filter] | add <name> <number> | delete <id>".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::{run, CliError};
    use phonebook_core::db::open_db_in_memory;
    use phonebook_core::{FormClearPolicy, EMPTY_LIST_MESSAGE};
    use rusqlite::Connection;

    fn run_lines(
        conn: &Connection,
        policy: FormClearPolicy,
        args: &[&str],
    ) -> Vec<String> {
        let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
        let mut out = Vec::new();
        run(conn, policy, &args, &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn add_then_list_uses_stored_contacts() {
        let conn = open_db_in_memory().unwrap();

        let added = run_lines(&conn, FormClearPolicy::Always, &["add", "Ann", "1234567"]);
        assert_eq!(added[0], "contacts=0");
        assert!(added[1].starts_with("added id="));
        assert!(added[1].ends_with("number=123-45-67"));

        let listed = run_lines(&conn, FormClearPolicy::Always, &["list", "AN"]);
        assert_eq!(listed[0], "contacts=1");
        assert!(listed[1].contains("name=Ann"));
    }

    #[test]
    fn configured_clear_policy_decides_rejected_draft() {
        let conn = open_db_in_memory().unwrap();
        run_lines(&conn, FormClearPolicy::Always, &["add", "Ann", "1234567"]);

        let cleared = run_lines(&conn, FormClearPolicy::Always, &["add", "ann", "7654321"]);
        assert_eq!(cleared[1], "rejected reason=duplicate_name");
        assert_eq!(cleared[2], "draft_name= draft_number=");

        let kept = run_lines(&conn, FormClearPolicy::OnSuccess, &["add", "ann", "7654321"]);
        assert_eq!(kept[1], "rejected reason=duplicate_name");
        assert_eq!(kept[2], "draft_name=ann draft_number=765-43-21");
    }

    #[test]
    fn delete_and_empty_list_report_state() {
        let conn = open_db_in_memory().unwrap();
        let missing = run_lines(&conn, FormClearPolicy::Always, &["delete", "nope"]);
        assert_eq!(missing[1], "not_found id=nope");

        let listed = run_lines(&conn, FormClearPolicy::Always, &["list"]);
        assert_eq!(listed[0], "contacts=0");
        assert_eq!(listed[1], format!("empty={EMPTY_LIST_MESSAGE}"));
    }

    #[test]
    fn unknown_command_is_a_usage_error() {
        let conn = open_db_in_memory().unwrap();
        let args = vec!["rename".to_string()];
        let err = run(&conn, FormClearPolicy::Always, &args, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
    }
}
