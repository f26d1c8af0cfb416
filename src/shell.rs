//! Interactive terminal host for the roster client.
//!
//! Reads one command per line from stdin and prints the document after every change.
//! Confirmations use an interactive prompt on a terminal and the next input line otherwise.

use anyhow::{Context, Result};
use async_trait::async_trait;
use roster_api_client::{Config, RosterSession};
use std::fmt;
use std::io::{IsTerminal as _, Write as _};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use crate::banner::OutcomeMessage;
use crate::cli::Args;
use crate::controller::{Command, Confirm};
use crate::settings::Settings;
use crate::view::{Document, Element, Node};
use crate::App;

type Input = Rc<Mutex<Lines<BufReader<Stdin>>>>;

const HELP: &str = "\
commands:
  list                              show the roster
  reload                            fetch the roster again
  signup <email> <activity>         sign an email up for an activity
  remove <n>                        unregister the participant numbered <n>
  unregister <email> <activity>     unregister an email from an activity
  message                           show the current notification
  html <path>                       write the page as HTML
  help                              show this help
  quit                              leave";

/// Yes/no questions for the user
///
/// On a terminal the question is asked through [`dialoguer::Confirm`]. When stdin is piped, the
/// answer is read as the next input line, shared with the command loop.
pub struct Prompt {
    input: Input,
    interactive: bool,
}

impl Prompt {
    fn new(input: Input) -> Self {
        Self {
            input,
            interactive: std::io::stdin().is_terminal(),
        }
    }

    async fn ask_terminal(question: &str) -> bool {
        let question = question.to_owned();

        let answer = tokio::task::spawn_blocking(move || {
            dialoguer::Confirm::new()
                .with_prompt(question)
                .default(false)
                .interact()
        })
        .await;

        match answer {
            Ok(Ok(yes)) => yes,
            Ok(Err(e)) => {
                log::warn!("Failed to read confirmation: {}", e);
                false
            }
            Err(e) => {
                log::warn!("Confirmation prompt aborted: {}", e);
                false
            }
        }
    }

    async fn ask_line(&self, question: &str) -> bool {
        print!("{} [y/N] ", question);
        flush_stdout();

        match self.input.lock().await.next_line().await {
            Ok(Some(answer)) => is_yes(&answer),
            Ok(None) => false,
            Err(e) => {
                log::warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }
}

#[async_trait(?Send)]
impl Confirm for Prompt {
    async fn confirm(&self, question: &str) -> bool {
        if self.interactive {
            Self::ask_terminal(question).await
        } else {
            self.ask_line(question).await
        }
    }
}

/// Anything but an explicit yes declines
fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    Empty,
    List,
    Reload,
    Signup { email: String, activity: String },
    Remove(usize),
    Unregister { email: String, activity: String },
    Message,
    Html(PathBuf),
    Help,
    Quit,
}

/// Parses one input line, on error the returned string explains the expected usage
fn parse_line(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let email_and_activity = |usage: &str| match rest.split_once(char::is_whitespace) {
        Some((email, activity)) if !activity.trim().is_empty() => {
            Ok((email.to_owned(), activity.trim().to_owned()))
        }
        _ => Err(format!("usage: {}", usage)),
    };

    let command = match word {
        "" => ShellCommand::Empty,
        "list" | "ls" => ShellCommand::List,
        "reload" => ShellCommand::Reload,
        "signup" => {
            let (email, activity) = email_and_activity("signup <email> <activity>")?;
            ShellCommand::Signup { email, activity }
        }
        "unregister" => {
            let (email, activity) = email_and_activity("unregister <email> <activity>")?;
            ShellCommand::Unregister { email, activity }
        }
        "remove" | "rm" => match rest.parse::<usize>() {
            Ok(n) if n > 0 => ShellCommand::Remove(n),
            _ => return Err("usage: remove <n>, see the numbers in `list`".into()),
        },
        "message" => ShellCommand::Message,
        "html" if !rest.is_empty() => ShellCommand::Html(PathBuf::from(rest)),
        "html" => return Err("usage: html <path>".into()),
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        unknown => return Err(format!("unknown command `{}`, try `help`", unknown)),
    };

    Ok(command)
}

/// Creates the client from the settings and runs it until stdin closes or the user quits
///
/// Must be called from within a [`tokio::task::LocalSet`].
pub async fn start(args: &Args, settings: &Settings) -> Result<()> {
    let config = Rc::new(Config {
        base_url: settings.api.base_url.clone(),
        timeout: settings.api.timeout(),
    });

    let session = RosterSession::new(config).context("Failed to create HTTP client")?;

    let input: Input = Rc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()));

    let app = App::new(
        Rc::new(session),
        Box::new(Prompt::new(input.clone())),
        settings.banner.hide_after(),
    );

    log::info!("Loading roster from {}", settings.api.base_url);
    app.load().await;

    if let Some(path) = &args.snapshot {
        return write_html(&app, path);
    }

    print_document(&app.document());

    run(&app, input).await
}

async fn run(app: &App, input: Input) -> Result<()> {
    loop {
        print!("> ");
        flush_stdout();

        let line = input.lock().await.next_line().await?;

        let line = match line {
            Some(line) => line,
            None => break,
        };

        match parse_line(&line) {
            Ok(ShellCommand::Quit) => break,
            Ok(command) => execute(app, command).await?,
            Err(usage) => println!("{}", usage),
        }
    }

    Ok(())
}

async fn execute(app: &App, command: ShellCommand) -> Result<()> {
    match command {
        ShellCommand::Empty | ShellCommand::Quit => {}
        ShellCommand::List => print_document(&app.document()),
        ShellCommand::Reload => {
            app.load().await;
            print_document(&app.document());
        }
        ShellCommand::Signup { email, activity } => {
            app.fill_signup_form(&email, &activity);

            let form = app.document().signup_form.clone();
            let outcome = app
                .dispatch(Command::Signup {
                    activity: form.activity,
                    email: form.email,
                })
                .await;

            report(app, outcome);
        }
        ShellCommand::Remove(n) => {
            let control = app.document().removal_controls().into_iter().nth(n - 1);

            match control {
                Some(command) => {
                    let outcome = app.dispatch(command).await;
                    report(app, outcome);
                }
                None => println!("there is no participant numbered {}", n),
            }
        }
        ShellCommand::Unregister { email, activity } => {
            let outcome = app.dispatch(Command::Unregister { activity, email }).await;
            report(app, outcome);
        }
        ShellCommand::Message => match app.document().message.visible() {
            Some(message) => println!("{}", format_message(message)),
            None => println!("(no message)"),
        },
        ShellCommand::Html(path) => write_html(app, &path)?,
        ShellCommand::Help => println!("{}", HELP),
    }

    Ok(())
}

fn report(app: &App, outcome: Option<OutcomeMessage>) {
    match outcome {
        // the banner is part of the printed document
        Some(_) => print_document(&app.document()),
        None => println!("cancelled"),
    }
}

fn write_html(app: &App, path: &Path) -> Result<()> {
    let html = app.document().to_html();

    std::fs::write(path, html).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Wrote page to {}", path.display());

    Ok(())
}

fn format_message(message: &OutcomeMessage) -> String {
    format!("[{}] {}", message.kind.as_class(), message.text)
}

fn flush_stdout() {
    if let Err(e) = std::io::stdout().flush() {
        log::warn!("Failed to flush stdout: {}", e);
    }
}

fn print_document(document: &Document) {
    let mut out = String::new();

    match write_document(document, &mut out) {
        Ok(()) => print!("{}", out),
        Err(e) => log::error!("Failed to format document: {}", e),
    }
}

/// Plain text view of the document
///
/// Participants are numbered in document order, the numbers match
/// [`Document::removal_controls`].
fn write_document(document: &Document, out: &mut impl fmt::Write) -> fmt::Result {
    let mut control = 0;

    for node in &document.activities_list.children {
        match node {
            Node::Element(card) if card.has_class("activity-card") => {
                write_card(card, &mut control, out)?
            }
            other => writeln!(out, "{}", other.text_content())?,
        }
    }

    let options = document.activity_options();
    if !options.is_empty() {
        writeln!(out, "\nactivities: {}", options.join(" | "))?;
    }

    if let Some(message) = document.message.visible() {
        writeln!(out, "{}", format_message(message))?;
    }

    Ok(())
}

fn write_card(card: &Element, control: &mut usize, out: &mut impl fmt::Write) -> fmt::Result {
    for child in card.child_elements() {
        match child.tag {
            "h4" => writeln!(out, "\n== {} ==", child.text_content())?,
            "div" if child.has_class("participants-section") => {
                for part in child.child_elements() {
                    if part.tag == "h5" {
                        writeln!(out, "  {}", part.text_content())?;
                        continue;
                    }

                    for item in part.child_elements() {
                        *control += 1;

                        let badge = item
                            .find_all(&|e| e.has_class("participant-badge"))
                            .first()
                            .map(|badge| badge.text_content())
                            .unwrap_or_default();

                        writeln!(
                            out,
                            "    [{}] {} <{}>",
                            control,
                            badge,
                            item.attribute("title").unwrap_or_default()
                        )?;
                    }
                }
            }
            _ => writeln!(out, "  {}", child.text_content())?,
        }
    }

    Ok(())
}
