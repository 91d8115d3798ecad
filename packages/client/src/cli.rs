//! Terminal front end.
//!
//! A rustyline reader thread feeds lines into the async loop, which also
//! listens to the live message feed and the notice board. A terminal error
//! replaces the site with an error screen offering `/reload`.

use std::{borrow::Cow, sync::Arc};

use coachdesk_server::domain::Record;
use futures_util::StreamExt;
use rustyline::{
    Context, Editor, Helper,
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    backend::{Backend, LocalBackend, RemoteBackend, SnapshotStream},
    chat::{ChatRelay, ChatRole},
    config::{ClientArgs, ConfigSource, SiteConfig, StoreConfig, default_sources},
    error::ClientError,
    session::{SessionBootstrapper, SessionHandle},
    store::MESSAGES,
    view::{
        BOOKING_FORM_URL, CHAT_GREETING, ChatPanel, ContactForm, ContactSubmission,
        MessageComposer, NoticeBoard, NoticeKind, Tab, render_lines,
    },
};

const COMMANDS: [&str; 12] = [
    "/help", "/tabs", "/tab", "/book", "/send", "/delete", "/contact", "/ask", "/whoami",
    "/messages", "/reload", "/quit",
];

const HELP: &str = "\
Commands:
  /tabs                    list sections
  /tab <section>           open a section
  /book                    show the booking form link
  /send <text>             post to the message board
  /delete <n>              delete your message number n
  /contact name | email | message
                           send the contact form
  /ask <question>          ask the chat assistant
  /messages                show the message board
  /whoami                  show your user id
  /reload                  start over
  /quit                    exit
Plain text goes to the open section (messages, contact or chat).";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to open the terminal: {0}")]
    Terminal(#[from] ReadlineError),
}

/// Line completion for slash commands
struct CommandHelper;

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return Ok((0, vec![]));
        }
        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return None;
        }
        COMMANDS
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Highlighter for CommandHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[2m{hint}\x1b[0m"))
    }
}

impl Validator for CommandHelper {}

enum Input {
    Line(String),
    Quit,
}

/// Read lines on a dedicated thread; rustyline blocks
fn spawn_reader() -> Result<mpsc::UnboundedReceiver<Input>, CliError> {
    let (ready_tx, ready_rx) = std::sync::mpsc::channel();
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        let mut editor = match Editor::<CommandHelper, DefaultHistory>::new() {
            Ok(editor) => editor,
            Err(e) => {
                let _ = ready_tx.send(Err(e));
                return;
            }
        };
        editor.set_helper(Some(CommandHelper));
        let _ = ready_tx.send(Ok(()));

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    if let Err(e) = editor.add_history_entry(line.as_str()) {
                        tracing::debug!("History not updated: {}", e);
                    }
                    if tx.send(Input::Line(line)).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                    let _ = tx.send(Input::Quit);
                    break;
                }
                Err(e) => {
                    tracing::error!("Terminal read failed: {}", e);
                    let _ = tx.send(Input::Quit);
                    break;
                }
            }
        }
    });

    match ready_rx.recv() {
        Ok(Ok(())) => Ok(rx),
        Ok(Err(e)) => Err(CliError::Terminal(e)),
        Err(_) => Err(CliError::Terminal(ReadlineError::Eof)),
    }
}

/// What to do after a screen ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Next {
    Reload,
    Quit,
}

/// Store used with `--offline` when no other source configures one
fn offline_config() -> SiteConfig {
    SiteConfig {
        store: StoreConfig {
            endpoint: "memory://offline".to_string(),
            ..Default::default()
        },
        app_id: "coachdesk-offline".to_string(),
        ..Default::default()
    }
}

fn sources(args: &ClientArgs) -> Vec<ConfigSource> {
    let mut sources = default_sources(args.host_config.clone());
    if args.offline {
        sources.push(ConfigSource::fixed("offline", offline_config()));
    }
    sources
}

fn backend(args: &ClientArgs) -> Arc<dyn Backend> {
    if args.offline {
        return Arc::new(LocalBackend::in_memory());
    }
    match &args.session_file {
        Some(path) => Arc::new(RemoteBackend::with_session_cache(path.clone())),
        None => Arc::new(RemoteBackend::new()),
    }
}

/// Run the terminal front end until the visitor quits
pub async fn run(args: ClientArgs) -> Result<(), CliError> {
    let backend = backend(&args);
    let mut input = spawn_reader()?;

    loop {
        println!("Loading... connecting and signing in.");
        let bootstrapper = SessionBootstrapper::new(sources(&args), backend.clone());
        let mut handle = bootstrapper.initialize().await;
        let session = handle.settled().await;

        let next = match session.error.filter(ClientError::is_terminal) {
            Some(error) => error_screen(&error, &mut input).await,
            None => Site::new(handle).run(&mut input).await,
        };
        if next == Next::Quit {
            return Ok(());
        }
    }
}

async fn error_screen(error: &ClientError, input: &mut mpsc::UnboundedReceiver<Input>) -> Next {
    println!();
    println!("  Something went wrong");
    println!("  {error}");
    println!();
    println!("  Type /reload to try again or /quit to exit.");

    loop {
        match input.recv().await {
            Some(Input::Line(line)) => match line.trim() {
                "/reload" => return Next::Reload,
                "/quit" | "/exit" => return Next::Quit,
                _ => println!("Type /reload or /quit."),
            },
            Some(Input::Quit) | None => return Next::Quit,
        }
    }
}

enum Event {
    Input(Option<Input>),
    Snapshot(Option<Result<Vec<Record>, ClientError>>),
    Notice,
}

async fn next_snapshot(
    feed: &mut Option<SnapshotStream>,
) -> Option<Result<Vec<Record>, ClientError>> {
    match feed {
        Some(stream) => stream.next().await,
        None => std::future::pending().await,
    }
}

/// The ready site
struct Site {
    handle: SessionHandle,
    relay: Option<ChatRelay>,
    notices: NoticeBoard,
    tab: Tab,
    contact: ContactForm,
    chat: ChatPanel,
    composer: MessageComposer,
    messages: Vec<Record>,
    feed: Option<SnapshotStream>,
}

impl Site {
    fn new(handle: SessionHandle) -> Self {
        let notices = NoticeBoard::new();
        let feed = match handle.writer().and_then(|writer| writer.list(MESSAGES)) {
            Ok(feed) => Some(feed),
            Err(e) => {
                notices.error(&e);
                None
            }
        };
        Self {
            relay: handle.chat_relay(),
            handle,
            notices,
            tab: Tab::default(),
            contact: ContactForm::new(),
            chat: ChatPanel::new(),
            composer: MessageComposer::new(),
            messages: Vec::new(),
            feed,
        }
    }

    async fn run(mut self, input: &mut mpsc::UnboundedReceiver<Input>) -> Next {
        let mut notices = self.notices.subscribe();
        if let Some(uid) = self.handle.session().identity {
            println!("Signed in as {uid}");
        }
        self.show_tab();

        loop {
            let event = tokio::select! {
                line = input.recv() => Event::Input(line),
                snapshot = next_snapshot(&mut self.feed) => Event::Snapshot(snapshot),
                Ok(()) = notices.changed() => Event::Notice,
            };

            match event {
                Event::Input(Some(Input::Line(line))) => {
                    if let Some(next) = self.handle_line(line.trim()).await {
                        return next;
                    }
                }
                Event::Input(Some(Input::Quit) | None) => return Next::Quit,
                Event::Snapshot(Some(Ok(records))) => {
                    self.messages = records;
                    if self.tab == Tab::Messages {
                        self.show_messages();
                    }
                }
                Event::Snapshot(Some(Err(e))) => {
                    self.notices.error(&e);
                }
                Event::Snapshot(None) => {
                    self.feed = None;
                    self.notices.info("Live updates stopped. Type /reload to reconnect.");
                }
                Event::Notice => {
                    let shown = notices.borrow_and_update().clone();
                    if let Some(notice) = shown {
                        match notice.kind {
                            NoticeKind::Info => println!("[info] {}", notice.text),
                            NoticeKind::Error => println!("[error] {}", notice.text),
                        }
                    }
                }
            }
        }
    }

    async fn handle_line(&mut self, line: &str) -> Option<Next> {
        if line.is_empty() {
            return None;
        }
        let (command, rest) = match line.split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        let result = match command {
            "/quit" | "/exit" => return Some(Next::Quit),
            "/reload" => return Some(Next::Reload),
            "/help" => {
                println!("{HELP}");
                Ok(())
            }
            "/tabs" => {
                let labels: Vec<&str> = Tab::ALL.iter().map(Tab::label).collect();
                println!("Sections: {}", labels.join(", "));
                Ok(())
            }
            "/tab" => rest.parse::<Tab>().map(|tab| {
                self.tab = tab;
                self.show_tab();
            }),
            "/book" => {
                println!("Book a session: {BOOKING_FORM_URL}");
                Ok(())
            }
            "/whoami" => {
                match self.handle.session().identity {
                    Some(uid) => println!("Your user id: {uid}"),
                    None => println!("Not signed in."),
                }
                Ok(())
            }
            "/messages" => {
                self.tab = Tab::Messages;
                self.show_messages();
                Ok(())
            }
            "/send" => self.send(rest).await,
            "/delete" => self.delete(rest).await,
            "/contact" => self.submit_contact(rest).await,
            "/ask" => self.ask(rest).await,
            other if other.starts_with('/') => Err(ClientError::InvalidInput(format!(
                "Unknown command {other}, try /help"
            ))),
            _ => match self.tab {
                Tab::Messages => self.send(line).await,
                Tab::Contact => self.submit_contact(line).await,
                Tab::Chat => self.ask(line).await,
                _ => Err(ClientError::InvalidInput(
                    "Open messages, contact or chat first (/tab <section>).".to_string(),
                )),
            },
        };

        if let Err(e) = result {
            self.notices.error(&e);
        }
        None
    }

    async fn send(&mut self, text: &str) -> Result<(), ClientError> {
        let writer = self.handle.writer()?;
        self.composer.send(&writer, text).await?;
        Ok(())
    }

    async fn delete(&mut self, index: &str) -> Result<(), ClientError> {
        let lines = render_lines(&self.messages, self.handle.session().identity.as_ref());
        let line = index
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|n| lines.get(n))
            .ok_or_else(|| {
                ClientError::InvalidInput(format!("No message number '{index}'"))
            })?;
        let writer = self.handle.writer()?;
        writer.remove(MESSAGES, &line.id).await?;
        self.notices.info("Message deleted.");
        Ok(())
    }

    async fn submit_contact(&mut self, raw: &str) -> Result<(), ClientError> {
        let submission = ContactSubmission::parse(raw)?;
        let writer = self.handle.writer()?;
        self.contact.submit(&writer, &submission).await?;
        self.notices.info("Thanks! Your message has been sent.");
        Ok(())
    }

    async fn ask(&mut self, question: &str) -> Result<(), ClientError> {
        let relay = self.relay.as_ref().ok_or_else(|| {
            ClientError::ChatRelayFailed("the chat assistant is not configured".to_string())
        })?;
        println!("...");
        let answer = self.chat.ask(relay, question).await?;
        println!("assistant: {answer}");
        Ok(())
    }

    fn show_tab(&self) {
        println!();
        println!("== {} ==", self.tab.label());
        match self.tab {
            Tab::Home => println!("Sports coaching and massage therapy. Type /help to get around."),
            Tab::About => println!("Qualified coach and sports massage therapist."),
            Tab::Services => println!("1:1 coaching, training plans, sports and recovery massage."),
            Tab::Booking => println!("Book a session: {BOOKING_FORM_URL}"),
            Tab::Contact => println!("Type: name | email | message"),
            Tab::Messages => self.show_messages(),
            Tab::Chat => {
                if self.chat.turns().is_empty() {
                    println!("assistant: {CHAT_GREETING}");
                }
                for turn in self.chat.turns() {
                    let speaker = match turn.role {
                        ChatRole::User => "you",
                        ChatRole::Model => "assistant",
                    };
                    println!("{speaker}: {}", turn.text);
                }
            }
        }
    }

    fn show_messages(&self) {
        let lines = render_lines(&self.messages, self.handle.session().identity.as_ref());
        if lines.is_empty() {
            println!("No messages yet. Be the first to send one!");
            return;
        }
        for (n, line) in lines.iter().enumerate() {
            let delete = if line.deletable { "  (/delete)" } else { "" };
            println!("{:>3}. [{}] {}: {}{}", n + 1, line.time, line.author, line.text, delete);
        }
    }
}
