//! Terminal front-end: line input, slash commands and transcript rendering.
//!
//! The session is owned by [`Repl::run`]. Input lines arrive from a blocking
//! line-editor thread and exchange results from spawned tasks, all through one
//! channel, so state changes happen in a single place.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use colored::Colorize;
use log::{error, info, warn};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, ExternalPrinter, Helper};
use serde_json::Value;
use tokio::sync::mpsc;

use rag_chat::catalog::{find_model, models_for};
use rag_chat::config::{save_config, ChatConfig};
use rag_chat::controller::{fetch_history, send_prompt, send_upload};
use rag_chat::models::{LlmProvider, Message, ModerationLevel, Sender};
use rag_chat::paths::{expand_home, get_input_history_path};
use rag_chat::upload::UploadFile;
use rag_chat::{ChatController, ExchangeError};

const COMMANDS: &[&str] = &[
    "/say",
    "/upload",
    "/dlp",
    "/moderation",
    "/provider",
    "/model",
    "/models",
    "/settings",
    "/save",
    "/help",
    "/quit",
];

const HELP: &str = "\
Type a message and press Enter to ask the backend.
  //<text>                          send text that starts with a slash
  /say <text>                       send text verbatim, e.g. /say quit
  /upload <path>...                 upload documents
  /dlp on|off                       toggle Data Loss Prevention
  /moderation on|off|<0-100>        toggle text moderation or set its level
  /provider vertex_ai|huggingface|none
  /model <id or name>|none          pick a model of the selected provider
  /models                           list models of the selected provider
  /settings                         show current toggles
  /save                             keep current toggles as defaults
  /quit                             leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationChange {
    Enabled(bool),
    Level(ModerationLevel),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Prompt(String),
    Upload(Vec<String>),
    Dlp(bool),
    Moderation(ModerationChange),
    Provider(Option<LlmProvider>),
    Model(Option<String>),
    Models,
    Settings,
    Save,
    Help,
    Quit,
}

fn parse_switch(value: Option<&str>, usage: &str) -> Result<bool, String> {
    match value {
        Some("on") | Some("true") | Some("yes") => Ok(true),
        Some("off") | Some("false") | Some("no") => Ok(false),
        _ => Err(format!("Usage: {}", usage)),
    }
}

impl Command {
    /// Parses one input line; blank lines yield `Ok(None)`
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed == "quit" || trimmed == "exit" {
            return Ok(Some(Command::Quit));
        }
        if trimmed.starts_with("//") {
            return Ok(Some(Command::Prompt(trimmed[1..].to_string())));
        }
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Ok(Some(Command::Prompt(line.to_string())));
        };
        if let Some(text) = rest.strip_prefix("say ") {
            return Ok(Some(Command::Prompt(text.trim_start().to_string())));
        }

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();
        let first = args.first().copied();

        let command = match name {
            "upload" => {
                if args.is_empty() {
                    return Err("Usage: /upload <path>...".to_string());
                }
                Command::Upload(args.iter().map(|a| a.to_string()).collect())
            }
            "dlp" => Command::Dlp(parse_switch(first, "/dlp on|off")?),
            "moderation" => match first.map(str::parse::<u8>) {
                Some(Ok(level)) => {
                    Command::Moderation(ModerationChange::Level(ModerationLevel::try_from(level)?))
                }
                _ => Command::Moderation(ModerationChange::Enabled(parse_switch(
                    first,
                    "/moderation on|off|<0-100>",
                )?)),
            },
            "provider" => match first {
                Some("none") => Command::Provider(None),
                Some(value) => Command::Provider(Some(
                    LlmProvider::parse(value).ok_or_else(|| format!("Unknown provider: {}", value))?,
                )),
                None => return Err("Usage: /provider vertex_ai|huggingface|none".to_string()),
            },
            "model" => match first {
                Some("none") => Command::Model(None),
                Some(_) => Command::Model(Some(args.join(" "))),
                None => return Err("Usage: /model <id or name>|none".to_string()),
            },
            "say" => return Err("Usage: /say <text>".to_string()),
            "models" => Command::Models,
            "settings" => Command::Settings,
            "save" => Command::Save,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("Unknown command: /{}", other)),
        };
        Ok(Some(command))
    }
}

/// Everything the session loop reacts to
pub enum UiEvent {
    Line(String),
    InputClosed,
    FilesRead(Vec<UploadFile>),
    PromptSettled(Result<Value, ExchangeError>),
    /// Outcome of an upload together with the size of its batch
    UploadSettled(usize, Result<Value, ExchangeError>),
    HistoryLoaded(Result<Value, ExchangeError>),
}

/// Where rendered lines go
pub trait Output {
    fn line(&mut self, text: String);
}

pub struct StdoutOutput;

impl Output for StdoutOutput {
    fn line(&mut self, text: String) {
        println!("{}", text);
    }
}

/// Prints above the active prompt so output does not garble the line being typed
pub struct PromptOutput(pub Box<dyn ExternalPrinter + Send>);

impl Output for PromptOutput {
    fn line(&mut self, text: String) {
        if let Err(e) = self.0.print(text.clone()) {
            warn!("[output] External printer failed: {}", e);
            println!("{}", text);
        }
    }
}

pub fn format_message(message: &Message) -> String {
    let stamp = message.created_at.format("%H:%M").to_string();
    let label = match message.sender {
        Sender::User => message.sender.as_str().green().bold(),
        Sender::System => message.sender.as_str().bright_blue().bold(),
    };
    format!("{} {}: {}", stamp.bright_black(), label, message.text)
}

#[derive(Clone)]
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

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.starts_with('/') && !line.contains(' ') {
            COMMANDS
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CommandHelper {}

pub struct InputThread {
    pub handle: JoinHandle<()>,
    pub printer: Option<Box<dyn ExternalPrinter + Send>>,
}

/// Starts the blocking line editor on its own thread
pub fn spawn_input_thread(events: mpsc::UnboundedSender<UiEvent>) -> InputThread {
    let (printer_tx, printer_rx) = std::sync::mpsc::channel();
    let handle = thread::spawn(move || read_lines(events, printer_tx));
    let printer = printer_rx.recv().ok().flatten();
    InputThread { handle, printer }
}

fn read_lines(
    events: mpsc::UnboundedSender<UiEvent>,
    printer_tx: std::sync::mpsc::Sender<Option<Box<dyn ExternalPrinter + Send>>>,
) {
    let mut rl: Editor<CommandHelper, DefaultHistory> = match Editor::new() {
        Ok(rl) => rl,
        Err(e) => {
            error!("[input] Failed to start line editor: {}", e);
            let _ = printer_tx.send(None);
            let _ = events.send(UiEvent::InputClosed);
            return;
        }
    };
    rl.set_helper(Some(CommandHelper));

    let history_path = get_input_history_path();
    if let Some(path) = &history_path {
        let _ = rl.load_history(path);
    }

    let printer = rl
        .create_external_printer()
        .ok()
        .map(|p| Box::new(p) as Box<dyn ExternalPrinter + Send>);
    let _ = printer_tx.send(printer);

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    let _ = rl.add_history_entry(trimmed);
                }
                let quitting = matches!(trimmed, "/quit" | "/exit" | "quit" | "exit");
                if events.send(UiEvent::Line(line)).is_err() || quitting {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                let _ = events.send(UiEvent::InputClosed);
                break;
            }
            Err(err) => {
                error!("[input] {}", err);
                let _ = events.send(UiEvent::InputClosed);
                break;
            }
        }
    }

    if let Some(path) = &history_path {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = rl.save_history(path) {
            warn!("[input] Failed to save input history: {}", e);
        }
    }
}

pub struct Repl {
    controller: ChatController,
    config: ChatConfig,
    config_path: PathBuf,
    events: mpsc::UnboundedSender<UiEvent>,
    output: Box<dyn Output>,
    rendered: usize,
    uploading: bool,
}

impl Repl {
    pub fn new(
        controller: ChatController,
        config: ChatConfig,
        config_path: PathBuf,
        events: mpsc::UnboundedSender<UiEvent>,
        output: Box<dyn Output>,
    ) -> Self {
        Self {
            controller,
            config,
            config_path,
            events,
            output,
            rendered: 0,
            uploading: false,
        }
    }

    pub async fn run(
        mut self,
        mut events_rx: mpsc::UnboundedReceiver<UiEvent>,
        load_history: bool,
    ) {
        if load_history {
            self.spawn_history();
        }
        self.render();

        while let Some(event) = events_rx.recv().await {
            let keep_going = self.handle(event);
            self.render();
            if !keep_going {
                break;
            }
        }
    }

    fn notice(&mut self, text: impl AsRef<str>) {
        self.output.line(text.as_ref().bright_black().to_string());
    }

    fn render(&mut self) {
        let fresh: Vec<String> = self
            .controller
            .session()
            .transcript()
            .since(self.rendered)
            .iter()
            .map(format_message)
            .collect();
        self.rendered += fresh.len();
        for line in fresh {
            self.output.line(line);
        }
    }

    fn handle(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::Line(line) => match Command::parse(&line) {
                Ok(Some(command)) => return self.dispatch(command),
                Ok(None) => {}
                Err(message) => self.notice(message),
            },
            UiEvent::InputClosed => return false,
            UiEvent::FilesRead(files) => {
                let session = self.controller.session_mut();
                session.select_files(files);
                match session.begin_upload() {
                    Some(batch) => self.spawn_upload(batch),
                    None => {
                        self.uploading = false;
                        self.notice("Nothing to upload");
                    }
                }
            }
            UiEvent::PromptSettled(outcome) => {
                self.controller.session_mut().complete_prompt(outcome);
            }
            UiEvent::UploadSettled(count, outcome) => {
                self.uploading = false;
                if outcome.is_ok() {
                    self.notice(format!("Uploaded {} file(s)", count));
                }
                self.controller.session_mut().complete_upload(&outcome);
            }
            UiEvent::HistoryLoaded(outcome) => {
                self.controller.session_mut().apply_history(outcome);
            }
        }
        true
    }

    fn dispatch(&mut self, command: Command) -> bool {
        match command {
            Command::Prompt(text) => {
                let session = self.controller.session_mut();
                if session.is_pending() {
                    self.notice("Still waiting for the previous answer");
                    return true;
                }
                session.set_input(text);
                if let Some(payload) = session.begin_prompt() {
                    let gateway = self.controller.gateway();
                    let events = self.events.clone();
                    tokio::spawn(async move {
                        let outcome = send_prompt(gateway.as_ref(), &payload).await;
                        let _ = events.send(UiEvent::PromptSettled(outcome));
                    });
                }
            }
            Command::Upload(paths) => {
                if self.uploading {
                    self.notice("An upload is already in progress");
                    return true;
                }
                self.uploading = true;
                self.spawn_file_reads(paths);
            }
            Command::Dlp(enabled) => {
                self.controller.session_mut().set_dlp_enabled(enabled);
                self.notice(format!("DLP {}", on_off(enabled)));
            }
            Command::Moderation(ModerationChange::Enabled(enabled)) => {
                self.controller.session_mut().set_moderation_enabled(enabled);
                self.notice(format!("Text moderation {}", on_off(enabled)));
            }
            Command::Moderation(ModerationChange::Level(level)) => {
                self.controller.session_mut().set_moderation_level(level);
                self.notice(format!("Text moderation level set to {}", level.get()));
            }
            Command::Provider(provider) => {
                self.controller.session_mut().set_provider(provider);
                let label = provider.map(|p| p.label()).unwrap_or("none");
                self.notice(format!("Provider: {}", label));
            }
            Command::Model(model) => self.select_model(model),
            Command::Models => self.list_models(),
            Command::Settings => self.show_settings(),
            Command::Save => {
                self.config.remember_toggles(self.controller.session().toggles());
                match save_config(&self.config_path, &self.config) {
                    Ok(()) => self.notice(format!("Saved to {}", self.config_path.display())),
                    Err(e) => {
                        error!("[save] {}", e);
                        self.notice(format!("Could not save settings: {}", e));
                    }
                }
            }
            Command::Help => self.notice(HELP),
            Command::Quit => return false,
        }
        true
    }

    fn select_model(&mut self, model: Option<String>) {
        let provider = self.controller.session().toggles().provider;
        let resolved = match (provider, model) {
            (_, None) => None,
            (Some(provider), Some(needle)) => match find_model(provider, &needle) {
                Some(option) => Some(option.id.to_string()),
                None => {
                    self.notice(format!("{} does not offer {}", provider.label(), needle));
                    return;
                }
            },
            (None, Some(raw)) => Some(raw),
        };
        let label = resolved.clone().unwrap_or_else(|| "none".to_string());
        self.controller.session_mut().set_model(resolved);
        self.notice(format!("Model: {}", label));
    }

    fn list_models(&mut self) {
        let Some(provider) = self.controller.session().toggles().provider else {
            self.notice("Select a provider first: /provider vertex_ai|huggingface");
            return;
        };
        let lines: Vec<String> = models_for(provider)
            .iter()
            .map(|m| format!("  {:<26} {}", m.label, m.id))
            .collect();
        self.notice(format!("{} models:\n{}", provider.label(), lines.join("\n")));
    }

    fn show_settings(&mut self) {
        let toggles = self.controller.session().toggles().clone();
        let text = format!(
            "DLP: {}\nText moderation: {} (level {})\nProvider: {}\nModel: {}",
            on_off(toggles.dlp_enabled),
            on_off(toggles.moderation_enabled),
            toggles.moderation_level.get(),
            toggles.provider.map(|p| p.label()).unwrap_or("none"),
            toggles.model.as_deref().unwrap_or("none"),
        );
        self.notice(text);
    }

    fn spawn_history(&self) {
        let gateway = self.controller.gateway();
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = fetch_history(gateway.as_ref()).await;
            let _ = events.send(UiEvent::HistoryLoaded(outcome));
        });
    }

    fn spawn_file_reads(&self, paths: Vec<String>) {
        let events = self.events.clone();
        tokio::spawn(async move {
            let mut files = Vec::with_capacity(paths.len());
            for path in paths {
                match UploadFile::from_path(&expand_home(&path)).await {
                    Ok(file) => files.push(file),
                    Err(e) => error!("[upload] {}", e),
                }
            }
            let _ = events.send(UiEvent::FilesRead(files));
        });
    }

    fn spawn_upload(&self, batch: Vec<UploadFile>) {
        let count = batch.len();
        info!("[upload] Uploading {} files", count);
        let gateway = self.controller.gateway();
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = send_upload(gateway.as_ref(), batch).await;
            let _ = events.send(UiEvent::UploadSettled(count, outcome));
        });
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use rag_chat::models::Toggles;
    use rag_chat::{ChatSession, Exchange, ExchangeBody, RequestGateway};
    use serde_json::json;
    use tempfile::TempDir;

    #[derive(Default)]
    struct ScriptedGateway {
        replies: Mutex<VecDeque<Result<Value, ExchangeError>>>,
        seen: Mutex<Vec<Exchange>>,
    }

    #[async_trait]
    impl RequestGateway for ScriptedGateway {
        async fn exchange(&self, exchange: Exchange) -> Result<Value, ExchangeError> {
            self.seen.lock().unwrap().push(exchange);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(json!({})))
        }
    }

    /// Collects rendered lines instead of printing them
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<String>>>);

    impl Captured {
        fn contains(&self, needle: &str) -> bool {
            self.0.lock().unwrap().iter().any(|line| line.contains(needle))
        }
    }

    impl Output for Captured {
        fn line(&mut self, text: String) {
            self.0.lock().unwrap().push(text);
        }
    }

    struct Harness {
        repl: Repl,
        events: mpsc::UnboundedReceiver<UiEvent>,
        gateway: Arc<ScriptedGateway>,
        output: Captured,
        dir: TempDir,
    }

    impl Harness {
        fn new(replies: Vec<Result<Value, ExchangeError>>) -> Self {
            let gateway = Arc::new(ScriptedGateway {
                replies: Mutex::new(replies.into()),
                seen: Mutex::new(Vec::new()),
            });
            let session = ChatSession::new("Hello there!", Toggles::default());
            let controller = ChatController::new(session, gateway.clone());
            let dir = TempDir::new().unwrap();
            let (events_tx, events) = mpsc::unbounded_channel();
            let output = Captured::default();
            let repl = Repl::new(
                controller,
                ChatConfig::default(),
                dir.path().join("config.json"),
                events_tx,
                Box::new(output.clone()),
            );
            Self {
                repl,
                events,
                gateway,
                output,
                dir,
            }
        }

        fn line(&mut self, text: &str) -> bool {
            let keep_going = self.repl.handle(UiEvent::Line(text.to_string()));
            self.repl.render();
            keep_going
        }

        /// Waits for the next background result and feeds it to the loop
        async fn settle(&mut self) {
            let event = self.events.recv().await.unwrap();
            self.repl.handle(event);
            self.repl.render();
        }

        fn texts(&self) -> Vec<String> {
            self.repl
                .controller
                .session()
                .transcript()
                .messages()
                .iter()
                .map(|m| m.text.clone())
                .collect()
        }

        fn write_file(&self, name: &str, content: &[u8]) -> String {
            let path = self.dir.path().join(name);
            std::fs::write(&path, content).unwrap();
            path.display().to_string()
        }

        fn seen(&self) -> Vec<Exchange> {
            self.gateway.seen.lock().unwrap().clone()
        }
    }

    fn backend_error() -> ExchangeError {
        ExchangeError::Application {
            endpoint: "/upload_documents".to_string(),
            status: 500,
            error: "E1".to_string(),
            message: "bad".to_string(),
        }
    }

    #[tokio::test]
    async fn prompt_round_trip_through_event_loop() {
        let mut h = Harness::new(vec![Ok(json!({"response": {"text": "Hi!"}}))]);

        assert!(h.line("Hello"));
        assert!(h.repl.controller.session().is_pending());
        h.settle().await;

        assert_eq!(h.texts(), vec!["Hello there!", "Hello", "Hi!"]);
        assert!(!h.repl.controller.session().is_pending());
        assert!(h.output.contains("Hi!"));
    }

    #[tokio::test]
    async fn submitting_while_pending_changes_nothing() {
        let mut h = Harness::new(vec![Ok(json!({"response": {"text": "Hi!"}}))]);

        h.line("first");
        h.line("second");
        assert_eq!(h.texts(), vec!["Hello there!", "first"]);
        assert_eq!(h.repl.controller.session().input(), "first");
        assert!(h.output.contains("Still waiting"));

        h.settle().await;
        assert_eq!(h.texts(), vec!["Hello there!", "first", "Hi!"]);
        assert_eq!(h.seen().len(), 1);
    }

    #[tokio::test]
    async fn upload_clears_batch_and_reports_its_size() {
        let mut h = Harness::new(vec![Ok(json!({"status": "ok"}))]);
        let a = h.write_file("a.txt", b"alpha");
        let b = h.write_file("b.pdf", b"%PDF");

        h.line(&format!("/upload {} {}", a, b));
        h.settle().await;
        h.settle().await;

        assert!(h.repl.controller.session().selected_files().is_empty());
        assert!(!h.repl.uploading);
        assert!(h.output.contains("Uploaded 2 file(s)"));
        let seen = h.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].endpoint, "/upload_documents");
        match &seen[0].body {
            ExchangeBody::Multipart(files) => assert_eq!(files.len(), 2),
            other => panic!("expected multipart, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn failed_upload_still_clears_batch() {
        let mut h = Harness::new(vec![Err(backend_error())]);
        let a = h.write_file("a.txt", b"alpha");

        h.line(&format!("/upload {}", a));
        h.settle().await;
        h.settle().await;

        assert!(h.repl.controller.session().selected_files().is_empty());
        assert!(!h.output.contains("Uploaded"));
        assert_eq!(h.texts(), vec!["Hello there!"]);
    }

    #[tokio::test]
    async fn second_upload_waits_for_the_first() {
        let mut h = Harness::new(Vec::new());
        let a = h.write_file("a.txt", b"alpha");

        h.line(&format!("/upload {}", a));
        h.line(&format!("/upload {}", a));
        assert!(h.output.contains("already in progress"));

        h.settle().await;
        h.settle().await;
        assert_eq!(h.seen().len(), 1);
        assert!(h.output.contains("Uploaded 1 file(s)"));

        h.line(&format!("/upload {}", a));
        assert!(h.repl.uploading);
    }

    #[tokio::test]
    async fn unreadable_files_end_the_upload() {
        let mut h = Harness::new(Vec::new());

        h.line("/upload /definitely/not/here.pdf");
        h.settle().await;

        assert!(!h.repl.uploading);
        assert!(h.output.contains("Nothing to upload"));
        assert!(h.seen().is_empty());
    }

    #[tokio::test]
    async fn toggles_and_quit_go_through_the_loop() {
        let mut h = Harness::new(Vec::new());

        h.line("/dlp on");
        h.line("/moderation 80");
        let toggles = h.repl.controller.session().toggles().clone();
        assert!(toggles.dlp_enabled);
        assert_eq!(toggles.moderation_level.get(), 80);

        assert!(!h.line("/quit"));
    }

    #[test]
    fn plain_text_is_a_prompt() {
        assert_eq!(
            Command::parse("What is RAG?").unwrap(),
            Some(Command::Prompt("What is RAG?".to_string()))
        );
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn toggles_parse() {
        assert_eq!(Command::parse("/dlp on").unwrap(), Some(Command::Dlp(true)));
        assert_eq!(
            Command::parse("/moderation off").unwrap(),
            Some(Command::Moderation(ModerationChange::Enabled(false)))
        );
        assert_eq!(
            Command::parse("/moderation 70").unwrap(),
            Some(Command::Moderation(ModerationChange::Level(
                ModerationLevel::try_from(70).unwrap()
            )))
        );
        assert!(Command::parse("/moderation 101").is_err());
        assert!(Command::parse("/dlp maybe").is_err());
    }

    #[test]
    fn provider_and_model_parse() {
        assert_eq!(
            Command::parse("/provider hf").unwrap(),
            Some(Command::Provider(Some(LlmProvider::Huggingface)))
        );
        assert_eq!(Command::parse("/provider none").unwrap(), Some(Command::Provider(None)));
        assert!(Command::parse("/provider openai").is_err());
        assert_eq!(
            Command::parse("/model Gemma 2").unwrap(),
            Some(Command::Model(Some("Gemma 2".to_string())))
        );
    }

    #[test]
    fn upload_needs_paths() {
        assert!(Command::parse("/upload").is_err());
        assert_eq!(
            Command::parse("/upload a.pdf ~/b.txt").unwrap(),
            Some(Command::Upload(vec!["a.pdf".to_string(), "~/b.txt".to_string()]))
        );
    }

    #[test]
    fn escapes_send_literal_text() {
        assert_eq!(
            Command::parse("//etc/hosts is what?").unwrap(),
            Some(Command::Prompt("/etc/hosts is what?".to_string()))
        );
        assert_eq!(
            Command::parse("/say quit").unwrap(),
            Some(Command::Prompt("quit".to_string()))
        );
        assert!(Command::parse("/say").is_err());
    }

    #[test]
    fn quit_variants() {
        for line in ["quit", "exit", "/quit", "/exit"] {
            assert_eq!(Command::parse(line).unwrap(), Some(Command::Quit));
        }
        assert!(Command::parse("/unknown").is_err());
    }
}
