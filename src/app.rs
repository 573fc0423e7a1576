// app.rs
use crate::client::ChatClient;
use crate::config::Config;
use crate::event::{self, AppEvent, EventReceiver, EventSender};
use crate::input::InputLine;
use crate::logging;
use crate::message::{Message, MessageId};
use crate::scroll::ScrollState;
use crate::state::{ChatAction, ChatState, DEFAULT_AGENT_NAME};
use crate::typing::{simulate_typing, spawn_typing};
use crate::ui;
use crossterm::event::{self as term_event, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{info, warn};
use ratatui::backend::Backend;
use ratatui::Terminal;
use std::io;
use std::time::Duration;
use tokio::task::JoinHandle;

const INPUT_POLL: Duration = Duration::from_millis(16);

/// What the status bar reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Ready,
    /// Request in flight, nothing typed yet.
    Waiting,
    Typing,
}

pub struct App {
    pub(crate) config: Config,
    pub(crate) client: ChatClient,
    pub(crate) state: ChatState,
    pub(crate) scroll: ScrollState,
    pub(crate) input: InputLine,
    pub(crate) notice: Option<String>,
    event_tx: EventSender,
    event_rx: EventReceiver,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, client: ChatClient) -> Self {
        let (event_tx, event_rx) = event::channel();
        Self {
            scroll: ScrollState::new(config.scroll_threshold),
            config,
            client,
            state: ChatState::new(),
            input: InputLine::default(),
            notice: None,
            event_tx,
            event_rx,
            should_quit: false,
        }
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn activity(&self) -> Activity {
        match self.state.loading_message_id().and_then(|id| self.state.get(id)) {
            Some(message) if message.content.is_empty() => Activity::Waiting,
            Some(_) => Activity::Typing,
            None if self.state.is_loading() => Activity::Waiting,
            None => Activity::Ready,
        }
    }

    /// Types the greeting into an empty chat.
    pub fn start(&mut self) -> Option<JoinHandle<()>> {
        if !self.state.is_empty() {
            return None;
        }
        let text = self.config.welcome_message.clone()?;
        let agent_name = self.config.welcome_agent_name.clone();
        let id = MessageId::welcome();
        self.dispatch(ChatAction::StartAssistantMessage {
            id: id.clone(),
            agent_name: Some(agent_name.clone()),
        });
        Some(spawn_typing(
            self.event_tx.clone(),
            id,
            text,
            Some(agent_name),
            self.config.typing_speed(),
        ))
    }

    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, self))?;

            if term_event::poll(INPUT_POLL)? {
                if let Event::Key(key) = term_event::read()? {
                    self.handle_key(key);
                }
            }

            while let Ok(event) = self.event_rx.try_recv() {
                self.handle_event(event);
            }
        }
        info!("quitting");
        Ok(())
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Chat(action) => self.dispatch(action),
            AppEvent::Notice(notice) => self.notice = Some(notice),
        }
    }

    pub fn dispatch(&mut self, action: ChatAction) {
        logging::log_action(&action);
        self.state.reduce(action);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('l') if ctrl => {
                self.reset();
            }
            KeyCode::Enter => {
                self.send_message();
            }
            KeyCode::Up => self.scroll.scroll_up(1),
            KeyCode::Down => self.scroll.scroll_down(1),
            KeyCode::PageUp => self.scroll.page_up(),
            KeyCode::PageDown => self.scroll.page_down(),
            KeyCode::End if ctrl || self.input.is_empty() => self.scroll.scroll_to_bottom(),
            KeyCode::End => self.input.end(),
            KeyCode::Home => self.input.home(),
            KeyCode::Left => self.input.left(),
            KeyCode::Right => self.input.right(),
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Char(c) if !ctrl => self.input.insert(c),
            _ => {}
        }
    }

    /// Sends the input line, if any, and spawns the request for the reply.
    pub fn send_message(&mut self) -> Option<JoinHandle<()>> {
        if self.state.is_loading() || self.input.value().trim().is_empty() {
            return None;
        }
        let text = self.input.take();
        self.notice = None;

        self.dispatch(ChatAction::AddUserMessage(Message::user(text.clone())));
        self.scroll.scroll_to_bottom();

        let id = MessageId::assistant();
        self.dispatch(ChatAction::StartAssistantMessage {
            id: id.clone(),
            agent_name: Some(DEFAULT_AGENT_NAME.to_string()),
        });

        let client = self.client.clone();
        let tx = self.event_tx.clone();
        let speed = self.config.typing_speed();
        Some(tokio::spawn(async move {
            match client.send(&text).await {
                Ok(reply) => {
                    simulate_typing(tx, id, reply.content, Some(reply.role), speed).await;
                }
                Err(e) => {
                    warn!("chat request failed: {}", e);
                    event::dispatch(
                        &tx,
                        ChatAction::SetError {
                            error_content: e.to_string(),
                        },
                    );
                }
            }
        }))
    }

    /// Clears the chat; optionally asks the server to forget too.
    pub fn reset(&mut self) -> Option<JoinHandle<()>> {
        info!("resetting chat ({} messages)", self.state.len());
        self.dispatch(ChatAction::Reset);
        self.scroll.reset();
        self.notice = None;

        if !self.config.clear_remote_on_reset {
            return None;
        }
        let client = self.client.clone();
        let tx = self.event_tx.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = client.clear_history().await {
                warn!("clearing server history failed: {}", e);
                let _ = tx.send(AppEvent::Notice(format!("Server history not cleared: {}", e)));
            }
        }))
    }

    #[cfg(test)]
    pub(crate) async fn next_event(&mut self) -> Option<AppEvent> {
        tokio::time::timeout(Duration::from_secs(5), self.event_rx.recv())
            .await
            .ok()
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::serve_once;
    use crate::message::Role;

    fn config(endpoint: &str) -> Config {
        Config {
            endpoint: endpoint.to_string(),
            clear_endpoint: endpoint.to_string(),
            typing_speed_ms: 0,
            welcome_message: None,
            ..Config::default()
        }
    }

    fn make_app(endpoint: &str) -> App {
        let config = config(endpoint);
        let client = ChatClient::new(&config.endpoint, &config.clear_endpoint, config.request_timeout())
            .unwrap();
        App::new(config, client)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        text.chars().for_each(|c| app.handle_key(key(KeyCode::Char(c))));
    }

    async fn settle(app: &mut App) {
        while app.state.is_loading() {
            match app.next_event().await {
                Some(event) => app.handle_event(event),
                None => panic!("chat never settled"),
            }
        }
    }

    async fn dead_endpoint() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/chat", addr)
    }

    #[tokio::test]
    async fn test_successful_exchange_types_reply() {
        let (url, _req) = serve_once("200 OK", r#"{"role":"assistant","content":"Paris."}"#).await;
        let mut app = make_app(&url);

        type_text(&mut app, "Capital of France?");
        app.handle_key(key(KeyCode::Enter));
        assert!(app.input.is_empty());
        assert_eq!(app.activity(), Activity::Waiting);

        settle(&mut app).await;
        let messages = app.state().ordered_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "Capital of France?");
        assert_eq!(messages[1].content, "Paris.");
        assert_eq!(messages[1].agent_name.as_deref(), Some("assistant"));
        assert_eq!(app.activity(), Activity::Ready);
    }

    #[tokio::test]
    async fn test_failed_fetch_produces_one_error_message() {
        let mut app = make_app(&dead_endpoint().await);
        type_text(&mut app, "hello?");
        app.send_message().unwrap().await.unwrap();
        settle(&mut app).await;

        let errors: Vec<_> = app
            .state()
            .ordered_messages()
            .into_iter()
            .filter(|m| m.agent_name.as_deref() == Some("System Error"))
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].content.starts_with("Error: "));
        assert!(!app.state().is_loading());
    }

    #[tokio::test]
    async fn test_http_error_status_surfaces_body() {
        let (url, _req) = serve_once("503 Service Unavailable", "backend down").await;
        let mut app = make_app(&url);
        type_text(&mut app, "hi");
        app.send_message().unwrap().await.unwrap();
        settle(&mut app).await;

        let last = *app.state().ordered_messages().last().unwrap();
        assert_eq!(last.content, "Error: backend down");
    }

    #[tokio::test]
    async fn test_blank_input_and_busy_state_do_not_send() {
        let mut app = make_app(&dead_endpoint().await);
        type_text(&mut app, "   ");
        assert!(app.send_message().is_none());
        assert!(app.state().is_empty());

        app.input = InputLine::default();
        type_text(&mut app, "first");
        let pending = app.send_message();
        assert!(pending.is_some());
        type_text(&mut app, "second");
        assert!(app.send_message().is_none());
        assert_eq!(app.input.value(), "second");
        assert_eq!(app.state().len(), 2);
    }

    #[tokio::test]
    async fn test_welcome_message_is_typed_on_start() {
        let mut app = make_app("http://127.0.0.1:9/chat");
        app.config.welcome_message = Some("Hi there".to_string());
        app.start().unwrap().await.unwrap();
        settle(&mut app).await;

        let messages = app.state().ordered_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "Hi there");
        assert_eq!(messages[0].agent_name.as_deref(), Some("AI Assistant"));
        assert!(messages[0].id.as_str().starts_with("assistant-welcome-"));

        assert!(app.start().is_none());
    }

    #[tokio::test]
    async fn test_reset_key_clears_everything() {
        let mut app = make_app(&dead_endpoint().await);
        type_text(&mut app, "hi");
        app.send_message().unwrap().await.unwrap();
        settle(&mut app).await;
        app.scroll.update_dimensions(100, 10);
        app.scroll.scroll_up(50);

        app.handle_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL));
        assert!(app.state().is_empty());
        assert!(!app.state().is_loading());
        assert!(app.scroll.is_pinned());
    }

    #[tokio::test]
    async fn test_reset_can_clear_server_history() {
        let (url, req_rx) = serve_once("200 OK", r#"{"message":"cleared"}"#).await;
        let mut app = make_app(&url);
        app.config.clear_remote_on_reset = true;
        app.reset().unwrap().await.unwrap();
        assert!(req_rx.await.unwrap().starts_with("POST /chat "));
        assert!(app.notice.is_none());
    }

    #[tokio::test]
    async fn test_failed_history_clear_is_only_a_notice() {
        let mut app = make_app(&dead_endpoint().await);
        app.config.clear_remote_on_reset = true;
        app.reset().unwrap().await.unwrap();
        if let Some(event) = app.next_event().await {
            app.handle_event(event);
        }
        assert!(app.state().is_empty());
        assert!(app.notice.as_deref().unwrap().starts_with("Server history not cleared"));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = make_app("http://127.0.0.1:9/chat");
        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit());

        let mut app = make_app("http://127.0.0.1:9/chat");
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_end_key_scrolls_or_moves_cursor() {
        let mut app = make_app("http://127.0.0.1:9/chat");
        app.scroll.update_dimensions(100, 10);
        app.handle_key(key(KeyCode::PageUp));
        assert!(!app.scroll.is_pinned());

        type_text(&mut app, "ab");
        app.handle_key(key(KeyCode::Home));
        app.handle_key(key(KeyCode::End));
        assert_eq!(app.input.cursor(), 2);
        assert!(!app.scroll.is_pinned());

        app.handle_key(KeyEvent::new(KeyCode::End, KeyModifiers::CONTROL));
        assert!(app.scroll.is_pinned());
    }

    #[test]
    fn test_up_key_moves_view_between_redraws() {
        use ratatui::backend::TestBackend;

        let mut app = make_app("http://127.0.0.1:9/chat");
        for i in 0..30 {
            app.dispatch(ChatAction::AddUserMessage(Message::user(format!("line {}", i))));
        }
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|frame| ui::render(frame, &mut app)).unwrap();
        let bottom = app.scroll.offset();
        assert!(bottom > 3);
        assert_eq!(bottom, app.scroll.max_offset());

        for _ in 0..3 {
            app.handle_key(key(KeyCode::Up));
            terminal.draw(|frame| ui::render(frame, &mut app)).unwrap();
        }
        assert_eq!(app.scroll.offset(), bottom - 3);
        assert!(!app.scroll.is_pinned());

        for _ in 0..3 {
            app.handle_key(key(KeyCode::Down));
            terminal.draw(|frame| ui::render(frame, &mut app)).unwrap();
        }
        assert_eq!(app.scroll.offset(), bottom);
        assert!(app.scroll.is_pinned());
    }
}
