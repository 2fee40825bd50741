use crate::{
    background::{Scene, SceneConfig},
    command::{Command, parse_command},
    message::StatusMessage,
    reveal::Reveal,
    view::{self, Tab, ViewSnap},
};
use anyhow::Result;
use async_trait::async_trait;
use clonify_actors::{
    CloneMsg,
    actor::{Actor, Addr, Context},
    clone::CloneActor,
    system::ShutdownHandle,
};
use clonify_common::ClonifyError;
use clonify_web::{ClonedSite, preview::render_preview, validate_url};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event as CtEvent, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::{
    io::{self, Stdout},
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::oneshot;

const BRAILLE_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const PAGE: i32 = 10;

pub enum TuiMsg {
    InputEvent(CtEvent),
    Tick,
    CloneDone(clonify_common::Result<ClonedSite>),
    Saved(clonify_common::Result<PathBuf>),
    PreviewWritten(clonify_common::Result<PathBuf>),
    OpError(String),
    Shutdown,
}

#[derive(Debug, Clone, Copy)]
pub struct TuiSettings {
    pub tick: Duration,
    pub reveal_ticks: usize,
    pub scene: SceneConfig,
}

impl Default for TuiSettings {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(40),
            reveal_ticks: 30,
            scene: SceneConfig::default(),
        }
    }
}

/// Side effects requested by the UI state; carried out by the actor.
#[derive(Debug, Clone)]
enum Action {
    StartClone(String),
    Download(Arc<ClonedSite>),
    WritePreview(String),
    Quit,
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Action::StartClone(a), Action::StartClone(b)) => a == b,
            (Action::Download(a), Action::Download(b)) => Arc::ptr_eq(a, b),
            (Action::WritePreview(a), Action::WritePreview(b)) => a == b,
            (Action::Quit, Action::Quit) => true,
            _ => false,
        }
    }
}

/// Everything the screen shows, independent of the terminal.
struct Ui {
    input: String,
    input_cursor: usize,

    busy: bool,
    spin_idx: usize,

    site: Option<Arc<ClonedSite>>,
    reveals: Vec<Reveal>,
    tab: Tab,
    scroll: [u16; Tab::ALL.len()],
    message: Option<StatusMessage>,
    show_help: bool,

    scene: Scene,
    body: Rect,
    reveal_ticks: usize,
    dirty: bool,
}

impl Ui {
    fn new(settings: &TuiSettings, body: Rect) -> Self {
        let (w, h) = view::dots_for(body);
        Self {
            input: String::new(),
            input_cursor: 0,
            busy: false,
            spin_idx: 0,
            site: None,
            reveals: Vec::new(),
            tab: Tab::Html,
            scroll: [0; Tab::ALL.len()],
            message: None,
            show_help: false,
            scene: Scene::new(w, h, settings.scene),
            body,
            reveal_ticks: settings.reveal_ticks,
            dirty: true,
        }
    }

    fn cursor_left(&mut self) {
        if self.input_cursor == 0 {
            return;
        }
        self.input_cursor -= 1;
        while self.input_cursor > 0 && !self.input.is_char_boundary(self.input_cursor) {
            self.input_cursor -= 1;
        }
    }

    fn cursor_right(&mut self) {
        if self.input_cursor >= self.input.len() {
            return;
        }
        self.input_cursor += 1;
        while self.input_cursor < self.input.len()
            && !self.input.is_char_boundary(self.input_cursor)
        {
            self.input_cursor += 1;
        }
    }

    fn insert_char(&mut self, ch: char) {
        self.input.insert(self.input_cursor, ch);
        self.input_cursor += ch.len_utf8();
    }

    fn backspace(&mut self) {
        if self.input_cursor == 0 {
            return;
        }
        let mut prev = self.input_cursor - 1;
        while prev > 0 && !self.input.is_char_boundary(prev) {
            prev -= 1;
        }
        self.input.drain(prev..self.input_cursor);
        self.input_cursor = prev;
    }

    fn delete(&mut self) {
        if self.input_cursor >= self.input.len() {
            return;
        }
        let start = self.input_cursor;
        let mut end = start + 1;
        while end < self.input.len() && !self.input.is_char_boundary(end) {
            end += 1;
        }
        self.input.drain(start..end);
    }

    fn clear_input(&mut self) {
        self.input.clear();
        self.input_cursor = 0;
    }

    /// Non-empty, not a command, and not a URL.
    fn input_invalid(&self) -> bool {
        let s = self.input.trim();
        !s.is_empty() && !s.starts_with('/') && validate_url(s).is_err()
    }

    fn spinner(&self) -> &'static str {
        if self.busy {
            BRAILLE_FRAMES[self.spin_idx % BRAILLE_FRAMES.len()]
        } else {
            " "
        }
    }

    fn show(&mut self, msg: StatusMessage) {
        self.message = Some(msg);
        self.dirty = true;
    }

    fn clear_result(&mut self) {
        self.site = None;
        self.reveals.clear();
        self.scroll = [0; Tab::ALL.len()];
        self.dirty = true;
    }

    fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.dirty = true;
    }

    fn scroll_by(&mut self, delta: i32) {
        let Some(reveal) = self.reveals.get(self.tab.index()) else {
            return;
        };
        // Long lines wrap, so the limit is in rendered rows.
        let rows = view::wrapped_rows(reveal.full(), self.body.width);
        let max = rows
            .saturating_sub(self.body.height as usize)
            .min(u16::MAX as usize) as i32;
        let cur = &mut self.scroll[self.tab.index()];
        *cur = (*cur as i32 + delta).clamp(0, max) as u16;
        self.dirty = true;
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        self.dirty = true;
        match key.code {
            KeyCode::Char('c' | 'q') if ctrl => return Some(Action::Quit),
            KeyCode::Char('d') if ctrl => return self.request_download(),
            KeyCode::Char('r') if ctrl => self.refresh_preview(),
            KeyCode::Char('o') if ctrl => return self.request_preview_file(),
            KeyCode::Enter => return self.submit(),
            KeyCode::Esc => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.clear_input();
                }
            }
            KeyCode::Tab => self.select_tab(self.tab.next()),
            KeyCode::BackTab => self.select_tab(self.tab.prev()),
            KeyCode::F(n) => {
                if let Some(tab) = Tab::from_function_key(n) {
                    self.select_tab(tab);
                }
            }
            KeyCode::PageUp => self.scroll_by(-PAGE),
            KeyCode::PageDown => self.scroll_by(PAGE),
            KeyCode::Up => self.scroll_by(-1),
            KeyCode::Down => self.scroll_by(1),
            KeyCode::Left => self.cursor_left(),
            KeyCode::Right => self.cursor_right(),
            KeyCode::Home => self.input_cursor = 0,
            KeyCode::End => self.input_cursor = self.input.len(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Char(ch) if !ctrl => self.insert_char(ch),
            _ => {}
        }
        None
    }

    fn handle_mouse(&mut self, kind: MouseEventKind, col: u16, row: u16) {
        if !matches!(kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
            return;
        }
        match view::cell_to_dots(self.body, col, row) {
            Some((x, y)) => self.scene.set_pointer(x, y),
            None => self.scene.clear_pointer(),
        }
    }

    /// Enter: run a slash command, or start a clone unless one is in flight.
    fn submit(&mut self) -> Option<Action> {
        let line = self.input.trim().to_string();
        if line.starts_with('/') {
            self.clear_input();
            return self.run_command(parse_command(&line));
        }
        if self.busy {
            tracing::debug!("clone.submit_ignored_busy");
            return None;
        }
        if let Err(e) = validate_url(&line) {
            self.show(StatusMessage::error(e.to_string()));
            return None;
        }
        self.busy = true;
        self.message = None;
        self.clear_result();
        tracing::info!(target_url = %line, "clone.submit");
        Some(Action::StartClone(line))
    }

    fn run_command(&mut self, cmd: Command) -> Option<Action> {
        match cmd {
            Command::Download => return self.request_download(),
            Command::Preview => self.refresh_preview(),
            Command::Open => return self.request_preview_file(),
            Command::Clear => {
                self.clear_result();
                self.message = None;
            }
            Command::Help => self.show_help = !self.show_help,
            Command::Quit => return Some(Action::Quit),
            Command::Unknown(s) => {
                self.show(StatusMessage::error(format!("Unknown command: {s} (try /help)")))
            }
        }
        None
    }

    fn request_download(&mut self) -> Option<Action> {
        match &self.site {
            Some(site) => Some(Action::Download(site.clone())),
            None => {
                self.show(StatusMessage::error("No website content to download"));
                None
            }
        }
    }

    fn request_preview_file(&mut self) -> Option<Action> {
        match &self.site {
            Some(site) => Some(Action::WritePreview(site.result.html.clone())),
            None => {
                self.show(StatusMessage::error("No website content to preview"));
                None
            }
        }
    }

    fn refresh_preview(&mut self) {
        let Some(site) = &self.site else {
            self.show(StatusMessage::error("No website content to preview"));
            return;
        };
        let text = render_preview(&site.result.html).render();
        if let Some(slot) = self.reveals.get_mut(Tab::Preview.index()) {
            *slot = Reveal::new(text, 0);
        }
        self.scroll[Tab::Preview.index()] = 0;
        self.show(StatusMessage::info("Preview refreshed"));
    }

    fn finish_clone(&mut self, res: clonify_common::Result<ClonedSite>) {
        self.busy = false;
        self.dirty = true;
        match res {
            Ok(site) => {
                let preview = render_preview(&site.result.html).render();
                let panels = [
                    site.result.html.clone(),
                    site.result.css.clone(),
                    site.result.js.clone(),
                    site.result.resources.clone(),
                    preview,
                ];
                self.reveals = panels
                    .into_iter()
                    .map(|text| Reveal::new(text, self.reveal_ticks))
                    .collect();
                self.scroll = [0; Tab::ALL.len()];
                self.site = Some(Arc::new(site));
                self.show(StatusMessage::success("Website cloned successfully!"));
            }
            Err(e) => {
                tracing::warn!(error = %e, "clone.failed");
                self.show(StatusMessage::error(e.user_message()));
            }
        }
    }

    /// Failures outside any request; a clone in flight stays in flight.
    fn op_error(&mut self, e: String) {
        tracing::warn!(error = %e, "tui.op_error");
        self.show(StatusMessage::error(e));
    }

    fn finish_file(&mut self, res: clonify_common::Result<PathBuf>, ok: impl FnOnce(&Path) -> String) {
        match res {
            Ok(path) => self.show(StatusMessage::success(ok(&path))),
            Err(e) => self.show(StatusMessage::error(e.user_message())),
        }
    }

    /// Advance animations by one tick. Returns true while something moves.
    fn on_tick(&mut self, now: Instant, dt: f64) -> bool {
        if self.busy {
            self.spin_idx = (self.spin_idx + 1) % BRAILLE_FRAMES.len();
        }
        if self.message.as_ref().is_some_and(|m| m.is_expired(now)) {
            self.message = None;
            self.dirty = true;
        }
        let mut revealing = false;
        for r in &mut self.reveals {
            revealing |= r.tick();
        }
        let animating = self.site.is_none();
        if animating {
            self.scene.step(dt);
        }
        self.busy || revealing || animating
    }

    fn set_body(&mut self, body: Rect) {
        if body.width != self.body.width || body.height != self.body.height {
            let (w, h) = view::dots_for(body);
            self.scene.resize(w, h);
        }
        self.body = body;
    }

    fn snap(&self) -> ViewSnap<'_> {
        ViewSnap {
            input: &self.input,
            input_cursor: self.input_cursor,
            input_invalid: self.input_invalid(),
            busy: self.busy,
            spinner: self.spinner(),
            tab: self.tab,
            panel: self.reveals.get(self.tab.index()).map(Reveal::visible),
            scroll: self.scroll[self.tab.index()],
            target: self.site.as_ref().map(|s| s.target.as_str()),
            message: self.message.as_ref(),
            show_help: self.show_help,
            scene: &self.scene,
        }
    }
}

/// Leave raw mode and the alternate screen. Safe to call more than once.
pub fn restore_terminal() {
    disable_raw_mode().ok();
    let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
}

pub struct TuiActor {
    cloner: Addr<CloneActor>,
    term: Terminal<CrosstermBackend<Stdout>>,
    ui: Ui,
    tick: Duration,
    last_draw: Instant,
    shutdown: ShutdownHandle,
}

impl TuiActor {
    pub fn new(
        cloner: Addr<CloneActor>,
        settings: TuiSettings,
        shutdown: ShutdownHandle,
    ) -> Result<Self> {
        let mut stdout = io::stdout();
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut term = Terminal::new(backend)?;
        term.clear()?;
        let size = term.size()?;
        let body = view::body_area(Rect::new(0, 0, size.width, size.height));

        Ok(Self {
            cloner,
            term,
            ui: Ui::new(&settings, body),
            tick: settings.tick,
            last_draw: Instant::now(),
            shutdown,
        })
    }

    fn draw(&mut self) -> Result<()> {
        let snap = self.ui.snap();
        let body = view::draw(&mut self.term, &snap)?;
        self.ui.set_body(body);
        self.ui.dirty = false;
        self.last_draw = Instant::now();
        Ok(())
    }

    fn perform(&mut self, action: Action, me: Addr<TuiActor>) {
        match action {
            Action::Quit => {
                let _ = me.try_send(TuiMsg::Shutdown);
            }
            Action::StartClone(url) => {
                let (tx, rx) = oneshot::channel();
                self.request(CloneMsg::Clone { url, reply: tx }, rx, me, TuiMsg::CloneDone);
            }
            Action::Download(site) => {
                let (tx, rx) = oneshot::channel();
                self.request(CloneMsg::Save { site, reply: tx }, rx, me, TuiMsg::Saved);
            }
            Action::WritePreview(html) => {
                let (tx, rx) = oneshot::channel();
                self.request(
                    CloneMsg::WritePreview { html, reply: tx },
                    rx,
                    me,
                    TuiMsg::PreviewWritten,
                );
            }
        }
    }

    /// Hand `msg` to the clone actor and route its reply back as a `TuiMsg`.
    fn request<T: Send + 'static>(
        &mut self,
        msg: CloneMsg,
        rx: oneshot::Receiver<clonify_common::Result<T>>,
        me: Addr<TuiActor>,
        wrap: fn(clonify_common::Result<T>) -> TuiMsg,
    ) {
        if self.cloner.try_send(msg).is_err() {
            let _ = me.try_send(wrap(Err(ClonifyError::Unavailable(
                "clone worker mailbox full or closed".into(),
            ))));
            return;
        }
        // A dropped reply ends that request only, through its own variant.
        tokio::spawn(async move {
            let res = rx
                .await
                .unwrap_or_else(|e| Err(ClonifyError::Unavailable(format!("clone worker: {e}"))));
            let _ = me.send(wrap(res)).await;
        });
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[async_trait]
impl Actor for TuiActor {
    type Msg = TuiMsg;

    async fn handle(&mut self, msg: Self::Msg, ctx: &mut Context<Self>) -> Result<()> {
        match msg {
            TuiMsg::InputEvent(ev) => match ev {
                CtEvent::Key(k) => {
                    if let Some(action) = self.ui.handle_key(k) {
                        self.perform(action, ctx.addr());
                    }
                }
                CtEvent::Mouse(m) => self.ui.handle_mouse(m.kind, m.column, m.row),
                CtEvent::Resize(_, _) => self.ui.dirty = true,
                _ => {}
            },
            TuiMsg::CloneDone(res) => self.ui.finish_clone(res),
            TuiMsg::Saved(res) => {
                self.ui
                    .finish_file(res, |p| format!("Downloaded as {}", file_name(p)));
            }
            TuiMsg::PreviewWritten(res) => {
                self.ui
                    .finish_file(res, |p| format!("Preview written to {}", p.display()));
            }
            TuiMsg::OpError(e) => self.ui.op_error(e),
            TuiMsg::Tick => {
                let moving = self.ui.on_tick(Instant::now(), self.tick.as_secs_f64());
                if moving || self.ui.dirty || self.last_draw.elapsed() >= Duration::from_secs(1) {
                    self.draw()?;
                }
            }
            TuiMsg::Shutdown => {
                restore_terminal();
                self.shutdown.signal();
                ctx.stop();
            }
        }
        Ok(())
    }
}
