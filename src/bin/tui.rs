use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Terminal,
};
use std::time::Duration;

use todos::client::api::{HttpTodoApi, TodoApi, TodoDraft};
use todos::client::store::TodoStore;
use todos::domain::todo::TodoStatus;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let base_url = std::env::var("API_BASE_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:3000/api/v1".to_string());
    let store = TodoStore::new(HttpTodoApi::new(base_url));

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, store).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    View,
    Create,
    Edit,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ActiveField {
    Title,
    Description,
}

struct App<A: TodoApi> {
    store: TodoStore<A>,
    selected: usize,
    list_state: ListState,
    mode: Mode,
    field: ActiveField,
    draft_title: String,
    draft_desc: String,
}

impl<A: TodoApi> App<A> {
    fn new(store: TodoStore<A>) -> Self {
        Self {
            store,
            selected: 0,
            list_state: ListState::default(),
            mode: Mode::View,
            field: ActiveField::Title,
            draft_title: String::new(),
            draft_desc: String::new(),
        }
    }

    async fn refresh(&mut self) {
        let (page, limit) = (self.store.current_page, self.store.limit);
        self.store.fetch_list(page, limit).await;
        self.clamp_selection();
    }

    async fn goto_page(&mut self, page: u32) {
        self.store.set_current_page(page);
        self.refresh().await;
    }

    fn clamp_selection(&mut self) {
        let len = self.store.todos.len();
        if len == 0 {
            self.selected = 0;
            self.list_state.select(None);
        } else {
            if self.selected >= len {
                self.selected = len - 1;
            }
            self.list_state.select(Some(self.selected));
        }
    }

    fn reset_draft(&mut self) {
        self.mode = Mode::View;
        self.field = ActiveField::Title;
        self.draft_title.clear();
        self.draft_desc.clear();
    }
}

fn status_mark(status: TodoStatus) -> &'static str {
    match status {
        TodoStatus::Todo => "[ ]",
        TodoStatus::InProgress => "[>]",
        TodoStatus::Pending => "[?]",
        TodoStatus::Done => "[x]",
    }
}

fn next_status(status: TodoStatus) -> TodoStatus {
    match status {
        TodoStatus::Todo => TodoStatus::InProgress,
        TodoStatus::InProgress => TodoStatus::Pending,
        TodoStatus::Pending => TodoStatus::Done,
        TodoStatus::Done => TodoStatus::Todo,
    }
}

async fn run_app<A: TodoApi>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    store: TodoStore<A>,
) -> Result<()> {
    let mut app = App::new(store);
    app.refresh().await;

    loop {
        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(1),
                    Constraint::Length(3),
                ])
                .split(f.size());

            let header = Paragraph::new(
                "Todos (Enter: cycle status, n: new, e: edit, d: delete, \u{2190}/\u{2192}: page, r: reload, q: quit)",
            )
            .block(Block::default().borders(Borders::ALL).title("todos-tui"));
            f.render_widget(header, chunks[0]);

            let middle = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(chunks[1]);

            let list_items: Vec<ListItem> = app
                .store
                .todos
                .iter()
                .map(|t| ListItem::new(format!("{} {}", status_mark(t.status), t.title)))
                .collect();
            if app.store.todos.is_empty() {
                app.list_state.select(None);
            } else {
                app.list_state.select(Some(app.selected));
            }
            let list_title = format!(
                "items — page {}/{}",
                app.store.current_page,
                app.store.last_page()
            );
            let list = List::new(list_items)
                .block(Block::default().borders(Borders::ALL).title(list_title))
                .highlight_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED),
                )
                .highlight_symbol(">> ");
            f.render_stateful_widget(list, middle[0], &mut app.list_state);

            let detail = match app.store.todos.get(app.selected) {
                Some(t) => format!(
                    "Title:\n{}\n\nStatus: {}\n\nDescription:\n{}",
                    t.title,
                    t.status.as_str(),
                    t.description.as_deref().unwrap_or("(no description)")
                ),
                None => String::new(),
            };
            let details =
                Paragraph::new(detail).block(Block::default().borders(Borders::ALL).title("details"));
            f.render_widget(details, middle[1]);

            let footer_text = match app.mode {
                Mode::View => {
                    let total = app.store.meta.map(|m| m.total).unwrap_or(0);
                    let state = if app.store.loading {
                        "loading...".to_string()
                    } else if let Some(err) = &app.store.error {
                        format!("error: {err}")
                    } else {
                        "ok".to_string()
                    };
                    format!("{} total | {} per page | {}", total, app.store.limit, state)
                }
                Mode::Create | Mode::Edit => format!(
                    "{} — {}: {}_  |  (Tab to switch, Enter to save, Esc to cancel)",
                    if app.mode == Mode::Create { "Create" } else { "Edit" },
                    match app.field {
                        ActiveField::Title => "Title",
                        ActiveField::Description => "Desc",
                    },
                    match app.field {
                        ActiveField::Title => &app.draft_title,
                        ActiveField::Description => &app.draft_desc,
                    }
                ),
            };
            let footer = Paragraph::new(footer_text).block(
                Block::default().borders(Borders::ALL).title(match app.mode {
                    Mode::View => "info",
                    Mode::Create => "create",
                    Mode::Edit => "edit",
                }),
            );
            f.render_widget(footer, chunks[2]);
        })?;

        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match app.mode {
                    Mode::View => match key.code {
                        KeyCode::Char('q') => break,
                        KeyCode::Esc => app.store.clear_error(),
                        KeyCode::Up => {
                            if app.selected > 0 {
                                app.selected -= 1;
                            }
                        }
                        KeyCode::Down => {
                            if app.selected + 1 < app.store.todos.len() {
                                app.selected += 1;
                            }
                        }
                        KeyCode::Left => {
                            let page = app.store.current_page;
                            if page > 1 {
                                app.goto_page(page - 1).await;
                            }
                        }
                        KeyCode::Right => {
                            let page = app.store.current_page;
                            if page < app.store.last_page() {
                                app.goto_page(page + 1).await;
                            }
                        }
                        KeyCode::Char('r') => app.refresh().await,
                        KeyCode::Enter => {
                            if let Some(t) = app.store.todos.get(app.selected) {
                                let (id, status) = (t.id, t.status);
                                app.store
                                    .update(
                                        id,
                                        TodoDraft {
                                            status: Some(next_status(status)),
                                            ..Default::default()
                                        },
                                    )
                                    .await;
                            }
                        }
                        KeyCode::Char('n') => {
                            app.mode = Mode::Create;
                            app.field = ActiveField::Title;
                            app.draft_title.clear();
                            app.draft_desc.clear();
                        }
                        KeyCode::Char('e') => {
                            if let Some(t) = app.store.todos.get(app.selected) {
                                app.draft_title = t.title.clone();
                                app.draft_desc = t.description.clone().unwrap_or_default();
                                app.mode = Mode::Edit;
                                app.field = ActiveField::Title;
                            }
                        }
                        KeyCode::Char('d') => {
                            if let Some(t) = app.store.todos.get(app.selected) {
                                let id = t.id;
                                app.store.delete(id).await;
                                app.refresh().await;
                            }
                        }
                        _ => {}
                    },
                    Mode::Create => match key.code {
                        KeyCode::Esc => app.reset_draft(),
                        KeyCode::Enter => {
                            let title = app.draft_title.trim().to_string();
                            let desc = app.draft_desc.trim().to_string();
                            if !title.is_empty() {
                                app.store
                                    .create(TodoDraft {
                                        title: Some(title),
                                        description: if desc.is_empty() { None } else { Some(desc) },
                                        status: None,
                                    })
                                    .await;
                            }
                            app.reset_draft();
                            app.refresh().await;
                        }
                        KeyCode::Backspace => match app.field {
                            ActiveField::Title => {
                                app.draft_title.pop();
                            }
                            ActiveField::Description => {
                                app.draft_desc.pop();
                            }
                        },
                        KeyCode::Char(c) => match app.field {
                            ActiveField::Title => app.draft_title.push(c),
                            ActiveField::Description => app.draft_desc.push(c),
                        },
                        KeyCode::Tab => {
                            app.field = match app.field {
                                ActiveField::Title => ActiveField::Description,
                                ActiveField::Description => ActiveField::Title,
                            };
                        }
                        _ => {}
                    },
                    Mode::Edit => match key.code {
                        KeyCode::Esc => app.reset_draft(),
                        KeyCode::Enter => {
                            if let Some(t) = app.store.todos.get(app.selected) {
                                let id = t.id;
                                let title = app.draft_title.trim().to_string();
                                let desc = app.draft_desc.trim().to_string();
                                app.store
                                    .update(
                                        id,
                                        TodoDraft {
                                            title: if title.is_empty() { None } else { Some(title) },
                                            description: if desc.is_empty() {
                                                None
                                            } else {
                                                Some(desc)
                                            },
                                            status: None,
                                        },
                                    )
                                    .await;
                            }
                            app.reset_draft();
                        }
                        KeyCode::Backspace => match app.field {
                            ActiveField::Title => {
                                app.draft_title.pop();
                            }
                            ActiveField::Description => {
                                app.draft_desc.pop();
                            }
                        },
                        KeyCode::Char(c) => match app.field {
                            ActiveField::Title => app.draft_title.push(c),
                            ActiveField::Description => app.draft_desc.push(c),
                        },
                        KeyCode::Tab => {
                            app.field = match app.field {
                                ActiveField::Title => ActiveField::Description,
                                ActiveField::Description => ActiveField::Title,
                            };
                        }
                        _ => {}
                    },
                }
            }
        }
    }
    Ok(())
}
