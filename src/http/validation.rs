//! Request validation: raw bodies and query strings in, typed payloads out.
//! Failures carry an ordered list of field messages; the surface reports
//! only the first one.

use serde::Deserialize;

use crate::domain::todo::{CreateTodo, TodoStatus, UpdateTodo};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;
const MIN_TITLE_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn first_message(&self) -> &str {
        // Construction guarantees at least one entry.
        self.errors
            .first()
            .map(|e| e.message.as_str())
            .unwrap_or("invalid request")
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed: {}", self.first_message())
    }
}

impl std::error::Error for ValidationError {}

/// Raw create body. Status arrives as a plain string and is only allowed
/// past this module as a `TodoStatus`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTodoBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodoBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// Raw list query. Kept as strings so a non-numeric `page` is a
/// validation failure rather than an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListParams {
    pub page: u32,
    pub limit: u32,
}

struct Errors(Vec<FieldError>);

impl Errors {
    fn new() -> Self {
        Self(Vec::new())
    }

    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError { field, message: message.into() });
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.0.is_empty() { Ok(()) } else { Err(ValidationError { errors: self.0 }) }
    }
}

pub fn validate_create(body: CreateTodoBody) -> Result<CreateTodo, ValidationError> {
    let mut errors = Errors::new();

    let title = match body.title.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push("title", "The title field is required");
            String::new()
        }
        Some(t) if t.chars().count() < MIN_TITLE_LEN => {
            errors.push(
                "title",
                format!("The title field must have at least {MIN_TITLE_LEN} characters"),
            );
            String::new()
        }
        Some(t) => t.to_string(),
    };

    let description = normalize_description(body.description);
    let status = parse_status(body.status, &mut errors);

    errors.finish()?;
    Ok(CreateTodo { title, description, status })
}

pub fn validate_update(body: UpdateTodoBody) -> Result<UpdateTodo, ValidationError> {
    let mut errors = Errors::new();

    let title = match body.title.as_deref().map(str::trim) {
        None => None,
        Some(t) if t.chars().count() < MIN_TITLE_LEN => {
            errors.push(
                "title",
                format!("The title field must have at least {MIN_TITLE_LEN} characters"),
            );
            None
        }
        Some(t) => Some(t.to_string()),
    };

    let description = normalize_description(body.description);
    let status = parse_status(body.status, &mut errors);

    errors.finish()?;
    Ok(UpdateTodo { title, description, status })
}

pub fn validate_list(query: ListQuery) -> Result<ListParams, ValidationError> {
    let mut errors = Errors::new();

    let page = match query.page.as_deref() {
        None => DEFAULT_PAGE,
        Some(raw) => match raw.parse::<u32>() {
            Ok(p) if p >= 1 => p,
            _ => {
                errors.push("page", "The page field must be a number of at least 1");
                DEFAULT_PAGE
            }
        },
    };

    let limit = match query.limit.as_deref() {
        None => DEFAULT_LIMIT,
        Some(raw) => match raw.parse::<u32>() {
            Ok(l) if (1..=MAX_LIMIT).contains(&l) => l,
            _ => {
                errors.push(
                    "limit",
                    format!("The limit field must be a number between 1 and {MAX_LIMIT}"),
                );
                DEFAULT_LIMIT
            }
        },
    };

    errors.finish()?;
    Ok(ListParams { page, limit })
}

fn normalize_description(raw: Option<String>) -> Option<String> {
    raw.map(|d| escape_html(d.trim()))
}

fn parse_status(raw: Option<String>, errors: &mut Errors) -> Option<TodoStatus> {
    match raw.as_deref() {
        None => None,
        Some(s) => match TodoStatus::parse(s) {
            Some(status) => Some(status),
            None => {
                errors.push("status", "The selected status is invalid");
                None
            }
        },
    }
}

/// Escapes the characters that matter when the value is rendered as HTML.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
