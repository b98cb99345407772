use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::{
    application::{ListView, Session},
    domain::{Item, Pagination, ResourceKind},
};

#[derive(Parser)]
#[command(name = "dummyshop")]
#[command(about = "Browse DummyJSON products and users from the terminal")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the API base URL (defaults to DUMMYJSON_BASE_URL or https://dummyjson.com)
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List products, one page at a time
    Products {
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Items per page
        #[arg(short, long)]
        limit: Option<u32>,

        /// Search text, sent to the product search endpoint
        #[arg(short, long, default_value = "")]
        search: String,

        /// Show only this category from the fetched page
        #[arg(short, long, default_value = "All")]
        category: String,
    },

    /// Show a single product
    Product {
        /// Product ID
        id: String,
    },

    /// List users, one page at a time
    Users {
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Items per page
        #[arg(short, long)]
        limit: Option<u32>,

        /// Filter the fetched page by name or email
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Show a single user
    User {
        /// User ID
        id: String,
    },

    /// Log in against the mock auth endpoint
    Login {
        username: String,
        password: String,
    },

    /// Log in, then list products on the admin dashboard
    Dashboard {
        username: String,
        password: String,

        /// Items to show
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// List current configuration
    List,

    /// Check that the API is reachable
    Test,
}

/// Builds the list view for a command. The page is applied after the search
/// text and category so that their page reset does not clobber it.
pub fn build_view(
    kind: ResourceKind,
    page_size: u32,
    page: u32,
    search: &str,
    category: Option<&str>,
) -> ListView {
    let mut view = ListView::new(kind, page_size);
    view.set_search(search);
    if let Some(category) = category {
        view.set_category(category);
    }
    view.go_to(page);
    view
}

pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

fn field(item: &Item, name: &str) -> String {
    item.get(name).map(render_value).unwrap_or_else(|| "-".to_string())
}

pub fn product_line(item: &Item) -> String {
    format!(
        "[{}] {} | ${} | rating {} | {}",
        field(item, "id"),
        field(item, "title"),
        field(item, "price"),
        field(item, "rating"),
        field(item, "category"),
    )
}

pub fn user_line(item: &Item) -> String {
    format!(
        "[{}] {} {} <{}>",
        field(item, "id"),
        field(item, "firstName"),
        field(item, "lastName"),
        field(item, "email"),
    )
}

pub fn dashboard_line(item: &Item) -> String {
    format!(
        "{} | ${} | {}",
        field(item, "title"),
        field(item, "price"),
        field(item, "description"),
    )
}

pub fn pager_line(pagination: &Pagination) -> String {
    format!(
        "{} Page {} / {} {}",
        if pagination.has_prev() { "< Prev" } else { "      " },
        pagination.page,
        pagination.total_pages(),
        if pagination.has_next() { "Next >" } else { "" },
    )
    .trim_end()
    .to_string()
}

pub fn print_detail(kind: ResourceKind, item: &Item) {
    match kind {
        ResourceKind::Product => println!("Product: {}", field(item, "title")),
        ResourceKind::User => println!(
            "User: {} {}",
            field(item, "firstName"),
            field(item, "lastName")
        ),
    }
    for (key, value) in item.fields() {
        println!("  {}: {}", key, render_value(value));
    }
}

pub fn print_session(session: &Session) {
    println!("Logged in as {}", session.display_name());
    if let Some(email) = session.profile.str_field("email") {
        println!("Email: {}", email);
    }
    println!("Token: {}", session.token);
    println!("Expires: {}", session.expires_at);
}
