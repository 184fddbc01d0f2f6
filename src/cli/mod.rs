//! Command-line interface for yannsnote.
//!
//! Provides commands for browsing and publishing content, reading the
//! activity log, managing the local session and calling the AI tools.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::admin::{AdminDashboard, PublishRequest};
use crate::ai::prompts::{DaoBrief, PitchBrief};
use crate::ai::{AiService, GeminiClient};
use crate::auth::{Access, AccessGuard, AdminCredentials, AuthContext, Page};
use crate::config::{self, ResolvedConfig};
use crate::db::{Database, DatabaseOptions};
use crate::domain::pricing::whatsapp_link;
use crate::domain::{ChatMessage, ContentCategory, ContentItem, UserRole, PRICING};
use crate::storage::{FileStorage, LocalStorage};

pub mod admin;

/// yannsnote - Yann's Note content hub and AI study tools
#[derive(Parser, Debug)]
#[command(name = "yannsnote")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse and manage the content catalog
    Content {
        #[command(subcommand)]
        command: ContentCommands,
    },

    /// Show the admin activity log (newest first)
    Logs {
        /// Maximum number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Start a session (no password check)
    Login {
        /// Display name
        username: String,

        /// Session role
        #[arg(short, long, value_enum, default_value_t = RoleArg::Student)]
        role: RoleArg,
    },

    /// Start an admin session with the admin credentials
    AdminLogin { username: String, password: String },

    /// End the current session
    Logout,

    /// Show the current session
    Whoami,

    /// Check whether the current session may open a page
    Access {
        /// Page path or name (e.g. /students, business, #/admin)
        page: String,
    },

    /// Ask the Digital Brain (interactive when no message is given)
    Chat { message: Option<String> },

    /// Generate a study guide for a course topic
    Guide { topic: String },

    /// Analyze a public tender (DAO)
    Dao {
        #[arg(short, long)]
        keywords: String,

        #[arg(short, long)]
        budget: String,

        #[arg(short, long, default_value = "")]
        context: String,
    },

    /// Outline an investor pitch deck
    Pitch {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        problem: String,

        #[arg(short, long)]
        solution: String,
    },

    /// Write a two-minute podcast script
    Podcast { topic: String },

    /// Edit an image with a text prompt
    Studio {
        /// Source image (png, jpg, webp)
        #[arg(short, long)]
        image: PathBuf,

        /// Edit instruction
        #[arg(short, long)]
        prompt: String,

        /// Where to write the edited image
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show offers and contact link
    Pricing,

    /// Show resolved configuration (debug)
    Config,

    /// Interactive admin dashboard (reads commands from stdin)
    Admin,
}

#[derive(Subcommand, Debug)]
pub enum ContentCommands {
    /// List catalog items
    List {
        /// Only show one category
        #[arg(short, long, value_enum)]
        category: Option<CategoryArg>,
    },

    /// Publish one item per file (admin session required)
    Publish(PublishArgs),

    /// Delete an item by ID (admin session required)
    Delete { id: String },
}

/// Publish form fields
#[derive(Args, Debug, Clone)]
pub struct PublishArgs {
    /// Item title (suffixed with (n) when several files are given)
    #[arg(short, long)]
    pub title: String,

    /// Uploaded file names
    #[arg(short = 'f', long = "file", required = true)]
    pub files: Vec<String>,

    #[arg(short, long, default_value = "")]
    pub description: String,

    #[arg(short, long, value_enum, default_value_t = CategoryArg::Audio)]
    pub category: CategoryArg,

    /// Mark the items as full-size (not Zero Data)
    #[arg(long)]
    pub no_zero_data: bool,
}

impl From<PublishArgs> for PublishRequest {
    fn from(args: PublishArgs) -> Self {
        PublishRequest::new(args.title, args.category.into())
            .with_files(args.files)
            .with_description(args.description)
            .zero_data(!args.no_zero_data)
    }
}

/// Content category for CLI (maps to ContentCategory)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    Audio,
    Video,
    Slide,
    Infographic,
}

impl From<CategoryArg> for ContentCategory {
    fn from(c: CategoryArg) -> Self {
        match c {
            CategoryArg::Audio => ContentCategory::Audio,
            CategoryArg::Video => ContentCategory::Video,
            CategoryArg::Slide => ContentCategory::Slide,
            CategoryArg::Infographic => ContentCategory::Infographic,
        }
    }
}

/// Session role for CLI (maps to UserRole)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Guest,
    Student,
    Business,
    Admin,
}

impl From<RoleArg> for UserRole {
    fn from(r: RoleArg) -> Self {
        match r {
            RoleArg::Guest => UserRole::Guest,
            RoleArg::Student => UserRole::Student,
            RoleArg::Business => UserRole::Business,
            RoleArg::Admin => UserRole::Admin,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Content { command } => execute_content(command).await,
            Commands::Logs { limit } => show_logs(limit),
            Commands::Login { username, role } => login(&username, role.into()),
            Commands::AdminLogin { username, password } => admin_login(&username, &password),
            Commands::Logout => logout(),
            Commands::Whoami => whoami(),
            Commands::Access { page } => check_access(&page),
            Commands::Chat { message } => chat(message).await,
            Commands::Guide { topic } => {
                let ai = ai_service()?;
                println!("{}", ai.study_guide(&topic).await);
                Ok(())
            }
            Commands::Dao {
                keywords,
                budget,
                context,
            } => {
                let ai = ai_service()?;
                let brief = DaoBrief {
                    keywords,
                    budget,
                    context,
                };
                println!("{}", ai.dao_analysis(&brief).await);
                Ok(())
            }
            Commands::Pitch {
                name,
                problem,
                solution,
            } => {
                let ai = ai_service()?;
                let brief = PitchBrief {
                    project_name: name,
                    problem,
                    solution,
                };
                println!("{}", ai.pitch_deck(&brief).await);
                Ok(())
            }
            Commands::Podcast { topic } => {
                let ai = ai_service()?;
                println!("{}", ai.podcast_script(&topic).await);
                Ok(())
            }
            Commands::Studio {
                image,
                prompt,
                output,
            } => studio(&image, &prompt, &output).await,
            Commands::Pricing => {
                show_pricing();
                Ok(())
            }
            Commands::Config => show_config(),
            Commands::Admin => admin::run_dashboard().await,
        }
    }
}

/// Storage and database built from the global configuration
pub(crate) struct Workspace {
    pub config: &'static ResolvedConfig,
    pub storage: Arc<dyn LocalStorage>,
    pub db: Arc<Database>,
}

impl Workspace {
    pub fn load() -> Result<Self> {
        let config = config::config()?;
        let storage: Arc<dyn LocalStorage> = Arc::new(FileStorage::in_dir(&config.home));
        let db = Arc::new(Database::new(
            storage.clone(),
            &DatabaseOptions::from_config(config),
        ));

        Ok(Self {
            config,
            storage,
            db,
        })
    }

    pub fn auth(&self) -> Result<AuthContext> {
        AuthContext::restore(self.storage.clone()).context("Failed to restore session")
    }

    pub fn dashboard(&self) -> Result<AdminDashboard> {
        Ok(AdminDashboard::new(self.db.clone(), self.auth()?).with_publish_delay(
            Duration::from_millis(self.config.simulation.publish_delay_ms),
        ))
    }
}

/// Execute content subcommands
async fn execute_content(command: ContentCommands) -> Result<()> {
    let ws = Workspace::load()?;

    match command {
        ContentCommands::List { category } => {
            let items = match category {
                Some(c) => ws.db.sql.get_by_category(c.into()).await,
                None => ws.db.sql.get_all_content().await,
            };
            print_items(&items);
            Ok(())
        }
        ContentCommands::Publish(args) => {
            let dashboard = ws.dashboard()?;
            let items = dashboard.publish(&args.into()).await?;
            println!("Published {} item(s):", items.len());
            print_items(&items);
            eprintln!("\n[The catalog is in memory; use 'yannsnote admin' to keep a session]");
            Ok(())
        }
        ContentCommands::Delete { id } => {
            let dashboard = ws.dashboard()?;
            if dashboard.delete(&id).await? {
                println!("Deleted: {}", id);
            } else {
                println!("No item with ID {}", id);
            }
            Ok(())
        }
    }
}

/// Print catalog items as a table
pub(crate) fn print_items(items: &[ContentItem]) {
    if items.is_empty() {
        println!("No content found");
        return;
    }

    println!("{:<16} {:<12} {:<5} {:<11} {:<45}", "ID", "CATEGORY", "ZERO", "DATE", "TITLE");
    println!("{}", "-".repeat(92));

    for item in items {
        println!(
            "{:<16} {:<12} {:<5} {:<11} {:<45}",
            item.id,
            item.category.as_str(),
            if item.is_zero_data { "yes" } else { "no" },
            item.date,
            truncate(&item.title, 45)
        );
    }
}

/// Shorten to `max` characters, marking the cut with "..."
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

/// Show the activity log
pub(crate) fn show_logs(limit: usize) -> Result<()> {
    let ws = Workspace::load()?;
    print_logs(&ws.db, limit)
}

pub(crate) fn print_logs(db: &Database, limit: usize) -> Result<()> {
    let logs = db.nosql.get_logs()?;

    if logs.is_empty() {
        println!("No activity recorded");
        return Ok(());
    }

    println!("{:<26} {:<24} {}", "TIMESTAMP", "ACTION", "DETAILS");
    println!("{}", "-".repeat(80));

    for log in logs.iter().take(limit) {
        println!("{:<26} {:<24} {}", log.timestamp, log.action, log.metadata);
    }

    println!("\nTotal: {} entries (max {})", logs.len(), db.nosql.capacity());
    Ok(())
}

fn login(username: &str, role: UserRole) -> Result<()> {
    let ws = Workspace::load()?;
    let user = ws.auth()?.login(username, role)?;
    println!("Logged in as {} ({})", user.username, user.role);
    Ok(())
}

fn admin_login(username: &str, password: &str) -> Result<()> {
    let ws = Workspace::load()?;
    AdminCredentials::from_settings(&ws.config.admin).verify(username, password)?;

    let user = ws.auth()?.login(username, UserRole::Admin)?;
    println!("Logged in as {} ({})", user.username, user.role);
    Ok(())
}

fn logout() -> Result<()> {
    let ws = Workspace::load()?;
    ws.auth()?.logout()?;
    println!("Logged out");
    Ok(())
}

fn whoami() -> Result<()> {
    let ws = Workspace::load()?;
    let auth = ws.auth()?;

    match auth.user() {
        Some(user) if auth.is_authenticated() => {
            println!("{} ({})", user.username, user.role)
        }
        _ => println!("Not logged in ({})", auth.role()),
    }
    Ok(())
}

fn check_access(page: &str) -> Result<()> {
    let page: Page = page.parse()?;
    let ws = Workspace::load()?;
    let auth = ws.auth()?;

    match AccessGuard::check_page(auth.user(), page) {
        Access::Granted => println!("{}: granted", page.path()),
        Access::RedirectToLogin => {
            println!("{}: redirect to {}", page.path(), Page::Login.path())
        }
        Access::RedirectToHome => {
            println!("{}: redirect to {}", page.path(), Page::Home.path())
        }
    }
    Ok(())
}

/// Build the AI service from configuration
fn ai_service() -> Result<AiService> {
    let cfg = config::config()?;
    let client = GeminiClient::from_settings(&cfg.ai).context("Failed to create AI client")?;

    if !client.has_api_key() {
        tracing::warn!("No API key configured; AI answers will be fallback messages");
    }

    Ok(AiService::new(Arc::new(client), cfg.ai.clone()))
}

/// One-shot or interactive chat
async fn chat(message: Option<String>) -> Result<()> {
    let ai = ai_service()?;
    let mut history = vec![ChatMessage::welcome()];

    if let Some(message) = message {
        println!("{}", ai.generate_chat_response(&message, &history).await);
        return Ok(());
    }

    println!("{}\n", history[0].text);
    eprintln!("[Type 'exit' to quit]");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read from stdin")?
    {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "exit" || input == "quit" {
            break;
        }

        let answer = ai.generate_chat_response(input, &history).await;
        println!("\n{}\n", answer);

        history.push(ChatMessage::user(input));
        history.push(ChatMessage::model(answer));
    }

    Ok(())
}

/// MIME type of a supported image file
fn image_mime_type(path: &Path) -> Result<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "webp" => Ok("image/webp"),
        "gif" => Ok("image/gif"),
        _ => anyhow::bail!("Unsupported image type: {}", path.display()),
    }
}

async fn studio(image: &Path, prompt: &str, output: &Path) -> Result<()> {
    let mime_type = image_mime_type(image)?;
    let bytes = tokio::fs::read(image)
        .await
        .with_context(|| format!("Failed to read image: {}", image.display()))?;

    let ai = ai_service()?;
    let Some((out_mime, edited)) = ai.edit_image_bytes(&bytes, mime_type, prompt).await else {
        anyhow::bail!("L'édition de l'image a échoué. Veuillez réessayer.");
    };

    tokio::fs::write(output, &edited)
        .await
        .with_context(|| format!("Failed to write image: {}", output.display()))?;

    println!("Saved {} ({}, {} bytes)", output.display(), out_mime, edited.len());
    Ok(())
}

fn show_pricing() {
    for offer in &PRICING {
        println!("{} - {}", offer.title, offer.price);
        for feature in offer.features {
            println!("  * {}", feature);
        }
        println!("  -> {}", offer.cta);
        println!();
    }
    println!("WhatsApp: {}", whatsapp_link());
}

fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("══════════════════════════════════════════════════");
    println!("  Yann's Note Configuration");
    println!("══════════════════════════════════════════════════");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:          {}", cfg.home.display());
    println!("  Local storage: {}", cfg.storage_path().display());
    println!();
    println!("Simulation:");
    println!("  Latency:       {}ms", cfg.simulation.latency_ms);
    println!("  Publish delay: {}ms", cfg.simulation.publish_delay_ms);
    println!("  Log capacity:  {}", cfg.simulation.log_capacity);
    println!();
    println!("AI:");
    println!(
        "  API key:        {}",
        if cfg.ai.api_key.is_some() { "(set)" } else { "(missing)" }
    );
    println!("  Base URL:       {}", cfg.ai.base_url);
    println!("  Chat model:     {}", cfg.ai.chat_model);
    println!("  Thinking model: {}", cfg.ai.thinking_model);
    println!("  Image model:    {}", cfg.ai.image_model);
    println!("  Thinking budget: {}", cfg.ai.thinking_budget);
    println!("  Timeout:        {}s", cfg.ai.timeout_seconds);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("Résumé", 10), "Résumé");
        assert_eq!(truncate("éééééééééé", 6), "ééé...");
    }

    #[test]
    fn test_image_mime_type() {
        assert_eq!(image_mime_type(Path::new("a.PNG")).unwrap(), "image/png");
        assert_eq!(image_mime_type(Path::new("b.jpeg")).unwrap(), "image/jpeg");
        assert!(image_mime_type(Path::new("c.txt")).is_err());
        assert!(image_mime_type(Path::new("noext")).is_err());
    }

    #[test]
    fn test_publish_args_into_request() {
        let cli = Cli::try_parse_from([
            "yannsnote", "content", "publish", "-t", "Cours", "-f", "a.mp3", "-f", "b.mp3",
            "-c", "video", "--no-zero-data",
        ])
        .unwrap();

        let Commands::Content {
            command: ContentCommands::Publish(args),
        } = cli.command
        else {
            panic!("expected content publish");
        };

        let request: PublishRequest = args.into();
        assert_eq!(request.files, vec!["a.mp3", "b.mp3"]);
        assert_eq!(request.category, ContentCategory::Video);
        assert!(!request.is_zero_data);
    }

    #[test]
    fn test_login_default_role() {
        let cli = Cli::try_parse_from(["yannsnote", "login", "awa"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Login { role: RoleArg::Student, .. }
        ));
    }
}
