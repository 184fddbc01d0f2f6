//! Interactive admin dashboard.
//!
//! The content catalog lives in memory, so publishing and deleting only
//! make sense within one process. This session reads one command per line
//! from stdin:
//! - `list [category]`: Show the catalog or one category tab
//! - `publish -t <title> -f <file>...`: Publish a batch
//! - `delete <id>`: Remove an item
//! - `logs [-l <n>]`: Show the activity log
//! - `logout`: Log the admin out and leave
//! - `quit`: Leave, keeping the session

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::admin::{AdminDashboard, AdminError};

use super::{print_items, print_logs, CategoryArg, PublishArgs, Workspace};

/// One line typed in the dashboard
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct DashboardLine {
    #[command(subcommand)]
    command: DashboardCommand,
}

#[derive(Subcommand, Debug)]
enum DashboardCommand {
    /// Show the catalog (all, or one category tab)
    List {
        #[arg(value_enum)]
        category: Option<CategoryArg>,
    },

    /// Publish one item per file
    Publish(PublishArgs),

    /// Delete an item by ID
    Delete { id: String },

    /// Show the activity log
    Logs {
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Log out and leave the dashboard
    Logout,

    /// Leave the dashboard
    #[command(alias = "exit")]
    Quit,
}

/// What the loop does after a command
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Run the dashboard until `quit`, `logout` or end of input
pub async fn run_dashboard() -> Result<()> {
    let ws = Workspace::load()?;
    let mut dashboard = ws.dashboard()?;

    let items = match dashboard.open().await {
        Ok(items) => items,
        Err(AdminError::AccessDenied) => anyhow::bail!(
            "Admin session required. Run 'yannsnote admin-login <username> <password>' first."
        ),
        Err(e) => return Err(e.into()),
    };

    println!("Admin dashboard ({} items)\n", items.len());
    print_items(&items);
    eprintln!("\n[Type 'help' for commands]");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        stdout.write_all(b"admin> ").await?;
        stdout.flush().await?;

        let Some(line) = lines
            .next_line()
            .await
            .context("Failed to read from stdin")?
        else {
            break;
        };

        let words = split_words(&line);
        if words.is_empty() {
            continue;
        }

        let Some(command) = parse_line(&words)? else {
            continue;
        };

        match run_command(&mut dashboard, command).await {
            Ok(Flow::Exit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => eprintln!("Error: {:#}", e),
        }
    }

    Ok(())
}

/// Parse one dashboard line. Help and usage errors are printed, giving `None`.
fn parse_line(words: &[String]) -> Result<Option<DashboardCommand>> {
    match DashboardLine::try_parse_from(words) {
        Ok(parsed) => Ok(Some(parsed.command)),
        Err(e) => {
            e.print().context("Failed to write to the terminal")?;
            Ok(None)
        }
    }
}

async fn run_command(dashboard: &mut AdminDashboard, command: DashboardCommand) -> Result<Flow> {
    match command {
        DashboardCommand::List { category } => {
            let items = match category {
                Some(c) => dashboard.tab(c.into()).await?,
                None => dashboard.database().sql.get_all_content().await,
            };
            print_items(&items);
        }
        DashboardCommand::Publish(args) => {
            let items = dashboard.publish(&args.into()).await?;
            println!("Published {} item(s)", items.len());
            print_items(&items);
        }
        DashboardCommand::Delete { id } => {
            if dashboard.delete(&id).await? {
                println!("Deleted: {}", id);
            } else {
                println!("No item with ID {}", id);
            }
        }
        DashboardCommand::Logs { limit } => print_logs(dashboard.database(), limit)?,
        DashboardCommand::Logout => {
            dashboard.logout()?;
            println!("Logged out");
            return Ok(Flow::Exit);
        }
        DashboardCommand::Quit => return Ok(Flow::Exit),
    }

    Ok(Flow::Continue)
}

/// Split a line into words; double quotes group words with spaces
fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    words.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }

    if pending {
        words.push(current);
    }
    words
}
