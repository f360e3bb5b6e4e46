use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::{LedgerService, ServiceConfig};
use crate::domain::{
    Entry, EntryFilter, EntryId, EntryStatus, EntryType, PasswordHash, UserId, format_cents,
    parse_cents,
};
use crate::storage::Repository;

type Service = LedgerService<Repository>;

/// Finbook - Personal Finance Ledger
#[derive(Parser)]
#[command(name = "finbook")]
#[command(about = "Record income and expenses per month and track your settled balance")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "finbook.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// bcrypt cost for hashing new passwords
    #[arg(long, global = true, default_value_t = PasswordHash::DEFAULT_COST)]
    pub password_cost: u32,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// User management commands
    #[command(subcommand)]
    User(UserCommands),

    /// Entry management commands
    #[command(subcommand)]
    Entry(EntryCommands),

    /// Show a user's balance (settled income minus settled expense)
    Balance {
        /// User ID
        #[arg(long)]
        user: UserId,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a new user
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address (must be unique)
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },

    /// Check an email and password
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// Show a user
    Show {
        /// User ID
        id: UserId,
    },
}

#[derive(Subcommand)]
pub enum EntryCommands {
    /// Record a new entry (starts out pending)
    Add {
        /// Owner user ID
        #[arg(long)]
        user: UserId,

        /// Amount (e.g., "50.00" or "50")
        value: String,

        /// Entry type: income, expense
        #[arg(short = 't', long = "type")]
        entry_type: String,

        /// Description of the entry
        #[arg(short, long)]
        description: String,

        /// Competence month (1-12)
        #[arg(short, long)]
        month: u32,

        /// Competence year
        #[arg(short, long)]
        year: i32,
    },

    /// List entries matching every given field
    List {
        /// Owner user ID
        #[arg(long)]
        user: Option<UserId>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        month: Option<u32>,

        #[arg(short, long)]
        year: Option<i32>,

        /// Entry type: income, expense
        #[arg(short = 't', long = "type")]
        entry_type: Option<String>,

        /// Status: pending, settled, cancelled
        #[arg(short, long)]
        status: Option<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single entry
    Show {
        /// Entry ID
        id: EntryId,
    },

    /// Change fields of a saved entry
    Update {
        /// Entry ID
        id: EntryId,

        /// New amount
        #[arg(long)]
        value: Option<String>,

        /// Entry type: income, expense
        #[arg(short = 't', long = "type")]
        entry_type: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        month: Option<u32>,

        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Set the status of a saved entry
    Status {
        /// Entry ID
        id: EntryId,

        /// New status: pending, settled, cancelled
        status: String,
    },

    /// Delete a saved entry
    Delete {
        /// Entry ID
        id: EntryId,
    },
}

impl Cli {
    fn config(&self) -> ServiceConfig {
        ServiceConfig::default().with_password_cost(self.password_cost)
    }

    pub async fn run(self) -> Result<()> {
        let config = self.config();

        match self.command {
            Commands::Init => {
                LedgerService::init(&self.database, config).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::User(user_cmd) => {
                let service = LedgerService::connect(&self.database, config).await?;
                run_user_command(&service, user_cmd).await?;
            }

            Commands::Entry(entry_cmd) => {
                let service = LedgerService::connect(&self.database, config).await?;
                run_entry_command(&service, entry_cmd).await?;
            }

            Commands::Balance { user } => {
                let service = LedgerService::connect(&self.database, config).await?;
                let balance = service.entries().balance(user).await?;
                println!("Balance for user {}: {}", user, format_cents(balance));
            }
        }

        Ok(())
    }
}

async fn run_user_command(service: &Service, cmd: UserCommands) -> Result<()> {
    match cmd {
        UserCommands::Register {
            name,
            email,
            password,
        } => {
            let user = service.users().register(name, email, &password).await?;
            println!(
                "Registered user: {} <{}> ({})",
                user.name,
                user.email,
                display_id(user.id)
            );
        }

        UserCommands::Login { email, password } => {
            let user = service.users().authenticate(&email, &password).await?;
            println!("Authenticated: {} ({})", user.name, display_id(user.id));
        }

        UserCommands::Show { id } => {
            let user = service
                .users()
                .find_by_id(id)
                .await?
                .with_context(|| format!("User {} not found", id))?;
            println!("User: {}", user.name);
            println!("  ID:    {}", display_id(user.id));
            println!("  Email: {}", user.email);
        }
    }
    Ok(())
}

async fn run_entry_command(service: &Service, cmd: EntryCommands) -> Result<()> {
    match cmd {
        EntryCommands::Add {
            user,
            value,
            entry_type,
            description,
            month,
            year,
        } => {
            let value = parse_cents(&value).context("Invalid amount format. Use '50.00' or '50'")?;
            let entry = Entry::new(
                description,
                month,
                year,
                value,
                parse_entry_type(&entry_type)?,
                user,
            );

            let saved = service.entries().save(&entry).await?;
            println!(
                "Recorded entry {}: {} {} ({:02}/{})",
                display_id(saved.id),
                saved.entry_type.map(|t| t.as_str()).unwrap_or("-"),
                format_cents(saved.value.unwrap_or(0)),
                month,
                year
            );
        }

        EntryCommands::List {
            user,
            description,
            month,
            year,
            entry_type,
            status,
            json,
        } => {
            let filter = EntryFilter {
                description,
                month,
                year,
                entry_type: entry_type.as_deref().map(parse_entry_type).transpose()?,
                status: status.as_deref().map(parse_status).transpose()?,
                owner: user,
                ..Default::default()
            };
            let entries = service.entries().find_filtered(&filter).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No entries found.");
            } else {
                print_entry_table(&entries);
            }
        }

        EntryCommands::Show { id } => {
            let entry = find_entry(service, id).await?;
            print_entry(&entry);
        }

        EntryCommands::Update {
            id,
            value,
            entry_type,
            description,
            month,
            year,
        } => {
            let mut entry = find_entry(service, id).await?;
            if let Some(value) = value {
                entry.value =
                    Some(parse_cents(&value).context("Invalid amount format. Use '50.00' or '50'")?);
            }
            if let Some(entry_type) = entry_type {
                entry.entry_type = Some(parse_entry_type(&entry_type)?);
            }
            if description.is_some() {
                entry.description = description;
            }
            if month.is_some() {
                entry.month = month;
            }
            if year.is_some() {
                entry.year = year;
            }

            let updated = service.entries().update(&entry).await?;
            println!("Updated entry {}", display_id(updated.id));
        }

        EntryCommands::Status { id, status } => {
            let status = parse_status(&status)?;
            let mut entry = find_entry(service, id).await?;
            service.entries().update_status(&mut entry, status).await?;
            println!("Entry {} is now {}", id, status);
        }

        EntryCommands::Delete { id } => {
            let entry = find_entry(service, id).await?;
            service.entries().delete(&entry).await?;
            println!("Deleted entry {}", id);
        }
    }
    Ok(())
}

async fn find_entry(service: &Service, id: EntryId) -> Result<Entry> {
    service
        .entries()
        .find_by_id(id)
        .await?
        .with_context(|| format!("Entry {} not found", id))
}

fn print_entry_table(entries: &[Entry]) {
    println!(
        "{:<6} {:<7} {:<24} {:<8} {:<10} {:>12}",
        "ID", "PERIOD", "DESCRIPTION", "TYPE", "STATUS", "VALUE"
    );
    println!("{}", "-".repeat(72));
    for entry in entries {
        println!(
            "{:<6} {:<7} {:<24} {:<8} {:<10} {:>12}",
            display_id(entry.id),
            format!(
                "{:02}/{}",
                entry.month.unwrap_or(0),
                entry.year.unwrap_or(0)
            ),
            truncate(entry.description.as_deref().unwrap_or(""), 24),
            entry.entry_type.map(|t| t.as_str()).unwrap_or("-"),
            entry.status.map(|s| s.as_str()).unwrap_or("-"),
            format_cents(entry.value.unwrap_or(0))
        );
    }
}

fn print_entry(entry: &Entry) {
    println!("Entry: {}", display_id(entry.id));
    println!(
        "  Description: {}",
        entry.description.as_deref().unwrap_or("-")
    );
    println!(
        "  Period:      {:02}/{}",
        entry.month.unwrap_or(0),
        entry.year.unwrap_or(0)
    );
    println!(
        "  Type:        {}",
        entry.entry_type.map(|t| t.as_str()).unwrap_or("-")
    );
    println!(
        "  Status:      {}",
        entry.status.map(|s| s.as_str()).unwrap_or("-")
    );
    println!("  Value:       {}", format_cents(entry.value.unwrap_or(0)));
    if let Some(owner) = entry.owner {
        println!("  User:        {}", owner);
    }
    if let Some(registered_at) = entry.registered_at {
        println!("  Registered:  {}", registered_at.format("%Y-%m-%d"));
    }
}

fn parse_entry_type(s: &str) -> Result<EntryType> {
    EntryType::from_str(s)
        .ok_or_else(|| anyhow::anyhow!("Invalid entry type '{}'. Valid types: income, expense", s))
}

fn parse_status(s: &str) -> Result<EntryStatus> {
    EntryStatus::from_str(s).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid status '{}'. Valid statuses: pending, settled, cancelled",
            s
        )
    })
}

fn display_id(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "-".into())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
