use anyhow::Result;
use clap::{Parser, Subcommand};

use admin_client::cli;

#[derive(Debug, Parser)]
#[command(name = "adminctl")]
#[command(about = "Terminal client for the admin console backend")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Log in and persist the session token
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        /// Captcha key from `adminctl captcha`
        #[arg(long)]
        captcha_key: Option<String>,
        /// Answer to the captcha challenge
        #[arg(long)]
        captcha_code: Option<String>,
    },
    /// Fetch a captcha challenge for login
    Captcha,
    /// Log out and discard the persisted session token
    Logout,
    /// Show the logged-in user's identity and roles
    Whoami,
    /// System configuration records
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Platform user management
    Platform {
        #[command(subcommand)]
        command: PlatformCommands,
    },
    /// Dashboard statistics
    Dashboard {
        #[command(subcommand)]
        command: DashboardCommands,
    },
    /// Dictionary cache
    Dict {
        #[command(subcommand)]
        command: DictCommands,
    },
    /// Manage the adminctl config file
    ConfigFile {
        #[command(subcommand)]
        command: ConfigFileCommands,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// List config records
    List {
        /// Filter by config name
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = "1")]
        page: u32,
        #[arg(long, default_value = "20")]
        page_size: u32,
    },
    /// Show one config record
    Get { id: u64 },
    /// Create a config record
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        key: String,
        #[arg(long)]
        value: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Update a config record
    Update {
        id: u64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        key: String,
        #[arg(long)]
        value: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Delete a config record
    Delete { id: u64 },
    /// Ask the backend to rebuild its config cache
    Refresh,
}

#[derive(Debug, Subcommand)]
enum PlatformCommands {
    /// List users
    List {
        /// Filter by username
        #[arg(long)]
        username: Option<String>,
        /// Filter by status (1 enabled, 0 disabled)
        #[arg(long)]
        status: Option<i32>,
        #[arg(long, default_value = "1")]
        page: u32,
        #[arg(long, default_value = "20")]
        page_size: u32,
    },
    /// Show one user
    Get { id: u64 },
    /// Delete users by id
    Delete { ids: Vec<u64> },
    /// Show the logged-in user's profile
    Profile,
}

#[derive(Debug, Subcommand)]
enum DashboardCommands {
    /// Headline visit counters
    Stats,
    /// Visit trend over a date range
    Trend {
        /// Start date, YYYY-MM-DD
        #[arg(long)]
        start: String,
        /// End date, YYYY-MM-DD
        #[arg(long)]
        end: String,
    },
}

#[derive(Debug, Subcommand)]
enum DictCommands {
    /// Bulk-fetch all dictionaries into the local cache
    Sync,
    /// Show cached dictionaries (all codes, or one)
    Show { code: Option<String> },
    /// Clear the local dictionary cache
    Clear,
}

#[derive(Debug, Subcommand)]
enum ConfigFileCommands {
    /// Write the annotated default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Login {
            username,
            password,
            captcha_key,
            captcha_code,
        } => cli::run_login(&username, &password, captcha_key, captcha_code),
        Commands::Captcha => cli::run_captcha(),
        Commands::Logout => cli::run_logout(),
        Commands::Whoami => cli::run_whoami(),
        Commands::Config { command } => match command {
            ConfigCommands::List {
                name,
                page,
                page_size,
            } => cli::run_config_list(name, page, page_size),
            ConfigCommands::Get { id } => cli::run_config_get(id),
            ConfigCommands::Create {
                name,
                key,
                value,
                description,
            } => cli::run_config_create(&name, &key, &value, &description),
            ConfigCommands::Update {
                id,
                name,
                key,
                value,
                description,
            } => cli::run_config_update(id, &name, &key, &value, &description),
            ConfigCommands::Delete { id } => cli::run_config_delete(id),
            ConfigCommands::Refresh => cli::run_config_refresh(),
        },
        Commands::Platform { command } => match command {
            PlatformCommands::List {
                username,
                status,
                page,
                page_size,
            } => cli::run_platform_list(username, status, page, page_size),
            PlatformCommands::Get { id } => cli::run_platform_get(id),
            PlatformCommands::Delete { ids } => cli::run_platform_delete(&ids),
            PlatformCommands::Profile => cli::run_platform_profile(),
        },
        Commands::Dashboard { command } => match command {
            DashboardCommands::Stats => cli::run_dashboard_stats(),
            DashboardCommands::Trend { start, end } => cli::run_dashboard_trend(&start, &end),
        },
        Commands::Dict { command } => match command {
            DictCommands::Sync => cli::run_dict_sync(),
            DictCommands::Show { code } => cli::run_dict_show(code.as_deref()),
            DictCommands::Clear => cli::run_dict_clear(),
        },
        Commands::ConfigFile { command } => match command {
            ConfigFileCommands::Init { force } => cli::run_config_file_init(force),
            ConfigFileCommands::Show => cli::run_config_file_show(),
        },
    }
}
