//! Subcommand implementations for `adminctl`.
//!
//! Every handler builds a [`Client`] from the resolved config, restores the
//! persisted session token, and wires the session-expired hook to delete it
//! — the terminal equivalent of the browser's redirect-to-login on a 401
//! envelope. A token rotated by the backend (`x-renewed-token`) is persisted
//! back after each successful call.

use anyhow::{Context, Result};
use colored::Colorize;

use crate::api::auth::LoginRequest;
use crate::api::config::{ConfigForm, ConfigPageQuery};
use crate::api::dashboard::EchartsQuery;
use crate::api::platform::PlatformPageQuery;
use crate::api::PageQuery;
use crate::config;
use crate::dict::DictStore;
use crate::http::Client;
use crate::utils::{format_date, format_growth_rate};

/// Build a client with the persisted session restored.
fn make_client() -> Client {
    let client = Client::new(&config::load());
    if let Some(token) = config::load_token() {
        client.set_token(token);
    }
    client.on_session_expired(|| {
        config::delete_token();
        eprintln!("{}", "Session expired. Please log in again.".yellow());
    });
    client
}

/// Persist the client's token if the backend rotated it during the call.
fn persist_rotated_token(client: &Client) {
    if let Some(token) = client.token() {
        let _ = config::save_token(&token);
    }
}

// ---------------------------------------------------------------------------
// Session commands
// ---------------------------------------------------------------------------

pub fn run_login(
    username: &str,
    password: &str,
    captcha_key: Option<String>,
    captcha_code: Option<String>,
) -> Result<()> {
    let client = make_client();
    let result = client
        .auth()
        .login(&LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
            captcha_key,
            captcha_code,
        })
        .context("login failed")?;

    client.set_token(result.access_token.clone());
    config::save_token(&result.access_token)?;

    println!(
        "{} token valid for {} seconds",
        "Logged in.".green(),
        result.expires
    );
    Ok(())
}

pub fn run_captcha() -> Result<()> {
    let client = make_client();
    let captcha = client.auth().captcha().context("captcha fetch failed")?;
    println!("key:    {}", captcha.captcha_key);
    println!("base64: {}", captcha.captcha_base64);
    Ok(())
}

pub fn run_logout() -> Result<()> {
    let client = make_client();
    // Best-effort server-side invalidation; the local token goes away
    // regardless.
    if client.token().is_some() {
        let _ = client.auth().logout();
    }
    config::delete_token();
    println!("{}", "Logged out.".green());
    Ok(())
}

pub fn run_whoami() -> Result<()> {
    let client = make_client();
    let info = client.platform().me().context("not logged in?")?;
    persist_rotated_token(&client);

    println!("{}", info.username.bold());
    println!("  id:     {}", info.id);
    if !info.roles.is_empty() {
        println!("  roles:  {}", info.roles.join(", "));
    }
    if !info.perms.is_empty() {
        println!("  perms:  {}", info.perms.join(", "));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// adminctl config ...
// ---------------------------------------------------------------------------

pub fn run_config_list(name: Option<String>, page: u32, page_size: u32) -> Result<()> {
    let client = make_client();
    let result = client.config().page(&ConfigPageQuery {
        page: PageQuery {
            page_num: page,
            page_size,
        },
        name,
    })?;
    persist_rotated_token(&client);

    println!("{}", format!("{} config records", result.total).bold());
    for item in &result.list {
        println!(
            "  {:>6}  {:<24} {:<24} {}",
            item.id,
            item.name,
            item.key.cyan(),
            item.value
        );
    }
    Ok(())
}

pub fn run_config_get(id: u64) -> Result<()> {
    let client = make_client();
    let form = client.config().get(id)?;
    persist_rotated_token(&client);

    println!("{}", form.name.bold());
    println!("  key:         {}", form.key.cyan());
    println!("  value:       {}", form.value);
    println!("  description: {}", form.description);
    Ok(())
}

pub fn run_config_create(name: &str, key: &str, value: &str, description: &str) -> Result<()> {
    let client = make_client();
    client.config().create(&ConfigForm {
        id: None,
        name: name.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        description: description.to_string(),
    })?;
    persist_rotated_token(&client);
    println!("{}", "Created.".green());
    Ok(())
}

pub fn run_config_update(
    id: u64,
    name: &str,
    key: &str,
    value: &str,
    description: &str,
) -> Result<()> {
    let client = make_client();
    client.config().update(
        id,
        &ConfigForm {
            id: Some(id),
            name: name.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            description: description.to_string(),
        },
    )?;
    persist_rotated_token(&client);
    println!("{}", "Updated.".green());
    Ok(())
}

pub fn run_config_delete(id: u64) -> Result<()> {
    let client = make_client();
    client.config().delete(id)?;
    persist_rotated_token(&client);
    println!("{}", "Deleted.".green());
    Ok(())
}

pub fn run_config_refresh() -> Result<()> {
    let client = make_client();
    client.config().refresh_cache()?;
    persist_rotated_token(&client);
    println!("{}", "Backend config cache refreshed.".green());
    Ok(())
}

// ---------------------------------------------------------------------------
// adminctl platform ...
// ---------------------------------------------------------------------------

pub fn run_platform_list(
    username: Option<String>,
    status: Option<i32>,
    page: u32,
    page_size: u32,
) -> Result<()> {
    let client = make_client();
    let result = client.platform().page(&PlatformPageQuery {
        page: PageQuery {
            page_num: page,
            page_size,
        },
        username,
        status,
        start_time: None,
        end_time: None,
    })?;
    persist_rotated_token(&client);

    println!("{}", format!("{} users", result.total).bold());
    for item in &result.list {
        let status = if item.status == 1 {
            "enabled".green()
        } else {
            "disabled".red()
        };
        let created = item
            .created_at
            .map(|dt| format_date(dt.timestamp()))
            .unwrap_or_default();
        println!(
            "  {:>6}  {:<20} {:<10} {:<24} {}",
            item.id,
            item.username,
            status,
            item.role_names,
            created
        );
    }
    Ok(())
}

pub fn run_platform_get(id: u64) -> Result<()> {
    let client = make_client();
    let form = client.platform().get(id)?;
    persist_rotated_token(&client);

    println!("{}", form.username.bold());
    println!("  status:  {}", form.status);
    println!(
        "  roles:   {}",
        form.role_id
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}

pub fn run_platform_delete(ids: &[u64]) -> Result<()> {
    anyhow::ensure!(!ids.is_empty(), "no user ids given");
    let client = make_client();
    client.platform().delete(ids)?;
    persist_rotated_token(&client);
    println!("{}", format!("Deleted {} user(s).", ids.len()).green());
    Ok(())
}

pub fn run_platform_profile() -> Result<()> {
    let client = make_client();
    let profile = client.platform().profile()?;
    persist_rotated_token(&client);

    println!("{}", profile.username.bold());
    println!("  id:      {}", profile.id);
    println!("  roles:   {}", profile.role_names);
    if let Some(created) = profile.created_at {
        println!("  created: {}", format_date(created.timestamp()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// adminctl dashboard ...
// ---------------------------------------------------------------------------

pub fn run_dashboard_stats() -> Result<()> {
    let client = make_client();
    let stats = client.dashboard().statistics()?;
    persist_rotated_token(&client);

    for item in &stats {
        let growth = format_growth_rate(item.growth_rate);
        let growth = if item.growth_rate < 0.0 {
            format!("-{growth}").red()
        } else if item.growth_rate > 0.0 {
            format!("+{growth}").green()
        } else {
            growth.normal()
        };
        println!(
            "  {:<12} today {:>8}  total {:>10}  {}",
            item.title.bold(),
            item.today_count,
            item.total_count,
            growth
        );
    }
    Ok(())
}

pub fn run_dashboard_trend(start: &str, end: &str) -> Result<()> {
    let client = make_client();
    let data = client.dashboard().echarts(&EchartsQuery {
        start_date: start.to_string(),
        end_date: end.to_string(),
    })?;
    persist_rotated_token(&client);

    println!(
        "{:<12} {:>8} {:>8} {:>8}",
        "date".bold(),
        "pv".bold(),
        "uv".bold(),
        "ip".bold()
    );
    for (i, date) in data.dates.iter().enumerate() {
        let pv = data.pv_list.get(i).copied().unwrap_or(0);
        let uv = data.uv_list.get(i).copied().unwrap_or(0);
        let ip = data.ip_list.get(i).copied().unwrap_or(0);
        println!("{date:<12} {pv:>8} {uv:>8} {ip:>8}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// adminctl dict ...
// ---------------------------------------------------------------------------

pub fn run_dict_sync() -> Result<()> {
    let client = make_client();
    let store = DictStore::open();
    store.load_dict_items(&client)?;
    persist_rotated_token(&client);

    println!(
        "{}",
        format!("Cached {} dictionaries.", store.codes().len()).green()
    );
    Ok(())
}

pub fn run_dict_show(code: Option<&str>) -> Result<()> {
    let store = DictStore::open();
    match code {
        Some(code) => {
            let items = store.get_dict_items(code);
            if items.is_empty() {
                println!("{}", format!("No cached entries for '{code}'.").yellow());
                return Ok(());
            }
            println!("{}", code.bold());
            for item in items {
                println!("  {:<16} {}", item.value.cyan(), item.label);
            }
        }
        None => {
            let codes = store.codes();
            if codes.is_empty() {
                println!("{}", "Dictionary cache is empty. Run `adminctl dict sync`.".yellow());
                return Ok(());
            }
            for code in codes {
                println!("{:<24} {} entries", code, store.get_dict_items(&code).len());
            }
        }
    }
    Ok(())
}

pub fn run_dict_clear() -> Result<()> {
    let store = DictStore::open();
    store.clear_dict_cache();
    println!("{}", "Dictionary cache cleared.".green());
    Ok(())
}

// ---------------------------------------------------------------------------
// adminctl config-file ...
// ---------------------------------------------------------------------------

pub fn run_config_file_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!("{} {}", "Wrote".green(), path.display());
    Ok(())
}

pub fn run_config_file_show() -> Result<()> {
    print!("{}", config::show_effective_config()?);
    Ok(())
}
