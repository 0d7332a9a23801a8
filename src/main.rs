use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use hotpush_console::config::{ConfigError, ConsoleConfig};
use hotpush_console::context::AppContext;
use hotpush_console::net::admin::{DEFAULT_CLEANUP_DAYS, DEFAULT_HISTORY_LIMIT};
use hotpush_console::net::api::RequestOptions;
use hotpush_console::net::error::ApiError;
use hotpush_console::net::transport::TransportError;
use hotpush_console::routes::{self, Navigation};
use hotpush_console::state::confirm::{ConfirmKind, ConfirmOptions};
use hotpush_console::state::session::LoginOutcome;
use hotpush_console::state::toast::ToastKind;
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Transport(#[from] TransportError),
    #[error("{}", .0.message())]
    Api(#[from] ApiError),
    #[error("{0}")]
    Rejected(String),
    #[error("no route matches '{0}'")]
    RouteNotFound(String),
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("cancelled")]
    Cancelled,
}

#[derive(Parser, Debug)]
#[command(name = "hotpush", about = "Admin console for the hotpush service")]
struct Cli {
    /// Backend origin; overrides HOTPUSH_BASE_URL.
    #[arg(long)]
    base_url: Option<String>,

    /// API path prefix; overrides HOTPUSH_API_PREFIX.
    #[arg(long)]
    api_prefix: Option<String>,

    /// Directory holding storage.json; overrides HOTPUSH_STATE_DIR.
    #[arg(long)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login(CredentialArgs),
    Register(CredentialArgs),
    Logout {
        /// Skip the server call and only clear the stored token.
        #[arg(long)]
        local: bool,
    },
    /// Verify the stored token.
    Check,
    Whoami,
    Stats,
    /// List views and whether the current session may open them.
    Routes,
    /// Navigate to a view through the guard and print its data.
    Open {
        path: String,
    },
    /// Bump the refresh marker and reload the counters.
    Refresh,
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
    /// Raw gateway call, e.g. `api GET /hot?category=tech`.
    Api {
        method: String,
        endpoint: String,
        #[arg(long)]
        data: Option<String>,
    },
    Hot {
        #[arg(long, conflicts_with = "source")]
        category: Option<String>,
        #[arg(long)]
        source: Option<String>,
        /// List the known categories instead of hot items.
        #[arg(long, conflicts_with_all = ["category", "source"])]
        categories: bool,
    },
    /// Ask the backend to refetch every source now.
    Fetch,
    Sources(SourcesCommand),
    Push(PushCommand),
    Rules(RulesCommand),
    History(HistoryCommand),
    Scheduler(SchedulerCommand),
    Users(UsersCommand),
    Settings(SettingsCommand),
}

#[derive(Args, Debug)]
struct CredentialArgs {
    username: String,
    #[arg(long, env = "HOTPUSH_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Subcommand, Debug)]
enum ThemeAction {
    Toggle,
}

#[derive(Args, Debug)]
struct SourcesCommand {
    #[command(subcommand)]
    command: SourcesSubcommand,
}

#[derive(Subcommand, Debug)]
enum SourcesSubcommand {
    List,
    Custom,
    Create {
        #[arg(long)]
        data: String,
    },
    Update {
        id: String,
        #[arg(long)]
        data: String,
    },
    Delete {
        id: String,
        #[arg(long, short)]
        yes: bool,
    },
    Validate {
        #[arg(long)]
        data: String,
    },
}

#[derive(Args, Debug)]
struct PushCommand {
    #[command(subcommand)]
    command: PushSubcommand,
}

#[derive(Subcommand, Debug)]
enum PushSubcommand {
    List,
    Read {
        channel: String,
    },
    Update {
        channel: String,
        #[arg(long)]
        data: String,
    },
    Delete {
        channel: String,
        #[arg(long, short)]
        yes: bool,
    },
    Test {
        channel: String,
    },
}

#[derive(Args, Debug)]
struct RulesCommand {
    #[command(subcommand)]
    command: RulesSubcommand,
}

#[derive(Subcommand, Debug)]
enum RulesSubcommand {
    List,
    Types,
    Create {
        #[arg(long)]
        data: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        data: String,
    },
    Delete {
        id: i64,
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct HistoryCommand {
    #[command(subcommand)]
    command: HistorySubcommand,
}

#[derive(Subcommand, Debug)]
enum HistorySubcommand {
    List {
        #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    Stats,
    Cleanup {
        #[arg(long, default_value_t = DEFAULT_CLEANUP_DAYS)]
        days: u32,
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct SchedulerCommand {
    #[command(subcommand)]
    command: SchedulerSubcommand,
}

#[derive(Subcommand, Debug)]
enum SchedulerSubcommand {
    Status,
    Trigger,
    Pause,
    Resume,
    Config {
        #[arg(long)]
        data: String,
    },
    Digest,
    DigestUpdate {
        #[arg(long)]
        data: String,
    },
    DigestTrigger,
}

#[derive(Args, Debug)]
struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
enum UsersSubcommand {
    List,
    Read {
        id: i64,
    },
    Update {
        id: i64,
        #[arg(long)]
        data: String,
    },
    Delete {
        id: i64,
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct SettingsCommand {
    #[command(subcommand)]
    command: SettingsSubcommand,
}

#[derive(Subcommand, Debug)]
enum SettingsSubcommand {
    Show,
    Update {
        #[arg(long)]
        data: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = AppContext::new(build_config(&cli)?)?;

    match cli.command {
        Command::Login(args) => run_login(&ctx, &args, false).await,
        Command::Register(args) => run_login(&ctx, &args, true).await,
        Command::Logout { local } => {
            if local {
                ctx.session.logout();
            } else {
                ctx.admin.remote_logout().await;
            }
            notify(&ctx, "已退出登录", ToastKind::Info);
            Ok(())
        }
        Command::Check => {
            let authenticated = ctx.session.check_auth().await;
            print_json(&json!({ "authenticated": authenticated, "user": ctx.session.user() }))
        }
        Command::Whoami => {
            let user = ctx.admin.fetch_me().await?;
            print_json(&serde_json::to_value(user)?)
        }
        Command::Stats => {
            ctx.stats.fetch_stats().await;
            print_json(&serde_json::to_value(ctx.stats.stats())?)
        }
        Command::Routes => run_routes(&ctx).await,
        Command::Open { path } => run_open(&ctx, &path).await,
        Command::Refresh => {
            ctx.stats.trigger_refresh();
            ctx.stats.fetch_stats().await;
            let marker = ctx.stats.refresh_marker();
            print_json(&json!({
                "trigger": marker.trigger,
                "last_update": marker.last_update,
                "stats": ctx.stats.stats(),
            }))
        }
        Command::Theme { action } => {
            if matches!(action, Some(ThemeAction::Toggle)) {
                ctx.theme.toggle();
            }
            print_json(&json!({ "dark_mode": ctx.theme.is_dark(), "class": ctx.theme.css_class() }))
        }
        Command::Api { method, endpoint, data } => {
            let method = reqwest::Method::from_bytes(method.to_ascii_uppercase().as_bytes())
                .map_err(|_| CliError::InvalidMethod(method.clone()))?;
            let mut options = RequestOptions::new(method);
            if let Some(data) = data {
                options = options.with_body(parse_data(&data)?);
            }
            print_json(&ctx.api.call(&endpoint, options).await?)
        }
        Command::Hot { category, source, categories } => {
            let json = match source {
                _ if categories => ctx.admin.categories().await?,
                Some(source) => ctx.admin.hot_list(&source).await?,
                None => ctx.admin.hot_lists(category.as_deref()).await?,
            };
            print_json(&json)
        }
        Command::Fetch => done(&ctx, ctx.admin.trigger_fetch().await?),
        Command::Sources(sources) => run_sources(&ctx, sources).await,
        Command::Push(push) => run_push(&ctx, push).await,
        Command::Rules(rules) => run_rules(&ctx, rules).await,
        Command::History(history) => run_history(&ctx, history).await,
        Command::Scheduler(scheduler) => run_scheduler(&ctx, scheduler).await,
        Command::Users(users) => run_users(&ctx, users).await,
        Command::Settings(settings) => run_settings(&ctx, settings).await,
    }
}

fn build_config(cli: &Cli) -> Result<ConsoleConfig, CliError> {
    let mut config = ConsoleConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config.base_url.clone_from(base_url);
    }
    if let Some(api_prefix) = &cli.api_prefix {
        config.api_prefix.clone_from(api_prefix);
    }
    if let Some(state_dir) = &cli.state_dir {
        config.state_dir.clone_from(state_dir);
    }
    Ok(config.validated()?)
}

async fn run_login(ctx: &AppContext, args: &CredentialArgs, register: bool) -> Result<(), CliError> {
    let outcome = if register {
        ctx.session.register(&args.username, &args.password).await?
    } else {
        ctx.session.login(&args.username, &args.password).await?
    };
    match outcome {
        LoginOutcome::Success => {
            notify(ctx, format!("已登录: {}", args.username), ToastKind::Success);
            print_json(&json!({ "authenticated": ctx.session.is_authenticated(), "user": ctx.session.user() }))
        }
        LoginOutcome::Failure { message } => Err(CliError::Rejected(message)),
    }
}

async fn run_routes(ctx: &AppContext) -> Result<(), CliError> {
    ctx.session.check_auth().await;
    let is_admin = ctx.session.is_admin();
    let rows: Vec<Value> = routes::ROUTES
        .iter()
        .map(|route| {
            json!({
                "path": route.path,
                "title": route.meta.title,
                "subtitle": route.meta.subtitle,
                "admin_only": route.meta.admin_only,
                "allowed": is_admin || !route.meta.admin_only,
            })
        })
        .collect();
    print_json(&Value::Array(rows))
}

async fn run_open(ctx: &AppContext, path: &str) -> Result<(), CliError> {
    ctx.session.check_auth().await;
    let route = match ctx.navigate(path) {
        Navigation::Proceed(route) => route,
        Navigation::Redirect(route) => {
            if !path.trim_end_matches('/').is_empty() {
                notify(ctx, format!("需要管理员权限，已跳转到 {}", route.path), ToastKind::Warning);
            }
            route
        }
        Navigation::NotFound => return Err(CliError::RouteNotFound(path.to_owned())),
    };
    let data = route.view.load(&ctx.admin).await?;
    print_json(&json!({
        "path": route.path,
        "title": route.meta.title,
        "subtitle": route.meta.subtitle,
        "data": data,
    }))
}

async fn run_sources(ctx: &AppContext, sources: SourcesCommand) -> Result<(), CliError> {
    match sources.command {
        SourcesSubcommand::List => print_json(&ctx.admin.sources().await?),
        SourcesSubcommand::Custom => print_json(&ctx.admin.custom_sources().await?),
        SourcesSubcommand::Create { data } => done(ctx, ctx.admin.create_custom_source(parse_data(&data)?).await?),
        SourcesSubcommand::Update { id, data } => {
            done(ctx, ctx.admin.update_custom_source(&id, parse_data(&data)?).await?)
        }
        SourcesSubcommand::Delete { id, yes } => {
            confirm_destructive(ctx, &format!("确定删除数据源 {id} 吗？"), yes).await?;
            done(ctx, ctx.admin.delete_custom_source(&id).await?)
        }
        SourcesSubcommand::Validate { data } => print_json(&ctx.admin.validate_source(parse_data(&data)?).await?),
    }
}

async fn run_push(ctx: &AppContext, push: PushCommand) -> Result<(), CliError> {
    match push.command {
        PushSubcommand::List => print_json(&ctx.admin.push_channels().await?),
        PushSubcommand::Read { channel } => print_json(&ctx.admin.push_channel(&channel).await?),
        PushSubcommand::Update { channel, data } => {
            done(ctx, ctx.admin.update_push_channel(&channel, parse_data(&data)?).await?)
        }
        PushSubcommand::Delete { channel, yes } => {
            confirm_destructive(ctx, &format!("确定删除推送渠道 {channel} 的配置吗？"), yes).await?;
            done(ctx, ctx.admin.delete_push_channel(&channel).await?)
        }
        PushSubcommand::Test { channel } => done(ctx, ctx.admin.test_push_channel(&channel).await?),
    }
}

async fn run_rules(ctx: &AppContext, rules: RulesCommand) -> Result<(), CliError> {
    match rules.command {
        RulesSubcommand::List => print_json(&ctx.admin.rules().await?),
        RulesSubcommand::Types => print_json(&ctx.admin.rule_types().await?),
        RulesSubcommand::Create { data } => done(ctx, ctx.admin.create_rule(parse_data(&data)?).await?),
        RulesSubcommand::Update { id, data } => done(ctx, ctx.admin.update_rule(id, parse_data(&data)?).await?),
        RulesSubcommand::Delete { id, yes } => {
            confirm_destructive(ctx, &format!("确定删除规则 #{id} 吗？"), yes).await?;
            done(ctx, ctx.admin.delete_rule(id).await?)
        }
    }
}

async fn run_history(ctx: &AppContext, history: HistoryCommand) -> Result<(), CliError> {
    match history.command {
        HistorySubcommand::List { limit, offset } => print_json(&ctx.admin.history(limit, offset).await?),
        HistorySubcommand::Stats => print_json(&ctx.admin.history_stats().await?),
        HistorySubcommand::Cleanup { days, yes } => {
            confirm_destructive(ctx, &format!("确定清理 {days} 天前的推送记录吗？"), yes).await?;
            done(ctx, ctx.admin.cleanup_history(days).await?)
        }
    }
}

async fn run_scheduler(ctx: &AppContext, scheduler: SchedulerCommand) -> Result<(), CliError> {
    match scheduler.command {
        SchedulerSubcommand::Status => print_json(&ctx.admin.scheduler_status().await?),
        SchedulerSubcommand::Trigger => done(ctx, ctx.admin.trigger_scheduler().await?),
        SchedulerSubcommand::Pause => done(ctx, ctx.admin.pause_scheduler().await?),
        SchedulerSubcommand::Resume => done(ctx, ctx.admin.resume_scheduler().await?),
        SchedulerSubcommand::Config { data } => {
            done(ctx, ctx.admin.update_scheduler_config(parse_data(&data)?).await?)
        }
        SchedulerSubcommand::Digest => print_json(&ctx.admin.digest_status().await?),
        SchedulerSubcommand::DigestUpdate { data } => done(ctx, ctx.admin.update_digest(parse_data(&data)?).await?),
        SchedulerSubcommand::DigestTrigger => done(ctx, ctx.admin.trigger_digest().await?),
    }
}

async fn run_users(ctx: &AppContext, users: UsersCommand) -> Result<(), CliError> {
    match users.command {
        UsersSubcommand::List => print_json(&ctx.admin.users().await?),
        UsersSubcommand::Read { id } => print_json(&ctx.admin.user(id).await?),
        UsersSubcommand::Update { id, data } => done(ctx, ctx.admin.update_user(id, parse_data(&data)?).await?),
        UsersSubcommand::Delete { id, yes } => {
            confirm_destructive(ctx, &format!("确定删除用户 #{id} 吗？"), yes).await?;
            done(ctx, ctx.admin.delete_user(id).await?)
        }
    }
}

async fn run_settings(ctx: &AppContext, settings: SettingsCommand) -> Result<(), CliError> {
    match settings.command {
        SettingsSubcommand::Show => print_json(&ctx.admin.settings().await?),
        SettingsSubcommand::Update { data } => done(ctx, ctx.admin.update_settings(parse_data(&data)?).await?),
    }
}

/// Ask on the terminal through the confirm store unless `assume_yes`.
async fn confirm_destructive(ctx: &AppContext, message: &str, assume_yes: bool) -> Result<(), CliError> {
    if assume_yes {
        return Ok(());
    }

    let confirm = Arc::clone(&ctx.confirm);
    let mut dialog = confirm.subscribe();
    let prompter = tokio::spawn(async move {
        let shown = match dialog.wait_for(|dialog| dialog.visible).await {
            Ok(shown) => shown.clone(),
            Err(_) => return,
        };
        eprint!("{}: {} [{}/{}] ", shown.title, shown.message, shown.confirm_text, shown.cancel_text);
        let _ = io::stderr().flush();
        let answer = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line).map(|_| line)
        })
        .await;
        match answer {
            Ok(Ok(line)) if is_affirmative(&line) => confirm.handle_confirm(),
            _ => confirm.handle_cancel(),
        }
    });

    let options = ConfirmOptions { kind: Some(ConfirmKind::Danger), ..ConfirmOptions::default() };
    let accepted = ctx.confirm.confirm(message, options).await;
    let _ = prompter.await;
    if accepted { Ok(()) } else { Err(CliError::Cancelled) }
}

fn is_affirmative(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes" | "确定")
}

/// Report a successful mutation: toast line on stderr, payload on stdout.
fn done(ctx: &AppContext, value: Value) -> Result<(), CliError> {
    let message = value.get("message").and_then(Value::as_str).unwrap_or("操作成功").to_owned();
    notify(ctx, message, ToastKind::Success);
    print_json(&value)
}

fn notify(ctx: &AppContext, message: impl Into<String>, kind: ToastKind) {
    let id = ctx.toasts.show(message, kind);
    if let Some(toast) = ctx.toasts.toasts().into_iter().find(|toast| toast.id == id) {
        eprintln!("[{}] {}", toast.kind.as_str(), toast.message);
    }
}

fn parse_data(data: &str) -> Result<Value, CliError> {
    Ok(serde_json::from_str::<Value>(data)?)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
