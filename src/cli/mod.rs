//! CLI module for the kasrw command-line interface.
//!
//! Provides subcommands for working against the treasury backend:
//! - `login` / `logout` / `whoami` - Manage the stored session
//! - `route` / `menu` - Show what the current session may open
//! - `pengajuan ...` - List fund requests and move them through approval
//! - `pemasukan ...` / `pengeluaran ...` - List and record transactions
//! - `laporan ...` - Dashboard, summary, category recap, balance and export links
//! - `live` - Follow live RT contributions
//! - `dokumentasi ...` - Browse the photo gallery by year and category
//! - `acara pendaftar` - List event registrations
//! - `config check` - Validate configuration file

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::models::{DateRange, NewFundRequest, NewPemasukan, NewPengeluaran, Summary};
use crate::api::ApiClient;
use crate::auth::Capability;
use crate::config::Config;
use crate::engine::{spawn_live_poller, LiveEntry, LivePoller, TickOutcome};
use crate::media::{MediaResolver, GALLERY_BATCH};
use crate::report::{self, ChartData, ExportFormat, TableRow};
use crate::router::{default_view, menu_for, resolve_route, RouteDecision};
use crate::session::{FileStorage, SessionStore};
use crate::workflow::{FundRequestService, NoticeKind, RequestBoard, Transition};

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "kasrw")]
#[command(
    author,
    version,
    about = "Treasury dashboard client for Forum Remaja RW",
    long_about = None
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "kasrw.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Backend API URL including the /api prefix (overrides config)
    #[arg(long, env = "KASRW_API_URL")]
    pub api_url: Option<String>,

    /// Session file (overrides config)
    #[arg(long, env = "KASRW_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session
    Login {
        /// Username (defaults to the remembered one)
        username: Option<String>,
        /// Password (can also be set via KASRW_PASSWORD env var)
        #[arg(long, env = "KASRW_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Remember the username for the next login
        #[arg(long)]
        remember: bool,
    },

    /// Clear the stored session
    Logout,

    /// Show the current session and capability
    Whoami,

    /// Show which view a path resolves to for the current session
    Route {
        /// View path, e.g. /pengajuan/approver
        path: String,
    },

    /// List the navigation menu for the current session
    Menu,

    /// Fund request workflow commands
    #[command(subcommand)]
    Pengajuan(PengajuanCommands),

    /// Income commands
    #[command(subcommand)]
    Pemasukan(PemasukanCommands),

    /// Expense commands
    #[command(subcommand)]
    Pengeluaran(PengeluaranCommands),

    /// Report commands
    #[command(subcommand)]
    Laporan(LaporanCommands),

    /// Follow live RT contribution totals
    Live {
        /// Poll once and exit
        #[arg(long)]
        once: bool,
    },

    /// Photo gallery commands (public)
    #[command(subcommand)]
    Dokumentasi(DokumentasiCommands),

    /// Event commands (public)
    #[command(subcommand)]
    Acara(AcaraCommands),

    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Pengajuan subcommands
#[derive(Subcommand, Debug)]
pub enum PengajuanCommands {
    /// List the fund requests visible to your role
    List,
    /// Submit a new fund request (Maker)
    Submit {
        /// Title
        judul: String,
        /// Division: Acara, Konsumsi, Pubdok, Logistik or Sekretariat
        #[arg(long)]
        divisi: String,
        /// Amount in rupiah
        #[arg(long)]
        jumlah: String,
        /// Description
        #[arg(long, default_value = "")]
        deskripsi: String,
    },
    /// Send a submitted request on for approval (Checker)
    Send { id: i64 },
    /// Approve a request under review (Approver)
    Approve { id: i64 },
    /// Reject a request under review (Approver)
    Reject { id: i64 },
    /// Mark an approved request as paid out (Admin)
    Done { id: i64 },
}

#[derive(Args, Debug)]
pub struct TableArgs {
    /// Case-insensitive search
    #[arg(short, long, default_value = "")]
    pub search: String,
    /// Page number (1-based)
    #[arg(short, long, default_value = "1")]
    pub page: usize,
}

#[derive(Args, Debug)]
pub struct RangeArgs {
    /// Start date, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub start: Option<String>,
    /// End date, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub end: Option<String>,
}

impl RangeArgs {
    fn range(&self) -> Result<DateRange> {
        DateRange::parse(self.start.as_deref(), self.end.as_deref()).context("Invalid date range")
    }
}

/// Pemasukan subcommands
#[derive(Subcommand, Debug)]
pub enum PemasukanCommands {
    /// List income records
    List(TableArgs),
    /// Record income
    Add {
        #[arg(long)]
        tanggal: String,
        #[arg(long)]
        sumber: String,
        #[arg(long)]
        kategori: String,
        #[arg(long)]
        jumlah: String,
        /// TUNAI or NON_TUNAI
        #[arg(long, default_value = "TUNAI")]
        keterangan: String,
    },
}

/// Pengeluaran subcommands
#[derive(Subcommand, Debug)]
pub enum PengeluaranCommands {
    /// List expense records
    List(TableArgs),
    /// Record an expense
    Add {
        #[arg(long)]
        tanggal: String,
        #[arg(long)]
        keperluan: String,
        #[arg(long)]
        kategori: String,
        #[arg(long)]
        jumlah: String,
        /// TUNAI or NON_TUNAI
        #[arg(long, default_value = "TUNAI")]
        keterangan: String,
    },
}

/// Laporan subcommands
#[derive(Subcommand, Debug)]
pub enum LaporanCommands {
    /// Summary figures and per-category comparison together
    Dashboard(RangeArgs),
    /// Income, expense and balance for a date range
    Summary(RangeArgs),
    /// Totals per category for a date range
    Rekap {
        #[command(flatten)]
        range: RangeArgs,
        /// Print chart datasets as JSON
        #[arg(long)]
        json: bool,
    },
    /// Current balance
    Saldo,
    /// Print the PDF or Excel download link
    Export {
        /// pdf or excel
        #[arg(default_value = "pdf")]
        format: String,
        #[command(flatten)]
        range: RangeArgs,
    },
}

/// Dokumentasi subcommands
#[derive(Subcommand, Debug)]
pub enum DokumentasiCommands {
    /// Years that have photos
    Years,
    /// Photo categories for a year
    Categories {
        /// Year (default: the newest)
        #[arg(long)]
        year: Option<String>,
    },
    /// Photos for a year and category, with the image sources to try
    Photos {
        /// Year (default: the newest)
        #[arg(long)]
        year: Option<String>,
        /// Category (default: the first for the year)
        #[arg(long)]
        category: Option<String>,
        /// Number of photos to show
        #[arg(long, default_value_t = GALLERY_BATCH)]
        limit: usize,
        /// Print every fallback source, not just the first
        #[arg(long)]
        sources: bool,
        /// Print tiles as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Acara subcommands
#[derive(Subcommand, Debug)]
pub enum AcaraCommands {
    /// List competition registrations
    Pendaftar(TableArgs),
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate configuration file
    Check,
}

/// Everything a command needs, built from the config plus CLI overrides
struct CliContext {
    config: Config,
    session: SessionStore,
    api: ApiClient,
}

impl CliContext {
    fn build(cli: &Cli) -> Result<Self> {
        let mut config = Config::load(&cli.config)?;
        if let Some(url) = &cli.api_url {
            config.api.base_url = url.clone();
        }
        if let Some(path) = &cli.session_file {
            config.session.path = path.clone();
        }

        let storage = FileStorage::open(&config.session.path).with_context(|| {
            format!(
                "Failed to open session file: {}",
                config.session.path.display()
            )
        })?;
        let session = SessionStore::open(Arc::new(storage)).context("Failed to load session")?;
        let api =
            ApiClient::new(&config.api, session.clone()).context("Failed to create HTTP client")?;

        Ok(Self {
            config,
            session,
            api,
        })
    }

    fn capability(&self) -> Capability {
        Capability::for_session(&self.session.current_session())
    }
}

/// Run a CLI command
pub async fn run_command(cli: &Cli) -> Result<()> {
    if let Commands::Config(ConfigCommands::Check) = &cli.command {
        return cmd_config_check(cli);
    }

    let ctx = CliContext::build(cli)?;
    match &cli.command {
        Commands::Login {
            username,
            password,
            remember,
        } => cmd_login(&ctx, username.as_deref(), password.as_deref(), *remember).await,
        Commands::Logout => cmd_logout(&ctx),
        Commands::Whoami => cmd_whoami(&ctx),
        Commands::Route { path } => cmd_route(&ctx, path),
        Commands::Menu => cmd_menu(&ctx),
        Commands::Pengajuan(PengajuanCommands::List) => cmd_pengajuan_list(&ctx).await,
        Commands::Pengajuan(PengajuanCommands::Submit {
            judul,
            divisi,
            jumlah,
            deskripsi,
        }) => cmd_pengajuan_submit(&ctx, judul, deskripsi, divisi, jumlah).await,
        Commands::Pengajuan(PengajuanCommands::Send { id }) => {
            cmd_pengajuan_act(&ctx, *id, Transition::SendToApproval).await
        }
        Commands::Pengajuan(PengajuanCommands::Approve { id }) => {
            cmd_pengajuan_act(&ctx, *id, Transition::Approve).await
        }
        Commands::Pengajuan(PengajuanCommands::Reject { id }) => {
            cmd_pengajuan_act(&ctx, *id, Transition::Reject).await
        }
        Commands::Pengajuan(PengajuanCommands::Done { id }) => {
            cmd_pengajuan_act(&ctx, *id, Transition::MarkDone).await
        }
        Commands::Pemasukan(PemasukanCommands::List(args)) => {
            let rows = ctx
                .api
                .list_pemasukan()
                .await
                .context("Failed to load pemasukan")?;
            print_table(&rows, args);
            Ok(())
        }
        Commands::Pemasukan(PemasukanCommands::Add {
            tanggal,
            sumber,
            kategori,
            jumlah,
            keterangan,
        }) => {
            ensure_member(&ctx)?;
            let entry = NewPemasukan::from_form(tanggal, sumber, kategori, jumlah, keterangan)?;
            ctx.api
                .create_pemasukan(&entry)
                .await
                .context("Failed to save pemasukan")?;
            println!(
                "[OK] Pemasukan {} from {} saved",
                report::format_rupiah(entry.jumlah),
                entry.sumber
            );
            Ok(())
        }
        Commands::Pengeluaran(PengeluaranCommands::List(args)) => {
            let rows = ctx
                .api
                .list_pengeluaran()
                .await
                .context("Failed to load pengeluaran")?;
            print_table(&rows, args);
            Ok(())
        }
        Commands::Pengeluaran(PengeluaranCommands::Add {
            tanggal,
            keperluan,
            kategori,
            jumlah,
            keterangan,
        }) => {
            ensure_member(&ctx)?;
            let entry =
                NewPengeluaran::from_form(tanggal, keperluan, kategori, jumlah, keterangan)?;
            ctx.api
                .create_pengeluaran(&entry)
                .await
                .context("Failed to save pengeluaran")?;
            println!(
                "[OK] Pengeluaran {} for {} saved",
                report::format_rupiah(entry.jumlah),
                entry.keperluan
            );
            Ok(())
        }
        Commands::Laporan(cmd) => cmd_laporan(&ctx, cmd).await,
        Commands::Live { once } => cmd_live(&ctx, *once).await,
        Commands::Dokumentasi(cmd) => cmd_dokumentasi(&ctx, cmd).await,
        Commands::Acara(AcaraCommands::Pendaftar(args)) => {
            let rows = ctx
                .api
                .list_pendaftaran()
                .await
                .context("Failed to load pendaftaran")?;
            print_table(&rows, args);
            Ok(())
        }
        Commands::Config(ConfigCommands::Check) => Ok(()),
    }
}

/// Transaction entry is limited to the organizational roles
fn ensure_member(ctx: &CliContext) -> Result<()> {
    let capability = ctx.capability();
    if !capability.is_member() {
        anyhow::bail!(
            "Recording transactions requires a member role (current: {}). Run `kasrw login` first.",
            capability
        );
    }
    Ok(())
}

async fn cmd_login(
    ctx: &CliContext,
    username: Option<&str>,
    password: Option<&str>,
    remember: bool,
) -> Result<()> {
    let username = match username {
        Some(u) => u.to_string(),
        None => ctx
            .session
            .remembered_username()
            .context("No username given and none remembered")?,
    };
    let Some(password) = password else {
        anyhow::bail!("Password required (--password or KASRW_PASSWORD)");
    };

    println!("Logging in to {} as {}...", ctx.api.base_url(), username);

    let response = match ctx.api.login(&username, password).await {
        Ok(response) => response,
        Err(e) if e.is_unauthorized() => {
            println!("[!!] Login failed: {}", e);
            anyhow::bail!("Invalid username or password");
        }
        Err(e) => return Err(e).context("Failed to connect to server"),
    };

    ctx.session
        .login(&response.token, &response.role, response.user.clone())
        .context("Failed to store session")?;

    if remember {
        ctx.session
            .remember_username(&username)
            .context("Failed to remember username")?;
    } else {
        ctx.session
            .forget_username()
            .context("Failed to clear remembered username")?;
    }

    let capability = ctx.capability();
    println!("[OK] Logged in");
    println!("  Role:       {} ({})", response.role, capability);
    println!("  Home:       {}", default_view(capability).path());
    Ok(())
}

fn cmd_logout(ctx: &CliContext) -> Result<()> {
    ctx.session.logout().context("Failed to clear session")?;
    println!("[OK] Logged out");
    Ok(())
}

fn cmd_whoami(ctx: &CliContext) -> Result<()> {
    let session = ctx.session.current_session();
    let capability = Capability::for_session(&session);

    if !session.is_authenticated() {
        println!("Not logged in (guest)");
        println!("  Home:       {}", default_view(capability).path());
        return Ok(());
    }

    println!();
    println!("=== Session ===");
    println!();
    if let Some(user) = &session.user {
        println!(
            "User:       {} (id {})",
            user.display_name.as_deref().unwrap_or(&user.username),
            user.id
        );
    }
    println!("Role:       {}", session.role.as_deref().unwrap_or("-"));
    println!("Capability: {}", capability);
    println!("Home:       {}", default_view(capability).path());
    println!();
    Ok(())
}

fn cmd_route(ctx: &CliContext, path: &str) -> Result<()> {
    match resolve_route(path, &ctx.session.current_session()) {
        RouteDecision::Mount(view) => println!("mount     {} ({})", view.path(), view.title()),
        RouteDecision::Redirect(view) => {
            println!("redirect  {} -> {} ({})", path, view.path(), view.title())
        }
    }
    Ok(())
}

fn cmd_menu(ctx: &CliContext) -> Result<()> {
    let capability = ctx.capability();
    println!();
    println!("Menu for {}:", capability);
    for view in menu_for(capability) {
        println!("  {:<22} {}", view.path(), view.title());
    }
    println!();
    Ok(())
}

async fn cmd_pengajuan_list(ctx: &CliContext) -> Result<()> {
    let mut board = RequestBoard::new(FundRequestService::new(ctx.api.clone()));
    board.refresh().await;

    if let Some(notice) = board.notice() {
        println!("{}", notice.message);
    }
    if board.items().is_empty() {
        return Ok(());
    }

    println!();
    println!(
        "{:<6}  {:<28}  {:<12}  {:>15}  {:<10}  {:<12}  {}",
        "ID", "JUDUL", "DIVISI", "JUMLAH", "STATUS", "TANGGAL", "AKSI"
    );
    println!("{}", "-".repeat(110));

    for item in board.items() {
        let actions = board
            .actions_for(item)
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(",");
        println!(
            "{:<6}  {:<28}  {:<12}  {:>15}  {:<10}  {:<12}  {}",
            item.id,
            truncate(&item.judul, 28),
            truncate(&item.divisi, 12),
            report::format_rupiah(item.jumlah),
            item.status.label(),
            item.created_at
                .as_deref()
                .map(report::format_date)
                .unwrap_or_else(|| "-".to_string()),
            if actions.is_empty() { "-" } else { actions.as_str() }
        );
    }

    println!();
    Ok(())
}

async fn cmd_pengajuan_submit(
    ctx: &CliContext,
    judul: &str,
    deskripsi: &str,
    divisi: &str,
    jumlah: &str,
) -> Result<()> {
    let service = FundRequestService::new(ctx.api.clone());
    let req = NewFundRequest::from_form(judul, deskripsi, divisi, jumlah, None)?;
    let created = service.submit(req).await?;

    println!(
        "[OK] Pengajuan #{} \"{}\" submitted ({}, status {})",
        created.id,
        created.judul,
        report::format_rupiah(created.jumlah),
        created.status
    );
    Ok(())
}

async fn cmd_pengajuan_act(ctx: &CliContext, id: i64, transition: Transition) -> Result<()> {
    let mut board = RequestBoard::new(FundRequestService::new(ctx.api.clone()));
    board.refresh().await;

    let result = board.act(id, transition).await;
    if let Some(notice) = board.notice() {
        let icon = match notice.kind {
            NoticeKind::Success => "[OK]",
            NoticeKind::Info => "[--]",
            NoticeKind::Error => "[!!]",
        };
        println!("{} {}", icon, notice.message);
    }
    result.with_context(|| format!("Could not {} pengajuan {}", transition, id))
}

async fn cmd_laporan(ctx: &CliContext, cmd: &LaporanCommands) -> Result<()> {
    match cmd {
        LaporanCommands::Dashboard(args) => {
            let range = args.range()?;
            let (summary, rekap) =
                futures::try_join!(ctx.api.summary(&range), ctx.api.rekap(&range))
                    .context("Failed to load dashboard")?;

            print_summary(&range, &summary);
            print_comparison(&report::comparison_chart(&rekap));
        }
        LaporanCommands::Summary(args) => {
            let range = args.range()?;
            let summary = ctx
                .api
                .summary(&range)
                .await
                .context("Failed to load summary")?;
            print_summary(&range, &summary);
        }
        LaporanCommands::Rekap { range, json } => {
            let range = range.range()?;
            let rekap = ctx.api.rekap(&range).await.context("Failed to load rekap")?;

            if *json {
                let charts = serde_json::json!({
                    "perbandingan": report::comparison_chart(&rekap),
                    "pemasukan": report::pie_chart(&rekap.rekap_pemasukan),
                    "pengeluaran": report::pie_chart(&rekap.rekap_pengeluaran),
                });
                println!("{}", serde_json::to_string_pretty(&charts)?);
                return Ok(());
            }

            print_comparison(&report::comparison_chart(&rekap));
        }
        LaporanCommands::Saldo => {
            let saldo = ctx.api.saldo().await.context("Failed to load saldo")?;
            println!("Saldo: {}", report::format_rupiah(saldo.saldo));
        }
        LaporanCommands::Export { format, range } => {
            let format: ExportFormat = format.parse().map_err(anyhow::Error::msg)?;
            let range = range.range()?;
            println!(
                "{}",
                report::export_url(ctx.config.api.export_base(), format, &range)
            );
        }
    }
    Ok(())
}

async fn cmd_live(ctx: &CliContext, once: bool) -> Result<()> {
    let poller = Arc::new(LivePoller::with_interval(
        Arc::new(ctx.api.clone()),
        ctx.config.live.interval_secs,
    ));

    if once {
        if let TickOutcome::Started(handle) = poller.tick() {
            handle.await.context("Live poll task failed")?;
        }
        if poller.counts().failed > 0 {
            anyhow::bail!("Failed to load live contributions");
        }
        print_live(&poller.latest());
        return Ok(());
    }

    println!(
        "Following live contributions every {}s (Ctrl+C to stop)...",
        poller.interval_secs()
    );

    let mut updates = poller.subscribe();
    let handle = spawn_live_poller(poller.clone());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let rows = updates.borrow_and_update().clone();
                print_live(&rows);
            }
        }
    }

    poller.stop();
    handle.await.context("Live poller task failed")?;

    let counts = poller.counts();
    println!(
        "Stopped after {} polls ({} skipped, {} failed)",
        counts.started, counts.skipped, counts.failed
    );
    Ok(())
}

async fn cmd_dokumentasi(ctx: &CliContext, cmd: &DokumentasiCommands) -> Result<()> {
    match cmd {
        DokumentasiCommands::Years => {
            let years = ctx.api.photo_years().await.context("Failed to load years")?;
            print_list(&years, "Belum ada foto.");
        }
        DokumentasiCommands::Categories { year } => {
            let Some(year) = pick_year(ctx, year.as_deref()).await? else {
                println!("Belum ada foto.");
                return Ok(());
            };
            let categories = ctx
                .api
                .photo_categories(&year)
                .await
                .context("Failed to load categories")?;
            println!("Kategori {}:", year);
            print_list(&categories, "Belum ada kategori.");
        }
        DokumentasiCommands::Photos {
            year,
            category,
            limit,
            sources,
            json,
        } => {
            let Some(year) = pick_year(ctx, year.as_deref()).await? else {
                println!("Belum ada foto.");
                return Ok(());
            };
            let category = match category {
                Some(c) => c.clone(),
                None => {
                    let categories = ctx
                        .api
                        .photo_categories(&year)
                        .await
                        .context("Failed to load categories")?;
                    let Some(first) = categories.into_iter().next() else {
                        println!("Belum ada kategori untuk {}.", year);
                        return Ok(());
                    };
                    first
                }
            };

            let photos = ctx
                .api
                .photos(&year, &category)
                .await
                .context("Failed to load photos")?;
            let resolver = MediaResolver::from_api_base(ctx.api.base_url());
            let tiles = resolver.tiles(&photos, *limit);

            if *json {
                println!("{}", serde_json::to_string_pretty(&tiles)?);
                return Ok(());
            }

            println!();
            println!("=== {} {} ===", category, year);
            println!();
            if tiles.is_empty() {
                println!("Belum ada foto.");
                return Ok(());
            }
            for (i, tile) in tiles.iter().enumerate() {
                let label = if tile.photo.title.is_empty() {
                    &tile.photo.caption
                } else {
                    &tile.photo.title
                };
                println!("{:>3}. {}", i + 1, truncate(label, 60));
                if *sources {
                    for source in tile.sources.sources() {
                        println!("       {}", truncate(source, 100));
                    }
                } else if let Some(first) = tile.sources.current() {
                    println!("       {}", truncate(first, 100));
                }
                if let Some(full) = &tile.full_url {
                    println!("       full: {}", full);
                }
            }
            println!();
            println!("Menampilkan {} dari {} foto", tiles.len(), photos.len());
        }
    }
    Ok(())
}

/// The requested year, or the newest one the gallery has
async fn pick_year(ctx: &CliContext, year: Option<&str>) -> Result<Option<String>> {
    if let Some(year) = year {
        return Ok(Some(year.to_string()));
    }
    let years = ctx.api.photo_years().await.context("Failed to load years")?;
    Ok(years.into_iter().next())
}

fn print_list(items: &[String], empty: &str) {
    if items.is_empty() {
        println!("{}", empty);
        return;
    }
    for item in items {
        println!("  {}", item);
    }
}

fn print_summary(range: &DateRange, summary: &Summary) {
    println!();
    println!("=== Ringkasan {} s/d {} ===", range.start, range.end);
    println!();
    println!("Pemasukan:   {}", report::format_rupiah(summary.total_pemasukan));
    println!("Pengeluaran: {}", report::format_rupiah(summary.total_pengeluaran));
    println!("Saldo:       {}", report::format_rupiah(summary.saldo));
    println!();
}

/// Income vs. expense per category, one row per label
fn print_comparison(chart: &ChartData) {
    if chart.labels.is_empty() {
        println!("Belum ada data.");
        return;
    }

    println!("{:<24}  {:>18}  {:>18}", "KATEGORI", "PEMASUKAN", "PENGELUARAN");
    println!("{}", "-".repeat(64));
    for (i, kategori) in chart.labels.iter().enumerate() {
        let value = |series: usize| {
            chart
                .datasets
                .get(series)
                .and_then(|d| d.data.get(i))
                .copied()
                .unwrap_or(0)
        };
        println!(
            "{:<24}  {:>18}  {:>18}",
            truncate(kategori, 24),
            report::format_rupiah(value(0)),
            report::format_rupiah(value(1))
        );
    }
    println!();
}

fn print_live(rows: &[LiveEntry]) {
    if rows.is_empty() {
        println!("Belum ada data.");
        return;
    }

    println!();
    println!("{:<20}  {:>18}  {:>16}", "SUMBER", "TOTAL", "PERUBAHAN");
    println!("{}", "-".repeat(58));
    for row in rows {
        let trend = if row.trending_up() { "+" } else { "-" };
        let level = if row.is_high() { " *" } else { "" };
        println!(
            "{:<20}  {:>18}  {:>1}{:>15}{}",
            truncate(&row.sumber, 20),
            report::format_rupiah(row.total),
            trend,
            report::format::group_thousands(row.delta().abs()),
            level
        );
    }
}

fn print_table<T: TableRow>(rows: &[T], args: &TableArgs) {
    let page = report::paginate(rows, &args.search, args.page);
    if page.items.is_empty() {
        println!("{}", page.summary());
        return;
    }

    let headers = T::headers();
    println!();
    print!("{:<4}", "NO");
    for header in headers {
        print!("  {:<20}", truncate(header, 20));
    }
    println!();
    println!("{}", "-".repeat(4 + headers.len() * 22));

    for (i, row) in page.items.iter().enumerate() {
        print!("{:<4}", page.first_number() + i);
        for cell in row.cells() {
            print!("  {:<20}", truncate(&cell, 20));
        }
        println!();
    }

    println!();
    println!("{}", page.summary());
}

/// Validate configuration file
fn cmd_config_check(cli: &Cli) -> Result<()> {
    let config_path = &cli.config;

    println!("Checking configuration file: {}", config_path.display());
    println!();

    if !config_path.exists() {
        println!(
            "[!!] Configuration file not found: {}",
            config_path.display()
        );
        println!();
        println!("Defaults will be used. To customize, copy kasrw.example.toml to kasrw.toml");
        return Ok(());
    }

    match Config::load(config_path) {
        Ok(config) => {
            println!("[OK] Configuration file is valid!");
            println!();
            println!("=== Configuration Summary ===");
            println!();
            println!("API:");
            println!("  Base URL:     {}", config.api.base_url);
            println!("  Export URL:   {}", config.api.export_base());
            println!("  Timeout:      {}s", config.api.timeout_secs);
            println!(
                "  ngrok header: {}",
                if config.api.skip_ngrok_warning {
                    "Enabled"
                } else {
                    "Disabled"
                }
            );
            println!();
            println!("Session:");
            println!("  File:         {}", config.session.path.display());
            println!();
            println!("Live:");
            println!("  Interval:     {}s", config.live.interval_secs);
            println!();

            let mut warnings = Vec::new();
            if config.live.interval_secs == 0 {
                warnings.push("live.interval_secs is 0 - polling will use 1 second");
            }
            if config.api.base_url.starts_with("http://")
                && !config.api.base_url.contains("localhost")
                && !config.api.base_url.contains("127.0.0.1")
            {
                warnings.push(
                    "api.base_url uses plain HTTP - the session token is sent unencrypted",
                );
            }

            if !warnings.is_empty() {
                println!("Warnings:");
                for warning in warnings {
                    println!("  [!] {}", warning);
                }
                println!();
            }

            Ok(())
        }
        Err(e) => {
            println!("[!!] Configuration file is invalid!");
            println!();
            println!("Error: {:#}", e);
            println!();
            println!("Please check the configuration file syntax and try again.");
            anyhow::bail!("Invalid configuration file");
        }
    }
}

/// Truncate a string to max length (in characters) with ellipsis
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
