use chrono::Utc;
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use env_logger::Env;
use jobboard::api::{
    ApplicationView, BoardPaths, CmdMessage, ConfigAction, JobBoardApi, JobFilter, MessageLevel,
};
use jobboard::board::Board;
use jobboard::commands::helpers::format_file_size;
use jobboard::config::BoardConfig;
use jobboard::error::{BoardError, Result};
use jobboard::model::{Application, Document, JobPosting, NewJob, User};
use jobboard::observer::BoardObserver;
use jobboard::store::fs_backend::FsBackend;
use log::info;
use std::path::PathBuf;
use std::rc::Rc;
use unicode_width::UnicodeWidthStr;

mod args;
use args::{Cli, Commands, CvCommands};

const HOME_ENV: &str = "JOBBOARD_HOME";
const LOG_ENV: &str = "JOBBOARD_LOG";

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::init_from_env(Env::default().filter_or(LOG_ENV, default_level));

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: JobBoardApi<FsBackend>,
}

fn run(cli: Cli) -> Result<()> {
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Register {
            name,
            email,
            password,
        }) => handle_register(&mut ctx, &name, &email, &password),
        Some(Commands::Login { email, password }) => handle_login(&mut ctx, &email, &password),
        Some(Commands::Logout) => handle_logout(&mut ctx),
        Some(Commands::Whoami) => handle_whoami(&ctx),
        Some(Commands::Dashboard) => handle_dashboard(&ctx),
        Some(Commands::Jobs {
            search,
            category,
            location,
            mine,
        }) => {
            let filter = JobFilter {
                search,
                category,
                location,
                mine,
            };
            handle_jobs(&ctx, &filter)
        }
        Some(Commands::Post {
            title,
            company,
            location,
            salary,
            category,
            description,
            requirements,
        }) => handle_post(
            &mut ctx,
            NewJob {
                title,
                company,
                location,
                salary,
                category,
                description,
                requirements,
            },
        ),
        Some(Commands::Show { job_id }) => handle_show(&ctx, &job_id),
        Some(Commands::DeleteJob { job_id }) => handle_delete_job(&mut ctx, &job_id),
        Some(Commands::Cv { action }) => handle_cv(&mut ctx, action),
        Some(Commands::Apply {
            job_id,
            cv,
            cover_letter,
        }) => handle_apply(&mut ctx, &job_id, &cv, cover_letter),
        Some(Commands::Applications) => handle_applications(&ctx),
        Some(Commands::Applicants { job_id }) => handle_applicants(&ctx, &job_id),
        Some(Commands::Withdraw { application_id }) => handle_withdraw(&mut ctx, &application_id),
        Some(Commands::Status {
            application_id,
            status,
        }) => handle_status(&mut ctx, &application_id, &status),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_jobs(&ctx, &JobFilter::default()),
    }
}

/// `--data-dir`, then `$JOBBOARD_HOME`, then the platform data dir.
fn resolve_data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "jobboard", "jobboard")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| BoardError::Store("Could not determine data dir".into()))
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = resolve_data_dir(cli)?;
    let config = BoardConfig::load(&data_dir).unwrap_or_else(|e| {
        log::warn!("ignoring unreadable config: {}", e);
        BoardConfig::default()
    });

    let backend = FsBackend::new(data_dir.clone());
    let board = Board::open(backend, config)?;
    let mut api = JobBoardApi::new(board, BoardPaths { data_dir });
    api.subscribe(Rc::new(LogObserver));

    Ok(AppContext { api })
}

/// Logs every committed change at info level.
struct LogObserver;

impl BoardObserver for LogObserver {
    fn on_session_changed(&self, user: Option<&User>) {
        match user {
            Some(u) => info!("session: signed in as {}", u.email),
            None => info!("session: signed out"),
        }
    }

    fn on_document_uploaded(&self, document: &Document) {
        info!("document uploaded: {}", document.id);
    }

    fn on_document_deleted(&self, document: &Document) {
        info!("document deleted: {}", document.id);
    }

    fn on_job_created(&self, job: &JobPosting) {
        info!("job created: {}", job.id);
    }

    fn on_job_deleted(&self, job: &JobPosting, applications: &[Application]) {
        info!(
            "job deleted: {} (with {} application(s))",
            job.id,
            applications.len()
        );
    }

    fn on_application_submitted(&self, application: &Application) {
        info!("application submitted: {}", application.id);
    }

    fn on_application_withdrawn(&self, application: &Application) {
        info!("application withdrawn: {}", application.id);
    }

    fn on_application_status_changed(&self, application: &Application) {
        info!(
            "application {} is now {}",
            application.id, application.status
        );
    }
}

fn handle_register(ctx: &mut AppContext, name: &str, email: &str, password: &str) -> Result<()> {
    let result = ctx.api.register(name, email, password)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_login(ctx: &mut AppContext, email: &str, password: &str) -> Result<()> {
    let result = ctx.api.login(email, password)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_logout(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.logout()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_whoami(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.whoami()?;
    if let Some(user) = &result.user {
        println!("{} <{}>", user.name.bold(), user.email);
        println!("{}", user.id.dimmed());
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_dashboard(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.dashboard()?;
    if let Some(user) = &result.user {
        println!("Welcome, {}", user.name.bold());
    }
    if let Some(summary) = &result.summary {
        println!();
        println!("  {:>4}  Posted jobs", summary.jobs_posted);
        println!("  {:>4}  CV documents", summary.documents);
        println!("  {:>4}  Applications received", summary.applications_received);
        println!("  {:>4}  Applications sent", summary.applications_sent);
    }
    if !result.jobs.is_empty() {
        println!();
        println!("Your recent jobs:");
        print_jobs(&result.jobs);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_jobs(ctx: &AppContext, filter: &JobFilter) -> Result<()> {
    let result = ctx.api.list_jobs(filter)?;
    print_jobs(&result.jobs);
    print_messages(&result.messages);
    Ok(())
}

fn handle_post(ctx: &mut AppContext, fields: NewJob) -> Result<()> {
    let result = ctx.api.post_job(fields)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_show(ctx: &AppContext, job_id: &str) -> Result<()> {
    let result = ctx.api.show_job(job_id)?;
    for job in &result.jobs {
        print_full_job(job);
    }
    print_messages(&result.messages);
    if !result.applications.is_empty() {
        println!();
        print_applications(&result.applications);
    }
    Ok(())
}

fn handle_delete_job(ctx: &mut AppContext, job_id: &str) -> Result<()> {
    let result = ctx.api.delete_job(job_id)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_cv(ctx: &mut AppContext, action: CvCommands) -> Result<()> {
    let result = match action {
        CvCommands::Upload { path } => ctx.api.upload_document(&path)?,
        CvCommands::List => {
            let result = ctx.api.list_documents()?;
            if result.documents.is_empty() {
                println!("No CVs uploaded.");
            }
            result
        }
        CvCommands::Delete { document_id } => {
            let result = ctx.api.delete_document(&document_id)?;
            print_messages(&result.messages);
            return Ok(());
        }
        CvCommands::Export {
            document_id,
            target,
        } => ctx.api.export_document(&document_id, &target)?,
    };
    print_documents(&result.documents);
    print_messages(&result.messages);
    Ok(())
}

fn handle_apply(
    ctx: &mut AppContext,
    job_id: &str,
    document_id: &str,
    cover_letter: Option<String>,
) -> Result<()> {
    let result = ctx.api.apply(job_id, document_id, cover_letter)?;
    print_messages(&result.messages);
    print_applications(&result.applications);
    Ok(())
}

fn handle_applications(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.my_applications()?;
    if result.applications.is_empty() {
        println!("No applications yet.");
    }
    print_applications(&result.applications);
    print_messages(&result.messages);
    Ok(())
}

fn handle_applicants(ctx: &AppContext, job_id: &str) -> Result<()> {
    let result = ctx.api.applications_for_job(job_id)?;
    if result.applications.is_empty() {
        println!("No applications to show.");
    }
    print_applications(&result.applications);
    print_messages(&result.messages);
    Ok(())
}

fn handle_withdraw(ctx: &mut AppContext, application_id: &str) -> Result<()> {
    let result = ctx.api.withdraw(application_id)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_status(ctx: &mut AppContext, application_id: &str, status: &str) -> Result<()> {
    let result = ctx.api.set_status(application_id, status)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config(action)?;
    if result.messages.is_empty() {
        if let Some(config) = &result.config {
            for (key, value) in config.entries() {
                println!("{} = {}", key, value);
            }
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

fn print_full_job(job: &JobPosting) {
    println!("{} {}", job.id.yellow(), job.title.bold());
    println!("--------------------------------");
    println!("{} · {} · {}", job.company, job.location, job.category);
    if !job.salary.is_empty() {
        println!("Salary: {}", job.salary);
    }
    println!("Posted {}", format_time_ago(job.date_posted).trim());
    println!();
    println!("{}", job.description);
    println!();
    println!("Requirements:");
    for req in &job.requirements {
        println!("  • {}", req);
    }
}

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;

fn print_jobs(jobs: &[JobPosting]) {
    if jobs.is_empty() {
        println!("No jobs found.");
        return;
    }

    for job in jobs {
        let id_str = format!("{}  ", job.id);
        let summary = format!("{} · {} · {}", job.title, job.company, job.location);
        let time_ago = format_time_ago(job.date_posted);
        print_row(&id_str, &summary, &time_ago);
    }
}

fn print_documents(documents: &[Document]) {
    for doc in documents {
        let id_str = format!("{}  ", doc.id);
        let summary = format!("{} ({})", doc.file_name, format_file_size(doc.file_size));
        let time_ago = format_time_ago(doc.upload_date);
        print_row(&id_str, &summary, &time_ago);
    }
}

fn print_applications(views: &[ApplicationView]) {
    for view in views {
        let app = &view.application;
        let id_str = format!("{}  ", app.id);
        let job_title = view
            .job
            .as_ref()
            .map(|j| j.title.as_str())
            .unwrap_or("(deleted job)");
        let summary = format!("[{}] {}", app.status, job_title);
        let time_ago = format_time_ago(app.application_date);
        print_row(&id_str, &summary, &time_ago);

        let details = format!(
            "{} <{}> · {}",
            app.applicant_name, app.applicant_email, view.document_label
        );
        println!("      {}", truncate_to_width(&details, LINE_WIDTH - 6));
        if let Some(letter) = &app.cover_letter {
            println!("      {}", truncate_to_width(letter, LINE_WIDTH - 6).dimmed());
        }
    }
}

fn print_row(id_str: &str, summary: &str, time_ago: &str) {
    let left_prefix = "  ";
    let fixed_width = left_prefix.width() + id_str.width() + TIME_WIDTH;
    let available = LINE_WIDTH.saturating_sub(fixed_width);

    let summary_display = truncate_to_width(summary, available);
    let padding = available.saturating_sub(summary_display.width());

    println!(
        "{}{}{}{}{}",
        left_prefix,
        id_str.yellow(),
        summary_display,
        " ".repeat(padding),
        time_ago.dimmed()
    );
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let c = if c == '\n' { ' ' } else { c };
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: chrono::DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);

    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
