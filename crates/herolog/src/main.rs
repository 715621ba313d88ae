//! `herolog` - CLI for the hero action logbook.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use chrono::Local;
use clap::Parser;
use tracing::{debug, info};

use herolog::cli::{
    AddCommand, CheckUrlCommand, Cli, Command, ConfigCommand, EditCommand, ExportCommand,
    ListCommand, OutputFormat, ShowCommand, StatsCommand, TimelineCommand,
};
use herolog::form::{FormController, UrlFeedback};
use herolog::images::{normalize_url, probe, HttpImageLoader};
use herolog::presentation::{filtered_list, render_stats, stats, Presenter, Style};
use herolog::{init_logging, Category, Config, EventRepository, SaveStatus, Store};

const DELETE_PROMPT: &str = "Êtes-vous sûr de vouloir supprimer cette action ? [o/N] ";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Config(cmd) => handle_config(&config, cmd),
        Command::CheckUrl(cmd) => handle_check_url(&config, &cmd).await,
        command => {
            let store = Store::open(&config).context("failed to open the logbook")?;
            let mut repo = EventRepository::new(store);
            run(&config, &mut repo, command).await
        }
    }
}

async fn run(config: &Config, repo: &mut EventRepository, command: Command) -> anyhow::Result<()> {
    let mut presenter = Presenter::new(config.display.color);
    match command {
        Command::Add(cmd) => handle_add(config, repo, cmd).await,
        Command::Edit(cmd) => handle_edit(config, repo, cmd).await,
        Command::Delete(cmd) => {
            if repo.find_by_id(cmd.id).is_none() {
                bail!("no action with id {}", cmd.id);
            }
            if !cmd.yes && !confirm(DELETE_PROMPT)? {
                info!("Deletion cancelled");
                return Ok(());
            }
            let change = repo.delete(cmd.id);
            ensure_saved(repo, &change.save)
        }
        Command::Show(cmd) => handle_show(repo, &mut presenter, &cmd),
        Command::Timeline(cmd) => {
            handle_timeline(repo, &mut presenter, &cmd);
            Ok(())
        }
        Command::List(cmd) => handle_list(config, repo, &presenter, &cmd),
        Command::Stats(cmd) => handle_stats(config, repo, &cmd),
        Command::Export(cmd) => handle_export(repo, &cmd),
        Command::Config(_) | Command::CheckUrl(_) => Ok(()),
    }
}

/// Fail the command when the change did not reach the database.
///
/// The process is about to exit, so the in-memory collection is written to
/// the recovery file first. A full slot also gets the capacity notice.
fn ensure_saved(repo: &EventRepository, status: &SaveStatus) -> anyhow::Result<()> {
    if status.is_saved() {
        return Ok(());
    }
    if let Some(warning) = status.warning() {
        eprintln!("{warning}");
    }
    let recovery = repo
        .store()
        .write_recovery()
        .context("failed to write the unsaved actions")?;
    bail!(
        "change not saved; all actions were written to {}",
        recovery.display()
    );
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "o" | "oui" | "y" | "yes"
    ))
}

/// Probe every URL field of the form and print its indicator.
async fn check_urls(config: &Config, form: &mut FormController) -> anyhow::Result<()> {
    let loader = HttpImageLoader::new(config.probe_timeout())?;
    for field in 0..form.url_inputs().len() {
        let value = form.url_inputs()[field].value.clone();
        let feedback = form.check_url(field, &value, &loader).await;
        if feedback != UrlFeedback::None {
            eprintln!("{} {}", form.url_inputs()[field].value, feedback.indicator());
        }
    }
    Ok(())
}

fn fill_urls(form: &mut FormController, urls: Vec<String>) {
    for (i, url) in urls.into_iter().enumerate() {
        let field = if i == 0 { 0 } else { form.add_url_input() };
        form.set_url(field, url);
    }
}

async fn handle_add(
    config: &Config,
    repo: &mut EventRepository,
    cmd: AddCommand,
) -> anyhow::Result<()> {
    let mut form = FormController::new();
    form.category = cmd.category.into();
    form.title = cmd.title;
    form.date = cmd.date.unwrap_or_else(|| Local::now().date_naive());
    form.description = cmd.description;
    form.files = cmd.files;
    fill_urls(&mut form, cmd.urls);

    if !cmd.no_check {
        check_urls(config, &mut form).await?;
    }

    let outcome = form.submit(repo, config.compress_options()).await?;
    ensure_saved(repo, &outcome.change.save)?;
    println!("{} [#{}]", outcome.message, outcome.change.id);
    Ok(())
}

async fn handle_edit(
    config: &Config,
    repo: &mut EventRepository,
    cmd: EditCommand,
) -> anyhow::Result<()> {
    let mut form = FormController::new();
    if !form.enter_edit(repo, cmd.id) {
        bail!("no action with id {}", cmd.id);
    }
    if let Some(title) = cmd.title {
        form.title = title;
    }
    if let Some(category) = cmd.category {
        form.category = category.into();
    }
    if let Some(date) = cmd.date {
        form.date = date;
    }
    if let Some(description) = cmd.description {
        form.description = description;
    }
    form.files = cmd.files;

    if !cmd.urls.is_empty() {
        form.clear_urls();
        fill_urls(&mut form, cmd.urls);
        if !cmd.no_check {
            check_urls(config, &mut form).await?;
        }
    }

    let outcome = form.submit(repo, config.compress_options()).await?;
    ensure_saved(repo, &outcome.change.save)?;
    println!("{}", outcome.message);
    Ok(())
}

fn handle_show(
    repo: &EventRepository,
    presenter: &mut Presenter,
    cmd: &ShowCommand,
) -> anyhow::Result<()> {
    let Some(event) = repo.find_by_id(cmd.id) else {
        bail!("no action with id {}", cmd.id);
    };
    let page = cmd.page.map(|page| page.saturating_sub(1));
    println!("{}", presenter.render_event(event, page));
    Ok(())
}

fn handle_timeline(repo: &EventRepository, presenter: &mut Presenter, cmd: &TimelineCommand) {
    match cmd.category {
        Some(category) => {
            presenter.carousels_mut().reset(repo.events());
            println!(
                "{}",
                presenter.render_category(repo.events(), Category::from(category))
            );
        }
        None => println!("{}", presenter.render_timelines(repo.events())),
    }
}

fn handle_list(
    config: &Config,
    repo: &EventRepository,
    presenter: &Presenter,
    cmd: &ListCommand,
) -> anyhow::Result<()> {
    let mut form = FormController::new();
    form.set_filter(cmd.filter.unwrap_or(config.display.default_filter));
    debug!(filter = %form.filter(), "Listing actions");

    match cmd.format {
        OutputFormat::Plain => println!("{}", presenter.render_list(repo.events(), form.filter())),
        OutputFormat::Json => {
            let events = filtered_list(repo.events(), form.filter());
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
    }
    Ok(())
}

fn handle_stats(config: &Config, repo: &EventRepository, cmd: &StatsCommand) -> anyhow::Result<()> {
    let counts = stats(repo.events());
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
    } else {
        println!("{}", render_stats(&counts, Style::new(config.display.color)));
        let storage = repo.store().storage();
        let used = storage.slot_len(repo.store().slot_key())?;
        let db = storage.stats()?;
        println!(
            "Stockage : {used} / {} octets (base {} octets)",
            config.storage.max_slot_bytes, db.db_size_bytes
        );
    }
    Ok(())
}

fn handle_export(repo: &EventRepository, cmd: &ExportCommand) -> anyhow::Result<()> {
    let document = serde_json::to_string_pretty(repo.events())?;
    match &cmd.output {
        Some(path) => {
            std::fs::write(path, document)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("Exported {} actions to {}", repo.events().len(), path.display());
        }
        None => println!("{document}"),
    }
    Ok(())
}

async fn handle_check_url(config: &Config, cmd: &CheckUrlCommand) -> anyhow::Result<()> {
    let url = normalize_url(&cmd.url);
    if url.is_empty() {
        bail!("empty URL");
    }
    let loader = HttpImageLoader::new(config.probe_timeout())?;
    let result = probe(&loader, &url).await;
    let feedback = if result.success {
        UrlFeedback::Valid
    } else {
        UrlFeedback::Invalid
    };
    println!("{} {}", result.url, feedback.indicator());
    if !result.success {
        bail!("no image could be loaded from {}", result.url);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Slot key:           {}", config.storage.slot_key);
                println!("  Max slot bytes:     {}", config.storage.max_slot_bytes);
                println!();
                println!("[Images]");
                println!("  Max width:          {}", config.images.max_width);
                println!("  JPEG quality:       {}", config.images.quality);
                println!("  Probe timeout (s):  {}", config.images.probe_timeout_secs);
                println!();
                println!("[Display]");
                println!("  Color:              {}", config.display.color);
                println!("  Default filter:     {}", config.display.default_filter);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
