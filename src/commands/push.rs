use std::path::PathBuf;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use syllabus_core::config::SyllabusConfig;
use syllabus_core::{Resolver, ResolverOptions, Task, parse_tasks_json};
use syllabus_provider_google::with_saved_session;
use tracing::debug;

use crate::commands::{CalendarContext, read_document};
use crate::render::Render;

pub async fn run(file: Option<PathBuf>, tasks_file: Option<PathBuf>, account: Option<String>) -> Result<()> {
    let config = SyllabusConfig::load()?;

    let tasks: Vec<Task> = match (file, tasks_file) {
        (_, Some(path)) => {
            let raw = std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
            parse_tasks_json(&raw)?
        }
        (Some(path), None) => {
            let text = read_document(&path, None)?;
            let resolver = Resolver::new(ResolverOptions {
                course: config.course.clone(),
                weekdays: config.weekday_table()?,
            });
            resolver.resolve(&text)
        }
        (None, None) => anyhow::bail!("Pass a syllabus file or --tasks <json>"),
    };

    if tasks.is_empty() {
        println!("{}", "Nothing to push".dimmed());
        return Ok(());
    }

    let calendar = CalendarContext::load(&config, account)?;
    debug!(count = tasks.len(), account = %calendar.account, "Pushing tasks");
    let service = &calendar.service;
    let batch = &tasks;

    let events = with_saved_session(&calendar.sessions, &calendar.account, |mut session| async move {
        let result = service.push_tasks(&mut session, batch).await;
        (session, result)
    })
    .await?;

    println!("{}", format!("Created {} events for {}", events.len(), calendar.account).green());
    for event in &events {
        println!("  {}", event.render());
    }

    Ok(())
}
