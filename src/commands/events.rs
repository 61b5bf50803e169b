use anyhow::Result;
use owo_colors::OwoColorize;
use syllabus_core::config::SyllabusConfig;
use syllabus_provider_google::with_saved_session;

use crate::commands::CalendarContext;
use crate::render::Render;

pub async fn run(account: Option<String>) -> Result<()> {
    let config = SyllabusConfig::load()?;
    let calendar = CalendarContext::load(&config, account)?;
    let service = &calendar.service;

    let events = with_saved_session(&calendar.sessions, &calendar.account, |mut session| async move {
        let result = service.upcoming(&mut session).await;
        (session, result)
    })
    .await?;

    if events.is_empty() {
        println!("{}", "No upcoming events".dimmed());
        return Ok(());
    }

    for event in &events {
        println!("{}", event.render());
    }

    Ok(())
}
