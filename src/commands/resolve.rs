use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use syllabus_core::config::SyllabusConfig;
use syllabus_core::{Resolver, ResolverOptions};

use crate::commands::read_document;
use crate::render::Render;

pub fn run(file: &Path, course: Option<String>, mime: Option<&str>) -> Result<()> {
    let config = SyllabusConfig::load()?;
    let text = read_document(file, mime)?;

    let resolver = Resolver::new(ResolverOptions {
        course: course.or(config.course.clone()),
        weekdays: config.weekday_table()?,
    });
    let tasks = resolver.resolve(&text);

    if tasks.is_empty() {
        eprintln!("{}", "No dated tasks found".dimmed());
    } else {
        for task in &tasks {
            eprintln!("{}", task.render());
        }
    }

    println!("{}", serde_json::to_string_pretty(&tasks)?);
    Ok(())
}
