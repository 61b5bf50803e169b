use anyhow::Result;
use owo_colors::OwoColorize;
use syllabus_core::config::SyllabusConfig;
use syllabus_core::parse_tasks_json;
use syllabus_core::storage::{SqliteTaskStore, TaskStore};

use crate::commands::json_arg;
use crate::render::Render;

fn open_store() -> Result<SqliteTaskStore> {
    let config = SyllabusConfig::load()?;
    Ok(SqliteTaskStore::open(config.database_path()?)?)
}

pub fn save(owner: &str, json: &str) -> Result<()> {
    let tasks = parse_tasks_json(&json_arg(json)?)?;
    let saved = open_store()?.save(&tasks, owner)?;

    println!("{}", format!("Saved {} tasks for {}", saved.len(), owner).green());
    for task in &saved {
        println!("  {}", task.render());
    }

    Ok(())
}

pub fn list(owner: &str) -> Result<()> {
    let tasks = open_store()?.list(owner)?;

    if tasks.is_empty() {
        println!("{}", format!("No saved tasks for {}", owner).dimmed());
        return Ok(());
    }

    for task in &tasks {
        println!("{}", task.render());
    }

    Ok(())
}

pub fn delete(owner: &str, id: i64) -> Result<()> {
    open_store()?.delete(id, owner)?;
    println!("{}", format!("Deleted task #{}", id).red());
    Ok(())
}
