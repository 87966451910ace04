//! Container commands: ls, info, rm

use anyhow::Result;
use watchdog_core::{summarize, ContainerAdmin, ContainerFilter, ContainerSummary};
use watchdog_engine::RemoveOptions;

/// Column widths for the container table
const NAME_WIDTH: usize = 32;
const STATE_WIDTH: usize = 10;

/// Render summaries as a fixed-width table
pub fn format_summaries(summaries: &[ContainerSummary]) -> String {
    let mut out = format!("{:<NAME_WIDTH$} {:<STATE_WIDTH$} IMAGE\n", "NAME", "STATE");
    out.push_str(&"-".repeat(75));
    out.push('\n');
    for s in summaries {
        out.push_str(&format!(
            "{:<NAME_WIDTH$} {:<STATE_WIDTH$} {}\n",
            s.name, s.state, s.image
        ));
    }
    out
}

/// List SKALE containers
pub async fn list(
    admin: &ContainerAdmin,
    filter: ContainerFilter,
    all: bool,
    raw: bool,
    json: bool,
) -> Result<()> {
    let containers = admin.list_containers(filter, all).await?;

    if raw {
        println!("{}", serde_json::to_string_pretty(&containers)?);
        return Ok(());
    }

    let summaries = summarize(&containers);
    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if summaries.is_empty() {
        println!("No {} containers found.", filter);
        return Ok(());
    }

    print!("{}", format_summaries(&summaries));
    Ok(())
}

/// Show the status of a single container
pub async fn info(admin: &ContainerAdmin, container: &str, json: bool) -> Result<()> {
    let info = admin.container_info(container).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Container:   {}", container);
    println!("Status:      {}", info.status);
    println!("Running:     {}", admin.is_running(&info));
    println!("Needs start: {}", admin.needs_start(&info));
    if let Some(id) = info.stats.as_ref().and_then(|s| s.id.as_deref()) {
        println!("ID:          {}", id);
    }

    Ok(())
}

/// Remove a container; engine refusals are reported but do not fail the command
pub async fn remove(admin: &ContainerAdmin, container: &str, options: RemoveOptions) -> Result<()> {
    match admin.safe_remove_container(container, options).await? {
        Some(id) => println!("Removed '{}' ({})", container, id.short()),
        None => println!("Container '{}' was not removed", container),
    }
    Ok(())
}
