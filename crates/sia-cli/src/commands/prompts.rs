//! Prompts-related command implementations

use anyhow::Result;
use sia_core::prompts::{default_prompts_dir, PromptLibrary};

/// List all available prompts and their override status
pub fn cmd_prompts_list() -> Result<()> {
    let mut library = PromptLibrary::new();
    let prompts = library.list();

    println!("Available Prompts:\n");

    println!("{:<24} {:>7}  {:<10}  {}", "ID", "VERSION", "SOURCE", "DESCRIPTION");
    println!("{}", "-".repeat(80));

    for info in prompts {
        let source = if info.has_override {
            "✓ Custom"
        } else {
            "Default"
        };

        println!(
            "{:<24} {:>7}  {:<10}  {}",
            info.id, info.version, source, info.description
        );
        if let Some(path) = info.override_path {
            println!("{:<24} {}", "", path.display());
        }
    }

    println!();
    println!(
        "Override directory: {}",
        default_prompts_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not available)".to_string())
    );

    println!();
    println!("To customize a prompt, copy it to the override directory as <id>.md");
    println!("and edit it. Keep the frontmatter and the # System / # User sections.");

    Ok(())
}
