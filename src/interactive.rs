use crate::config::{Config, TargetLanguage};
use crate::pipeline::{derive_output_path, TranslationJob};
use console::style;
use dialoguer::{Confirm, Input, Select};
use std::fs;
use std::path::{Path, PathBuf};

const SUBTITLE_EXTENSIONS: &[&str] = &["srt"];

pub struct InteractiveResult {
    pub job: TranslationJob,
    pub config: Config,
}

/// Ask for the input file, destination language and output path.
pub fn run_interactive_wizard(mut config: Config) -> anyhow::Result<InteractiveResult> {
    print_header();

    // Step 1: Select subtitle file
    let input = select_input_file()?;

    // Step 2: Destination language
    let target = select_target_language(config.target_language)?;

    // Step 3: Output path
    let output = select_output_path(&input, target)?;

    // Step 4: Confirm
    print_summary(&input, &output, target);

    if !Confirm::new()
        .with_prompt("Proceed with these settings?")
        .default(true)
        .interact()?
    {
        anyhow::bail!("Cancelled by user");
    }

    if target != config.target_language
        && Confirm::new()
            .with_prompt(format!("Make {} the default language?", target.name()))
            .default(false)
            .interact()?
    {
        config.target_language = target;
        save_config(&config)?;
        println!("{} Default language saved to config", style("✓").green());
    }

    println!();

    Ok(InteractiveResult {
        job: TranslationJob {
            input,
            output,
            target,
            source: config.source_language.clone(),
        },
        config,
    })
}

fn print_header() {
    println!();
    println!(
        "{}",
        style("╔═══════════════════════════════════════════════════╗").cyan()
    );
    println!(
        "{}",
        style("║          subtran - Subtitle Translator            ║").cyan()
    );
    println!(
        "{}",
        style("╚═══════════════════════════════════════════════════╝").cyan()
    );
    println!();
}

fn save_config(config: &Config) -> anyhow::Result<()> {
    if let Some(config_dir) = dirs::config_dir() {
        let subtran_dir = config_dir.join("subtran");
        fs::create_dir_all(&subtran_dir)?;

        let config_path = subtran_dir.join("config.toml");
        let toml_content = toml::to_string_pretty(config)?;
        fs::write(config_path, toml_content)?;
    }
    Ok(())
}

fn prompt_existing_path() -> anyhow::Result<PathBuf> {
    let path: String = Input::new()
        .with_prompt("Enter SRT file path")
        .interact_text()?;
    let path = PathBuf::from(path.trim());
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    Ok(path)
}

fn select_input_file() -> anyhow::Result<PathBuf> {
    println!("{}", style("Select SRT file:").bold());

    let files = scan_subtitle_files(Path::new("."))?;

    if files.is_empty() {
        println!("  No SRT files found in current directory.\n");
        return prompt_existing_path();
    }

    let mut items: Vec<String> = files
        .iter()
        .map(|f| {
            let size = fs::metadata(f)
                .map(|m| format_size(m.len()))
                .unwrap_or_else(|_| "?".to_string());
            format!("{} ({})", f.display(), size)
        })
        .collect();
    items.push("Enter custom path...".to_string());

    let selection = Select::new()
        .with_prompt("Choose a file")
        .items(&items)
        .default(0)
        .interact()?;

    if selection == files.len() {
        prompt_existing_path()
    } else {
        Ok(files[selection].clone())
    }
}

fn scan_subtitle_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() {
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                if SUBTITLE_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
                    files.push(path);
                }
            }
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

fn language_label(lang: TargetLanguage) -> String {
    format!("{} / {} ({})", lang.name(), lang.native_name(), lang.code())
}

fn select_target_language(default: TargetLanguage) -> anyhow::Result<TargetLanguage> {
    let items: Vec<String> = TargetLanguage::ALL
        .iter()
        .map(|lang| language_label(*lang))
        .collect();
    let default_idx = TargetLanguage::ALL
        .iter()
        .position(|lang| *lang == default)
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt("Select destination language")
        .items(&items)
        .default(default_idx)
        .interact()?;

    Ok(TargetLanguage::ALL[selection])
}

fn select_output_path(input: &Path, target: TargetLanguage) -> anyhow::Result<PathBuf> {
    let suggested = derive_output_path(input, target);

    let path: String = Input::new()
        .with_prompt("Output file path")
        .default(suggested.display().to_string())
        .interact_text()?;

    let path = PathBuf::from(path.trim());
    if path.as_os_str().is_empty() {
        anyhow::bail!("Please select an output file path");
    }

    if path.exists()
        && !Confirm::new()
            .with_prompt(format!("{} exists. Overwrite?", path.display()))
            .default(true)
            .interact()?
    {
        anyhow::bail!("Cancelled by user");
    }

    Ok(path)
}

fn print_summary(input: &Path, output: &Path, target: TargetLanguage) {
    println!("\n{}", style("═══ Summary ═══").bold());
    println!("  Input:     {}", style(input.display()).cyan());
    println!("  Output:    {}", style(output.display()).cyan());
    println!("  Translate: → {}", language_label(target));
    println!();
}
