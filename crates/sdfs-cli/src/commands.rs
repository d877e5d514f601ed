use anyhow::{bail, Context};
use colored::Colorize;
use serde_json::json;

use sdfs_engine::{EngineConfig, StoreEngine};
use sdfs_store::JsonFileStore;

use crate::cli::*;

type Engine = StoreEngine<JsonFileStore>;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let engine = open_engine(&cli)?;
    let format = cli.format;
    match cli.command {
        Command::Create(args) => cmd_create(&engine, args, format),
        Command::Read(args) => cmd_read(&engine, args, format),
        Command::List => cmd_list(&engine, format),
        Command::Stat(args) => cmd_stat(&engine, args, format),
        Command::Status => cmd_status(&engine, format),
    }
}

fn open_engine(cli: &Cli) -> anyhow::Result<Engine> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    let store = JsonFileStore::in_dir(&cli.root, config.limits);
    Ok(StoreEngine::with_config(store, config)?)
}

fn cmd_create(engine: &Engine, args: CreateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let payload = match (&args.file, args.data) {
        (Some(path), _) => std::fs::read(path)
            .with_context(|| format!("cannot read {}", path.display()))?,
        (None, data) => data.unwrap_or_default().into_bytes(),
    };
    if args.name.is_empty() || payload.is_empty() {
        bail!("enter a file name and some data");
    }

    let created = engine.create_file(&args.name, &payload)?;

    if format == OutputFormat::Json {
        println!("{}", json!({ "created": created.entry }));
        return Ok(());
    }
    println!("{} File {} created", "✓".green().bold(), created.entry.name.bold());
    println!(
        "  {} bytes in {} block(s)",
        created.entry.size,
        created.entry.block_count.to_string().cyan()
    );
    for (i, block) in created.blocks.iter().enumerate() {
        println!(
            "  {} Data Block {} ({} bytes)",
            "→".dimmed(),
            i + 1,
            block.len()
        );
    }
    Ok(())
}

fn cmd_read(engine: &Engine, args: ReadArgs, format: OutputFormat) -> anyhow::Result<()> {
    let blocks = engine.read_file(&args.name)?;

    if format == OutputFormat::Json {
        println!("{}", json!({ "name": args.name, "blocks": blocks }));
        return Ok(());
    }
    println!("Contents of {}:", args.name.bold());
    for (i, block) in blocks.iter().enumerate() {
        println!("{} {}", format!("Block {}:", i + 1).yellow(), block.to_string_lossy());
    }
    Ok(())
}

fn cmd_list(engine: &Engine, format: OutputFormat) -> anyhow::Result<()> {
    let names = engine.list_files()?;

    if format == OutputFormat::Json {
        println!("{}", json!({ "files": names }));
        return Ok(());
    }
    if names.is_empty() {
        println!("No files on the store yet.");
    }
    for name in &names {
        println!("  {name}");
    }
    Ok(())
}

fn cmd_stat(engine: &Engine, args: StatArgs, format: OutputFormat) -> anyhow::Result<()> {
    let entry = engine.stat_file(&args.name)?;

    if format == OutputFormat::Json {
        println!(
            "{}",
            json!({
                "name": entry.name,
                "size": entry.size,
                "block_count": entry.block_count,
                "block_lengths": entry.block_lengths(),
            })
        );
        return Ok(());
    }
    println!("File: {}", entry.name.bold());
    println!("  Size: {} bytes", entry.size);
    println!("  Blocks: {}", entry.block_count.to_string().cyan());
    for (i, len) in entry.block_lengths().into_iter().enumerate() {
        println!("    {} {len} bytes", format!("#{}", i + 1).dimmed());
    }
    Ok(())
}

fn cmd_status(engine: &Engine, format: OutputFormat) -> anyhow::Result<()> {
    let usage = engine.usage()?;
    let limits = engine.config().limits;

    if format == OutputFormat::Json {
        println!(
            "{}",
            json!({ "usage": usage, "limits": limits, "max_file_size": engine.config().max_file_size })
        );
        return Ok(());
    }
    println!("Store: {}", engine.store().path().display().to_string().bold());
    println!("  Files: {}/{}", usage.files, limits.max_entries);
    println!(
        "  Used: {} bytes in {} block(s) of {} bytes",
        usage.bytes, usage.blocks, limits.block_size
    );
    Ok(())
}
