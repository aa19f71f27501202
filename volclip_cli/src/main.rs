mod io;

use anyhow::{Context, Result, anyhow, bail};
use log::info;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use volclip_clipboard::{PasteOrchestrator, PromptAnswer, Transport, copy_selected};
use volclip_project::{CONFIG_FILE, create_config, load_config, load_config_or_default};
use volclip_snapshot::decode_snapshot;
use volclip_world::{EditorWorld, World};

use crate::io::{FileTransport, SystemClipboard, ask_on_stdin};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let Some(command) = args.get(1).map(String::as_str) else {
        print_usage();
        std::process::exit(2);
    };

    let result = match command {
        "copy" => copy_command(&args),
        "paste" => paste_command(&args),
        "inspect" => inspect_command(&args),
        "init" => init_command(&args, &cwd),
        _ => {
            print_usage();
            Err(anyhow!("unknown command `{command}`"))
        }
    };

    if let Err(err) = result {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  volclip copy --world <world.json> --select <Name,Name..> [--out <file>]");
    eprintln!("  volclip paste --world <world.json> [--in <file>] [--config <volclip.toml>] [--yes-all|--no-all]");
    eprintln!("  volclip inspect [<file>]              # reads the clipboard without a file");
    eprintln!("  volclip init [--path <dir>]           # writes a default {CONFIG_FILE}");
}

fn parse_flag_value(args: &[String], flag: &str) -> Option<String> {
    let idx = args.iter().position(|a| a == flag)?;
    args.get(idx + 1).cloned()
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn open_transport(file: Option<String>) -> Result<Box<dyn Transport>> {
    match file {
        Some(path) => Ok(Box::new(FileTransport {
            path: PathBuf::from(path),
        })),
        None => Ok(Box::new(
            SystemClipboard::open().context("cannot open the system clipboard")?,
        )),
    }
}

fn load_world(path: &Path) -> Result<EditorWorld> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read world {}", path.display()))?;
    EditorWorld::from_json(&text).with_context(|| format!("invalid world {}", path.display()))
}

fn world_path(args: &[String]) -> Result<PathBuf> {
    parse_flag_value(args, "--world")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("missing --world <world.json>"))
}

fn copy_command(args: &[String]) -> Result<()> {
    let path = world_path(args)?;
    let mut world = load_world(&path)?;
    let names = parse_flag_value(args, "--select").unwrap_or_default();

    world.select_none();
    for name in names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        let id = world
            .actors()
            .find(|(_, actor)| actor.name == name)
            .map(|(id, _)| id)
            .ok_or_else(|| anyhow!("no actor named `{name}` in {}", path.display()))?;
        world.select_actor(id);
    }

    let mut transport = open_transport(parse_flag_value(args, "--out"))?;
    let copied = copy_selected(&world, transport.as_mut()).context("copy failed")?;
    println!("copied {copied} volume(s)");
    Ok(())
}

fn paste_command(args: &[String]) -> Result<()> {
    let path = world_path(args)?;
    let mut world = load_world(&path)?;

    let config = match parse_flag_value(args, "--config") {
        Some(config) => load_config(Path::new(&config))
            .with_context(|| format!("cannot load config {config}"))?,
        None => {
            let root = path.parent().unwrap_or_else(|| Path::new("."));
            load_config_or_default(root).context("cannot load config")?
        }
    };

    if has_flag(args, "--yes-all") && has_flag(args, "--no-all") {
        bail!("--yes-all and --no-all are exclusive");
    }
    let mut prompt: Box<dyn FnMut(&str) -> PromptAnswer> = if has_flag(args, "--yes-all") {
        Box::new(|_: &str| PromptAnswer::YesAll)
    } else if has_flag(args, "--no-all") {
        Box::new(|_: &str| PromptAnswer::NoAll)
    } else {
        Box::new(ask_on_stdin)
    };

    let mut transport = open_transport(parse_flag_value(args, "--in"))?;
    let report = PasteOrchestrator::new(&config)
        .paste_from(&mut world, transport.as_mut(), &mut prompt)
        .context("paste failed")?;

    let json = world.to_json().context("cannot serialize world")?;
    fs::write(&path, json).with_context(|| format!("cannot write world {}", path.display()))?;
    info!("wrote {}", path.display());

    println!(
        "pasted {} volume(s) ({} skipped, {} replaced), loaded {} level(s), {} link(s)",
        report.spawned.len(),
        report.skipped_records,
        report.replaced,
        report.loaded_levels.len(),
        report.relinks
    );
    for package in &report.failed_levels {
        eprintln!("could not load {package}");
    }
    Ok(())
}

fn inspect_command(args: &[String]) -> Result<()> {
    let file = args.get(2).filter(|a| !a.starts_with('-')).cloned();
    let mut transport = open_transport(file)?;
    let text = transport.read().context("cannot read snapshot")?;
    let records = decode_snapshot(&text).context("not a volume snapshot")?;

    for record in &records {
        let origin = record
            .origin
            .as_ref()
            .map(|o| o.name.as_str())
            .unwrap_or("-");
        let p = record.transform.position;
        println!(
            "{} [{}] in {} at ({}, {}, {}): {} prop(s), {} component(s), {} poly(s)",
            record.internal_name,
            record.class_path,
            origin,
            p.x,
            p.y,
            p.z,
            record.properties.len(),
            record.components.len(),
            record.raw_polys.len()
        );
        for package in record.linked_packages() {
            println!("    streams {package}");
        }
    }
    println!("{} volume(s)", records.len());
    Ok(())
}

fn init_command(args: &[String], cwd: &Path) -> Result<()> {
    let root = parse_flag_value(args, "--path")
        .map(PathBuf::from)
        .unwrap_or_else(|| cwd.to_path_buf());
    let path = create_config(&root)
        .with_context(|| format!("cannot create config in {}", root.display()))?;
    println!("created {}", path.display());
    Ok(())
}
