use crate::common::config::StepperConfig;
use crate::common::logger::{initialize_logger_with_level, parse_level};
use crate::container::presets::Preset;
use crate::container::slot::Slot;
use crate::container::structure::{Structure, StructureKind};
use crate::execution::listener::{StepEvent, StepListener};
use crate::execution::session::Session;
use crate::execution::step_engine::{SnapshotView, StepResult};
use crate::planner::operation::{OperationKind, OperationParams, parse_index, parse_key};
use crate::planner::plan::{Highlight, Outcome};
use clap::Parser;
use colored::*;
use rustyline::DefaultEditor;
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file with table sizes, speed and log level
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// linear, quadratic, double, chaining or array
    #[arg(short = 't', long)]
    structure: Option<String>,

    /// Capacity (or bucket count) of the starting structure
    #[arg(short, long)]
    size: Option<usize>,

    /// Start from a named exercise instead of an empty structure
    #[arg(short, long)]
    preset: Option<String>,

    /// Auto-play delay in milliseconds
    #[arg(long)]
    speed: Option<u64>,
}

fn paint(text: String, lit: bool) -> String {
    if lit {
        text.black().on_yellow().bold().to_string()
    } else {
        text
    }
}

/// Renders a snapshot as text, marking highlighted cells.
pub fn render_structure(structure: &Structure, highlight: &Highlight) -> String {
    let lit = highlight.positions();
    match structure {
        Structure::Open(table) => {
            let cells: Vec<String> = table
                .slots()
                .iter()
                .enumerate()
                .map(|(i, slot)| {
                    let text = match slot {
                        Slot::Tombstone => format!("{:>4}", "DEL").red().to_string(),
                        other => format!("{:>4}", other.to_string()),
                    };
                    paint(text, lit.contains(&i))
                })
                .collect();
            let indices: Vec<String> = (0..table.capacity())
                .map(|i| format!("{:>4}", i).dimmed().to_string())
                .collect();
            format!("{}\n{}", cells.join(" "), indices.join(" "))
        }
        Structure::Chained(table) => {
            let mut lines = Vec::with_capacity(table.bucket_count());
            for (b, chain) in table.buckets().iter().enumerate() {
                let label = paint(format!("[{}]", b), *highlight == Highlight::Bucket(b));
                let mut line = label;
                for (n, key) in chain.iter().enumerate() {
                    let node_lit = *highlight == Highlight::ChainNode { bucket: b, node: n };
                    line.push_str(" -> ");
                    line.push_str(&paint(key.to_string(), node_lit));
                }
                line.push_str(&" -> NULL".dimmed().to_string());
                lines.push(line);
            }
            lines.join("\n")
        }
        Structure::Array(arr) => {
            let cells: Vec<String> = arr
                .cells()
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let text = match cell {
                        Some(v) => format!("{:>4}", v),
                        None => format!("{:>4}", "_").dimmed().to_string(),
                    };
                    paint(text, lit.contains(&i))
                })
                .collect();
            let indices: Vec<String> = (0..arr.capacity())
                .map(|i| format!("{:>4}", i).dimmed().to_string())
                .collect();
            format!(
                "{}\n{}\nsize {}/{}",
                cells.join(" "),
                indices.join(" "),
                arr.len(),
                arr.capacity()
            )
        }
    }
}

fn render_outcome(outcome: &Outcome) -> String {
    if outcome.is_success() {
        outcome.to_string().green().bold().to_string()
    } else {
        outcome.to_string().red().bold().to_string()
    }
}

/// Prints every engine event as it happens, including steps applied by the auto-play timer.
struct CliStepListener;

impl CliStepListener {
    fn print_step(result: &StepResult) {
        println!(
            "{} {}",
            format!("Step {}:", result.index + 1).cyan().bold(),
            result.description
        );
        println!("{}", render_structure(&result.snapshot, &result.highlight));
        if let Some(outcome) = &result.outcome {
            println!("{}", render_outcome(outcome));
        }
    }
}

impl StepListener for CliStepListener {
    fn on_event(&mut self, event: &StepEvent) {
        match event {
            StepEvent::Loaded {
                plan_len,
                description,
            } => println!("{} ({} steps)", description.blue().bold(), plan_len),
            StepEvent::Applied(result) => Self::print_step(result),
            StepEvent::SteppedBack(view) => {
                println!("{}", "Stepped back".yellow());
                println!("{}", render_structure(&view.structure, &view.highlight));
            }
            StepEvent::Reset { snapshot } => {
                println!("{}", "Reset to the snapshot before the operation".yellow());
                println!("{}", render_structure(snapshot, &Highlight::None));
            }
        }
    }
}

struct StepperCommandExecutor {
    session: Session,
    config: StepperConfig,
}

impl StepperCommandExecutor {
    fn new(session: Session, config: StepperConfig) -> Self {
        Self { session, config }
    }

    fn execute_command(&mut self, command: &str) -> Result<(), Box<dyn Error>> {
        let parts: Vec<&str> = command.split_whitespace().collect();
        let Some((&head, args)) = parts.split_first() else {
            return Ok(());
        };

        match head.to_lowercase().as_str() {
            "insert" | "search" | "find" | "delete" | "remove" | "traverse" => {
                let kind: OperationKind = head.parse()?;
                self.handle_operation(kind, args)?
            }
            "next" | "n" => {
                self.session.advance()?;
            }
            "run" => self.handle_run()?,
            "back" | "b" => {
                self.session.step_back()?;
            }
            "reset" => self.session.reset(),
            "play" => {
                let speed = match args.first() {
                    Some(ms) => ms.parse()?,
                    None => self.session.speed_ms(),
                };
                self.session.set_auto_play(true, speed)?;
                println!("Auto-play on, {} ms per step", self.session.speed_ms());
            }
            "pause" => {
                let speed = self.session.speed_ms();
                self.session.set_auto_play(false, speed)?;
                println!("Auto-play off");
            }
            "speed" => {
                let requested: u64 = args.first().ok_or("usage: speed <ms>")?.parse()?;
                let enabled = self.session.auto_play();
                self.session.set_auto_play(enabled, requested)?;
                println!("Speed set to {} ms", self.session.speed_ms());
            }
            "show" => self.display_snapshot(&self.session.snapshot()),
            "code" => self.display_code(),
            "new" => self.handle_new(args)?,
            "preset" => self.handle_preset(args)?,
            "presets" => {
                for preset in Preset::ALL {
                    println!("  {}", preset);
                }
            }
            "help" => self.display_help(),
            other => return Err(format!("Unknown command '{}', try 'help'", other).into()),
        }

        Ok(())
    }

    fn handle_operation(&mut self, kind: OperationKind, args: &[&str]) -> Result<(), Box<dyn Error>> {
        let structure = self.session.structure_kind();
        let params = match (kind, structure, args) {
            (OperationKind::Traverse, _, _) => OperationParams::None,
            (OperationKind::Insert, StructureKind::Array, [index, value]) => {
                OperationParams::InsertAt {
                    index: parse_index(index)?,
                    value: parse_key(value)?,
                }
            }
            (OperationKind::Insert, StructureKind::Array, _) => {
                return Err("usage: insert <index> <value>".into());
            }
            (OperationKind::Delete, StructureKind::Array, [index]) => OperationParams::DeleteAt {
                index: parse_index(index)?,
            },
            (OperationKind::Delete, StructureKind::Array, _) => {
                return Err("usage: delete <index>".into());
            }
            (_, _, [key]) => OperationParams::Key(parse_key(key)?),
            _ => return Err(format!("usage: {} <key>", kind).into()),
        };

        self.session.start_operation(kind, structure, params)?;
        Ok(())
    }

    fn handle_run(&mut self) -> Result<(), Box<dyn Error>> {
        loop {
            if self.session.advance()?.done {
                return Ok(());
            }
        }
    }

    fn handle_new(&mut self, args: &[&str]) -> Result<(), Box<dyn Error>> {
        let kind: StructureKind = args.first().ok_or("usage: new <structure> [size]")?.parse()?;
        let size = match args.get(1) {
            Some(size) => size.parse()?,
            None => self.config.size_for(kind),
        };
        self.session.replace_structure(Structure::empty(kind, size)?)?;
        self.display_snapshot(&self.session.snapshot());
        Ok(())
    }

    fn handle_preset(&mut self, args: &[&str]) -> Result<(), Box<dyn Error>> {
        let preset: Preset = args.first().ok_or("usage: preset <name>")?.parse()?;
        self.session.replace_structure(preset.build()?)?;
        println!("Loaded preset {}", preset.to_string().bold());
        self.display_snapshot(&self.session.snapshot());
        Ok(())
    }

    fn display_snapshot(&self, view: &SnapshotView) {
        println!(
            "{} {}",
            view.structure.kind().to_string().bold(),
            format!(
                "[{}, step {}/{}]",
                view.status,
                view.cursor.unwrap_or(0),
                view.plan_len
            )
            .dimmed()
        );
        println!("{}", render_structure(&view.structure, &view.highlight));
    }

    fn display_code(&self) {
        let Some(lines) = self.session.listing() else {
            println!("{}", "No operation loaded".yellow());
            return;
        };
        let active = self.session.snapshot().code_line;
        for (i, line) in lines.iter().enumerate() {
            let text = format!("{:>2}  {:<55} // {}", i, line.line, line.desc);
            if Some(i) == active {
                println!("{}", text.black().on_yellow());
            } else {
                println!("{}", text);
            }
        }
    }

    fn display_help(&self) {
        println!("\n{}", "Available Commands:".bold());
        println!("\nOperations:");
        println!("  insert <key>            - Insert into a hash table");
        println!("  insert <index> <value>  - Shift-insert into the array");
        println!("  search <key>            - Search a hash table or the array");
        println!("  delete <key>            - Delete from a hash table");
        println!("  delete <index>          - Shift-delete from the array");
        println!("  traverse                - Sum and average the array");

        println!("\nStepping:");
        println!("  next | n                - Apply the next step");
        println!("  run                     - Apply every remaining step");
        println!("  back | b                - Go back one step");
        println!("  reset                   - Restore the snapshot before the operation");
        println!("  play [ms]               - Auto-play, optionally at a new speed");
        println!("  pause                   - Stop auto-play");
        println!("  speed <ms>              - Delay between steps (100-2000)");

        println!("\nMeta Commands:");
        println!("  show                    - Display the current snapshot");
        println!("  code                    - Show the listing with the active line");
        println!("  new <structure> [size]  - linear, quadratic, double, chaining, array");
        println!("  preset <name>           - Load a named exercise");
        println!("  presets                 - List exercise names");
        println!("  help                    - Show this help message");
        println!("  exit                    - Exit");
    }
}

fn build_session(args: &Args, config: &StepperConfig) -> Result<Session, Box<dyn Error>> {
    let mut session = match &args.preset {
        Some(name) => {
            let preset: Preset = name.parse()?;
            Session::new(preset.build()?)
        }
        None => {
            let kind: StructureKind = args.structure.as_deref().unwrap_or("linear").parse()?;
            let size = args.size.unwrap_or_else(|| config.size_for(kind));
            Session::new(Structure::empty(kind, size)?)
        }
    };
    session.set_auto_play(false, args.speed.unwrap_or(config.speed_ms))?;
    Ok(session)
}

pub fn run_cli() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => StepperConfig::load(path)?,
        None => StepperConfig::default(),
    };
    initialize_logger_with_level(parse_level(&config.log_level));

    // Auto-play timers run here; the REPL itself stays synchronous.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()?;
    let _guard = runtime.enter();

    let mut session = build_session(&args, &config)?;
    session.add_listener(Box::new(CliStepListener));

    println!("{}", "\nDSA Stepper".blue().bold());
    println!("Type 'help' for commands\n");

    let mut executor = StepperCommandExecutor::new(session, config);
    executor.display_snapshot(&executor.session.snapshot());

    let mut rl = DefaultEditor::new()?;
    if rl.load_history("history.txt").is_err() {
        println!("{}", "No previous history.".yellow());
    }

    loop {
        match rl.readline("dsa> ") {
            Ok(line) => {
                let command = line.trim();
                if command.is_empty() {
                    continue;
                }

                rl.add_history_entry(command)?;

                if command == "exit" {
                    println!("Shutting down...");
                    break;
                }

                match executor.execute_command(command) {
                    Ok(_) => {}
                    Err(e) => println!("{}", format!("Error: {}", e).red()),
                }
            }
            Err(err) => {
                println!("Error: {}", err);
                break;
            }
        }
    }

    executor.session.reset();
    rl.save_history("history.txt")?;
    Ok(())
}
