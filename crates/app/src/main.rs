use std::path::PathBuf;
use std::thread;

use clap::{Parser, Subcommand};
use metronome_core::{
    AppConfig, AssetStore, AudioEngine, Clock, DrawList, FixedStepClock, KeyboardSnapshot,
    MouseSnapshot, SaveStore, Session, SpeedTemplate, SystemClock,
};
use tracing_subscriber::EnvFilter;

fn main() -> metronome_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::load_from(&cli.config)?;

    match cli.command {
        Commands::Run {
            seconds,
            fps,
            template,
            tempo,
            realtime,
        } => run(&config, seconds, fps, template, tempo, realtime),
        Commands::Check { text } => check(&text),
        Commands::AddTemplate { name, text } => add_template(&config, &name, &text),
        Commands::ListTemplates => list_templates(&config),
    }
}

fn run(
    config: &AppConfig,
    seconds: u32,
    fps: u32,
    template: Option<usize>,
    tempo: Option<u32>,
    realtime: bool,
) -> metronome_core::Result<()> {
    let store = SaveStore::new(&config.save_path.0);
    let mut metronome = store.load_or_default(&config.timing)?;
    if let Some(tempo) = tempo {
        metronome.set_tempo(tempo);
    }
    match template {
        Some(index) => metronome.start_template(index)?,
        None => metronome.resume(),
    }

    let mut engine = AudioEngine::new();
    let mut assets = AssetStore::new();
    engine.load_assets(&mut assets)?;
    let mut session = Session::new(metronome, config, assets)?;

    let fixed = FixedStepClock::from_fps(fps);
    let step = fixed.step();
    let mut clock: Box<dyn Clock> = if realtime {
        Box::new(SystemClock::start())
    } else {
        Box::new(fixed)
    };

    tracing::info!(seconds, fps, realtime, tempo = session.metronome().tempo(), "starting session");
    let mut frame = DrawList::new();
    for _ in 0..seconds.saturating_mul(fps.max(1)) {
        if realtime {
            thread::sleep(step);
        }
        session.frame(
            clock.delta(),
            MouseSnapshot::default(),
            KeyboardSnapshot::default(),
            &mut engine,
        )?;
        session.draw(&mut frame);
    }
    tracing::info!(
        sounds = engine.triggered(),
        bars = session.metronome().total_bar_counter(),
        draw_commands = frame.len(),
        "session finished"
    );

    store.save_metronome(&session.into_metronome())
}

fn check(text: &str) -> metronome_core::Result<()> {
    let template = SpeedTemplate::parse("check", text)?;
    println!(
        "{} segment(s), {} bar(s) per pass{}",
        template.segments().len(),
        template.total_bars(),
        if template.repeats() { ", repeating" } else { "" }
    );
    for segment in template.segments() {
        println!("  {:>4} bars @ {:>3} bpm", segment.bars, segment.tempo);
    }
    Ok(())
}

fn add_template(config: &AppConfig, name: &str, text: &str) -> metronome_core::Result<()> {
    let store = SaveStore::new(&config.save_path.0);
    let mut metronome = store.load_or_default(&config.timing)?;
    let template = SpeedTemplate::parse(name, text)?;
    tracing::info!(name, segments = template.segments().len(), "adding speed template");
    metronome.add_template(template);
    store.save_metronome(&metronome)
}

fn list_templates(config: &AppConfig) -> metronome_core::Result<()> {
    let store = SaveStore::new(&config.save_path.0);
    let metronome = store.load_or_default(&config.timing)?;
    for (index, template) in metronome.templates().iter().enumerate() {
        println!("{index:>3}  {:<20} {}", template.name(), template.source());
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Metronome with speed templates", long_about = None)]
struct Cli {
    /// Configuration file; defaults are used when it does not exist.
    #[arg(long, global = true, default_value = "metronome.json")]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Drive the metronome without a window and save its state afterwards.
    Run {
        /// How long to run.
        #[arg(short, long, default_value_t = 10)]
        seconds: u32,
        /// Frames per second of the tick loop.
        #[arg(long, default_value_t = 60)]
        fps: u32,
        /// Index of a stored speed template to play.
        #[arg(short, long)]
        template: Option<usize>,
        /// Starting tempo in beats per minute.
        #[arg(long)]
        tempo: Option<u32>,
        /// Pace frames with the wall clock instead of a fixed step.
        #[arg(long)]
        realtime: bool,
    },
    /// Parse a speed template and print its segments.
    Check {
        /// Template text, e.g. `r4-100-2.8-140.`
        text: String,
    },
    /// Parse a speed template and append it to the saved library.
    AddTemplate {
        #[arg(short, long)]
        name: String,
        #[arg(short = 'x', long)]
        text: String,
    },
    /// Print the saved speed templates.
    ListTemplates,
}
