use std::path::PathBuf;

use anyhow::Context;
use cardcanvas::config::UserConfig;
use cardcanvas::font::{Font, GlyphFont};
use cardcanvas::script::Event;
use cardcanvas::upload::{HttpUploader, UploadStatus};
use cardcanvas::CardEditor;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(name = "cardcanvas", about = "Plays back a card editing session from a script.")]
struct Options {
   /// The script to play back, one event per line.
   #[structopt(parse(from_os_str))]
   script: PathBuf,

   /// The width of the canvas's container, in pixels.
   #[structopt(long, default_value = "800")]
   width: u32,

   /// Use this config file instead of the one in the user's config directory.
   #[structopt(long, parse(from_os_str))]
   config: Option<PathBuf>,
}

fn load_font(config: &UserConfig) -> Option<Box<dyn Font>> {
   let font = match &config.text.font_path {
      Some(path) => GlyphFont::load(path, GlyphFont::DEFAULT_SIZE),
      None => GlyphFont::find_serif(GlyphFont::DEFAULT_SIZE),
   };
   match font {
      Ok(font) => Some(Box::new(font)),
      Err(error) => {
         log::warn!("{}; messages cannot be added", error);
         None
      }
   }
}

fn run(options: Options) -> anyhow::Result<()> {
   let config = match &options.config {
      Some(path) => UserConfig::load_or_create_at(path),
      None => UserConfig::load_or_create(),
   }
   .context("cannot load config")?;

   let script = std::fs::read_to_string(&options.script)
      .with_context(|| format!("cannot read script {:?}", options.script))?;

   let runtime = tokio::runtime::Runtime::new()?;
   let uploader = HttpUploader::new(&config.upload.endpoint, runtime.handle().clone())?;
   let mut editor = CardEditor::new(&config, options.width, load_font(&config), Box::new(uploader));

   for (line, event) in Event::parse_script(&script) {
      let outcome = event.and_then(|event| event.apply(&mut editor));
      match outcome {
         Ok(Some(upload)) => match runtime.block_on(upload.finish()) {
            UploadStatus::Uploaded(_) => println!("line {}: card submitted", line),
            status => println!("line {}: card was not submitted: {:?}", line, status),
         },
         Ok(None) => (),
         Err(error) => log::warn!("line {}: {}", line, error),
      }
   }

   Ok(())
}

fn main() {
   let _ = SimpleLogger::new().with_level(LevelFilter::Info).env().init();

   if let Err(error) = run(Options::from_args()) {
      log::error!("{:#}", error);
      std::process::exit(1);
   }
}
