//! Scripted editor events, one per line.
//!
//! ```text
//! # a red squiggle and a message
//! brush #ff0000
//! size 4
//! down 10 10
//! move 40 25
//! up
//! message Happy birthday!
//! add-message
//! submit
//! ```

use std::path::PathBuf;
use std::str::FromStr;

use crate::editor::CardEditor;
use crate::paint_canvas::Point;
use crate::upload::PendingUpload;
use crate::Error;

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
   PointerDown(Point),
   PointerMove(Point),
   PointerUp,
   PointerLeave,
   Blur,
   Background(String),
   Brush(String),
   Size(f32),
   Message(String),
   AddMessage,
   Clear,
   Resize(u32),
   /// Writes the card to a JPEG file.
   Save(PathBuf),
   Submit,
}

impl Event {
   /// Parses a script into events, paired with their line numbers. Blank lines and lines
   /// starting with `#` are skipped.
   pub fn parse_script(script: &str) -> Vec<(usize, crate::Result<Event>)> {
      script
         .lines()
         .enumerate()
         .filter(|(_, line)| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
         .map(|(index, line)| (index + 1, line.parse()))
         .collect()
   }

   /// Applies the event to the editor. Returns the upload started by a `submit`.
   pub fn apply(self, editor: &mut CardEditor) -> crate::Result<Option<PendingUpload>> {
      match self {
         Self::PointerDown(point) => editor.pointer_down(point),
         Self::PointerMove(point) => editor.pointer_move(point),
         Self::PointerUp => editor.pointer_up(),
         Self::PointerLeave => editor.pointer_leave(),
         Self::Blur => editor.blur(),
         Self::Background(color) => editor.set_background_color(&color)?,
         Self::Brush(color) => editor.set_brush_color(&color)?,
         Self::Size(size) => editor.set_brush_size(size),
         Self::Message(message) => editor.set_message(message),
         Self::AddMessage => {
            editor.add_message()?;
         }
         Self::Clear => editor.clear(),
         Self::Resize(width) => editor.resize(width),
         Self::Save(path) => {
            std::fs::write(&path, editor.to_jpeg()?)?;
            log::info!("card saved to {:?}", path);
         }
         Self::Submit => return editor.submit().map(Some),
      }
      Ok(None)
   }
}

impl FromStr for Event {
   type Err = Error;

   fn from_str(raw: &str) -> Result<Self, Error> {
      let invalid = || Error::InvalidEvent(raw.to_owned());
      let line = raw.trim();
      let (command, argument) = match line.split_once(' ') {
         Some((command, argument)) => (command, argument.trim()),
         None => (line, ""),
      };
      let point = || -> Result<Point, Error> {
         let mut coordinates = argument.split_whitespace().map(str::parse::<i32>);
         match (coordinates.next(), coordinates.next(), coordinates.next()) {
            (Some(Ok(x)), Some(Ok(y)), None) => Ok(Point::new(x, y)),
            _ => Err(invalid()),
         }
      };
      let no_argument = |event: Event| if argument.is_empty() { Ok(event) } else { Err(invalid()) };
      match command {
         "down" => Ok(Self::PointerDown(point()?)),
         "move" => Ok(Self::PointerMove(point()?)),
         "up" => no_argument(Self::PointerUp),
         "leave" => no_argument(Self::PointerLeave),
         "blur" => no_argument(Self::Blur),
         "background" if !argument.is_empty() => Ok(Self::Background(argument.to_owned())),
         "brush" if !argument.is_empty() => Ok(Self::Brush(argument.to_owned())),
         "size" => argument.parse().map(Self::Size).map_err(|_| invalid()),
         // Everything after the separating space is the message, spaces included.
         "message" => {
            let rest = raw.trim_start().strip_prefix("message").unwrap_or_default();
            Ok(Self::Message(rest.strip_prefix(' ').unwrap_or(rest).to_owned()))
         }
         "add-message" => no_argument(Self::AddMessage),
         "clear" => no_argument(Self::Clear),
         "resize" => argument.parse().map(Self::Resize).map_err(|_| invalid()),
         "save" if !argument.is_empty() => Ok(Self::Save(PathBuf::from(argument))),
         "submit" => no_argument(Self::Submit),
         _ => Err(invalid()),
      }
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;
   use crate::color::Color;
   use crate::config::UserConfig;
   use crate::upload::testing::RecordingUploader;

   #[test]
   fn parses_every_event() {
      let script = "\
         # comment\n\
         down 1 2\n\
         move 3 4\n\
         up\n\
         leave\n\
         blur\n\
         \n\
         background #ffcc00\n\
         brush #000000\n\
         size 2.5\n\
         message Happy  birthday!\n\
         add-message\n\
         clear\n\
         resize 640\n\
         save card.jpg\n\
         submit\n";
      let events: Vec<Event> =
         Event::parse_script(script).into_iter().map(|(_, event)| event.unwrap()).collect();
      assert_eq!(
         events,
         vec![
            Event::PointerDown(Point::new(1, 2)),
            Event::PointerMove(Point::new(3, 4)),
            Event::PointerUp,
            Event::PointerLeave,
            Event::Blur,
            Event::Background("#ffcc00".into()),
            Event::Brush("#000000".into()),
            Event::Size(2.5),
            Event::Message("Happy  birthday!".into()),
            Event::AddMessage,
            Event::Clear,
            Event::Resize(640),
            Event::Save(PathBuf::from("card.jpg")),
            Event::Submit,
         ]
      );
   }

   #[test]
   fn reports_line_numbers_of_bad_events() {
      let parsed = Event::parse_script("up\n\ndown 1\nfly away\nsize big\nup now");
      let bad: Vec<usize> =
         parsed.iter().filter(|(_, event)| event.is_err()).map(|(line, _)| *line).collect();
      assert_eq!(bad, vec![3, 4, 5, 6]);
   }

   #[test]
   fn empty_message_is_allowed() {
      assert_eq!("message".parse::<Event>().unwrap(), Event::Message(String::new()));
   }

   #[test]
   fn message_keeps_surrounding_spaces() {
      assert_eq!(
         "message  two spaces in, two out  ".parse::<Event>().unwrap(),
         Event::Message(" two spaces in, two out  ".into())
      );
   }

   #[test]
   fn applies_events_to_the_editor() {
      let uploader = RecordingUploader::default();
      let mut editor =
         CardEditor::new(&UserConfig::default(), 100, None, Box::new(uploader.clone()));
      for (_, event) in Event::parse_script("background #ff0000\nsize 3\ndown 1 1\nmove 5 5") {
         assert!(event.unwrap().apply(&mut editor).unwrap().is_none());
      }
      assert_eq!(editor.background_color(), Color::rgb(0xff, 0, 0));
      assert_eq!(editor.brush().size, 3.0);
      assert!(editor.is_drawing());

      assert!(Event::Submit.apply(&mut editor).unwrap().is_some());
      assert_eq!(uploader.forms.borrow().len(), 1);
      assert_eq!(editor.background_color(), Color::WHITE);
   }
}
