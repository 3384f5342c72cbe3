//! Console command parser
//!
//! Turns typed lines into [`CommandPayload`]s. Arguments can follow the
//! keyword on the same line (`save level1.dat`); anything missing is asked
//! for one line at a time. Input that doesn't parse abandons the command
//! without writing anything.
//!
//! While a prompt is open every line is argument text, keywords included:
//! `load` followed by `quit` loads a file named `quit`.

use log::debug;

use super::{CommandPayload, EntityEdit};

pub const HELP_TEXT: &str = "\
Commands:
help - shows a list of commands
load - loads a map file
unload - creates a new map
save - saves the current map
loadEntities - loads an entity file (replaces all entities)
saveEntities - saves the entities
editEntity - edits an entity
quit - saves the map and exits";

/// What the console should do after a line was fed in
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleStep {
    /// Nothing to show, nothing to send
    Idle,
    /// Print this prompt and wait for the next line
    Prompt(&'static str),
    /// Print [`HELP_TEXT`]
    Help,
    /// A complete command, ready for the mailbox
    Command(CommandPayload),
}

/// Keywords that take arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Load,
    LoadEntities,
    Save,
    SaveEntities,
    Unload,
    EditEntity,
}

const FILE_PROMPTS: &[&str] = &["Enter a filename: "];
const UNLOAD_PROMPTS: &[&str] = &["Enter the width of the map: ", "Enter the height of the map: "];
const EDIT_PROMPTS: &[&str] = &[
    "Which entity do you want to edit: ",
    "Delete entity (Y/N): ",
    "scaleX: ",
    "scaleY: ",
    "z: ",
    "health (-1 for none): ",
    "direction (-1 for none): ",
];

impl Keyword {
    fn parse(word: &str) -> Option<Keyword> {
        match word {
            "load" => Some(Keyword::Load),
            "loadEntities" | "loadSprites" => Some(Keyword::LoadEntities),
            "save" => Some(Keyword::Save),
            "saveEntities" | "saveSprites" => Some(Keyword::SaveEntities),
            "unload" => Some(Keyword::Unload),
            "editEntity" | "editSprite" => Some(Keyword::EditEntity),
            _ => None,
        }
    }

    fn prompts(&self) -> &'static [&'static str] {
        match self {
            Keyword::Load | Keyword::LoadEntities | Keyword::Save | Keyword::SaveEntities => {
                FILE_PROMPTS
            }
            Keyword::Unload => UNLOAD_PROMPTS,
            Keyword::EditEntity => EDIT_PROMPTS,
        }
    }

    /// Build the payload once every argument is in
    fn build(&self, args: &[String]) -> Option<CommandPayload> {
        let payload = match self {
            Keyword::Load => CommandPayload::Load { file_name: args[0].clone() },
            Keyword::LoadEntities => CommandPayload::LoadEntities { file_name: args[0].clone() },
            Keyword::Save => CommandPayload::Save { file_name: args[0].clone() },
            Keyword::SaveEntities => CommandPayload::SaveEntities { file_name: args[0].clone() },
            Keyword::Unload => {
                let width: i32 = args[0].parse().ok()?;
                let height: i32 = args[1].parse().ok()?;
                if width < 1 || height < 1 {
                    return None;
                }
                CommandPayload::Unload { width, height }
            }
            Keyword::EditEntity => CommandPayload::EditEntity(EntityEdit {
                identifier: args[0].clone(),
                delete: args[1] == "Y" || args[1] == "y",
                scale_x: args[2].parse().ok()?,
                scale_y: args[3].parse().ok()?,
                z: args[4].parse().ok()?,
                health: args[5].parse().ok()?,
                direction: args[6].parse().ok()?,
            }),
        };
        Some(payload)
    }
}

#[derive(Debug)]
struct PendingCommand {
    keyword: Keyword,
    args: Vec<String>,
}

/// Line-at-a-time command parser
#[derive(Debug, Default)]
pub struct ConsoleParser {
    pending: Option<PendingCommand>,
}

impl ConsoleParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the parser is in the middle of collecting arguments
    pub fn is_prompting(&self) -> bool {
        self.pending.is_some()
    }

    /// Feed one input line
    pub fn feed(&mut self, line: &str) -> ConsoleStep {
        let line = line.trim();

        if let Some(mut pending) = self.pending.take() {
            if line.is_empty() {
                let prompt = pending.keyword.prompts()[pending.args.len()];
                self.pending = Some(pending);
                return ConsoleStep::Prompt(prompt);
            }
            pending.args.push(line.to_string());
            return self.advance(pending);
        }

        let mut words = line.split_whitespace();
        let Some(word) = words.next() else {
            return ConsoleStep::Idle;
        };

        match word {
            "help" => return ConsoleStep::Help,
            "quit" => return ConsoleStep::Command(CommandPayload::Quit),
            _ => {}
        }

        let Some(keyword) = Keyword::parse(word) else {
            debug!("Unknown console command: {}", word);
            return ConsoleStep::Idle;
        };

        let args: Vec<String> = words.map(str::to_string).collect();
        if args.len() > keyword.prompts().len() {
            debug!("Too many arguments for {}", word);
            return ConsoleStep::Idle;
        }
        self.advance(PendingCommand { keyword, args })
    }

    fn advance(&mut self, pending: PendingCommand) -> ConsoleStep {
        let prompts = pending.keyword.prompts();
        if pending.args.len() < prompts.len() {
            let prompt = prompts[pending.args.len()];
            self.pending = Some(pending);
            return ConsoleStep::Prompt(prompt);
        }

        match pending.keyword.build(&pending.args) {
            Some(payload) => ConsoleStep::Command(payload),
            None => {
                debug!("Malformed arguments for {:?}: {:?}", pending.keyword, pending.args);
                ConsoleStep::Idle
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(parser: &mut ConsoleParser, lines: &[&str]) -> ConsoleStep {
        let mut last = ConsoleStep::Idle;
        for line in lines {
            last = parser.feed(line);
        }
        last
    }

    #[test]
    fn test_inline_arguments() {
        let mut parser = ConsoleParser::new();
        assert_eq!(
            parser.feed("save level1.dat"),
            ConsoleStep::Command(CommandPayload::Save { file_name: "level1.dat".into() })
        );
        assert_eq!(
            parser.feed("unload 10 20"),
            ConsoleStep::Command(CommandPayload::Unload { width: 10, height: 20 })
        );
        assert!(!parser.is_prompting());
    }

    #[test]
    fn test_prompted_arguments() {
        let mut parser = ConsoleParser::new();
        assert_eq!(parser.feed("unload"), ConsoleStep::Prompt("Enter the width of the map: "));
        assert!(parser.is_prompting());
        assert_eq!(parser.feed("8"), ConsoleStep::Prompt("Enter the height of the map: "));
        assert_eq!(
            parser.feed("4"),
            ConsoleStep::Command(CommandPayload::Unload { width: 8, height: 4 })
        );
    }

    #[test]
    fn test_empty_line_repeats_prompt() {
        let mut parser = ConsoleParser::new();
        assert_eq!(parser.feed("load"), ConsoleStep::Prompt("Enter a filename: "));
        assert_eq!(parser.feed("   "), ConsoleStep::Prompt("Enter a filename: "));
        assert_eq!(
            parser.feed("map.dat"),
            ConsoleStep::Command(CommandPayload::Load { file_name: "map.dat".into() })
        );
    }

    #[test]
    fn test_edit_entity() {
        let mut parser = ConsoleParser::new();
        let step = feed_all(&mut parser, &["editSprite", "3", "n", "2", "0.5", "10", "-1", "90"]);
        assert_eq!(
            step,
            ConsoleStep::Command(CommandPayload::EditEntity(EntityEdit {
                identifier: "3".into(),
                delete: false,
                scale_x: 2.0,
                scale_y: 0.5,
                z: 10.0,
                health: -1,
                direction: 90.0,
            }))
        );

        let step = parser.feed("editEntity 7 Y 1 1 0 -1 -1");
        let ConsoleStep::Command(CommandPayload::EditEntity(edit)) = step else {
            panic!("expected edit, got {:?}", step);
        };
        assert_eq!(edit.identifier, "7");
        assert!(edit.delete);
    }

    #[test]
    fn test_aliases() {
        let mut parser = ConsoleParser::new();
        assert_eq!(
            parser.feed("saveSprites e.dat"),
            ConsoleStep::Command(CommandPayload::SaveEntities { file_name: "e.dat".into() })
        );
        assert_eq!(
            parser.feed("loadEntities e.dat"),
            ConsoleStep::Command(CommandPayload::LoadEntities { file_name: "e.dat".into() })
        );
    }

    #[test]
    fn test_malformed_input_produces_nothing() {
        let mut parser = ConsoleParser::new();
        assert_eq!(parser.feed("bogus"), ConsoleStep::Idle);
        assert_eq!(parser.feed(""), ConsoleStep::Idle);
        assert_eq!(parser.feed("unload ten 5"), ConsoleStep::Idle);
        assert_eq!(parser.feed("unload 0 5"), ConsoleStep::Idle);
        assert_eq!(parser.feed("save a.dat b.dat"), ConsoleStep::Idle);
        assert_eq!(
            feed_all(&mut parser, &["editEntity", "1", "n", "wide"]),
            ConsoleStep::Prompt("scaleY: ")
        );
        assert_eq!(feed_all(&mut parser, &["1", "0", "-1", "-1"]), ConsoleStep::Idle);
        assert!(!parser.is_prompting());
    }

    #[test]
    fn test_keywords_are_plain_text_while_prompting() {
        let mut parser = ConsoleParser::new();
        assert_eq!(parser.feed("load"), ConsoleStep::Prompt("Enter a filename: "));
        assert_eq!(
            parser.feed("quit"),
            ConsoleStep::Command(CommandPayload::Load { file_name: "quit".into() })
        );
        assert_eq!(parser.feed("save"), ConsoleStep::Prompt("Enter a filename: "));
        assert_eq!(
            parser.feed("help"),
            ConsoleStep::Command(CommandPayload::Save { file_name: "help".into() })
        );
    }

    #[test]
    fn test_help_and_quit() {
        let mut parser = ConsoleParser::new();
        assert_eq!(parser.feed("help"), ConsoleStep::Help);
        assert_eq!(parser.feed("quit"), ConsoleStep::Command(CommandPayload::Quit));
    }
}
