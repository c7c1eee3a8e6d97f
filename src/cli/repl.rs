//! Interactive session commands.
//!
//! One line of input maps to one [`ReplCommand`]. Parsing is separate from
//! execution so it can be tested without a terminal.

use crate::catalog::CatalogKind;
use crate::planner::TripRequest;

/// Help text shown by `help` and on unknown input.
pub const REPL_HELP: &str = "\
Commands:
  generate <days> <transport> <start point...>   plan a new route
  add hotel|food <id>                            add a catalog item to the route
  remove hotel|food <id>                         remove an added item
  show                                           show the route and added items
  selections                                     show added items only
  catalog [destinations|hotels|foods]            list the catalog
  history                                        show recent generations
  cancel                                         abandon the running generation
  help                                           show this help
  quit                                           leave the session

Transport: public-transport, private-car, motorcycle, bicycle";

/// A parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Plan a new route.
    Generate(TripRequest),
    /// Add a catalog item.
    Add {
        /// Hotel or food.
        kind: CatalogKind,
        /// Catalog id.
        id: u32,
    },
    /// Remove an added item.
    Remove {
        /// Hotel or food.
        kind: CatalogKind,
        /// Catalog id.
        id: u32,
    },
    /// Show route and selections.
    Show,
    /// Show selections only.
    Selections,
    /// List the catalog.
    Catalog(Option<CatalogKind>),
    /// Show history.
    History,
    /// Abandon the in-flight generation.
    Cancel,
    /// Show help.
    Help,
    /// Leave the session.
    Quit,
    /// Blank line.
    Empty,
}

impl ReplCommand {
    /// Parses one input line.
    ///
    /// # Errors
    ///
    /// Returns a message describing what was wrong with the line.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(Self::Empty);
        };

        match command.to_ascii_lowercase().as_str() {
            "generate" | "gen" | "g" => {
                let days = words
                    .next()
                    .ok_or("usage: generate <days> <transport> <start point...>")?;
                let transport = words.next().ok_or("missing transport mode")?;
                let start: Vec<&str> = words.collect();
                Ok(Self::Generate(TripRequest::new(start.join(" "), transport, days)))
            }
            "add" | "remove" | "rm" => {
                let kind = parse_selectable_kind(words.next())?;
                let id = words
                    .next()
                    .ok_or("missing id")?
                    .parse::<u32>()
                    .map_err(|_| String::from("id must be a positive whole number"))?;
                if command.eq_ignore_ascii_case("add") {
                    Ok(Self::Add { kind, id })
                } else {
                    Ok(Self::Remove { kind, id })
                }
            }
            "show" | "route" => Ok(Self::Show),
            "selections" | "added" => Ok(Self::Selections),
            "catalog" | "list" => match words.next() {
                Some(kind) => kind.parse().map(|k| Self::Catalog(Some(k))),
                None => Ok(Self::Catalog(None)),
            },
            "history" => Ok(Self::History),
            "cancel" | "abandon" => Ok(Self::Cancel),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(format!("unknown command '{other}'; type 'help'")),
        }
    }
}

fn parse_selectable_kind(word: Option<&str>) -> Result<CatalogKind, String> {
    match word.map(str::parse::<CatalogKind>) {
        Some(Ok(kind @ (CatalogKind::Hotel | CatalogKind::Food))) => Ok(kind),
        Some(Ok(CatalogKind::Destination)) => {
            Err(String::from("destinations cannot be added; use hotel or food"))
        }
        Some(Err(e)) => Err(e),
        None => Err(String::from("expected hotel or food")),
    }
}
