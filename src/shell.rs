//! Parsing of interactive shell input into user intents.

use crate::model::RecipeId;
use crate::session::SortKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SearchDish(String),
    AddIngredient(String),
    RemoveIngredient(String),
    SearchIngredients,
    SetFilters(Vec<String>),
    Sort(SortKey),
    NextPage,
    PreviousPage,
    ToggleFavorite(RecipeId),
    ShowRecipe(RecipeId),
    ShowFavorites,
    ShowRecent,
    ToggleTheme,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  dish <name>            search recipes by dish name
  add <ingredient>       add an ingredient
  remove <ingredient>    remove an ingredient
  ingredients            search by the added ingredients
  filters [a,b,...]      set dietary filters (empty clears them)
  sort <key>             sort results: popularity, time, health
  next | prev            change page
  fav <id>               toggle a favorite from the current results
  show <id>              show recipe details
  favorites              list favorites
  recent                 list recent searches
  theme                  toggle light/dark theme
  help                   show this help
  quit                   exit";

fn parse_id(arg: &str) -> Result<RecipeId, String> {
    arg.trim()
        .parse()
        .map_err(|_| format!("Expected a recipe id, got '{}'", arg.trim()))
}

/// Parse one input line; blank lines yield `Ok(None)`
pub fn parse_intent(line: &str) -> Result<Option<Intent>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };

    let intent = match command.to_lowercase().as_str() {
        "dish" | "search" => Intent::SearchDish(arg.to_string()),
        "add" => Intent::AddIngredient(arg.to_string()),
        "remove" | "rm" => Intent::RemoveIngredient(arg.to_string()),
        "ingredients" => Intent::SearchIngredients,
        "filters" | "filter" => Intent::SetFilters(
            arg.split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        "sort" => Intent::Sort(arg.parse()?),
        "next" | "n" => Intent::NextPage,
        "prev" | "previous" | "p" => Intent::PreviousPage,
        "fav" | "favorite" => Intent::ToggleFavorite(parse_id(arg)?),
        "show" => Intent::ShowRecipe(parse_id(arg)?),
        "favorites" | "favs" => Intent::ShowFavorites,
        "recent" => Intent::ShowRecent,
        "theme" => Intent::ToggleTheme,
        "help" | "?" => Intent::Help,
        "quit" | "exit" | "q" => Intent::Quit,
        other => return Err(format!("Unknown command '{}'. Type 'help' for commands.", other)),
    };

    Ok(Some(intent))
}
