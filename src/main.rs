use clap::{Parser, Subcommand};
use log::{debug, error};
use recipe_finder::config::load_config;
use recipe_finder::shell::{parse_intent, Intent, HELP};
use recipe_finder::view::{RecipeCard, RecipeDetailView, ResultsView};
use recipe_finder::{
    open_session, DraftAutosave, FinderError, Notice, SearchOutcome, SearchSession, Severity,
    SortKey,
};
use std::path::PathBuf;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Find recipes by dish name or by the ingredients you have
#[derive(Parser)]
#[command(name = "recipe-finder")]
#[command(version)]
#[command(about = "Search recipes, page through results and keep favorites", long_about = None)]
struct Cli {
    /// Configuration file name (extension optional)
    #[arg(short, long, default_value = "config")]
    config: String,

    /// Storage file for favorites, recent searches and preferences
    #[arg(long)]
    storage: Option<PathBuf>,

    /// Without a command an interactive shell is started
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search recipes by dish name
    Dish {
        /// Dish name, e.g. "chicken curry"
        #[arg(required = true)]
        query: Vec<String>,

        /// Dietary filter (repeatable), e.g. --diet vegan
        #[arg(long = "diet")]
        diets: Vec<String>,

        /// Sort results: popularity, time or health
        #[arg(short, long)]
        sort: Option<SortKey>,
    },

    /// Search recipes by ingredients
    Ingredients {
        /// Ingredients to use, e.g. egg flour milk
        #[arg(required = true)]
        items: Vec<String>,

        /// Sort results: popularity, time or health
        #[arg(short, long)]
        sort: Option<SortKey>,
    },

    /// List favorite recipes
    Favorites,

    /// List recent searches
    Recent,

    /// Show or toggle the theme preference
    Theme {
        #[arg(long)]
        toggle: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = load_config(&cli.config)?;
    if let Some(path) = cli.storage {
        config.storage.path = path;
    }
    debug!("{:?}", config.search);

    let mut session = match open_session(&config) {
        Ok(session) => session,
        Err(e) => {
            error!("Unable to start: {}", e);
            return Err(e.into());
        }
    };

    match cli.command {
        Some(Commands::Dish { query, diets, sort }) => {
            session.set_filters(diets);
            let result = session.search_by_dish(&query.join(" ")).await;
            report_search(&mut session, result, sort);
        }
        Some(Commands::Ingredients { items, sort }) => {
            for item in &items {
                session.add_ingredient(item);
            }
            let result = session.search_by_ingredients().await;
            report_search(&mut session, result, sort);
        }
        Some(Commands::Favorites) => print_favorites(&session),
        Some(Commands::Recent) => print_recent(&session),
        Some(Commands::Theme { toggle }) => {
            if toggle {
                session.toggle_theme()?;
            }
            println!("Theme: {}", session.theme());
        }
        None => run_shell(&mut session, &mut DraftAutosave::new(config.draft.quiet_period())).await?,
    }

    Ok(())
}

async fn run_shell(
    session: &mut SearchSession,
    draft: &mut DraftAutosave,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("recipe-finder ({} theme). Type 'help' for commands.", session.theme());
    if let Some(text) = session.restored_draft() {
        println!("Restored draft search: {}", text);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let due = draft.due_at();
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::time::sleep_until(
                due.map(tokio::time::Instant::from_std)
                    .unwrap_or_else(tokio::time::Instant::now),
            ), if due.is_some() => {
                if let Err(e) = session.flush_draft(draft, Instant::now()) {
                    print_notice(&Notice::from(&e));
                }
                continue;
            }
        };

        let Some(line) = line else {
            break;
        };

        let intent = match parse_intent(&line) {
            Ok(Some(intent)) => intent,
            Ok(None) => continue,
            Err(message) => {
                print_notice(&Notice::new(message, Severity::Error));
                continue;
            }
        };

        match &intent {
            Intent::SearchDish(text) | Intent::AddIngredient(text) => {
                draft.edited(text.clone(), Instant::now())
            }
            _ => {}
        }

        if !handle_intent(session, intent).await {
            break;
        }
    }

    Ok(())
}

/// Apply one intent; returns `false` when the shell should exit
async fn handle_intent(session: &mut SearchSession, intent: Intent) -> bool {
    match intent {
        Intent::SearchDish(query) => {
            let result = session.search_by_dish(&query).await;
            report_search(session, result, None);
        }
        Intent::AddIngredient(text) => {
            if !session.add_ingredient(&text) {
                print_notice(&Notice::new(
                    "Ingredient is empty or already added",
                    Severity::Info,
                ));
            }
            print_ingredients(session);
        }
        Intent::RemoveIngredient(text) => {
            session.remove_ingredient(&text);
            print_ingredients(session);
        }
        Intent::SearchIngredients => {
            let result = session.search_by_ingredients().await;
            report_search(session, result, None);
        }
        Intent::SetFilters(tags) => {
            session.set_filters(tags);
            if session.filters().is_empty() {
                println!("Filters cleared");
            } else {
                println!("Filters: {}", session.filters().join(", "));
            }
        }
        Intent::Sort(key) => {
            session.sort_results(key);
            print_results(&session.results_view());
        }
        Intent::NextPage => match session.next_page().await {
            Ok(None) => println!("Search for something first"),
            Ok(Some(outcome)) => report_search(session, Ok(outcome), None),
            Err(e) => report_search(session, Err(e), None),
        },
        Intent::PreviousPage => match session.previous_page().await {
            Ok(None) => println!("Already on the first page"),
            Ok(Some(outcome)) => report_search(session, Ok(outcome), None),
            Err(e) => report_search(session, Err(e), None),
        },
        Intent::ToggleFavorite(id) => match session.toggle_favorite(id) {
            Ok(Some(is_favorite)) => {
                print_notice(&Notice::favorite_toggled(is_favorite));
                println!("Favorites: {}", session.favorites().len());
            }
            Ok(None) => println!("Recipe {} is not in the current results", id),
            Err(e) => print_notice(&Notice::from(&e)),
        },
        Intent::ShowRecipe(id) => match session.recipe_details(id).await {
            Some(view) => print_detail(&view),
            None => println!("Recipe {} is not in the current results or favorites", id),
        },
        Intent::ShowFavorites => print_favorites(session),
        Intent::ShowRecent => print_recent(session),
        Intent::ToggleTheme => match session.toggle_theme() {
            Ok(theme) => println!("Theme: {}", theme),
            Err(e) => print_notice(&Notice::from(&e)),
        },
        Intent::Help => println!("{}", HELP),
        Intent::Quit => return false,
    }
    true
}

fn report_search(
    session: &mut SearchSession,
    result: Result<SearchOutcome, FinderError>,
    sort: Option<SortKey>,
) {
    match result {
        Ok(_) => {
            if let Some(key) = sort {
                session.sort_results(key);
            }
            print_results(&session.results_view());
        }
        Err(e) => print_notice(&Notice::from(&e)),
    }
}

fn print_notice(notice: &Notice) {
    match notice.severity {
        Severity::Error | Severity::Warning => eprintln!("[{}] {}", notice.severity, notice.message),
        Severity::Success | Severity::Info => println!("[{}] {}", notice.severity, notice.message),
    }
}

fn print_card(card: &RecipeCard) {
    let heart = if card.is_favorite { "♥" } else { "♡" };
    println!("{} [{}] {}", heart, card.id, card.title);
    println!("    ⏱ {}  ❤ {}", card.ready_in, card.health_score);
    println!("    {}", card.summary);
}

fn print_results(view: &ResultsView) {
    println!("\n== {} ==", view.title);
    for card in &view.cards {
        print_card(card);
    }
    let mut nav = vec![view.pagination.label()];
    if view.pagination.has_previous {
        nav.push("'prev' for previous".to_string());
    }
    if view.pagination.has_next {
        nav.push("'next' for more".to_string());
    }
    println!("-- {} --", nav.join(" | "));
}

fn print_detail(view: &RecipeDetailView) {
    let heart = if view.is_favorite { "♥" } else { "♡" };
    println!("\n{} {} [{}]", heart, view.title, view.id);
    println!("{}", view.image);
    println!(
        "Ready in {}  Servings: {}  Health score: {}",
        view.ready_in, view.servings, view.health_score
    );
    println!("\n{}", view.summary);

    println!("\nIngredients:");
    for line in &view.ingredients {
        println!("  - {}", line);
    }

    println!("\nInstructions:");
    for (number, step) in view.instructions.iter().enumerate() {
        println!("  {}. {}", number + 1, step);
    }

    println!("\nNutrition:");
    if view.nutrients.is_empty() {
        println!("  Nutrition information not available.");
    }
    for (amount, label) in &view.nutrients {
        println!("  {} {}", amount, label);
    }
}

fn print_ingredients(session: &SearchSession) {
    if session.ingredients().is_empty() {
        println!("No ingredients added");
    } else {
        println!("Ingredients: {}", session.ingredients().join(", "));
    }
}

fn print_favorites(session: &SearchSession) {
    let cards = session.favorite_cards();
    if cards.is_empty() {
        println!("No favorites yet");
        return;
    }
    println!("Favorites ({}):", cards.len());
    for card in &cards {
        print_card(card);
    }
}

fn print_recent(session: &SearchSession) {
    if session.recent_searches().is_empty() {
        println!("No recent searches");
        return;
    }
    for (index, query) in session.recent_searches().iter().enumerate() {
        println!("{:>2}. {}", index + 1, query);
    }
}
