use std::sync::Arc;

use secrecy::SecretString;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use cream_crafter::config::AppConfig;
use cream_crafter::error::{ConfigError, Error};
use cream_crafter::generator::RecipeGenerator;
use cream_crafter::llm::{GeminiClient, GeminiConfig};
use cream_crafter::recipe::{FlavorAxis, Recipe, UserPreferences, intensity_label};
use cream_crafter::session::{ConfirmPrompt, RemoveOutcome, SaveOutcome, Session, View};
use cream_crafter::store::FileStore;
use cream_crafter::walkthrough::{WalkView, Walkthrough};

/// Shown for every generation failure; the variants only differ in the logs.
const GENERATION_FAILURE_NOTICE: &str = "The assistant lost focus. Please try again.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let api_key = match std::env::var("GEMINI_API_KEY") {
        Ok(key) => key,
        Err(_) => {
            eprintln!("Error: GEMINI_API_KEY not set");
            eprintln!("  export GEMINI_API_KEY=...");
            return Err(ConfigError::MissingEnvVar("GEMINI_API_KEY".into()).into());
        }
    };

    let config = AppConfig::from_env();

    eprintln!("🍦 CreamCrafter v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.model);
    eprintln!("   Data: {}", config.data_dir.display());

    let store = Arc::new(FileStore::new(&config.data_dir));
    store.ensure_dirs().await?;

    let backend = Arc::new(GeminiClient::new(GeminiConfig {
        api_key: SecretString::from(api_key),
        model: config.model.clone(),
        base_url: config.api_base.clone(),
    }));

    let mut session = Session::load(store, RecipeGenerator::new(backend)).await;
    eprintln!("   Saved recipes: {}\n", session.archive().len());

    let input = ReplInput::new();
    loop {
        let keep_going = match session.view() {
            View::Create => create_view(&mut session, &input).await,
            View::Archives => archives_view(&mut session, &input).await,
        };
        if !keep_going {
            break;
        }
    }

    eprintln!("Bye!");
    Ok(())
}

/// Shared stdin line reader. Also answers removal confirmations.
struct ReplInput {
    lines: tokio::sync::Mutex<Lines<BufReader<Stdin>>>,
}

impl ReplInput {
    fn new() -> Self {
        Self {
            lines: tokio::sync::Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    /// Prompt and read one trimmed line. `None` on EOF.
    async fn read(&self, prompt: &str) -> Option<String> {
        eprint!("{prompt}");
        let mut lines = self.lines.lock().await;
        match lines.next_line().await {
            Ok(Some(line)) => Some(line.trim().to_string()),
            Ok(None) => None,
            Err(e) => {
                tracing::error!("Error reading stdin: {}", e);
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl ConfirmPrompt for ReplInput {
    async fn confirm(&self, message: &str) -> bool {
        match self.read(&format!("⚠️  {message} (y/n) > ")).await {
            Some(answer) => matches!(answer.to_lowercase().as_str(), "y" | "yes"),
            None => false,
        }
    }
}

/// Authoring view: the preferences form when nothing is displayed, the
/// recipe card commands otherwise. Returns false to quit.
async fn create_view(session: &mut Session, input: &ReplInput) -> bool {
    if session.current().is_none() {
        let Some(prefs) = read_preferences(input).await else {
            return false;
        };
        eprintln!("⏳ Inventing a flavor...");
        match session.submit(&prefs).await {
            Ok(recipe) => println!("\n{}", render_card(recipe)),
            Err(Error::Validation(e)) => eprintln!("⚠️  {e}"),
            Err(e) => {
                tracing::warn!(error = %e, "Generation attempt failed");
                eprintln!("⚠️  {GENERATION_FAILURE_NOTICE}");
            }
        }
        return true;
    }

    let save_label = if session.is_current_saved() {
        "saved"
    } else {
        "save"
    };
    let Some(command) = input
        .read(&format!(
            "[walk / {save_label} / share / delete / back / archives / quit] > "
        ))
        .await
    else {
        return false;
    };

    match command.as_str() {
        "walk" => {
            if let Some(walk) = session.begin_walkthrough() {
                run_walkthrough(walk, input).await;
            }
        }
        "save" => {
            if let Some(recipe) = session.current().cloned() {
                match session.save(recipe).await {
                    SaveOutcome::Saved => eprintln!("✅ Saved to your archive"),
                    SaveOutcome::AlreadySaved => eprintln!("✅ Already in your archive"),
                }
            }
        }
        "share" => {
            if let Some(recipe) = session.current() {
                println!("\n{}\n", recipe.share_text());
            }
        }
        "delete" => {
            if let Some(id) = session.current().map(|r| r.id.clone()) {
                match session.remove(&id, input).await {
                    RemoveOutcome::Removed { .. } => eprintln!("🗑️  Removed"),
                    RemoveOutcome::Declined => {}
                    RemoveOutcome::NotFound => eprintln!("Not in the archive yet"),
                }
            }
        }
        "back" => session.clear_displayed(),
        "archives" => session.show_archives(),
        "quit" => return false,
        "" => {}
        other => eprintln!("Unknown command: {other}"),
    }
    true
}

/// Archive listing view. Returns false to quit.
async fn archives_view(session: &mut Session, input: &ReplInput) -> bool {
    println!("\n── Your archive ({}) ──", session.archive().len());
    if session.archive().is_empty() {
        println!("  Nothing saved yet. Go create your first recipe!");
    } else {
        for (idx, recipe) in session.archive().iter().enumerate() {
            println!(
                "  {}. {} ({})",
                idx + 1,
                recipe.recipe_name,
                recipe.timestamp.format("%Y-%m-%d")
            );
        }
    }

    let Some(command) = input
        .read("[open <n> / delete <n> / create / quit] > ")
        .await
    else {
        return false;
    };

    if let Some(rest) = command.strip_prefix("open ") {
        let selected = parse_index(rest)
            .and_then(|i| session.archive().nth(i))
            .cloned();
        match selected {
            Some(recipe) => session.select(recipe),
            None => eprintln!("No such entry"),
        }
    } else if let Some(rest) = command.strip_prefix("delete ") {
        let id = parse_index(rest)
            .and_then(|i| session.archive().nth(i))
            .map(|r| r.id.clone());
        match id {
            Some(id) => {
                if let RemoveOutcome::Removed { .. } = session.remove(&id, input).await {
                    eprintln!("🗑️  Removed");
                }
            }
            None => eprintln!("No such entry"),
        }
    } else {
        match command.as_str() {
            "create" => session.show_create(),
            "quit" => return false,
            "" => {}
            other => eprintln!("Unknown command: {other}"),
        }
    }
    true
}

/// 1-based display index to archive position.
fn parse_index(s: &str) -> Option<usize> {
    s.trim().parse::<usize>().ok().and_then(|n| n.checked_sub(1))
}

/// Interactive preferences form. `None` on EOF.
async fn read_preferences(input: &ReplInput) -> Option<UserPreferences> {
    eprintln!("── New recipe ──");
    let mut prefs = UserPreferences::default();
    prefs.ingredients = input
        .read("1. Ingredients on hand (e.g. strawberries, milk, sugar) > ")
        .await?;

    eprintln!("2. Flavor intensities, 0-100 (Enter keeps the default)");
    for axis in FlavorAxis::ALL {
        let current = prefs.level(axis);
        let line = input
            .read(&format!(
                "   {} [{}, {}] > ",
                axis.label(),
                current,
                intensity_label(current)
            ))
            .await?;
        if line.is_empty() {
            continue;
        }
        match line.parse::<u8>() {
            Ok(level) if level <= 100 => prefs.set_level(axis, level),
            _ => eprintln!("   Keeping {} at {current}", axis.label()),
        }
    }

    prefs.texture = input
        .read("3. Texture you imagine (blank for smooth and fine) > ")
        .await?;
    Some(prefs)
}

/// Render the recipe card.
fn render_card(recipe: &Recipe) -> String {
    let mut card = String::new();
    card.push_str(&format!("🍦 {}\n", recipe.recipe_name));
    card.push_str(&format!("{}\n\n", recipe.summary));
    card.push_str("Ingredients:\n");
    for ing in &recipe.ingredients {
        card.push_str(&format!("  {}: {}\n", ing.item, ing.amount));
    }
    card.push_str("\nSteps:\n");
    for (idx, step) in recipe.steps.iter().enumerate() {
        card.push_str(&format!("  {}. {}\n", idx + 1, step));
    }
    card.push_str(&format!("\n💡 Tip: {}\n", recipe.texture_tips));
    card.push_str(&format!("✨ Pairing: {}\n", recipe.pairing_suggestions));
    let p = &recipe.flavor_profile;
    card.push_str(&format!(
        "Profile: sweetness {:.0}, acidity {:.0}, complexity {:.0}, creaminess {:.0}, innovation {:.0}\n",
        p.sweetness, p.acidity, p.complexity, p.creaminess, p.innovation
    ));
    card
}

/// Step-by-step walkthrough loop. `next` at completion exits, matching the
/// primary button being repurposed rather than disabled.
async fn run_walkthrough(mut walk: Walkthrough, input: &ReplInput) {
    loop {
        render_walk_view(&walk);
        let prompt = if walk.is_preparation() {
            "[start / exit] > "
        } else if walk.is_completion() {
            "[done / back / exit] > "
        } else {
            "[next / back / exit] > "
        };
        let Some(command) = input.read(prompt).await else {
            return;
        };
        match command.as_str() {
            "" | "next" | "start" | "done" => {
                if walk.is_completion() {
                    return;
                }
                walk.advance();
            }
            "back" => walk.retreat(),
            "exit" => return,
            other => eprintln!("Unknown command: {other}"),
        }
    }
}

fn render_walk_view(walk: &Walkthrough) {
    let percent = (walk.progress() * 100.0).round() as u32;
    println!("\n[{percent:>3}%]");
    match walk.view() {
        WalkView::Preparation { ingredients } => {
            println!("Ready with your ingredients?");
            for ing in ingredients {
                println!("  {}: {}", ing.item, ing.amount);
            }
        }
        WalkView::Step {
            number,
            total,
            text,
            texture_tip,
        } => {
            println!("Step {number}/{total}");
            println!("  {text}");
            if let Some(tip) = texture_tip {
                println!("  💡 Tip: {tip}");
            }
        }
        WalkView::Completion {
            pairing_suggestions,
        } => {
            println!("🥳 All done! Taste your masterpiece.");
            println!("  ✨ Pairing: {pairing_suggestions}");
        }
    }
}
