use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;

use cli_style::{get_styles, TableBuilder};
use song_recommender::config::{AppConfig, CliConfig, FileConfig};
use song_recommender::enrichment::{
    MetadataProvider, SpotifyClient, SpotifyCredentials, UnconfiguredProvider,
};
use song_recommender::recommend::{build_cards, RecommendationCard, Recommender};
use song_recommender::{load_dataset, Catalog};

use rustyline::{
    completion::Completer, highlight::Highlighter, history::FileHistory, validate::Validator,
    CompletionType, Config, Editor, Helper,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(styles=get_styles())]
struct CliArgs {
    /// Path to a TOML config file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory holding catalog.json and similarity.json.
    #[clap(long, value_parser = parse_path)]
    pub data_dir: Option<PathBuf>,

    #[clap(long, value_parser = parse_path)]
    pub catalog: Option<PathBuf>,

    #[clap(long, value_parser = parse_path)]
    pub similarity: Option<PathBuf>,

    /// How many songs to recommend for each request.
    #[clap(long, default_value_t = 5)]
    pub recommendations_count: usize,
}

#[derive(Parser)]
#[command(styles=get_styles(),name = "")]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Shows the songs most similar to the given one, with artwork and links.
    /// The title must match exactly, quotes are optional.
    Recommend {
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        song: Vec<String>,
    },

    /// Lists the catalog, optionally only titles containing the filter.
    Songs { filter: Option<String> },

    /// Shows the paths of the loaded data files.
    Where,

    /// Close this program.
    Exit,
}

enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

struct Session {
    recommender: Arc<Recommender>,
    provider: Arc<dyn MetadataProvider>,
    config: AppConfig,
}

fn print_cards(song: &str, cards: &[RecommendationCard]) {
    cli_style::print_section_header(&format!("Because you like {}", song));

    let mut table = TableBuilder::new(vec!["#", "Title", "Artist", "Score", "Listen"]);
    for (position, card) in cards.iter().enumerate() {
        table.add_row(vec![
            (position + 1).to_string(),
            card.title.clone(),
            card.artist.clone(),
            format!("{:.3}", card.score),
            card.listening_url.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table.print();

    // Every failed lookup carries the same kind of notice, one line is enough
    if let Some(notice) = cards.iter().find_map(|c| c.notice.as_deref()) {
        cli_style::print_warning(notice);
    }
    cli_style::print_section_footer();
}

fn execute_command(line: String, session: &Session) -> CommandExecutionResult {
    if line.trim().is_empty() {
        return CommandExecutionResult::Ok;
    }

    let args =
        shlex::split(&line).unwrap_or_else(|| line.split_whitespace().map(String::from).collect());

    let cli = InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)));

    match cli {
        Ok(cli) => match cli.command {
            InnerCommand::Recommend { song } => {
                let song = song.join(" ");
                match build_cards(
                    &session.recommender,
                    session.provider.as_ref(),
                    &session.config.placeholder_image_url,
                    &song,
                ) {
                    Ok(cards) => print_cards(&song, &cards),
                    Err(err) => return CommandExecutionResult::Error(err.to_string()),
                }
            }
            InnerCommand::Songs { filter } => {
                let catalog = session.recommender.catalog();
                let matches = filter_songs(catalog, filter.as_deref());
                if matches.is_empty() {
                    cli_style::print_empty_list("No songs match.");
                }
                for (index, title) in matches {
                    cli_style::print_list_item(index, title);
                }
            }
            InnerCommand::Where => {
                cli_style::print_key_value(
                    "Catalog",
                    &session.config.catalog_path.display().to_string(),
                );
                cli_style::print_key_value(
                    "Similarity",
                    &session.config.similarity_path.display().to_string(),
                );
            }
            InnerCommand::Exit => return CommandExecutionResult::Exit,
        },

        Err(e) => {
            if e.print().is_err() {
                println!("{}", e);
            }
        }
    }
    CommandExecutionResult::Ok
}

/// Case-insensitive substring match, keeps catalog positions.
fn filter_songs<'a>(catalog: &'a Catalog, filter: Option<&str>) -> Vec<(usize, &'a str)> {
    let needle = filter.map(str::to_lowercase);
    catalog
        .titles()
        .enumerate()
        .filter(|(_, title)| match &needle {
            Some(needle) => title.to_lowercase().contains(needle),
            None => true,
        })
        .collect()
}

fn quote_title(title: &str) -> String {
    shlex::try_quote(title)
        .map(|quoted| quoted.into_owned())
        .unwrap_or_else(|_| title.to_string())
}

#[derive(rustyline_derive::Hinter)]
struct RecommendHelper {
    commands_names: Vec<String>,
    titles: Vec<String>,
}

impl RecommendHelper {
    pub fn new(catalog: &Catalog) -> Self {
        let commands_names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| sc.get_name().to_string())
            .collect();

        RecommendHelper {
            commands_names,
            titles: catalog.titles().map(String::from).collect(),
        }
    }

    fn complete_line(&self, line: &str) -> (usize, Vec<String>) {
        let Some(space) = line.find(' ') else {
            let matches = self
                .commands_names
                .iter()
                .filter(|c| c.starts_with(line))
                .cloned()
                .collect();
            return (0, matches);
        };

        if &line[..space] != "recommend" {
            return (0, Vec::with_capacity(0));
        }

        let start = space + 1;
        let typed = line[start..].trim_start_matches(['"', '\'']);
        let matches = self
            .titles
            .iter()
            .filter(|t| t.starts_with(typed))
            .map(|t| quote_title(t))
            .collect();
        (start, matches)
    }
}

impl Completer for RecommendHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        Ok(self.complete_line(&line[..pos]))
    }
}

impl Highlighter for RecommendHelper {}
impl Validator for RecommendHelper {}
impl Helper for RecommendHelper {}

fn make_metadata_provider(config: &AppConfig) -> Result<(Arc<dyn MetadataProvider>, String)> {
    match SpotifyCredentials::from_env() {
        Ok(credentials) => {
            let client = SpotifyClient::new(credentials, &config.spotify)?;
            cli_style::print_success("Spotify credentials found.");
            Ok((Arc::new(client), format!("Spotify ({})", config.spotify.api_url)))
        }
        Err(missing) => {
            cli_style::print_warning(&missing.to_string());
            Ok((
                Arc::new(UnconfiguredProvider),
                "placeholder images only".to_string(),
            ))
        }
    }
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let cli_config = CliConfig {
        data_dir: cli_args.data_dir,
        catalog_path: cli_args.catalog,
        similarity_path: cli_args.similarity,
        recommendations_count: cli_args.recommendations_count,
        ..Default::default()
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    let dataset = load_dataset(&config.catalog_path, &config.similarity_path)?;
    let recommender = Arc::new(Recommender::with_count(
        dataset,
        config.recommendations_count,
    ));
    let (provider, enrichment) = make_metadata_provider(&config)?;

    cli_style::print_welcome(recommender.catalog().len(), &enrichment);

    let editor_config = Config::builder()
        .completion_type(CompletionType::List)
        .build();

    let mut rl = Editor::<RecommendHelper, FileHistory>::with_config(editor_config)?;
    rl.set_helper(Some(RecommendHelper::new(recommender.catalog())));

    let session = Session {
        recommender,
        provider,
        config,
    };
    let prompt = cli_style::get_prompt();

    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match execute_command(line, &session) {
                    CommandExecutionResult::Ok => {}
                    CommandExecutionResult::Exit => break,
                    CommandExecutionResult::Error(err) => {
                        cli_style::print_error(&err);
                        continue;
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("CTRL-D: exiting.");
                break;
            }
            Err(e) => {
                cli_style::print_error(&format!("{:?}", e));
                break;
            }
        }
    }

    cli_style::print_goodbye();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use song_recommender::Song;

    fn catalog() -> Catalog {
        Catalog::from_songs(vec![
            Song::new("Fix You", "Coldplay"),
            Song::new("Fade Into You", "Mazzy Star"),
            Song::new("Yellow", "Coldplay"),
        ])
    }

    #[test]
    fn completes_command_names() {
        let helper = RecommendHelper::new(&catalog());

        let (start, matches) = helper.complete_line("rec");
        assert_eq!(start, 0);
        assert_eq!(matches, vec!["recommend"]);
    }

    #[test]
    fn completes_titles_after_recommend() {
        let helper = RecommendHelper::new(&catalog());

        let (start, matches) = helper.complete_line("recommend F");
        assert_eq!(start, "recommend ".len());
        assert_eq!(matches, vec!["'Fix You'", "'Fade Into You'"]);

        let (_, matches) = helper.complete_line("recommend \"Fix");
        assert_eq!(matches, vec!["'Fix You'"]);

        let (_, matches) = helper.complete_line("recommend Yel");
        assert_eq!(matches, vec!["Yellow"]);
    }

    #[test]
    fn other_commands_have_no_argument_completion() {
        let helper = RecommendHelper::new(&catalog());
        let (_, matches) = helper.complete_line("songs F");
        assert!(matches.is_empty());
    }

    #[test]
    fn filters_songs_case_insensitively() {
        let catalog = catalog();

        assert_eq!(
            filter_songs(&catalog, Some("you")),
            vec![(0, "Fix You"), (1, "Fade Into You")]
        );
        assert_eq!(filter_songs(&catalog, None).len(), 3);
    }

    #[test]
    fn parses_unquoted_multi_word_titles() {
        let cli = InnerCli::try_parse_from([" ", "recommend", "Fix", "You"]).unwrap();
        match cli.command {
            InnerCommand::Recommend { song } => assert_eq!(song.join(" "), "Fix You"),
            _ => panic!("Expected recommend"),
        }
    }
}
