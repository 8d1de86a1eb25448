use crate::query::NgramQuery;
use crate::{Config, StatsClient};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Look up the corpus frequency of a word or phrase
    Freq {
        term: String,
        #[arg(short, long)]
        lexical_category: Option<String>,
    },
    /// Look up several terms with one batched query per n-gram order
    Frequencies {
        #[arg(required = true, num_args = 1..)]
        terms: Vec<String>,
    },
    /// List n-grams matching literal tokens or a contained word
    Ngrams {
        #[arg(short)]
        n: u32,
        #[arg(long)]
        tokens: Option<String>,
        #[arg(long)]
        contains: Option<String>,
        #[arg(long)]
        length: Option<usize>,
    },
    /// Pointwise mutual information of a word pair
    Pmi { word1: String, word2: String },
    /// List the distinct corpus spellings of a lemma
    Wordforms {
        lemma: String,
        #[arg(short, long)]
        lexical_category: Option<String>,
    },
    /// Score a word by its length and rarity
    Score { word: String },
}

pub async fn handle_command(
    command: Commands,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = StatsClient::from_config(config)?;

    match command {
        Commands::Freq {
            term,
            lexical_category,
        } => {
            let frequency = client
                .frequency_with_category(&term, lexical_category.as_deref())
                .await?;
            println!("{}: {}", term, frequency);
        }
        Commands::Frequencies { terms } => {
            let refs: Vec<&str> = terms.iter().map(String::as_str).collect();
            for (term, frequency) in client.frequencies(&refs).await? {
                println!("{}: {}", term, frequency);
            }
            println!("requests sent: {}", client.request_count());
        }
        Commands::Ngrams {
            n,
            tokens,
            contains,
            length,
        } => {
            let mut query = NgramQuery::new(n);
            if let Some(tokens) = tokens {
                query = query.with_tokens(tokens);
            }
            if let Some(contains) = contains {
                query = query.with_contains(contains);
            }
            if let Some(length) = length {
                query = query.with_length(length);
            }
            for entry in client.ngrams(&query).await? {
                println!("{}: {}", entry.tokens.join(" "), entry.frequency);
            }
        }
        Commands::Pmi { word1, word2 } => {
            let pmi = client.pmi(&word1, &word2).await?;
            println!("pmi({}, {}) = {:.4}", word1, word2, pmi);
        }
        Commands::Wordforms {
            lemma,
            lexical_category,
        } => {
            for form in client.wordforms(&lemma, lexical_category.as_deref()).await? {
                println!("{}", form);
            }
        }
        Commands::Score { word } => {
            let score = client.word_score(&word).await?;
            println!(
                "{}: score {:.2} (multiplier {}, normalized frequency {}, frequency {})",
                word, score.score, score.multiplier, score.normalized_frequency, score.frequency
            );
        }
    }
    Ok(())
}
