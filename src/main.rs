//! CLI interface for the RAG store

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rag_store::{
    DimensionPolicy, EmbeddingProvider, HashEmbedder, Metadata, RagError, SharedVectorStore,
    StoreConfig, VectorStore, DEFAULT_TOP_N,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

type DynEmbedder = Box<dyn EmbeddingProvider + Send + Sync>;

#[derive(Parser)]
#[command(name = "ragstore")]
#[command(about = "Store notes as embeddings and retrieve them by similarity", long_about = None)]
struct Cli {
    /// Path of the collection file
    #[arg(long, env = "RAG_STORE_PATH", default_value = "data/rag_store.json")]
    store_path: String,

    /// Embedding backend
    #[arg(long, value_enum, default_value = "hash")]
    embedder: EmbedderKind,

    /// Output dimension of the hash embedder
    #[arg(long, default_value_t = HashEmbedder::DEFAULT_DIMENSIONS)]
    dimensions: usize,

    /// API key for the Gemini embedder
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: Option<String>,

    /// How to treat stored embeddings whose dimension differs from the query
    #[arg(long, value_enum, default_value = "skip")]
    on_dimension_mismatch: MismatchArg,

    /// Log output format
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy)]
enum EmbedderKind {
    Hash,
    Gemini,
}

#[derive(ValueEnum, Clone, Copy)]
enum MismatchArg {
    Skip,
    Fail,
}

impl From<MismatchArg> for DimensionPolicy {
    fn from(arg: MismatchArg) -> Self {
        match arg {
            MismatchArg::Skip => DimensionPolicy::Skip,
            MismatchArg::Fail => DimensionPolicy::Fail,
        }
    }
}

#[derive(ValueEnum, Clone, Copy)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed and store a piece of text
    Store {
        /// Text to store
        text: String,
        /// Metadata entry as key=value (repeatable)
        #[arg(short, long = "meta", value_parser = parse_key_value)]
        meta: Vec<(String, String)>,
        /// Metadata as a JSON object, merged before --meta entries
        #[arg(long)]
        meta_json: Option<String>,
    },
    /// Retrieve the most similar stored texts
    Retrieve {
        /// Query text
        query: String,
        /// Number of results to return
        #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// List stored documents
    List,
    /// Start the HTTP API server
    Serve {
        /// Address to bind to
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: String,
    },
}

fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got `{s}`"))
}

fn build_metadata(meta: Vec<(String, String)>, meta_json: Option<String>) -> Result<Metadata> {
    let mut metadata = match meta_json {
        Some(raw) => serde_json::from_str::<Metadata>(&raw).context("--meta-json must be a JSON object")?,
        None => Metadata::new(),
    };
    for (key, value) in meta {
        metadata.insert(key, serde_json::Value::String(value));
    }
    Ok(metadata)
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rag_store=info,ragstore=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn build_embedder(cli: &Cli) -> Result<DynEmbedder> {
    match cli.embedder {
        EmbedderKind::Hash => Ok(Box::new(HashEmbedder::new(cli.dimensions))),
        EmbedderKind::Gemini => gemini_embedder(cli.gemini_api_key.as_deref()),
    }
}

#[cfg(feature = "gemini")]
fn gemini_embedder(api_key: Option<&str>) -> Result<DynEmbedder> {
    let key = api_key.context("--gemini-api-key or GEMINI_API_KEY is required for the gemini embedder")?;
    Ok(Box::new(rag_store::GeminiEmbedder::new(key)?))
}

#[cfg(not(feature = "gemini"))]
fn gemini_embedder(_api_key: Option<&str>) -> Result<DynEmbedder> {
    bail!("this binary was built without the `gemini` feature")
}

fn open_store(config: StoreConfig, embedder: DynEmbedder) -> VectorStore<DynEmbedder> {
    let store = VectorStore::open(config, embedder);
    if let Some(w) = store.startup_warning() {
        warn!(warning = %w, "starting with an empty collection");
    }
    store
}

fn store_text(
    mut store: VectorStore<DynEmbedder>,
    text: String,
    meta: Vec<(String, String)>,
    meta_json: Option<String>,
) -> Result<()> {
    let metadata = build_metadata(meta, meta_json)?;
    match store.store(text, metadata) {
        Ok(id) => println!("Stored document with ID: {}", id),
        Err(RagError::PersistenceFailure { id, path, reason }) => {
            bail!("document {} was not saved to {}: {}", id, path.display(), reason)
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn retrieve(store: &VectorStore<DynEmbedder>, query: &str, top_n: usize, json: bool) -> Result<()> {
    let results = store.try_retrieve(query, top_n)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else if results.is_empty() {
        println!("No results found");
    } else {
        println!("Top {} results:", results.len());
        for (i, result) in results.iter().enumerate() {
            println!("{}. {} (score: {:.4})", i + 1, result.text, result.score);
            if !result.metadata.is_empty() {
                println!("   {}", serde_json::Value::Object(result.metadata.clone()));
            }
        }
    }
    Ok(())
}

fn list(store: &VectorStore<DynEmbedder>) {
    let docs = store.documents();
    if docs.is_empty() {
        println!("No documents in store");
        return;
    }
    println!("Documents ({} total):", docs.len());
    for doc in docs {
        println!("  - {} [{} dims] {}", doc.id, doc.embedding.dimension(), doc.text);
    }
}

// The runtime is only needed for the server. Blocking embedders must be
// built outside of it.
fn serve(config: StoreConfig, embedder: DynEmbedder, addr: &str) -> Result<()> {
    let store = SharedVectorStore::open(config, embedder);
    if let Some(w) = store.read()?.startup_warning() {
        warn!(warning = %w, "serving an empty collection");
    }
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(rag_store::server::start(addr, store))?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    let config = StoreConfig::new(&cli.store_path)
        .with_dimension_policy(cli.on_dimension_mismatch.into());
    let embedder = build_embedder(&cli)?;

    match cli.command {
        Commands::Serve { addr } => serve(config, embedder, &addr),
        Commands::Store { text, meta, meta_json } => store_text(open_store(config, embedder), text, meta, meta_json),
        Commands::Retrieve { query, top_n, json } => retrieve(&open_store(config, embedder), &query, top_n, json),
        Commands::List => {
            list(&open_store(config, embedder));
            Ok(())
        }
    }
}
