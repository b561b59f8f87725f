use std::fmt::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bpaf::Bpaf;
use category_catalog::{
    Category,
    CategoryId,
    CategoryQuery,
    CategorySource,
    CategorySourceClient,
    HttpCategorySource,
    MockCategorySource,
};
use indoc::indoc;
use tracing::{debug, info, instrument};

use crate::config::Config;

static DESCRIPTION: &str = indoc! {"
    Query the category catalog.

    Categories are fetched once per invocation and answered from memory."
};

fn vec_len<T>(x: Vec<T>) -> usize {
    Vec::len(&x)
}

#[derive(Bpaf, Clone, Copy, Debug)]
pub enum Verbosity {
    Verbose(
        /// Increase logging verbosity
        ///
        /// Invoke multiple times for increasing detail.
        #[bpaf(short('v'), long("verbose"), req_flag(()), many, map(vec_len))]
        usize,
    ),

    /// Silence logs except for errors
    #[bpaf(short, long)]
    Quiet,
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::Verbose(0)
    }
}

#[derive(Debug, Bpaf)]
#[bpaf(options, descr(DESCRIPTION))]
pub struct CatalogQueryArgs {
    #[bpaf(external, fallback(Default::default()))]
    pub verbosity: Verbosity,

    /// Read configuration from this file on top of the XDG config files
    #[bpaf(long, argument("PATH"))]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[bpaf(long)]
    pub json: bool,

    #[bpaf(external(command))]
    pub command: Command,
}

#[derive(Debug, Bpaf, Clone)]
pub enum Command {
    /// Look up a category by its id
    #[bpaf(command)]
    Id {
        #[bpaf(positional("ID"))]
        id: CategoryId,
    },

    /// Resolve a path to its most specific category
    #[bpaf(command)]
    Path {
        #[bpaf(positional("PATH"))]
        path: String,
    },

    /// List the children of a category, ordered by name
    ///
    /// Lists the root categories if no parent is given.
    #[bpaf(command)]
    Children {
        #[bpaf(positional("PARENT_ID"))]
        parent_id: Option<CategoryId>,
    },

    /// Load the catalog and report its size
    #[bpaf(command)]
    Warm,
}

impl CatalogQueryArgs {
    #[instrument(name = "catalog-query", skip_all, fields(json = self.json))]
    pub async fn handle(self, config: Config) -> Result<()> {
        let source = category_source(&config)?;
        let query = CategoryQuery::new(source, &config.query)
            .context("Could not set up category ordering")?;
        debug!(locale = query.collator().locale(), "ordering category names");

        let output = run_command(&query, self.command, self.json).await?;
        print!("{output}");
        Ok(())
    }
}

/// Select the category source, preferring canned responses if configured.
fn category_source(config: &Config) -> Result<CategorySourceClient> {
    if let Some(mock_file) = &config.mock_file {
        debug!(?mock_file, "using mock category source");
        let source = MockCategorySource::from_file(mock_file)
            .with_context(|| format!("Could not load mock responses from {mock_file:?}"))?;
        return Ok(source.into());
    }

    let source = HttpCategorySource::new(config.source.clone())
        .context("Could not create category client")?;
    debug!(catalog_url = source.catalog_url(), "using catalog API");
    Ok(source.into())
}

/// Run a single command and render its result.
async fn run_command<S: CategorySource>(
    query: &CategoryQuery<S>,
    command: Command,
    json: bool,
) -> Result<String> {
    let output = match command {
        Command::Id { id } => {
            let category = query.find_by_id(id).await?;
            if category.is_none() {
                info!(id, "no category with this id");
            }
            render(category.as_slice(), json)?
        },
        Command::Path { path } => {
            let category = query.resolve_by_path(&path).await?;
            if category.is_none() {
                info!(%path, "no category matches this path");
            }
            render(category.as_slice(), json)?
        },
        Command::Children { parent_id } => {
            let children = query.children_of(parent_id).await?;
            render(&children, json)?
        },
        Command::Warm => {
            let categories = query.ensure_loaded().await?;
            if json {
                format!("{}\n", serde_json::json!({ "count": categories.len() }))
            } else {
                format!("loaded {} categories\n", categories.len())
            }
        },
    };
    Ok(output)
}

fn render(categories: &[Category], json: bool) -> Result<String> {
    if json {
        let rendered = serde_json::to_string_pretty(categories)?;
        return Ok(format!("{rendered}\n"));
    }

    let mut out = String::new();
    for category in categories {
        writeln!(
            out,
            "{}\t{}\t{}",
            category.category_id, category.url, category.name
        )?;
    }
    Ok(out)
}
