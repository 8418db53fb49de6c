//! Shared filter/query flags and the offline `erp query` command.

use anyhow::{Context as _, Result};
use clap::Args;

use erp_client::{build_path, compose};
use erp_query::{QueryOptions, SearchCriteria, SortSpec};

/// Flags that become `SearchCriteria` and `QueryOptions`.
#[derive(Args, Debug, Default, Clone)]
pub struct QueryArgs {
    /// Search criteria as JSON, e.g. '{"status":1,"price":{"gte":100}}'.
    #[arg(long = "where")]
    pub filter: Option<String>,

    /// Projection, comma-separated.
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Sort: FIELD[,FIELD...][,desc].
    #[arg(long)]
    pub sort: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    #[arg(long, allow_negative_numbers = true)]
    pub offset: Option<i64>,

    /// Raw filter expression, grouped and ANDed before --where.
    #[arg(long)]
    pub q: Option<String>,

    /// Ask the server for `totalCount`.
    #[arg(long)]
    pub count: bool,

    #[arg(long = "expand-level")]
    pub expand_level: Option<String>,
}

impl QueryArgs {
    pub fn criteria(&self) -> Result<Option<SearchCriteria>> {
        self.filter
            .as_deref()
            .map(|json| serde_json::from_str(json).context("--where must be a JSON object"))
            .transpose()
    }

    pub fn options(&self) -> Result<QueryOptions> {
        let mut options = QueryOptions::new().fields(self.fields.iter().cloned()).count(self.count);
        if let Some(sort) = &self.sort {
            options = options.sort(sort.parse::<SortSpec>()?);
        }
        if let Some(limit) = self.limit {
            options = options.limit(limit);
        }
        if let Some(offset) = self.offset {
            options = options.offset(offset);
        }
        if let Some(q) = &self.q {
            options = options.q(q.clone());
        }
        if let Some(level) = &self.expand_level {
            options = options.expand_level(level.clone());
        }
        Ok(options)
    }

    /// Compiled query string, criteria folded into `q`.
    pub fn compile(&self) -> Result<String> {
        let criteria = self.criteria()?;
        let options = self.options()?;
        Ok(compose(criteria.as_ref(), Some(&options)).to_query_string())
    }
}

/// Print the compiled query, or the full request path when `path` is given.
pub fn run(path: Option<&str>, args: &QueryArgs) -> Result<()> {
    let query = args.compile()?;
    match path {
        Some(path) => println!("{}", build_path(path, &[], &query)),
        None => println!("{}", query),
    }
    Ok(())
}
