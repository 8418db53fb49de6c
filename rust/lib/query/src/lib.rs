//! Filter and query-string compilers for the ERP REST API.
//!
//! Two pure functions sit between typed caller input and the wire:
//!
//! - [`compile_filter`] turns a [`SearchCriteria`] into a predicate in the
//!   provider's OData-like grammar (`CODE eq 'ABC' and STATUS eq 1`);
//! - [`compile_query`] turns [`QueryOptions`] into a canonical query string
//!   (`limit=10&offset=0&sort=CODE`), embedding a filter as `q`.
//!
//! Both are stateless and never fail.
//!
//! # Usage
//!
//! ```ignore
//! use erp_query::{compile_filter, OperatorObject, QueryOptions, SearchCriteria, SortSpec};
//!
//! let criteria = SearchCriteria::new()
//!     .with("status", 1)
//!     .with("price", OperatorObject::new().gte(100).lte(500));
//! let mut options = QueryOptions::new().limit(10).sort(SortSpec::by("CODE"));
//! options.q = compile_filter(&criteria);
//! let query = options.to_query_string();
//! ```

pub mod column;
pub mod criteria;
pub mod encode;
pub mod filter;
pub mod options;

pub use column::column_name;
pub use criteria::{FieldValue, Operand, Operator, OperatorObject, Scalar, SearchCriteria};
pub use encode::{encode_component, encode_list};
pub use filter::{build_query, compile_filter, literal, wildcard_search};
pub use options::{compile_query, ParseSortError, QueryOptions, SortDirection, SortSpec};
