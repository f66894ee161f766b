/// Operator authentication against configured accounts
pub mod auth;

/// Entry Builder: validated sale and expense entries
pub mod builder;

/// CSV export of ledger entries
pub mod export;

/// Textual price parsing and money rounding
pub mod price;

/// Query Engine: filtered views and monthly totals
pub mod query;

/// Receipt Formatter
pub mod receipt;

/// Authenticated session tying the components together
pub mod session;

pub use auth::{Authenticator, ConfiguredAuthenticator, Operator};
pub use builder::{EntryDraft, ItemSelection, build_entry};
pub use query::{FilteredView, MonthlyTotal, QueryFilter, distinct_values, monthly_totals, query};
pub use receipt::{ReceiptFields, format_receipt};
pub use session::Session;
