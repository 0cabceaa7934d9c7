use crate::error::CoreError;
use crate::navigation::TabLookup;
use crate::routes::{RouteTable, DEFAULT_EDIT_LISTING_ROUTE};
use crate::tabs::MarketplaceTabs;

/// Default tab sequence when `MARKETPLACE_TABS` is not set.
pub const DEFAULT_MARKETPLACE_TABS: &str = "details,pricing,delivery,location,availability,photos";

/// Wizard configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    /// Ordered steps enabled for this marketplace.
    pub marketplace_tabs: MarketplaceTabs,
    /// Handling of submissions for steps missing from `marketplace_tabs`.
    pub tab_lookup: TabLookup,
    /// Path pattern of the edit-listing page.
    pub edit_listing_route: String,
}

impl WizardConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var              | Default                                                 |
    /// |----------------------|---------------------------------------------------------|
    /// | `MARKETPLACE_TABS`   | `details,pricing,delivery,location,availability,photos` |
    /// | `WIZARD_STRICT_TABS` | `false`                                                 |
    /// | `EDIT_LISTING_ROUTE` | `/l/{slug}/{type}/{id}/{tab}`                           |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let marketplace_tabs = MarketplaceTabs::parse_list(
            &lookup("MARKETPLACE_TABS").unwrap_or_else(|| DEFAULT_MARKETPLACE_TABS.into()),
        )?;

        let strict = match lookup("WIZARD_STRICT_TABS").as_deref().map(str::trim) {
            None | Some("") => false,
            Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => true,
            Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => false,
            Some(v) => {
                return Err(CoreError::Config(format!(
                    "WIZARD_STRICT_TABS must be true or false, got '{v}'"
                )))
            }
        };
        let tab_lookup = if strict {
            TabLookup::Strict
        } else {
            TabLookup::Lenient
        };

        let edit_listing_route =
            lookup("EDIT_LISTING_ROUTE").unwrap_or_else(|| DEFAULT_EDIT_LISTING_ROUTE.into());
        // Fail at load time rather than on the first redirect.
        RouteTable::new(edit_listing_route.clone())?;

        Ok(Self {
            marketplace_tabs,
            tab_lookup,
            edit_listing_route,
        })
    }

    pub fn route_table(&self) -> Result<RouteTable, CoreError> {
        RouteTable::new(self.edit_listing_route.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
