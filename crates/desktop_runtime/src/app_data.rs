//! Latest view data of each data-bearing app.
//!
//! `windowOpened` replaces an app's data wholesale; `appUpdate` merges only the fields it carries.

use desktop_app_contract::{
    AppData, AppKind, AppUpdate, BusinessData, FinanceData, HealthcareData, WelfareData,
};

#[derive(Debug, Clone, Default, PartialEq)]
/// One data slot per data-bearing app; `None` until the app first receives data.
pub struct AppDataStore {
    /// Finance view data.
    pub finance: Option<FinanceData>,
    /// Business view data.
    pub business: Option<BusinessData>,
    /// Healthcare view data.
    pub healthcare: Option<HealthcareData>,
    /// Welfare view data.
    pub welfare: Option<WelfareData>,
}

impl AppDataStore {
    /// Stores `data` in place of whatever its app held before.
    pub fn replace(&mut self, data: AppData) {
        match data {
            AppData::Finance(data) => self.finance = Some(data),
            AppData::Business(data) => self.business = Some(data),
            AppData::Healthcare(data) => self.healthcare = Some(data),
            AppData::Welfare(data) => self.welfare = Some(data),
        }
    }

    /// Parses `raw` as the full data document of `kind` and stores it.
    ///
    /// Returns `Ok(false)` for kinds without view data. On error the previous data is kept.
    ///
    /// # Errors
    ///
    /// Fails when `raw` does not parse as the kind's data type.
    pub fn replace_from_json(
        &mut self,
        kind: AppKind,
        raw: &str,
    ) -> Result<bool, serde_json::Error> {
        match AppData::parse(kind, raw)? {
            Some(data) => {
                self.replace(data);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Shallow-merges `update` onto its app's data, starting from defaults if none was loaded.
    pub fn apply_update(&mut self, update: AppUpdate) {
        match update {
            AppUpdate::Finance(update) => {
                update.merge_into(self.finance.get_or_insert_with(Default::default))
            }
            AppUpdate::Business(update) => {
                update.merge_into(self.business.get_or_insert_with(Default::default))
            }
            AppUpdate::Healthcare(update) => {
                update.merge_into(self.healthcare.get_or_insert_with(Default::default))
            }
            AppUpdate::Welfare(update) => {
                update.merge_into(self.welfare.get_or_insert_with(Default::default))
            }
        }
    }

    /// Returns a snapshot of the data held for `kind`.
    pub fn get(&self, kind: AppKind) -> Option<AppData> {
        match kind {
            AppKind::Finance => self.finance.clone().map(AppData::Finance),
            AppKind::Business => self.business.clone().map(AppData::Business),
            AppKind::Healthcare => self.healthcare.clone().map(AppData::Healthcare),
            AppKind::Welfare => self.welfare.clone().map(AppData::Welfare),
            AppKind::Email => None,
        }
    }
}
