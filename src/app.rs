//! Application facade wiring configuration, storage and the ledger store.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use toman_config::{default_base_dir, Config, ConfigManager};
use toman_core::{
    Clock, InclusionFilter, LedgerStore, StoreWarning, SystemClock, TransactionForm,
};
use toman_domain::{format_toman, Amount, DateRange, DayCalendar};
use toman_storage_json::JsonFileStore;
use tracing::info;
use uuid::Uuid;

use crate::{
    dashboard::{Dashboard, DashboardOptions},
    AppError,
};

pub struct LedgerApp {
    base_dir: PathBuf,
    config: Config,
    config_manager: ConfigManager,
    calendar: DayCalendar,
    store: LedgerStore<JsonFileStore>,
    clock: Box<dyn Clock>,
    filter: InclusionFilter,
}

impl LedgerApp {
    /// Opens the ledger under the default base directory.
    pub fn open_default() -> Result<Self, AppError> {
        Self::open(default_base_dir())
    }

    pub fn open(base_dir: PathBuf) -> Result<Self, AppError> {
        Self::open_with_clock(base_dir, Box::new(SystemClock))
    }

    pub fn open_with_clock(base_dir: PathBuf, clock: Box<dyn Clock>) -> Result<Self, AppError> {
        let config_manager = ConfigManager::with_base_dir(base_dir.clone())?;
        let config = config_manager.load()?;
        crate::init_with_filter(&config.log_filter);

        let calendar = config.calendar()?;
        let data_dir = config.resolve_data_dir(&base_dir);
        let backend = JsonFileStore::new(data_dir.clone())?;
        let store = LedgerStore::open(backend);
        info!(data_dir = %data_dir.display(), "ledger app ready");

        Ok(Self {
            base_dir,
            config,
            config_manager,
            calendar,
            store,
            clock,
            filter: InclusionFilter::new(),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Applies `change` to the configuration and saves it.
    pub fn update_config<F>(&mut self, change: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut Config),
    {
        let mut updated = self.config.clone();
        change(&mut updated);
        let calendar = updated.calendar()?;
        self.config_manager.save(&updated)?;
        self.config = updated;
        self.calendar = calendar;
        Ok(())
    }

    pub fn calendar(&self) -> &DayCalendar {
        &self.calendar
    }

    pub fn store(&self) -> &LedgerStore<JsonFileStore> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut LedgerStore<JsonFileStore> {
        &mut self.store
    }

    pub fn filter(&self) -> &InclusionFilter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut InclusionFilter {
        &mut self.filter
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today(&self.calendar)
    }

    /// The configured dashboard preset anchored at today.
    pub fn default_range(&self) -> DateRange {
        self.config.default_range.range(self.today())
    }

    pub fn submit(&mut self, form: &mut TransactionForm) -> Result<Uuid, AppError> {
        Ok(form.submit(&mut self.store, self.clock.as_ref())?)
    }

    pub fn instantiate_frequent(&mut self, id: Uuid) -> Result<Uuid, AppError> {
        Ok(self.store.instantiate_frequent(id, self.clock.as_ref())?)
    }

    pub fn dashboard(&self, range: DateRange) -> Dashboard {
        Dashboard::build(
            self.store.ledger(),
            range,
            DashboardOptions {
                today: self.today(),
                calendar: &self.calendar,
                filter: &self.filter,
                recent_limit: self.config.recent_limit,
                digits: self.config.digits,
            },
        )
    }

    pub fn format_amount(&self, amount: Amount) -> String {
        format_toman(amount, self.config.digits)
    }

    /// Drains persistence warnings for display.
    pub fn take_warnings(&mut self) -> Vec<StoreWarning> {
        self.store.take_warnings()
    }
}
