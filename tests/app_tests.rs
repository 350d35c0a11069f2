mod common;

use std::fs;

use chrono::NaiveDate;
use toman_ledger::{
    config::ConfigManager,
    core::{CheckState, ItemDraft, TransactionDraft, TransactionForm},
    domain::{
        Amount, Category, CategoryKind, DateRange, DigitStyle, FrequentTransaction, Item,
        RangePreset, Theme, TransactionType,
    },
    AppError, LedgerApp,
};

fn seed(app: &mut LedgerApp) {
    let store = app.store_mut();
    store
        .add_category(Category::new("Salary", CategoryKind::Income))
        .expect("salary");
    store
        .add_category(Category::new("Food", CategoryKind::Expense))
        .expect("food");
    store
        .add_category(Category::new("Transport", CategoryKind::Expense))
        .expect("transport");
}

#[test]
fn ledger_state_survives_reopen() {
    let base = common::temp_base();
    {
        let mut app = LedgerApp::open_with_clock(base.clone(), Box::new(common::fixed_clock()))
            .expect("open app");
        seed(&mut app);
        let mut form = TransactionForm::new(TransactionType::Income);
        form.category = "Salary".into();
        form.income_label = "March".into();
        form.total_amount = Amount::new(5_000_000);
        app.submit(&mut form).expect("submit income");
        app.store_mut().set_initial_balance(Amount::new(1_000_000));
        app.store_mut().set_theme(Theme::Ocean);
        assert!(app.take_warnings().is_empty());
    }

    let app = LedgerApp::open_with_clock(base.clone(), Box::new(common::fixed_clock()))
        .expect("reopen app");
    assert_eq!(app.store().transactions().len(), 1);
    assert_eq!(app.store().current_balance(), Amount::new(6_000_000));
    assert_eq!(app.store().theme(), Theme::Ocean);
    assert!(base.join("data").join("transactions.json").exists());
}

#[test]
fn default_range_follows_config_and_clock() {
    let mut app = common::setup_test_app();
    let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
    assert_eq!(app.today(), today);
    assert_eq!(
        app.default_range(),
        DateRange::between(NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(), today)
    );

    app.update_config(|cfg| cfg.default_range = RangePreset::ThisYear)
        .expect("update config");
    assert_eq!(
        app.default_range().start,
        NaiveDate::from_ymd_opt(2024, 1, 1)
    );

    let saved = ConfigManager::with_base_dir(app.base_dir().to_path_buf())
        .expect("manager")
        .load()
        .expect("load");
    assert_eq!(saved.default_range, RangePreset::ThisYear);
}

#[test]
fn invalid_offset_is_rejected_and_not_saved() {
    let mut app = common::setup_test_app();
    let err = app
        .update_config(|cfg| cfg.utc_offset_minutes = 10_000)
        .expect_err("offset out of range");
    assert!(matches!(err, AppError::Config(_)), "unexpected error: {err:?}");
    assert_eq!(app.config().utc_offset_minutes, 0);
}

#[test]
fn dashboard_honors_exclusions_and_digits() {
    let mut app = common::setup_test_app();
    seed(&mut app);
    let clock = common::fixed_clock();
    app.store_mut()
        .submit(
            &TransactionDraft::cost(
                vec![Item::new("Bread", Amount::new(100_000), 1)],
                Amount::new(100_000),
                "Food",
            ),
            &clock,
        )
        .expect("food");
    app.store_mut()
        .submit(
            &TransactionDraft::cost(
                vec![Item::new("Bus", Amount::new(25_000), 2)],
                Amount::new(50_000),
                "Transport",
            ),
            &clock,
        )
        .expect("transport");

    let today = app.today();
    let range = DateRange::between(today, today);
    assert_eq!(app.dashboard(range).series.expenses[0].y, Some(150.0));

    let transactions = app.store().transactions().to_vec();
    app.filter_mut().set_category("Food", false, &transactions);
    let dashboard = app.dashboard(range);
    assert_eq!(dashboard.series.expenses[0].y, Some(50.0));
    assert_eq!(dashboard.expense_categories.len(), 2);
    assert_eq!(
        app.filter().category_state("Food", &transactions),
        CheckState::Unchecked
    );

    app.update_config(|cfg| cfg.digits = DigitStyle::Persian)
        .expect("update digits");
    assert_eq!(app.format_amount(Amount::new(150_000)), "۱۵۰ تومان");
}

#[test]
fn frequent_instance_uses_app_clock() {
    let mut app = common::setup_test_app();
    seed(&mut app);
    let template_id = app
        .store_mut()
        .add_frequent(FrequentTransaction::new(
            "Lunch",
            TransactionType::Cost,
            Amount::new(80_000),
            vec![Item::new("Lunch", Amount::new(80_000), 1)],
            "Food",
        ))
        .expect("add template");

    let txn_id = app.instantiate_frequent(template_id).expect("instantiate");
    let txn = app
        .store()
        .transactions()
        .iter()
        .find(|txn| txn.id == txn_id)
        .expect("instance exists");
    assert_eq!(txn.date, common::fixed_clock().0);
}

#[test]
fn unwritable_data_dir_surfaces_warnings() {
    let mut app = common::setup_test_app();
    let data_dir = app.base_dir().join("data");
    fs::remove_dir_all(&data_dir).expect("remove data dir");
    fs::write(&data_dir, "not a directory").expect("block data dir");

    app.store_mut().set_theme(Theme::Dark);
    assert_eq!(app.store().theme(), Theme::Dark);
    let warnings = app.take_warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].key, "theme");

    let mut form = TransactionForm::new(TransactionType::Cost);
    let err = form
        .add_item(&ItemDraft::new("Tea", Amount::ZERO, 1))
        .expect_err("zero price");
    assert!(err.to_string().contains("price"));
}
