use std::cell::Cell;

use crate::api::ExpenseApi;
use crate::model::{AnalyticsSnapshot, ExpenseForm};
use crate::state::{DashboardAction, ServiceStatus};
use crate::toast::ToastKind;

pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this expense?";
pub const REFRESHED_MESSAGE: &str = "Dashboard refreshed";

/// Where the controller sends its results: view state, toasts and the
/// confirmation prompt.
pub trait DashboardEffects {
    fn apply(&self, action: DashboardAction);

    fn notify(&self, kind: ToastKind, message: String);

    fn confirm(&self, message: &str) -> bool;
}

/// Sequence number for one view. A response is applied only if no newer
/// request for the same view was issued while it was in flight.
#[derive(Debug, Default)]
struct RequestToken(Cell<u64>);

impl RequestToken {
    fn issue(&self) -> u64 {
        let next = self.0.get().wrapping_add(1);
        self.0.set(next);
        next
    }

    fn is_current(&self, token: u64) -> bool {
        self.0.get() == token
    }
}

/// Drives the dashboard: one instance per page, shared with event handlers
/// through `Rc`.
pub struct Dashboard<A, E> {
    api: A,
    effects: E,
    min_prediction_chars: usize,
    list_token: RequestToken,
    analytics_token: RequestToken,
    prediction_token: RequestToken,
}

impl<A, E> Dashboard<A, E>
where
    A: ExpenseApi,
    E: DashboardEffects,
{
    pub fn new(api: A, effects: E, min_prediction_chars: usize) -> Self {
        Self {
            api,
            effects,
            min_prediction_chars,
            list_token: RequestToken::default(),
            analytics_token: RequestToken::default(),
            prediction_token: RequestToken::default(),
        }
    }

    /// Initial page load.
    pub async fn start(&self) {
        log::info!("Loading dashboard data");
        tokio::join!(
            self.load_expenses(),
            self.refresh_analytics(),
            self.load_categories(),
            self.check_health()
        );
    }

    /// Re-fetches the list and all analytics views.
    pub async fn refresh(&self) {
        tokio::join!(self.load_expenses(), self.refresh_analytics());
    }

    /// Refresh button.
    pub async fn reload(&self) {
        log::info!("Manual refresh requested");
        self.refresh().await;
        self.effects.notify(ToastKind::Info, REFRESHED_MESSAGE.to_string());
    }

    pub async fn submit(&self, form: ExpenseForm) {
        let expense = match form.validate() {
            Ok(expense) => expense,
            Err(err) => {
                log::debug!("Rejected expense form: {}", err);
                self.effects.notify(ToastKind::Error, err.to_string());
                return;
            }
        };

        self.effects.apply(DashboardAction::SetLoading(true));
        let result = self.api.create_expense(&expense).await;
        self.effects.apply(DashboardAction::SetLoading(false));

        match result {
            Ok(created) => {
                log::info!(
                    "Created expense {} (server predicted {:?} at {:?}): {}",
                    created.id,
                    created.predicted_category,
                    created.confidence,
                    created.message.as_deref().unwrap_or("no message")
                );
                self.effects
                    .notify(ToastKind::Success, "Expense added successfully!".to_string());
                // A prediction for the submitted description must not land on the empty form.
                self.prediction_token.issue();
                self.effects.apply(DashboardAction::ResetForm);
                self.refresh().await;
            }
            Err(err) => {
                log::error!("Error adding expense: {}", err);
                self.effects.notify(
                    ToastKind::Error,
                    format!("Failed to add expense: {}", err.user_message()),
                );
            }
        }
    }

    /// Runs after the debounce quiet period with the description as typed.
    pub async fn predict(&self, description: &str) {
        let description = description.trim();
        if description.chars().count() < self.min_prediction_chars {
            // Also invalidates any prediction still in flight.
            self.prediction_token.issue();
            self.effects.apply(DashboardAction::HidePrediction);
            return;
        }

        let token = self.prediction_token.issue();
        let result = self.api.predict(description).await;
        if !self.prediction_token.is_current(token) {
            log::debug!("Dropping stale prediction for {:?}", description);
            return;
        }

        match result {
            Ok(prediction) => self.effects.apply(DashboardAction::ShowPrediction(prediction)),
            Err(err) => {
                log::warn!("Error getting prediction: {}", err);
                self.effects.apply(DashboardAction::HidePrediction);
            }
        }
    }

    pub async fn load_expenses(&self) {
        let token = self.list_token.issue();
        let result = self.api.list_expenses().await;
        if !self.list_token.is_current(token) {
            log::debug!("Dropping stale expense list");
            return;
        }

        match result {
            Ok(expenses) => {
                log::debug!("Loaded {} expenses", expenses.len());
                self.effects.apply(DashboardAction::ExpensesLoaded(expenses));
            }
            Err(err) => {
                log::error!("Error loading expenses: {}", err);
                self.effects.apply(DashboardAction::ExpensesFailed);
                self.effects
                    .notify(ToastKind::Error, "Failed to load expenses".to_string());
            }
        }
    }

    pub async fn delete(&self, id: i64) {
        if !self.effects.confirm(DELETE_CONFIRMATION) {
            log::debug!("Delete of expense {} cancelled", id);
            return;
        }

        self.effects.apply(DashboardAction::SetLoading(true));
        let result = self.api.delete_expense(id).await;
        self.effects.apply(DashboardAction::SetLoading(false));

        match result {
            Ok(()) => {
                self.effects
                    .notify(ToastKind::Success, "Expense deleted successfully".to_string());
                self.refresh().await;
            }
            Err(err) => {
                log::error!("Error deleting expense {}: {}", id, err);
                self.effects
                    .notify(ToastKind::Error, "Failed to delete expense".to_string());
            }
        }
    }

    /// All three analytics requests run concurrently; the views change only
    /// if every one of them succeeds.
    pub async fn refresh_analytics(&self) {
        let token = self.analytics_token.issue();
        let result = tokio::try_join!(
            self.api.category_totals(),
            self.api.total_spending(),
            self.api.monthly_totals()
        );
        if !self.analytics_token.is_current(token) {
            log::debug!("Dropping stale analytics");
            return;
        }

        match result {
            Ok((categories, total, monthly)) => {
                self.effects
                    .apply(DashboardAction::AnalyticsLoaded(AnalyticsSnapshot {
                        categories,
                        total: total.amount(),
                        monthly,
                    }));
            }
            Err(err) => {
                log::error!("Error loading analytics: {}", err);
                self.effects
                    .notify(ToastKind::Error, "Failed to load analytics".to_string());
            }
        }
    }

    pub async fn load_categories(&self) {
        match self.api.categories().await {
            Ok(categories) => self.effects.apply(DashboardAction::CategoriesLoaded(categories)),
            Err(err) => log::warn!("Keeping default categories: {}", err),
        }
    }

    pub async fn check_health(&self) {
        let status = match self.api.health().await {
            Ok(health) => {
                log::debug!(
                    "Service {} (model loaded: {}, database connected: {})",
                    health.status,
                    health.model_loaded,
                    health.database_connected
                );
                ServiceStatus::from_health(&health)
            }
            Err(err) => {
                log::warn!("Health check failed: {}", err);
                ServiceStatus::Offline
            }
        };
        self.effects.apply(DashboardAction::StatusChecked(status));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use async_trait::async_trait;
    use yew::Reducible;

    use super::*;
    use crate::error::ApiError;
    use crate::format::format_currency;
    use crate::model::{
        CategoryTotal, CreatedExpense, Expense, Health, MonthlyTotal, NewExpense, Prediction,
        TotalSpending,
    };
    use crate::state::DashboardState;

    /// In-memory expense service that records every call.
    #[derive(Default)]
    struct FakeApi {
        expenses: RefCell<Vec<Expense>>,
        calls: RefCell<Vec<&'static str>>,
        fail: RefCell<Vec<&'static str>>,
        /// Scheduler yields before each successive prediction returns.
        prediction_delays: RefCell<VecDeque<usize>>,
        /// Same, for list loads.
        list_delays: RefCell<VecDeque<usize>>,
        /// Same, for the category totals of each analytics refresh.
        analytics_delays: RefCell<VecDeque<usize>>,
    }

    async fn pause(delays: &RefCell<VecDeque<usize>>) {
        let delay = delays.borrow_mut().pop_front().unwrap_or(0);
        for _ in 0..delay {
            tokio::task::yield_now().await;
        }
    }

    fn sample_expense(id: i64, amount: f64) -> Expense {
        Expense {
            id,
            description: format!("Expense {}", id),
            amount,
            category: "Food".to_string(),
            notes: None,
            date_added: "2024-03-02 12:00:00".to_string(),
            predicted_category: None,
            confidence: None,
        }
    }

    impl FakeApi {
        fn record(&self, call: &'static str) -> Result<(), ApiError> {
            self.calls.borrow_mut().push(call);
            if self.fail.borrow().contains(&call) {
                Err(ApiError::Server {
                    status: 500,
                    message: format!("{} exploded", call),
                })
            } else {
                Ok(())
            }
        }

        fn count(&self, call: &str) -> usize {
            self.calls.borrow().iter().filter(|c| **c == call).count()
        }

        fn failing(calls: &[&'static str]) -> Self {
            let api = Self::default();
            api.fail.borrow_mut().extend_from_slice(calls);
            api
        }
    }

    #[async_trait(?Send)]
    impl ExpenseApi for FakeApi {
        async fn create_expense(&self, expense: &NewExpense) -> Result<CreatedExpense, ApiError> {
            self.record("create")?;
            let mut expenses = self.expenses.borrow_mut();
            let id = expenses.len() as i64 + 1;
            expenses.insert(
                0,
                Expense {
                    id,
                    description: expense.description.clone(),
                    amount: expense.amount,
                    category: expense.category.clone(),
                    notes: Some(expense.notes.clone()),
                    date_added: "2024-03-01 08:15:00".to_string(),
                    predicted_category: Some("Food".to_string()),
                    confidence: Some(0.9),
                },
            );
            Ok(CreatedExpense {
                id,
                message: Some("Expense added successfully".to_string()),
                predicted_category: Some("Food".to_string()),
                confidence: Some(0.9),
            })
        }

        async fn list_expenses(&self) -> Result<Vec<Expense>, ApiError> {
            self.record("list")?;
            let snapshot = self.expenses.borrow().clone();
            pause(&self.list_delays).await;
            Ok(snapshot)
        }

        async fn delete_expense(&self, id: i64) -> Result<(), ApiError> {
            self.record("delete")?;
            self.expenses.borrow_mut().retain(|e| e.id != id);
            Ok(())
        }

        async fn predict(&self, description: &str) -> Result<Prediction, ApiError> {
            self.record("predict")?;
            pause(&self.prediction_delays).await;
            let category = if description.to_lowercase().contains("uber") {
                "Transportation"
            } else {
                "Food"
            };
            Ok(Prediction {
                category: category.to_string(),
                confidence: 0.85,
            })
        }

        async fn category_totals(&self) -> Result<Vec<CategoryTotal>, ApiError> {
            self.record("categories_total")?;
            let total_amount = self.expenses.borrow().iter().map(|e| e.amount).sum();
            pause(&self.analytics_delays).await;
            Ok(vec![CategoryTotal {
                category: "Food".to_string(),
                total_amount,
            }])
        }

        async fn total_spending(&self) -> Result<TotalSpending, ApiError> {
            self.record("total")?;
            Ok(TotalSpending {
                total: Some(self.expenses.borrow().iter().map(|e| e.amount).sum()),
            })
        }

        async fn monthly_totals(&self) -> Result<Vec<MonthlyTotal>, ApiError> {
            self.record("monthly")?;
            Ok(vec![MonthlyTotal {
                month: "2024-03".to_string(),
                total_amount: 4.5,
            }])
        }

        async fn categories(&self) -> Result<Vec<String>, ApiError> {
            self.record("category_list")?;
            Ok(vec!["Food".to_string(), "Transportation".to_string()])
        }

        async fn health(&self) -> Result<Health, ApiError> {
            self.record("health")?;
            Ok(Health {
                status: "healthy".to_string(),
                model_loaded: true,
                database_connected: true,
            })
        }
    }

    struct RecordingEffects {
        actions: RefCell<Vec<DashboardAction>>,
        toasts: RefCell<Vec<(ToastKind, String)>>,
        confirm_answer: bool,
    }

    impl RecordingEffects {
        fn answering(confirm_answer: bool) -> Self {
            Self {
                actions: RefCell::default(),
                toasts: RefCell::default(),
                confirm_answer,
            }
        }

        fn state(&self) -> Rc<DashboardState> {
            self.actions
                .borrow()
                .iter()
                .cloned()
                .fold(Rc::new(DashboardState::default()), |s, a| s.reduce(a))
        }

        fn toast_messages(&self) -> Vec<String> {
            self.toasts.borrow().iter().map(|(_, m)| m.clone()).collect()
        }
    }

    impl DashboardEffects for RecordingEffects {
        fn apply(&self, action: DashboardAction) {
            self.actions.borrow_mut().push(action);
        }

        fn notify(&self, kind: ToastKind, message: String) {
            self.toasts.borrow_mut().push((kind, message));
        }

        fn confirm(&self, _message: &str) -> bool {
            self.confirm_answer
        }
    }

    fn dashboard(api: FakeApi) -> Dashboard<FakeApi, RecordingEffects> {
        Dashboard::new(api, RecordingEffects::answering(true), 3)
    }

    fn form(description: &str, amount: &str, category: &str) -> ExpenseForm {
        ExpenseForm {
            description: description.to_string(),
            amount: amount.to_string(),
            category: category.to_string(),
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn invalid_forms_never_reach_the_server() {
        let dash = dashboard(FakeApi::default());
        dash.submit(form("Coffee", "0", "Food")).await;
        dash.submit(form("Coffee", "-2", "Food")).await;
        dash.submit(form("", "4.5", "Food")).await;
        dash.submit(form("Coffee", "4.5", "")).await;

        assert!(dash.api.calls.borrow().is_empty());
        assert_eq!(
            dash.effects.toast_messages(),
            vec![
                "Valid amount is required",
                "Valid amount is required",
                "Description is required",
                "Category is required",
            ]
        );
        assert!(dash.effects.actions.borrow().is_empty());
    }

    #[tokio::test]
    async fn submit_then_list_contains_the_expense() {
        let dash = dashboard(FakeApi::default());
        dash.submit(form("Coffee", "4.5", "Food")).await;

        for call in ["create", "list", "categories_total", "total", "monthly"] {
            assert_eq!(dash.api.count(call), 1, "{}", call);
        }

        let state = dash.effects.state();
        let expenses = state.expenses.clone().unwrap();
        let coffee = expenses.iter().find(|e| e.description == "Coffee").unwrap();
        assert_eq!(coffee.category, "Food");
        assert_eq!(format_currency(coffee.amount, "$"), "$4.50");
        assert_eq!(state.analytics.total, 4.5);
        assert_eq!(state.form, ExpenseForm::default());
        assert!(!state.loading);
        assert_eq!(
            dash.effects.toasts.borrow()[0],
            (ToastKind::Success, "Expense added successfully!".to_string())
        );
    }

    #[tokio::test]
    async fn failed_submit_keeps_form_and_shows_server_message() {
        let dash = dashboard(FakeApi::failing(&["create"]));
        dash.submit(form("Coffee", "4.5", "Food")).await;

        assert_eq!(dash.api.count("list"), 0);
        assert_eq!(
            dash.effects.toast_messages(),
            vec!["Failed to add expense: create exploded"]
        );
        let actions = dash.effects.actions.borrow();
        assert_eq!(
            *actions,
            vec![
                DashboardAction::SetLoading(true),
                DashboardAction::SetLoading(false)
            ]
        );
    }

    #[tokio::test]
    async fn short_descriptions_hide_the_hint_without_a_request() {
        let dash = dashboard(FakeApi::default());
        dash.predict("  ab  ").await;

        assert_eq!(dash.api.count("predict"), 0);
        assert_eq!(
            *dash.effects.actions.borrow(),
            vec![DashboardAction::HidePrediction]
        );
    }

    #[tokio::test]
    async fn prediction_shows_hint_and_fills_category() {
        let dash = dashboard(FakeApi::default());
        dash.predict("Uber ride home").await;

        let state = dash.effects.state();
        assert_eq!(state.form.category, "Transportation");
        assert_eq!(state.prediction.as_ref().map(|p| p.confidence), Some(0.85));
    }

    #[tokio::test]
    async fn failed_prediction_hides_hint_silently() {
        let dash = dashboard(FakeApi::failing(&["predict"]));
        dash.predict("Coffee").await;

        assert_eq!(
            *dash.effects.actions.borrow(),
            vec![DashboardAction::HidePrediction]
        );
        assert!(dash.effects.toasts.borrow().is_empty());
    }

    #[tokio::test]
    async fn stale_prediction_does_not_overwrite_newer_one() {
        let api = FakeApi::default();
        api.prediction_delays.borrow_mut().extend([5, 0]);
        let dash = dashboard(api);

        tokio::join!(dash.predict("Lunch at cafe"), dash.predict("Uber to work"));

        assert_eq!(dash.api.count("predict"), 2);
        let state = dash.effects.state();
        assert_eq!(state.prediction.as_ref().map(|p| p.category.as_str()), Some("Transportation"));
        assert_eq!(state.form.category, "Transportation");
    }

    #[tokio::test]
    async fn short_input_invalidates_prediction_in_flight() {
        let api = FakeApi::default();
        api.prediction_delays.borrow_mut().extend([5]);
        let dash = dashboard(api);

        tokio::join!(dash.predict("Lunch at cafe"), dash.predict("L"));

        assert_eq!(dash.effects.state().prediction, None);
    }

    #[tokio::test]
    async fn declined_confirmation_sends_nothing() {
        let dash = Dashboard::new(FakeApi::default(), RecordingEffects::answering(false), 3);
        dash.delete(1).await;

        assert!(dash.api.calls.borrow().is_empty());
        assert!(dash.effects.actions.borrow().is_empty());
    }

    #[tokio::test]
    async fn delete_refreshes_everything() {
        let dash = dashboard(FakeApi::default());
        dash.submit(form("Coffee", "4.5", "Food")).await;
        dash.api.calls.borrow_mut().clear();

        dash.delete(1).await;

        for call in ["delete", "list", "categories_total", "total", "monthly"] {
            assert_eq!(dash.api.count(call), 1, "{}", call);
        }
        let state = dash.effects.state();
        assert_eq!(state.expenses.as_deref().map(Vec::len), Some(0));
        assert_eq!(
            dash.effects.toast_messages().last().map(String::as_str),
            Some("Expense deleted successfully")
        );
    }

    #[tokio::test]
    async fn failed_delete_shows_error_and_skips_refresh() {
        let dash = dashboard(FakeApi::failing(&["delete"]));
        dash.delete(9).await;

        assert_eq!(dash.api.count("list"), 0);
        assert_eq!(dash.effects.toast_messages(), vec!["Failed to delete expense"]);
        assert!(!dash.effects.state().loading);
    }

    #[tokio::test]
    async fn analytics_are_all_or_nothing() {
        let dash = dashboard(FakeApi::failing(&["monthly"]));
        dash.refresh_analytics().await;

        assert!(dash
            .effects
            .actions
            .borrow()
            .iter()
            .all(|a| !matches!(a, DashboardAction::AnalyticsLoaded(_))));
        assert_eq!(dash.effects.toast_messages(), vec!["Failed to load analytics"]);
    }

    #[tokio::test]
    async fn list_failure_is_reported() {
        let dash = dashboard(FakeApi::failing(&["list"]));
        dash.load_expenses().await;

        assert_eq!(dash.effects.toast_messages(), vec!["Failed to load expenses"]);
        let state = dash.effects.state();
        assert!(state.expenses.is_none());
        assert!(state.list_failed);
    }

    #[tokio::test]
    async fn start_loads_every_view() {
        let dash = dashboard(FakeApi::default());
        dash.start().await;

        let state = dash.effects.state();
        assert_eq!(state.expenses.as_deref().map(Vec::len), Some(0));
        assert_eq!(state.status, ServiceStatus::Ready);
        assert_eq!(state.analytics.monthly.len(), 1);
        assert!(dash.effects.toasts.borrow().is_empty());
    }

    #[tokio::test]
    async fn optional_endpoints_fail_quietly() {
        let dash = dashboard(FakeApi::failing(&["category_list", "health"]));
        dash.start().await;

        let state = dash.effects.state();
        assert_eq!(state.status, ServiceStatus::Offline);
        assert_eq!(state.categories.len(), 4);
        assert!(dash.effects.toasts.borrow().is_empty());
    }

    #[tokio::test]
    async fn manual_reload_refetches_and_confirms() {
        let dash = dashboard(FakeApi::default());
        dash.reload().await;

        assert_eq!(dash.api.count("list"), 1);
        assert_eq!(dash.api.count("monthly"), 1);
        assert_eq!(dash.effects.toasts.borrow().as_slice(), &[(ToastKind::Info, REFRESHED_MESSAGE.to_string())]);
    }

    #[tokio::test]
    async fn prediction_in_flight_is_dropped_after_submit() {
        let api = FakeApi::default();
        api.prediction_delays.borrow_mut().extend([50]);
        let dash = dashboard(api);

        tokio::join!(
            dash.predict("Lunch at cafe"),
            dash.submit(form("Coffee", "4.5", "Food"))
        );

        assert_eq!(dash.api.count("predict"), 1);
        let state = dash.effects.state();
        assert_eq!(state.form, ExpenseForm::default());
        assert_eq!(state.prediction, None);
    }

    #[tokio::test]
    async fn stale_list_does_not_overwrite_newer_one() {
        let api = FakeApi::default();
        api.list_delays.borrow_mut().extend([5, 0]);
        let dash = dashboard(api);

        tokio::join!(dash.load_expenses(), async {
            dash.api.expenses.borrow_mut().push(sample_expense(1, 12.0));
            dash.load_expenses().await
        });

        assert_eq!(dash.api.count("list"), 2);
        let loaded: Vec<_> = dash
            .effects
            .actions
            .borrow()
            .iter()
            .filter_map(|a| match a {
                DashboardAction::ExpensesLoaded(expenses) => Some(expenses.len()),
                _ => None,
            })
            .collect();
        assert_eq!(loaded, vec![1]);
        assert_eq!(dash.effects.state().expenses.as_deref().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn stale_analytics_do_not_overwrite_newer_ones() {
        let api = FakeApi::default();
        api.analytics_delays.borrow_mut().extend([5, 0]);
        let dash = dashboard(api);

        tokio::join!(dash.refresh_analytics(), async {
            dash.api.expenses.borrow_mut().push(sample_expense(1, 12.0));
            dash.refresh_analytics().await
        });

        assert_eq!(dash.api.count("categories_total"), 2);
        let totals: Vec<f64> = dash
            .effects
            .actions
            .borrow()
            .iter()
            .filter_map(|a| match a {
                DashboardAction::AnalyticsLoaded(snapshot) => Some(snapshot.total),
                _ => None,
            })
            .collect();
        assert_eq!(totals, vec![12.0]);
        let state = dash.effects.state();
        assert_eq!(state.analytics.total, 12.0);
        assert_eq!(state.analytics.categories[0].total_amount, 12.0);
    }
}
