use std::rc::Rc;

use yew::Reducible;

use crate::model::{merge_categories, AnalyticsSnapshot, Expense, ExpenseForm, Health, Prediction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceStatus {
    #[default]
    Unknown,
    Ready,
    ModelUnavailable,
    Offline,
}

impl ServiceStatus {
    pub fn from_health(health: &Health) -> Self {
        if health.model_loaded {
            ServiceStatus::Ready
        } else {
            ServiceStatus::ModelUnavailable
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ServiceStatus::Unknown => "Checking…",
            ServiceStatus::Ready => "Model ready",
            ServiceStatus::ModelUnavailable => "Model unavailable",
            ServiceStatus::Offline => "Offline",
        }
    }
}

/// Everything the dashboard views render.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub form: ExpenseForm,
    pub prediction: Option<Prediction>,
    /// `None` until the first list load completes.
    pub expenses: Option<Rc<Vec<Expense>>>,
    /// The latest list load failed.
    pub list_failed: bool,
    pub analytics: Rc<AnalyticsSnapshot>,
    pub loading: bool,
    pub categories: Rc<Vec<String>>,
    pub status: ServiceStatus,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            form: ExpenseForm::default(),
            prediction: None,
            expenses: None,
            list_failed: false,
            analytics: Rc::default(),
            loading: false,
            categories: Rc::new(merge_categories(&[])),
            status: ServiceStatus::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardAction {
    EditDescription(String),
    EditAmount(String),
    SelectCategory(String),
    EditNotes(String),
    /// Shows the hint and fills the category if the user has not picked one.
    ShowPrediction(Prediction),
    HidePrediction,
    ResetForm,
    ExpensesLoaded(Vec<Expense>),
    /// Keeps whatever list is already shown.
    ExpensesFailed,
    AnalyticsLoaded(AnalyticsSnapshot),
    SetLoading(bool),
    CategoriesLoaded(Vec<String>),
    StatusChecked(ServiceStatus),
}

impl Reducible for DashboardState {
    type Action = DashboardAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            DashboardAction::EditDescription(value) => next.form.description = value,
            DashboardAction::EditAmount(value) => next.form.amount = value,
            DashboardAction::SelectCategory(value) => next.form.category = value,
            DashboardAction::EditNotes(value) => next.form.notes = value,
            DashboardAction::ShowPrediction(prediction) => {
                if next.form.category.trim().is_empty() {
                    next.form.category = prediction.category.clone();
                }
                next.prediction = Some(prediction);
            }
            DashboardAction::HidePrediction => next.prediction = None,
            DashboardAction::ResetForm => {
                next.form = ExpenseForm::default();
                next.prediction = None;
            }
            DashboardAction::ExpensesLoaded(expenses) => {
                next.expenses = Some(Rc::new(expenses));
                next.list_failed = false;
            }
            DashboardAction::ExpensesFailed => next.list_failed = true,
            DashboardAction::AnalyticsLoaded(snapshot) => next.analytics = Rc::new(snapshot),
            DashboardAction::SetLoading(loading) => next.loading = loading,
            DashboardAction::CategoriesLoaded(server) => {
                next.categories = Rc::new(merge_categories(&server))
            }
            DashboardAction::StatusChecked(status) => next.status = status,
        }
        Rc::new(next)
    }
}
