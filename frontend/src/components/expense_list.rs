use std::rc::Rc;

use yew::prelude::*;

use crate::components::icons::{icon_calendar, icon_receipt, icon_robot, icon_trash};
use crate::format::{category_icon, format_confidence, format_currency, format_date};
use crate::model::Expense;

/// One rendered row, precomputed from an `Expense`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRow {
    pub id: i64,
    pub description: String,
    pub icon: &'static str,
    pub category: String,
    pub date: String,
    pub notes: Option<String>,
    pub predicted: Option<String>,
    /// Shown on hover over the prediction note.
    pub predicted_confidence: Option<String>,
    pub amount: String,
}

impl ExpenseRow {
    pub fn new(expense: &Expense, currency_symbol: &str) -> Self {
        Self {
            id: expense.id,
            description: expense.description.clone(),
            icon: category_icon(&expense.category),
            category: expense.category.clone(),
            date: format_date(&expense.date_added),
            notes: expense.notes().map(str::to_string),
            predicted: expense.mismatched_prediction().map(str::to_string),
            predicted_confidence: expense
                .confidence
                .map(|c| format!("{} confidence", format_confidence(c))),
            amount: format_currency(expense.amount, currency_symbol),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum ListContent {
    Loading,
    /// Nothing loaded yet and the last attempt failed.
    Unavailable,
    Empty,
    Rows(Vec<ExpenseRow>),
}

impl ListContent {
    pub fn of(expenses: Option<&[Expense]>, failed: bool, currency_symbol: &str) -> Self {
        match expenses {
            None if failed => ListContent::Unavailable,
            None => ListContent::Loading,
            Some([]) => ListContent::Empty,
            Some(expenses) => ListContent::Rows(
                expenses
                    .iter()
                    .map(|e| ExpenseRow::new(e, currency_symbol))
                    .collect(),
            ),
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct ExpenseListProps {
    pub expenses: Option<Rc<Vec<Expense>>>,
    #[prop_or_default]
    pub failed: bool,
    pub currency_symbol: AttrValue,
    pub on_delete: Callback<i64>,
}

#[function_component(ExpenseList)]
pub fn expense_list(props: &ExpenseListProps) -> Html {
    let content = ListContent::of(
        props.expenses.as_deref().map(Vec::as_slice),
        props.failed,
        &props.currency_symbol,
    );

    let body = match content {
        ListContent::Loading => html! {
            <div class="list-placeholder">{"Loading..."}</div>
        },
        ListContent::Unavailable => html! {
            <div class="list-placeholder">{"Could not load expenses. Try refreshing."}</div>
        },
        ListContent::Empty => html! {
            <div class="empty-state">
                { icon_receipt() }
                <h3>{"No expenses yet"}</h3>
                <p>{"Add your first expense to get started!"}</p>
            </div>
        },
        ListContent::Rows(rows) => html! {
            <>
                { for rows.into_iter().map(|row| {
                    let on_delete = {
                        let on_delete = props.on_delete.clone();
                        let id = row.id;
                        Callback::from(move |_: MouseEvent| on_delete.emit(id))
                    };
                    html! {
                        <div key={row.id.to_string()} class="expense-item" data-id={row.id.to_string()}>
                            <div class="expense-details">
                                <div class="expense-description">{ row.description }</div>
                                <div class="expense-meta">
                                    <span class="expense-category">{ format!("{} {}", row.icon, row.category) }</span>
                                    <span class="expense-date">{ icon_calendar() }{ row.date }</span>
                                    {
                                        if let Some(predicted) = row.predicted {
                                            html! {
                                                <span class="prediction-info" title={row.predicted_confidence.clone()}>
                                                    { icon_robot() }{ format!("Predicted: {}", predicted) }
                                                </span>
                                            }
                                        } else { html! {} }
                                    }
                                </div>
                                {
                                    if let Some(notes) = row.notes {
                                        html! { <div class="expense-notes">{ notes }</div> }
                                    } else { html! {} }
                                }
                            </div>
                            <div class="expense-amount">{ row.amount }</div>
                            <div class="expense-actions">
                                <button type="button" class="btn btn-danger" aria-label="Delete expense" onclick={on_delete}>
                                    { icon_trash() }
                                </button>
                            </div>
                        </div>
                    }
                }) }
            </>
        },
    };

    html! {
        <div id="expensesList" class="expenses-list">
            { body }
        </div>
    }
}
