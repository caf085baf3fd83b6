use std::rc::Rc;

use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::components::icons::{icon_plus, icon_robot};
use crate::format::format_confidence;
use crate::model::{ConfidenceTier, ExpenseForm, Prediction};
use crate::state::DashboardAction;

#[derive(Properties, PartialEq)]
pub struct PredictionHintProps {
    pub prediction: Option<Prediction>,
    pub high_confidence: f64,
}

#[function_component(PredictionHint)]
pub fn prediction_hint(props: &PredictionHintProps) -> Html {
    match &props.prediction {
        Some(prediction) => {
            let tier = ConfidenceTier::of(prediction.confidence, props.high_confidence);
            html! {
                <div id="prediction" class={classes!("prediction-result", "show", tier.class())}>
                    { icon_robot() }
                    {" AI suggests: "}
                    <strong>{ prediction.category.clone() }</strong>
                    { format!(" ({} confidence)", format_confidence(prediction.confidence)) }
                </div>
            }
        }
        None => html! { <div id="prediction" class="prediction-result"></div> },
    }
}

#[derive(Properties, PartialEq)]
pub struct ExpenseFormProps {
    pub form: ExpenseForm,
    pub prediction: Option<Prediction>,
    pub categories: Rc<Vec<String>>,
    pub high_confidence: f64,
    pub busy: bool,
    /// Raw description text; the owner decides when to predict.
    pub on_description: Callback<String>,
    pub on_edit: Callback<DashboardAction>,
    pub on_submit: Callback<ExpenseForm>,
}

#[function_component(ExpenseFormView)]
pub fn expense_form_view(props: &ExpenseFormProps) -> Html {
    let on_description = {
        let on_description = props.on_description.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_description.emit(input.value());
        })
    };

    let on_amount = {
        let on_edit = props.on_edit.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_edit.emit(DashboardAction::EditAmount(input.value()));
        })
    };

    let on_category = {
        let on_edit = props.on_edit.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            on_edit.emit(DashboardAction::SelectCategory(select.value()));
        })
    };

    let on_notes = {
        let on_edit = props.on_edit.clone();
        Callback::from(move |e: InputEvent| {
            let area: HtmlTextAreaElement = e.target_unchecked_into();
            on_edit.emit(DashboardAction::EditNotes(area.value()));
        })
    };

    let on_submit = {
        let on_submit = props.on_submit.clone();
        let form = props.form.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_submit.emit(form.clone());
        })
    };

    let form = &props.form;

    html! {
        <form id="expenseForm" class="expense-form" onsubmit={on_submit}>
            <div class="form-group">
                <label for="description">{"Description"}</label>
                <input id="description" type="text" placeholder="e.g. Coffee at Starbucks" autocomplete="off"
                    value={form.description.clone()} oninput={on_description} />
                <PredictionHint prediction={props.prediction.clone()} high_confidence={props.high_confidence} />
            </div>
            <div class="form-row">
                <div class="form-group">
                    <label for="amount">{"Amount"}</label>
                    <input id="amount" type="number" step="0.01" min="0.01" placeholder="0.00"
                        value={form.amount.clone()} oninput={on_amount} />
                </div>
                <div class="form-group">
                    <label for="category">{"Category"}</label>
                    <select id="category" onchange={on_category}>
                        <option value="" selected={form.category.is_empty()}>{"Select category"}</option>
                        { for props.categories.iter().map(|category| html! {
                            <option value={category.clone()} selected={*category == form.category}>{ category.clone() }</option>
                        }) }
                    </select>
                </div>
            </div>
            <div class="form-group">
                <label for="notes">{"Notes (optional)"}</label>
                <textarea id="notes" rows="2" value={form.notes.clone()} oninput={on_notes}></textarea>
            </div>
            <button type="submit" class="btn btn-primary">
                { icon_plus() }
                { if props.busy { " Saving..." } else { " Add Expense" } }
            </button>
        </form>
    }
}
